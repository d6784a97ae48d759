use num_rational::BigRational;
use std::collections::BTreeMap;

use crate::numbers::{VotingStrength, VotingStrengthDifference, format_decimal};

/// What a modification does to the strength it is applied to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModificationKind {
    Set { value: VotingStrength },
    Add { amount: VotingStrengthDifference },
    Multiply { factor: BigRational },
    Floor { min: VotingStrength },
    Cap { max: VotingStrength },
}

/// Machine and human readable account of one modification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModificationDescription {
    pub readable: String,
    pub kind: &'static str,
    pub parameters: BTreeMap<&'static str, String>,
}

/// A named transform over a voting strength, with its justification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VotingStrengthModification {
    kind: ModificationKind,
    readable: String,
}

impl VotingStrengthModification {
    #[must_use]
    pub fn set(value: VotingStrength, comment: Option<String>) -> Self {
        let readable = comment.unwrap_or_else(|| format!("set to {value}"));
        Self {
            kind: ModificationKind::Set { value },
            readable,
        }
    }

    #[must_use]
    pub fn add(amount: VotingStrengthDifference, reason: Option<String>) -> Self {
        let readable = match reason {
            Some(reason) => format!("{reason} ({})", amount.signed()),
            None => amount.signed(),
        };
        Self {
            kind: ModificationKind::Add { amount },
            readable,
        }
    }

    #[must_use]
    pub fn multiply(factor: BigRational, reason: Option<String>) -> Self {
        let times = format!("x{}", format_decimal(&factor, 0));
        let readable = match reason {
            Some(reason) => format!("{reason} ({times})"),
            None => times,
        };
        Self {
            kind: ModificationKind::Multiply { factor },
            readable,
        }
    }

    #[must_use]
    pub fn floor(min: VotingStrength) -> Self {
        Self {
            readable: format!("raised to the minimum of {min}"),
            kind: ModificationKind::Floor { min },
        }
    }

    #[must_use]
    pub fn cap(max: VotingStrength) -> Self {
        Self {
            readable: format!("capped at the maximum of {max}"),
            kind: ModificationKind::Cap { max },
        }
    }

    #[must_use]
    pub const fn kind(&self) -> &ModificationKind {
        &self.kind
    }

    #[must_use]
    pub fn readable(&self) -> &str {
        &self.readable
    }

    #[must_use]
    pub fn transform(&self, current: &VotingStrength) -> VotingStrength {
        match &self.kind {
            ModificationKind::Set { value } => value.clone(),
            ModificationKind::Add { amount } => current.saturating_add(amount),
            ModificationKind::Multiply { factor } => current.scaled(factor),
            ModificationKind::Floor { min } => current.max(min).clone(),
            ModificationKind::Cap { max } => current.min(max).clone(),
        }
    }

    #[must_use]
    pub fn description(&self) -> ModificationDescription {
        let (kind, parameters) = match &self.kind {
            ModificationKind::Set { value } => ("set", [("value", value.to_string())]),
            ModificationKind::Add { amount } => ("add", [("amount", amount.to_string())]),
            ModificationKind::Multiply { factor } => {
                ("multiply", [("factor", format_decimal(factor, 0))])
            }
            ModificationKind::Floor { min } => ("floor", [("min", min.to_string())]),
            ModificationKind::Cap { max } => ("cap", [("max", max.to_string())]),
        };
        ModificationDescription {
            readable: self.readable.clone(),
            kind,
            parameters: parameters.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;

    #[test]
    fn transforms_follow_kind() {
        let five = VotingStrength::from_integer(5);
        let add = VotingStrengthModification::add(VotingStrengthDifference::from_integer(2), None);
        assert_eq!(add.transform(&five), VotingStrength::from_integer(7));

        let half = BigRational::new(BigInt::from(1), BigInt::from(2));
        let multiply = VotingStrengthModification::multiply(half, None);
        assert_eq!(multiply.transform(&five).to_string(), "2.5");

        let cap = VotingStrengthModification::cap(VotingStrength::from_integer(4));
        assert_eq!(cap.transform(&five), VotingStrength::from_integer(4));

        let floor = VotingStrengthModification::floor(VotingStrength::from_integer(6));
        assert_eq!(floor.transform(&five), VotingStrength::from_integer(6));
    }

    #[test]
    fn readable_text_carries_reason_and_amount() {
        let add = VotingStrengthModification::add(
            VotingStrengthDifference::from_integer(1),
            Some("Prime Minister".to_string()),
        );
        assert_eq!(add.readable(), "Prime Minister (+1)");

        let set = VotingStrengthModification::set(VotingStrength::from_integer(2), None);
        assert_eq!(set.readable(), "set to 2");
    }

    #[test]
    fn description_exposes_kind_and_parameters() {
        let set = VotingStrengthModification::set(
            VotingStrength::from_integer(2),
            Some("blot penalty".to_string()),
        );
        let description = set.description();
        assert_eq!(description.kind, "set");
        assert_eq!(description.readable, "blot penalty");
        assert_eq!(description.parameters.get("value").map(String::as_str), Some("2"));
    }
}
