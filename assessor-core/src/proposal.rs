//! Proposals under assessment.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{ConfigError, LookupError};
use crate::numbers::ProposalAi;
use crate::person::{Person, Persons};

/// Globally unique proposal identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProposalNumber(pub u32);

impl fmt::Display for ProposalNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The chamber an ordinary proposal is assigned to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Chamber(pub String);

impl fmt::Display for Chamber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Classification of a proposal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "class", rename_all = "snake_case")]
pub enum ClassAndChamber {
    Classless,
    Democratic,
    Ordinary {
        #[serde(default)]
        chamber: Option<Chamber>,
    },
}

impl ClassAndChamber {
    /// The chamber, for ordinary proposals that have one.
    #[must_use]
    pub const fn chamber(&self) -> Option<&Chamber> {
        match self {
            Self::Ordinary { chamber } => chamber.as_ref(),
            Self::Classless | Self::Democratic => None,
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Classless => "classless",
            Self::Democratic => "democratic",
            Self::Ordinary { .. } => "ordinary",
        }
    }
}

/// Data that depends on the proposal schema version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VersionedData {
    /// Common data only.
    V0,
    /// Adds classification.
    V1 { class_and_chamber: ClassAndChamber },
    /// Adds classification and sponsorship.
    V2 {
        class_and_chamber: ClassAndChamber,
        sponsored: bool,
    },
}

impl VersionedData {
    #[must_use]
    pub const fn version(&self) -> u32 {
        match self {
            Self::V0 => 0,
            Self::V1 { .. } => 1,
            Self::V2 { .. } => 2,
        }
    }

    #[must_use]
    pub const fn class_and_chamber(&self) -> Option<&ClassAndChamber> {
        match self {
            Self::V0 => None,
            Self::V1 { class_and_chamber } | Self::V2 { class_and_chamber, .. } => {
                Some(class_and_chamber)
            }
        }
    }

    #[must_use]
    pub const fn sponsored(&self) -> Option<bool> {
        match self {
            Self::V2 { sponsored, .. } => Some(*sponsored),
            Self::V0 | Self::V1 { .. } => None,
        }
    }
}

/// An immutable proposal record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Proposal {
    pub number: ProposalNumber,
    pub title: String,
    pub ai: ProposalAi,
    pub author: Person,
    pub coauthors: Persons,
    pub text: String,
    pub versioned: VersionedData,
}

impl Proposal {
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.versioned.version()
    }

    /// Chamber for ordinary proposals, if any.
    #[must_use]
    pub fn chamber(&self) -> Option<&Chamber> {
        self.versioned
            .class_and_chamber()
            .and_then(ClassAndChamber::chamber)
    }
}

/// Proposals keyed by number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProposalSet(BTreeMap<ProposalNumber, Proposal>);

impl ProposalSet {
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Add a proposal. Adding an identical copy again is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ProposalMismatch`] when a different proposal
    /// already holds the same number.
    pub fn insert(&mut self, proposal: Proposal) -> Result<(), ConfigError> {
        match self.0.get(&proposal.number) {
            Some(existing) if existing == &proposal => Ok(()),
            Some(_) => Err(ConfigError::ProposalMismatch(proposal.number)),
            None => {
                self.0.insert(proposal.number, proposal);
                Ok(())
            }
        }
    }

    /// # Errors
    ///
    /// Returns [`LookupError::UnknownProposal`] if no proposal has that number.
    pub fn get(&self, number: ProposalNumber) -> Result<&Proposal, LookupError> {
        self.0
            .get(&number)
            .ok_or(LookupError::UnknownProposal(number))
    }

    /// The proposals for which `keep` holds.
    #[must_use]
    pub fn filtered(&self, mut keep: impl FnMut(&Proposal) -> bool) -> Self {
        Self(
            self.0
                .iter()
                .filter(|(_, proposal)| keep(proposal))
                .map(|(number, proposal)| (*number, proposal.clone()))
                .collect(),
        )
    }

    #[must_use]
    pub fn contains(&self, number: ProposalNumber) -> bool {
        self.0.contains_key(&number)
    }

    /// Proposals in number order.
    pub fn iter(&self) -> impl Iterator<Item = &Proposal> {
        self.0.values()
    }

    pub fn numbers(&self) -> impl Iterator<Item = ProposalNumber> + '_ {
        self.0.keys().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a ProposalSet {
    type Item = &'a Proposal;
    type IntoIter = std::collections::btree_map::Values<'a, ProposalNumber, Proposal>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.values()
    }
}

/// Render proposal numbers as `"1, 2, 3"`.
#[must_use]
pub fn join_numbers<I>(numbers: I) -> String
where
    I: IntoIterator<Item = ProposalNumber>,
{
    numbers
        .into_iter()
        .map(|number| number.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proposal(number: u32, title: &str) -> Proposal {
        Proposal {
            number: ProposalNumber(number),
            title: title.to_string(),
            ai: ProposalAi::parse("1.0").unwrap(),
            author: Person::new("Aris"),
            coauthors: Persons::new(),
            text: String::new(),
            versioned: VersionedData::V1 {
                class_and_chamber: ClassAndChamber::Ordinary {
                    chamber: Some(Chamber("Economy".to_string())),
                },
            },
        }
    }

    #[test]
    fn identical_reinsert_is_accepted() {
        let mut set = ProposalSet::new();
        set.insert(proposal(8558, "Silver Quill")).unwrap();
        set.insert(proposal(8558, "Silver Quill")).unwrap();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn differing_reinsert_is_rejected() {
        let mut set = ProposalSet::new();
        set.insert(proposal(8558, "Silver Quill")).unwrap();
        assert_eq!(
            set.insert(proposal(8558, "Gold Quill")),
            Err(ConfigError::ProposalMismatch(ProposalNumber(8558)))
        );
    }

    #[test]
    fn filtered_keeps_matching_proposals_in_order() {
        let mut set = ProposalSet::new();
        for (number, title) in [(3, "c"), (1, "a"), (2, "b")] {
            set.insert(proposal(number, title)).unwrap();
        }
        let odd = set.filtered(|proposal| proposal.number.0 % 2 == 1);
        assert_eq!(odd.numbers().collect::<Vec<_>>(), [ProposalNumber(1), ProposalNumber(3)]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn chamber_only_for_ordinary() {
        assert_eq!(
            proposal(1, "x").chamber(),
            Some(&Chamber("Economy".to_string()))
        );
        assert_eq!(ClassAndChamber::Democratic.chamber(), None);
        assert_eq!(VersionedData::V0.class_and_chamber(), None);
    }

    #[test]
    fn lookup_names_missing_number() {
        let set = ProposalSet::new();
        assert_eq!(
            set.get(ProposalNumber(9999)).unwrap_err(),
            LookupError::UnknownProposal(ProposalNumber(9999))
        );
    }
}
