use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use super::StrengthScope;
use super::trail::{VotingStrengthTrail, VotingStrengthTrailForPersons};
use crate::numbers::VotingStrength;
use crate::person::Person;

/// Trails for the persons mentioned in one scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrengthLayer {
    scope: StrengthScope,
    trails: Arc<BTreeMap<Person, VotingStrengthTrail>>,
}

impl StrengthLayer {
    #[must_use]
    pub fn new(scope: StrengthScope, trails: BTreeMap<Person, VotingStrengthTrail>) -> Self {
        Self {
            scope,
            trails: Arc::new(trails),
        }
    }

    #[must_use]
    pub const fn scope(&self) -> StrengthScope {
        self.scope
    }

    #[must_use]
    pub fn trails(&self) -> &BTreeMap<Person, VotingStrengthTrail> {
        &self.trails
    }
}

/// Voting strengths as an ordered chain of lookup layers over a default.
///
/// Lookups walk the layers from most to least specific and fall back to the
/// default strength. Cloning shares the layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VotingStrengthMap {
    default: VotingStrength,
    layers: Vec<StrengthLayer>,
}

impl VotingStrengthMap {
    #[must_use]
    pub const fn new(default: VotingStrength) -> Self {
        Self {
            default,
            layers: Vec::new(),
        }
    }

    /// Put `layer` in front of the existing layers.
    #[must_use]
    pub fn with_layer(mut self, layer: StrengthLayer) -> Self {
        self.layers.insert(0, layer);
        self
    }

    #[must_use]
    pub const fn default_strength(&self) -> &VotingStrength {
        &self.default
    }

    /// Layers from most to least specific.
    #[must_use]
    pub fn layers(&self) -> &[StrengthLayer] {
        &self.layers
    }

    /// The most specific layer, when it is not the global one.
    #[must_use]
    pub fn proposal_layer(&self) -> Option<&StrengthLayer> {
        self.layers
            .first()
            .filter(|layer| layer.scope != StrengthScope::Global)
    }

    #[must_use]
    pub fn trail_for(&self, person: &Person) -> Cow<'_, VotingStrengthTrail> {
        self.layers
            .iter()
            .find_map(|layer| layer.trails.get(person))
            .map_or_else(
                || Cow::Owned(VotingStrengthTrail::new(self.default.clone())),
                Cow::Borrowed,
            )
    }

    /// Final strength of `person`; persons never mentioned get the default.
    #[must_use]
    pub fn get(&self, person: &Person) -> VotingStrength {
        self.trail_for(person).final_strength()
    }

    #[must_use]
    pub fn overridden_persons(&self) -> BTreeSet<&Person> {
        self.layers
            .iter()
            .flat_map(|layer| layer.trails.keys())
            .collect()
    }

    /// Flattened view: the effective trail of every mentioned person.
    #[must_use]
    pub fn trails(&self) -> VotingStrengthTrailForPersons {
        let overrides = self
            .overridden_persons()
            .into_iter()
            .map(|person| (person.clone(), self.trail_for(person).into_owned()))
            .collect();
        VotingStrengthTrailForPersons::new(self.default.clone(), overrides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numbers::VotingStrengthDifference;
    use crate::proposal::ProposalNumber;
    use crate::strength::VotingStrengthModification;

    fn layer(scope: StrengthScope, person: &str, initial: u64, add: i64) -> StrengthLayer {
        let trail = VotingStrengthTrail::new(VotingStrength::from_integer(initial)).with_appended(
            VotingStrengthModification::add(VotingStrengthDifference::from_integer(add), None),
        );
        StrengthLayer::new(scope, BTreeMap::from([(Person::new(person), trail)]))
    }

    #[test]
    fn most_specific_layer_wins() {
        let global = VotingStrengthMap::new(VotingStrength::from_integer(3))
            .with_layer(layer(StrengthScope::Global, "Q", 3, 2));
        let proposal = global
            .clone()
            .with_layer(layer(StrengthScope::Proposal(ProposalNumber(7)), "Q", 5, 2));

        let q = Person::new("Q");
        assert_eq!(global.get(&q), VotingStrength::from_integer(5));
        assert_eq!(proposal.get(&q), VotingStrength::from_integer(7));
        assert_eq!(proposal.get(&Person::new("P")), VotingStrength::from_integer(3));
        assert!(global.proposal_layer().is_none());
        assert_eq!(
            proposal.proposal_layer().map(StrengthLayer::scope),
            Some(StrengthScope::Proposal(ProposalNumber(7)))
        );
    }

    #[test]
    fn flattened_trails_cover_every_layer() {
        let map = VotingStrengthMap::new(VotingStrength::from_integer(3))
            .with_layer(layer(StrengthScope::Global, "A", 3, 1))
            .with_layer(layer(StrengthScope::Proposal(ProposalNumber(1)), "B", 3, 4));
        let trails = map.trails();
        let persons: Vec<&str> = trails.overridden_persons().map(Person::name).collect();
        assert_eq!(persons, ["A", "B"]);
        assert_eq!(
            trails.final_strength_for(&Person::new("B")),
            VotingStrength::from_integer(7)
        );
    }
}
