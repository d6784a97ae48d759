use std::borrow::Cow;
use std::collections::BTreeMap;

use super::modification::VotingStrengthModification;
use crate::numbers::VotingStrength;
use crate::person::Person;

/// An initial strength and the ordered modifications applied to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VotingStrengthTrail {
    initial: VotingStrength,
    modifications: Vec<VotingStrengthModification>,
}

impl VotingStrengthTrail {
    #[must_use]
    pub const fn new(initial: VotingStrength) -> Self {
        Self {
            initial,
            modifications: Vec::new(),
        }
    }

    #[must_use]
    pub const fn initial(&self) -> &VotingStrength {
        &self.initial
    }

    #[must_use]
    pub fn modifications(&self) -> &[VotingStrengthModification] {
        &self.modifications
    }

    /// Left fold of every modification over the initial strength.
    #[must_use]
    pub fn final_strength(&self) -> VotingStrength {
        self.modifications
            .iter()
            .fold(self.initial.clone(), |acc, modification| {
                modification.transform(&acc)
            })
    }

    /// Each step with the strength after it. The first entry is the initial
    /// value and is the only one without a modification.
    ///
    /// Starting at 3 with (+2) then (x4) yields `(None, 3)`, `(+2, 5)`, `(x4, 20)`.
    #[must_use]
    pub fn steps_with_values(&self) -> Vec<(Option<&VotingStrengthModification>, VotingStrength)> {
        let mut steps = Vec::with_capacity(self.modifications.len() + 1);
        let mut current = self.initial.clone();
        steps.push((None, current.clone()));
        for modification in &self.modifications {
            current = modification.transform(&current);
            steps.push((Some(modification), current.clone()));
        }
        steps
    }

    /// [`Self::steps_with_values`] without the initial entry.
    #[must_use]
    pub fn modifications_with_values(&self) -> Vec<(&VotingStrengthModification, VotingStrength)> {
        self.steps_with_values()
            .into_iter()
            .filter_map(|(modification, value)| modification.map(|m| (m, value)))
            .collect()
    }

    pub fn push(&mut self, modification: VotingStrengthModification) {
        self.modifications.push(modification);
    }

    #[must_use]
    pub fn with_appended(mut self, modification: VotingStrengthModification) -> Self {
        self.push(modification);
        self
    }

    /// Readable justifications, in application order.
    #[must_use]
    pub fn descriptions(&self) -> Vec<&str> {
        self.modifications
            .iter()
            .map(VotingStrengthModification::readable)
            .collect()
    }
}

/// A default trail for everyone plus explicit trails for the persons that
/// were mentioned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VotingStrengthTrailForPersons {
    default: VotingStrength,
    overrides: BTreeMap<Person, VotingStrengthTrail>,
}

impl VotingStrengthTrailForPersons {
    #[must_use]
    pub const fn new(
        default: VotingStrength,
        overrides: BTreeMap<Person, VotingStrengthTrail>,
    ) -> Self {
        Self { default, overrides }
    }

    #[must_use]
    pub const fn default_strength(&self) -> &VotingStrength {
        &self.default
    }

    pub fn overridden_persons(&self) -> impl Iterator<Item = &Person> {
        self.overrides.keys()
    }

    #[must_use]
    pub fn trail_for(&self, person: &Person) -> Cow<'_, VotingStrengthTrail> {
        match self.overrides.get(person) {
            Some(trail) => Cow::Borrowed(trail),
            None => Cow::Owned(VotingStrengthTrail::new(self.default.clone())),
        }
    }

    #[must_use]
    pub fn final_strength_for(&self, person: &Person) -> VotingStrength {
        self.trail_for(person).final_strength()
    }

    #[must_use]
    pub const fn overrides(&self) -> &BTreeMap<Person, VotingStrengthTrail> {
        &self.overrides
    }
}
