//! Ministry bonuses: office holders gain strength on ordinary proposals in
//! the chambers their office oversees.

use log::trace;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::ConfigError;
use crate::numbers::VotingStrengthDifference;
use crate::person::Person;
use crate::proposal::{Chamber, ClassAndChamber, Proposal};
use crate::strength::ScopeBuilder;

/// An office, its current holder and the chambers it oversees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinistryOffice {
    pub name: String,
    #[serde(default)]
    pub holder: Option<Person>,
    #[serde(default)]
    pub ministries: Vec<Chamber>,
}

/// A per-ministry bonus and the offices it is paid to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinistryBonuses {
    bonus: VotingStrengthDifference,
    offices: Vec<MinistryOffice>,
    names: BTreeSet<String>,
}

impl MinistryBonuses {
    #[must_use]
    pub const fn new(bonus: VotingStrengthDifference) -> Self {
        Self {
            bonus,
            offices: Vec::new(),
            names: BTreeSet::new(),
        }
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateOffice`] if an office of the same name
    /// was already added.
    pub fn office(&mut self, office: MinistryOffice) -> Result<&mut Self, ConfigError> {
        if !self.names.insert(office.name.clone()) {
            return Err(ConfigError::DuplicateOffice(office.name));
        }
        self.offices.push(office);
        Ok(self)
    }

    #[must_use]
    pub const fn bonus(&self) -> &VotingStrengthDifference {
        &self.bonus
    }

    #[must_use]
    pub fn offices(&self) -> &[MinistryOffice] {
        &self.offices
    }

    /// Add one bonus per matching ministry of every held office. Only
    /// ordinary proposals with a chamber earn bonuses.
    pub fn apply(&self, proposal: &Proposal, scope: &mut ScopeBuilder) {
        let Some(ClassAndChamber::Ordinary {
            chamber: Some(chamber),
        }) = proposal.versioned.class_and_chamber()
        else {
            return;
        };

        for office in &self.offices {
            let Some(holder) = &office.holder else {
                continue;
            };
            for ministry in office.ministries.iter().filter(|m| *m == chamber) {
                trace!(
                    "proposal {}: {} holds {} ({ministry})",
                    proposal.number, holder, office.name
                );
                scope.add(
                    holder.clone(),
                    self.bonus.clone(),
                    Some(format!("{} ({ministry} ministry)", office.name)),
                );
            }
        }
    }
}
