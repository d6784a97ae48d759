use log::{debug, trace};
use num_rational::BigRational;
use std::collections::{BTreeMap, BTreeSet};

use super::map::{StrengthLayer, VotingStrengthMap};
use super::modification::VotingStrengthModification;
use super::trail::VotingStrengthTrail;
use super::StrengthScope;
use crate::error::ConfigError;
use crate::ministries::MinistryBonuses;
use crate::numbers::{VotingStrength, VotingStrengthDifference};
use crate::person::Person;
use crate::proposal::{ProposalNumber, ProposalSet};
use crate::set_once::{SetOnce, SetOnceMap};

#[derive(Debug, Clone)]
struct StrengthOp {
    person: Person,
    modification: VotingStrengthModification,
}

/// Strength declarations for one scope, recorded in order.
#[derive(Debug, Clone)]
pub struct ScopeBuilder {
    scope: StrengthScope,
    ops: Vec<StrengthOp>,
    touched: BTreeSet<Person>,
}

impl ScopeBuilder {
    #[must_use]
    pub const fn new(scope: StrengthScope) -> Self {
        Self {
            scope,
            ops: Vec::new(),
            touched: BTreeSet::new(),
        }
    }

    #[must_use]
    pub const fn scope(&self) -> StrengthScope {
        self.scope
    }

    /// Set `person`'s strength directly.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateStrength`] if `person` was already
    /// given a strength or a change in this scope.
    pub fn set(
        &mut self,
        person: Person,
        value: VotingStrength,
        comment: Option<String>,
    ) -> Result<&mut Self, ConfigError> {
        if self.touched.contains(&person) {
            return Err(ConfigError::DuplicateStrength {
                person,
                scope: self.scope,
            });
        }
        self.record(person, VotingStrengthModification::set(value, comment));
        Ok(self)
    }

    /// Add `amount` to `person`'s current strength. The first change to a
    /// person in a proposal scope starts from their global strength.
    pub fn add(
        &mut self,
        person: Person,
        amount: VotingStrengthDifference,
        reason: Option<String>,
    ) -> &mut Self {
        self.record(person, VotingStrengthModification::add(amount, reason));
        self
    }

    /// Scale `person`'s current strength by `factor`.
    pub fn multiply(
        &mut self,
        person: Person,
        factor: BigRational,
        reason: Option<String>,
    ) -> &mut Self {
        self.record(person, VotingStrengthModification::multiply(factor, reason));
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    fn record(&mut self, person: Person, modification: VotingStrengthModification) {
        trace!("{}: {} {}", self.scope, person, modification.readable());
        self.touched.insert(person.clone());
        self.ops.push(StrengthOp {
            person,
            modification,
        });
    }

    fn compile<F>(&self, seed: F, bounds: &Bounds) -> BTreeMap<Person, VotingStrengthTrail>
    where
        F: Fn(&Person) -> VotingStrengthTrail,
    {
        let mut trails: BTreeMap<Person, VotingStrengthTrail> = BTreeMap::new();
        for op in &self.ops {
            trails
                .entry(op.person.clone())
                .or_insert_with(|| seed(&op.person))
                .push(op.modification.clone());
        }
        for trail in trails.values_mut() {
            bounds.enforce(trail);
        }
        trails
    }
}

#[derive(Debug, Clone, Default)]
struct Bounds {
    min: Option<VotingStrength>,
    max: Option<VotingStrength>,
}

impl Bounds {
    fn enforce(&self, trail: &mut VotingStrengthTrail) {
        if let Some(min) = &self.min
            && &trail.final_strength() < min
        {
            trail.push(VotingStrengthModification::floor(min.clone()));
        }
        if let Some(max) = &self.max
            && &trail.final_strength() > max
        {
            trail.push(VotingStrengthModification::cap(max.clone()));
        }
    }

    fn validate(&self, default: &VotingStrength) -> Result<(), ConfigError> {
        let show = |bound: &Option<VotingStrength>| {
            bound
                .as_ref()
                .map_or_else(|| "unbounded".to_string(), ToString::to_string)
        };
        if let (Some(min), Some(max)) = (&self.min, &self.max)
            && min > max
        {
            return Err(ConfigError::InvertedBounds {
                min: min.to_string(),
                max: max.to_string(),
            });
        }
        let below = self.min.as_ref().is_some_and(|min| default < min);
        let above = self.max.as_ref().is_some_and(|max| default > max);
        if below || above {
            return Err(ConfigError::DefaultOutOfBounds {
                default: default.to_string(),
                min: show(&self.min),
                max: show(&self.max),
            });
        }
        Ok(())
    }
}

/// Strengths after compilation: the global map and one map per proposal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledStrengths {
    pub global: VotingStrengthMap,
    pub per_proposal: BTreeMap<ProposalNumber, VotingStrengthMap>,
}

/// Collects the default, global and per-proposal strength declarations.
#[derive(Debug, Clone)]
pub struct StrengthsBuilder {
    default: SetOnce<VotingStrength>,
    min: SetOnce<VotingStrength>,
    max: SetOnce<VotingStrength>,
    global: ScopeBuilder,
    proposals: SetOnceMap<ProposalNumber, ScopeBuilder>,
    ministries: SetOnce<MinistryBonuses>,
}

impl Default for StrengthsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl StrengthsBuilder {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            default: SetOnce::new("default voting strength"),
            min: SetOnce::new("minimum voting strength"),
            max: SetOnce::new("maximum voting strength"),
            global: ScopeBuilder::new(StrengthScope::Global),
            proposals: SetOnceMap::new(),
            ministries: SetOnce::new("ministries"),
        }
    }

    /// # Errors
    ///
    /// Fails if the default was already set.
    pub fn default_strength(&mut self, value: VotingStrength) -> Result<&mut Self, ConfigError> {
        self.default.set(value)?;
        Ok(self)
    }

    /// # Errors
    ///
    /// Fails if the minimum was already set.
    pub fn min_strength(&mut self, value: VotingStrength) -> Result<&mut Self, ConfigError> {
        self.min.set(value)?;
        Ok(self)
    }

    /// # Errors
    ///
    /// Fails if the maximum was already set.
    pub fn max_strength(&mut self, value: VotingStrength) -> Result<&mut Self, ConfigError> {
        self.max.set(value)?;
        Ok(self)
    }

    /// Declarations that apply to every proposal.
    pub fn global(&mut self) -> &mut ScopeBuilder {
        &mut self.global
    }

    /// Declarations that apply to proposal `number` only.
    ///
    /// # Errors
    ///
    /// Fails if a block for `number` was already given, or with whatever
    /// error `block` returns.
    pub fn proposal<F>(&mut self, number: ProposalNumber, block: F) -> Result<&mut Self, ConfigError>
    where
        F: FnOnce(&mut ScopeBuilder) -> Result<(), ConfigError>,
    {
        if self.proposals.contains_key(&number) {
            return Err(ConfigError::DuplicateProposalStrengths(number));
        }
        let mut scope = ScopeBuilder::new(StrengthScope::Proposal(number));
        block(&mut scope)?;
        self.proposals
            .insert(number, scope, ConfigError::DuplicateProposalStrengths)?;
        Ok(self)
    }

    /// # Errors
    ///
    /// Fails if ministries were already configured.
    pub fn ministries(&mut self, bonuses: MinistryBonuses) -> Result<&mut Self, ConfigError> {
        self.ministries.set(bonuses)?;
        Ok(self)
    }

    /// Produce a strength map for every proposal in `proposals`.
    ///
    /// # Errors
    ///
    /// Fails when no default was given, the bounds are inconsistent, or an
    /// override block names a proposal that is not in `proposals`.
    pub fn compile(self, proposals: &ProposalSet) -> Result<CompiledStrengths, ConfigError> {
        let default = self.default.into_value()?;
        let bounds = Bounds {
            min: self.min.into_option(),
            max: self.max.into_option(),
        };
        bounds.validate(&default)?;

        if let Some(unknown) = self.proposals.keys().find(|n| !proposals.contains(**n)) {
            return Err(ConfigError::StrengthsForUnknownProposal(*unknown));
        }

        let global_trails = self
            .global
            .compile(|_| VotingStrengthTrail::new(default.clone()), &bounds);
        debug!(
            "global strengths: default {default}, {} overridden",
            global_trails.len()
        );
        let global = VotingStrengthMap::new(default)
            .with_layer(StrengthLayer::new(StrengthScope::Global, global_trails));

        let ministries = self.ministries.into_option();
        let mut blocks = self.proposals.into_map();
        let mut per_proposal = BTreeMap::new();

        for proposal in proposals {
            let mut scope = blocks
                .remove(&proposal.number)
                .unwrap_or_else(|| ScopeBuilder::new(StrengthScope::Proposal(proposal.number)));
            if let Some(ministries) = &ministries {
                ministries.apply(proposal, &mut scope);
            }

            let map = if scope.is_empty() {
                global.clone()
            } else {
                let trails = scope.compile(|person| global.trail_for(person).into_owned(), &bounds);
                debug!(
                    "proposal {}: {} strength override(s)",
                    proposal.number,
                    trails.len()
                );
                global
                    .clone()
                    .with_layer(StrengthLayer::new(scope.scope(), trails))
            };
            per_proposal.insert(proposal.number, map);
        }

        Ok(CompiledStrengths {
            global,
            per_proposal,
        })
    }
}
