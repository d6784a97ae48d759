//! The compiled assessment snapshot and the builder that produces it.
//!
//! Every top-level field is write-once. Cross-collection checks (votes and
//! strengths must refer to known proposals, strengths must cover exactly the
//! proposal set) run in [`AssessmentBuilder::compile`] and in
//! [`AssessmentData::new`].

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::error::{ConfigError, LookupError};
use crate::proposal::{Proposal, ProposalNumber, ProposalSet, join_numbers};
use crate::set_once::SetOnce;
use crate::strength::{StrengthsBuilder, VotingStrengthMap};
use crate::vote::{MultiPersonPendingVoteMap, VotingBuilder};

/// Minimum ballot count for every proposal in an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssessmentQuorum(pub u32);

impl AssessmentQuorum {
    #[must_use]
    pub const fn for_proposal(self) -> ProposalQuorum {
        ProposalQuorum(self.0)
    }
}

impl fmt::Display for AssessmentQuorum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Minimum ballot count for a single proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProposalQuorum(pub u32);

impl ProposalQuorum {
    #[must_use]
    pub fn is_met_by(self, ballots: usize) -> bool {
        u64::try_from(ballots).map_or(true, |ballots| ballots >= u64::from(self.0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentMetadata {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Everything needed to resolve an assessment. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentData {
    metadata: AssessmentMetadata,
    quorum: AssessmentQuorum,
    global_strengths: VotingStrengthMap,
    strengths: BTreeMap<ProposalNumber, VotingStrengthMap>,
    proposals: ProposalSet,
    votes: MultiPersonPendingVoteMap,
}

impl AssessmentData {
    /// # Errors
    ///
    /// Fails when the strength maps do not cover exactly the proposals in
    /// `proposals`, or when a vote names a proposal not in `proposals`.
    pub fn new(
        metadata: AssessmentMetadata,
        quorum: AssessmentQuorum,
        global_strengths: VotingStrengthMap,
        strengths: BTreeMap<ProposalNumber, VotingStrengthMap>,
        proposals: ProposalSet,
        votes: MultiPersonPendingVoteMap,
    ) -> Result<Self, ConfigError> {
        check_strength_keys(&strengths, &proposals)?;
        if let Some(unknown) = votes
            .proposals_with_votes()
            .into_iter()
            .find(|number| !proposals.contains(*number))
        {
            return Err(ConfigError::VotesForUnknownProposal(unknown));
        }
        Ok(Self {
            metadata,
            quorum,
            global_strengths,
            strengths,
            proposals,
            votes,
        })
    }

    #[must_use]
    pub const fn metadata(&self) -> &AssessmentMetadata {
        &self.metadata
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    #[must_use]
    pub const fn quorum(&self) -> AssessmentQuorum {
        self.quorum
    }

    #[must_use]
    pub const fn proposals(&self) -> &ProposalSet {
        &self.proposals
    }

    #[must_use]
    pub const fn votes(&self) -> &MultiPersonPendingVoteMap {
        &self.votes
    }

    #[must_use]
    pub const fn global_strengths(&self) -> &VotingStrengthMap {
        &self.global_strengths
    }

    #[must_use]
    pub const fn strengths(&self) -> &BTreeMap<ProposalNumber, VotingStrengthMap> {
        &self.strengths
    }

    /// # Errors
    ///
    /// Returns [`LookupError::NoStrengths`] for a proposal outside the set.
    pub fn voting_strengths_of(
        &self,
        proposal: ProposalNumber,
    ) -> Result<&VotingStrengthMap, LookupError> {
        self.strengths
            .get(&proposal)
            .ok_or(LookupError::NoStrengths(proposal))
    }
}

pub(crate) fn check_strength_keys(
    strengths: &BTreeMap<ProposalNumber, VotingStrengthMap>,
    proposals: &ProposalSet,
) -> Result<(), ConfigError> {
    let with_strengths: BTreeSet<ProposalNumber> = strengths.keys().copied().collect();
    let defined: BTreeSet<ProposalNumber> = proposals.numbers().collect();
    if with_strengths != defined {
        return Err(ConfigError::StrengthKeyMismatch {
            strengths: join_numbers(with_strengths),
            proposals: join_numbers(defined),
        });
    }
    Ok(())
}

/// Write-once builder for [`AssessmentData`].
#[derive(Debug, Clone)]
pub struct AssessmentBuilder {
    name: SetOnce<String>,
    url: SetOnce<String>,
    quorum: SetOnce<AssessmentQuorum>,
    strengths: SetOnce<StrengthsBuilder>,
    voting: SetOnce<VotingBuilder>,
    proposals: ProposalSet,
}

impl Default for AssessmentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AssessmentBuilder {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            name: SetOnce::new("name"),
            url: SetOnce::new("url"),
            quorum: SetOnce::new("quorum"),
            strengths: SetOnce::new("voting strengths"),
            voting: SetOnce::new("voting"),
            proposals: ProposalSet::new(),
        }
    }

    /// # Errors
    ///
    /// Fails if the name was already set.
    pub fn name(&mut self, name: impl Into<String>) -> Result<&mut Self, ConfigError> {
        self.name.set(name.into())?;
        Ok(self)
    }

    /// # Errors
    ///
    /// Fails if the URL was already set.
    pub fn url(&mut self, url: impl Into<String>) -> Result<&mut Self, ConfigError> {
        self.url.set(url.into())?;
        Ok(self)
    }

    /// # Errors
    ///
    /// Fails if the quorum was already set.
    pub fn quorum(&mut self, quorum: u32) -> Result<&mut Self, ConfigError> {
        self.quorum.set(AssessmentQuorum(quorum))?;
        Ok(self)
    }

    /// Add proposals; may be called any number of times.
    ///
    /// # Errors
    ///
    /// Fails if a proposal number is reused for a different proposal.
    pub fn proposals<I>(&mut self, proposals: I) -> Result<&mut Self, ConfigError>
    where
        I: IntoIterator<Item = Proposal>,
    {
        for proposal in proposals {
            self.proposals.insert(proposal)?;
        }
        Ok(self)
    }

    /// # Errors
    ///
    /// Fails if strengths were already given, or with the error from `block`.
    pub fn strengths<F>(&mut self, block: F) -> Result<&mut Self, ConfigError>
    where
        F: FnOnce(&mut StrengthsBuilder) -> Result<(), ConfigError>,
    {
        if self.strengths.is_set() {
            return Err(ConfigError::DuplicateField {
                field: self.strengths.field(),
            });
        }
        let mut strengths = StrengthsBuilder::new();
        block(&mut strengths)?;
        self.strengths.set(strengths)?;
        Ok(self)
    }

    /// # Errors
    ///
    /// Fails if votes were already given, or with the error from `block`.
    pub fn voting<F>(&mut self, block: F) -> Result<&mut Self, ConfigError>
    where
        F: FnOnce(&mut VotingBuilder) -> Result<(), ConfigError>,
    {
        if self.voting.is_set() {
            return Err(ConfigError::DuplicateField {
                field: self.voting.field(),
            });
        }
        let mut voting = VotingBuilder::new();
        block(&mut voting)?;
        self.voting.set(voting)?;
        Ok(self)
    }

    /// Freeze the assessment.
    ///
    /// # Errors
    ///
    /// Fails when name, quorum or strengths are missing, when the default
    /// strength is missing, or on any cross-reference mismatch.
    pub fn compile(self) -> Result<AssessmentData, ConfigError> {
        let name = self.name.into_value()?;
        let quorum = self.quorum.into_value()?;
        let compiled = self.strengths.into_value()?.compile(&self.proposals)?;
        let votes = self.voting.into_option().unwrap_or_default().compile();

        if self.proposals.is_empty() {
            warn!("assessment {name} has no proposals");
        }
        debug!(
            "compiled assessment {name}: {} proposal(s), quorum {quorum}",
            self.proposals.len()
        );

        AssessmentData::new(
            AssessmentMetadata {
                name,
                url: self.url.into_option(),
            },
            quorum,
            compiled.global,
            compiled.per_proposal,
            self.proposals,
            votes,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numbers::{ProposalAi, VotingStrength};
    use crate::person::{Person, Persons};
    use crate::proposal::VersionedData;
    use crate::vote::{PendingVote, Vote, VoteKind};

    fn proposal(number: u32) -> Proposal {
        Proposal {
            number: ProposalNumber(number),
            title: format!("P{number}"),
            ai: ProposalAi::parse("1.0").unwrap(),
            author: Person::new("Aris"),
            coauthors: Persons::new(),
            text: String::new(),
            versioned: VersionedData::V0,
        }
    }

    fn builder() -> AssessmentBuilder {
        let mut builder = AssessmentBuilder::new();
        builder
            .name("test")
            .unwrap()
            .quorum(1)
            .unwrap()
            .proposals([proposal(1), proposal(2)])
            .unwrap()
            .strengths(|s| {
                s.default_strength(VotingStrength::from_integer(3))?;
                Ok(())
            })
            .unwrap();
        builder
    }

    #[test]
    fn compiles_with_a_map_per_proposal() {
        let data = builder().compile().unwrap();
        assert_eq!(data.strengths().len(), 2);
        assert_eq!(data.name(), "test");
        assert!(data.voting_strengths_of(ProposalNumber(3)).is_err());
    }

    #[test]
    fn second_name_fails_immediately() {
        let mut builder = builder();
        assert_eq!(
            builder.name("again").unwrap_err(),
            ConfigError::DuplicateField { field: "name" }
        );
    }

    #[test]
    fn second_strengths_block_fails_immediately() {
        let mut builder = builder();
        let err = builder.strengths(|_| Ok(())).unwrap_err();
        assert_eq!(
            err,
            ConfigError::DuplicateField {
                field: "voting strengths"
            }
        );
    }

    #[test]
    fn missing_quorum_is_reported() {
        let mut builder = AssessmentBuilder::new();
        builder.name("x").unwrap();
        assert_eq!(
            builder.compile().unwrap_err(),
            ConfigError::MissingField { field: "quorum" }
        );
    }

    #[test]
    fn votes_for_unknown_proposal_are_rejected() {
        let mut builder = builder();
        builder
            .voting(|v| {
                v.vote(
                    Person::new("Aris"),
                    ProposalNumber(9999),
                    PendingVote::cast(Vote::simple(VoteKind::For)),
                )?;
                Ok(())
            })
            .unwrap();
        assert_eq!(
            builder.compile().unwrap_err(),
            ConfigError::VotesForUnknownProposal(ProposalNumber(9999))
        );
    }

    #[test]
    fn strength_keys_must_match_proposals() {
        let mut proposals = ProposalSet::new();
        proposals.insert(proposal(1)).unwrap();
        let map = VotingStrengthMap::new(VotingStrength::from_integer(1));
        let err = AssessmentData::new(
            AssessmentMetadata {
                name: "x".to_string(),
                url: None,
            },
            AssessmentQuorum(1),
            map.clone(),
            BTreeMap::from([(ProposalNumber(2), map)]),
            proposals,
            MultiPersonPendingVoteMap::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::StrengthKeyMismatch {
                strengths: "2".to_string(),
                proposals: "1".to_string(),
            }
        );
    }

    #[test]
    fn quorum_counts_ballots() {
        assert!(!ProposalQuorum(3).is_met_by(2));
        assert!(ProposalQuorum(3).is_met_by(3));
        assert!(ProposalQuorum(0).is_met_by(0));
    }
}
