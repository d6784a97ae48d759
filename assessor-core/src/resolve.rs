//! Proposal resolution: quorum, strength sums and the adoption-index rule.

use log::{debug, warn};
use num_rational::BigRational;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::assessment::{AssessmentData, AssessmentMetadata, AssessmentQuorum, ProposalQuorum};
use crate::error::LookupError;
use crate::numbers::{ProposalAi, VotingStrength};
use crate::proposal::{ProposalNumber, ProposalSet};
use crate::strength::VotingStrengthMap;
use crate::vote::{SimplifiedSingleProposalVoteMap, SingleProposalVoteMap, VoteKind, resolve_votes};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProposalResult {
    FailedQuorum,
    Rejected,
    Adopted,
}

impl ProposalResult {
    #[must_use]
    pub const fn readable_name(self) -> &'static str {
        match self {
            Self::FailedQuorum => "FAILED QUORUM",
            Self::Rejected => "REJECTED",
            Self::Adopted => "ADOPTED",
        }
    }
}

impl fmt::Display for ProposalResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.readable_name())
    }
}

/// Summed strength of the FOR and AGAINST voters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AIStrengths {
    pub strength_for: VotingStrength,
    pub strength_against: VotingStrength,
}

impl AIStrengths {
    fn sum(votes: &SimplifiedSingleProposalVoteMap, strengths: &VotingStrengthMap) -> Self {
        let total = |kind| -> VotingStrength {
            votes
                .persons_with_vote(kind)
                .iter()
                .map(|person| strengths.get(person))
                .sum()
        };
        Self {
            strength_for: total(VoteKind::For),
            strength_against: total(VoteKind::Against),
        }
    }

    /// Support must reach `ai` times the opposition and strictly exceed it.
    #[must_use]
    pub fn is_adopted(&self, ai: &ProposalAi) -> bool {
        let strength_for: &BigRational = self.strength_for.raw();
        strength_for >= &ai.threshold(&self.strength_against)
            && self.strength_for > self.strength_against
    }
}

/// The outcome of one proposal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionData {
    pub result: ProposalResult,
    pub strengths: AIStrengths,
    pub votes: SimplifiedSingleProposalVoteMap,
}

/// Resolve a single proposal from its raw votes.
#[must_use]
pub fn resolve_proposal(
    quorum: ProposalQuorum,
    strengths: &VotingStrengthMap,
    ai: &ProposalAi,
    raw_votes: &SingleProposalVoteMap,
) -> ResolutionData {
    let votes = raw_votes.simplified();
    let ai_strengths = AIStrengths::sum(&votes, strengths);

    let result = if !quorum.is_met_by(votes.vote_count()) {
        ProposalResult::FailedQuorum
    } else if ai_strengths.is_adopted(ai) {
        ProposalResult::Adopted
    } else {
        ProposalResult::Rejected
    };

    ResolutionData {
        result,
        strengths: ai_strengths,
        votes,
    }
}

/// Resolved outcomes for a whole assessment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalResolutionMap {
    metadata: AssessmentMetadata,
    proposals: ProposalSet,
    resolutions: BTreeMap<ProposalNumber, ResolutionData>,
    quorum: AssessmentQuorum,
    global_strengths: VotingStrengthMap,
    strengths: BTreeMap<ProposalNumber, VotingStrengthMap>,
}

impl ProposalResolutionMap {
    #[must_use]
    pub const fn metadata(&self) -> &AssessmentMetadata {
        &self.metadata
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    #[must_use]
    pub const fn proposals(&self) -> &ProposalSet {
        &self.proposals
    }

    #[must_use]
    pub const fn quorum(&self) -> AssessmentQuorum {
        self.quorum
    }

    #[must_use]
    pub const fn global_strengths(&self) -> &VotingStrengthMap {
        &self.global_strengths
    }

    /// # Errors
    ///
    /// Returns [`LookupError::NoResolution`] for a proposal outside the set.
    pub fn resolution_of(&self, proposal: ProposalNumber) -> Result<&ResolutionData, LookupError> {
        self.resolutions
            .get(&proposal)
            .ok_or(LookupError::NoResolution(proposal))
    }

    /// # Errors
    ///
    /// Returns [`LookupError::NoStrengths`] for a proposal outside the set.
    pub fn voting_strengths_for(
        &self,
        proposal: ProposalNumber,
    ) -> Result<&VotingStrengthMap, LookupError> {
        self.strengths
            .get(&proposal)
            .ok_or(LookupError::NoStrengths(proposal))
    }

    /// Proposals whose outcome is `result`, in number order.
    #[must_use]
    pub fn proposals_with_result(&self, result: ProposalResult) -> ProposalSet {
        self.proposals.filtered(|proposal| {
            self.resolutions
                .get(&proposal.number)
                .is_some_and(|resolution| resolution.result == result)
        })
    }

    #[must_use]
    pub fn adopted_proposals(&self) -> ProposalSet {
        self.proposals_with_result(ProposalResult::Adopted)
    }
}

/// Resolve every proposal of an assessment.
///
/// # Errors
///
/// Returns a [`LookupError`] if the snapshot lacks strengths or votes for one
/// of its proposals; a snapshot built by [`AssessmentData::new`] never does.
pub fn resolve(data: &AssessmentData) -> Result<ProposalResolutionMap, LookupError> {
    let votes = resolve_votes(data.votes(), data.proposals());
    let quorum = data.quorum().for_proposal();

    let mut resolutions = BTreeMap::new();
    for proposal in data.proposals() {
        let raw = votes.get(proposal.number)?;
        if raw.vote_count() == 0 {
            warn!("proposal {} has no ballots", proposal.number);
        }
        let resolution = resolve_proposal(
            quorum,
            data.voting_strengths_of(proposal.number)?,
            &proposal.ai,
            raw,
        );
        debug!(
            "proposal {}: {} ({}/{}, AI={})",
            proposal.number,
            resolution.result,
            resolution.strengths.strength_for,
            resolution.strengths.strength_against,
            proposal.ai
        );
        resolutions.insert(proposal.number, resolution);
    }

    Ok(ProposalResolutionMap {
        metadata: data.metadata().clone(),
        proposals: data.proposals().clone(),
        resolutions,
        quorum: data.quorum(),
        global_strengths: data.global_strengths().clone(),
        strengths: data.strengths().clone(),
    })
}
