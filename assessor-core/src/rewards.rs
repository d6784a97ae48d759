//! Coin rewards for the authors of adopted proposals.

use log::debug;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, Zero};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::LookupError;
use crate::numbers::{ProposalAi, format_decimal};
use crate::person::Person;
use crate::proposal::{Proposal, ProposalNumber, VersionedData};
use crate::resolve::ProposalResolutionMap;

/// Exact reward before rounding.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProposalUnroundedReward(BigRational);

impl ProposalUnroundedReward {
    #[must_use]
    pub const fn new(raw: BigRational) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(&self) -> &BigRational {
        &self.0
    }

    /// Ceiling of a positive reward; zero otherwise.
    #[must_use]
    pub fn rounded(&self) -> ProposalRoundedReward {
        if self.0.is_positive() {
            ProposalRoundedReward(self.0.ceil().to_integer())
        } else {
            ProposalRoundedReward(BigInt::zero())
        }
    }
}

impl fmt::Display for ProposalUnroundedReward {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_decimal(&self.0, 0))
    }
}

/// Whole-coin reward actually granted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProposalRoundedReward(BigInt);

impl ProposalRoundedReward {
    #[must_use]
    pub const fn raw(&self) -> &BigInt {
        &self.0
    }
}

impl fmt::Display for ProposalRoundedReward {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalRewardData {
    pub author: Person,
    pub vote_count_for: u64,
    pub vote_count_against: u64,
    pub ai: ProposalAi,
}

impl ProposalRewardData {
    #[must_use]
    pub fn unrounded_reward(&self) -> ProposalUnroundedReward {
        let difference = BigInt::from(self.vote_count_for) - BigInt::from(self.vote_count_against);
        ProposalUnroundedReward(BigRational::from_integer(difference))
    }

    #[must_use]
    pub fn rounded_reward(&self) -> ProposalRoundedReward {
        self.unrounded_reward().rounded()
    }
}

/// Rewards keyed by proposal number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProposalRewardsMap(BTreeMap<ProposalNumber, ProposalRewardData>);

impl ProposalRewardsMap {
    #[must_use]
    pub const fn new(data: BTreeMap<ProposalNumber, ProposalRewardData>) -> Self {
        Self(data)
    }

    pub fn proposals(&self) -> impl Iterator<Item = ProposalNumber> + '_ {
        self.0.keys().copied()
    }

    /// # Errors
    ///
    /// Returns [`LookupError::NoReward`] if `proposal` earned nothing.
    pub fn get(&self, proposal: ProposalNumber) -> Result<&ProposalRewardData, LookupError> {
        self.0.get(&proposal).ok_or(LookupError::NoReward(proposal))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// V0 and V1 proposals always earn a reward; V2 only when sponsored.
#[must_use]
pub fn is_rewardable(proposal: &Proposal) -> bool {
    match &proposal.versioned {
        VersionedData::V0 | VersionedData::V1 { .. } => true,
        VersionedData::V2 { sponsored, .. } => *sponsored,
    }
}

/// Rewards for every adopted, rewardable proposal.
///
/// # Errors
///
/// Propagates a missing resolution for an adopted proposal.
pub fn calculate_rewards(resolutions: &ProposalResolutionMap) -> Result<ProposalRewardsMap, LookupError> {
    let mut rewards = BTreeMap::new();
    for proposal in &resolutions.adopted_proposals() {
        if !is_rewardable(proposal) {
            debug!("proposal {} is not rewardable", proposal.number);
            continue;
        }
        let votes = &resolutions.resolution_of(proposal.number)?.votes;
        rewards.insert(
            proposal.number,
            ProposalRewardData {
                author: proposal.author.clone(),
                vote_count_for: count(votes.voters_for().len()),
                vote_count_against: count(votes.voters_against().len()),
                ai: proposal.ai.clone(),
            },
        );
    }
    Ok(ProposalRewardsMap(rewards))
}

fn count(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}

/// One reward line for `proposal`.
#[must_use]
pub fn render_reward(proposal: ProposalNumber, data: &ProposalRewardData) -> String {
    render_line(
        proposal,
        &data.author,
        data.vote_count_for,
        data.vote_count_against,
        &data.unrounded_reward(),
    )
}

fn render_line(
    proposal: ProposalNumber,
    author: &Person,
    vote_count_for: u64,
    vote_count_against: u64,
    unrounded: &ProposalUnroundedReward,
) -> String {
    let rounded = unrounded.rounded();
    let amount = if unrounded.raw() == &BigRational::from_integer(rounded.raw().clone()) {
        rounded.to_string()
    } else {
        format!("{unrounded} -> {rounded}")
    };
    format!(
        "For the adoption of Proposal {proposal}, I grant {author} {vote_count_for}-{vote_count_against}={amount} coins."
    )
}

/// All reward lines, in proposal order, joined by newlines.
#[must_use]
pub fn render_rewards(rewards: &ProposalRewardsMap) -> String {
    rewards
        .0
        .iter()
        .map(|(number, data)| render_reward(*number, data))
        .collect::<Vec<_>>()
        .join("\n")
}
