use smallvec::SmallVec;
use std::collections::{BTreeMap, BTreeSet};

use super::machine::{ResolvingVote, VoteStepDescription};
use super::pending::PendingVote;
use super::{SimpleVote, Vote, VoteKind};
use crate::error::LookupError;
use crate::person::{Person, Persons};
use crate::proposal::ProposalNumber;

/// Resolved votes on one proposal. Persons absent from the map did not vote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleProposalVoteMap {
    proposal: ProposalNumber,
    votes: BTreeMap<Person, Vote>,
}

impl SingleProposalVoteMap {
    #[must_use]
    pub const fn new(proposal: ProposalNumber, votes: BTreeMap<Person, Vote>) -> Self {
        Self { proposal, votes }
    }

    #[must_use]
    pub const fn proposal(&self) -> ProposalNumber {
        self.proposal
    }

    pub fn voters(&self) -> impl Iterator<Item = &Person> {
        self.votes.keys()
    }

    #[must_use]
    pub fn vote_count(&self) -> usize {
        self.votes.len()
    }

    /// # Errors
    ///
    /// Returns [`LookupError::NotAVoter`] if `person` did not vote.
    pub fn get(&self, person: &Person) -> Result<&Vote, LookupError> {
        self.votes.get(person).ok_or_else(|| LookupError::NotAVoter {
            person: person.clone(),
            proposal: self.proposal,
        })
    }

    /// Project every vote to its final kind, keeping the step trail of each.
    #[must_use]
    pub fn simplified(&self) -> SimplifiedSingleProposalVoteMap {
        let mut votes = BTreeMap::new();
        let mut trails = BTreeMap::new();
        for (person, vote) in &self.votes {
            votes.insert(person.clone(), vote.simplified());
            trails.insert(person.clone(), ResolvingVote::from(vote).resolve().descriptions);
        }
        SimplifiedSingleProposalVoteMap {
            proposal: self.proposal,
            votes,
            trails,
        }
    }
}

/// Final kinds and comments for one proposal, with each voter's step trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimplifiedSingleProposalVoteMap {
    proposal: ProposalNumber,
    votes: BTreeMap<Person, SimpleVote>,
    trails: BTreeMap<Person, SmallVec<[VoteStepDescription; 2]>>,
}

impl SimplifiedSingleProposalVoteMap {
    #[must_use]
    pub fn voters(&self) -> Persons {
        self.votes.keys().cloned().collect()
    }

    #[must_use]
    pub fn vote_count(&self) -> usize {
        self.votes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }

    /// # Errors
    ///
    /// Returns [`LookupError::NotAVoter`] if `person` did not vote.
    pub fn get(&self, person: &Person) -> Result<&SimpleVote, LookupError> {
        self.votes.get(person).ok_or_else(|| LookupError::NotAVoter {
            person: person.clone(),
            proposal: self.proposal,
        })
    }

    /// Step descriptions recorded while resolving `person`'s vote.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::NotAVoter`] if `person` did not vote.
    pub fn descriptions_for(&self, person: &Person) -> Result<&[VoteStepDescription], LookupError> {
        self.trails
            .get(person)
            .map(|trail| trail.as_slice())
            .ok_or_else(|| LookupError::NotAVoter {
                person: person.clone(),
                proposal: self.proposal,
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Person, &SimpleVote)> {
        self.votes.iter()
    }

    #[must_use]
    pub fn persons_with_vote(&self, kind: VoteKind) -> Persons {
        self.votes
            .iter()
            .filter(|(_, vote)| vote.kind == kind)
            .map(|(person, _)| person.clone())
            .collect()
    }

    #[must_use]
    pub fn voters_for(&self) -> Persons {
        self.persons_with_vote(VoteKind::For)
    }

    #[must_use]
    pub fn voters_against(&self) -> Persons {
        self.persons_with_vote(VoteKind::Against)
    }

    /// Voters whose simplified vote carries a comment, by name.
    pub fn votes_with_comments(&self) -> impl Iterator<Item = (&Person, &str)> {
        self.votes
            .iter()
            .filter_map(|(person, vote)| vote.comment.as_deref().map(|comment| (person, comment)))
    }
}

/// One person's pending declarations keyed by proposal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinglePersonPendingVoteMap {
    person: Person,
    votes: BTreeMap<ProposalNumber, PendingVote>,
}

impl SinglePersonPendingVoteMap {
    #[must_use]
    pub const fn new(person: Person, votes: BTreeMap<ProposalNumber, PendingVote>) -> Self {
        Self { person, votes }
    }

    pub fn proposals(&self) -> impl Iterator<Item = ProposalNumber> + '_ {
        self.votes.keys().copied()
    }

    /// # Errors
    ///
    /// Returns [`LookupError::NoVoteForProposal`] if nothing was declared.
    pub fn vote_for(&self, proposal: ProposalNumber) -> Result<&PendingVote, LookupError> {
        self.votes
            .get(&proposal)
            .ok_or_else(|| LookupError::NoVoteForProposal {
                person: self.person.clone(),
                proposal,
            })
    }
}

/// Every voter's pending declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiPersonPendingVoteMap(BTreeMap<Person, SinglePersonPendingVoteMap>);

impl MultiPersonPendingVoteMap {
    #[must_use]
    pub const fn new(map: BTreeMap<Person, SinglePersonPendingVoteMap>) -> Self {
        Self(map)
    }

    pub fn voters(&self) -> impl Iterator<Item = &Person> {
        self.0.keys()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn proposals_with_votes(&self) -> BTreeSet<ProposalNumber> {
        self.0.values().flat_map(SinglePersonPendingVoteMap::proposals).collect()
    }

    /// # Errors
    ///
    /// Returns [`LookupError::NoVotesForPerson`] if `person` declared nothing.
    pub fn votes_for(&self, person: &Person) -> Result<&SinglePersonPendingVoteMap, LookupError> {
        self.0
            .get(person)
            .ok_or_else(|| LookupError::NoVotesForPerson(person.clone()))
    }
}

/// Resolved votes for every proposal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiProposalVoteMap(BTreeMap<ProposalNumber, SingleProposalVoteMap>);

impl MultiProposalVoteMap {
    #[must_use]
    pub const fn new(map: BTreeMap<ProposalNumber, SingleProposalVoteMap>) -> Self {
        Self(map)
    }

    pub fn proposals(&self) -> impl Iterator<Item = ProposalNumber> + '_ {
        self.0.keys().copied()
    }

    /// # Errors
    ///
    /// Returns [`LookupError::UnknownProposal`] if `proposal` has no entry.
    pub fn get(&self, proposal: ProposalNumber) -> Result<&SingleProposalVoteMap, LookupError> {
        self.0
            .get(&proposal)
            .ok_or(LookupError::UnknownProposal(proposal))
    }
}
