//! Vote declarations as written, and their resolution into votes.
//!
//! A declaration may cast a vote, follow another voter, or abstain. Follow
//! chains are resolved per proposal; a chain that loops back on itself makes
//! every voter on the loop inextricable.

use log::{debug, trace};
use std::collections::{BTreeMap, BTreeSet};

use super::map::{
    MultiPersonPendingVoteMap, MultiProposalVoteMap, SinglePersonPendingVoteMap,
    SingleProposalVoteMap,
};
use super::Vote;
use crate::error::ConfigError;
use crate::person::Person;
use crate::proposal::{ProposalNumber, ProposalSet};
use crate::set_once::SetOnceMap;

/// What the declaration does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    Cast(Vote),
    /// Take the leader's final vote on the same proposal.
    Follow(Person),
    Abstain,
}

/// A vote declaration plus an optional comment attached when declaring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingVote {
    pub action: PendingAction,
    pub comment: Option<String>,
}

impl PendingVote {
    #[must_use]
    pub const fn cast(vote: Vote) -> Self {
        Self {
            action: PendingAction::Cast(vote),
            comment: None,
        }
    }

    #[must_use]
    pub const fn follow(leader: Person) -> Self {
        Self {
            action: PendingAction::Follow(leader),
            comment: None,
        }
    }

    #[must_use]
    pub const fn abstain() -> Self {
        Self {
            action: PendingAction::Abstain,
            comment: None,
        }
    }

    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Attach the declaration comment after the vote's own comment.
    fn annotate(&self, vote: Vote) -> Vote {
        let Some(extra) = &self.comment else {
            return vote;
        };
        let merged = match vote.comment() {
            Some(existing) => format!("{existing}: {extra}"),
            None => extra.clone(),
        };
        vote.with_comment(Some(merged))
    }
}

struct FollowResolver<'a> {
    pending: &'a MultiPersonPendingVoteMap,
    proposal: ProposalNumber,
}

impl FollowResolver<'_> {
    fn declaration(&self, person: &Person) -> Option<&PendingVote> {
        self.pending
            .votes_for(person)
            .ok()
            .and_then(|votes| votes.vote_for(self.proposal).ok())
    }

    /// `None` means `person` is not a voter on this proposal.
    fn resolve(&self, person: &Person, visiting: &mut BTreeSet<Person>) -> Option<Vote> {
        let declaration = self.declaration(person)?;
        let vote = match &declaration.action {
            PendingAction::Cast(vote) => vote.clone(),
            PendingAction::Abstain => return None,
            PendingAction::Follow(leader) => {
                if !visiting.insert(person.clone()) || visiting.contains(leader) {
                    debug!(
                        "proposal {}: follow cycle through {person} and {leader}",
                        self.proposal
                    );
                    Vote::Inextricable { comment: None }
                } else {
                    trace!("proposal {}: {person} follows {leader}", self.proposal);
                    let followed = self.resolve(leader, visiting);
                    visiting.remove(person);
                    followed?
                }
            }
        };
        Some(declaration.annotate(vote))
    }
}

/// Resolve every declaration against every proposal in `proposals`.
#[must_use]
pub fn resolve_votes(
    pending: &MultiPersonPendingVoteMap,
    proposals: &ProposalSet,
) -> MultiProposalVoteMap {
    let map = proposals
        .numbers()
        .map(|proposal| {
            let resolver = FollowResolver { pending, proposal };
            let votes = pending
                .voters()
                .filter_map(|person| {
                    resolver
                        .resolve(person, &mut BTreeSet::new())
                        .map(|vote| (person.clone(), vote))
                })
                .collect();
            (proposal, SingleProposalVoteMap::new(proposal, votes))
        })
        .collect();
    MultiProposalVoteMap::new(map)
}

/// Collects vote declarations, one per person and proposal.
#[derive(Debug, Clone, Default)]
pub struct VotingBuilder {
    votes: BTreeMap<Person, SetOnceMap<ProposalNumber, PendingVote>>,
}

impl VotingBuilder {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            votes: BTreeMap::new(),
        }
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateVote`] if `person` already declared a
    /// vote on `proposal`.
    pub fn vote(
        &mut self,
        person: Person,
        proposal: ProposalNumber,
        vote: PendingVote,
    ) -> Result<&mut Self, ConfigError> {
        let votes = self.votes.entry(person.clone()).or_default();
        votes.insert(proposal, vote, |proposal| ConfigError::DuplicateVote {
            person,
            proposal,
        })?;
        Ok(self)
    }

    #[must_use]
    pub fn compile(self) -> MultiPersonPendingVoteMap {
        MultiPersonPendingVoteMap::new(
            self.votes
                .into_iter()
                .map(|(person, votes)| {
                    let single = SinglePersonPendingVoteMap::new(person.clone(), votes.into_map());
                    (person, single)
                })
                .collect(),
        )
    }
}
