//! Step-by-step vote resolution with an audit trail.
//!
//! A declared vote is lowered into a chain of [`ResolvingVote`] states. Each
//! step either moves to the next state or terminates, and non-terminal
//! states describe themselves so the path taken can be reported. Chains are
//! built from the finite vote tree, so resolution always terminates.

use smallvec::SmallVec;
use std::collections::BTreeMap;

use super::{Vote, VoteKind};

/// Machine and human readable account of one resolution step.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VoteStepDescription {
    pub readable: String,
    pub kind: &'static str,
    pub parameters: BTreeMap<&'static str, String>,
}

/// One state of the resolution machine.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResolvingVote {
    Resolved(VoteKind),
    Commented {
        comment: String,
        next: Box<ResolvingVote>,
    },
    Inextricable,
    /// Terminal: no ballot cast.
    Abstained,
}

enum Step<'a> {
    Continue(&'a ResolvingVote),
    Done(Option<VoteKind>),
}

static PRESENT: ResolvingVote = ResolvingVote::Resolved(VoteKind::Present);

/// Outcome of running the machine to completion.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VoteResolution {
    pub descriptions: SmallVec<[VoteStepDescription; 2]>,
    /// `None` when the voter abstained.
    pub kind: Option<VoteKind>,
}

impl ResolvingVote {
    fn step(&self) -> Step<'_> {
        match self {
            Self::Resolved(kind) => Step::Done(Some(*kind)),
            Self::Abstained => Step::Done(None),
            Self::Commented { next, .. } => Step::Continue(next),
            Self::Inextricable => Step::Continue(&PRESENT),
        }
    }

    /// Description of this state; terminal states have none.
    #[must_use]
    pub fn description(&self) -> Option<VoteStepDescription> {
        match self {
            Self::Resolved(_) | Self::Abstained => None,
            Self::Commented { comment, .. } => Some(VoteStepDescription {
                readable: comment.clone(),
                kind: "commented",
                parameters: BTreeMap::from([("comment", comment.clone())]),
            }),
            Self::Inextricable => Some(VoteStepDescription {
                readable: "Inextricable".to_string(),
                kind: "inextricable",
                parameters: BTreeMap::new(),
            }),
        }
    }

    /// Step until a terminal state, collecting descriptions in visiting order.
    #[must_use]
    pub fn resolve(&self) -> VoteResolution {
        let mut descriptions = SmallVec::new();
        let mut current = self;
        loop {
            descriptions.extend(current.description());
            match current.step() {
                Step::Continue(next) => current = next,
                Step::Done(kind) => return VoteResolution { descriptions, kind },
            }
        }
    }
}

impl From<&Vote> for ResolvingVote {
    fn from(vote: &Vote) -> Self {
        let wrap = |comment: &Option<String>, inner: Self| match comment {
            Some(comment) => Self::Commented {
                comment: comment.clone(),
                next: Box::new(inner),
            },
            None => inner,
        };
        match vote {
            Vote::Simple(simple) => wrap(&simple.comment, Self::Resolved(simple.kind)),
            Vote::Inextricable { comment } => wrap(comment, Self::Inextricable),
            Vote::Commented { comment, inner } => Self::Commented {
                comment: comment.clone(),
                next: Box::new(Self::from(inner.as_ref())),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vote::SimpleVote;

    fn sample_votes() -> Vec<Vote> {
        let mut votes = Vec::new();
        for kind in VoteKind::ALL {
            votes.push(Vote::simple(kind));
            votes.push(Vote::Simple(SimpleVote::new(kind, Some("c".to_string()))));
            votes.push(Vote::simple(kind).commented("outer"));
        }
        votes.push(Vote::Inextricable { comment: None });
        votes.push(Vote::Inextricable {
            comment: Some("late".to_string()),
        });
        votes.push(Vote::Inextricable { comment: None }.commented("a").commented("b"));
        votes
    }

    #[test]
    fn machine_agrees_with_simplification() {
        for vote in sample_votes() {
            let resolution = ResolvingVote::from(&vote).resolve();
            assert_eq!(resolution.kind, Some(vote.simplified().kind), "{vote:?}");
        }
    }

    #[test]
    fn inextricable_trail_records_comment_then_marker() {
        let vote = Vote::Inextricable {
            comment: Some("late".to_string()),
        };
        let resolution = ResolvingVote::from(&vote).resolve();
        let readable: Vec<&str> = resolution
            .descriptions
            .iter()
            .map(|d| d.readable.as_str())
            .collect();
        assert_eq!(readable, ["late", "Inextricable"]);
        assert_eq!(resolution.descriptions[1].kind, "inextricable");
    }

    #[test]
    fn terminal_states_have_no_description() {
        let resolved = ResolvingVote::Resolved(VoteKind::For).resolve();
        assert!(resolved.descriptions.is_empty());
        assert_eq!(resolved.kind, Some(VoteKind::For));

        let abstained = ResolvingVote::Abstained.resolve();
        assert!(abstained.descriptions.is_empty());
        assert_eq!(abstained.kind, None);
    }
}
