//! Declared votes and their reduction to a final choice.

pub mod machine;
pub mod map;
pub mod pending;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use machine::{ResolvingVote, VoteResolution, VoteStepDescription};
pub use map::{
    MultiPersonPendingVoteMap, MultiProposalVoteMap, SimplifiedSingleProposalVoteMap,
    SinglePersonPendingVoteMap, SingleProposalVoteMap,
};
pub use pending::{PendingAction, PendingVote, VotingBuilder, resolve_votes};

/// The three ballots a voter can end up with. Declaration order is the
/// rendering order of report sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoteKind {
    For,
    Against,
    Present,
}

impl VoteKind {
    pub const ALL: [Self; 3] = [Self::For, Self::Against, Self::Present];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::For => "FOR",
            Self::Against => "AGAINST",
            Self::Present => "PRESENT",
        }
    }
}

impl fmt::Display for VoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A vote reduced to its final kind plus a synthesized comment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimpleVote {
    pub kind: VoteKind,
    pub comment: Option<String>,
}

impl SimpleVote {
    #[must_use]
    pub const fn new(kind: VoteKind, comment: Option<String>) -> Self {
        Self { kind, comment }
    }
}

/// A vote as declared, before resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Vote {
    Simple(SimpleVote),
    /// Cannot be classified; always counts as PRESENT.
    Inextricable { comment: Option<String> },
    /// An annotation around another vote.
    Commented { comment: String, inner: Box<Vote> },
}

impl Vote {
    #[must_use]
    pub const fn simple(kind: VoteKind) -> Self {
        Self::Simple(SimpleVote::new(kind, None))
    }

    #[must_use]
    pub fn commented(self, comment: impl Into<String>) -> Self {
        Self::Commented {
            comment: comment.into(),
            inner: Box::new(self),
        }
    }

    /// The outermost comment, if any.
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        match self {
            Self::Simple(simple) => simple.comment.as_deref(),
            Self::Inextricable { comment } => comment.as_deref(),
            Self::Commented { comment, .. } => Some(comment),
        }
    }

    /// Replace the outermost comment.
    #[must_use]
    pub fn with_comment(self, new_comment: Option<String>) -> Self {
        match (self, new_comment) {
            (Self::Simple(simple), comment) => Self::Simple(SimpleVote::new(simple.kind, comment)),
            (Self::Inextricable { .. }, comment) => Self::Inextricable { comment },
            (Self::Commented { inner, .. }, Some(comment)) => Self::Commented { comment, inner },
            (Self::Commented { inner, .. }, None) => *inner,
        }
    }

    /// Direct projection to the final kind and comment.
    ///
    /// Inextricable votes become PRESENT with the comment `Inextricable` or
    /// `Inextricable: <comment>`. Comment wrappers are appended after the
    /// inner vote's comment, separated by `": "`.
    #[must_use]
    pub fn simplified(&self) -> SimpleVote {
        match self {
            Self::Simple(simple) => simple.clone(),
            Self::Inextricable { comment } => SimpleVote::new(
                VoteKind::Present,
                Some(match comment {
                    Some(comment) => format!("Inextricable: {comment}"),
                    None => "Inextricable".to_string(),
                }),
            ),
            Self::Commented { comment, inner } => {
                let SimpleVote {
                    kind,
                    comment: inner_comment,
                } = inner.simplified();
                let merged = match inner_comment {
                    Some(inner_comment) => format!("{inner_comment}: {comment}"),
                    None => comment.clone(),
                };
                SimpleVote::new(kind, Some(merged))
            }
        }
    }
}
