//! Voting strengths: modifications, trails, layered maps and their builder.

pub mod builder;
pub mod map;
pub mod modification;
pub mod trail;

use std::fmt;

use crate::proposal::ProposalNumber;

pub use builder::{CompiledStrengths, ScopeBuilder, StrengthsBuilder};
pub use map::{StrengthLayer, VotingStrengthMap};
pub use modification::{ModificationDescription, ModificationKind, VotingStrengthModification};
pub use trail::{VotingStrengthTrail, VotingStrengthTrailForPersons};

/// Where a strength declaration applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StrengthScope {
    Global,
    Proposal(ProposalNumber),
}

impl fmt::Display for StrengthScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => f.write_str("global strengths"),
            Self::Proposal(number) => write!(f, "proposal {number}"),
        }
    }
}
