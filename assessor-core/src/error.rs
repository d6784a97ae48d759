//! Error taxonomy for compiling and resolving assessments.
//!
//! Configuration errors abort an assessment before anything is resolved; lookup
//! errors mean a caller asked for data the snapshot does not contain. Every
//! variant names the offending key so the message alone identifies the input
//! that needs fixing.

use thiserror::Error;

use crate::person::Person;
use crate::proposal::ProposalNumber;
use crate::strength::StrengthScope;

/// Invalid or inconsistent assessment configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} specified twice")]
    DuplicateField { field: &'static str },
    #[error("must specify {field}")]
    MissingField { field: &'static str },
    #[error("voting strength specified twice for {person} in {scope}")]
    DuplicateStrength { person: Person, scope: StrengthScope },
    #[error("voting strength overrides specified twice for proposal {0}")]
    DuplicateProposalStrengths(ProposalNumber),
    #[error("voting strength overrides specified for unknown proposal {0}")]
    StrengthsForUnknownProposal(ProposalNumber),
    #[error("votes specified for unknown proposal {0}")]
    VotesForUnknownProposal(ProposalNumber),
    #[error("voting strengths cover proposals [{strengths}] but the assessment has [{proposals}]")]
    StrengthKeyMismatch { strengths: String, proposals: String },
    #[error("{person} voted twice on proposal {proposal}")]
    DuplicateVote {
        person: Person,
        proposal: ProposalNumber,
    },
    #[error(
        "ballot of {person} on proposal {proposal} must give exactly one of vote, follow, inextricable or abstain"
    )]
    InvalidBallot {
        person: Person,
        proposal: ProposalNumber,
    },
    #[error("proposal {0} specified twice with differing data")]
    ProposalMismatch(ProposalNumber),
    #[error("{person} listed twice in {context}")]
    DuplicatePerson { person: Person, context: String },
    #[error("proposal {0} gives a chamber but no class")]
    ChamberWithoutClass(ProposalNumber),
    #[error("proposal {0} gives a chamber but only ordinary proposals have one")]
    ChamberOnNonOrdinary(ProposalNumber),
    #[error("proposal {0} gives sponsorship but no class")]
    SponsoredWithoutClass(ProposalNumber),
    #[error("office {0} specified twice")]
    DuplicateOffice(String),
    #[error("default voting strength {default} lies outside the bounds [{min}, {max}]")]
    DefaultOutOfBounds {
        default: String,
        min: String,
        max: String,
    },
    #[error("minimum voting strength {min} exceeds maximum {max}")]
    InvertedBounds { min: String, max: String },
}

/// A request for data that the compiled snapshot does not hold.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("{person} is not a voter on proposal {proposal}")]
    NotAVoter {
        person: Person,
        proposal: ProposalNumber,
    },
    #[error("no votes recorded for {0}")]
    NoVotesForPerson(Person),
    #[error("{person} has no vote for proposal {proposal}")]
    NoVoteForProposal {
        person: Person,
        proposal: ProposalNumber,
    },
    #[error("no proposal {0} in this assessment")]
    UnknownProposal(ProposalNumber),
    #[error("no voting strengths for proposal {0}")]
    NoStrengths(ProposalNumber),
    #[error("no resolution for proposal {0}")]
    NoResolution(ProposalNumber),
    #[error("no reward for proposal {0}")]
    NoReward(ProposalNumber),
}

/// Malformed numeric input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NumberError {
    #[error("invalid decimal literal {0:?}")]
    InvalidDecimal(String),
    #[error("voting strength {0} is negative")]
    NegativeStrength(String),
    #[error("adoption index {0} must be positive")]
    NonPositiveAi(String),
}

/// Failure while turning a definition file into assessment data.
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("malformed assessment definition: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Number(#[from] NumberError),
}

/// Failure while rendering a report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error("could not serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Problems assembling or querying the assessment catalog.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("assessment {0} defined twice")]
    DuplicateAssessment(String),
    #[error("assessment name {0:?} must be a single file name component")]
    InvalidName(String),
    #[error("no assessment named {name}; known assessments: {known}")]
    UnknownAssessment { name: String, known: String },
}
