//! Assessor Engine
//!
//! Resolves proposal votes for a nomic-style deliberative body: compiles
//! proposals, voting strengths and vote declarations into an immutable
//! snapshot, decides each proposal by quorum and adoption index, and renders
//! text, JSON and reward reports. No I/O happens here; definitions arrive
//! through an [`AssessmentSource`].

pub mod assessment;
pub mod catalog;
pub mod definition;
pub mod error;
pub mod ministries;
pub mod numbers;
pub mod person;
pub mod proposal;
pub mod report;
pub mod resolve;
pub mod rewards;
pub mod set_once;
pub mod strength;
pub mod vote;

use anyhow::Context;
use log::debug;

// Re-export commonly used types
pub use assessment::{
    AssessmentBuilder, AssessmentData, AssessmentMetadata, AssessmentQuorum, ProposalQuorum,
};
pub use catalog::{AssessmentCatalog, Selection, is_plain_name};
pub use definition::{AssessmentDefinition, parse_assessment};
pub use error::{
    CatalogError, ConfigError, DefinitionError, LookupError, NumberError, ReportError,
};
pub use ministries::{MinistryBonuses, MinistryOffice};
pub use numbers::{ProposalAi, VotingStrength, VotingStrengthDifference};
pub use person::{Person, Persons};
pub use proposal::{Chamber, ClassAndChamber, Proposal, ProposalNumber, ProposalSet, VersionedData};
pub use report::{ReportConfig, ReportFormat, render, render_structured, render_text};
pub use resolve::{
    AIStrengths, ProposalResolutionMap, ProposalResult, ResolutionData, resolve, resolve_proposal,
};
pub use rewards::{
    ProposalRewardData, ProposalRewardsMap, ProposalRoundedReward, ProposalUnroundedReward,
    calculate_rewards, render_rewards,
};
pub use strength::{
    StrengthScope, StrengthsBuilder, VotingStrengthMap, VotingStrengthModification,
    VotingStrengthTrail, VotingStrengthTrailForPersons,
};
pub use vote::{PendingVote, SimpleVote, Vote, VoteKind, VotingBuilder};

/// Supplies raw assessment definitions by name, e.g. from a directory on disk.
pub trait AssessmentSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Names of every definition the source holds
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be listed.
    fn definition_names(&self) -> Result<Vec<String>, Self::Error>;

    /// Raw JSON of the named definition
    ///
    /// # Errors
    ///
    /// Returns an error if the definition cannot be read.
    fn load_definition(&self, name: &str) -> Result<String, Self::Error>;
}

/// Loads definitions from a source and turns them into reports
pub struct Assessor<S>
where
    S: AssessmentSource,
{
    source: S,
}

impl<S> Assessor<S>
where
    S: AssessmentSource,
{
    /// Create an assessor reading from `source`
    pub const fn new(source: S) -> Self {
        Self { source }
    }

    /// Parse every definition the source holds into a catalog
    ///
    /// # Errors
    ///
    /// Returns an error naming the definition that failed to load, parse or
    /// compile, or a duplicate assessment name.
    pub fn load_catalog(&self) -> Result<AssessmentCatalog, anyhow::Error> {
        let mut catalog = AssessmentCatalog::new();
        let names = self
            .source
            .definition_names()
            .context("listing assessment definitions")?;
        for name in names {
            let json = self
                .source
                .load_definition(&name)
                .with_context(|| format!("reading assessment definition {name}"))?;
            let data = parse_assessment(&json)
                .with_context(|| format!("compiling assessment definition {name}"))?;
            debug!("loaded assessment {} from {name}", data.name());
            catalog.add(data)?;
        }
        Ok(catalog)
    }

    /// Resolve `data` and render it in `format`
    ///
    /// # Errors
    ///
    /// Returns an error if resolution or rendering fails.
    pub fn assess(&self, data: &AssessmentData, format: ReportFormat) -> Result<String, ReportError> {
        let resolutions = resolve(data)?;
        render(&resolutions, format)
    }
}
