//! Renderers for resolved assessments.

pub mod json;
pub mod text;

pub use json::render_structured;
pub use text::render_text;

use crate::error::ReportError;
use crate::resolve::ProposalResolutionMap;
use crate::rewards::{calculate_rewards, render_rewards};

/// The documents a resolved assessment can be rendered as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportFormat {
    /// Text report with every optional section.
    Human,
    /// Text report without comments or ballot counts.
    Short,
    Json,
    Rewards,
}

impl ReportFormat {
    /// Extension for files holding this format.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Human | Self::Short | Self::Rewards => "txt",
        }
    }
}

/// Render `resolutions` in `format`.
///
/// # Errors
///
/// Propagates lookup and serialization failures.
pub fn render(
    resolutions: &ProposalResolutionMap,
    format: ReportFormat,
) -> Result<String, ReportError> {
    match format {
        ReportFormat::Human => Ok(render_text(resolutions, ReportConfig::long())?),
        ReportFormat::Short => Ok(render_text(resolutions, ReportConfig::short())?),
        ReportFormat::Json => Ok(serde_json::to_string_pretty(&render_structured(
            resolutions,
        )?)?),
        ReportFormat::Rewards => Ok(render_rewards(&calculate_rewards(resolutions)?)),
    }
}

/// Optional sections of the text report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportConfig {
    pub vote_comments: bool,
    pub total_ballot_count: bool,
    pub vote_kind_ballot_count: bool,
}

impl ReportConfig {
    #[must_use]
    pub const fn long() -> Self {
        Self {
            vote_comments: true,
            total_ballot_count: true,
            vote_kind_ballot_count: true,
        }
    }

    #[must_use]
    pub const fn short() -> Self {
        Self {
            vote_comments: false,
            total_ballot_count: false,
            vote_kind_ballot_count: false,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self::long()
    }
}
