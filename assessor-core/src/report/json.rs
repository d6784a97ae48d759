//! Structured (JSON) resolution report. Every number is an exact decimal
//! string.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::assessment::AssessmentMetadata;
use crate::error::ReportError;
use crate::numbers::{ProposalAi, VotingStrength};
use crate::person::{Person, Persons};
use crate::proposal::{Chamber, Proposal, ProposalNumber};
use crate::resolve::{ProposalResolutionMap, ProposalResult, ResolutionData};
use crate::strength::{VotingStrengthMap, VotingStrengthModification};
use crate::vote::{VoteKind, VoteStepDescription};

#[derive(Serialize)]
struct Parameter<'a> {
    name: &'static str,
    value: &'a str,
}

fn parameters<'a>(map: &'a BTreeMap<&'static str, String>) -> Vec<Parameter<'a>> {
    map.iter()
        .map(|(name, value)| Parameter {
            name: *name,
            value: value.as_str(),
        })
        .collect()
}

#[derive(Serialize)]
struct Description<'a> {
    readable: &'a str,
    kind: &'static str,
    parameters: Vec<Parameter<'a>>,
}

#[derive(Serialize)]
struct ProposalJson<'a> {
    version: u32,
    number: ProposalNumber,
    ai: &'a ProposalAi,
    title: &'a str,
    author: &'a Person,
    coauthors: Vec<&'a Person>,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    class: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    chamber: Option<&'a Chamber>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sponsored: Option<bool>,
}

impl<'a> From<&'a Proposal> for ProposalJson<'a> {
    fn from(proposal: &'a Proposal) -> Self {
        let class_and_chamber = proposal.versioned.class_and_chamber();
        Self {
            version: proposal.version(),
            number: proposal.number,
            ai: &proposal.ai,
            title: &proposal.title,
            author: &proposal.author,
            coauthors: persons(&proposal.coauthors),
            text: &proposal.text,
            class: class_and_chamber.map(|c| c.label()),
            chamber: proposal.chamber(),
            sponsored: proposal.versioned.sponsored(),
        }
    }
}

fn persons(persons: &Persons) -> Vec<&Person> {
    persons.iter().collect()
}

#[derive(Serialize)]
struct VoteJson<'a> {
    voter: &'a Person,
    vote: VoteKind,
    comments: Vec<Description<'a>>,
}

#[derive(Serialize)]
struct ResolutionJson<'a> {
    result: ProposalResult,
    strength_for: &'a VotingStrength,
    strength_against: &'a VotingStrength,
    votes: Vec<VoteJson<'a>>,
}

#[derive(Serialize)]
struct ModificationJson {
    description: ModificationDescriptionJson,
    current_strength: VotingStrength,
}

#[derive(Serialize)]
struct ModificationDescriptionJson {
    readable: String,
    kind: &'static str,
    parameters: Vec<OwnedParameter>,
}

#[derive(Serialize)]
struct OwnedParameter {
    name: &'static str,
    value: String,
}

#[derive(Serialize)]
struct StrengthJson<'a> {
    person: &'a Person,
    initial: VotingStrength,
    modifications: Vec<ModificationJson>,
    #[serde(rename = "final")]
    final_strength: VotingStrength,
}

#[derive(Serialize)]
struct ProposalResolutionJson<'a> {
    proposal: ProposalNumber,
    resolution: ResolutionJson<'a>,
    strengths: Vec<StrengthJson<'a>>,
}

#[derive(Serialize)]
struct ReportJson<'a> {
    metadata: &'a AssessmentMetadata,
    proposals: Vec<ProposalJson<'a>>,
    quorum: u32,
    resolutions: Vec<ProposalResolutionJson<'a>>,
}

fn step_description(step: &VoteStepDescription) -> Description<'_> {
    Description {
        readable: &step.readable,
        kind: step.kind,
        parameters: parameters(&step.parameters),
    }
}

fn resolution_json(resolution: &ResolutionData) -> Result<ResolutionJson<'_>, ReportError> {
    let mut votes = Vec::with_capacity(resolution.votes.vote_count());
    for (voter, vote) in resolution.votes.iter() {
        let comments = resolution
            .votes
            .descriptions_for(voter)?
            .iter()
            .map(step_description)
            .collect();
        votes.push(VoteJson {
            voter,
            vote: vote.kind,
            comments,
        });
    }
    Ok(ResolutionJson {
        result: resolution.result,
        strength_for: &resolution.strengths.strength_for,
        strength_against: &resolution.strengths.strength_against,
        votes,
    })
}

fn modification_json(
    modification: &VotingStrengthModification,
    current_strength: VotingStrength,
) -> ModificationJson {
    let description = modification.description();
    ModificationJson {
        description: ModificationDescriptionJson {
            readable: description.readable,
            kind: description.kind,
            parameters: description
                .parameters
                .into_iter()
                .map(|(name, value)| OwnedParameter { name, value })
                .collect(),
        },
        current_strength,
    }
}

fn strengths_json(strengths: &VotingStrengthMap) -> Vec<StrengthJson<'_>> {
    strengths
        .overridden_persons()
        .into_iter()
        .map(|person| {
            let trail = strengths.trail_for(person);
            StrengthJson {
                person,
                initial: trail.initial().clone(),
                modifications: trail
                    .modifications_with_values()
                    .into_iter()
                    .map(|(modification, value)| modification_json(modification, value))
                    .collect(),
                final_strength: trail.final_strength(),
            }
        })
        .collect()
}

/// Render the machine-readable report.
///
/// # Errors
///
/// Propagates a missing resolution or strength map, or a serialization
/// failure.
pub fn render_structured(
    resolutions: &ProposalResolutionMap,
) -> Result<serde_json::Value, ReportError> {
    let proposals = resolutions.proposals();
    let mut entries = Vec::with_capacity(proposals.len());
    for proposal in proposals {
        entries.push(ProposalResolutionJson {
            proposal: proposal.number,
            resolution: resolution_json(resolutions.resolution_of(proposal.number)?)?,
            strengths: strengths_json(resolutions.voting_strengths_for(proposal.number)?),
        });
    }

    let report = ReportJson {
        metadata: resolutions.metadata(),
        proposals: proposals.iter().map(ProposalJson::from).collect(),
        quorum: resolutions.quorum().0,
        resolutions: entries,
    };
    Ok(serde_json::to_value(report)?)
}
