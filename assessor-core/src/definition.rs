//! JSON assessment definitions.
//!
//! A definition is parsed with serde and then replayed through
//! [`AssessmentBuilder`], so a file is validated exactly like an assessment
//! assembled in code. Numbers are JSON integers or decimal strings.

use num_rational::BigRational;
use serde::{Deserialize, Serialize};

use crate::assessment::{AssessmentBuilder, AssessmentData};
use crate::error::{ConfigError, DefinitionError};
use crate::ministries::{MinistryBonuses, MinistryOffice};
use crate::numbers::{ProposalAi, VotingStrength, VotingStrengthDifference};
use crate::person::{Person, Persons};
use crate::proposal::{Chamber, ClassAndChamber, Proposal, ProposalNumber, VersionedData};
use crate::strength::{ScopeBuilder, StrengthsBuilder};
use crate::vote::{PendingVote, Vote, VoteKind, VotingBuilder};

/// One strength declaration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case", deny_unknown_fields)]
pub enum StrengthOpDefinition {
    Set {
        person: Person,
        value: VotingStrength,
        #[serde(default)]
        comment: Option<String>,
    },
    Add {
        person: Person,
        amount: VotingStrengthDifference,
        #[serde(default)]
        reason: Option<String>,
    },
    Multiply {
        person: Person,
        #[serde(deserialize_with = "crate::numbers::deserialize_rational")]
        factor: BigRational,
        #[serde(default)]
        reason: Option<String>,
    },
}

impl StrengthOpDefinition {
    fn apply(self, scope: &mut ScopeBuilder) -> Result<(), ConfigError> {
        match self {
            Self::Set {
                person,
                value,
                comment,
            } => {
                scope.set(person, value, comment)?;
            }
            Self::Add {
                person,
                amount,
                reason,
            } => {
                scope.add(person, amount, reason);
            }
            Self::Multiply {
                person,
                factor,
                reason,
            } => {
                scope.multiply(person, factor, reason);
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProposalStrengthsDefinition {
    pub proposal: ProposalNumber,
    #[serde(default)]
    pub ops: Vec<StrengthOpDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MinistriesDefinition {
    pub bonus: VotingStrengthDifference,
    #[serde(default)]
    pub offices: Vec<MinistryOffice>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StrengthsDefinition {
    pub default: Option<VotingStrength>,
    #[serde(default)]
    pub min: Option<VotingStrength>,
    #[serde(default)]
    pub max: Option<VotingStrength>,
    #[serde(default)]
    pub global: Vec<StrengthOpDefinition>,
    #[serde(default)]
    pub proposals: Vec<ProposalStrengthsDefinition>,
    #[serde(default)]
    pub ministries: Option<MinistriesDefinition>,
}

impl StrengthsDefinition {
    fn apply(self, builder: &mut StrengthsBuilder) -> Result<(), ConfigError> {
        if let Some(default) = self.default {
            builder.default_strength(default)?;
        }
        if let Some(min) = self.min {
            builder.min_strength(min)?;
        }
        if let Some(max) = self.max {
            builder.max_strength(max)?;
        }
        for op in self.global {
            op.apply(builder.global())?;
        }
        for block in self.proposals {
            builder.proposal(block.proposal, |scope| {
                block.ops.into_iter().try_for_each(|op| op.apply(scope))
            })?;
        }
        if let Some(ministries) = self.ministries {
            let mut bonuses = MinistryBonuses::new(ministries.bonus);
            for office in ministries.offices {
                bonuses.office(office)?;
            }
            builder.ministries(bonuses)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalClass {
    Classless,
    Democratic,
    Ordinary,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProposalDefinition {
    pub number: ProposalNumber,
    pub title: String,
    pub ai: ProposalAi,
    pub author: Person,
    #[serde(default)]
    pub coauthors: Vec<Person>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub class: Option<ProposalClass>,
    #[serde(default)]
    pub chamber: Option<Chamber>,
    #[serde(default)]
    pub sponsored: Option<bool>,
}

impl ProposalDefinition {
    /// No class means V0, a class means V1, a class plus sponsorship means V2.
    ///
    /// # Errors
    ///
    /// Fails on duplicate co-authors, on a chamber or sponsorship without a
    /// class, or on a chamber for a non-ordinary proposal.
    pub fn into_proposal(self) -> Result<Proposal, ConfigError> {
        let number = self.number;
        let class_and_chamber = match (self.class, self.chamber) {
            (None, None) => None,
            (None, Some(_)) => return Err(ConfigError::ChamberWithoutClass(number)),
            (Some(ProposalClass::Ordinary), chamber) => Some(ClassAndChamber::Ordinary { chamber }),
            (Some(ProposalClass::Classless), None) => Some(ClassAndChamber::Classless),
            (Some(ProposalClass::Democratic), None) => Some(ClassAndChamber::Democratic),
            (Some(_), Some(_)) => return Err(ConfigError::ChamberOnNonOrdinary(number)),
        };
        let versioned = match (class_and_chamber, self.sponsored) {
            (None, None) => VersionedData::V0,
            (None, Some(_)) => return Err(ConfigError::SponsoredWithoutClass(number)),
            (Some(class_and_chamber), None) => VersionedData::V1 { class_and_chamber },
            (Some(class_and_chamber), Some(sponsored)) => VersionedData::V2 {
                class_and_chamber,
                sponsored,
            },
        };
        Ok(Proposal {
            number: self.number,
            title: self.title,
            ai: self.ai,
            author: self.author,
            coauthors: Persons::from_distinct(
                self.coauthors,
                format!("co-authors of proposal {number}"),
            )?,
            text: self.text,
            versioned,
        })
    }
}

/// A declaration on one proposal: exactly one of `vote`, `follow`,
/// `inextricable` or `abstain`, plus an optional comment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BallotDefinition {
    pub proposal: ProposalNumber,
    #[serde(default)]
    pub vote: Option<VoteKind>,
    #[serde(default)]
    pub follow: Option<Person>,
    #[serde(default)]
    pub inextricable: bool,
    #[serde(default)]
    pub abstain: bool,
    #[serde(default)]
    pub comment: Option<String>,
}

impl BallotDefinition {
    fn into_pending(self, voter: &Person) -> Result<PendingVote, ConfigError> {
        let pending = match (self.vote, self.follow, self.inextricable, self.abstain) {
            (Some(kind), None, false, false) => PendingVote::cast(Vote::simple(kind)),
            (None, Some(leader), false, false) => PendingVote::follow(leader),
            (None, None, true, false) => PendingVote::cast(Vote::Inextricable { comment: None }),
            (None, None, false, true) => PendingVote::abstain(),
            _ => {
                return Err(ConfigError::InvalidBallot {
                    person: voter.clone(),
                    proposal: self.proposal,
                });
            }
        };
        Ok(match self.comment {
            Some(comment) => pending.with_comment(comment),
            None => pending,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VoterDefinition {
    pub voter: Person,
    #[serde(default)]
    pub ballots: Vec<BallotDefinition>,
}

/// A whole assessment as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssessmentDefinition {
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    pub quorum: Option<u32>,
    pub strengths: Option<StrengthsDefinition>,
    #[serde(default)]
    pub proposals: Vec<ProposalDefinition>,
    #[serde(default)]
    pub voting: Option<Vec<VoterDefinition>>,
}

impl AssessmentDefinition {
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe an assessment.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Replay the definition through [`AssessmentBuilder`].
    ///
    /// # Errors
    ///
    /// Returns the first configuration error the builder reports.
    pub fn into_builder(self) -> Result<AssessmentBuilder, ConfigError> {
        let mut builder = AssessmentBuilder::new();
        if let Some(name) = self.name {
            builder.name(name)?;
        }
        if let Some(url) = self.url {
            builder.url(url)?;
        }
        if let Some(quorum) = self.quorum {
            builder.quorum(quorum)?;
        }
        let proposals = self
            .proposals
            .into_iter()
            .map(ProposalDefinition::into_proposal)
            .collect::<Result<Vec<_>, _>>()?;
        builder.proposals(proposals)?;
        if let Some(strengths) = self.strengths {
            builder.strengths(|builder| strengths.apply(builder))?;
        }
        if let Some(voters) = self.voting {
            builder.voting(|voting| apply_voting(voters, voting))?;
        }
        Ok(builder)
    }

    /// # Errors
    ///
    /// Returns the first configuration error found while compiling.
    pub fn compile(self) -> Result<AssessmentData, ConfigError> {
        self.into_builder()?.compile()
    }
}

fn apply_voting(voters: Vec<VoterDefinition>, voting: &mut VotingBuilder) -> Result<(), ConfigError> {
    for VoterDefinition { voter, ballots } in voters {
        for ballot in ballots {
            let proposal = ballot.proposal;
            let pending = ballot.into_pending(&voter)?;
            voting.vote(voter.clone(), proposal, pending)?;
        }
    }
    Ok(())
}

/// Parse and compile one definition file.
///
/// # Errors
///
/// Fails on malformed JSON or any configuration error.
pub fn parse_assessment(json: &str) -> Result<AssessmentData, DefinitionError> {
    Ok(AssessmentDefinition::from_json(json)?.compile()?)
}
