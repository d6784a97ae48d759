//! Plain-text resolution report.

use super::ReportConfig;
use crate::error::LookupError;
use crate::person::Person;
use crate::proposal::{Proposal, ProposalSet};
use crate::resolve::{ProposalResolutionMap, ResolutionData};
use crate::strength::{StrengthLayer, VotingStrengthMap, VotingStrengthTrail};
use crate::vote::VoteKind;

const SEPARATOR_WIDTH: usize = 70;

#[derive(Default)]
struct Emitter {
    out: String,
}

impl Emitter {
    fn line(&mut self, text: &str) {
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    fn underlined(&mut self, text: &str) {
        self.line(text);
        self.line(&"=".repeat(text.chars().count()));
    }

    fn separator(&mut self) {
        self.line(&"/".repeat(SEPARATOR_WIDTH));
    }
}

fn strength_line(person: &Person, trail: &VotingStrengthTrail, suffix: &str) -> String {
    let descriptions = trail.descriptions();
    let mut line = format!(
        "{person} has voting strength {}{suffix}",
        trail.final_strength()
    );
    if !descriptions.is_empty() {
        line.push_str(&format!(" ({})", descriptions.join("; ")));
    }
    line
}

fn emit_global_strengths(out: &mut Emitter, strengths: &VotingStrengthMap) {
    let default = strengths.default_strength();
    let overridden = strengths.overridden_persons();
    if overridden.is_empty() {
        out.line(&format!("All players have voting strength {default}."));
        return;
    }
    out.line(&format!(
        "Voting strengths ({default} unless otherwise noted):"
    ));
    for person in overridden {
        out.line(&strength_line(person, &strengths.trail_for(person), ""));
    }
}

fn emit_proposal_overrides(out: &mut Emitter, layer: Option<&StrengthLayer>) {
    let Some(layer) = layer else {
        return;
    };
    for (person, trail) in layer.trails() {
        out.line(&strength_line(person, trail, " on this proposal"));
    }
}

fn emit_votes(out: &mut Emitter, resolution: &ResolutionData, counts: bool) {
    for kind in VoteKind::ALL {
        let voters = resolution.votes.persons_with_vote(kind);
        let mut line = kind.name().to_string();
        if counts {
            line.push_str(&format!(" ({})", voters.len()));
        }
        line.push(':');
        if !voters.is_empty() {
            line.push(' ');
            line.push_str(&voters.joined_names());
        }
        out.line(&line);
    }
}

fn emit_comments(out: &mut Emitter, resolution: &ResolutionData) {
    let mut comments = resolution.votes.votes_with_comments().peekable();
    if comments.peek().is_none() {
        return;
    }
    out.line("[");
    for (person, comment) in comments {
        out.line(&format!("{person}: {comment}"));
    }
    out.line("]");
}

fn emit_proposal(
    out: &mut Emitter,
    proposal: &Proposal,
    resolutions: &ProposalResolutionMap,
    config: ReportConfig,
) -> Result<(), LookupError> {
    let resolution = resolutions.resolution_of(proposal.number)?;
    let strengths = resolutions.voting_strengths_for(proposal.number)?;

    out.line(&format!("PROPOSAL {} (\"{}\")", proposal.number, proposal.title));
    emit_proposal_overrides(out, strengths.proposal_layer());
    emit_votes(out, resolution, config.vote_kind_ballot_count);
    if config.total_ballot_count {
        out.line(&format!("BALLOTS: {}", resolution.votes.vote_count()));
    }
    out.line(&format!(
        "AI (F/A): {}/{} (AI={})",
        resolution.strengths.strength_for, resolution.strengths.strength_against, proposal.ai
    ));
    out.line(&format!("OUTCOME: {}", resolution.result));
    if config.vote_comments {
        emit_comments(out, resolution);
    }
    out.blank();
    Ok(())
}

fn emit_adopted_text(out: &mut Emitter, adopted: &ProposalSet) {
    if adopted.is_empty() {
        out.line("No proposals were adopted.");
        return;
    }
    out.line("The full text of each ADOPTED proposal is included below:");
    out.blank();
    for proposal in adopted {
        out.separator();
        out.line(&format!("ID: {}", proposal.number));
        out.line(&format!("Title: {}", proposal.title));
        out.line(&format!("Adoption index: {}", proposal.ai));
        out.line(&format!("Author: {}", proposal.author));
        if proposal.coauthors.is_empty() {
            out.line("Co-authors:");
        } else {
            out.line(&format!("Co-authors: {}", proposal.coauthors.joined_names()));
        }
        out.blank();
        out.blank();
        out.line(proposal.text.trim());
        out.blank();
    }
    out.separator();
}

/// Render the human-readable report, proposals in number order.
///
/// # Errors
///
/// Propagates a missing resolution or strength map for a listed proposal.
pub fn render_text(
    resolutions: &ProposalResolutionMap,
    config: ReportConfig,
) -> Result<String, LookupError> {
    let mut out = Emitter::default();

    out.underlined(&format!("RESOLUTION OF PROPOSALS {}", resolutions.name()));
    out.blank();
    out.line("I hereby resolve the Agoran decisions to adopt the below proposals.");
    out.blank();
    out.line(&format!(
        "The quorum for all below decisions was {}.",
        resolutions.quorum()
    ));
    out.blank();
    emit_global_strengths(&mut out, resolutions.global_strengths());
    out.blank();
    out.blank();

    for proposal in resolutions.proposals() {
        emit_proposal(&mut out, proposal, resolutions, config)?;
    }
    out.blank();

    emit_adopted_text(&mut out, &resolutions.adopted_proposals());
    Ok(out.out)
}
