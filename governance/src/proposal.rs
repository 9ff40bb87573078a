//! Proposal normalizer: turns either raw LCD schema into [`Proposal`].
//!
//! Title and description are resolved per field, in priority order:
//! 1. top-level fields (`title`/`summary` on gov/v1, `content` on v1beta1)
//! 2. the JSON `metadata` field, which overrides (1) when it parses
//! 3. the first message's embedded `content` object, if still unresolved
//! 4. a fixed sentinel
//!
//! Nothing in here fails: absent or malformed input falls back to
//! sentinels and zero tallies.

use serde_json::Value;

use govlens_types::proposal::{CurrentProposal, LegacyProposal, RawProposalCommon};
use govlens_types::time::parse_chain_time;
use govlens_types::{
    Proposal, ProposalContent, ProposalStatus, RawProposal, TallyResult, TokenAmount, VoteTally,
};

use crate::engine::TallyEngine;

pub const NO_TITLE: &str = "No title available";
pub const NO_DESCRIPTION: &str = "No description available";

/// Partially resolved content.
#[derive(Default)]
struct ContentDraft {
    type_url: Option<String>,
    title: Option<String>,
    description: Option<String>,
}

impl ContentDraft {
    fn is_complete(&self) -> bool {
        self.title.is_some() && self.description.is_some()
    }

    /// Fill only the fields still missing.
    fn fill_from(&mut self, title: Option<&str>, description: Option<&str>) {
        if self.title.is_none() {
            self.title = non_empty(title);
        }
        if self.description.is_none() {
            self.description = non_empty(description);
        }
    }

    /// Replace fields with any non-empty values.
    fn override_with(&mut self, title: Option<&str>, description: Option<&str>) {
        if let Some(title) = non_empty(title) {
            self.title = Some(title);
        }
        if let Some(description) = non_empty(description) {
            self.description = Some(description);
        }
    }

    fn finish(self) -> ProposalContent {
        ProposalContent {
            type_url: self.type_url,
            title: self.title.unwrap_or_else(|| NO_TITLE.to_string()),
            description: self.description.unwrap_or_else(|| NO_DESCRIPTION.to_string()),
        }
    }
}

fn non_empty(s: Option<&str>) -> Option<String> {
    s.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Apply the `metadata` field. Metadata is frequently an IPFS link or
/// free text rather than JSON; that is not an error.
fn apply_metadata(draft: &mut ContentDraft, metadata: &str, proposal_id: &str) {
    if metadata.trim().is_empty() {
        return;
    }
    match serde_json::from_str::<Value>(metadata) {
        Ok(Value::Object(meta)) => {
            let title = meta.get("title").and_then(Value::as_str);
            let description = meta
                .get("description")
                .and_then(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .or_else(|| meta.get("summary").and_then(Value::as_str));
            draft.override_with(title, description);
        }
        Ok(_) => {
            tracing::debug!(proposal_id, "metadata is JSON but not an object, ignoring");
        }
        Err(e) => {
            tracing::debug!(proposal_id, error = %e, "metadata is not JSON, ignoring");
        }
    }
}

/// Fill from the first message's embedded `content` object.
fn apply_first_message(draft: &mut ContentDraft, messages: &[Value]) {
    let Some(first) = messages.first() else {
        return;
    };
    if draft.type_url.is_none() {
        draft.type_url = non_empty(first.get("@type").and_then(Value::as_str));
    }
    if let Some(content) = first.get("content") {
        draft.fill_from(
            content.get("title").and_then(Value::as_str),
            content.get("description").and_then(Value::as_str),
        );
    }
}

fn resolve_current(p: &CurrentProposal) -> ProposalContent {
    let mut draft = ContentDraft::default();
    draft.fill_from(Some(p.title.as_str()), Some(p.summary.as_str()));
    apply_metadata(&mut draft, &p.metadata, &p.id);
    if !draft.is_complete() || draft.type_url.is_none() {
        apply_first_message(&mut draft, &p.messages);
    }
    draft.finish()
}

fn resolve_legacy(p: &LegacyProposal) -> ProposalContent {
    let mut draft = ContentDraft {
        type_url: non_empty(Some(p.content.type_url.as_str())),
        ..ContentDraft::default()
    };
    draft.fill_from(Some(p.content.title.as_str()), Some(p.content.description.as_str()));
    draft.finish()
}

/// Resolve the title/description of either schema variant.
pub fn resolve_content(raw: &RawProposal) -> ProposalContent {
    match raw {
        RawProposal::Legacy(p) => resolve_legacy(p),
        RawProposal::Current(p) => resolve_current(p),
    }
}

fn assemble(
    proposal_id: String,
    content: ProposalContent,
    common: &RawProposalCommon,
    proposer: Option<String>,
) -> Proposal {
    Proposal {
        proposal_id,
        content,
        status: ProposalStatus::from_wire(&common.status),
        final_tally_result: TallyResult::from_votes(VoteTally::from_raw(&common.final_tally_result)),
        submit_time: parse_chain_time(&common.submit_time),
        deposit_end_time: parse_chain_time(&common.deposit_end_time),
        voting_start_time: parse_chain_time(&common.voting_start_time),
        voting_end_time: parse_chain_time(&common.voting_end_time),
        total_deposit: common.total_deposit.clone(),
        proposer,
    }
}

/// Convert a raw record into the normalized shape. Derived tally flags
/// are left unset; see [`apply_tally`].
pub fn normalize(raw: &RawProposal) -> Proposal {
    let content = resolve_content(raw);
    match raw {
        RawProposal::Legacy(p) => assemble(p.proposal_id.clone(), content, &p.common, None),
        RawProposal::Current(p) => assemble(
            p.id.clone(),
            content,
            &p.common,
            non_empty(Some(p.proposer.as_str())),
        ),
    }
}

/// Populate the derived tally fields from the proposal's own vote totals.
pub fn apply_tally(proposal: &mut Proposal, engine: &TallyEngine, total_staked: &TokenAmount) {
    let report = engine.tally(&proposal.final_tally_result.votes, total_staked);
    proposal.final_tally_result.outcome = Some(report.outcome);
}
