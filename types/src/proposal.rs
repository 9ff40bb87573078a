//! Governance proposals: the two raw LCD schemas and the normalized record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::amount::Coin;
use crate::de::null_default;
use crate::error::TypesError;
use crate::tally::{RawTally, TallyResult};

/// Lifecycle state of a proposal, serialized with the chain's enum names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalStatus {
    #[serde(rename = "PROPOSAL_STATUS_UNSPECIFIED")]
    Unspecified,
    #[serde(rename = "PROPOSAL_STATUS_DEPOSIT_PERIOD")]
    DepositPeriod,
    #[serde(rename = "PROPOSAL_STATUS_VOTING_PERIOD")]
    VotingPeriod,
    #[serde(rename = "PROPOSAL_STATUS_PASSED")]
    Passed,
    #[serde(rename = "PROPOSAL_STATUS_REJECTED")]
    Rejected,
    #[serde(rename = "PROPOSAL_STATUS_FAILED")]
    Failed,
    #[serde(other)]
    Unknown,
}

impl ProposalStatus {
    /// Map the chain's enum name. Anything unrecognised is `Unknown`.
    pub fn from_wire(s: &str) -> Self {
        match s {
            "PROPOSAL_STATUS_UNSPECIFIED" => Self::Unspecified,
            "PROPOSAL_STATUS_DEPOSIT_PERIOD" => Self::DepositPeriod,
            "PROPOSAL_STATUS_VOTING_PERIOD" => Self::VotingPeriod,
            "PROPOSAL_STATUS_PASSED" => Self::Passed,
            "PROPOSAL_STATUS_REJECTED" => Self::Rejected,
            "PROPOSAL_STATUS_FAILED" => Self::Failed,
            _ => Self::Unknown,
        }
    }

    /// Short human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::DepositPeriod => "Deposit",
            Self::VotingPeriod => "Voting",
            Self::Passed => "Passed",
            Self::Rejected => "Rejected",
            Self::Failed => "Failed",
            Self::Unspecified | Self::Unknown => "Unknown",
        }
    }

    /// Whether votes are currently being accepted.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::VotingPeriod)
    }
}

/// Resolved title and description of a proposal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalContent {
    /// Type URL of the legacy content or first message, if known.
    #[serde(rename = "@type", default, skip_serializing_if = "Option::is_none")]
    pub type_url: Option<String>,
    pub title: String,
    pub description: String,
}

/// A proposal in the single shape used past the ingestion boundary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub proposal_id: String,
    pub content: ProposalContent,
    pub status: ProposalStatus,
    pub final_tally_result: TallyResult,
    pub submit_time: Option<DateTime<Utc>>,
    pub deposit_end_time: Option<DateTime<Utc>>,
    pub voting_start_time: Option<DateTime<Utc>>,
    pub voting_end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_deposit: Vec<Coin>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proposer: Option<String>,
}

impl Proposal {
    /// The id as an integer for ordering. Malformed ids sort last.
    pub fn numeric_id(&self) -> u64 {
        self.proposal_id.trim().parse().unwrap_or(0)
    }
}

// ── Raw LCD shapes ─────────────────────────────────────────────────────

/// Fields shared by both schema variants.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawProposalCommon {
    #[serde(default, deserialize_with = "null_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_default")]
    pub final_tally_result: RawTally,
    #[serde(default, deserialize_with = "null_default")]
    pub submit_time: String,
    #[serde(default, deserialize_with = "null_default")]
    pub deposit_end_time: String,
    #[serde(default, deserialize_with = "null_default")]
    pub total_deposit: Vec<Coin>,
    #[serde(default, deserialize_with = "null_default")]
    pub voting_start_time: String,
    #[serde(default, deserialize_with = "null_default")]
    pub voting_end_time: String,
}

/// Embedded `{ title, description }` content object.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawContent {
    #[serde(rename = "@type", default, deserialize_with = "null_default")]
    pub type_url: String,
    #[serde(default, deserialize_with = "null_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_default")]
    pub description: String,
}

/// gov/v1beta1 proposal: `proposal_id` plus a legacy `content` object.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct LegacyProposal {
    #[serde(default, deserialize_with = "null_default")]
    pub proposal_id: String,
    #[serde(default, deserialize_with = "null_default")]
    pub content: RawContent,
    #[serde(flatten)]
    pub common: RawProposalCommon,
}

/// gov/v1 proposal: `id`, JSON `metadata`, top-level title/summary and a
/// list of messages that may embed legacy content.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CurrentProposal {
    #[serde(default, deserialize_with = "null_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_default")]
    pub metadata: String,
    #[serde(default, deserialize_with = "null_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_default")]
    pub summary: String,
    #[serde(default, deserialize_with = "null_default")]
    pub messages: Vec<Value>,
    #[serde(default, deserialize_with = "null_default")]
    pub proposer: String,
    #[serde(flatten)]
    pub common: RawProposalCommon,
}

/// A proposal record as it came off the wire, discriminated by schema.
#[derive(Clone, Debug)]
pub enum RawProposal {
    Legacy(LegacyProposal),
    Current(CurrentProposal),
}

impl RawProposal {
    /// Classify a raw JSON record: `proposal_id` marks the legacy schema,
    /// everything else is decoded as the current one.
    pub fn from_value(value: Value) -> Result<Self, TypesError> {
        if value.get("proposal_id").is_some() {
            serde_json::from_value(value)
                .map(Self::Legacy)
                .map_err(|e| TypesError::MalformedRecord(e.to_string()))
        } else {
            serde_json::from_value(value)
                .map(Self::Current)
                .map_err(|e| TypesError::MalformedRecord(e.to_string()))
        }
    }

    /// The canonical id regardless of variant.
    pub fn id(&self) -> &str {
        match self {
            Self::Legacy(p) => &p.proposal_id,
            Self::Current(p) => &p.id,
        }
    }

    pub fn common(&self) -> &RawProposalCommon {
        match self {
            Self::Legacy(p) => &p.common,
            Self::Current(p) => &p.common,
        }
    }

    pub fn status(&self) -> ProposalStatus {
        ProposalStatus::from_wire(&self.common().status)
    }
}

/// One page of the proposal listing.
#[derive(Clone, Debug, Default)]
pub struct ProposalsPage {
    pub proposals: Vec<RawProposal>,
    /// Cursor for the next page; `None` when the listing is exhausted.
    pub next_key: Option<String>,
}
