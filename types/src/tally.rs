//! Vote tallies and the flags derived from them.

use serde::{Deserialize, Serialize};

use crate::amount::TokenAmount;
use crate::de::null_default;

/// The four vote totals of a proposal, in the smallest denomination.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    pub yes: TokenAmount,
    pub no: TokenAmount,
    pub abstain: TokenAmount,
    pub no_with_veto: TokenAmount,
}

impl VoteTally {
    /// Decode a raw tally. Unparsable totals count as zero.
    pub fn from_raw(raw: &RawTally) -> Self {
        Self {
            yes: TokenAmount::parse_or_zero(&raw.yes),
            no: TokenAmount::parse_or_zero(&raw.no),
            abstain: TokenAmount::parse_or_zero(&raw.abstain),
            no_with_veto: TokenAmount::parse_or_zero(&raw.no_with_veto),
        }
    }

    /// `yes + no + abstain + no_with_veto`.
    pub fn total(&self) -> TokenAmount {
        [&self.yes, &self.no, &self.abstain, &self.no_with_veto]
            .into_iter()
            .sum()
    }

    /// `yes + no + no_with_veto`.
    pub fn non_abstain(&self) -> TokenAmount {
        [&self.yes, &self.no, &self.no_with_veto].into_iter().sum()
    }
}

/// Flags derived by the tally engine, plus the denominator it used.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyOutcome {
    pub total_voting_power: TokenAmount,
    pub quorum_reached: bool,
    pub threshold_reached: bool,
    pub veto_threshold_reached: bool,
}

impl TallyOutcome {
    /// An outcome with every flag false.
    pub fn unreached(total_voting_power: TokenAmount) -> Self {
        Self {
            total_voting_power,
            quorum_reached: false,
            threshold_reached: false,
            veto_threshold_reached: false,
        }
    }
}

/// A proposal's tally as carried on the normalized record.
///
/// `outcome` is only populated for proposals evaluated by the tally engine.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyResult {
    #[serde(flatten)]
    pub votes: VoteTally,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<TallyOutcome>,
}

impl TallyResult {
    pub fn from_votes(votes: VoteTally) -> Self {
        Self {
            votes,
            outcome: None,
        }
    }
}

/// Tally as served by the LCD. gov/v1 suffixes each field with `_count`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawTally {
    #[serde(default, alias = "yes_count", deserialize_with = "null_default")]
    pub yes: String,
    #[serde(default, alias = "no_count", deserialize_with = "null_default")]
    pub no: String,
    #[serde(default, alias = "abstain_count", deserialize_with = "null_default")]
    pub abstain: String,
    #[serde(
        default,
        alias = "no_with_veto_count",
        deserialize_with = "null_default"
    )]
    pub no_with_veto: String,
}

/// Body of `/cosmos/gov/v1beta1/proposals/{id}/tally`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawTallyResponse {
    #[serde(default)]
    pub tally: RawTally,
}
