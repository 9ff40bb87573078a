//! Per-option vote shares for display.

use serde::{Deserialize, Serialize};

use govlens_types::{TokenAmount, VoteTally};

/// Vote shares in percent (0–100).
///
/// `*_of_total` are shares of all votes cast; `*_of_non_abstain` are the
/// shares the pass and veto thresholds are measured against.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VoteBreakdown {
    pub total_votes: TokenAmount,
    pub yes_of_total: f64,
    pub no_of_total: f64,
    pub abstain_of_total: f64,
    pub no_with_veto_of_total: f64,
    pub yes_of_non_abstain: f64,
    pub no_of_non_abstain: f64,
    pub no_with_veto_of_non_abstain: f64,
    /// Votes cast as a percentage of total staked.
    pub participation: f64,
}

impl VoteBreakdown {
    pub fn new(votes: &VoteTally, total_staked: &TokenAmount) -> Self {
        let total = votes.total();
        let non_abstain = votes.non_abstain();
        let pct = |part: &TokenAmount, whole: &TokenAmount| part.ratio_of(whole) * 100.0;

        Self {
            yes_of_total: pct(&votes.yes, &total),
            no_of_total: pct(&votes.no, &total),
            abstain_of_total: pct(&votes.abstain, &total),
            no_with_veto_of_total: pct(&votes.no_with_veto, &total),
            yes_of_non_abstain: pct(&votes.yes, &non_abstain),
            no_of_non_abstain: pct(&votes.no, &non_abstain),
            no_with_veto_of_non_abstain: pct(&votes.no_with_veto, &non_abstain),
            participation: pct(&total, total_staked),
            total_votes: total,
        }
    }
}
