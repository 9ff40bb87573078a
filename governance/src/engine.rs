//! Governance tally engine: participation, pass/veto ratios and the
//! "reached" flags derived from a proposal's vote totals.
//!
//! All sums are exact big-integer additions; floats appear only in the
//! final divisions.

use govlens_types::{TallyOutcome, TallyParams, TokenAmount, VoteTally};

/// Everything the engine derived from one tally.
#[derive(Clone, Debug, PartialEq)]
pub struct TallyReport {
    /// `total_voted / total_staked`, zero when nothing is staked.
    pub participation: f64,
    /// `yes / non_abstain`, zero when there are no non-abstain votes.
    pub yes_ratio: f64,
    /// `no_with_veto / non_abstain`, zero when there are no non-abstain votes.
    pub veto_ratio: f64,
    pub total_voted: TokenAmount,
    pub outcome: TallyOutcome,
}

pub struct TallyEngine {
    params: TallyParams,
}

impl TallyEngine {
    pub fn new(params: TallyParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &TallyParams {
        &self.params
    }

    /// Evaluate `votes` against `total_staked`.
    ///
    /// Quorum is inclusive (`>=`); the pass and veto thresholds must be
    /// strictly exceeded, so a tie does not pass.
    pub fn tally(&self, votes: &VoteTally, total_staked: &TokenAmount) -> TallyReport {
        let total_voted = votes.total();
        let total_non_abstain = votes.non_abstain();

        let participation = total_voted.ratio_of(total_staked);
        let yes_ratio = votes.yes.ratio_of(&total_non_abstain);
        let veto_ratio = votes.no_with_veto.ratio_of(&total_non_abstain);

        let outcome = TallyOutcome {
            total_voting_power: total_staked.clone(),
            quorum_reached: participation >= self.params.quorum,
            threshold_reached: yes_ratio > self.params.threshold,
            veto_threshold_reached: veto_ratio > self.params.veto_threshold,
        };

        TallyReport {
            participation,
            yes_ratio,
            veto_ratio,
            total_voted,
            outcome,
        }
    }
}
