//! Summary of where a tally stands, in the order a reader cares about:
//! quorum first, then veto, then the pass threshold.

use serde::{Deserialize, Serialize};

use govlens_types::TallyOutcome;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VotingVerdict {
    QuorumNotReached,
    VetoThresholdExceeded,
    PassingThresholdMet,
    BelowPassingThreshold,
}

impl VotingVerdict {
    pub fn from_outcome(outcome: &TallyOutcome) -> Self {
        if !outcome.quorum_reached {
            Self::QuorumNotReached
        } else if outcome.veto_threshold_reached {
            Self::VetoThresholdExceeded
        } else if outcome.threshold_reached {
            Self::PassingThresholdMet
        } else {
            Self::BelowPassingThreshold
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::QuorumNotReached => "Quorum Not Reached",
            Self::VetoThresholdExceeded => "Veto Threshold Exceeded",
            Self::PassingThresholdMet => "Passing Threshold Met",
            Self::BelowPassingThreshold => "Below Passing Threshold",
        }
    }

    /// Whether the proposal would pass if voting closed now.
    pub fn is_passing(&self) -> bool {
        matches!(self, Self::PassingThresholdMet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use govlens_types::TokenAmount;

    fn outcome(quorum: bool, threshold: bool, veto: bool) -> TallyOutcome {
        TallyOutcome {
            total_voting_power: TokenAmount::zero(),
            quorum_reached: quorum,
            threshold_reached: threshold,
            veto_threshold_reached: veto,
        }
    }

    #[test]
    fn quorum_takes_precedence() {
        assert_eq!(
            VotingVerdict::from_outcome(&outcome(false, true, true)),
            VotingVerdict::QuorumNotReached
        );
    }

    #[test]
    fn veto_beats_threshold() {
        let v = VotingVerdict::from_outcome(&outcome(true, true, true));
        assert_eq!(v, VotingVerdict::VetoThresholdExceeded);
        assert!(!v.is_passing());
    }

    #[test]
    fn passing_and_below() {
        assert!(VotingVerdict::from_outcome(&outcome(true, true, false)).is_passing());
        assert_eq!(
            VotingVerdict::from_outcome(&outcome(true, false, false)).label(),
            "Below Passing Threshold"
        );
    }
}
