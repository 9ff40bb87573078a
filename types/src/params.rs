//! Governance parameters: voting period, minimum deposit and tally thresholds.
//!
//! The LCD serves these from three separate paths. Each response carries all
//! three parameter groups but only the requested one is populated, so the
//! raw shapes default every field.

use serde::{Deserialize, Serialize};

use crate::amount::Coin;
use crate::error::TypesError;

/// Quorum used when the chain does not report a usable value.
pub const DEFAULT_QUORUM: f64 = 0.334;
/// Pass threshold used when the chain does not report a usable value.
pub const DEFAULT_THRESHOLD: f64 = 0.5;
/// Veto threshold used when the chain does not report a usable value.
pub const DEFAULT_VETO_THRESHOLD: f64 = 0.334;

/// Tally thresholds, each a fraction in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TallyParams {
    /// Minimum fraction of staked tokens that must vote.
    pub quorum: f64,
    /// Fraction of non-abstain votes that must be Yes (strictly exceeded).
    pub threshold: f64,
    /// Fraction of non-abstain votes cast as NoWithVeto that rejects the proposal.
    pub veto_threshold: f64,
}

impl TallyParams {
    pub fn new(quorum: f64, threshold: f64, veto_threshold: f64) -> Result<Self, TypesError> {
        for (name, value) in [
            ("quorum", quorum),
            ("threshold", threshold),
            ("veto_threshold", veto_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(TypesError::InvalidFraction {
                    name,
                    value: value.to_string(),
                });
            }
        }
        Ok(Self {
            quorum,
            threshold,
            veto_threshold,
        })
    }

    /// Parse the chain's decimal strings (e.g. `"0.334000000000000000"`).
    pub fn from_raw(raw: &RawTallyParams) -> Result<Self, TypesError> {
        Self::new(
            parse_fraction("quorum", &raw.quorum)?,
            parse_fraction("threshold", &raw.threshold)?,
            parse_fraction("veto_threshold", &raw.veto_threshold)?,
        )
    }
}

impl Default for TallyParams {
    fn default() -> Self {
        Self {
            quorum: DEFAULT_QUORUM,
            threshold: DEFAULT_THRESHOLD,
            veto_threshold: DEFAULT_VETO_THRESHOLD,
        }
    }
}

fn parse_fraction(name: &'static str, s: &str) -> Result<f64, TypesError> {
    s.trim()
        .parse::<f64>()
        .map_err(|_| TypesError::InvalidFraction {
            name,
            value: s.to_string(),
        })
}

/// Normalized governance parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GovParams {
    /// Voting period as reported by the chain (e.g. `"604800s"`).
    pub voting_period: String,
    pub min_deposit: Vec<Coin>,
    pub max_deposit_period: String,
    pub tally: TallyParams,
}

impl GovParams {
    /// Merge the three raw parameter groups. Unparsable thresholds fall
    /// back to `fallback` rather than failing the whole fetch.
    pub fn from_raw(
        voting: RawVotingParams,
        deposit: RawDepositParams,
        tally: &RawTallyParams,
        fallback: TallyParams,
    ) -> Self {
        let tally = match TallyParams::from_raw(tally) {
            Ok(params) => params,
            Err(e) => {
                tracing::warn!(error = %e, "chain tally params unusable, using defaults");
                fallback
            }
        };
        Self {
            voting_period: voting.voting_period,
            min_deposit: deposit.min_deposit,
            max_deposit_period: deposit.max_deposit_period,
            tally,
        }
    }

    /// Voting period in seconds, if the chain reported a `"<n>s"` duration.
    pub fn voting_period_secs(&self) -> Option<u64> {
        let trimmed = self.voting_period.trim();
        trimmed.strip_suffix('s').unwrap_or(trimmed).parse().ok()
    }
}

// ── Raw LCD shapes ─────────────────────────────────────────────────────

/// Body of any `/cosmos/gov/v1beta1/params/{type}` response.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawParamsResponse {
    #[serde(default)]
    pub voting_params: Option<RawVotingParams>,
    #[serde(default)]
    pub deposit_params: Option<RawDepositParams>,
    #[serde(default)]
    pub tally_params: Option<RawTallyParams>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawVotingParams {
    #[serde(default)]
    pub voting_period: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawDepositParams {
    #[serde(default)]
    pub min_deposit: Vec<Coin>,
    #[serde(default)]
    pub max_deposit_period: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawTallyParams {
    #[serde(default)]
    pub quorum: String,
    #[serde(default)]
    pub threshold: String,
    #[serde(default)]
    pub veto_threshold: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_tally(q: &str, t: &str, v: &str) -> RawTallyParams {
        RawTallyParams {
            quorum: q.into(),
            threshold: t.into(),
            veto_threshold: v.into(),
        }
    }

    #[test]
    fn parses_chain_decimals() {
        let p = TallyParams::from_raw(&raw_tally(
            "0.300000000000000000",
            "0.500000000000000000",
            "0.334000000000000000",
        ))
        .unwrap();
        assert!((p.quorum - 0.3).abs() < 1e-12);
        assert!((p.threshold - 0.5).abs() < 1e-12);
        assert!((p.veto_threshold - 0.334).abs() < 1e-12);
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(TallyParams::new(1.5, 0.5, 0.3).is_err());
        assert!(TallyParams::new(0.3, -0.1, 0.3).is_err());
    }

    #[test]
    fn unusable_tally_falls_back() {
        let params = GovParams::from_raw(
            RawVotingParams {
                voting_period: "604800s".into(),
            },
            RawDepositParams::default(),
            &raw_tally("", "abc", "0.3"),
            TallyParams::default(),
        );
        assert_eq!(params.tally, TallyParams::default());
        assert_eq!(params.voting_period_secs(), Some(604_800));
    }
}
