use serde::{Deserialize, Serialize};

use govlens_types::{TokenAmount, Validator};

/// A validator with its share of total bonded stake.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankedValidator {
    #[serde(flatten)]
    pub validator: Validator,
    /// Bonded tokens. Serializes as a decimal string so totals beyond
    /// `u64` and `f64` precision survive the JSON output.
    pub voting_power: TokenAmount,
    /// Share of the summed stake, in percent.
    pub voting_percentage: f64,
}

/// Rank validators by bonded tokens, largest first.
///
/// Unparsable token strings count as zero. Ties keep input order. An empty
/// input yields an empty list; a set whose stake sums to zero gets 0% each.
pub fn rank_validators(validators: Vec<Validator>) -> Vec<RankedValidator> {
    if validators.is_empty() {
        return Vec::new();
    }

    let powers: Vec<TokenAmount> = validators.iter().map(Validator::tokens).collect();
    let total: TokenAmount = powers.iter().sum();
    if total.is_zero() {
        tracing::warn!(count = validators.len(), "validator set has no bonded stake");
    }

    let mut ranked: Vec<RankedValidator> = validators
        .into_iter()
        .zip(powers)
        .map(|(validator, voting_power)| {
            let voting_percentage = voting_power.ratio_of(&total) * 100.0;
            RankedValidator {
                validator,
                voting_power,
                voting_percentage,
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.voting_power.cmp(&a.voting_power));
    ranked
}
