//! Validator records as served by `/cosmos/staking/v1beta1/validators`.

use serde::{Deserialize, Serialize};

use crate::amount::TokenAmount;
use crate::de::null_default;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorDescription {
    #[serde(default, deserialize_with = "null_default")]
    pub moniker: String,
    #[serde(default, deserialize_with = "null_default")]
    pub identity: String,
    #[serde(default, deserialize_with = "null_default")]
    pub website: String,
    #[serde(default, deserialize_with = "null_default")]
    pub security_contact: String,
    #[serde(default, deserialize_with = "null_default")]
    pub details: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionRates {
    #[serde(default, deserialize_with = "null_default")]
    pub rate: String,
    #[serde(default, deserialize_with = "null_default")]
    pub max_rate: String,
    #[serde(default, deserialize_with = "null_default")]
    pub max_change_rate: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commission {
    #[serde(default, deserialize_with = "null_default")]
    pub commission_rates: CommissionRates,
    #[serde(default, deserialize_with = "null_default")]
    pub update_time: String,
}

/// A bonded validator.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validator {
    pub operator_address: String,
    #[serde(default, deserialize_with = "null_default")]
    pub description: ValidatorDescription,
    #[serde(default)]
    pub jailed: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_default")]
    pub tokens: String,
    #[serde(default, deserialize_with = "null_default")]
    pub delegator_shares: String,
    #[serde(default, deserialize_with = "null_default")]
    pub commission: Commission,
    #[serde(default, deserialize_with = "null_default")]
    pub min_self_delegation: String,
}

impl Validator {
    pub fn tokens(&self) -> TokenAmount {
        TokenAmount::parse_or_zero(&self.tokens)
    }

    /// Current commission rate as a fraction, zero if unparsable.
    pub fn commission_rate(&self) -> f64 {
        self.commission
            .commission_rates
            .rate
            .trim()
            .parse()
            .unwrap_or(0.0)
    }

    /// Moniker, falling back to the operator address.
    pub fn display_name(&self) -> &str {
        if self.description.moniker.trim().is_empty() {
            &self.operator_address
        } else {
            &self.description.moniker
        }
    }
}

/// Body of the validators listing.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ValidatorsResponse {
    #[serde(default, deserialize_with = "null_default")]
    pub validators: Vec<Validator>,
}

/// Body of `/cosmos/staking/v1beta1/pool`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PoolResponse {
    #[serde(default)]
    pub pool: RawPool,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawPool {
    #[serde(default, deserialize_with = "null_default")]
    pub not_bonded_tokens: String,
    #[serde(default, deserialize_with = "null_default")]
    pub bonded_tokens: String,
}
