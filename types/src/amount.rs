//! Token amounts as reported by the chain.
//!
//! The LCD encodes every amount as a decimal string in the smallest
//! denomination (1 LUNC = 1_000_000 uluna). Sums of vote totals on an active
//! chain routinely exceed 2^53, so amounts are held as arbitrary-precision
//! unsigned integers and only converted to `f64` at the final division.

use num::{BigUint, ToPrimitive, Zero};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

use crate::error::TypesError;

/// Smallest-denomination units per display unit (uluna per LUNC).
pub const MICRO_PER_UNIT: u64 = 1_000_000;

/// An on-chain token amount in the smallest denomination.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenAmount(BigUint);

impl TokenAmount {
    pub fn zero() -> Self {
        Self(BigUint::zero())
    }

    pub fn from_u128(raw: u128) -> Self {
        Self(BigUint::from(raw))
    }

    /// Parse a decimal integer string. An empty string is zero.
    pub fn parse(s: &str) -> Result<Self, TypesError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Self::zero());
        }
        BigUint::from_str(trimmed)
            .map(Self)
            .map_err(|_| TypesError::InvalidAmount(s.to_string()))
    }

    /// Parse a decimal integer string, treating anything unparsable as zero.
    pub fn parse_or_zero(s: &str) -> Self {
        match Self::parse(s) {
            Ok(amount) => amount,
            Err(_) => {
                tracing::warn!(value = s, "unparsable token amount, using zero");
                Self::zero()
            }
        }
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Lossy conversion for ratios and display. Saturates to infinity.
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(f64::INFINITY)
    }

    /// Amount in display units (e.g. LUNC instead of uluna).
    pub fn to_display_units(&self) -> f64 {
        self.to_f64() / MICRO_PER_UNIT as f64
    }

    /// `self / denominator` as a float; zero when the denominator is zero.
    pub fn ratio_of(&self, denominator: &TokenAmount) -> f64 {
        if denominator.is_zero() {
            0.0
        } else {
            self.to_f64() / denominator.to_f64()
        }
    }

    pub fn raw(&self) -> &BigUint {
        &self.0
    }
}

impl From<u64> for TokenAmount {
    fn from(raw: u64) -> Self {
        Self(BigUint::from(raw))
    }
}

impl FromStr for TokenAmount {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Add for TokenAmount {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl<'a> Add<&'a TokenAmount> for &'a TokenAmount {
    type Output = TokenAmount;
    fn add(self, rhs: &'a TokenAmount) -> TokenAmount {
        TokenAmount(&self.0 + &rhs.0)
    }
}

impl Sum for TokenAmount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a TokenAmount> for TokenAmount {
    fn sum<I: Iterator<Item = &'a TokenAmount>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, x| TokenAmount(acc.0 + &x.0))
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Serialized as a decimal string, matching the LCD wire format.
impl Serialize for TokenAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TokenAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// A denom/amount pair, e.g. a deposit or a minimum-deposit entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    #[serde(default)]
    pub denom: String,
    #[serde(default)]
    pub amount: String,
}

impl Coin {
    pub fn amount(&self) -> TokenAmount {
        TokenAmount::parse_or_zero(&self.amount)
    }
}
