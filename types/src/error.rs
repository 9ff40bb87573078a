//! Errors raised while decoding chain data.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TypesError {
    #[error("invalid token amount: {0:?}")]
    InvalidAmount(String),

    #[error("invalid {name}: {value:?} is not a fraction in [0, 1]")]
    InvalidFraction { name: &'static str, value: String },

    #[error("malformed record: {0}")]
    MalformedRecord(String),
}
