//! Validator ranking by voting power.

pub mod ranker;

pub use ranker::{rank_validators, RankedValidator};
