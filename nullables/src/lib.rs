//! Nullable infrastructure for deterministic testing.
//!
//! Every external dependency of the service (clock, chain API, cache
//! storage) sits behind a trait. This crate provides test-friendly
//! implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod chain;
pub mod clock;
pub mod store;

pub use chain::{ChainRequest, NullChainApi};
pub use clock::NullClock;
pub use store::NullCacheBackend;
