//! govlens data service: the one place that wires the chain client, the
//! caches and the governance engines together.
//!
//! The service:
//! - Ranks the bonded validator set on every call
//! - Serves governance params and the staked pool from a 5-minute cache
//! - Pages through the proposal listing, normalizes and tallies it
//! - Keeps a long-lived snapshot of the proposal page for instant loads
//! - Refines a single proposal against its live tally

pub mod config;
pub mod error;
pub mod logging;
pub mod page_cache;
pub mod service;
pub mod tracing_spans;

pub use config::ServiceConfig;
pub use error::ServiceError;
pub use logging::{init_logging, LogFormat};
pub use page_cache::{PageCache, PageSnapshot};
pub use service::{GovernanceService, PageLoad, ProposalDetail};
