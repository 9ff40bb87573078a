//! Governance data shaping for govlens.
//!
//! - [`engine`]: tally engine (participation, pass/veto ratios, reached flags)
//! - [`proposal`]: normalizer from either LCD proposal schema
//! - [`verdict`] / [`breakdown`]: presentation summaries of a tally
//! - [`listing`]: ordering, active/past split and client-side paging
//!
//! Key principle: vote totals are summed as big integers; floats appear only
//! in final ratios.

pub mod breakdown;
pub mod engine;
pub mod listing;
pub mod proposal;
pub mod verdict;

pub use breakdown::VoteBreakdown;
pub use engine::{TallyEngine, TallyReport};
pub use listing::{sort_newest_first, split_active, Paginator};
pub use proposal::{apply_tally, normalize, resolve_content, NO_DESCRIPTION, NO_TITLE};
pub use verdict::VotingVerdict;
