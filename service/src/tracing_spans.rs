//! Pre-built [`tracing::Span`] constructors for service operations.
//!
//! Consistent span names and field sets make the LCD traffic of a single
//! dashboard action easy to filter and correlate.

use tracing::{info_span, Span};

/// Span covering a full walk of the proposal listing.
pub fn proposals_fetch_span(page_limit: u32) -> Span {
    info_span!("proposals_fetch", page_limit = %page_limit)
}

/// Span covering one page of the proposal listing.
pub fn proposal_page_span(page: usize, cursor: Option<&str>) -> Span {
    info_span!("proposal_page", page = %page, cursor = cursor.unwrap_or("-"))
}

/// Span covering the live refinement of a single proposal.
pub fn proposal_detail_span(proposal_id: &str) -> Span {
    info_span!("proposal_detail", id = %proposal_id)
}

/// Span covering a validator-set fetch and ranking.
pub fn validators_span() -> Span {
    info_span!("validators")
}
