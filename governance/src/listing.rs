//! Ordering, grouping and client-side paging of proposal lists.

use govlens_types::Proposal;

/// Sort by numeric id, newest (highest) first.
pub fn sort_newest_first(proposals: &mut [Proposal]) {
    proposals.sort_by(|a, b| b.numeric_id().cmp(&a.numeric_id()));
}

/// Split into (proposals in voting period, everything else), keeping order.
pub fn split_active(proposals: Vec<Proposal>) -> (Vec<Proposal>, Vec<Proposal>) {
    proposals
        .into_iter()
        .partition(|p| p.status.is_active())
}

/// 1-based page arithmetic over a list of known length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Paginator {
    per_page: usize,
    total_items: usize,
}

impl Paginator {
    /// `per_page` is clamped to at least 1.
    pub fn new(per_page: usize, total_items: usize) -> Self {
        Self {
            per_page: per_page.max(1),
            total_items,
        }
    }

    pub fn page_count(&self) -> usize {
        self.total_items.div_ceil(self.per_page)
    }

    /// Clamp a requested page into `1..=page_count` (1 for an empty list).
    pub fn clamp(&self, page: usize) -> usize {
        page.clamp(1, self.page_count().max(1))
    }

    pub fn prev(&self, page: usize) -> usize {
        self.clamp(page.saturating_sub(1))
    }

    pub fn next(&self, page: usize) -> usize {
        self.clamp(page.saturating_add(1))
    }

    /// Whether paging controls are needed at all.
    pub fn needs_paging(&self) -> bool {
        self.total_items > self.per_page
    }

    /// The items on `page` (clamped).
    pub fn slice<'a, T>(&self, items: &'a [T], page: usize) -> &'a [T] {
        let page = self.clamp(page);
        let start = ((page - 1) * self.per_page).min(items.len());
        let end = (start + self.per_page).min(items.len());
        &items[start..end]
    }
}
