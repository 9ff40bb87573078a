//! Long-lived snapshot of the proposal page.
//!
//! Stored as `{"proposals": [...], "timestamp": <epoch-ms>}` under
//! `page:proposals`. A snapshot younger than the stale TTL is served
//! immediately on load while a fresh listing is fetched behind it.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use govlens_store::{CacheBackend, StoreError};
use govlens_types::{Clock, Proposal, Timestamp};

const PAGE_KEY: &str = "page:proposals";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PageSnapshot {
    pub proposals: Vec<Proposal>,
    pub timestamp: Timestamp,
}

impl PageSnapshot {
    pub fn age_millis(&self, now: Timestamp) -> u64 {
        self.timestamp.elapsed_since(now)
    }
}

pub struct PageCache<B, C> {
    backend: B,
    clock: C,
    max_age: Duration,
}

impl<B: CacheBackend, C: Clock> PageCache<B, C> {
    pub fn new(backend: B, clock: C, max_age: Duration) -> Self {
        Self {
            backend,
            clock,
            max_age,
        }
    }

    /// The stored snapshot if it is younger than `max_age`. Older or
    /// undecodable snapshots are removed.
    pub fn load(&self) -> Option<PageSnapshot> {
        let bytes = match self.backend.get_raw(PAGE_KEY) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "page snapshot read failed");
                return None;
            }
        };

        let snapshot: PageSnapshot = match serde_json::from_slice(&bytes) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(error = %e, "corrupt page snapshot, discarding");
                self.clear();
                return None;
            }
        };

        let now = self.clock.now();
        if !snapshot.timestamp.is_fresh(self.max_age.as_millis() as u64, now) {
            tracing::debug!(age_ms = snapshot.age_millis(now), "page snapshot too old");
            self.clear();
            return None;
        }
        Some(snapshot)
    }

    /// Replace the snapshot with `proposals`, stamped now.
    pub fn save(&self, proposals: &[Proposal]) -> Result<Timestamp, StoreError> {
        let timestamp = self.clock.now();
        #[derive(Serialize)]
        struct SnapshotRef<'a> {
            proposals: &'a [Proposal],
            timestamp: Timestamp,
        }
        let bytes = serde_json::to_vec(&SnapshotRef {
            proposals,
            timestamp,
        })?;
        self.backend.put_raw(PAGE_KEY, &bytes)?;
        Ok(timestamp)
    }

    pub fn clear(&self) {
        if let Err(e) = self.backend.delete_raw(PAGE_KEY) {
            tracing::warn!(error = %e, "page snapshot removal failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use govlens_nullables::{NullCacheBackend, NullClock};
    use govlens_types::{ProposalContent, ProposalStatus, TallyResult};
    use std::sync::Arc;

    const DAY_MS: u64 = 24 * 60 * 60 * 1000;

    fn proposal(id: &str) -> Proposal {
        Proposal {
            proposal_id: id.to_string(),
            content: ProposalContent {
                type_url: None,
                title: "T".into(),
                description: "D".into(),
            },
            status: ProposalStatus::Passed,
            final_tally_result: TallyResult::default(),
            submit_time: None,
            deposit_end_time: None,
            voting_start_time: None,
            voting_end_time: None,
            total_deposit: Vec::new(),
            proposer: None,
        }
    }

    fn cache() -> (
        Arc<NullCacheBackend>,
        Arc<NullClock>,
        PageCache<Arc<NullCacheBackend>, Arc<NullClock>>,
    ) {
        let backend = Arc::new(NullCacheBackend::new());
        let clock = Arc::new(NullClock::new(1_000));
        let pages = PageCache::new(
            backend.clone(),
            clock.clone(),
            Duration::from_millis(DAY_MS),
        );
        (backend, clock, pages)
    }

    #[test]
    fn snapshot_layout() {
        let (backend, _clock, pages) = cache();
        pages.save(&[proposal("1")]).unwrap();
        let raw = backend.get_raw(PAGE_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(value["timestamp"], 1_000);
        assert_eq!(value["proposals"][0]["proposal_id"], "1");
    }

    #[test]
    fn served_until_a_day_old() {
        let (backend, clock, pages) = cache();
        pages.save(&[proposal("1")]).unwrap();
        clock.advance_ms(DAY_MS - 1);
        assert_eq!(pages.load().unwrap().proposals.len(), 1);
        clock.advance_ms(1);
        assert!(pages.load().is_none());
        assert!(backend.is_empty());
    }

    #[test]
    fn corrupt_snapshot_is_discarded() {
        let (backend, _clock, pages) = cache();
        backend.put_raw(PAGE_KEY, b"[]").unwrap();
        assert!(pages.load().is_none());
        assert!(!backend.contains(PAGE_KEY));
    }
}
