//! Expiring JSON cache over a [`CacheBackend`].
//!
//! Entries are stored as `{"timestamp": <epoch-ms>, "data": <payload>}` under
//! `<namespace>:<key>`. An entry is valid while `now - timestamp < ttl`.
//! Expired or undecodable entries are evicted on read and reported as a
//! miss; reads never fail.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use govlens_types::{Clock, Timestamp};

use crate::{CacheBackend, StoreError};

#[derive(Serialize)]
struct EntryRef<'a, T> {
    timestamp: Timestamp,
    data: &'a T,
}

#[derive(Deserialize)]
struct Entry<T> {
    timestamp: Timestamp,
    data: T,
}

pub struct TtlCache<B, C> {
    backend: B,
    clock: C,
    namespace: String,
    ttl: Duration,
}

impl<B: CacheBackend, C: Clock> TtlCache<B, C> {
    pub fn new(backend: B, clock: C, namespace: impl Into<String>, ttl: Duration) -> Self {
        Self {
            backend,
            clock,
            namespace: namespace.into(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}:{}", self.namespace, key)
    }

    /// Fetch a live entry, evicting it if expired or corrupt.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let full_key = self.full_key(key);
        let bytes = match self.backend.get_raw(&full_key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key = %full_key, error = %e, "cache read failed");
                return None;
            }
        };

        let entry: Entry<T> = match serde_json::from_slice(&bytes) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(key = %full_key, error = %e, "corrupt cache entry, evicting");
                self.evict_full(&full_key);
                return None;
            }
        };

        let now = self.clock.now();
        if !entry.timestamp.is_fresh(self.ttl.as_millis() as u64, now) {
            tracing::debug!(key = %full_key, age_ms = entry.timestamp.elapsed_since(now), "cache entry expired");
            self.evict_full(&full_key);
            return None;
        }
        Some(entry.data)
    }

    /// Store `data` stamped with the current time, replacing any entry.
    pub fn set<T: Serialize>(&self, key: &str, data: &T) -> Result<(), StoreError> {
        let entry = EntryRef {
            timestamp: self.clock.now(),
            data,
        };
        let bytes = serde_json::to_vec(&entry)?;
        self.backend.put_raw(&self.full_key(key), &bytes)
    }

    /// Remove an entry.
    pub fn evict(&self, key: &str) {
        self.evict_full(&self.full_key(key));
    }

    fn evict_full(&self, full_key: &str) {
        if let Err(e) = self.backend.delete_raw(full_key) {
            tracing::warn!(key = %full_key, error = %e, "cache eviction failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryBackend {
        map: Mutex<HashMap<String, Vec<u8>>>,
    }

    impl CacheBackend for MemoryBackend {
        fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
            Ok(self.map.lock().unwrap().get(key).cloned())
        }

        fn put_raw(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
            self.map
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_vec());
            Ok(())
        }

        fn delete_raw(&self, key: &str) -> Result<(), StoreError> {
            self.map.lock().unwrap().remove(key);
            Ok(())
        }
    }

    struct TestClock(Cell<u64>);

    impl Clock for TestClock {
        fn now(&self) -> Timestamp {
            Timestamp::from_millis(self.0.get())
        }
    }

    fn cache() -> TtlCache<MemoryBackend, TestClock> {
        TtlCache::new(
            MemoryBackend::default(),
            TestClock(Cell::new(1_000)),
            "gov",
            Duration::from_secs(300),
        )
    }

    #[test]
    fn set_then_get_returns_value() {
        let cache = cache();
        cache.set("params", &vec![1u32, 2, 3]).unwrap();
        assert_eq!(cache.get::<Vec<u32>>("params"), Some(vec![1, 2, 3]));
    }

    #[test]
    fn expired_entry_is_evicted_and_stays_gone() {
        let cache = cache();
        cache.set("params", &"v").unwrap();
        cache.clock.0.set(1_000 + 300_000);
        assert_eq!(cache.get::<String>("params"), None);
        assert!(cache.backend.get_raw("gov:params").unwrap().is_none());
        cache.clock.0.set(1_000);
        assert_eq!(cache.get::<String>("params"), None);
    }

    #[test]
    fn entry_just_before_ttl_is_live() {
        let cache = cache();
        cache.set("params", &7u8).unwrap();
        cache.clock.0.set(1_000 + 299_999);
        assert_eq!(cache.get::<u8>("params"), Some(7));
    }

    #[test]
    fn corrupt_entry_is_a_miss_and_evicted() {
        let cache = cache();
        cache.backend.put_raw("gov:params", b"{not json").unwrap();
        assert_eq!(cache.get::<u8>("params"), None);
        assert!(cache.backend.get_raw("gov:params").unwrap().is_none());
    }

    #[test]
    fn wrong_payload_shape_is_a_miss() {
        let cache = cache();
        cache.set("params", &"text").unwrap();
        assert_eq!(cache.get::<u64>("params"), None);
    }

    #[test]
    fn keys_are_namespaced() {
        let cache = cache();
        cache.set("proposals", &1u8).unwrap();
        assert!(cache.backend.get_raw("gov:proposals").unwrap().is_some());
        let raw = cache.backend.get_raw("gov:proposals").unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(value["timestamp"], 1_000);
        assert_eq!(value["data"], 1);
    }

    #[test]
    fn set_overwrites_with_fresh_timestamp() {
        let cache = cache();
        cache.set("k", &1u8).unwrap();
        cache.clock.0.set(200_000);
        cache.set("k", &2u8).unwrap();
        cache.clock.0.set(400_000);
        assert_eq!(cache.get::<u8>("k"), Some(2));
    }
}
