//! Nullable store: thread-safe in-memory cache backend for testing.

use govlens_store::{CacheBackend, StoreError};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// An in-memory [`CacheBackend`].
///
/// Writes can be made to fail to exercise the "cache write failure is not
/// fatal" paths.
#[derive(Default)]
pub struct NullCacheBackend {
    entries: Mutex<HashMap<String, Vec<u8>>>,
    fail_writes: AtomicBool,
}

impl NullCacheBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `put_raw` fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a fully-qualified key (`namespace:key`) is present.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().unwrap().contains_key(key)
    }

    /// Drop everything.
    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }
}

impl CacheBackend for NullCacheBackend {
    fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn put_raw(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("null backend: writes disabled".into()));
        }
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete_raw(&self, key: &str) -> Result<(), StoreError> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}
