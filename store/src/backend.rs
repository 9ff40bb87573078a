//! Raw key-value backend trait.

use std::sync::Arc;

use crate::StoreError;

/// Byte-level persistent storage underneath the TTL cache.
///
/// Implementations: LMDB (`govlens-store-lmdb`) for the real cache and an
/// in-memory map (`govlens-nullables`) for tests.
pub trait CacheBackend {
    /// Retrieve a value. `Ok(None)` when the key is absent.
    fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Store a value, replacing any previous one.
    fn put_raw(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Delete a value. Deleting an absent key is not an error.
    fn delete_raw(&self, key: &str) -> Result<(), StoreError>;
}

impl<T: CacheBackend + ?Sized> CacheBackend for Arc<T> {
    fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get_raw(key)
    }

    fn put_raw(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        (**self).put_raw(key, value)
    }

    fn delete_raw(&self, key: &str) -> Result<(), StoreError> {
        (**self).delete_raw(key)
    }
}
