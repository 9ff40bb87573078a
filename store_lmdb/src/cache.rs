//! LMDB implementation of CacheBackend.

use std::sync::Arc;

use heed::types::{Bytes, Str};
use heed::{Database, Env};

use govlens_store::{CacheBackend, StoreError};

use crate::LmdbError;

pub struct LmdbCacheBackend {
    pub(crate) env: Arc<Env>,
    pub(crate) cache_db: Database<Str, Bytes>,
}

impl CacheBackend for LmdbCacheBackend {
    fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self
            .cache_db
            .get(&rtxn, key)
            .map_err(LmdbError::from)?
            .map(|bytes| bytes.to_vec());
        Ok(val)
    }

    fn put_raw(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.cache_db
            .put(&mut wtxn, key, value)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn delete_raw(&self, key: &str) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.cache_db
            .delete(&mut wtxn, key)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LmdbEnvironment, DEFAULT_MAP_SIZE};

    fn temp_env() -> (tempfile::TempDir, LmdbEnvironment) {
        let dir = tempfile::tempdir().expect("temp dir");
        let env = LmdbEnvironment::open(dir.path(), DEFAULT_MAP_SIZE).expect("open env");
        (dir, env)
    }

    #[test]
    fn put_get_delete() {
        let (_dir, env) = temp_env();
        let backend = env.cache_backend();

        assert_eq!(backend.get_raw("gov:params").unwrap(), None);
        backend.put_raw("gov:params", b"{\"a\":1}").unwrap();
        assert_eq!(
            backend.get_raw("gov:params").unwrap().as_deref(),
            Some(&b"{\"a\":1}"[..])
        );
        backend.delete_raw("gov:params").unwrap();
        assert_eq!(backend.get_raw("gov:params").unwrap(), None);
    }

    #[test]
    fn deleting_missing_key_is_ok() {
        let (_dir, env) = temp_env();
        assert!(env.cache_backend().delete_raw("absent").is_ok());
    }

    #[test]
    fn survives_reopen() {
        let dir = tempfile::tempdir().expect("temp dir");
        {
            let env = LmdbEnvironment::open(dir.path(), DEFAULT_MAP_SIZE).unwrap();
            env.cache_backend().put_raw("page:proposals", b"[]").unwrap();
        }
        let env = LmdbEnvironment::open(dir.path(), DEFAULT_MAP_SIZE).unwrap();
        assert_eq!(
            env.cache_backend().get_raw("page:proposals").unwrap().as_deref(),
            Some(&b"[]"[..])
        );
    }
}
