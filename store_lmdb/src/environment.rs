//! LMDB environment setup.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use heed::types::{Bytes, Str};
use heed::{Database, Env, EnvOpenOptions};

use crate::cache::LmdbCacheBackend;
use crate::LmdbError;

/// Name of the single database holding cache entries.
const CACHE_DB_NAME: &str = "cache";

/// Default map size: plenty for a proposal list and parameter sets.
pub const DEFAULT_MAP_SIZE: usize = 64 * 1024 * 1024;

/// Wraps the LMDB environment and the cache database handle.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    cache_db: Database<Str, Bytes>,
    path: PathBuf,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given directory.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path).map_err(|e| LmdbError::Io(e.to_string()))?;

        // SAFETY: the environment directory is owned by this process; no other
        // code maps the same files with incompatible options.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(1)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let cache_db: Database<Str, Bytes> = env.create_database(&mut wtxn, Some(CACHE_DB_NAME))?;
        wtxn.commit()?;

        tracing::debug!(path = %path.display(), "opened LMDB cache environment");

        Ok(Self {
            env: Arc::new(env),
            cache_db,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A cache backend sharing this environment.
    pub fn cache_backend(&self) -> LmdbCacheBackend {
        LmdbCacheBackend {
            env: Arc::clone(&self.env),
            cache_db: self.cache_db,
        }
    }
}
