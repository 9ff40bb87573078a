//! LMDB storage backend for govlens.
//!
//! Implements [`govlens_store::CacheBackend`] using the `heed` LMDB bindings,
//! giving the TTL cache persistence across process runs.

pub mod cache;
pub mod environment;
pub mod error;

pub use cache::LmdbCacheBackend;
pub use environment::{LmdbEnvironment, DEFAULT_MAP_SIZE};
pub use error::LmdbError;
