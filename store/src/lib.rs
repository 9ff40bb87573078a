//! Cache storage for govlens.
//!
//! Every storage backend (LMDB, in-memory for testing) implements
//! [`CacheBackend`]. The rest of the codebase talks to [`TtlCache`], which
//! layers timestamped, expiring JSON entries on top of any backend.

pub mod backend;
pub mod error;
pub mod ttl;

pub use backend::CacheBackend;
pub use error::StoreError;
pub use ttl::TtlCache;
