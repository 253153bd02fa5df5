//! Error types for cache operations and construction.
//!
//! Every error here is locally recoverable: a failed `add` or `delete`
//! leaves the shard exactly as it was, and a bad configuration is rejected
//! before any shard or sweeper exists.

use thiserror::Error;

/// Errors returned by mutating cache operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// `add` was called with a key that is already stored.
    ///
    /// Use `set` when overwriting is intended.
    #[error("entry {0:?} already exists in cache")]
    AlreadyExists(String),

    /// `delete` was called with a key that is not stored.
    #[error("could not find key {0:?} in cache")]
    NotFound(String),
}

/// Errors detected while building a cache from its configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A sharded cache needs at least one shard to route keys to.
    #[error("shard count must be at least 1")]
    ZeroShards,
}

/// Result alias for cache operations.
pub type Result<T, E = CacheError> = std::result::Result<T, E>;
