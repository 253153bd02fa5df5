//! Sharded Cache
//!
//! [`ShardedCache`] spreads keys over a fixed array of independent
//! [`Shard`]s. It owns no lock of its own: every call is hashed to exactly
//! one shard and forwarded unchanged, so calls that land on different shards
//! never contend.
//!
//! ```text
//!                  key ──► FNV-1a ──► % shard_count
//!                                          │
//!          ┌────────────┬────────────┬─────┴──────┐
//!          ▼            ▼            ▼            ▼
//!     ┌─────────┐  ┌─────────┐  ┌─────────┐  ┌─────────┐
//!     │ Shard 0 │  │ Shard 1 │  │ Shard 2 │  │ Shard N │
//!     │ sweeper │  │ sweeper │  │ sweeper │  │ sweeper │
//!     └─────────┘  └─────────┘  └─────────┘  └─────────┘
//! ```
//!
//! There is no cross-shard consistency: `flush` clears shards one after the
//! other and `len` adds up per-shard counts without a global lock.

use crate::config::{CacheConfig, Ttl};
use crate::error::{ConfigError, Result};
use crate::storage::shard::{Shard, ShardStats};
use fnv::FnvHasher;
use std::hash::Hasher;
use std::time::{Duration, Instant};
use tracing::debug;

/// A cache partitioned over independently locked shards.
///
/// # Example
///
/// ```
/// use shardcache::{ShardedCache, Ttl};
/// use std::time::Duration;
///
/// // 16 shards, 5 minute default TTL, sweep every 10 minutes
/// let cache = ShardedCache::new(
///     16,
///     Some(Duration::from_secs(5 * 60)),
///     Some(Duration::from_secs(10 * 60)),
/// )
/// .unwrap();
///
/// cache.add("key", "value", Duration::from_secs(5 * 60)).unwrap();
/// assert_eq!(cache.get("key"), Some("value"));
///
/// cache.delete("key").unwrap();
/// cache.flush();
/// assert!(cache.is_empty());
/// ```
pub struct ShardedCache<V> {
    shards: Box<[Shard<V>]>,
}

impl<V> std::fmt::Debug for ShardedCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShardedCache")
            .field("shards", &self.shards.len())
            .finish()
    }
}

impl<V: Clone + Send + Sync + 'static> ShardedCache<V> {
    /// Creates `shard_count` identically configured shards.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroShards`] if `shard_count` is zero.
    pub fn new(
        shard_count: usize,
        default_ttl: Option<Duration>,
        sweep_interval: Option<Duration>,
    ) -> Result<Self, ConfigError> {
        Self::with_config(CacheConfig {
            default_ttl,
            sweep_interval,
            shard_count,
        })
    }

    /// Creates a sharded cache from a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroShards`] if the shard count is zero.
    pub fn with_config(config: CacheConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let shards = (0..config.shard_count)
            .map(|_| Shard::with_config(&config))
            .collect::<Vec<_>>()
            .into_boxed_slice();

        debug!(
            shards = config.shard_count,
            default_ttl = ?config.effective_default_ttl(),
            sweep_interval = ?config.effective_sweep_interval(),
            "Sharded cache created"
        );

        Ok(Self { shards })
    }

    /// Determines which shard a key belongs to.
    #[inline]
    pub fn shard_index(&self, key: &str) -> usize {
        let mut hasher = FnvHasher::default();
        hasher.write(key.as_bytes());
        (hasher.finish() % self.shards.len() as u64) as usize
    }

    /// Gets the shard for a given key.
    #[inline]
    pub fn shard_for(&self, key: &str) -> &Shard<V> {
        &self.shards[self.shard_index(key)]
    }

    /// See [`Shard::get`].
    pub fn get(&self, key: &str) -> Option<V> {
        self.shard_for(key).get(key)
    }

    /// See [`Shard::get_with_expiration`].
    pub fn get_with_expiration(&self, key: &str) -> Option<(V, Option<Instant>)> {
        self.shard_for(key).get_with_expiration(key)
    }

    /// See [`Shard::add`].
    pub fn add(&self, key: impl Into<String>, value: V, ttl: impl Into<Ttl>) -> Result<()> {
        let key = key.into();
        self.shard_for(&key).add(key, value, ttl)
    }

    /// See [`Shard::set`].
    pub fn set(&self, key: impl Into<String>, value: V, ttl: impl Into<Ttl>) {
        let key = key.into();
        self.shard_for(&key).set(key, value, ttl)
    }

    /// See [`Shard::delete`].
    pub fn delete(&self, key: &str) -> Result<()> {
        self.shard_for(key).delete(key)
    }

    /// Flushes every shard in turn. Not atomic across shards.
    pub fn flush(&self) {
        for shard in self.shards.iter() {
            shard.flush();
        }
    }

    /// Sum of the per-shard lengths. Approximate under concurrent writes.
    pub fn len(&self) -> usize {
        self.shards.iter().map(Shard::len).sum()
    }

    /// Returns true if every shard is empty.
    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(Shard::is_empty)
    }

    /// Number of shards.
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Iterates over the shards in index order.
    pub fn shards(&self) -> impl Iterator<Item = &Shard<V>> {
        self.shards.iter()
    }

    /// Statistics summed over all shards.
    pub fn stats(&self) -> ShardStats {
        self.shards.iter().fold(ShardStats::default(), |mut total, shard| {
            total.merge(shard.stats());
            total
        })
    }
}
