//! Single-Lock Cache Shard
//!
//! A [`Shard`] is the base unit of the cache: one `HashMap` of entries plus
//! the deadline index, both behind a single `RwLock`, and at most one
//! background sweeper.
//!
//! ## Concurrency Model
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │                  Shard                   │
//! │  ┌────────────────────────────────────┐  │
//! │  │ RwLock                             │  │
//! │  │   entries:  HashMap<String, Entry> │  │
//! │  │   expiring: ExpiryIndex            │  │
//! │  └────────────────────────────────────┘  │
//! └──────────────────────────────────────────┘
//!          ▲ read: get, len         ▲ write: add, set, delete,
//!          │                        │        flush, sweep
//! ```
//!
//! Readers share the lock; writers and the sweep hold it exclusively. Only
//! the sweep holds it for longer than a single map operation.

use crate::config::{CacheConfig, Ttl};
use crate::error::{CacheError, Result};
use crate::storage::expiry::{spawn_sweeper, ExpiryIndex, Sweep};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// A stored value with its expiry deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<V> {
    /// The value stored
    pub value: V,
    /// When this entry expires (None = never expires)
    pub expires_at: Option<Instant>,
}

impl<V> Entry<V> {
    /// Creates an entry with an already-resolved deadline.
    pub fn new(value: V, expires_at: Option<Instant>) -> Self {
        Self { value, expires_at }
    }

    /// Checks whether this entry had expired at `now`.
    ///
    /// An entry expires strictly after its deadline; a never-expiring entry
    /// is never expired.
    #[inline]
    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.expires_at.map(|exp| exp < now).unwrap_or(false)
    }

    /// Returns the time left before the deadline, or None if no expiry.
    pub fn remaining_ttl(&self) -> Option<Duration> {
        self.expires_at
            .map(|exp| exp.saturating_duration_since(Instant::now()))
    }
}

/// Point-in-time counters for a shard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShardStats {
    /// Entries currently stored, including expired ones not yet swept
    pub entries: usize,
    /// Entries with a finite deadline
    pub tracked: usize,
    /// Sweeps completed
    pub sweeps: u64,
    /// Entries removed by sweeps
    pub expired: u64,
}

impl ShardStats {
    /// Adds another shard's counters to these.
    pub fn merge(&mut self, other: ShardStats) {
        self.entries += other.entries;
        self.tracked += other.tracked;
        self.sweeps += other.sweeps;
        self.expired += other.expired;
    }
}

/// Everything the shard lock protects.
#[derive(Debug)]
struct ShardState<V> {
    entries: HashMap<String, Entry<V>>,
    expiring: ExpiryIndex,
}

impl<V> ShardState<V> {
    fn new() -> Self {
        Self {
            entries: HashMap::new(),
            expiring: ExpiryIndex::new(),
        }
    }

    /// Stores `entry` under `key`, keeping the deadline index in step.
    fn insert(&mut self, key: String, entry: Entry<V>) {
        if let Some(old_deadline) = self.entries.get(&key).and_then(|old| old.expires_at) {
            self.expiring.untrack(&key, old_deadline);
        }
        if let Some(deadline) = entry.expires_at {
            self.expiring.track(&key, deadline);
        }
        self.entries.insert(key, entry);
    }

    fn remove(&mut self, key: &str) -> Option<Entry<V>> {
        let entry = self.entries.remove(key)?;
        if let Some(deadline) = entry.expires_at {
            self.expiring.untrack(key, deadline);
        }
        Some(entry)
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.expiring.clear();
    }

    /// Removes every entry whose deadline is strictly before `now`.
    fn remove_expired(&mut self, now: Instant) -> usize {
        let mut removed = 0;

        while let Some((deadline, key)) = self.expiring.pop_due(now) {
            let due = self
                .entries
                .get(&key)
                .map(|entry| entry.expires_at == Some(deadline))
                .unwrap_or(false);

            if due {
                self.entries.remove(&key);
                removed += 1;
            }
        }

        removed
    }
}

/// Shared state of a shard; the sweeper holds a weak reference to it.
struct ShardInner<V> {
    default_ttl: Option<Duration>,
    sweep_interval: Option<Duration>,
    state: RwLock<ShardState<V>>,
    sweeps: AtomicU64,
    expired: AtomicU64,
}

impl<V> ShardInner<V> {
    // Every critical section leaves the state consistent, so a panic in
    // another holder does not invalidate it.
    fn read(&self) -> RwLockReadGuard<'_, ShardState<V>> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ShardState<V>> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn sweep_at(&self, now: Instant) -> usize {
        let (removed, remaining) = {
            let mut state = self.write();
            let removed = state.remove_expired(now);
            (removed, state.entries.len())
        };

        self.sweeps.fetch_add(1, Ordering::Relaxed);
        if removed > 0 {
            self.expired.fetch_add(removed as u64, Ordering::Relaxed);
            debug!(
                expired = removed,
                remaining = remaining,
                "Expired entries cleaned up"
            );
        } else {
            trace!(remaining = remaining, "Sweep found nothing to expire");
        }

        removed
    }
}

impl<V: Send + Sync + 'static> Sweep for ShardInner<V> {
    fn sweep(&self) -> usize {
        self.sweep_at(Instant::now())
    }
}

/// An independent, lock-protected cache partition.
///
/// # Example
///
/// ```
/// use shardcache::{Shard, Ttl};
/// use std::time::Duration;
///
/// let shard = Shard::new(Some(Duration::from_secs(300)), None);
///
/// shard.set("name", "Ariz", Ttl::Never);
/// assert_eq!(shard.get("name"), Some("Ariz"));
///
/// assert!(shard.add("name", "someone else", Ttl::Default).is_err());
/// assert!(shard.delete("name").is_ok());
/// assert!(shard.is_empty());
/// ```
pub struct Shard<V> {
    inner: Arc<ShardInner<V>>,
}

impl<V> std::fmt::Debug for Shard<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shard")
            .field("entries", &self.inner.read().entries.len())
            .field("default_ttl", &self.inner.default_ttl)
            .field("sweep_interval", &self.inner.sweep_interval)
            .finish()
    }
}

impl<V: Clone + Send + Sync + 'static> Default for Shard<V> {
    fn default() -> Self {
        Self::with_config(&CacheConfig::default())
    }
}

impl<V: Clone + Send + Sync + 'static> Shard<V> {
    /// Creates a shard with the given default TTL and sweep interval.
    ///
    /// `None` for `default_ttl` makes [`Ttl::Default`] entries immortal; a
    /// zero `default_ttl` falls back to [`DEFAULT_TTL`](crate::DEFAULT_TTL).
    /// `None` or zero for `sweep_interval` means no sweeper is started.
    pub fn new(default_ttl: Option<Duration>, sweep_interval: Option<Duration>) -> Self {
        Self::with_config(&CacheConfig {
            default_ttl,
            sweep_interval,
            ..CacheConfig::default()
        })
    }

    /// Creates a shard from a configuration. The shard count is ignored.
    pub fn with_config(config: &CacheConfig) -> Self {
        let inner = Arc::new(ShardInner {
            default_ttl: config.effective_default_ttl(),
            sweep_interval: config.effective_sweep_interval(),
            state: RwLock::new(ShardState::new()),
            sweeps: AtomicU64::new(0),
            expired: AtomicU64::new(0),
        });

        if let Some(period) = inner.sweep_interval {
            spawn_sweeper(Arc::downgrade(&inner), period);
        }

        Self { inner }
    }

    /// Gets a copy of the value stored under `key`.
    ///
    /// Deadlines are not checked here: an expired entry stays visible until a
    /// sweep removes it.
    pub fn get(&self, key: &str) -> Option<V> {
        let state = self.inner.read();
        state.entries.get(key).map(|entry| entry.value.clone())
    }

    /// Like [`get`](Self::get), but also returns the entry's deadline
    /// (`None` = never expires).
    pub fn get_with_expiration(&self, key: &str) -> Option<(V, Option<Instant>)> {
        let state = self.inner.read();
        state
            .entries
            .get(key)
            .map(|entry| (entry.value.clone(), entry.expires_at))
    }

    /// Stores `value` under `key` only if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::AlreadyExists`] without touching the stored
    /// entry if `key` is present.
    pub fn add(&self, key: impl Into<String>, value: V, ttl: impl Into<Ttl>) -> Result<()> {
        let key = key.into();
        let mut state = self.inner.write();

        if state.entries.contains_key(&key) {
            return Err(CacheError::AlreadyExists(key));
        }

        let entry = self.entry(value, ttl.into());
        state.insert(key, entry);
        Ok(())
    }

    /// Stores `value` under `key`, replacing any existing entry.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: impl Into<Ttl>) {
        let key = key.into();
        let entry = self.entry(value, ttl.into());
        self.inner.write().insert(key, entry);
    }

    /// Removes `key`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::NotFound`] if `key` is absent.
    pub fn delete(&self, key: &str) -> Result<()> {
        match self.inner.write().remove(key) {
            Some(_) => Ok(()),
            None => Err(CacheError::NotFound(key.to_owned())),
        }
    }

    /// Removes every entry.
    pub fn flush(&self) {
        self.inner.write().clear();
    }

    /// Returns the number of stored entries, counting expired entries that
    /// have not been swept yet.
    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    /// Returns true if the shard holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks whether `key` is stored.
    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.read().entries.contains_key(key)
    }

    /// The TTL applied by [`Ttl::Default`] (None = never expire).
    pub fn default_ttl(&self) -> Option<Duration> {
        self.inner.default_ttl
    }

    /// The sweep interval, or None if this shard has no sweeper.
    pub fn sweep_interval(&self) -> Option<Duration> {
        self.inner.sweep_interval
    }

    /// Returns shard statistics.
    pub fn stats(&self) -> ShardStats {
        let (entries, tracked) = {
            let state = self.inner.read();
            (state.entries.len(), state.expiring.len())
        };

        ShardStats {
            entries,
            tracked,
            sweeps: self.inner.sweeps.load(Ordering::Relaxed),
            expired: self.inner.expired.load(Ordering::Relaxed),
        }
    }

    fn entry(&self, value: V, ttl: Ttl) -> Entry<V> {
        Entry::new(value, ttl.deadline(Instant::now(), self.inner.default_ttl))
    }
}
