//! Cache Configuration
//!
//! Construction-time settings shared by every shard of a cache, plus the
//! per-call [`Ttl`] override.
//!
//! ## Example
//!
//! ```
//! use shardcache::CacheConfig;
//! use std::time::Duration;
//!
//! let config = CacheConfig::default()
//!     .with_default_ttl(Duration::from_secs(300))
//!     .with_sweep_interval(Duration::from_secs(600))
//!     .with_shard_count(32);
//!
//! assert!(config.validate().is_ok());
//! ```

use crate::error::ConfigError;
use std::time::{Duration, Instant};

/// TTL used when a cache is configured with a zero default TTL.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Interval between background sweeps when none is configured.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Number of shards a [`ShardedCache`](crate::ShardedCache) gets by default.
pub const DEFAULT_SHARD_COUNT: usize = 16;

/// Per-call time-to-live for `add` and `set`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Ttl {
    /// Use the shard's configured default TTL.
    #[default]
    Default,
    /// The entry never expires.
    Never,
    /// The entry expires this long after it is written.
    For(Duration),
}

impl From<Duration> for Ttl {
    fn from(ttl: Duration) -> Self {
        Ttl::For(ttl)
    }
}

impl Ttl {
    /// Resolves this override into an absolute deadline.
    ///
    /// `default_ttl` is the shard's default, where `None` means entries
    /// written with [`Ttl::Default`] never expire. A TTL too large to be
    /// represented as an `Instant` also never expires.
    pub fn deadline(self, now: Instant, default_ttl: Option<Duration>) -> Option<Instant> {
        match self {
            Ttl::Default => default_ttl.and_then(|ttl| now.checked_add(ttl)),
            Ttl::Never => None,
            Ttl::For(ttl) => now.checked_add(ttl),
        }
    }
}

/// Configuration shared by every shard of a cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// TTL applied by [`Ttl::Default`] (`None` = never expire).
    ///
    /// A zero duration falls back to [`DEFAULT_TTL`].
    pub default_ttl: Option<Duration>,

    /// Interval between background sweeps (`None` or zero = no sweeper).
    pub sweep_interval: Option<Duration>,

    /// Number of shards; only meaningful for a sharded cache.
    pub shard_count: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl: Some(DEFAULT_TTL),
            sweep_interval: Some(DEFAULT_SWEEP_INTERVAL),
            shard_count: DEFAULT_SHARD_COUNT,
        }
    }
}

impl CacheConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the TTL applied by [`Ttl::Default`].
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = Some(ttl);
        self
    }

    /// Makes entries written with [`Ttl::Default`] immortal.
    pub fn without_default_ttl(mut self) -> Self {
        self.default_ttl = None;
        self
    }

    /// Sets the interval between background sweeps.
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = Some(interval);
        self
    }

    /// Disables the background sweeper. Expired entries are then never
    /// reclaimed.
    pub fn without_sweeper(mut self) -> Self {
        self.sweep_interval = None;
        self
    }

    /// Sets the number of shards.
    pub fn with_shard_count(mut self, shard_count: usize) -> Self {
        self.shard_count = shard_count;
        self
    }

    /// Checks the configuration for values no cache can be built from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.shard_count == 0 {
            return Err(ConfigError::ZeroShards);
        }
        Ok(())
    }

    /// The default TTL after the zero-duration fallback is applied.
    pub fn effective_default_ttl(&self) -> Option<Duration> {
        self.default_ttl.map(|ttl| if ttl.is_zero() { DEFAULT_TTL } else { ttl })
    }

    /// The sweep interval, or `None` when no sweeper should run.
    pub fn effective_sweep_interval(&self) -> Option<Duration> {
        self.sweep_interval.filter(|interval| !interval.is_zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CacheConfig::default();
        assert_eq!(config.default_ttl, Some(DEFAULT_TTL));
        assert_eq!(config.sweep_interval, Some(DEFAULT_SWEEP_INTERVAL));
        assert_eq!(config.shard_count, DEFAULT_SHARD_COUNT);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_shards_rejected() {
        let config = CacheConfig::new().with_shard_count(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroShards));
    }

    #[test]
    fn test_zero_default_ttl_falls_back() {
        let config = CacheConfig::new().with_default_ttl(Duration::ZERO);
        assert_eq!(config.effective_default_ttl(), Some(DEFAULT_TTL));

        let config = CacheConfig::new().without_default_ttl();
        assert_eq!(config.effective_default_ttl(), None);
    }

    #[test]
    fn test_zero_sweep_interval_disables_sweeper() {
        let config = CacheConfig::new().with_sweep_interval(Duration::ZERO);
        assert_eq!(config.effective_sweep_interval(), None);

        let config = CacheConfig::new().without_sweeper();
        assert_eq!(config.effective_sweep_interval(), None);

        let config = CacheConfig::new().with_sweep_interval(Duration::from_millis(5));
        assert_eq!(
            config.effective_sweep_interval(),
            Some(Duration::from_millis(5))
        );
    }

    #[test]
    fn test_ttl_resolution() {
        let now = Instant::now();
        let default = Some(Duration::from_secs(10));

        assert_eq!(
            Ttl::Default.deadline(now, default),
            Some(now + Duration::from_secs(10))
        );
        assert_eq!(Ttl::Default.deadline(now, None), None);
        assert_eq!(Ttl::Never.deadline(now, default), None);
        assert_eq!(
            Ttl::For(Duration::from_millis(2)).deadline(now, default),
            Some(now + Duration::from_millis(2))
        );
        assert_eq!(Ttl::from(Duration::from_secs(1)), Ttl::For(Duration::from_secs(1)));
    }

    #[test]
    fn test_unrepresentable_ttl_never_expires() {
        let now = Instant::now();

        assert_eq!(Ttl::For(Duration::MAX).deadline(now, None), None);
        assert_eq!(Ttl::Default.deadline(now, Some(Duration::MAX)), None);
    }
}
