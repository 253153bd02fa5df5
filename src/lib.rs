//! # shardcache - A Sharded, Time-Bounded In-Memory Cache
//!
//! shardcache is an in-process key/value store: values of any type are kept
//! under string keys, optionally with a per-entry time-to-live, and each
//! shard forgets expired entries on its own in the background.
//!
//! ## Features
//!
//! - **Sharded**: keys are hashed across independent shards, each behind its
//!   own RwLock, so calls on different shards never contend
//! - **TTL Support**: per-entry TTL, a configurable default, or no expiry
//! - **Background Sweeps**: one sweeper per shard removes expired entries
//! - **Synchronous API**: every call completes before returning, from plain
//!   threads or from async tasks
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         shardcache                           │
//! │                                                              │
//! │   get / add / set / delete / flush                           │
//! │                │                                             │
//! │                ▼                                             │
//! │  ┌──────────────────────────────────────────────┐            │
//! │  │              ShardedCache                    │            │
//! │  │  (hash key ──► pick one shard, no own lock)  │            │
//! │  └──────┬─────────────┬─────────────┬───────────┘            │
//! │         ▼             ▼             ▼                        │
//! │    ┌────────┐    ┌────────┐    ┌────────┐                    │
//! │    │Shard 0 │    │Shard 1 │    │...N    │                    │
//! │    │RwLock  │    │RwLock  │    │shards  │                    │
//! │    └───▲────┘    └───▲────┘    └───▲────┘                    │
//! │        │             │             │                         │
//! │    ┌───┴─────────────┴─────────────┴───┐                     │
//! │    │  Expiry sweepers (one background  │                     │
//! │    │  thread per shard)                │                     │
//! │    └───────────────────────────────────┘                     │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use shardcache::{CacheConfig, ShardedCache, Ttl};
//! use std::time::Duration;
//!
//! let config = CacheConfig::default()
//!     .with_default_ttl(Duration::from_secs(5 * 60))
//!     .with_sweep_interval(Duration::from_secs(10 * 60))
//!     .with_shard_count(16);
//! let cache = ShardedCache::with_config(config).unwrap();
//!
//! cache.set("session", "token123".to_string(), Ttl::Default);
//! cache.set("config", "static".to_string(), Ttl::Never);
//! cache.set("otp", "4711".to_string(), Duration::from_secs(30));
//!
//! assert_eq!(cache.get("session").as_deref(), Some("token123"));
//! assert!(cache.add("config", "other".to_string(), Ttl::Never).is_err());
//! ```
//!
//! ## Module Overview
//!
//! - [`storage`]: shards, the sharded router and the expiry sweeper
//! - [`config`]: construction-time settings and the per-call [`Ttl`]
//! - [`error`]: error types
//!
//! ## Design Highlights
//!
//! ### Thread Safety
//!
//! Each shard guards its entries with one `std::sync::RwLock`. Reads share
//! it, writes and sweeps take it exclusively. The router holds no lock, so
//! throughput scales with the number of shards.
//!
//! ### Expiry
//!
//! Expiry is physical, not logical: `get` returns whatever is stored, and an
//! entry disappears when its shard's sweeper runs past the deadline. A shard
//! with the sweeper disabled keeps expired entries forever.

pub mod config;
pub mod error;
pub mod storage;

// Re-export commonly used types for convenience
pub use config::{CacheConfig, Ttl, DEFAULT_SHARD_COUNT, DEFAULT_SWEEP_INTERVAL, DEFAULT_TTL};
pub use error::{CacheError, ConfigError, Result};
pub use storage::{Entry, Shard, ShardStats, ShardedCache};

/// Version of shardcache
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
