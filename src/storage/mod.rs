//! Storage Module
//!
//! This module provides the in-memory storage for shardcache: a single-lock
//! [`Shard`] with its own expiry sweeper, and a [`ShardedCache`] that routes
//! keys across many shards.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     ShardedCache                            │
//! │  ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐           │
//! │  │ Shard 0 │ │ Shard 1 │ │ Shard 2 │ │...N     │           │
//! │  │ RwLock  │ │ RwLock  │ │ RwLock  │ │ shards  │           │
//! │  └────▲────┘ └────▲────┘ └────▲────┘ └────▲────┘           │
//! └───────┼───────────┼───────────┼───────────┼────────────────┘
//!         │           │           │           │
//!     sweeper     sweeper     sweeper     sweeper
//! ```
//!
//! ## Features
//!
//! - **Sharded Storage**: independent shards reduce lock contention
//! - **RwLock**: Multiple concurrent readers, exclusive writers
//! - **TTL Support**: per-entry time-to-live with a configurable default
//! - **Active Expiry**: a per-shard background sweeper reclaims expired keys
//!
//! ## Example
//!
//! ```
//! use shardcache::storage::{Shard, ShardedCache};
//! use shardcache::Ttl;
//! use std::time::Duration;
//!
//! let shard: Shard<String> = Shard::new(Some(Duration::from_secs(60)), None);
//! shard.set("name", "Ariz".to_string(), Ttl::Never);
//! assert_eq!(shard.get("name").as_deref(), Some("Ariz"));
//!
//! let cache: ShardedCache<u64> = ShardedCache::new(8, None, None).unwrap();
//! cache.set("hits", 1, Duration::from_secs(30));
//! assert_eq!(cache.get("hits"), Some(1));
//! ```

mod expiry;
pub mod router;
pub mod shard;

// Re-export commonly used types
pub use router::ShardedCache;
pub use shard::{Entry, Shard, ShardStats};
