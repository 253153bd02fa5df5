//! Stress tests: parallel writers and readers must never lose updates.

mod common;

use shardcache::{Shard, ShardedCache, Ttl};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const WRITERS: usize = 8;
const READERS: usize = 4;
const KEYS_PER_WRITER: usize = 500;

#[test]
fn test_concurrent_writers_and_readers_sharded() {
    common::init_tracing();

    let cache: Arc<ShardedCache<usize>> =
        Arc::new(ShardedCache::new(16, None, Some(Duration::from_millis(5))).unwrap());
    let mut handles = vec![];

    for w in 0..WRITERS {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            for i in 0..KEYS_PER_WRITER {
                cache.set(format!("w{}-k{}", w, i), w * KEYS_PER_WRITER + i, Ttl::Never);
            }
        }));
    }

    for r in 0..READERS {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            for i in 0..KEYS_PER_WRITER {
                let key = format!("w{}-k{}", r % WRITERS, i);
                if let Some(value) = cache.get(&key) {
                    assert_eq!(value, (r % WRITERS) * KEYS_PER_WRITER + i);
                }
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(cache.len(), WRITERS * KEYS_PER_WRITER);
    for w in 0..WRITERS {
        for i in 0..KEYS_PER_WRITER {
            assert_eq!(
                cache.get(&format!("w{}-k{}", w, i)),
                Some(w * KEYS_PER_WRITER + i)
            );
        }
    }
}

#[test]
fn test_concurrent_ops_with_sweeper_on_single_shard() {
    common::init_tracing();

    let shard: Arc<Shard<usize>> = Arc::new(Shard::new(None, Some(Duration::from_millis(1))));
    let mut handles = vec![];

    for w in 0..WRITERS {
        let shard = Arc::clone(&shard);
        handles.push(thread::spawn(move || {
            for i in 0..KEYS_PER_WRITER {
                // Short-lived noise for the sweeper alongside permanent keys.
                shard.set(format!("tmp-{}-{}", w, i), i, Duration::from_micros(100));
                shard.add(format!("keep-{}-{}", w, i), i, Ttl::Never).unwrap();
                if i % 10 == 0 {
                    let _ = shard.delete(&format!("tmp-{}-{}", w, i));
                }
            }
        }));
    }

    for _ in 0..READERS {
        let shard = Arc::clone(&shard);
        handles.push(thread::spawn(move || {
            for _ in 0..KEYS_PER_WRITER {
                let _ = shard.len();
                let _ = shard.get("keep-0-0");
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert!(common::wait_until(Duration::from_secs(5), || {
        shard.len() == WRITERS * KEYS_PER_WRITER
    }));
    for w in 0..WRITERS {
        for i in 0..KEYS_PER_WRITER {
            assert_eq!(shard.get(&format!("keep-{}-{}", w, i)), Some(i));
        }
    }
    assert_eq!(shard.stats().tracked, 0);
}

#[test]
fn test_concurrent_add_has_single_winner() {
    common::init_tracing();

    let cache: Arc<ShardedCache<usize>> = Arc::new(ShardedCache::new(4, None, None).unwrap());
    let handles: Vec<_> = (0..16)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || cache.add("contested", t, Ttl::Never).is_ok())
        })
        .collect();

    let winners = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .filter(|won| *won)
        .count();

    assert_eq!(winners, 1);
    assert!(cache.get("contested").is_some());
}
