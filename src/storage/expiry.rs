//! Expiry Tracking and the Background Sweeper
//!
//! Each shard reclaims expired entries in the background. This is the only
//! way entries leave a shard on their own: `get` does not look at deadlines,
//! so an expired entry stays visible until the next sweep removes it.
//!
//! ## Tracked Deadlines
//!
//! Instead of scanning every entry on each wake, a shard keeps an
//! [`ExpiryIndex`]: every key with a finite deadline, ordered by that
//! deadline. A sweep pops from the front of the index while the deadline is
//! strictly in the past, so its cost is proportional to the number of
//! entries it removes, not the size of the shard. Keys that expire long
//! after the next sweep stay in the index and are caught by whichever sweep
//! first runs past their deadline.
//!
//! ## Hosting
//!
//! Each sweeper is a named OS thread sleeping in a loop, whether or not the
//! shard was built inside an async runtime, so it lives exactly as long as
//! the shard and never competes with runtime tasks. It only holds a `Weak`
//! reference to the shard and winds down on its first wake after the shard
//! is dropped. Callers never stop or join it.

use std::collections::BTreeSet;
use std::sync::Weak;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Deadline-ordered set of keys with a finite expiry.
///
/// Every key in the index is also present in the owning shard's entry map,
/// with the same deadline.
#[derive(Debug, Default)]
pub(crate) struct ExpiryIndex {
    deadlines: BTreeSet<(Instant, String)>,
}

impl ExpiryIndex {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Starts tracking `key` under `deadline`.
    pub(crate) fn track(&mut self, key: &str, deadline: Instant) {
        self.deadlines.insert((deadline, key.to_owned()));
    }

    /// Stops tracking `key` under `deadline`. A missing pair is a no-op.
    ///
    /// A tuple key cannot be borrowed as `(Instant, &str)`, so each call
    /// allocates an owned copy of `key` for the lookup.
    pub(crate) fn untrack(&mut self, key: &str, deadline: Instant) {
        self.deadlines.remove(&(deadline, key.to_owned()));
    }

    /// Removes and returns the earliest tracked key if its deadline is
    /// strictly before `now`.
    pub(crate) fn pop_due(&mut self, now: Instant) -> Option<(Instant, String)> {
        match self.deadlines.first() {
            Some((deadline, _)) if *deadline < now => self.deadlines.pop_first(),
            _ => None,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.deadlines.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.deadlines.len()
    }
}

/// Something a sweeper can periodically purge.
pub(crate) trait Sweep: Send + Sync + 'static {
    /// Removes everything that has expired, returning how many entries went.
    fn sweep(&self) -> usize;
}

/// Starts a sweeper thread for `target` that wakes every `period`.
pub(crate) fn spawn_sweeper<T: Sweep>(target: Weak<T>, period: Duration) {
    let spawned = thread::Builder::new()
        .name("shardcache-sweeper".to_string())
        .spawn(move || sweep_thread(target, period));

    match spawned {
        Ok(_) => info!(period = ?period, "Background expiry sweeper started"),
        Err(e) => warn!(error = %e, "Failed to start expiry sweeper thread"),
    }
}

fn sweep_thread<T: Sweep>(target: Weak<T>, period: Duration) {
    loop {
        thread::sleep(period);

        let Some(target) = target.upgrade() else {
            debug!("Shard dropped, expiry sweeper exiting");
            return;
        };
        target.sweep();
    }
}
