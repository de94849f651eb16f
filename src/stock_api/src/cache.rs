//! Read-through response cache with sliding expiration.
//!
//! The cache sits at the HTTP boundary around the aggregation service; the
//! service itself never sees it. [`ResponseCache`] is the injected interface,
//! [`InMemoryCache`] the process-local implementation.
//!
//! Implementation notes:
//! - Every hit pushes the entry's expiry out by its TTL again (sliding), so
//!   only entries left untouched for a full TTL disappear.
//! - Expired entries are dropped on the lookup that finds them, in a sweep on
//!   every `set`, and by the periodic [`spawn_purge_task`] so idle keys do not
//!   pile up between writes.
//! - Time comes from `tokio::time::Instant`, so paused-clock tests can step
//!   over expirations without sleeping.

use std::{collections::HashMap, sync::Arc, time::Duration};

use parking_lot::Mutex;
use tokio::{
    task::JoinHandle,
    time::{Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub trait ResponseCache<V>: Send + Sync {
    /// Returns the live value under `key`, refreshing its expiry.
    fn get(&self, key: &str) -> Option<V>;

    /// Stores `value` under `key`; it expires after `ttl` without access.
    fn set(&self, key: String, value: V, ttl: Duration);
}

struct Entry<V> {
    value: V,
    ttl: Duration,
    last_access: Instant,
}

impl<V> Entry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.last_access) >= self.ttl
    }
}

pub struct InMemoryCache<V> {
    entries: Mutex<HashMap<String, Entry<V>>>,
}

impl<V> InMemoryCache<V> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Number of stored entries, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every expired entry and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }
}

/// Sweeps `cache` every `every` until `shutdown` is cancelled.
///
/// A zero period is raised to one second.
pub fn spawn_purge_task<V>(
    cache: Arc<InMemoryCache<V>>,
    every: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()>
where
    V: Send + 'static,
{
    let period = every.max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    let removed = cache.purge_expired();
                    if removed > 0 {
                        debug!(removed, remaining = cache.len(), "Purged expired cache entries");
                    }
                }
            }
        }
    })
}

impl<V> Default for InMemoryCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone + Send> ResponseCache<V> for InMemoryCache<V> {
    fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        let mut entries = self.entries.lock();

        match entries.get_mut(key) {
            Some(entry) if !entry.is_expired(now) => {
                entry.last_access = now;
                Some(entry.value.clone())
            }
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn set(&self, key: String, value: V, ttl: Duration) {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        entries.retain(|_, entry| !entry.is_expired(now));
        entries.insert(
            key,
            Entry {
                value,
                ttl,
                last_access: now,
            },
        );
    }
}
