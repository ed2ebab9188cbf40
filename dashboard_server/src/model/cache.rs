//! Time-bounded in-memory cache.
//!
//! `TtlCache` keeps one `(value, inserted_at)` entry per key. An entry is
//! visible only while `now - inserted_at < expiry`; an expired entry is
//! recomputed on the next access. The expiry is supplied per lookup so the same
//! type backs both the history and the quote caches.
//!
//! Design notes:
//! - Time comes from a `Clock`, normally `SystemClock` over the monotonic
//!   `std::time::Instant`; tests substitute a manual clock.
//! - The cache is not synchronized. The server owns both caches on the thread
//!   that runs render passes, so no locking is needed.
//! - Concurrent misses for the same key are not deduplicated; every miss
//!   computes and the last insert wins.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Source of "now" for expiry checks.
pub trait Clock {
    /// Current instant.
    fn now(&self) -> Instant;
}

/// Wall-clock time from `Instant::now`.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A cached value and the moment it was stored.
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

/// Keyed cache whose entries expire a fixed time after insertion.
pub struct TtlCache<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
    clock: Arc<dyn Clock>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Empty cache reading time from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            clock,
        }
    }

    /// Value stored for `key` if it is younger than `expiry`.
    pub fn get(&self, key: &K, expiry: Duration) -> Option<V> {
        let now = self.clock.now();
        self.entries
            .get(key)
            .filter(|entry| now.saturating_duration_since(entry.inserted_at) < expiry)
            .map(|entry| entry.value.clone())
    }

    /// Store `value` for `key`, replacing any previous entry.
    pub fn insert(&mut self, key: K, value: V) {
        let now = self.clock.now();
        self.entries
            .entry(key)
            .and_modify(|entry| {
                entry.value = value.clone();
                entry.inserted_at = now;
            })
            .or_insert(CacheEntry {
                value,
                inserted_at: now,
            });
    }

    /// Return the live value for `key`, or run `compute`, store and return it.
    pub fn get_or_compute<F>(&mut self, key: &K, expiry: Duration, compute: F) -> V
    where
        F: FnOnce() -> V,
    {
        if let Some(value) = self.get(key, expiry) {
            return value;
        }
        let value = compute();
        self.insert(key.clone(), value.clone());
        value
    }

    /// Drop every entry older than `expiry` and return their keys.
    pub fn purge_expired(&mut self, expiry: Duration) -> Vec<K> {
        let now = self.clock.now();
        let mut expired = Vec::new();

        self.entries.retain(|key, entry| {
            if now.saturating_duration_since(entry.inserted_at) >= expiry {
                expired.push(key.clone());
                false
            } else {
                true
            }
        });
        expired
    }
}
