//! Concurrent TTL cache for a single weather entity type.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::Serialize;

use crate::clock::{Clock, SystemClock};

/// Normalizes a location name into a cache key.
///
/// Surrounding whitespace is trimmed, inner spaces become `+` and the result
/// is uppercased, so `" new york "` and `"New York"` share the key `NEW+YORK`.
pub fn normalize_key(key: &str) -> String {
    key.trim().replace(' ', "+").to_uppercase()
}

/// A cached value and the instant it was stored.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    value: T,
    captured_at: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    /// An entry is expired once strictly more than `ttl_hours` have elapsed.
    pub fn is_expired(&self, now: DateTime<Utc>, ttl_hours: u32) -> bool {
        now.signed_duration_since(self.captured_at) > Duration::hours(i64::from(ttl_hours))
    }
}

/// Cache statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of stored entries, expired ones included.
    pub size: usize,

    /// Lookups answered from the cache.
    pub hits: u64,

    /// Lookups that found nothing or an expired entry.
    pub misses: u64,
}

impl CacheStats {
    /// Calculates the hit rate.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Key → (value, timestamp) map guarded by a reader/writer lock.
///
/// Expiry is lazy: a read past the TTL reports a miss but leaves the entry in
/// place until the next `put` for the same key replaces it.
pub struct EntityCache<T> {
    entries: RwLock<HashMap<String, CacheEntry<T>>>,
    clock: Arc<dyn Clock>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<T: Clone> EntityCache<T> {
    /// Creates an empty cache on the wall clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty cache on the given clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Looks up `key`.
    ///
    /// Returns `None` if not found or if older than `ttl_hours`.
    pub fn get(&self, key: &str, ttl_hours: u32) -> Option<T> {
        let key = normalize_key(key);
        let now = self.clock.now();

        let found = {
            let entries = self.entries.read();
            entries
                .get(&key)
                .filter(|entry| !entry.is_expired(now, ttl_hours))
                .map(|entry| entry.value.clone())
        };

        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(key = %key, "cache hit");
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(key = %key, "cache miss");
        }

        found
    }

    /// Stores `value` under `key`, replacing whatever was there.
    pub fn put(&self, key: &str, value: T) {
        let key = normalize_key(key);
        let entry = CacheEntry {
            value,
            captured_at: self.clock.now(),
        };

        self.entries.write().insert(key, entry);
    }

    /// Removes entries older than `ttl_hours` and returns how many went.
    ///
    /// Never called by the cache itself.
    pub fn purge_expired(&self, ttl_hours: u32) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now, ttl_hours));
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Returns cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl<T: Clone> Default for EntityCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
