//! Size-bounded, time-expiring in-memory cache.
//!
//! [`TtlCache`] stores cloned values under string keys. Every entry carries
//! its own expiry; expired entries read as absent and are dropped lazily.
//! When the cache is full the least-recently-used entry is evicted.
//!
//! The cache is internally synchronized and can be shared behind an `Arc`.

mod size;

use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use lru::LruCache;
use parking_lot::Mutex;
use tracing::trace;

pub use size::ApproxSize;

/// Point-in-time cache statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheStats {
    /// Live (unexpired) entries.
    pub entries: usize,
    /// Rough heap footprint of keys and values.
    pub approx_memory_bytes: usize,
    /// `hits / (hits + misses)`, or `0.0` before any lookup.
    pub hit_rate: f64,
}

struct Entry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> Entry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

struct Inner<V> {
    entries: LruCache<String, Entry<V>>,
    hits: u64,
    misses: u64,
}

impl<V> Inner<V> {
    /// Drop every expired entry.
    fn purge_expired(&mut self, now: Instant) {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();
        for key in expired {
            self.entries.pop(&key);
        }
    }
}

/// A thread-safe TTL + LRU cache.
pub struct TtlCache<V> {
    inner: Mutex<Inner<V>>,
    default_ttl: Duration,
}

impl<V: Clone + ApproxSize> TtlCache<V> {
    /// Create a cache holding at most `capacity` entries.
    pub fn new(capacity: NonZeroUsize, default_ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: LruCache::new(capacity),
                hits: 0,
                misses: 0,
            }),
            default_ttl,
        }
    }

    /// Look up `key`, refreshing its LRU position on a hit.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        let mut inner = self.inner.lock();

        let lookup = inner
            .entries
            .get(key)
            .map(|entry| (!entry.is_expired(now)).then(|| entry.value.clone()));

        match lookup {
            Some(Some(value)) => {
                inner.hits += 1;
                return Some(value);
            }
            Some(None) => {
                trace!(key, "cache entry expired");
                inner.entries.pop(key);
            }
            None => {}
        }
        inner.misses += 1;
        None
    }

    /// Insert or replace `key`. `ttl` of `None` uses the default TTL.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        let key = key.into();
        let now = Instant::now();
        let expires_at = now + ttl.unwrap_or(self.default_ttl);

        let mut inner = self.inner.lock();
        // Make room with stale entries before evicting a live one.
        if inner.entries.len() == inner.entries.cap().get() && !inner.entries.contains(&key) {
            inner.purge_expired(now);
        }
        if let Some((evicted, _)) = inner.entries.push(key.clone(), Entry { value, expires_at }) {
            if evicted != key {
                trace!(key = %evicted, "evicted least-recently-used entry");
            }
        }
    }

    /// Remove `key`. Returns whether a live entry was removed.
    pub fn delete(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut inner = self.inner.lock();
        inner
            .entries
            .pop(key)
            .is_some_and(|entry| !entry.is_expired(now))
    }

    /// Whether `key` holds a live entry. Does not affect LRU order or stats.
    pub fn has(&self, key: &str) -> bool {
        let now = Instant::now();
        let inner = self.inner.lock();
        inner
            .entries
            .peek(key)
            .is_some_and(|entry| !entry.is_expired(now))
    }

    /// Remove every entry and reset the hit/miss counters.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.hits = 0;
        inner.misses = 0;
    }

    /// Number of live entries.
    pub fn size(&self) -> usize {
        let mut inner = self.inner.lock();
        inner.purge_expired(Instant::now());
        inner.entries.len()
    }

    /// Entry count, approximate memory use, and hit rate.
    pub fn stats(&self) -> CacheStats {
        let mut inner = self.inner.lock();
        inner.purge_expired(Instant::now());

        let approx_memory_bytes = inner
            .entries
            .iter()
            .map(|(key, entry)| key.approx_size() + entry.value.approx_size())
            .sum();
        let lookups = inner.hits + inner.misses;
        let hit_rate = if lookups == 0 {
            0.0
        } else {
            inner.hits as f64 / lookups as f64
        };

        CacheStats {
            entries: inner.entries.len(),
            approx_memory_bytes,
            hit_rate,
        }
    }
}
