//! Cache Store Module
//!
//! Main cache engine combining a bounded LRU map with TTL expiration.

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::time::Duration;

use lru::LruCache;
use parking_lot::Mutex;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, Clock, SystemClock};
use crate::config::Config;
use crate::error::{CacheError, Result};

/// State guarded by the cache lock.
struct Inner<K, V> {
    /// Entries in recency order, bounded to the cache capacity
    entries: LruCache<K, CacheEntry<V>>,
    /// Performance statistics
    stats: CacheStats,
}

// == TTL LRU Cache ==
/// Thread-safe, capacity-bounded cache with LRU eviction and per-entry TTL.
///
/// Every operation runs under a single exclusive lock. Expiration is lazy:
/// an expired entry lingers (and is counted by [`len`](Self::len)) until a
/// lookup, an eviction, or [`cleanup_expired`](Self::cleanup_expired)
/// removes it.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use ttl_lru_cache::cache::TtlLruCache;
///
/// let cache = TtlLruCache::new(2, Duration::from_secs(60)).unwrap();
/// cache.set("a", 1);
/// cache.set("b", 2);
/// assert_eq!(cache.get("a"), Some(1));
///
/// // "b" is now least recently used and makes room for "c"
/// cache.set("c", 3);
/// assert_eq!(cache.get("b"), None);
/// assert_eq!(cache.len(), 2);
/// ```
pub struct TtlLruCache<K, V, C = SystemClock> {
    inner: Mutex<Inner<K, V>>,
    capacity: NonZeroUsize,
    /// TTL stamped on every write, None = entries never expire
    ttl: Option<Duration>,
    clock: C,
}

impl<K: Hash + Eq, V> TtlLruCache<K, V, SystemClock> {
    // == Constructor ==
    /// Creates a cache holding at most `capacity` entries, each valid for
    /// `ttl` after it was last written.
    ///
    /// A zero `ttl` makes entries expire at their write instant; it does not
    /// disable expiration. Use [`without_expiry`](Self::without_expiry) for that.
    ///
    /// # Errors
    /// Returns [`CacheError::InvalidCapacity`] when `capacity` is zero.
    pub fn new(capacity: usize, ttl: Duration) -> Result<Self> {
        Self::with_clock(capacity, ttl, SystemClock)
    }

    /// Creates a cache whose entries are only ever removed by eviction.
    pub fn without_expiry(capacity: usize) -> Result<Self> {
        Self::build(capacity, None, SystemClock)
    }

    /// Creates a cache from configuration.
    ///
    /// The configured capacity is signed so that negative values coming from
    /// the environment are rejected rather than wrapped.
    pub fn from_config(config: &Config) -> Result<Self> {
        let capacity = usize::try_from(config.capacity)
            .map_err(|_| CacheError::InvalidCapacity(config.capacity))?;
        Self::new(capacity, config.ttl())
    }
}

impl<K: Hash + Eq, V, C: Clock> TtlLruCache<K, V, C> {
    /// Creates a cache that reads time from `clock`.
    pub fn with_clock(capacity: usize, ttl: Duration, clock: C) -> Result<Self> {
        Self::build(capacity, Some(ttl), clock)
    }

    fn build(capacity: usize, ttl: Option<Duration>, clock: C) -> Result<Self> {
        let capacity = NonZeroUsize::new(capacity).ok_or(CacheError::InvalidCapacity(0))?;

        debug!(
            capacity = capacity.get(),
            ttl = ?ttl,
            "TTL LRU cache created"
        );

        Ok(Self {
            inner: Mutex::new(Inner {
                entries: LruCache::new(capacity),
                stats: CacheStats::new(capacity.get()),
            }),
            capacity,
            ttl,
            clock,
        })
    }

    // == Set ==
    /// Stores a value, replacing any previous entry for the key.
    ///
    /// The expiration instant is reset to now + ttl and the key becomes the
    /// most recently used. If the cache is full and the key is new, the least
    /// recently used entry is dropped without notice.
    pub fn set(&self, key: K, value: V) {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        let entry = CacheEntry::new(value, self.clock.now(), self.ttl);

        let is_overwrite = inner.entries.contains(&key);
        if inner.entries.push(key, entry).is_some() && !is_overwrite {
            inner.stats.record_eviction();
        }
    }

    // == Get ==
    /// Returns a copy of the value if present and not expired.
    ///
    /// A hit makes the key most recently used but leaves its expiration
    /// untouched. An expired entry is removed as a side effect.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        let now = self.clock.now();

        match inner.entries.peek(key).map(|entry| entry.is_expired(now)) {
            None => {
                inner.stats.record_miss();
                None
            }
            Some(true) => {
                inner.entries.pop(key);
                inner.stats.record_expirations(1);
                inner.stats.record_miss();
                None
            }
            Some(false) => {
                let value = inner.entries.get(key).map(|entry| entry.value.clone());
                inner.stats.record_hit();
                value
            }
        }
    }

    // == Contains ==
    /// Checks for a live entry without touching recency or statistics.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let inner = self.inner.lock();
        let now = self.clock.now();
        inner
            .entries
            .peek(key)
            .is_some_and(|entry| !entry.is_expired(now))
    }

    // == Remove ==
    /// Removes an entry by key, returning its value if it was still live.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut inner = self.inner.lock();
        let now = self.clock.now();
        inner
            .entries
            .pop(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.value)
    }

    // == Clear ==
    /// Removes every entry. Statistics are kept.
    pub fn clear(&self) {
        self.inner.lock().entries.clear();
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&self) -> usize
    where
        K: Clone,
    {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        let now = self.clock.now();

        let expired_keys: Vec<K> = inner
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            inner.entries.pop(key);
        }

        inner.stats.record_expirations(expired_keys.len());
        expired_keys.len()
    }

    // == Length ==
    /// Returns the number of stored entries, including expired entries that
    /// have not been purged yet.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    // == Is Empty ==
    /// Returns true if no entries are stored, expired or not.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// TTL applied on write, None when entries never expire.
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        let mut stats = inner.stats.clone();
        stats.total_entries = inner.entries.len();
        stats
    }
}

impl<K: Hash + Eq, V, C> fmt::Debug for TtlLruCache<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TtlLruCache")
            .field("capacity", &self.capacity)
            .field("ttl", &self.ttl)
            .field("len", &self.inner.lock().entries.len())
            .finish()
    }
}
