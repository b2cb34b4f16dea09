//! Integration Tests for the public cache API
//!
//! Exercises the cache the way an external caller does: construction,
//! concurrent set/get traffic, expiry with an injected clock, and the
//! optional background sweep.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use ttl_lru_cache::cache::{ManualClock, TtlLruCache};
use ttl_lru_cache::{spawn_cleanup_task, CacheError, Config};

// == Helper Functions ==

fn clocked_cache(
    capacity: usize,
    ttl_secs: u64,
) -> (TtlLruCache<&'static str, &'static str, ManualClock>, ManualClock) {
    let clock = ManualClock::new();
    let cache = TtlLruCache::with_clock(capacity, Duration::from_secs(ttl_secs), clock.clone())
        .expect("valid capacity");
    (cache, clock)
}

// == Construction ==

#[test]
fn test_construct_rejects_zero_capacity() {
    let result = TtlLruCache::<String, u32>::new(0, Duration::from_secs(1));
    assert!(matches!(result, Err(CacheError::InvalidCapacity(0))));
}

#[test]
fn test_construct_rejects_negative_configured_capacity() {
    let config = Config {
        capacity: -1,
        ..Config::default()
    };
    let result = TtlLruCache::<String, bool>::from_config(&config);
    assert!(matches!(result, Err(CacheError::InvalidCapacity(-1))));
}

#[test]
fn test_construct_capacity_one_zero_ttl() {
    // Legal; with zero TTL an entry is already expired at its write instant,
    // so a read at any later moment misses.
    let cache = TtlLruCache::<String, u32>::new(1, Duration::ZERO).unwrap();
    cache.set("k".to_string(), 1);
    assert!(cache.len() <= 1);
    assert_eq!(cache.get("k"), None);
}

// == LRU ==

#[test]
fn test_lru_correctness() {
    let (cache, _clock) = clocked_cache(2, 60);

    cache.set("a", "1");
    cache.set("b", "2");
    assert_eq!(cache.get("a"), Some("1"));
    cache.set("c", "3");

    assert_eq!(cache.get("b"), None);
    assert_eq!(cache.get("a"), Some("1"));
    assert_eq!(cache.get("c"), Some("3"));
}

#[test]
fn test_capacity_invariant() {
    let keys: Vec<String> = (0..500).map(|i| format!("key-{}", i)).collect();
    let cache: TtlLruCache<String, usize> = TtlLruCache::new(10, Duration::from_secs(60)).unwrap();

    for (i, key) in keys.iter().enumerate() {
        cache.set(key.clone(), i);
        assert!(cache.len() <= 10);
    }
    assert_eq!(cache.len(), 10);
    assert_eq!(cache.stats().evictions, 490);

    // The last ten written keys are the survivors
    for key in &keys[490..] {
        assert!(cache.contains(key.as_str()));
    }
}

// == TTL ==

#[test]
fn test_ttl_correctness() {
    let (cache, clock) = clocked_cache(10, 5);

    cache.set("k", "v");
    clock.advance(Duration::from_secs(4));
    assert_eq!(cache.get("k"), Some("v"));

    clock.advance(Duration::from_secs(2));
    assert_eq!(cache.get("k"), None);
}

#[test]
fn test_overwrite_resets_expiry() {
    let (cache, clock) = clocked_cache(10, 5);

    cache.set("k", "v1");
    clock.advance(Duration::from_secs(4));
    cache.set("k", "v2");
    clock.advance(Duration::from_secs(3));

    assert_eq!(cache.get("k"), Some("v2"));

    clock.advance(Duration::from_secs(2));
    assert_eq!(cache.get("k"), None);
}

#[test]
fn test_recently_read_entry_still_expires() {
    let (cache, clock) = clocked_cache(2, 5);

    cache.set("hot", "v");
    cache.set("cold", "v");
    for _ in 0..4 {
        clock.advance(Duration::from_secs(1));
        assert!(cache.get("hot").is_some());
    }
    clock.advance(Duration::from_secs(1));

    assert_eq!(cache.get("hot"), None);
}

#[test]
fn test_idempotent_absence() {
    let (cache, _clock) = clocked_cache(4, 60);
    cache.set("present", "v");

    for _ in 0..100 {
        assert_eq!(cache.get("absent"), None);
    }
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_len_is_structural_until_purged() {
    let (cache, clock) = clocked_cache(4, 5);
    cache.set("a", "1");
    cache.set("b", "2");
    cache.set("c", "3");
    clock.advance(Duration::from_secs(5));

    assert_eq!(cache.len(), 3);
    assert_eq!(cache.get("b"), None);
    assert_eq!(cache.len(), 2);
    assert_eq!(cache.cleanup_expired(), 2);
    assert!(cache.is_empty());
}

// == Concurrency ==

#[test]
fn test_concurrent_overlapping_keys() {
    const THREADS: usize = 16;
    const OPS: usize = 5_000;
    const CAPACITY: usize = 64;

    let cache: Arc<TtlLruCache<String, usize>> =
        Arc::new(TtlLruCache::new(CAPACITY, Duration::from_secs(60)).unwrap());

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                let mut hits = 0usize;
                for i in 0..OPS {
                    let key = format!("k{}", (i * 7 + t) % 128);
                    match cache.get(&key) {
                        Some(_) => hits += 1,
                        None => cache.set(key, i),
                    }
                    let len = cache.len();
                    assert!(len <= CAPACITY, "len {} exceeds capacity", len);
                }
                hits
            })
        })
        .collect();

    let hits: usize = handles
        .into_iter()
        .map(|h| h.join().expect("worker panicked"))
        .sum();

    let stats = cache.stats();
    assert!(cache.len() <= CAPACITY);
    assert_eq!(stats.hits as usize, hits);
    assert_eq!(stats.hits + stats.misses, (THREADS * OPS) as u64);
}

#[test]
fn test_concurrent_writers_same_key_last_write_visible() {
    let cache: Arc<TtlLruCache<&'static str, usize>> =
        Arc::new(TtlLruCache::new(4, Duration::from_secs(60)).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..1_000 {
                    cache.set("shared", t * 1_000 + i);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("writer panicked");
    }

    let value = cache.get("shared").expect("value present");
    // Whichever writer went last, its final write was i = 999
    assert_eq!(value % 1_000, 999);
    assert_eq!(cache.len(), 1);
}

// == Background Sweep ==

#[tokio::test]
async fn test_cleanup_task_purges_with_real_clock() {
    let cache: Arc<TtlLruCache<String, u32>> =
        Arc::new(TtlLruCache::new(16, Duration::from_millis(30)).unwrap());
    cache.set("a".to_string(), 1);
    cache.set("b".to_string(), 2);

    let handle = spawn_cleanup_task(cache.clone(), Duration::from_millis(20));
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert_eq!(cache.len(), 0);
    assert_eq!(cache.stats().expirations, 2);

    handle.abort();
}
