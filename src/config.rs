//! Configuration Module
//!
//! Handles loading cache and stress-run settings from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Cache and stress-run configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of entries the cache can hold (validated at cache construction)
    pub capacity: i64,
    /// TTL in milliseconds applied to every entry
    pub ttl_ms: u64,
    /// Background expiry sweep interval in milliseconds, 0 = disabled
    pub cleanup_interval_ms: u64,
    /// Number of concurrent simulated workers
    pub workers: usize,
    /// Lookups performed by each worker
    pub ops_per_worker: usize,
    /// Interval in milliseconds between cache size reports
    pub monitor_interval_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 3000)
    /// - `CACHE_TTL_MS` - Entry TTL in milliseconds (default: 5000)
    /// - `CLEANUP_INTERVAL_MS` - Expiry sweep frequency, 0 disables it (default: 0)
    /// - `STRESS_WORKERS` - Concurrent workers (default: 3000)
    /// - `STRESS_OPS_PER_WORKER` - Lookups per worker (default: 100)
    /// - `MONITOR_INTERVAL_MS` - Cache size report frequency (default: 1000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            capacity: env_or("CACHE_CAPACITY", defaults.capacity),
            ttl_ms: env_or("CACHE_TTL_MS", defaults.ttl_ms),
            cleanup_interval_ms: env_or("CLEANUP_INTERVAL_MS", defaults.cleanup_interval_ms),
            workers: env_or("STRESS_WORKERS", defaults.workers),
            ops_per_worker: env_or("STRESS_OPS_PER_WORKER", defaults.ops_per_worker),
            monitor_interval_ms: env_or("MONITOR_INTERVAL_MS", defaults.monitor_interval_ms),
        }
    }

    /// TTL applied to every cache entry.
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }

    /// Sweep interval, or None when the sweep is disabled.
    pub fn cleanup_interval(&self) -> Option<Duration> {
        (self.cleanup_interval_ms > 0).then(|| Duration::from_millis(self.cleanup_interval_ms))
    }

    pub fn monitor_interval(&self) -> Duration {
        Duration::from_millis(self.monitor_interval_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 3000,
            ttl_ms: 5000,
            cleanup_interval_ms: 0,
            workers: 3000,
            ops_per_worker: 100,
            monitor_interval_ms: 1000,
        }
    }
}

/// Reads and parses `key`, falling back to `default` when unset or malformed.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
