//! TTL LRU Cache - A thread-safe, capacity-bounded in-memory cache
//!
//! Combines least-recently-used eviction with per-entry TTL expiration, for
//! fronting expensive lookups such as token or session validation.

pub mod cache;
pub mod config;
pub mod error;
pub mod stress;
pub mod tasks;

pub use cache::TtlLruCache;
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::spawn_cleanup_task;
