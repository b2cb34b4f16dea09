//! Background Tasks Module
//!
//! Contains background tasks that can run alongside a cache.
//!
//! # Tasks
//! - TTL Cleanup: Purges expired cache entries at a fixed interval

mod cleanup;

pub use cleanup::spawn_cleanup_task;
