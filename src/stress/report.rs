//! Stress Report Module
//!
//! Counters shared by stress workers and the summary produced at the end of a run.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cache::CacheStats;

// == Stress Counters ==
/// Lock-free outcome counters updated by every worker.
#[derive(Debug, Default)]
pub struct StressCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    sets: AtomicU64,
}

impl StressCounters {
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_set(&self) {
        self.sets.fetch_add(1, Ordering::Relaxed);
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn sets(&self) -> u64 {
        self.sets.load(Ordering::Relaxed)
    }
}

// == Stress Report ==
/// Summary of a completed stress run.
#[derive(Debug, Clone, Serialize)]
pub struct StressReport {
    /// Wall-clock start of the run
    pub started_at: DateTime<Utc>,
    /// Total run duration in milliseconds
    pub duration_ms: u64,
    /// Number of workers spawned
    pub workers: usize,
    /// Lookups that found a live token
    pub hits: u64,
    /// Lookups that found nothing
    pub misses: u64,
    /// Tokens written after a miss
    pub sets: u64,
    /// hits / (hits + misses)
    pub hit_rate: f64,
    /// Entries left in the cache when the run finished
    pub final_len: usize,
    /// Cache-side statistics at the end of the run
    pub cache: CacheStats,
}

impl StressReport {
    /// Builds a report from the worker counters and a final cache snapshot.
    pub fn new(
        started_at: DateTime<Utc>,
        duration: Duration,
        workers: usize,
        counters: &StressCounters,
        cache: CacheStats,
    ) -> Self {
        let hits = counters.hits();
        let misses = counters.misses();
        let total = hits + misses;
        let hit_rate = if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        };

        Self {
            started_at,
            duration_ms: duration.as_millis() as u64,
            workers,
            hits,
            misses,
            sets: counters.sets(),
            hit_rate,
            final_len: cache.total_entries,
            cache,
        }
    }

    /// Total lookups performed by all workers.
    pub fn total_ops(&self) -> u64 {
        self.hits + self.misses
    }

    /// Every miss is followed by exactly one write, so the two counts must match.
    pub fn is_consistent(&self) -> bool {
        self.misses == self.sets
    }
}
