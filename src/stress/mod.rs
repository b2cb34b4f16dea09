//! Stress Harness Module
//!
//! Simulates many concurrent shoppers validating session tokens through one
//! shared cache: each worker looks up its token, writes it back on a miss,
//! and pauses for a random interval between lookups.

mod report;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use chrono::Utc;
use rand::Rng;
use tokio::runtime::Handle;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, info, warn};

use crate::cache::{Clock, TtlLruCache};
use crate::config::Config;

pub use report::{StressCounters, StressReport};

// == Stress Settings ==
/// Shape of a stress run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StressSettings {
    /// Number of concurrent workers
    pub workers: usize,
    /// Lookups performed by each worker
    pub ops_per_worker: usize,
    /// Interval between cache size reports, zero disables the monitor
    pub monitor_interval: Duration,
    /// Shortest pause between two lookups of a worker
    pub min_pause: Duration,
    /// Longest pause between two lookups of a worker
    pub max_pause: Duration,
}

impl StressSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            workers: config.workers,
            ops_per_worker: config.ops_per_worker,
            monitor_interval: config.monitor_interval(),
            ..Self::default()
        }
    }

    /// Picks a random pause in `[min_pause, max_pause]`.
    fn random_pause(&self) -> Duration {
        let min = self.min_pause.as_millis() as u64;
        let max = (self.max_pause.as_millis() as u64).max(min);
        Duration::from_millis(rand::thread_rng().gen_range(min..=max))
    }
}

impl Default for StressSettings {
    fn default() -> Self {
        Self {
            workers: 3000,
            ops_per_worker: 100,
            monitor_interval: Duration::from_secs(1),
            min_pause: Duration::from_millis(10),
            max_pause: Duration::from_millis(100),
        }
    }
}

// == Run Stress ==
/// Runs every worker to completion against `cache` and summarises the outcome.
pub async fn run_stress<C>(
    cache: Arc<TtlLruCache<String, bool, C>>,
    settings: StressSettings,
) -> StressReport
where
    C: Clock + 'static,
{
    let counters = Arc::new(StressCounters::default());
    let live_workers = Arc::new(AtomicUsize::new(settings.workers));

    let monitor = (!settings.monitor_interval.is_zero()).then(|| {
        spawn_monitor(
            Arc::clone(&cache),
            Arc::clone(&live_workers),
            settings.monitor_interval,
        )
    });

    info!(
        workers = settings.workers,
        ops_per_worker = settings.ops_per_worker,
        capacity = cache.capacity(),
        ttl = ?cache.ttl(),
        "Starting concurrent stress run"
    );

    let started_at = Utc::now();
    let start = Instant::now();

    let mut workers = JoinSet::new();
    for id in 0..settings.workers {
        workers.spawn(user_worker(
            id,
            Arc::clone(&cache),
            Arc::clone(&counters),
            Arc::clone(&live_workers),
            settings,
        ));
    }
    info!("All workers started, waiting for them to finish");

    while let Some(result) = workers.join_next().await {
        if let Err(err) = result {
            warn!(error = %err, "Stress worker did not complete");
        }
    }

    let duration = start.elapsed();
    if let Some(handle) = monitor {
        handle.abort();
    }

    StressReport::new(started_at, duration, settings.workers, &counters, cache.stats())
}

/// One simulated shopper repeatedly validating its own token.
async fn user_worker<C: Clock>(
    id: usize,
    cache: Arc<TtlLruCache<String, bool, C>>,
    counters: Arc<StressCounters>,
    live_workers: Arc<AtomicUsize>,
    settings: StressSettings,
) {
    let shopper_id = format!("shopper-{}", id);

    for _ in 0..settings.ops_per_worker {
        if cache.get(&shopper_id).is_some() {
            counters.record_hit();
        } else {
            counters.record_miss();
            cache.set(shopper_id.clone(), true);
            counters.record_set();
        }

        let pause = settings.random_pause();
        if !pause.is_zero() {
            tokio::time::sleep(pause).await;
        } else {
            tokio::task::yield_now().await;
        }
    }

    live_workers.fetch_sub(1, Ordering::Relaxed);
    debug!(shopper = %shopper_id, "Worker finished");
}

// == Runtime Snapshot ==
/// Process-level figures reported next to the cache size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RuntimeSnapshot {
    /// Logical CPUs available to the process
    cpus: usize,
    /// Tokio tasks spawned and not yet finished
    alive_tasks: usize,
}

impl RuntimeSnapshot {
    /// Must be called from within a tokio runtime.
    fn capture() -> Self {
        Self {
            cpus: thread::available_parallelism().map_or(1, |n| n.get()),
            alive_tasks: Handle::current().metrics().num_alive_tasks(),
        }
    }
}

/// Logs the cache size, running workers, CPUs and live tasks at a fixed interval.
fn spawn_monitor<C: Clock + 'static>(
    cache: Arc<TtlLruCache<String, bool, C>>,
    live_workers: Arc<AtomicUsize>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let runtime = RuntimeSnapshot::capture();
            info!(
                cached = cache.len(),
                live_workers = live_workers.load(Ordering::Relaxed),
                cpus = runtime.cpus,
                alive_tasks = runtime.alive_tasks,
                "Cache status"
            );
        }
    })
}
