//! TTL LRU Cache stress run
//!
//! Spins up thousands of simulated shoppers sharing one token cache and
//! reports hit/miss counters when they are done.

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ttl_lru_cache::stress::{run_stress, StressSettings};
use ttl_lru_cache::{spawn_cleanup_task, Config, TtlLruCache};

/// Main entry point for the cache stress run.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the shared token cache (invalid capacity is fatal)
/// 4. Optionally start the background TTL cleanup task
/// 5. Run all workers to completion and print the report
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ttl_lru_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: capacity={}, ttl={}ms, workers={}, ops_per_worker={}, cleanup_interval={}ms",
        config.capacity,
        config.ttl_ms,
        config.workers,
        config.ops_per_worker,
        config.cleanup_interval_ms
    );

    let cache: Arc<TtlLruCache<String, bool>> = Arc::new(
        TtlLruCache::from_config(&config).context("Could not create the token cache")?,
    );

    let cleanup_handle = config
        .cleanup_interval()
        .map(|interval| spawn_cleanup_task(cache.clone(), interval));

    let report = run_stress(cache, StressSettings::from_config(&config)).await;

    if let Some(handle) = cleanup_handle {
        handle.abort();
    }

    info!(
        duration_ms = report.duration_ms,
        hits = report.hits,
        misses = report.misses,
        sets = report.sets,
        hit_rate = %format!("{:.2}%", report.hit_rate * 100.0),
        final_len = report.final_len,
        "Stress run completed"
    );
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("Could not serialize the report")?
    );

    if !report.is_consistent() {
        warn!(
            misses = report.misses,
            sets = report.sets,
            "Miss count does not match set count"
        );
    }

    Ok(())
}
