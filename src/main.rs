//! Read Cache load driver
//!
//! Runs a synthetic storage-node workload against a read cache and reports
//! its statistics.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinSet;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use read_cache::workload::{run_worker, WorkerReport};
use read_cache::{close_and_join, spawn_stats_reporter, Config, ReadCache};

/// Main entry point for the read cache load driver.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load and validate configuration from environment variables
/// 3. Create the read cache with the configured byte budget
/// 4. Start background stats reporter
/// 5. Run workload workers until done or until SIGINT/SIGTERM
/// 6. Log final statistics and close the cache
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "read_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting read cache load driver");

    let config = Config::from_env();
    config.validate().context("invalid configuration")?;
    info!(
        "Configuration loaded: capacity_bytes={}, workers={}, entries_per_worker={}, entry_size={}, stats_interval={}s",
        config.capacity_bytes,
        config.workers,
        config.entries_per_worker,
        config.entry_size,
        config.stats_interval
    );

    let cache = Arc::new(ReadCache::from_config(&config)?);
    let reporter = spawn_stats_reporter(
        cache.clone(),
        Duration::from_secs(config.stats_interval),
    );

    let started = Instant::now();
    let mut workers = JoinSet::new();
    for owner_id in 0..config.workers as i64 {
        let cache = cache.clone();
        let entries = config.entries_per_worker;
        let entry_size = config.entry_size;
        workers.spawn_blocking(move || run_worker(&*cache, owner_id, entries, entry_size));
    }

    let outcome = tokio::select! {
        total = collect(&mut workers) => Some(total),
        _ = shutdown_signal() => None,
    };

    // Close before reporting any worker failure; workers still running
    // observe the closed cache and stop
    let (stats, reports) = close_and_join(&*cache, reporter).await?;

    match outcome {
        Some(Ok(total)) => info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            stats_reports = reports,
            "Workload complete: {}",
            serde_json::to_string(&total)?
        ),
        Some(Err(err)) => {
            info!("Final cache stats: {}", serde_json::to_string(&stats)?);
            return Err(err.context("workload failed"));
        }
        None => {
            warn!("Workload interrupted");
            while workers.join_next().await.is_some() {}
        }
    }
    info!("Final cache stats: {}", serde_json::to_string(&stats)?);

    info!("Read cache load driver shutdown complete");
    Ok(())
}

/// Waits for every worker and sums their reports.
async fn collect(
    workers: &mut JoinSet<read_cache::Result<WorkerReport>>,
) -> anyhow::Result<WorkerReport> {
    let mut total = WorkerReport::default();
    while let Some(joined) = workers.join_next().await {
        let report = joined.context("worker panicked")??;
        total.merge(&report);
    }
    Ok(total)
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
