//! Stats Reporter Task
//!
//! Background task that periodically logs a read cache statistics snapshot.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::{CacheStats, EvictionPolicy, ReadCache};
use crate::error::Result;

/// Spawns a background task that periodically logs cache statistics.
///
/// The task sleeps for `interval` between reports and exits on its own once
/// the cache has been closed. The join handle resolves to the number of
/// reports emitted.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(ReadCache::new(64 * 1024 * 1024)?);
/// let reporter = spawn_stats_reporter(cache.clone(), Duration::from_secs(5));
/// // Later, during shutdown:
/// cache.close()?;
/// let reports = reporter.await?;
/// ```
pub fn spawn_stats_reporter<P>(cache: Arc<ReadCache<P>>, interval: Duration) -> JoinHandle<u64>
where
    P: EvictionPolicy + Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!(?interval, "starting read cache stats reporter");

        let mut reports = 0;
        loop {
            tokio::time::sleep(interval).await;

            // A closed cache refuses stats, which ends the task
            let Ok(stats) = cache.stats() else {
                debug!(reports, "read cache closed, stats reporter exiting");
                break;
            };

            info!(
                entries = stats.total_entries,
                used_bytes = stats.used_bytes,
                capacity_bytes = stats.capacity_bytes,
                hits = stats.hits,
                misses = stats.misses,
                evictions = stats.evictions,
                rejections = stats.rejections,
                hit_rate = stats.hit_rate(),
                utilization = stats.utilization(),
                "read cache stats"
            );
            reports += 1;
        }
        reports
    })
}

/// Takes a final stats snapshot, closes the cache and waits for the reporter.
///
/// Returns the snapshot and the number of reports the task emitted. A reporter
/// that panicked or was aborted counts as zero reports.
pub async fn close_and_join<P>(
    cache: &ReadCache<P>,
    reporter: JoinHandle<u64>,
) -> Result<(CacheStats, u64)>
where
    P: EvictionPolicy,
{
    let stats = cache.stats()?;
    cache.close()?;

    let reports = match reporter.await {
        Ok(reports) => reports,
        Err(err) => {
            warn!("stats reporter did not finish cleanly: {}", err);
            0
        }
    };
    Ok((stats, reports))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reporter_exits_after_close() {
        let cache = Arc::new(ReadCache::new(1024).unwrap());
        cache.put(1, 1, b"value").unwrap();

        let handle = spawn_stats_reporter(cache.clone(), Duration::from_millis(10));

        // Let a few reports go out
        tokio::time::sleep(Duration::from_millis(100)).await;
        cache.close().unwrap();

        let reports = tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("reporter should stop once the cache is closed")
            .unwrap();
        assert!(reports >= 1, "expected at least one report, got {reports}");
    }

    #[tokio::test]
    async fn test_reporter_leaves_cache_untouched() {
        let cache = Arc::new(ReadCache::new(1024).unwrap());
        cache.put(1, 1, b"value").unwrap();

        let handle = spawn_stats_reporter(cache.clone(), Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(cache.count().unwrap(), 1);
        assert_eq!(cache.get(1, 1).unwrap().as_deref(), Some(&b"value"[..]));

        handle.abort();
    }

    #[tokio::test]
    async fn test_close_and_join_shuts_everything_down() {
        let cache = Arc::new(ReadCache::new(1024).unwrap());
        cache.put(1, 1, b"value").unwrap();
        let handle = spawn_stats_reporter(cache.clone(), Duration::from_millis(10));

        let (stats, _reports) = tokio::time::timeout(
            Duration::from_secs(1),
            close_and_join(&*cache, handle),
        )
        .await
        .expect("reporter should stop once the cache is closed")
        .unwrap();

        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.used_bytes, 5);
        assert!(cache.is_closed());
    }

    #[tokio::test]
    async fn test_close_and_join_tolerates_aborted_reporter() {
        let cache = ReadCache::new(1024).unwrap();
        let handle = tokio::spawn(std::future::pending::<u64>());
        handle.abort();

        let (_, reports) = close_and_join(&cache, handle).await.unwrap();

        assert_eq!(reports, 0);
        assert!(cache.is_closed());
    }

    #[tokio::test]
    async fn test_reporter_can_be_aborted() {
        let cache = Arc::new(ReadCache::new(1024).unwrap());

        let handle = spawn_stats_reporter(cache, Duration::from_secs(1));

        // Abort immediately
        handle.abort();

        // Wait a bit and verify task is finished
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
