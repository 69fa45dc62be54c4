//! Expiry sweep for the in-memory cache.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::MemoryCache;

/// Spawns a task that purges expired entries from `cache` every `interval`.
///
/// Reads already treat expired entries as misses; the sweep only reclaims
/// memory. Abort the returned handle on shutdown.
pub fn spawn_sweep_task(cache: Arc<MemoryCache>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            interval_ms = interval.as_millis() as u64,
            "Starting cache sweep task"
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.purge_expired().await;
            if removed > 0 {
                info!("Cache sweep: removed {} expired entries", removed);
            } else {
                debug!("Cache sweep: no expired entries found");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheClient;

    #[tokio::test]
    async fn test_sweep_removes_expired_entries() {
        let cache = Arc::new(MemoryCache::new());
        cache
            .set("stats", "{}", Duration::from_millis(20))
            .await
            .unwrap();

        let handle = spawn_sweep_task(cache.clone(), Duration::from_millis(50));
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert!(cache.is_empty().await, "Expired entry should have been swept");
        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_preserves_live_entries() {
        let cache = Arc::new(MemoryCache::new());
        cache
            .set("posts", "[]", Duration::from_secs(3600))
            .await
            .unwrap();

        let handle = spawn_sweep_task(cache.clone(), Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(cache.get("posts").await.unwrap().as_deref(), Some("[]"));
        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_task_can_be_aborted() {
        let cache = Arc::new(MemoryCache::new());

        let handle = spawn_sweep_task(cache, Duration::from_millis(10));
        handle.abort();

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
