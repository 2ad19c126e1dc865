//! TTL Cleanup Task
//!
//! Background task that periodically drops expired entries from every cache
//! owned by a manager. Reads already treat expired entries as absent; this
//! only bounds how long dead entries occupy memory.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheManager;

/// Spawns a background task that purges expired entries every `interval`.
///
/// # Arguments
/// * `manager` - Shared manager whose caches are swept
/// * `interval` - Pause between sweeps
///
/// # Returns
/// A JoinHandle that can be aborted during shutdown.
///
/// # Example
/// ```ignore
/// let manager = Arc::new(CacheManager::default());
/// let cleanup_handle = spawn_cleanup_task(manager.clone(), Duration::from_secs(1));
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(manager: Arc<CacheManager>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            interval_ms = interval.as_millis() as u64,
            "Starting TTL cleanup task"
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = manager.purge_expired().await;

            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CachePolicy;

    #[tokio::test]
    async fn test_cleanup_task_removes_expired_entries() {
        let manager =
            Arc::new(CacheManager::new(CachePolicy::new(Duration::from_millis(50))).unwrap());
        let cache = manager.get_or_create("short");
        cache.put("expire_soon", Arc::new(1u8)).await;

        let handle = spawn_cleanup_task(manager.clone(), Duration::from_millis(100));

        tokio::time::sleep(Duration::from_millis(350)).await;

        assert_eq!(cache.len().await, 0, "Expired entry should have been swept");
        assert_eq!(cache.stats().await.expirations, 1);

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_preserves_valid_entries() {
        let manager = Arc::new(CacheManager::new(CachePolicy::new(Duration::from_secs(60))).unwrap());
        let cache = manager.get_or_create("long");
        cache.put("long_lived", Arc::new(1u8)).await;

        let handle = spawn_cleanup_task(manager.clone(), Duration::from_millis(50));

        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(*cache.get_as::<u8>("long_lived").await.unwrap(), 1);

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_can_be_aborted() {
        let manager = Arc::new(CacheManager::default());

        let handle = spawn_cleanup_task(manager, Duration::from_secs(1));
        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
