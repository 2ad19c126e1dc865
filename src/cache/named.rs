//! Named Cache Module
//!
//! Thread-safe handle around a [`CacheStore`], shared by every caller that
//! resolves the same cache name.

use std::any::Any;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::{CacheStats, CacheStore, CachedValue};

// == Cache ==
/// A single named key/value store with uniform time-to-live.
#[derive(Debug)]
pub struct Cache {
    name: String,
    ttl: Duration,
    store: RwLock<CacheStore>,
}

impl Cache {
    /// Creates an empty cache.
    ///
    /// # Arguments
    /// * `name` - Stable identity of the cache
    /// * `ttl` - Lifetime of each entry after it is written
    /// * `max_entries` - Optional LRU size bound
    pub fn new(name: impl Into<String>, ttl: Duration, max_entries: Option<usize>) -> Self {
        Self {
            name: name.into(),
            ttl,
            store: RwLock::new(CacheStore::new(ttl, max_entries)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // == Get ==
    /// Returns the live value stored under `key`, if any.
    pub async fn get(&self, key: &str) -> Option<CachedValue> {
        self.lookup(key, Some).await
    }

    /// Typed lookup. A value of another type is treated as absent and
    /// counted as a miss.
    pub async fn get_as<V>(&self, key: &str) -> Option<Arc<V>>
    where
        V: Any + Send + Sync,
    {
        self.lookup(key, |value| match value.downcast::<V>() {
            Ok(typed) => Some(typed),
            Err(_) => {
                debug!(cache = %self.name, key, "cached value has unexpected type");
                None
            }
        })
        .await
    }

    /// Shared read path for [`get`](Self::get) and [`get_as`](Self::get_as).
    ///
    /// Live entries and absent keys of an unbounded store are answered under
    /// the read lock. The write lock is taken only to purge an expired entry
    /// or to refresh LRU order.
    async fn lookup<T, F>(&self, key: &str, accept: F) -> Option<T>
    where
        F: Fn(CachedValue) -> Option<T>,
    {
        {
            let store = self.store.read().await;
            if !store.is_bounded() {
                if let Some(value) = store.peek_at(key, Instant::now()) {
                    return store.record_lookup(accept(value));
                }
                if !store.contains_key(key) {
                    return store.record_lookup(None);
                }
            }
        }

        let mut store = self.store.write().await;
        let found = store.fetch_at(key, Instant::now()).and_then(accept);
        store.record_lookup(found)
    }

    // == Put ==
    /// Stores `value` under `key`, written now.
    pub async fn put(&self, key: impl Into<String>, value: CachedValue) {
        self.store.write().await.put(key.into(), value);
    }

    // == Peek ==
    /// Side-effect free read: no stats, no purge.
    pub async fn peek(&self, key: &str) -> Option<CachedValue> {
        self.store.read().await.peek(key)
    }

    /// Typed variant of [`peek`](Self::peek).
    pub async fn peek_as<V>(&self, key: &str) -> Option<Arc<V>>
    where
        V: Any + Send + Sync,
    {
        self.peek(key).await?.downcast::<V>().ok()
    }

    /// Drops every expired entry, returning the count.
    pub async fn purge_expired(&self) -> usize {
        self.store.write().await.purge_expired()
    }

    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cache_put_get() {
        let cache = Cache::new("movies", Duration::from_secs(3), None);
        cache.put("load_movies", Arc::new(vec![1u32, 2, 3])).await;

        let value = cache.get_as::<Vec<u32>>("load_movies").await.unwrap();
        assert_eq!(*value, vec![1, 2, 3]);
        assert_eq!(cache.name(), "movies");
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_cache_get_as_wrong_type_is_absent() {
        let cache = Cache::new("movies", Duration::from_secs(3), None);
        cache.put("k", Arc::new(42u64)).await;

        assert!(cache.get_as::<String>("k").await.is_none());
        assert_eq!(*cache.get_as::<u64>("k").await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_cache_wrong_type_counts_as_miss() {
        let cache = Cache::new("movies", Duration::from_secs(3), None);
        cache.put("k", Arc::new(1u64)).await;

        assert!(cache.get_as::<String>("k").await.is_none());
        let stats = cache.stats().await;
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 1);

        // Bounded stores take the write path and must agree
        let bounded = Cache::new("bounded", Duration::from_secs(3), Some(4));
        bounded.put("k", Arc::new(1u64)).await;
        assert!(bounded.get_as::<String>("k").await.is_none());
        assert_eq!(bounded.stats().await.misses, 1);
        assert_eq!(bounded.stats().await.hits, 0);
    }

    #[tokio::test]
    async fn test_cache_hits_do_not_need_exclusive_lock() {
        let cache = Cache::new("shared", Duration::from_secs(3), None);
        cache.put("k", Arc::new(7u32)).await;

        // Another reader holds the lock for the duration of the lookups
        let _reader = cache.store.read().await;
        let hit = tokio::time::timeout(Duration::from_millis(200), cache.get_as::<u32>("k"))
            .await
            .expect("hit should not wait for exclusive access");
        assert_eq!(*hit.unwrap(), 7);

        let miss = tokio::time::timeout(Duration::from_millis(200), cache.get("absent"))
            .await
            .expect("miss should not wait for exclusive access");
        assert!(miss.is_none());
    }

    #[tokio::test]
    async fn test_cache_expired_read_purges_entry() {
        let cache = Cache::new("purge_on_read", Duration::from_millis(30), None);
        cache.put("k", Arc::new(1u8)).await;

        tokio::time::sleep(Duration::from_millis(60)).await;

        assert!(cache.get("k").await.is_none());
        assert!(cache.is_empty().await);
        let stats = cache.stats().await;
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.expirations, 1);
    }

    #[tokio::test]
    async fn test_cache_expiry_scenario() {
        let cache = Cache::new("scenario", Duration::from_millis(200), None);
        let obj: CachedValue = Arc::new("obj".to_string());
        cache.put("k", obj.clone()).await;

        let first = cache.get("k").await.unwrap();
        assert!(Arc::ptr_eq(&first, &obj));

        tokio::time::sleep(Duration::from_millis(100)).await;
        let second = cache.get("k").await.unwrap();
        assert!(Arc::ptr_eq(&second, &obj));

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(cache.get("k").await.is_none());
    }

    #[tokio::test]
    async fn test_cache_peek_does_not_count() {
        let cache = Cache::new("peek", Duration::from_secs(3), None);
        cache.put("k", Arc::new(1u8)).await;

        assert_eq!(*cache.peek_as::<u8>("k").await.unwrap(), 1);
        let stats = cache.stats().await;
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
    }

    #[tokio::test]
    async fn test_cache_purge_expired() {
        let cache = Cache::new("purge", Duration::from_millis(30), None);
        cache.put("a", Arc::new(1u8)).await;
        cache.put("b", Arc::new(2u8)).await;

        tokio::time::sleep(Duration::from_millis(60)).await;

        assert_eq!(cache.purge_expired().await, 2);
        assert!(cache.is_empty().await);
    }
}
