//! Cache Manager Module
//!
//! Owns every named cache and hands out shared handles to them.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tracing::info;

use crate::cache::{Cache, CacheStats};
use crate::error::{CacheError, Result};

/// TTL applied when no policy is configured.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3);

// == Cache Policy ==
/// Settings shared by every cache a manager creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    /// Entry lifetime, counted from the write
    pub ttl: Duration,
    /// Optional per-cache entry bound
    pub max_entries: Option<usize>,
}

impl CachePolicy {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            max_entries: None,
        }
    }

    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = Some(max_entries);
        self
    }

    /// Rejects a zero TTL or a zero entry bound.
    pub fn validate(&self) -> Result<()> {
        if self.ttl.is_zero() {
            return Err(CacheError::configuration("cache ttl must be greater than zero"));
        }
        if self.max_entries == Some(0) {
            return Err(CacheError::configuration(
                "max_entries must be greater than zero when set",
            ));
        }
        Ok(())
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

// == Cache Manager ==
/// Registry of named caches.
///
/// Caches are created lazily on first reference and live as long as the
/// manager. Looking a name up twice yields the same `Arc<Cache>`.
#[derive(Debug)]
pub struct CacheManager {
    caches: DashMap<String, Arc<Cache>>,
    policy: CachePolicy,
}

impl CacheManager {
    /// Creates a manager after validating `policy`.
    pub fn new(policy: CachePolicy) -> Result<Self> {
        policy.validate()?;
        Ok(Self {
            caches: DashMap::new(),
            policy,
        })
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    // == Get Or Create ==
    /// Returns the cache registered under `name`, creating it if needed.
    ///
    /// The shard lock held by the entry API makes concurrent first access
    /// produce exactly one cache.
    pub fn get_or_create(&self, name: &str) -> Arc<Cache> {
        if let Some(existing) = self.caches.get(name) {
            return Arc::clone(existing.value());
        }

        let entry = self.caches.entry(name.to_string()).or_insert_with(|| {
            info!(cache = name, ttl_ms = self.policy.ttl.as_millis() as u64, "creating cache");
            Arc::new(Cache::new(name, self.policy.ttl, self.policy.max_entries))
        });
        Arc::clone(entry.value())
    }

    /// Returns the cache for `name` without creating it.
    pub fn get(&self, name: &str) -> Option<Arc<Cache>> {
        self.caches.get(name).map(|entry| Arc::clone(entry.value()))
    }

    pub fn cache_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.caches.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Snapshot of all caches; no map lock is held once this returns.
    pub fn caches(&self) -> Vec<Arc<Cache>> {
        self.caches.iter().map(|e| Arc::clone(e.value())).collect()
    }

    // == Purge Expired ==
    /// Purges expired entries from every cache and returns the total.
    pub async fn purge_expired(&self) -> usize {
        let mut removed = 0;
        for cache in self.caches() {
            removed += cache.purge_expired().await;
        }
        removed
    }

    /// Counters summed across every cache.
    pub async fn stats(&self) -> CacheStats {
        let mut total = CacheStats::new();
        for cache in self.caches() {
            total.merge(&cache.stats().await);
        }
        total
    }
}

impl Default for CacheManager {
    fn default() -> Self {
        Self {
            caches: DashMap::new(),
            policy: CachePolicy::default(),
        }
    }
}
