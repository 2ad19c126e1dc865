//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with write-time expiry.

use std::any::Any;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Shared, type-erased payload stored in a cache.
///
/// The cache never inspects values; typed access goes through
/// [`Arc::downcast`].
pub type CachedValue = Arc<dyn Any + Send + Sync>;

// == Cache Entry ==
/// Represents a single cache entry with its value and write time.
#[derive(Clone)]
pub struct CacheEntry {
    /// The stored value
    pub value: CachedValue,
    /// Monotonic insertion time
    pub written_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry with an explicit write time.
    pub fn written_at(value: CachedValue, written_at: Instant) -> Self {
        Self { value, written_at }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now` under the given TTL.
    ///
    /// Boundary condition: an entry is expired as soon as `now - written_at`
    /// reaches `ttl`, so a lookup exactly at the deadline is a miss.
    pub fn is_expired_at(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.written_at) >= ttl
    }
}

impl std::fmt::Debug for CacheEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheEntry")
            .field("written_at", &self.written_at)
            .finish_non_exhaustive()
    }
}
