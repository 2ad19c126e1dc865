//! Cache Module
//!
//! Named in-memory caches with write-time expiry, plus the manager that owns
//! them.

mod entry;
mod lru;
mod manager;
mod named;
mod stats;
mod store;


// Re-export public types
pub use entry::{CacheEntry, CachedValue};
pub use manager::{CacheManager, CachePolicy, DEFAULT_TTL};
pub use named::Cache;
pub use stats::CacheStats;
pub use store::CacheStore;
