//! Cache Proxy - transparent TTL caching for expensive loaders
//!
//! Wraps a side-effect-free loader in a decorator that memoizes its results
//! in named, time-expiring caches and coalesces concurrent misses so the
//! loader runs once per key.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod intercept;
pub mod tasks;

pub use cache::{Cache, CacheManager, CachePolicy};
pub use config::Config;
pub use error::{CacheError, Result};
pub use intercept::{CachingInterceptor, Operation, SelectionRule};
pub use tasks::spawn_cleanup_task;
