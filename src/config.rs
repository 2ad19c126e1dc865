//! Configuration Module
//!
//! Loads cache and catalog settings from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::cache::CachePolicy;

/// Runtime configuration.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Lifetime of a cached result in milliseconds
    pub ttl_ms: u64,
    /// Optional bound on entries per cache
    pub max_entries: Option<usize>,
    /// Glob selecting which loader operations are cached
    pub selection_pattern: String,
    /// Background cleanup interval in seconds
    pub cleanup_interval: u64,
    /// Location of the movie metadata CSV
    pub metadata: PathBuf,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_TTL_MS` - Entry lifetime in milliseconds (default: 3000)
    /// - `CACHE_MAX_ENTRIES` - Per-cache entry bound (default: unbounded)
    /// - `CACHE_SELECTION_PATTERN` - Operation name glob (default: `load*`)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 1)
    /// - `MOVIE_METADATA` - Path of the catalog CSV (default: `data/movie_metadata.csv`)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            ttl_ms: parse_var("CACHE_TTL_MS").unwrap_or(defaults.ttl_ms),
            max_entries: parse_var("CACHE_MAX_ENTRIES").or(defaults.max_entries),
            selection_pattern: env::var("CACHE_SELECTION_PATTERN")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.selection_pattern),
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            metadata: env::var("MOVIE_METADATA")
                .map(PathBuf::from)
                .unwrap_or(defaults.metadata),
        }
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval)
    }

    /// Cache policy shared by every cache the manager creates.
    pub fn policy(&self) -> CachePolicy {
        CachePolicy {
            ttl: self.ttl(),
            max_entries: self.max_entries,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ttl_ms: 3000,
            max_entries: None,
            selection_pattern: "load*".to_string(),
            cleanup_interval: 1,
            metadata: PathBuf::from("data/movie_metadata.csv"),
        }
    }
}
