//! Cache Statistics Module
//!
//! Tracks per-cache hit, miss, expiry and eviction counts.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Cache Stats ==
/// Performance counters for a single named cache.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Lookups answered from a live entry
    pub hits: u64,
    /// Lookups that found nothing or only an expired entry
    pub misses: u64,
    /// Entries dropped because their TTL elapsed
    pub expirations: u64,
    /// Entries dropped to respect the size bound
    pub evictions: u64,
    /// Current number of stored entries, expired ones not yet purged included
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if nothing was looked up yet.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Records `count` entries dropped for being past their TTL.
    pub fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }

    // == Merge ==
    /// Folds another cache's counters into this one.
    pub fn merge(&mut self, other: &CacheStats) {
        self.hits += other.hits;
        self.misses += other.misses;
        self.expirations += other.expirations;
        self.evictions += other.evictions;
        self.total_entries += other.total_entries;
    }
}

// == Lookup Counters ==
/// Hit and miss counts, bumped from readers holding a shared lock.
#[derive(Debug, Default)]
pub struct LookupCounters {
    hits: AtomicU64,
    misses: AtomicU64,
}

impl LookupCounters {
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Copies the current counts into `stats`.
    pub fn fill(&self, stats: &mut CacheStats) {
        stats.hits = self.hits.load(Ordering::Relaxed);
        stats.misses = self.misses.load(Ordering::Relaxed);
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = CacheStats::new();
        assert_eq!(stats, CacheStats::default());
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let stats = CacheStats {
            hits: 3,
            misses: 1,
            ..CacheStats::default()
        };
        assert_eq!(stats.hit_rate(), 0.75);
    }

    #[test]
    fn test_record_expirations() {
        let mut stats = CacheStats::new();
        stats.record_expirations(3);
        stats.record_expirations(0);
        stats.record_expirations(2);
        assert_eq!(stats.expirations, 5);
    }

    #[test]
    fn test_merge() {
        let mut left = CacheStats {
            hits: 1,
            ..CacheStats::default()
        };
        left.record_eviction();
        left.set_total_entries(2);

        let mut right = CacheStats {
            misses: 1,
            ..CacheStats::default()
        };
        right.record_expirations(1);
        right.set_total_entries(3);

        left.merge(&right);
        assert_eq!(left.hits, 1);
        assert_eq!(left.misses, 1);
        assert_eq!(left.expirations, 1);
        assert_eq!(left.evictions, 1);
        assert_eq!(left.total_entries, 5);
    }

    #[test]
    fn test_lookup_counters_fill_stats() {
        let counters = LookupCounters::default();
        counters.record_hit();
        counters.record_miss();
        counters.record_miss();

        let mut stats = CacheStats {
            evictions: 4,
            ..CacheStats::default()
        };
        counters.fill(&mut stats);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.evictions, 4);
    }

    #[test]
    fn test_serializes_to_json() {
        let counters = LookupCounters::default();
        counters.record_hit();
        let mut stats = CacheStats::new();
        counters.fill(&mut stats);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["hits"], 1);
        assert_eq!(json["misses"], 0);
    }
}
