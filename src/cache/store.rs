//! Cache Store Module
//!
//! Single-threaded storage engine behind a named [`Cache`](super::Cache):
//! a HashMap of entries, write-time expiry and an optional LRU size bound.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::cache::lru::LruTracker;
use crate::cache::stats::LookupCounters;
use crate::cache::{CacheEntry, CacheStats, CachedValue};

// == Cache Store ==
/// Entry map with uniform TTL.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Access order, kept only when `max_entries` is set
    lru: LruTracker,
    /// Expiry and eviction statistics
    stats: CacheStats,
    /// Hit and miss counts, updatable through `&self`
    lookups: LookupCounters,
    /// Lifetime of every entry, counted from its write
    ttl: Duration,
    /// Optional bound on stored entries
    max_entries: Option<usize>,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store.
    ///
    /// # Arguments
    /// * `ttl` - How long an entry stays valid after being written
    /// * `max_entries` - Optional size bound, enforced with LRU eviction
    pub fn new(ttl: Duration, max_entries: Option<usize>) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            lookups: LookupCounters::default(),
            ttl,
            max_entries,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Whether reads must update LRU order.
    pub fn is_bounded(&self) -> bool {
        self.max_entries.is_some()
    }

    // == Put ==
    /// Stores a value written now, replacing any previous entry for `key`.
    ///
    /// When the store is bounded and full, the least recently used key is
    /// dropped first. Already-expired entries are purged before picking a
    /// victim so a live entry is not evicted in place of a dead one.
    pub fn put(&mut self, key: String, value: CachedValue) {
        self.put_at(key, value, Instant::now());
    }

    /// Stores a value with an explicit write time.
    pub fn put_at(&mut self, key: String, value: CachedValue, written_at: Instant) {
        if let Some(max) = self.max_entries {
            if !self.entries.contains_key(&key) && self.entries.len() >= max {
                self.purge_expired();
            }
            while !self.entries.contains_key(&key) && self.entries.len() >= max {
                match self.lru.evict_oldest() {
                    Some(victim) => {
                        self.entries.remove(&victim);
                        self.stats.record_eviction();
                    }
                    None => break,
                }
            }
            self.lru.touch(&key);
        }

        self.entries
            .insert(key, CacheEntry::written_at(value, written_at));
        self.stats.set_total_entries(self.entries.len());
    }

    // == Get ==
    /// Returns the value for `key` if it is present and not expired.
    ///
    /// An expired entry is removed on the spot and reported as a miss.
    pub fn get(&mut self, key: &str) -> Option<CachedValue> {
        self.get_at(key, Instant::now())
    }

    /// Same as [`get`](Self::get) against a caller-supplied clock.
    pub fn get_at(&mut self, key: &str, now: Instant) -> Option<CachedValue> {
        let value = self.fetch_at(key, now);
        self.record_lookup(value)
    }

    /// Live value for `key` without counting a hit or miss.
    ///
    /// Removes the entry if it has expired and refreshes its recency
    /// otherwise.
    pub fn fetch_at(&mut self, key: &str, now: Instant) -> Option<CachedValue> {
        let expired = self.entries.get(key)?.is_expired_at(now, self.ttl);

        if expired {
            self.entries.remove(key);
            self.lru.remove(key);
            self.stats.record_expirations(1);
            self.stats.set_total_entries(self.entries.len());
            return None;
        }

        if self.max_entries.is_some() {
            self.lru.touch(key);
        }
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    /// Counts a finished lookup as a hit or a miss and passes it through.
    pub fn record_lookup<T>(&self, found: Option<T>) -> Option<T> {
        match found {
            Some(_) => self.lookups.record_hit(),
            None => self.lookups.record_miss(),
        }
        found
    }

    // == Peek ==
    /// Reads without recording stats, touching recency or purging.
    pub fn peek(&self, key: &str) -> Option<CachedValue> {
        self.peek_at(key, Instant::now())
    }

    /// Same as [`peek`](Self::peek) against a caller-supplied clock.
    pub fn peek_at(&self, key: &str, now: Instant) -> Option<CachedValue> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired_at(now, self.ttl))
            .map(|entry| entry.value.clone())
    }

    // == Purge Expired ==
    /// Removes every expired entry and returns how many were dropped.
    pub fn purge_expired(&mut self) -> usize {
        let now = Instant::now();
        let ttl = self.ttl;
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now, ttl))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.entries.remove(key);
            self.lru.remove(key);
        }

        self.stats.record_expirations(expired.len());
        self.stats.set_total_entries(self.entries.len());
        expired.len()
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        self.lookups.fill(&mut stats);
        stats.set_total_entries(self.entries.len());
        stats
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
