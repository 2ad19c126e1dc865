//! Recency Tracker Module
//!
//! Orders keys by last access so a size-bounded cache knows what to drop.

use std::collections::VecDeque;

// == LRU Tracker ==
/// Access order of cache keys.
///
/// Front = most recently used, back = least recently used. Only populated for
/// caches that carry a `max_entries` bound; unbounded caches never touch it.
#[derive(Debug, Default)]
pub(crate) struct LruTracker {
    order: VecDeque<String>,
}

impl LruTracker {
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks a key as most recently used.
    pub fn touch(&mut self, key: &str) {
        if self.order.front().map(String::as_str) == Some(key) {
            return;
        }
        self.remove(key);
        self.order.push_front(key.to_string());
    }

    pub fn remove(&mut self, key: &str) {
        self.order.retain(|k| k != key);
    }

    // == Evict Oldest ==
    /// Removes and returns the least recently used key.
    pub fn evict_oldest(&mut self) -> Option<String> {
        self.order.pop_back()
    }
}
