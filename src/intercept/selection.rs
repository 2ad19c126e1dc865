//! Selection Rules
//!
//! Decide which operations of a wrapped target go through the cache.

use glob::Pattern;

use crate::error::{CacheError, Result};

// == Cacheable Marker ==
/// Marker declaring an operation cacheable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cacheable {
    /// Cache to use instead of the target's default cache name
    pub cache_name: Option<&'static str>,
}

// == Operation ==
/// Static identity of a loader operation.
///
/// Decorators declare one constant per operation they expose:
///
/// ```
/// use cache_proxy::intercept::Operation;
///
/// const LOAD_MOVIES: Operation = Operation::new("load_movies").cacheable();
/// assert_eq!(LOAD_MOVIES.name(), "load_movies");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    name: &'static str,
    marker: Option<Cacheable>,
}

impl Operation {
    pub const fn new(name: &'static str) -> Self {
        Self { name, marker: None }
    }

    /// Attaches the cacheable marker.
    pub const fn cacheable(self) -> Self {
        Self {
            name: self.name,
            marker: Some(Cacheable { cache_name: None }),
        }
    }

    /// Attaches the cacheable marker with a cache name override.
    pub const fn cacheable_in(self, cache_name: &'static str) -> Self {
        Self {
            name: self.name,
            marker: Some(Cacheable {
                cache_name: Some(cache_name),
            }),
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn marker(&self) -> Option<Cacheable> {
        self.marker
    }

    /// Cache name override carried by the marker, if any.
    pub fn cache_name_override(&self) -> Option<&'static str> {
        self.marker.and_then(|m| m.cache_name)
    }
}

// == Selection Rule ==
/// Predicate over operations, fixed when the interceptor is built.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionRule {
    /// Select operations whose name matches a glob such as `load*`
    NamePattern(Pattern),
    /// Select operations declared with [`Operation::cacheable`]
    Marked,
}

impl SelectionRule {
    /// Compiles a glob-style name pattern.
    pub fn name_pattern(pattern: &str) -> Result<Self> {
        let trimmed = pattern.trim();
        if trimmed.is_empty() {
            return Err(CacheError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: "pattern is empty".to_string(),
            });
        }
        Pattern::new(trimmed)
            .map(SelectionRule::NamePattern)
            .map_err(|e| CacheError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.msg.to_string(),
            })
    }

    /// Returns true when calls to `operation` must be cached.
    ///
    /// Only the operation identity is consulted, never call arguments.
    pub fn selects(&self, operation: &Operation) -> bool {
        match self {
            SelectionRule::NamePattern(pattern) => pattern.matches(operation.name()),
            SelectionRule::Marked => operation.marker().is_some(),
        }
    }
}

impl Default for SelectionRule {
    fn default() -> Self {
        SelectionRule::Marked
    }
}
