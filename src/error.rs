//! Error types for the caching core
//!
//! Provides unified error handling using thiserror.
//!
//! A cache miss is not an error and never shows up here. Failures raised by
//! a wrapped target keep their own type and are passed through untouched.

use thiserror::Error;

// == Cache Error Enum ==
/// Errors raised while assembling caches and interceptors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// A required collaborator or setting is missing or invalid
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The operation name pattern could not be compiled
    #[error("Invalid selection pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

impl CacheError {
    /// Shorthand for a [`CacheError::Configuration`] error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        CacheError::Configuration(msg.into())
    }
}

// == Result Type Alias ==
/// Convenience Result type for the caching core.
pub type Result<T> = std::result::Result<T, CacheError>;
