//! Catalog errors
//!
//! `Clone` so that one failed load can be handed to every caller waiting on it.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum CatalogError {
    /// The metadata file does not exist
    #[error("Movie metadata not found: {}", .0.display())]
    MetadataNotFound(PathBuf),

    /// The metadata file exists but could not be read
    #[error("Failed to read movie metadata {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: Arc<std::io::Error>,
    },

    /// A CSV record did not map to a movie
    #[error("Malformed movie record at line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}

impl CatalogError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CatalogError::Io {
            path: path.into(),
            source: Arc::new(source),
        }
    }

    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        CatalogError::Malformed {
            line,
            reason: reason.into(),
        }
    }
}
