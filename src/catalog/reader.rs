//! Movie readers
//!
//! The loader contract and its CSV implementation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::catalog::{CatalogError, Movie};

// == Movie Reader ==
/// Loads the full movie catalog.
#[async_trait]
pub trait MovieReader: Send + Sync {
    async fn load_movies(&self) -> Result<Arc<Vec<Movie>>, CatalogError>;
}

#[async_trait]
impl<R> MovieReader for Arc<R>
where
    R: MovieReader + ?Sized,
{
    async fn load_movies(&self) -> Result<Arc<Vec<Movie>>, CatalogError> {
        (**self).load_movies().await
    }
}

// == CSV Movie Reader ==
/// Reads the catalog from a CSV file on every call.
#[derive(Debug, Clone)]
pub struct CsvMovieReader {
    metadata: PathBuf,
}

impl CsvMovieReader {
    /// Creates a reader after checking the metadata file is readable.
    pub fn new(metadata: impl Into<PathBuf>) -> Result<Self, CatalogError> {
        let metadata = metadata.into();
        match std::fs::metadata(&metadata) {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Err(CatalogError::MetadataNotFound(metadata)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CatalogError::MetadataNotFound(metadata));
            }
            Err(e) => return Err(CatalogError::io(metadata, e)),
        }
        std::fs::File::open(&metadata).map_err(|e| CatalogError::io(&metadata, e))?;

        info!(metadata = %metadata.display(), "csv movie reader ready");
        Ok(Self { metadata })
    }

    pub fn metadata(&self) -> &Path {
        &self.metadata
    }

    /// Parses catalog text, skipping the header line and blank lines.
    pub fn parse(content: &str) -> Result<Vec<Movie>, CatalogError> {
        content
            .lines()
            .enumerate()
            .skip(1)
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| Movie::from_csv(line, index + 1))
            .collect()
    }
}

#[async_trait]
impl MovieReader for CsvMovieReader {
    async fn load_movies(&self) -> Result<Arc<Vec<Movie>>, CatalogError> {
        let content = tokio::fs::read_to_string(&self.metadata)
            .await
            .map_err(|e| CatalogError::io(&self.metadata, e))?;
        let movies = Self::parse(&content)?;
        debug!(count = movies.len(), "parsed movie metadata");
        Ok(Arc::new(movies))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CSV: &str = "\
title,genres,language,country,releaseYear,director,actors,imdbLink,watchedDate
Avatar,Action|Sci-Fi,English,USA,2009,James Cameron,Sam Worthington,http://www.imdb.com/title/tt0499549/,2017-04-09

Titanic,Drama|Romance,English,USA,1997,James Cameron,Leonardo DiCaprio|Kate Winslet,http://www.imdb.com/title/tt0120338/,2018-01-20
";

    #[test]
    fn test_parse_skips_header_and_blank_lines() {
        let movies = CsvMovieReader::parse(CSV).unwrap();
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[1].title, "Titanic");
    }

    #[test]
    fn test_parse_reports_line_number() {
        let content = "header\nok,but,too,short\n";
        let err = CsvMovieReader::parse(content).unwrap_err();
        assert!(matches!(err, CatalogError::Malformed { line: 2, .. }));
    }

    #[test]
    fn test_missing_file_fails_fast() {
        let result = CsvMovieReader::new("/definitely/not/here.csv");
        assert!(matches!(result, Err(CatalogError::MetadataNotFound(_))));
    }

    #[test]
    fn test_directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let result = CsvMovieReader::new(dir.path());
        assert!(matches!(result, Err(CatalogError::MetadataNotFound(_))));
    }

    #[tokio::test]
    async fn test_load_movies_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CSV.as_bytes()).unwrap();

        let reader = CsvMovieReader::new(file.path()).unwrap();
        let first = reader.load_movies().await.unwrap();
        let second = reader.load_movies().await.unwrap();

        assert_eq!(first.len(), 2);
        assert!(!Arc::ptr_eq(&first, &second), "Uncached reader parses every call");
    }
}
