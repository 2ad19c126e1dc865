//! Queries over the movie catalog.

use std::sync::Arc;

use crate::catalog::{CatalogError, Movie, MovieReader};

/// Searches the catalog produced by a [`MovieReader`].
///
/// Each query loads the catalog through the reader, so wrapping the reader in
/// a [`CachingMovieReader`](crate::catalog::CachingMovieReader) is what keeps
/// repeated queries cheap.
#[derive(Clone)]
pub struct MovieFinder {
    reader: Arc<dyn MovieReader>,
}

impl MovieFinder {
    pub fn new(reader: Arc<dyn MovieReader>) -> Self {
        Self { reader }
    }

    /// Movies whose director contains `director`, ignoring case.
    pub async fn directed_by(&self, director: &str) -> Result<Vec<Movie>, CatalogError> {
        let movies = self.reader.load_movies().await?;
        Ok(movies
            .iter()
            .filter(|movie| movie.is_directed_by(director))
            .cloned()
            .collect())
    }

    /// Movies released in `year`.
    pub async fn released_year_by(&self, year: u16) -> Result<Vec<Movie>, CatalogError> {
        let movies = self.reader.load_movies().await?;
        Ok(movies
            .iter()
            .filter(|movie| movie.release_year == year)
            .cloned()
            .collect())
    }
}
