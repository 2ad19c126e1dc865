//! Caching decorator for movie readers.

use std::sync::Arc;

use async_trait::async_trait;

use crate::cache::CacheManager;
use crate::catalog::{CatalogError, Movie, MovieReader};
use crate::error::Result;
use crate::intercept::{CachingInterceptor, Operation, SelectionRule};

/// The catalog load, cacheable under the reader's default cache name.
pub const LOAD_MOVIES: Operation = Operation::new("load_movies").cacheable();

/// A [`MovieReader`] that serves repeated loads from a shared cache.
///
/// Callers see the same trait as the wrapped reader; they cannot tell a
/// cache sits in between.
#[derive(Debug)]
pub struct CachingMovieReader<R> {
    interceptor: CachingInterceptor<R>,
}

impl<R> CachingMovieReader<R>
where
    R: MovieReader + 'static,
{
    /// Wraps `target` with caches from `manager`.
    ///
    /// The cache name defaults to the reader's concrete type name.
    pub fn new(target: R, manager: Arc<CacheManager>, rule: SelectionRule) -> Result<Self> {
        let interceptor = CachingInterceptor::builder()
            .target(Arc::new(target))
            .cache_manager(manager)
            .selection(rule)
            .build()?;
        Ok(Self::from_interceptor(interceptor))
    }

    /// Wraps an already configured interceptor, e.g. one with a custom
    /// cache name strategy.
    pub fn from_interceptor(interceptor: CachingInterceptor<R>) -> Self {
        Self { interceptor }
    }

    pub fn interceptor(&self) -> &CachingInterceptor<R> {
        &self.interceptor
    }

    /// Catalog currently cached, if any, without loading it.
    pub async fn cached_movies(&self) -> Option<Arc<Vec<Movie>>> {
        self.interceptor.cached(&LOAD_MOVIES).await
    }
}

#[async_trait]
impl<R> MovieReader for CachingMovieReader<R>
where
    R: MovieReader + 'static,
{
    async fn load_movies(&self) -> std::result::Result<Arc<Vec<Movie>>, CatalogError> {
        self.interceptor
            .intercept(&LOAD_MOVIES, |reader| async move { reader.load_movies().await })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct DummyMovieReader {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl MovieReader for DummyMovieReader {
        async fn load_movies(&self) -> std::result::Result<Arc<Vec<Movie>>, CatalogError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(Vec::new()))
        }
    }

    #[tokio::test]
    async fn test_caching() {
        let manager = Arc::new(CacheManager::default());
        let reader = CachingMovieReader::new(
            DummyMovieReader::default(),
            manager,
            SelectionRule::Marked,
        )
        .unwrap();

        assert!(reader.cached_movies().await.is_none());

        let movies = reader.load_movies().await.unwrap();
        assert!(reader.cached_movies().await.is_some());

        let again = reader.load_movies().await.unwrap();
        assert!(Arc::ptr_eq(&movies, &again));
        assert_eq!(reader.interceptor().target().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_pattern_that_misses_disables_caching() {
        let manager = Arc::new(CacheManager::default());
        let reader = CachingMovieReader::new(
            DummyMovieReader::default(),
            manager,
            SelectionRule::name_pattern("fetch*").unwrap(),
        )
        .unwrap();

        let first = reader.load_movies().await.unwrap();
        let second = reader.load_movies().await.unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(reader.interceptor().target().calls.load(Ordering::SeqCst), 2);
    }
}
