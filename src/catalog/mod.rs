//! Catalog Module
//!
//! The movie catalog loader that the cache sits in front of, a caching
//! decorator for it, and the finder that queries it.

mod caching;
mod error;
mod finder;
mod movie;
mod reader;

pub use caching::{CachingMovieReader, LOAD_MOVIES};
pub use error::CatalogError;
pub use finder::MovieFinder;
pub use movie::Movie;
pub use reader::{CsvMovieReader, MovieReader};
