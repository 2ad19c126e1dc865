//! Cache Proxy demo
//!
//! Loads the movie catalog through a caching reader and runs a director
//! query a few times, showing hits inside the TTL and a reload after it.
//!
//! Usage: `cache_proxy [director]`

use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cache_proxy::catalog::{CachingMovieReader, CsvMovieReader, MovieFinder};
use cache_proxy::{spawn_cleanup_task, CacheManager, Config, SelectionRule};

/// Entry point.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the cache manager and start the TTL cleanup task
/// 4. Wrap the CSV reader in the caching decorator
/// 5. Query twice within the TTL, then once after it
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cache_proxy=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: ttl={}ms, max_entries={:?}, pattern={}, cleanup_interval={}s, metadata={}",
        config.ttl_ms,
        config.max_entries,
        config.selection_pattern,
        config.cleanup_interval,
        config.metadata.display()
    );

    let manager = Arc::new(CacheManager::new(config.policy())?);
    let cleanup_handle = spawn_cleanup_task(Arc::clone(&manager), config.cleanup_interval());

    let reader = CsvMovieReader::new(&config.metadata)
        .with_context(|| format!("cannot use metadata {}", config.metadata.display()))?;
    let rule = SelectionRule::name_pattern(&config.selection_pattern)?;
    let caching_reader = CachingMovieReader::new(reader, Arc::clone(&manager), rule)?;
    let finder = MovieFinder::new(Arc::new(caching_reader));

    let director = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "James Cameron".to_string());

    for round in 1..=3 {
        if round == 3 {
            // Let the cached catalog expire so the last round reloads it
            tokio::time::sleep(config.ttl()).await;
        }
        let movies = finder.directed_by(&director).await?;
        info!(round, count = movies.len(), "movies directed by {}", director);
        if round == 1 {
            println!("{}", serde_json::to_string_pretty(&movies)?);
        }
    }

    for cache in manager.caches() {
        let stats = cache.stats().await;
        info!(
            cache = cache.name(),
            hit_rate = stats.hit_rate(),
            "cache stats: {}",
            serde_json::to_string(&stats)?
        );
    }

    cleanup_handle.abort();
    info!("Shutdown complete");
    Ok(())
}
