//! Caching Interceptor
//!
//! Wraps a target and routes selected operations through a named cache.

use std::any::{type_name, Any};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cache::{CacheManager, CachedValue};
use crate::error::{CacheError, Result};
use crate::intercept::selection::{Operation, SelectionRule};
use crate::intercept::single_flight::{FlightKey, InFlight, Role};

/// Derives a cache name from the wrapped target.
pub type CacheNameStrategy<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;

// == Caching Interceptor ==
/// Caching decorator core shared by concrete wrappers.
///
/// A wrapper implements the target's trait and forwards each method through
/// [`intercept`](Self::intercept). Selected operations are memoized under
/// `(cache name, operation name)`; the rest reach the target untouched.
pub struct CachingInterceptor<T> {
    target: Arc<T>,
    manager: Arc<CacheManager>,
    rule: SelectionRule,
    cache_name: String,
    in_flight: InFlight,
}

impl<T> CachingInterceptor<T>
where
    T: Send + Sync + 'static,
{
    pub fn builder() -> CachingInterceptorBuilder<T> {
        CachingInterceptorBuilder::default()
    }

    pub fn target(&self) -> &Arc<T> {
        &self.target
    }

    pub fn manager(&self) -> &Arc<CacheManager> {
        &self.manager
    }

    pub fn rule(&self) -> &SelectionRule {
        &self.rule
    }

    /// Default cache name for this target, before marker overrides.
    pub fn cache_name(&self) -> &str {
        &self.cache_name
    }

    fn cache_name_for<'a>(&'a self, operation: &Operation) -> &'a str {
        operation
            .cache_name_override()
            .unwrap_or(self.cache_name.as_str())
    }

    // == Intercept ==
    /// Runs `call` against the target, consulting the cache first when the
    /// selection rule picks `operation`.
    ///
    /// On a miss exactly one concurrent caller per key runs `call`; the
    /// others receive a clone of its outcome. Errors are returned to every
    /// waiter and never cached.
    pub async fn intercept<V, E, F, Fut>(
        &self,
        operation: &Operation,
        call: F,
    ) -> std::result::Result<V, E>
    where
        V: Clone + Send + Sync + 'static,
        E: Clone + Send + Sync + 'static,
        F: FnOnce(Arc<T>) -> Fut,
        Fut: Future<Output = std::result::Result<V, E>>,
    {
        if !self.rule.selects(operation) {
            return call(Arc::clone(&self.target)).await;
        }

        let cache_name = self.cache_name_for(operation);
        let key = operation.name();
        let cache = self.manager.get_or_create(cache_name);

        loop {
            if let Some(hit) = cache.get_as::<V>(key).await {
                debug!(cache = cache_name, key, "cache hit");
                return Ok(V::clone(&hit));
            }

            match self.in_flight.join(FlightKey::new(cache_name, key)) {
                Role::Leader(flight) => {
                    // A previous leader may have stored the value between
                    // our miss and our join.
                    if let Some(hit) = cache.peek_as::<V>(key).await {
                        flight.complete(Ok(hit.clone() as CachedValue));
                        return Ok(V::clone(&hit));
                    }

                    debug!(cache = cache_name, key, "cache miss, invoking target");
                    let outcome = call(Arc::clone(&self.target)).await;
                    match &outcome {
                        Ok(value) => {
                            let stored: CachedValue = Arc::new(value.clone());
                            cache.put(key, Arc::clone(&stored)).await;
                            info!(cache = cache_name, key, "caching return value");
                            flight.complete(Ok(stored));
                        }
                        Err(error) => {
                            warn!(cache = cache_name, key, "target failed, result not cached");
                            flight.complete(Err(Arc::new(error.clone())));
                        }
                    }
                    return outcome;
                }
                Role::Follower(waiter) => {
                    debug!(cache = cache_name, key, "joining in-flight call");
                    match waiter.wait().await {
                        Some(Ok(value)) => {
                            if let Some(value) = downcast_clone::<V>(value) {
                                return Ok(value);
                            }
                        }
                        Some(Err(error)) => {
                            if let Some(error) = downcast_clone::<E>(error) {
                                return Err(error);
                            }
                        }
                        None => {
                            debug!(cache = cache_name, key, "leader abandoned call, retrying");
                        }
                    }
                }
            }
        }
    }

    // == Cached ==
    /// Currently cached value for `operation`, without calling the target.
    pub async fn cached<V>(&self, operation: &Operation) -> Option<V>
    where
        V: Clone + Send + Sync + 'static,
    {
        let cache = self.manager.get(self.cache_name_for(operation))?;
        cache
            .peek_as::<V>(operation.name())
            .await
            .map(|value| V::clone(&value))
    }
}

fn downcast_clone<V>(value: Arc<dyn Any + Send + Sync>) -> Option<V>
where
    V: Clone + Send + Sync + 'static,
{
    value.downcast::<V>().ok().map(|typed| V::clone(&typed))
}

impl<T> fmt::Debug for CachingInterceptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachingInterceptor")
            .field("target", &type_name::<T>())
            .field("cache_name", &self.cache_name)
            .field("rule", &self.rule)
            .field("in_flight", &self.in_flight)
            .finish()
    }
}

// == Builder ==
/// Assembles a [`CachingInterceptor`], failing fast on missing pieces.
pub struct CachingInterceptorBuilder<T> {
    target: Option<Arc<T>>,
    manager: Option<Arc<CacheManager>>,
    rule: SelectionRule,
    naming: Option<CacheNameStrategy<T>>,
}

impl<T> Default for CachingInterceptorBuilder<T> {
    fn default() -> Self {
        Self {
            target: None,
            manager: None,
            rule: SelectionRule::default(),
            naming: None,
        }
    }
}

impl<T> CachingInterceptorBuilder<T>
where
    T: Send + Sync + 'static,
{
    pub fn target(mut self, target: Arc<T>) -> Self {
        self.target = Some(target);
        self
    }

    pub fn cache_manager(mut self, manager: Arc<CacheManager>) -> Self {
        self.manager = Some(manager);
        self
    }

    pub fn selection(mut self, rule: SelectionRule) -> Self {
        self.rule = rule;
        self
    }

    /// Overrides the default cache name, which is the target's type name.
    pub fn cache_name_strategy<F>(mut self, strategy: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        self.naming = Some(Arc::new(strategy));
        self
    }

    pub fn build(self) -> Result<CachingInterceptor<T>> {
        let target = self
            .target
            .ok_or_else(|| CacheError::configuration("caching target is required"))?;
        let manager = self
            .manager
            .ok_or_else(|| CacheError::configuration("cache manager is required"))?;

        let cache_name = match &self.naming {
            Some(strategy) => strategy(&target),
            None => type_name::<T>().to_string(),
        };
        if cache_name.trim().is_empty() {
            return Err(CacheError::configuration("cache name must not be empty"));
        }

        Ok(CachingInterceptor {
            target,
            manager,
            rule: self.rule,
            cache_name,
            in_flight: InFlight::new(),
        })
    }
}
