//! Interception Module
//!
//! Caching decorator machinery: which operations are cached, how concurrent
//! misses are coalesced, and the interceptor tying both to a cache manager.

mod interceptor;
mod selection;
mod single_flight;

pub use interceptor::{CacheNameStrategy, CachingInterceptor, CachingInterceptorBuilder};
pub use selection::{Cacheable, Operation, SelectionRule};
pub use single_flight::{Flight, FlightKey, InFlight, Outcome, Role, Waiter};
