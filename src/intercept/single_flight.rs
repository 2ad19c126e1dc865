//! Single-Flight Coordination
//!
//! Ensures at most one delegate call per `(cache name, key)` is in flight.
//! The first caller becomes the leader; everyone arriving while it runs
//! subscribes to the leader's outcome instead of calling the target again.

use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::watch;
use tracing::warn;

/// Type-erased payload moved between leader and followers.
pub type Shared = Arc<dyn Any + Send + Sync>;

/// Published result of a delegate call: the value or the target's error.
pub type Outcome = std::result::Result<Shared, Shared>;

// == Flight Key ==
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FlightKey {
    pub cache_name: String,
    pub key: String,
}

impl FlightKey {
    pub fn new(cache_name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            cache_name: cache_name.into(),
            key: key.into(),
        }
    }
}

struct Pending {
    id: u64,
    outcome: watch::Receiver<Option<Outcome>>,
}

// == In-Flight Registry ==
/// Pending delegate calls, keyed by `(cache name, key)`.
#[derive(Default)]
pub struct InFlight {
    calls: Arc<DashMap<FlightKey, Pending>>,
    next_id: AtomicU64,
}

/// What a caller must do after joining a key.
pub enum Role {
    /// Run the delegate and publish its outcome
    Leader(Flight),
    /// Wait for the current leader
    Follower(Waiter),
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    // == Join ==
    /// Registers interest in `key`: the caller leads if nothing is pending,
    /// otherwise it follows the pending call.
    pub fn join(&self, key: FlightKey) -> Role {
        match self.calls.entry(key.clone()) {
            Entry::Occupied(pending) => Role::Follower(Waiter {
                outcome: pending.get().outcome.clone(),
            }),
            Entry::Vacant(slot) => {
                let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                let (tx, rx) = watch::channel(None);
                slot.insert(Pending { id, outcome: rx });
                Role::Leader(Flight {
                    calls: Arc::clone(&self.calls),
                    key,
                    id,
                    tx,
                    resolved: false,
                })
            }
        }
    }

    /// Number of keys with a delegate call outstanding.
    pub fn pending(&self) -> usize {
        self.calls.len()
    }
}

impl std::fmt::Debug for InFlight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InFlight")
            .field("pending", &self.calls.len())
            .finish()
    }
}

// == Flight ==
/// Leader's handle on a pending call.
///
/// Dropping it without [`complete`](Flight::complete) (the leader's future was
/// cancelled) closes the channel so followers retry the lookup themselves.
pub struct Flight {
    calls: Arc<DashMap<FlightKey, Pending>>,
    key: FlightKey,
    id: u64,
    tx: watch::Sender<Option<Outcome>>,
    resolved: bool,
}

impl Flight {
    /// Publishes `outcome` to every follower and returns the key to idle.
    pub fn complete(mut self, outcome: Outcome) {
        self.tx.send_replace(Some(outcome));
        self.resolved = true;
    }
}

impl Drop for Flight {
    fn drop(&mut self) {
        if !self.resolved {
            warn!(
                cache = %self.key.cache_name,
                key = %self.key.key,
                "leader dropped before publishing an outcome"
            );
        }
        let id = self.id;
        self.calls.remove_if(&self.key, |_, pending| pending.id == id);
    }
}

// == Waiter ==
/// Follower's handle on someone else's pending call.
pub struct Waiter {
    outcome: watch::Receiver<Option<Outcome>>,
}

impl Waiter {
    /// Waits for the leader's outcome.
    ///
    /// Returns `None` when the leader went away without publishing; the
    /// caller should start over.
    pub async fn wait(mut self) -> Option<Outcome> {
        match self.outcome.wait_for(Option::is_some).await {
            Ok(published) => (*published).clone(),
            Err(_) => None,
        }
    }
}
