//! Per-key de-duplication of in-flight fetches.

use crate::error::{Error, Result};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use tokio::sync::watch;

type Outcome<V> = Option<Result<V>>;

/// Funnels concurrent requests for the same key through one execution.
///
/// # Protocol
///
/// 1. The first caller for a key becomes the leader and registers a `watch` channel
/// 2. Later callers for that key become waiters on the channel
/// 3. The leader runs the work, publishes the outcome, and removes the entry
/// 4. If the leader is dropped mid-flight, the entry is removed and waiters get [`Error::Abandoned`]
pub(crate) struct SingleFlight<K, V> {
    inflight: Mutex<HashMap<K, watch::Receiver<Outcome<V>>>>,
}

enum Role<V> {
    Leader(watch::Sender<Outcome<V>>),
    Waiter(watch::Receiver<Outcome<V>>),
}

impl<K, V> SingleFlight<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone,
{
    pub(crate) fn new() -> Self {
        Self {
            inflight: Mutex::new(HashMap::new()),
        }
    }

    /// Run `work` for `key` unless a run for the same key is already in flight,
    /// in which case wait for and share its outcome.
    pub(crate) async fn run<F, Fut>(&self, key: K, work: F) -> Result<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        let role = {
            let mut inflight = self.inflight.lock();
            match inflight.get(&key) {
                Some(rx) => Role::Waiter(rx.clone()),
                None => {
                    let (tx, rx) = watch::channel(None);
                    inflight.insert(key.clone(), rx);
                    Role::Leader(tx)
                }
            }
        };

        match role {
            Role::Waiter(rx) => wait(rx, &key).await,
            Role::Leader(tx) => {
                let guard = FlightGuard {
                    flight: self,
                    key: Some(key),
                };
                let outcome = work().await;
                guard.finish();
                // Receivers may all be gone; nobody else needs the value then.
                let _ = tx.send(Some(outcome.clone()));
                outcome
            }
        }
    }

    #[cfg(test)]
    fn in_flight(&self) -> usize {
        self.inflight.lock().len()
    }
}

async fn wait<K: Debug, V: Clone>(mut rx: watch::Receiver<Outcome<V>>, key: &K) -> Result<V> {
    loop {
        if let Some(outcome) = rx.borrow_and_update().clone() {
            return outcome;
        }
        if rx.changed().await.is_err() {
            return match rx.borrow().clone() {
                Some(outcome) => outcome,
                None => Err(Error::Abandoned(format!("{key:?}"))),
            };
        }
    }
}

/// Removes the in-flight entry when the leader finishes or is dropped.
struct FlightGuard<'a, K: Eq + Hash, V> {
    flight: &'a SingleFlight<K, V>,
    key: Option<K>,
}

impl<K: Eq + Hash, V> FlightGuard<'_, K, V> {
    fn finish(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(key) = self.key.take() {
            self.flight.inflight.lock().remove(&key);
        }
    }
}

impl<K: Eq + Hash, V> Drop for FlightGuard<'_, K, V> {
    fn drop(&mut self) {
        self.release();
    }
}
