//! Keyed query cache with request de-duplication and freshness windows.
//!
//! Lifecycle per key: miss -> one fetch shared by every concurrent caller ->
//! stored value reused until its freshness window elapses -> stale access
//! returns the old value and revalidates in the background. Failures are
//! handed to every waiter of the in-flight fetch and never stored.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, Mutex};
use tokio::time::Instant;

use crate::api::FetchError;

struct Stored<V> {
    value: V,
    fetched_at: Instant,
}

struct Slot<V> {
    value: Option<Stored<V>>,
    inflight: Option<broadcast::Sender<Result<V, FetchError>>>,
}

impl<V> Default for Slot<V> {
    fn default() -> Self {
        Self {
            value: None,
            inflight: None,
        }
    }
}

enum Plan<V> {
    Hit(V),
    Wait(broadcast::Receiver<Result<V, FetchError>>),
    Fetch,
    Revalidate(V),
}

/// Shared handle to one cache instance; cloning shares the underlying map.
/// Created once at startup and owned by the client wrapper, never reset.
pub struct QueryCache<K, V> {
    slots: Arc<Mutex<HashMap<K, Slot<V>>>>,
}

impl<K, V> Clone for QueryCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            slots: Arc::clone(&self.slots),
        }
    }
}

impl<K, V> Default for QueryCache<K, V> {
    fn default() -> Self {
        Self {
            slots: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<K, V> QueryCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up `key`, running `fetch` at most once no matter how many callers
    /// arrive while it is in flight.
    ///
    /// A fresh hit returns the stored value without invoking `fetch`. A stale
    /// hit returns the stored value immediately and spawns one background
    /// revalidation; if that revalidation fails the stale value stays.
    pub async fn get_with<F, Fut>(
        &self,
        key: K,
        stale_after: Duration,
        fetch: F,
    ) -> Result<V, FetchError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, FetchError>> + Send + 'static,
    {
        let plan = {
            let mut slots = self.slots.lock().await;
            let slot = slots.entry(key.clone()).or_default();
            if let Some(stored) = &slot.value {
                if stored.fetched_at.elapsed() < stale_after || slot.inflight.is_some() {
                    Plan::Hit(stored.value.clone())
                } else {
                    let stale = stored.value.clone();
                    let (tx, _) = broadcast::channel(1);
                    slot.inflight = Some(tx);
                    Plan::Revalidate(stale)
                }
            } else if let Some(tx) = &slot.inflight {
                Plan::Wait(tx.subscribe())
            } else {
                let (tx, _) = broadcast::channel(1);
                slot.inflight = Some(tx);
                Plan::Fetch
            }
        };

        match plan {
            Plan::Hit(value) => Ok(value),
            Plan::Wait(mut rx) => match rx.recv().await {
                Ok(result) => result,
                Err(_) => Err(FetchError::Transport("fetch interrupted".into())),
            },
            Plan::Fetch => {
                let result = fetch().await;
                self.settle(&key, result.clone()).await;
                result
            }
            Plan::Revalidate(stale) => {
                let cache = self.clone();
                let key = key.clone();
                let future = fetch();
                tokio::spawn(async move {
                    let result = future.await;
                    cache.settle(&key, result).await;
                });
                Ok(stale)
            }
        }
    }

    /// Store a success, drop a failure, and wake every waiter either way.
    async fn settle(&self, key: &K, result: Result<V, FetchError>) {
        let mut slots = self.slots.lock().await;
        let Some(slot) = slots.get_mut(key) else {
            return;
        };
        let tx = slot.inflight.take();
        if let Ok(value) = &result {
            slot.value = Some(Stored {
                value: value.clone(),
                fetched_at: Instant::now(),
            });
        }
        if slot.value.is_none() {
            slots.remove(key);
        }
        if let Some(tx) = tx {
            let _ = tx.send(result);
        }
    }
}
