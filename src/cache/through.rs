//! Cache-through executor with per-key single flight.
//!
//! [`CacheThrough::compute_if_absent`] serves a live entry from the store
//! or runs the producer, collapsing concurrent misses for the same key onto
//! one computation. The computation is spawned onto the runtime, so a
//! caller going away (client disconnect) does not cancel it for the others
//! waiting on the same key.
//!
//! Only successes are stored. A failure is handed to every waiter and the
//! pending marker is cleared, so the next request starts a fresh attempt.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};

use super::{CacheKey, CacheStore, Cacheable, Payload};
use crate::telemetry;
use crate::{GatewayError, Result};

type Flight = Shared<BoxFuture<'static, Result<Payload>>>;

/// Compute-if-absent front of a [`CacheStore`].
#[derive(Clone)]
pub struct CacheThrough {
    store: Arc<CacheStore>,
    pending: Arc<DashMap<String, Flight>>,
}

impl CacheThrough {
    pub fn new(store: Arc<CacheStore>) -> Self {
        Self {
            store,
            pending: Arc::new(DashMap::new()),
        }
    }

    pub fn store(&self) -> &Arc<CacheStore> {
        &self.store
    }

    /// Number of computations currently in flight.
    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }

    /// Return the cached value for `key`, or compute, store and return it.
    ///
    /// At most one `producer` runs per key at a time; concurrent callers
    /// await the same result, success or failure.
    pub async fn compute_if_absent<T, F, Fut>(&self, key: &CacheKey, producer: F) -> Result<Arc<T>>
    where
        T: Cacheable,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        if let Some(payload) = self.store.get(key.as_str()) {
            return downcast(key, payload);
        }

        let flight = match self.pending.entry(key.as_str().to_owned()) {
            Entry::Occupied(entry) => {
                let endpoint = key.endpoint().to_owned();
                metrics::counter!(telemetry::CACHE_COALESCED_TOTAL, "endpoint" => endpoint)
                    .increment(1);
                tracing::debug!(key = %key, "joining in-flight computation");
                entry.get().clone()
            }
            Entry::Vacant(slot) => {
                // A computation may have settled between the lookup above and
                // claiming the slot.
                if let Some(payload) = self.store.peek(key.as_str()) {
                    return downcast(key, payload);
                }
                let flight = self.flight(key.as_str().to_owned(), producer);
                slot.insert(flight.clone());
                tokio::spawn(flight.clone());
                flight
            }
        };

        downcast(key, flight.await?)
    }

    fn flight<T, F, Fut>(&self, key: String, producer: F) -> Flight
    where
        T: Cacheable,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let pending = Arc::clone(&self.pending);

        async move {
            tracing::debug!(key = %key, "computing");
            let outcome = match AssertUnwindSafe(async move { producer().await })
                .catch_unwind()
                .await
            {
                Ok(result) => result.map(|value| T::into_payload(Arc::new(value))),
                Err(panic) => Err(GatewayError::Internal(format!(
                    "computation for {key} panicked: {}",
                    panic_message(panic.as_ref())
                ))),
            };

            match &outcome {
                Ok(payload) => store.set(key.clone(), payload.clone(), store.default_ttl()),
                Err(err) => {
                    tracing::warn!(key = %key, error = %err, "computation failed, not cached")
                }
            }
            pending.remove(&key);
            outcome
        }
        .boxed()
        .shared()
    }
}

fn downcast<T: Cacheable>(key: &CacheKey, payload: Payload) -> Result<Arc<T>> {
    T::from_payload(payload).ok_or_else(|| {
        GatewayError::Internal(format!("cache entry {key} holds an unexpected payload type"))
    })
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}
