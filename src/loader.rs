//! Per-key fetch de-duplication and bounded fan-out.
//!
//! Views fetch timelines and issue statuses for many builds at once. Two
//! rules keep that traffic sane: a key (build id, issue key) is fetched at
//! most once per view lifetime, and no more than a handful of requests are in
//! flight simultaneously so the API is never burst.

use std::collections::HashSet;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex};

use futures::future::join_all;
use tokio::sync::Semaphore;

/// Tracks which keys are in flight or already resolved.
///
/// `begin` is an atomic check-and-mark: the key is claimed under the same
/// lock acquisition that inspects it, so two near-simultaneous calls for one
/// key cannot both pass a "not yet loading" check. Owned by a view run and
/// dropped (or `reset`) when the view transitions away, which makes any
/// still-outstanding fetch's result irrelevant on arrival.
#[derive(Debug, Default)]
pub struct KeyedGate<K> {
    claimed: Mutex<HashSet<K>>,
}

impl<K: Eq + Hash> KeyedGate<K> {
    pub fn new() -> Self {
        Self {
            claimed: Mutex::new(HashSet::new()),
        }
    }

    /// Claims `key` for fetching. Returns `false` when the key is already
    /// loading or loaded, in which case the caller must not issue a request.
    pub fn begin(&self, key: K) -> bool {
        self.claimed.lock().expect("gate lock poisoned").insert(key)
    }

    /// Forgets all claims; used when the selected project changes and every
    /// per-build/per-issue result is discarded.
    pub fn reset(&self) {
        self.claimed.lock().expect("gate lock poisoned").clear();
    }
}

/// Runs a set of async tasks with at most `limit` in flight at a time.
///
/// Replaces the fixed per-item delay the UI used for rate shaping; the
/// intent (don't burst the API) is preserved while completed permits free up
/// immediately instead of waiting out a timer.
pub struct BoundedFetcher {
    permits: Arc<Semaphore>,
}

impl BoundedFetcher {
    pub fn new(limit: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(limit.max(1))),
        }
    }

    pub async fn run_all<T, F, Fut>(&self, tasks: Vec<F>) -> Vec<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        join_all(tasks.into_iter().map(|task| {
            let permits = Arc::clone(&self.permits);
            async move {
                let _permit = permits.acquire().await.expect("semaphore closed");
                task().await
            }
        }))
        .await
    }
}
