//! Reactive reads
//!
//! A [`Query`] owns the state of one logical read: the latest data, whether a
//! request is outstanding, and the last error. Every issue bumps a generation
//! counter; a settling request only applies its result when its generation is
//! still the latest, so out-of-order completions are dropped.

use crate::api::{ApiResponse, QueryParams};
use crate::notify::{Notification, Notifier};
use futures::future::BoxFuture;
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;

/// Message used when a failed read carries no message of its own
pub const FETCH_FALLBACK: &str = "Failed to fetch data";

/// Identity of a read: endpoint, sorted parameters and dependency values
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct QueryKey {
    pub endpoint: String,
    pub params: QueryParams,
    pub dependencies: Vec<String>,
}

impl QueryKey {
    /// Key for `endpoint` with no parameters or dependencies
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    /// Replace the parameters
    pub fn with_params(mut self, params: QueryParams) -> Self {
        self.params = params;
        self
    }

    /// Replace the dependency values
    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.endpoint)?;
        for (i, (k, v)) in self.params.iter().enumerate() {
            write!(f, "{}{}={}", if i == 0 { '?' } else { '&' }, k, v)?;
        }
        Ok(())
    }
}

/// Observable state of a query
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState<T> {
    /// Latest successful payload; kept across failures
    pub data: Option<T>,
    /// True from issue until the latest request settles
    pub is_loading: bool,
    /// Message of the latest failure, cleared on re-issue and on success
    pub error: Option<String>,
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self {
            data: None,
            is_loading: false,
            error: None,
        }
    }
}

/// Produces the response future for a key
pub type Fetcher<T> = Arc<dyn Fn(QueryKey) -> BoxFuture<'static, ApiResponse<T>> + Send + Sync>;

struct Shared<T> {
    key: Mutex<QueryKey>,
    fetch: Fetcher<T>,
    state: watch::Sender<QueryState<T>>,
    generation: AtomicU64,
    issued: AtomicUsize,
    notifier: Arc<dyn Notifier>,
}

impl<T: Clone + Send + Sync + 'static> Shared<T> {
    fn settle(&self, generation: u64, response: ApiResponse<T>) {
        let mut failure = None;
        let applied = self.state.send_if_modified(|state| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            match response.into_result(FETCH_FALLBACK) {
                Ok(data) => {
                    state.data = Some(data);
                    state.error = None;
                }
                Err(e) => {
                    let message = e.to_string();
                    state.error = Some(message.clone());
                    failure = Some(message);
                }
            }
            state.is_loading = false;
            true
        });

        if !applied {
            tracing::debug!("discarding superseded result (generation {})", generation);
            return;
        }
        if let Some(message) = failure {
            tracing::warn!("query failed: {}", message);
            self.notifier.notify(Notification::error(message));
        }
    }
}

/// One logical read with last-issued-wins semantics.
///
/// Cloning yields another handle onto the same query. Construction and
/// every re-issue spawn onto the current Tokio runtime, so they must be
/// called from within one.
pub struct Query<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for Query<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> fmt::Debug for Query<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("key", &*self.shared.key.lock().unwrap_or_else(PoisonError::into_inner))
            .field("issued", &self.shared.issued.load(Ordering::SeqCst))
            .finish()
    }
}

impl<T: Clone + Send + Sync + 'static> Query<T> {
    /// Create the query and issue its first request
    pub fn new<F>(key: QueryKey, fetch: F, notifier: Arc<dyn Notifier>) -> Self
    where
        F: Fn(QueryKey) -> BoxFuture<'static, ApiResponse<T>> + Send + Sync + 'static,
    {
        let (state, _) = watch::channel(QueryState::default());
        let query = Self {
            shared: Arc::new(Shared {
                key: Mutex::new(key),
                fetch: Arc::new(fetch),
                state,
                generation: AtomicU64::new(0),
                issued: AtomicUsize::new(0),
                notifier,
            }),
        };
        query.issue();
        query
    }

    fn issue(&self) {
        let key = self.key();
        let mut generation = 0;
        self.shared.state.send_modify(|state| {
            generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
            state.is_loading = true;
            state.error = None;
        });
        self.shared.issued.fetch_add(1, Ordering::SeqCst);
        tracing::debug!("issuing {} (generation {})", key, generation);

        let response = (self.shared.fetch)(key);
        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            let response = response.await;
            shared.settle(generation, response);
        });
    }

    /// Current key
    pub fn key(&self) -> QueryKey {
        self.shared
            .key
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Snapshot of the state
    pub fn state(&self) -> QueryState<T> {
        self.shared.state.borrow().clone()
    }

    /// Latest successful payload
    pub fn data(&self) -> Option<T> {
        self.shared.state.borrow().data.clone()
    }

    /// Whether the latest request is outstanding
    pub fn is_loading(&self) -> bool {
        self.shared.state.borrow().is_loading
    }

    /// Latest failure message
    pub fn error(&self) -> Option<String> {
        self.shared.state.borrow().error.clone()
    }

    /// How many requests this query has issued
    pub fn issued(&self) -> usize {
        self.shared.issued.load(Ordering::SeqCst)
    }

    /// Stream of state changes
    pub fn subscribe(&self) -> watch::Receiver<QueryState<T>> {
        self.shared.state.subscribe()
    }

    /// Re-issue with the current key
    pub fn refetch(&self) {
        self.issue();
    }

    /// Mark the data stale and re-issue
    pub fn invalidate(&self) {
        self.refetch();
    }

    /// Replace the parameters; issues only when they differ by value.
    /// Returns whether a request was issued.
    pub fn set_params(&self, params: QueryParams) -> bool {
        self.update_key(|key| {
            if key.params == params {
                return false;
            }
            key.params = params;
            true
        })
    }

    /// Replace the dependency values; issues only when they differ by value.
    /// Returns whether a request was issued.
    pub fn set_dependencies<I, S>(&self, dependencies: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let dependencies: Vec<String> = dependencies.into_iter().map(Into::into).collect();
        self.update_key(|key| {
            if key.dependencies == dependencies {
                return false;
            }
            key.dependencies = dependencies;
            true
        })
    }

    fn update_key(&self, change: impl FnOnce(&mut QueryKey) -> bool) -> bool {
        let changed = {
            let mut key = self
                .shared
                .key
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            change(&mut key)
        };
        if changed {
            self.issue();
        }
        changed
    }

    /// Wait until the latest issued request has settled
    pub async fn settled(&self) -> QueryState<T> {
        let mut rx = self.subscribe();
        let state = match rx.wait_for(|state| !state.is_loading).await {
            Ok(state) => state.clone(),
            // sender lives in `self`, so this only happens during teardown
            Err(_) => self.state(),
        };
        state
    }
}
