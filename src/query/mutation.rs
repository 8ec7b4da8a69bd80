//! Writes
//!
//! A [`Mutation`] is bound to a method and an endpoint. Each call resolves
//! its data source at call time, reports the outcome through the notifier
//! and returns the decoded payload.

use crate::api::{DataSource, HttpMethod};
use crate::error::{ImsError, Result};
use crate::notify::{Notification, Notifier};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Message used when a failed write carries no message of its own
pub const MUTATION_FALLBACK: &str = "Operation failed";

/// Notification text for a successful write without a message
pub const MUTATION_SUCCESS: &str = "Operation completed successfully";

/// Picks the data source for each call
pub type SourceResolver = Arc<dyn Fn() -> Arc<dyn DataSource> + Send + Sync>;

type SuccessHook<R> = Arc<dyn Fn(&R) + Send + Sync>;
type ErrorHook = Arc<dyn Fn(&str) + Send + Sync>;

struct Pending<'a>(&'a AtomicUsize);

impl<'a> Pending<'a> {
    fn start(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for Pending<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// A write bound to one method and endpoint
pub struct Mutation<R> {
    method: String,
    endpoint: String,
    resolve: SourceResolver,
    notifier: Arc<dyn Notifier>,
    pending: AtomicUsize,
    error: Mutex<Option<String>>,
    on_success: Option<SuccessHook<R>>,
    on_error: Option<ErrorHook>,
    _payload: PhantomData<fn() -> R>,
}

impl<R> fmt::Debug for Mutation<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mutation")
            .field("method", &self.method)
            .field("endpoint", &self.endpoint)
            .field("pending", &self.pending.load(Ordering::SeqCst))
            .finish()
    }
}

impl<R: DeserializeOwned> Mutation<R> {
    /// Bind `method` and `endpoint`. The method is checked on each call.
    pub fn new(
        method: impl Into<String>,
        endpoint: impl Into<String>,
        resolve: SourceResolver,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            method: method.into(),
            endpoint: endpoint.into(),
            resolve,
            notifier,
            pending: AtomicUsize::new(0),
            error: Mutex::new(None),
            on_success: None,
            on_error: None,
            _payload: PhantomData,
        }
    }

    /// Bind to one fixed source
    pub fn with_source(
        method: impl Into<String>,
        endpoint: impl Into<String>,
        source: Arc<dyn DataSource>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self::new(method, endpoint, Arc::new(move || Arc::clone(&source)), notifier)
    }

    /// Run `hook` after each successful call
    pub fn on_success(mut self, hook: impl Fn(&R) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Arc::new(hook));
        self
    }

    /// Run `hook` with the message after each failed call
    pub fn on_error(mut self, hook: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(hook));
        self
    }

    /// Target endpoint
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Whether any call is outstanding
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::SeqCst) > 0
    }

    /// Message of the latest failed call
    pub fn error(&self) -> Option<String> {
        self.error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn verb(&self) -> Result<HttpMethod> {
        self.method
            .parse::<HttpMethod>()
            .ok()
            .filter(HttpMethod::is_mutation)
            .ok_or_else(|| ImsError::config(format!("Unsupported HTTP method: {}", self.method)))
    }

    fn set_error(&self, message: Option<String>) {
        *self.error.lock().unwrap_or_else(PoisonError::into_inner) = message;
    }

    fn fail(&self, error: ImsError) -> ImsError {
        let message = match &error {
            ImsError::Configuration(message) => message.clone(),
            other => other.to_string(),
        };
        tracing::warn!("{} {} failed: {}", self.method, self.endpoint, message);
        self.set_error(Some(message.clone()));
        self.notifier.notify(Notification::error(message.as_str()));
        if let Some(hook) = &self.on_error {
            hook(&message);
        }
        error
    }

    /// Perform the write. `payload` is dropped for DELETE.
    pub async fn invoke(&self, payload: Option<Value>) -> Result<R> {
        let method = match self.verb() {
            Ok(method) => method,
            Err(e) => return Err(self.fail(e)),
        };

        let response = {
            let _pending = Pending::start(&self.pending);
            self.set_error(None);
            let source = (self.resolve)();
            let body = if method.has_body() { payload } else { None };
            source.send(method, &self.endpoint, body).await
        };

        let message = response.message.clone();
        match response.decode::<R>().into_result(MUTATION_FALLBACK) {
            Ok(data) => {
                self.notifier.notify(Notification::success(
                    message.unwrap_or_else(|| MUTATION_SUCCESS.to_string()),
                ));
                if let Some(hook) = &self.on_success {
                    hook(&data);
                }
                Ok(data)
            }
            Err(e) => Err(self.fail(e)),
        }
    }
}
