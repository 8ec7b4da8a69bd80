//! HTTP API client
//!
//! Thin reqwest wrapper for the live data layer. Every call resolves to an
//! [`ApiResponse`]: a request that outlives the configured timeout is
//! dropped and reported as `408 Request timeout`, and every other problem
//! (connection refused, non-2xx status, unparseable body) becomes a 500
//! envelope carrying the underlying message.

use crate::api::models::{ApiResponse, HttpMethod, QueryParams, STATUS_INTERNAL};
use crate::api::source::DataSource;
use crate::error::{ImsError, Result};
use crate::mode::DataMode;
use crate::storage::{KeyValueStore, AUTH_TOKEN_KEY};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "http://localhost:3001/api";

/// Default request timeout: 10 seconds
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Live API configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to
    pub base_url: String,
    /// Per-request deadline
    pub timeout: Duration,
    /// Headers sent with every request
    pub headers: HeaderMap,
}

impl Default for ApiConfig {
    fn default() -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            headers,
        }
    }
}

/// REST client for the inventory API
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
    headers: RwLock<HeaderMap>,
    store: Arc<dyn KeyValueStore>,
}

impl ApiClient {
    /// Create a client, restoring a persisted bearer token if there is one
    pub fn new(config: ApiConfig, store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ImsError::config(format!("HTTP client: {}", e)))?;

        let mut headers = config.headers;
        if let Some(token) = store.get(AUTH_TOKEN_KEY) {
            match bearer(&token) {
                Ok(value) => {
                    headers.insert(AUTHORIZATION, value);
                }
                Err(e) => tracing::warn!("Ignoring persisted token: {}", e),
            }
        }

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout,
            headers: RwLock::new(headers),
            store,
        })
    }

    /// Base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Snapshot of the default headers
    pub fn headers(&self) -> HeaderMap {
        self.headers.read().map(|h| h.clone()).unwrap_or_default()
    }

    /// Persist `token` and send it as a bearer token from now on
    pub fn set_auth_token(&self, token: &str) -> Result<()> {
        let value = bearer(token)?;
        self.store.set(AUTH_TOKEN_KEY, token)?;
        self.headers
            .write()
            .map_err(|_| ImsError::config("header lock poisoned"))?
            .insert(AUTHORIZATION, value);
        tracing::debug!("Bearer token set");
        Ok(())
    }

    /// Forget the bearer token
    pub fn clear_auth_token(&self) -> Result<()> {
        self.store.remove(AUTH_TOKEN_KEY)?;
        self.headers
            .write()
            .map_err(|_| ImsError::config("header lock poisoned"))?
            .remove(AUTHORIZATION);
        tracing::debug!("Bearer token cleared");
        Ok(())
    }

    /// Persisted bearer token
    pub fn auth_token(&self) -> Option<String> {
        self.store.get(AUTH_TOKEN_KEY)
    }

    /// Whether a bearer token is stored
    pub fn is_authenticated(&self) -> bool {
        self.auth_token().is_some()
    }

    /// Perform one request and normalize the outcome into an envelope
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        params: Option<&QueryParams>,
        body: Option<&Value>,
    ) -> ApiResponse<T> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("{} {}", method, url);

        let mut builder = self.http.request(to_reqwest(method), &url).headers(self.headers());
        if let Some(params) = params.filter(|p| !p.is_empty()) {
            builder = builder.query(params);
        }
        if method.has_body() {
            if let Some(body) = body {
                builder = builder.json(body);
            }
        }

        let exchange = async {
            let response = builder.send().await.map_err(|e| e.to_string())?;
            let status = response.status();
            if !status.is_success() {
                return Err(format!("HTTP error! status: {}", status.as_u16()));
            }
            response
                .json::<ApiResponse<Value>>()
                .await
                .map_err(|e| e.to_string())
        };

        let envelope = match tokio::time::timeout(self.timeout, exchange).await {
            Ok(Ok(envelope)) => envelope,
            Ok(Err(message)) => {
                tracing::warn!("{} {} failed: {}", method, url, message);
                ApiResponse::failure(STATUS_INTERNAL, message)
            }
            Err(_) => {
                tracing::warn!("{} {} timed out after {:?}", method, url, self.timeout);
                ApiResponse::timeout()
            }
        };

        envelope.decode()
    }

    /// GET with query parameters
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Option<&QueryParams>,
    ) -> ApiResponse<T> {
        self.request(HttpMethod::Get, path, params, None).await
    }

    /// POST with an optional JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> ApiResponse<T> {
        self.with_body(HttpMethod::Post, path, body).await
    }

    /// PUT with an optional JSON body
    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> ApiResponse<T> {
        self.with_body(HttpMethod::Put, path, body).await
    }

    /// PATCH with an optional JSON body
    pub async fn patch<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> ApiResponse<T> {
        self.with_body(HttpMethod::Patch, path, body).await
    }

    /// DELETE, never with a body
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ApiResponse<T> {
        self.request(HttpMethod::Delete, path, None, None).await
    }

    async fn with_body<T: DeserializeOwned, B: Serialize>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
    ) -> ApiResponse<T> {
        let body = match body.map(serde_json::to_value).transpose() {
            Ok(body) => body,
            Err(e) => return ApiResponse::failure(STATUS_INTERNAL, e.to_string()),
        };
        self.request(method, path, None, body.as_ref()).await
    }
}

fn bearer(token: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|_| ImsError::config("auth token contains characters not allowed in a header"))
}

fn to_reqwest(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl DataSource for ApiClient {
    fn mode(&self) -> DataMode {
        DataMode::Live
    }

    async fn get(&self, path: &str, params: &QueryParams) -> ApiResponse<Value> {
        self.request(HttpMethod::Get, path, Some(params), None).await
    }

    async fn send(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
    ) -> ApiResponse<Value> {
        self.request(method, path, None, body.as_ref()).await
    }
}
