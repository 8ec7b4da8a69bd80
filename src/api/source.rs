//! Data source seam
//!
//! The live API client and the mock fixture layer both implement
//! [`DataSource`], so queries and mutations are written once against it.

use crate::api::models::{ApiResponse, HttpMethod, QueryParams};
use crate::mode::DataMode;
use async_trait::async_trait;
use serde_json::Value;

/// A source of envelopes addressed by endpoint path.
///
/// Implementations never fail outside the envelope: every outcome,
/// including transport trouble, comes back as an [`ApiResponse`].
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Which data mode this source serves
    fn mode(&self) -> DataMode;

    /// Read `path` with query parameters
    async fn get(&self, path: &str, params: &QueryParams) -> ApiResponse<Value>;

    /// Write to `path` with `method` and an optional JSON payload
    async fn send(&self, method: HttpMethod, path: &str, body: Option<Value>)
        -> ApiResponse<Value>;
}
