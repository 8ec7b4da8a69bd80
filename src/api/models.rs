//! API Data Models
//!
//! The response envelope shared by the live and mock layers, pagination
//! metadata and the HTTP verb enumeration.

use crate::error::{ImsError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Query-string parameters, kept sorted so equal maps compare equal
pub type QueryParams = BTreeMap<String, String>;

/// Status code of the synthesized timeout envelope
pub const STATUS_TIMEOUT: u16 = 408;

/// Status code of every other synthesized failure envelope
pub const STATUS_INTERNAL: u16 = 500;

/// Uniform success/failure wrapper around a response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    /// Whether the call succeeded
    pub success: bool,
    /// Payload on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Informational message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Failure message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// HTTP-like status code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    /// Present on paginated list responses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> ApiResponse<T> {
    /// Successful envelope carrying `data`
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
            status_code: Some(200),
            pagination: None,
        }
    }

    /// Failure envelope
    pub fn failure(status_code: u16, error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            error: Some(error.into()),
            status_code: Some(status_code),
            pagination: None,
        }
    }

    /// The envelope produced when a request exceeds its deadline
    pub fn timeout() -> Self {
        Self::failure(STATUS_TIMEOUT, "Request timeout")
    }

    /// Attach an informational message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attach pagination metadata
    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }

    /// Whether this envelope satisfies the success invariant:
    /// `success` set, data present, no error.
    pub fn is_success(&self) -> bool {
        self.success && self.data.is_some() && self.error.is_none()
    }

    /// Transform the payload, keeping every other field
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse {
            success: self.success,
            data: self.data.map(f),
            message: self.message,
            error: self.error,
            status_code: self.status_code,
            pagination: self.pagination,
        }
    }

    /// Split into the payload or an [`ImsError::Api`].
    ///
    /// `fallback` is used when a failure carries no message of its own.
    pub fn into_result(self, fallback: &str) -> Result<T> {
        if self.success && self.error.is_none() {
            if let Some(data) = self.data {
                return Ok(data);
            }
        }
        let message = self.error.unwrap_or_else(|| fallback.to_string());
        Err(ImsError::api(self.status_code, message))
    }
}

impl ApiResponse<serde_json::Value> {
    /// Decode a JSON payload into `T`.
    ///
    /// A payload that does not fit `T` turns the envelope into a 500 failure.
    pub fn decode<T: DeserializeOwned>(self) -> ApiResponse<T> {
        let ApiResponse {
            success,
            data,
            message,
            error,
            status_code,
            pagination,
        } = self;

        match data.map(serde_json::from_value::<T>).transpose() {
            Ok(data) => ApiResponse {
                success,
                data,
                message,
                error,
                status_code,
                pagination,
            },
            Err(e) => ApiResponse::failure(STATUS_INTERNAL, e.to_string()),
        }
    }
}

/// Pagination block of a paginated envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Current page (1-indexed)
    pub page: usize,
    /// Items per page
    pub limit: usize,
    /// Total items across all pages
    pub total: usize,
    /// `ceil(total / limit)`, 0 when `limit` is 0
    pub total_pages: usize,
}

impl Pagination {
    /// Build pagination metadata
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        let total_pages = if limit == 0 { 0 } else { total.div_ceil(limit) };
        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }

    /// Slice one page out of `items`
    pub fn slice<T>(&self, items: Vec<T>) -> Vec<T> {
        let start = self.page.saturating_sub(1).saturating_mul(self.limit);
        items.into_iter().skip(start).take(self.limit).collect()
    }
}

/// Paginated list envelope
pub type PaginatedResponse<T> = ApiResponse<Vec<T>>;

/// HTTP verb
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Upper-case verb name
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether this verb may carry a request body
    pub fn has_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }

    /// Whether this verb can back a mutation
    pub fn is_mutation(&self) -> bool {
        !matches!(self, HttpMethod::Get)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = ImsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "PATCH" => Ok(HttpMethod::Patch),
            "DELETE" => Ok(HttpMethod::Delete),
            _ => Err(ImsError::config(format!("Unsupported HTTP method: {}", s))),
        }
    }
}
