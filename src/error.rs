//! Error types for Telecom IMS
//!
//! Expected request failures never show up here: the transport folds them
//! into [`ApiResponse`](crate::api::ApiResponse) envelopes. This type covers
//! what is left once an envelope has been judged a failure, plus local
//! problems (state file I/O, configuration, export).

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Telecom IMS operations
#[derive(Error, Debug)]
pub enum ImsError {
    /// I/O error on a local file
    #[error("I/O error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration, including unsupported mutation verbs
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Failure reported by a data source (server or mock)
    #[error("{message}")]
    Api {
        /// Status code carried by the failure envelope, if any
        status: Option<u16>,
        message: String,
    },

    /// JSON encoding or decoding error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Unknown resource or data mode name
    #[error("Unknown {kind}: '{value}'")]
    Unknown { kind: &'static str, value: String },

    /// Export could not be produced
    #[error("Export failed: {0}")]
    Export(String),
}

impl ImsError {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create an API failure from an envelope's status and message
    pub fn api(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create an unknown-name error
    pub fn unknown(kind: &'static str, value: impl Into<String>) -> Self {
        Self::Unknown {
            kind,
            value: value.into(),
        }
    }

    /// Status code of an API failure
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => *status,
            _ => None,
        }
    }

    /// Whether this error was raised before any I/O took place
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::Unknown { .. })
    }

    /// Get the path associated with this error, if any
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Result type alias for Telecom IMS operations
pub type Result<T> = std::result::Result<T, ImsError>;

/// Extension trait for adding path context to std::io::Result
pub trait IoResultExt<T> {
    /// Add path context to an I/O error
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| ImsError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_with_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = ImsError::io("/test/state.json", io_err);
        assert_eq!(err.path().unwrap(), &PathBuf::from("/test/state.json"));
        assert!(err.to_string().contains("/test/state.json"));
    }

    #[test]
    fn test_api_error_displays_message_only() {
        let err = ImsError::api(Some(408), "Request timeout");
        assert_eq!(err.to_string(), "Request timeout");
        assert_eq!(err.status(), Some(408));
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_configuration_errors() {
        assert!(ImsError::config("Unsupported HTTP method: GET").is_configuration());
        assert!(ImsError::unknown("resource", "widgets").is_configuration());
        assert_eq!(
            ImsError::unknown("data mode", "offline").to_string(),
            "Unknown data mode: 'offline'"
        );
    }
}
