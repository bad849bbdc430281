//! Error handling for the Spotinst SDK
//!
//! Every public operation returns [`Result<T>`]. The [`Error`] variants follow
//! the layer that produced them, and no layer rewrites an error coming from
//! below:
//!
//! - [`Error::Config`] - missing or invalid configuration
//! - [`Error::Validation`] - a required input field was not set (no request sent)
//! - [`Error::Transport`] - network-level failure
//! - [`Error::Context`] - the caller's context was cancelled or its deadline passed
//! - [`Error::Api`] - the API answered with a structured error payload
//!
//! # Example
//!
//! ```rust
//! use spotinst_sdk::error::{ApiError, Error, ErrorDetail};
//!
//! let err: Error = ApiError::new(
//!     404,
//!     None,
//!     vec![ErrorDetail::new("CLUSTER_DOESNT_EXIST", "Cluster not found")],
//! )
//! .into();
//!
//! assert!(err.is_not_found());
//! assert!(!err.is_retryable());
//! assert_eq!(err.api_error().and_then(|e| e.code()), Some("CLUSTER_DOESNT_EXIST"));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use spotinst_config::ConfigError;
use thiserror::Error;

/// SDK error type
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Required input missing, detected before any network I/O
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Connection refused, TLS failure, transport timeout, ...
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Caller's context was cancelled or its deadline elapsed
    #[error("Context error: {0}")]
    Context(#[from] ContextError),

    /// Structured error returned by the API
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Request body could not be serialized
    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// Response body could not be deserialized
    #[error("Failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Result type alias for SDK operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// The structured API error, if this is one
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Error::Api(e) => Some(e),
            _ => None,
        }
    }

    /// Returns true if this is a "not found" error (404)
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Api(e) if e.status == 404)
    }

    /// Returns true if this is an authentication/authorization error (401/403)
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Api(e) if e.status == 401 || e.status == 403)
    }

    /// Returns true if this is a rate limiting error (429)
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Error::Api(e) if e.status == 429)
    }

    /// Returns true if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Error::Api(e) if e.status >= 500)
    }

    /// Returns true if this is a timeout (transport timeout or context deadline)
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            Error::Transport(e) => e.is_timeout(),
            Error::Context(ContextError::DeadlineExceeded) => true,
            _ => false,
        }
    }

    /// Returns true if repeating the same request might succeed
    ///
    /// Context errors are never retryable: the caller asked to stop.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Api(_) => self.is_server_error() || self.is_rate_limited(),
            Error::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}

/// A required input was missing or unusable
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Name of the offending input field
    pub field: String,
    /// What was wrong with it
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// A required field was left unset
    pub fn required(field: impl Into<String>) -> Self {
        Self::new(field, "required field is not set")
    }
}

/// Why a [`crate::Context`] stopped a call
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextError {
    #[error("context cancelled")]
    Cancelled,
    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

/// One entry of the API's `response.errors` array
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ErrorDetail {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            field: None,
        }
    }
}

/// Structured error returned by the API for a 4xx/5xx response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status code
    pub status: u16,
    /// Request ID assigned by the API, useful when contacting support
    pub request_id: Option<String>,
    /// Error entries from the response payload
    pub errors: Vec<ErrorDetail>,
}

impl ApiError {
    pub fn new(status: u16, request_id: Option<String>, errors: Vec<ErrorDetail>) -> Self {
        Self {
            status,
            request_id,
            errors,
        }
    }

    /// Code of the first error entry
    pub fn code(&self) -> Option<&str> {
        self.errors.first().map(|e| e.code.as_str())
    }

    /// Message of the first error entry
    pub fn message(&self) -> Option<&str> {
        self.errors.first().map(|e| e.message.as_str())
    }

    /// True if any error entry carries `code`
    pub fn has_code(&self, code: &str) -> bool {
        self.errors.iter().any(|e| e.code == code)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.status)?;
        if let Some(id) = &self.request_id {
            write!(f, " (request: {:?})", id)?;
        }
        for (i, e) in self.errors.iter().enumerate() {
            let sep = if i == 0 { " " } else { "; " };
            write!(f, "{}{}: {}", sep, e.code, e.message)?;
            if let Some(field) = &e.field {
                write!(f, " [field: {}]", field)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}
