//! Error types for apod-collector
//!
//! This module provides error handling for the library, including:
//! - Per-fetch errors raised by picture providers and the orchestrator
//! - Crate-level errors (configuration, validation, server)
//! - HTTP status code mapping and a JSON error envelope for the REST API

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for apod-collector operations
pub type Result<T> = std::result::Result<T, Error>;

/// Public message for requests whose parameters cannot be processed
pub const PUBLIC_MSG_UNPROCESSABLE: &str = "The request parameters were unprocessable";
/// Public message for any server-side failure
pub const PUBLIC_MSG_INTERNAL: &str = "An internal error occurred while processing your request";
/// Public message for unknown routes
pub const PUBLIC_MSG_NOT_FOUND: &str = "The requested resource does not exist";
/// Public message for unsupported HTTP methods
pub const PUBLIC_MSG_METHOD_NOT_ALLOWED: &str = "This HTTP Method is not allowed";

/// Main error type for apod-collector
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "CONCURRENT_REQUESTS")
        key: Option<String>,
    },

    /// Request parameters failed validation
    #[error("validation error: {0}")]
    Validation(String),

    /// Fetching pictures failed
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),
}

/// Errors raised while fetching pictures
///
/// Every variant is terminal for the fetch that produced it; the orchestrator
/// treats them uniformly as a trigger for cancelling the rest of the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Requested date is outside the range the provider serves
    #[error("request date {date} must be between {earliest} and {latest}")]
    DateOutOfRange {
        /// The requested date
        date: NaiveDate,
        /// First date the provider serves
        earliest: NaiveDate,
        /// Last date the provider serves (today)
        latest: NaiveDate,
    },

    /// Connection failure or request timeout
    #[error("unable to connect to APOD API: {0}")]
    Transport(String),

    /// Provider answered with a non-success HTTP status
    #[error("APOD API returned HTTP {status} for {date}")]
    Status {
        /// HTTP status code
        status: u16,
        /// The requested date
        date: NaiveDate,
    },

    /// Response body could not be decoded
    #[error("malformed APOD response for {date}: {reason}")]
    Decode {
        /// The requested date
        date: NaiveDate,
        /// Decoder error message
        reason: String,
    },

    /// Structurally valid response carrying no picture URL
    #[error("APOD API returned an invalid response for {date}, may be down temporarily")]
    EmptyPayload {
        /// The requested date
        date: NaiveDate,
    },

    /// Fetch aborted because the shared context was cancelled
    #[error("fetch cancelled")]
    Cancelled,

    /// Fetch task terminated abnormally (panic or abort)
    #[error("fetch task failed: {0}")]
    TaskFailed(String),

    /// Concurrency limit of zero was requested
    #[error("concurrency limit must be at least 1")]
    InvalidConcurrency,

    /// HTTP client could not be built
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

impl FetchError {
    /// Whether this error reports a voluntary abort rather than a remote failure
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled)
    }
}

/// API error response format
///
/// # Example JSON Response
///
/// ```json
/// {
///   "error": {
///     "code": "validation_error",
///     "message": "The request parameters were unprocessable"
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// The error details
    pub error: ErrorDetail,
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "validation_error", "internal_error")
    pub code: String,

    /// Human-readable error message, safe to show to end users
    pub message: String,

    /// Optional additional context about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error with code and message
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    /// Create a "not found" error
    pub fn not_found() -> Self {
        Self::new("not_found", PUBLIC_MSG_NOT_FOUND)
    }

    /// Create a "method not allowed" error
    pub fn method_not_allowed() -> Self {
        Self::new("method_not_allowed", PUBLIC_MSG_METHOD_NOT_ALLOWED)
    }
}

/// Convert errors to HTTP status codes for API responses
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            Error::Validation(_) => 422,
            Error::Config { .. } | Error::Fetch(_) | Error::Io(_) | Error::ApiServerError(_) => 500,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Validation(_) => "validation_error",
            Error::Fetch(_) | Error::Io(_) | Error::ApiServerError(_) => "internal_error",
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        // Internal error text never reaches clients
        let message = match &error {
            Error::Validation(_) => PUBLIC_MSG_UNPROCESSABLE,
            _ => PUBLIC_MSG_INTERNAL,
        };
        ApiError::new(error.error_code(), message)
    }
}
