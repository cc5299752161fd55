//! Error types for Heron.
//!
//! [`HeronError`] is what handlers return internally before it is rendered
//! as a plain-text response. The rendered body is exactly the error's
//! `Display` output, so messages here are user-facing.

use std::time::Duration;

use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Response, ResponseExt};

/// Result type alias using [`HeronError`].
pub type HeronResult<T> = Result<T, HeronError>;

/// Categories of errors for classification and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Malformed client input.
    Validation,
    /// Missing or invalid credentials.
    Authentication,
    /// Resource not found.
    NotFound,
    /// Persistence layer failure.
    Storage,
    /// The request body is over the size limit.
    PayloadTooLarge,
    /// The request ran past its deadline.
    Timeout,
}

impl ErrorCategory {
    /// Returns the default HTTP status code for this category.
    #[must_use]
    pub const fn default_status_code(&self) -> StatusCode {
        match self {
            Self::Validation => StatusCode::BAD_REQUEST,
            Self::Authentication => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Storage => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Timeout => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    /// Client errors are recovered locally and never logged as errors.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation | Self::Authentication | Self::NotFound | Self::PayloadTooLarge
        )
    }
}

/// Standard error type for Heron handlers.
///
/// # Example
///
/// ```
/// use heron_core::HeronError;
/// use http::StatusCode;
///
/// let err = HeronError::bad_request("Invalid customer ID");
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// assert_eq!(err.to_string(), "Invalid customer ID");
/// ```
#[derive(Error, Debug)]
pub enum HeronError {
    /// The request could not be understood.
    #[error("{0}")]
    BadRequest(String),

    /// The caller is not authenticated.
    #[error("Unauthorized")]
    Unauthorized,

    /// The addressed resource does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The request body exceeded the limit, in bytes.
    #[error("Request body exceeds {0} bytes")]
    PayloadTooLarge(usize),

    /// The storage layer failed.
    #[error("{0}")]
    Storage(String),

    /// The request deadline passed.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
}

impl HeronError {
    /// Creates a [`HeronError::BadRequest`].
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Creates a [`HeronError::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Creates a [`HeronError::Storage`].
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Returns the category of this error.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::BadRequest(_) => ErrorCategory::Validation,
            Self::Unauthorized => ErrorCategory::Authentication,
            Self::NotFound(_) => ErrorCategory::NotFound,
            Self::PayloadTooLarge(_) => ErrorCategory::PayloadTooLarge,
            Self::Storage(_) => ErrorCategory::Storage,
            Self::Timeout(_) => ErrorCategory::Timeout,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        self.category().default_status_code()
    }

    /// Renders the error as a plain-text response.
    ///
    /// `Unauthorized` has an empty body; callers add the challenge header.
    #[must_use]
    pub fn into_response(self) -> Response {
        match self {
            Self::Unauthorized => Response::empty(self.status_code()),
            _ => Response::text(self.status_code(), &self.to_string()),
        }
    }
}

impl From<serde_json::Error> for HeronError {
    fn from(_: serde_json::Error) -> Self {
        Self::bad_request("Invalid request body")
    }
}
