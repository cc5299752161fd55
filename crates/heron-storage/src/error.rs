//! Storage error types.

use std::time::Duration;

use heron_core::HeronError;
use thiserror::Error;

/// Result type alias using [`StorageError`].
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors raised by a [`Repository`](crate::Repository).
#[derive(Error, Debug)]
pub enum StorageError {
    /// The connection pool could not be created.
    #[error("failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),

    /// A statement failed to execute.
    #[error("query failed: {0}")]
    Query(#[source] sqlx::Error),

    /// A result column could not be converted to JSON.
    #[error("failed to decode column {column}: {source}")]
    Decode {
        /// Column name.
        column: String,
        /// Underlying error.
        #[source]
        source: sqlx::Error,
    },

    /// The call did not finish within its bound.
    #[error("query timed out after {0:?}")]
    Timeout(Duration),

    /// The configured driver has no implementation.
    #[error("unsupported database driver: {0}")]
    UnsupportedDriver(String),

    /// The repository has been closed.
    #[error("repository is closed")]
    Closed,
}

impl StorageError {
    /// Create a new decode error.
    pub fn decode(column: impl Into<String>, source: sqlx::Error) -> Self {
        Self::Decode {
            column: column.into(),
            source,
        }
    }

    /// Create a new unsupported driver error.
    pub fn unsupported_driver(driver: impl Into<String>) -> Self {
        Self::UnsupportedDriver(driver.into())
    }

    /// Returns `true` for a deadline expiry.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

impl From<StorageError> for HeronError {
    fn from(err: StorageError) -> Self {
        Self::storage(err.to_string())
    }
}
