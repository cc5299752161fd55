//! Server error types.

use thiserror::Error;

/// Errors that stop the server from serving.
#[derive(Error, Debug)]
pub enum ServerError {
    /// The listen address could not be bound.
    #[error("failed to bind to {addr}: {source}")]
    Bind {
        /// The address that was requested.
        addr: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl ServerError {
    /// Create a new bind error.
    pub fn bind(addr: impl Into<String>, source: std::io::Error) -> Self {
        Self::Bind {
            addr: addr.into(),
            source,
        }
    }
}
