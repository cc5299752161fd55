//! HTTP handlers.

pub mod customers;
pub mod home;

use serde::Serialize;

/// The `{message, status}` envelope used by every JSON reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusMessage {
    /// Human-readable outcome.
    pub message: String,
    /// `true` on success.
    pub status: bool,
}

impl StatusMessage {
    /// A successful outcome.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: true,
        }
    }
}
