//! Request context types.
//!
//! A [`RequestContext`] is created by the server for every inbound request and
//! handed by value to the handler chain. It carries no shared mutable state;
//! the only thing it propagates downstream is the request deadline.

use std::time::Duration;

use http::Method;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use uuid::Uuid;

/// A unique identifier for each request, using UUID v7.
///
/// UUID v7 is time-ordered, so ids sort by arrival in logs.
///
/// # Example
///
/// ```
/// use heron_core::RequestId;
///
/// let id = RequestId::new();
/// assert_eq!(id.to_string().len(), 36);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new unique request ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for RequestId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Per-request context passed through middleware into handlers.
///
/// Cloning is cheap. Handlers that perform I/O should hand the context to the
/// storage layer so the request deadline bounds every downstream call.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use heron_core::RequestContext;
/// use http::Method;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let ctx = RequestContext::new(Method::GET, "/home").with_timeout(Duration::from_secs(30));
/// assert!(ctx.remaining().is_some());
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: RequestId,
    method: Method,
    path: String,
    started_at: Instant,
    deadline: Option<Instant>,
}

impl RequestContext {
    /// Creates a context with a fresh request id and no deadline.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            request_id: RequestId::new(),
            method,
            path: path.into(),
            started_at: Instant::now(),
            deadline: None,
        }
    }

    /// Sets an absolute deadline for the request.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets the deadline relative to when the request started.
    ///
    /// A timeout too large to represent leaves the deadline unset.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        match self.started_at.checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self,
        }
    }

    /// Returns the request id.
    #[must_use]
    pub const fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Returns the HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request path, without the query string.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the instant the request started processing.
    #[must_use]
    pub const fn started_at(&self) -> Instant {
        self.started_at
    }

    /// Returns the deadline, if one was set.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns the time elapsed since the request started.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Returns the time left before the deadline.
    ///
    /// `None` means the request is unbounded; `Some(Duration::ZERO)` means
    /// the deadline has already passed.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Returns `true` once the deadline has passed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.remaining().is_some_and(|left| left.is_zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_unique() {
        let a = RequestId::new();
        let b = RequestId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_request_id_display_is_uuid() {
        let uuid = Uuid::now_v7();
        let id = RequestId::from(uuid);
        assert_eq!(id.to_string(), uuid.to_string());
        assert_eq!(id.as_uuid(), &uuid);
    }

    #[tokio::test]
    async fn test_context_without_deadline() {
        let ctx = RequestContext::new(Method::GET, "/customer/1");
        assert_eq!(ctx.method(), Method::GET);
        assert_eq!(ctx.path(), "/customer/1");
        assert!(ctx.deadline().is_none());
        assert!(ctx.remaining().is_none());
        assert!(!ctx.is_expired());
    }

    #[tokio::test(start_paused = true)]
    async fn test_context_deadline_counts_down() {
        let ctx = RequestContext::new(Method::PUT, "/").with_timeout(Duration::from_secs(10));
        assert_eq!(ctx.remaining(), Some(Duration::from_secs(10)));

        tokio::time::advance(Duration::from_secs(4)).await;
        assert_eq!(ctx.remaining(), Some(Duration::from_secs(6)));

        tokio::time::advance(Duration::from_secs(7)).await;
        assert_eq!(ctx.remaining(), Some(Duration::ZERO));
        assert!(ctx.is_expired());
    }

    #[tokio::test]
    async fn test_unrepresentable_timeout_leaves_deadline_unset() {
        let ctx = RequestContext::new(Method::GET, "/home").with_timeout(Duration::MAX);
        assert!(ctx.deadline().is_none());
        assert!(!ctx.is_expired());
    }

    #[tokio::test]
    async fn test_clone_keeps_request_id() {
        let ctx = RequestContext::new(Method::DELETE, "/x");
        let copy = ctx.clone();
        assert_eq!(ctx.request_id(), copy.request_id());
    }
}
