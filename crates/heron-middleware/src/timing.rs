//! Request timing middleware.
//!
//! [`Timing`] starts a [`TimingGuard`] before calling the wrapped handler and
//! moves it into the returned future. The guard logs from `Drop`, so the
//! record is emitted exactly once whether the handler returns normally,
//! returns early with an error response, panics, or is cancelled by the
//! server dropping the future.

use std::sync::Arc;
use std::time::{Duration, Instant};

use heron_core::{BoxFuture, BoxedHandler, Handler, Request, RequestContext, RequestId, Response};
use heron_telemetry::metrics::record_duration;
use http::Method;

use crate::middleware::Middleware;

/// One timing observation.
#[derive(Debug, Clone)]
pub struct TimingRecord {
    /// Request id of the timed call.
    pub request_id: RequestId,
    /// HTTP method.
    pub method: Method,
    /// Request path.
    pub path: String,
    /// Time from guard creation to drop.
    pub elapsed: Duration,
    /// `false` if the handler panicked or its future was dropped early.
    pub completed: bool,
}

type Observer = Arc<dyn Fn(&TimingRecord) + Send + Sync>;

/// Scoped timer that reports when dropped.
pub struct TimingGuard {
    request_id: RequestId,
    method: Method,
    path: String,
    start: Instant,
    completed: bool,
    observer: Option<Observer>,
}

impl TimingGuard {
    fn start(ctx: &RequestContext, observer: Option<Observer>) -> Self {
        Self {
            request_id: ctx.request_id(),
            method: ctx.method().clone(),
            path: ctx.path().to_string(),
            start: Instant::now(),
            completed: false,
            observer,
        }
    }

    /// Marks the wrapped call as finished normally.
    pub fn complete(&mut self) {
        self.completed = true;
    }
}

impl std::fmt::Debug for TimingGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimingGuard")
            .field("request_id", &self.request_id)
            .field("path", &self.path)
            .field("completed", &self.completed)
            .finish_non_exhaustive()
    }
}

impl Drop for TimingGuard {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();

        tracing::info!(
            request_id = %self.request_id,
            http.method = %self.method,
            http.path = %self.path,
            duration_ms = elapsed.as_secs_f64() * 1000.0,
            completed = self.completed,
            "Request timed"
        );
        record_duration(self.method.as_str(), elapsed);

        if let Some(observer) = &self.observer {
            observer(&TimingRecord {
                request_id: self.request_id,
                method: self.method.clone(),
                path: std::mem::take(&mut self.path),
                elapsed,
                completed: self.completed,
            });
        }
    }
}

/// Middleware that logs how long the wrapped handler took.
///
/// # Example
///
/// ```
/// use heron_middleware::{Timing, TimingRecord};
///
/// let timing = Timing::new().with_observer(|record: &TimingRecord| {
///     assert!(!record.path.is_empty());
/// });
/// ```
#[derive(Clone, Default)]
pub struct Timing {
    observer: Option<Observer>,
}

impl Timing {
    /// Creates timing middleware that only logs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Also passes every record to `observer`.
    #[must_use]
    pub fn with_observer<F>(mut self, observer: F) -> Self
    where
        F: Fn(&TimingRecord) + Send + Sync + 'static,
    {
        self.observer = Some(Arc::new(observer));
        self
    }
}

impl std::fmt::Debug for Timing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timing")
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl Middleware for Timing {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        Arc::new(Timed {
            next,
            observer: self.observer.clone(),
        })
    }

    fn name(&self) -> &'static str {
        "timing"
    }
}

struct Timed {
    next: BoxedHandler,
    observer: Option<Observer>,
}

impl Handler for Timed {
    fn call(&self, ctx: RequestContext, request: Request) -> BoxFuture<'static, Response> {
        let mut guard = TimingGuard::start(&ctx, self.observer.clone());
        let inner = self.next.call(ctx, request);

        Box::pin(async move {
            let response = inner.await;
            guard.complete();
            response
        })
    }
}
