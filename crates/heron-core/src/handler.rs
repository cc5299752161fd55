//! The handler abstraction.
//!
//! Terminal handlers and middleware-wrapped handlers share one calling
//! convention, [`Handler::call`], so any handler can be wrapped again.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::context::RequestContext;
use crate::types::{Request, Response};

/// A boxed, sendable future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A unit of request-handling logic.
///
/// The returned future owns everything it needs, so the dispatcher can drop
/// it at any point (timeout, client disconnect) to cancel the work.
///
/// # Example
///
/// ```
/// use heron_core::{Handler, BoxFuture, RequestContext, Request, Response, ResponseExt};
/// use http::StatusCode;
///
/// struct Ping;
///
/// impl Handler for Ping {
///     fn call(&self, _ctx: RequestContext, _request: Request) -> BoxFuture<'static, Response> {
///         Box::pin(async { Response::text(StatusCode::OK, "pong") })
///     }
/// }
/// ```
pub trait Handler: Send + Sync + 'static {
    /// Handles one request.
    fn call(&self, ctx: RequestContext, request: Request) -> BoxFuture<'static, Response>;
}

/// A shared, type-erased handler.
pub type BoxedHandler = Arc<dyn Handler>;

/// Adapts an async closure into a [`Handler`].
pub struct FnHandler<F> {
    f: F,
}

impl<F> FnHandler<F> {
    /// Wraps the closure.
    pub const fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> std::fmt::Debug for FnHandler<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnHandler").finish_non_exhaustive()
    }
}

impl<F, Fut> Handler for FnHandler<F>
where
    F: Fn(RequestContext, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    fn call(&self, ctx: RequestContext, request: Request) -> BoxFuture<'static, Response> {
        Box::pin((self.f)(ctx, request))
    }
}

/// Creates a [`BoxedHandler`] from an async closure.
///
/// # Example
///
/// ```
/// use heron_core::{handler_fn, Response, ResponseExt};
/// use http::StatusCode;
///
/// let hello = handler_fn(|_ctx, _req| async { Response::text(StatusCode::OK, "hello") });
/// ```
pub fn handler_fn<F, Fut>(f: F) -> BoxedHandler
where
    F: Fn(RequestContext, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    Arc::new(FnHandler::new(f))
}
