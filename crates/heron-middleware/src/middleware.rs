//! Core middleware trait.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use heron_core::{BoxFuture, BoxedHandler, Handler, Request, RequestContext, Response};
//! use heron_middleware::Middleware;
//!
//! struct Logging;
//!
//! struct Logged {
//!     next: BoxedHandler,
//! }
//!
//! impl Handler for Logged {
//!     fn call(&self, ctx: RequestContext, request: Request) -> BoxFuture<'static, Response> {
//!         let inner = self.next.call(ctx, request);
//!         Box::pin(async move {
//!             let response = inner.await;
//!             println!("status: {}", response.status());
//!             response
//!         })
//!     }
//! }
//!
//! impl Middleware for Logging {
//!     fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
//!         Arc::new(Logged { next })
//!     }
//! }
//! ```

use std::sync::Arc;

use heron_core::BoxedHandler;

/// A handler-to-handler transformation.
///
/// `wrap` receives the handler it guards and returns the handler that takes
/// its place. A middleware may short-circuit by never calling `next`, but it
/// must still return a complete response.
pub trait Middleware: Send + Sync + 'static {
    /// Wraps `next`, returning the handler to register in its place.
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler;

    /// Returns a short name for startup logs.
    fn name(&self) -> &'static str {
        "anonymous"
    }
}

/// A type-erased middleware that can be stored in a list.
pub type BoxedMiddleware = Arc<dyn Middleware>;

/// Middleware built from a closure; see [`from_fn`].
pub struct FnMiddleware<F> {
    name: &'static str,
    f: F,
}

impl<F> FnMiddleware<F> {
    /// Sets the name reported by [`Middleware::name`].
    #[must_use]
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }
}

impl<F> std::fmt::Debug for FnMiddleware<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnMiddleware")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl<F> Middleware for FnMiddleware<F>
where
    F: Fn(BoxedHandler) -> BoxedHandler + Send + Sync + 'static,
{
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        (self.f)(next)
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

/// Creates middleware from a `Fn(BoxedHandler) -> BoxedHandler` closure.
pub fn from_fn<F>(f: F) -> FnMiddleware<F>
where
    F: Fn(BoxedHandler) -> BoxedHandler + Send + Sync + 'static,
{
    FnMiddleware {
        name: "anonymous",
        f,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use heron_core::{handler_fn, RequestContext, Response, ResponseExt};
    use http::{Method, StatusCode};
    use http_body_util::Full;

    #[tokio::test]
    async fn test_from_fn_wraps_handler() {
        let teapot = from_fn(|next: BoxedHandler| {
            handler_fn(move |ctx, req| {
                let next = Arc::clone(&next);
                async move {
                    let mut response = next.call(ctx, req).await;
                    *response.status_mut() = StatusCode::IM_A_TEAPOT;
                    response
                }
            })
        })
        .named("teapot");

        assert_eq!(teapot.name(), "teapot");

        let inner = handler_fn(|_ctx, _req| async { Response::empty(StatusCode::OK) });
        let wrapped = teapot.wrap(inner);

        let request = http::Request::builder()
            .uri("/")
            .body(Full::new(Bytes::new()))
            .unwrap();
        let response = wrapped
            .call(RequestContext::new(Method::GET, "/"), request)
            .await;

        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
    }
}
