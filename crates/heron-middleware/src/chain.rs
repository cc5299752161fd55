//! Composing middleware around a terminal handler.

use std::sync::Arc;

use heron_core::BoxedHandler;

use crate::middleware::{BoxedMiddleware, Middleware};

/// Wraps `terminal` so that `middlewares[0]` is outermost.
///
/// `compose(t, [m1, m2, m3])` is `m1.wrap(m2.wrap(m3.wrap(t)))`. An empty
/// list returns `terminal` unchanged.
pub fn compose(terminal: BoxedHandler, middlewares: &[BoxedMiddleware]) -> BoxedHandler {
    middlewares
        .iter()
        .rev()
        .fold(terminal, |next, middleware| middleware.wrap(next))
}

/// Fluent builder over [`compose`].
///
/// # Example
///
/// ```
/// use heron_core::{handler_fn, Response, ResponseExt};
/// use heron_middleware::{ChainBuilder, Timing};
/// use http::StatusCode;
///
/// let chain = ChainBuilder::new().with(Timing::new());
/// assert_eq!(chain.names(), vec!["timing"]);
///
/// let handler = chain.handler(handler_fn(|_ctx, _req| async {
///     Response::empty(StatusCode::NO_CONTENT)
/// }));
/// ```
#[derive(Clone, Default)]
pub struct ChainBuilder {
    middlewares: Vec<BoxedMiddleware>,
}

impl ChainBuilder {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a middleware; it will sit inside every middleware added before it.
    #[must_use]
    pub fn with(mut self, middleware: impl Middleware) -> Self {
        self.middlewares.push(Arc::new(middleware));
        self
    }

    /// Appends an already boxed middleware.
    #[must_use]
    pub fn with_boxed(mut self, middleware: BoxedMiddleware) -> Self {
        self.middlewares.push(middleware);
        self
    }

    /// Returns the middleware in outer-to-inner order.
    #[must_use]
    pub fn middlewares(&self) -> &[BoxedMiddleware] {
        &self.middlewares
    }

    /// Returns the middleware names in outer-to-inner order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.middlewares.iter().map(|m| m.name()).collect()
    }

    /// Returns the number of middleware in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    /// Returns `true` if the chain has no middleware.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }

    /// Wraps `terminal` with the chain.
    #[must_use]
    pub fn handler(&self, terminal: BoxedHandler) -> BoxedHandler {
        compose(terminal, &self.middlewares)
    }
}

impl std::fmt::Debug for ChainBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainBuilder")
            .field("middlewares", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::from_fn;
    use bytes::Bytes;
    use heron_core::{handler_fn, RequestContext, Response, ResponseExt};
    use http::{Method, StatusCode};
    use http_body_util::{BodyExt, Full};

    /// Middleware that appends `tag` to the response body.
    fn tagger(tag: &'static str) -> BoxedMiddleware {
        Arc::new(
            from_fn(move |next: BoxedHandler| {
                handler_fn(move |ctx, req| {
                    let next = Arc::clone(&next);
                    async move {
                        let response = next.call(ctx, req).await;
                        let (parts, body) = response.into_parts();
                        let mut bytes = body.collect().await.unwrap().to_bytes().to_vec();
                        bytes.extend_from_slice(tag.as_bytes());
                        http::Response::from_parts(parts, Full::new(Bytes::from(bytes)))
                    }
                })
            })
            .named(tag),
        )
    }

    async fn run(handler: &BoxedHandler) -> String {
        let request = http::Request::builder()
            .uri("/")
            .body(Full::new(Bytes::new()))
            .unwrap();
        let response = handler
            .call(RequestContext::new(Method::GET, "/"), request)
            .await;
        let body = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(body.to_vec()).unwrap()
    }

    fn terminal() -> BoxedHandler {
        handler_fn(|_ctx, _req| async { Response::text(StatusCode::OK, "T") })
    }

    #[tokio::test]
    async fn test_compose_empty_is_identity() {
        let handler = compose(terminal(), &[]);
        assert_eq!(run(&handler).await, "T");
    }

    #[tokio::test]
    async fn test_compose_first_is_outermost() {
        // The innermost middleware appends first on the way out.
        let handler = compose(terminal(), &[tagger("A"), tagger("B"), tagger("C")]);
        assert_eq!(run(&handler).await, "TCBA");
    }

    #[tokio::test]
    async fn test_builder_matches_compose() {
        let chain = ChainBuilder::new()
            .with_boxed(tagger("A"))
            .with_boxed(tagger("B"));

        assert_eq!(chain.len(), 2);
        assert_eq!(chain.names(), vec!["A", "B"]);
        assert_eq!(run(&chain.handler(terminal())).await, "TBA");
    }

    #[test]
    fn test_empty_builder() {
        let chain = ChainBuilder::new();
        assert!(chain.is_empty());
        assert!(format!("{chain:?}").contains("ChainBuilder"));
    }
}
