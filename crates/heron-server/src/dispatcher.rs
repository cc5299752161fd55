//! The request dispatcher.

use std::sync::Arc;

use heron_core::{BoxedHandler, Request, RequestContext, Response, ResponseExt};
use heron_router::RouteTable;
use http::{header, HeaderValue, StatusCode};

/// Resolves each request against a frozen route table and forwards it.
///
/// The dispatcher never buffers or rewrites the handler's response; it only
/// decides between the handler, `405` and `404`.
#[derive(Clone)]
pub struct Dispatcher {
    routes: Arc<RouteTable<BoxedHandler>>,
}

impl Dispatcher {
    /// Freezes `routes`.
    #[must_use]
    pub fn new(routes: RouteTable<BoxedHandler>) -> Self {
        Self {
            routes: Arc::new(routes),
        }
    }

    /// Returns the route table.
    #[must_use]
    pub fn routes(&self) -> &RouteTable<BoxedHandler> {
        &self.routes
    }

    /// Dispatches one request.
    ///
    /// - no route for the method: `405` with an `Allow` header listing the
    ///   methods whose patterns match the path, empty body
    /// - no pattern for the method matches the path: `404`, empty body
    /// - otherwise the resolved handler's response
    pub async fn dispatch(&self, ctx: RequestContext, request: Request) -> Response {
        let resolution = self.routes.resolve(ctx.method(), ctx.path());

        if let Some(handler) = resolution.handler {
            tracing::debug!(pattern = resolution.pattern, "Route matched");
            return handler.call(ctx, request).await;
        }

        if resolution.method_known {
            tracing::debug!("No route matches path");
            return Response::empty(StatusCode::NOT_FOUND);
        }

        tracing::debug!("No routes registered for method");
        self.method_not_allowed(ctx.path())
    }

    fn method_not_allowed(&self, path: &str) -> Response {
        let mut response = Response::empty(StatusCode::METHOD_NOT_ALLOWED);
        let allowed = self
            .routes
            .allowed_methods(path)
            .iter()
            .map(http::Method::as_str)
            .collect::<Vec<_>>()
            .join(", ");

        if !allowed.is_empty() {
            if let Ok(value) = HeaderValue::from_str(&allowed) {
                response.headers_mut().insert(header::ALLOW, value);
            }
        }
        response
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("routes", &self.routes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use heron_core::handler_fn;
    use http::Method;
    use http_body_util::{BodyExt, Full};

    fn text(body: &'static str) -> BoxedHandler {
        handler_fn(move |_ctx, _req| async move { Response::text(StatusCode::OK, body) })
    }

    fn dispatcher() -> Dispatcher {
        let mut routes = RouteTable::new();
        routes.register(Method::GET, "/home", text("home"));
        routes.register(Method::GET, r"/customer/\d+", text("get"));
        routes.register(Method::PUT, r"/customer/\d+", text("put"));
        routes.register(Method::POST, "/customer", text("post"));
        Dispatcher::new(routes)
    }

    async fn send(dispatcher: &Dispatcher, method: Method, path: &str) -> Response {
        let request = http::Request::builder()
            .method(method.clone())
            .uri(path)
            .body(Full::new(Bytes::new()))
            .unwrap();
        dispatcher
            .dispatch(RequestContext::new(method, path), request)
            .await
    }

    async fn body(response: Response) -> Bytes {
        response.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn test_forwards_to_handler() {
        let dispatcher = dispatcher();
        let response = send(&dispatcher, Method::GET, "/customer/12").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(&body(response).await[..], b"get");
    }

    #[tokio::test]
    async fn test_unknown_path_is_404_with_empty_body() {
        let dispatcher = dispatcher();
        let response = send(&dispatcher, Method::GET, "/nowhere").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_method_is_405_with_allow() {
        let dispatcher = dispatcher();
        let response = send(&dispatcher, Method::PATCH, "/customer/1").await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers().get(header::ALLOW).unwrap(), "GET, PUT");
        assert!(body(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_method_on_unknown_path_has_no_allow() {
        let dispatcher = dispatcher();
        let response = send(&dispatcher, Method::DELETE, "/nowhere").await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert!(response.headers().get(header::ALLOW).is_none());
    }

    #[tokio::test]
    async fn test_known_method_other_path_is_404() {
        // POST is registered, just not for this path.
        let dispatcher = dispatcher();
        let response = send(&dispatcher, Method::POST, "/customer/1").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_debug() {
        assert!(format!("{:?}", dispatcher()).contains("routes: 4"));
    }
}
