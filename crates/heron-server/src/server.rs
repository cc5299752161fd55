//! HTTP server implementation.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use heron_core::{BoxedHandler, HeronError, RequestContext, Response, ResponseExt};
use heron_middleware::{compose, BoxedMiddleware};
use heron_router::RouteTable;
use heron_telemetry::metrics::{record_request, InFlightGuard};
use http::{HeaderName, HeaderValue, Method, StatusCode};
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tracing::Instrument;

use crate::dispatcher::Dispatcher;
use crate::error::ServerError;
use crate::static_files::StaticFiles;

/// Deadline applied to each request unless configured otherwise.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Largest request body accepted unless configured otherwise (1 MiB).
pub const DEFAULT_MAX_BODY_SIZE: usize = 1024 * 1024;

/// Boxed error produced by a request body.
type BodyError = Box<dyn std::error::Error + Send + Sync>;

/// Response header carrying the request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// The Heron HTTP server.
///
/// Built by [`ServerBuilder`]; the route table is frozen at that point.
pub struct Server {
    addr: String,
    dispatcher: Dispatcher,
    static_files: Option<StaticFiles>,
    request_timeout: Duration,
    max_body_size: usize,
}

impl Server {
    /// Creates a new server builder.
    #[must_use]
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    /// Returns the configured listen address.
    #[must_use]
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Returns the dispatcher.
    #[must_use]
    pub const fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Returns the per-request deadline.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Returns the request body size limit in bytes.
    #[must_use]
    pub const fn max_body_size(&self) -> usize {
        self.max_body_size
    }

    /// Binds the configured address and serves until the future is dropped.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Bind` if the address cannot be bound.
    pub async fn run(self) -> Result<(), ServerError> {
        let listener = TcpListener::bind(&self.addr)
            .await
            .map_err(|e| ServerError::bind(&self.addr, e))?;
        self.serve(listener).await
    }

    /// Serves connections from an already bound listener.
    ///
    /// Each connection runs on its own task. The loop only ends when the
    /// returned future is dropped.
    ///
    /// # Errors
    ///
    /// Currently never returns an error; accept failures are logged.
    pub async fn serve(self, listener: TcpListener) -> Result<(), ServerError> {
        if let Ok(addr) = listener.local_addr() {
            tracing::info!(%addr, routes = self.dispatcher.routes().len(), "Server listening");
        }

        let server = Arc::new(self);
        loop {
            match listener.accept().await {
                Ok((stream, remote_addr)) => {
                    let server = Arc::clone(&server);
                    tokio::spawn(async move {
                        let io = TokioIo::new(stream);
                        let service = service_fn(move |req: http::Request<Incoming>| {
                            let server = Arc::clone(&server);
                            async move { Ok::<_, Infallible>(server.handle(req).await) }
                        });

                        if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                            tracing::debug!(
                                %remote_addr,
                                error = %e,
                                "Connection closed with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to accept connection");
                }
            }
        }
    }

    /// Handles one request from arrival to response.
    ///
    /// Static paths are answered first; everything else has its body
    /// collected and goes through the [`Dispatcher`]. The whole call is
    /// bounded by the request timeout.
    pub async fn handle<B>(&self, req: http::Request<B>) -> Response
    where
        B: Body,
        B::Error: Into<BodyError>,
    {
        let _in_flight = InFlightGuard::new();
        let method = req.method().clone();
        let path = req.uri().path().to_string();
        let ctx = RequestContext::new(method.clone(), path.clone())
            .with_timeout(self.request_timeout);
        let request_id = ctx.request_id();

        let span = tracing::info_span!(
            "request",
            request_id = %request_id,
            http.method = %method,
            http.path = %path,
        );

        let mut response = self.respond(ctx, req).instrument(span).await;

        record_request(method.as_str(), response.status().as_u16());
        if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
            response
                .headers_mut()
                .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
        }
        response
    }

    async fn respond<B>(&self, ctx: RequestContext, req: http::Request<B>) -> Response
    where
        B: Body,
        B::Error: Into<BodyError>,
    {
        if let Some(files) = &self.static_files {
            if files.claims(ctx.path()) {
                return files.serve(ctx.method(), ctx.path()).await;
            }
        }

        let (parts, body) = req.into_parts();
        let body = Limited::new(body, self.max_body_size);
        let body = match tokio::time::timeout(self.remaining(&ctx), body.collect()).await {
            Ok(Ok(collected)) => collected.to_bytes(),
            Ok(Err(e)) if e.downcast_ref::<LengthLimitError>().is_some() => {
                tracing::warn!(limit = self.max_body_size, "Request body too large");
                return HeronError::PayloadTooLarge(self.max_body_size).into_response();
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Failed to read request body");
                return Response::text(StatusCode::BAD_REQUEST, "Failed to read request body");
            }
            Err(_) => {
                tracing::warn!("Request body collection timed out");
                return Response::empty(StatusCode::REQUEST_TIMEOUT);
            }
        };

        let request = http::Request::from_parts(parts, Full::new(body));
        let remaining = self.remaining(&ctx);
        match tokio::time::timeout(remaining, self.dispatcher.dispatch(ctx, request)).await {
            Ok(response) => response,
            Err(_) => {
                let timeout_ms =
                    u64::try_from(self.request_timeout.as_millis()).unwrap_or(u64::MAX);
                tracing::warn!(timeout_ms, "Request timed out");
                HeronError::Timeout(self.request_timeout).into_response()
            }
        }
    }

    fn remaining(&self, ctx: &RequestContext) -> Duration {
        ctx.remaining().unwrap_or(self.request_timeout)
    }
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("addr", &self.addr)
            .field("dispatcher", &self.dispatcher)
            .field("static_files", &self.static_files)
            .field("request_timeout", &self.request_timeout)
            .field("max_body_size", &self.max_body_size)
            .finish()
    }
}

/// Bind-phase builder for [`Server`].
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use heron_core::{handler_fn, Response, ResponseExt};
/// use heron_middleware::{BoxedMiddleware, Timing};
/// use heron_server::ServerBuilder;
/// use http::{Method, StatusCode};
/// use std::sync::Arc;
///
/// let timing: BoxedMiddleware = Arc::new(Timing::new());
/// let server = ServerBuilder::new()
///     .addr("127.0.0.1:3000")
///     .request_timeout(Duration::from_secs(10))
///     .route_with(
///         Method::DELETE,
///         r"/customer/\d+",
///         handler_fn(|_ctx, _req| async { Response::empty(StatusCode::OK) }),
///         &[timing],
///     )
///     .build();
///
/// assert_eq!(server.dispatcher().routes().len(), 1);
/// ```
pub struct ServerBuilder {
    addr: String,
    routes: RouteTable<BoxedHandler>,
    static_files: Option<StaticFiles>,
    request_timeout: Duration,
    max_body_size: usize,
}

impl ServerBuilder {
    /// Creates a builder listening on `0.0.0.0:8080` with no routes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            addr: "0.0.0.0:8080".to_string(),
            routes: RouteTable::new(),
            static_files: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        }
    }

    /// Sets the listen address.
    #[must_use]
    pub fn addr(mut self, addr: impl Into<String>) -> Self {
        self.addr = addr.into();
        self
    }

    /// Registers `handler` for `(method, pattern)`, replacing any previous one.
    #[must_use]
    pub fn route(mut self, method: Method, pattern: &str, handler: BoxedHandler) -> Self {
        tracing::debug!(%method, pattern, "Registering route");
        if self.routes.register(method.clone(), pattern, handler).is_some() {
            tracing::warn!(%method, pattern, "Route registered twice; previous handler replaced");
        }
        self
    }

    /// Registers `handler` wrapped by `middlewares`, first one outermost.
    #[must_use]
    pub fn route_with(
        self,
        method: Method,
        pattern: &str,
        handler: BoxedHandler,
        middlewares: &[BoxedMiddleware],
    ) -> Self {
        let names: Vec<&str> = middlewares.iter().map(|m| m.name()).collect();
        tracing::debug!(%method, pattern, middleware = ?names, "Wrapping route");
        self.route(method, pattern, compose(handler, middlewares))
    }

    /// Serves a static folder ahead of routing.
    #[must_use]
    pub fn static_files(mut self, files: StaticFiles) -> Self {
        self.static_files = Some(files);
        self
    }

    /// Sets the per-request deadline.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the request body size limit in bytes; larger bodies get `413`.
    #[must_use]
    pub const fn max_body_size(mut self, limit: usize) -> Self {
        self.max_body_size = limit;
        self
    }

    /// Freezes the routes and returns the server.
    #[must_use]
    pub fn build(self) -> Server {
        Server {
            addr: self.addr,
            dispatcher: Dispatcher::new(self.routes),
            static_files: self.static_files,
            request_timeout: self.request_timeout,
            max_body_size: self.max_body_size,
        }
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ServerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerBuilder")
            .field("addr", &self.addr)
            .field("routes", &self.routes)
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}
