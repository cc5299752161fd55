//! Authentication gate middleware.
//!
//! The gate evaluates an [`AuthPredicate`] before the wrapped handler runs.
//! A denied request is answered with `401 Unauthorized`, an empty body and a
//! `WWW-Authenticate: Bearer` challenge; the wrapped handler is not called.

use std::sync::Arc;

use heron_core::{BoxFuture, BoxedHandler, Handler, HeronError, Request, RequestContext, Response};
use heron_telemetry::metrics::record_auth_decision;
use http::{header, HeaderValue};

use crate::middleware::Middleware;

/// Decides whether a request may proceed.
pub trait AuthPredicate: Send + Sync + 'static {
    /// Returns `true` to let the request through.
    fn authorize(&self, ctx: &RequestContext, request: &Request) -> bool;
}

impl<F> AuthPredicate for F
where
    F: Fn(&RequestContext, &Request) -> bool + Send + Sync + 'static,
{
    fn authorize(&self, ctx: &RequestContext, request: &Request) -> bool {
        self(ctx, request)
    }
}

/// Accepts requests carrying `Authorization: Bearer <token>`.
///
/// A `BearerToken` built without a token rejects everything.
///
/// # Example
///
/// ```
/// use bytes::Bytes;
/// use heron_core::RequestContext;
/// use heron_middleware::{AuthPredicate, BearerToken};
/// use http::Method;
/// use http_body_util::Full;
///
/// let predicate = BearerToken::new("s3cret");
/// let request = http::Request::builder()
///     .header("authorization", "Bearer s3cret")
///     .body(Full::new(Bytes::new()))
///     .unwrap();
///
/// let ctx = RequestContext::new(Method::DELETE, "/customer/1");
/// assert!(predicate.authorize(&ctx, &request));
/// ```
#[derive(Clone)]
pub struct BearerToken {
    token: Option<Arc<str>>,
}

impl BearerToken {
    /// Accepts exactly `token`.
    pub fn new(token: impl AsRef<str>) -> Self {
        Self {
            token: Some(Arc::from(token.as_ref())),
        }
    }

    /// Rejects every request.
    #[must_use]
    pub const fn deny_all() -> Self {
        Self { token: None }
    }

    /// Builds from an optional configured token; `None` or empty denies all.
    #[must_use]
    pub fn from_config(token: Option<&str>) -> Self {
        match token {
            Some(token) if !token.is_empty() => Self::new(token),
            _ => Self::deny_all(),
        }
    }

    /// Returns `true` if a token is configured.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.token.is_some()
    }

    fn presented(request: &Request) -> Option<&str> {
        let value = request.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
        let (scheme, credentials) = value.split_once(' ')?;
        scheme
            .eq_ignore_ascii_case("bearer")
            .then_some(credentials.trim())
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerToken")
            .field("configured", &self.is_configured())
            .finish()
    }
}

impl AuthPredicate for BearerToken {
    fn authorize(&self, _ctx: &RequestContext, request: &Request) -> bool {
        match (&self.token, Self::presented(request)) {
            (Some(expected), Some(presented)) => {
                constant_time_eq(expected.as_bytes(), presented.as_bytes())
            }
            _ => false,
        }
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Middleware that short-circuits unauthorised requests with `401`.
pub struct AuthGate<P> {
    predicate: Arc<P>,
}

impl<P: AuthPredicate> AuthGate<P> {
    /// Creates a gate around `predicate`.
    pub fn new(predicate: P) -> Self {
        Self {
            predicate: Arc::new(predicate),
        }
    }
}

impl<P> Clone for AuthGate<P> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<P> std::fmt::Debug for AuthGate<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGate").finish_non_exhaustive()
    }
}

impl<P: AuthPredicate> Middleware for AuthGate<P> {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        Arc::new(Gated {
            predicate: Arc::clone(&self.predicate),
            next,
        })
    }

    fn name(&self) -> &'static str {
        "auth"
    }
}

struct Gated<P> {
    predicate: Arc<P>,
    next: BoxedHandler,
}

impl<P: AuthPredicate> Handler for Gated<P> {
    fn call(&self, ctx: RequestContext, request: Request) -> BoxFuture<'static, Response> {
        let allowed = self.predicate.authorize(&ctx, &request);
        record_auth_decision(allowed);

        if allowed {
            return self.next.call(ctx, request);
        }

        tracing::info!(
            request_id = %ctx.request_id(),
            http.method = %ctx.method(),
            http.path = %ctx.path(),
            "Request rejected by auth gate"
        );
        Box::pin(async { unauthorized() })
    }
}

fn unauthorized() -> Response {
    let mut response = HeronError::Unauthorized.into_response();
    response
        .headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use heron_core::{handler_fn, ResponseExt};
    use http::{Method, StatusCode};
    use http_body_util::{BodyExt, Full};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn request_with(auth: Option<&str>) -> Request {
        let mut builder = http::Request::builder().method(Method::DELETE).uri("/customer/1");
        if let Some(value) = auth {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Full::new(Bytes::new())).unwrap()
    }

    fn ctx() -> RequestContext {
        RequestContext::new(Method::DELETE, "/customer/1")
    }

    fn counting_handler(calls: &Arc<AtomicUsize>) -> BoxedHandler {
        let calls = Arc::clone(calls);
        handler_fn(move |_ctx, _req| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Response::text(StatusCode::OK, "deleted") }
        })
    }

    #[test]
    fn test_bearer_token_accepts_matching_token() {
        let predicate = BearerToken::new("s3cret");
        assert!(predicate.authorize(&ctx(), &request_with(Some("Bearer s3cret"))));
        assert!(predicate.authorize(&ctx(), &request_with(Some("bearer s3cret"))));
    }

    #[test]
    fn test_bearer_token_rejects() {
        let predicate = BearerToken::new("s3cret");
        assert!(!predicate.authorize(&ctx(), &request_with(None)));
        assert!(!predicate.authorize(&ctx(), &request_with(Some("Bearer wrong"))));
        assert!(!predicate.authorize(&ctx(), &request_with(Some("Bearer s3cre"))));
        assert!(!predicate.authorize(&ctx(), &request_with(Some("Basic s3cret"))));
        assert!(!predicate.authorize(&ctx(), &request_with(Some("s3cret"))));
    }

    #[test]
    fn test_unconfigured_token_denies_all() {
        let predicate = BearerToken::from_config(None);
        assert!(!predicate.is_configured());
        assert!(!predicate.authorize(&ctx(), &request_with(Some("Bearer "))));

        let empty = BearerToken::from_config(Some(""));
        assert!(!empty.is_configured());
    }

    #[test]
    fn test_debug_hides_token() {
        let debug = format!("{:?}", BearerToken::new("s3cret"));
        assert!(!debug.contains("s3cret"));
    }

    #[tokio::test]
    async fn test_gate_denial_writes_401_and_skips_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let gate = AuthGate::new(|_: &RequestContext, _: &Request| false);
        let handler = gate.wrap(counting_handler(&calls));

        let response = handler.call(ctx(), request_with(None)).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_gate_allows_authorised_request() {
        let calls = Arc::new(AtomicUsize::new(0));
        let handler = AuthGate::new(BearerToken::new("s3cret")).wrap(counting_handler(&calls));

        let response = handler
            .call(ctx(), request_with(Some("Bearer s3cret")))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
