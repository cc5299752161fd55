//! HTTP message types.
//!
//! Bodies are buffered in full before dispatch, so both directions use
//! `Full<Bytes>`.

use bytes::Bytes;
use http::{header, StatusCode};
use http_body_util::Full;
use serde::Serialize;

/// The HTTP request type seen by handlers.
pub type Request = http::Request<Full<Bytes>>;

/// The HTTP response type produced by handlers.
pub type Response = http::Response<Full<Bytes>>;

/// Extension trait for building responses.
///
/// None of these constructors panic. If the builder rejects a header the
/// response degrades to a bare body with the requested status.
pub trait ResponseExt {
    /// A response with no body.
    fn empty(status: StatusCode) -> Response;

    /// A `text/plain` response.
    fn text(status: StatusCode, message: &str) -> Response;

    /// An `application/json` response serialized from `value`.
    ///
    /// Serialization failure produces a `500` plain-text response.
    fn json<T: Serialize>(status: StatusCode, value: &T) -> Response;
}

impl ResponseExt for Response {
    fn empty(status: StatusCode) -> Response {
        bare(status, Bytes::new())
    }

    fn text(status: StatusCode, message: &str) -> Response {
        let body = Bytes::from(message.to_string());
        http::Response::builder()
            .status(status)
            .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(Full::new(body.clone()))
            .unwrap_or_else(|_| bare(status, body))
    }

    fn json<T: Serialize>(status: StatusCode, value: &T) -> Response {
        let body = match serde_json::to_vec(value) {
            Ok(body) => Bytes::from(body),
            Err(e) => {
                return Self::text(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    &format!("Failed to encode response: {e}"),
                )
            }
        };

        http::Response::builder()
            .status(status)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Full::new(body.clone()))
            .unwrap_or_else(|_| bare(status, body))
    }
}

fn bare(status: StatusCode, body: Bytes) -> Response {
    let mut response = http::Response::new(Full::new(body));
    *response.status_mut() = status;
    response
}
