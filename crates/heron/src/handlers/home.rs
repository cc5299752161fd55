//! Landing page handler.

use heron_core::{handler_fn, BoxedHandler, Response, ResponseExt};
use http::StatusCode;

use super::StatusMessage;

/// Message returned by `/` and `/home`.
pub const WELCOME: &str = "Welcome to Heron!";

/// `GET /` and `GET /home`.
pub fn index() -> BoxedHandler {
    handler_fn(|_ctx, _req| async { Response::json(StatusCode::OK, &StatusMessage::ok(WELCOME)) })
}
