//! # Heron Core
//!
//! Core types and traits shared by every Heron crate.
//!
//! - [`RequestContext`] - Per-request id, timing and deadline
//! - [`RequestId`] - UUID v7 request identifier
//! - [`Handler`] / [`BoxedHandler`] - The single calling convention used by
//!   terminal handlers and middleware output alike
//! - [`Request`] / [`Response`] - Fully buffered HTTP messages
//! - [`HeronError`] - Error taxonomy with HTTP status mapping

#![doc(html_root_url = "https://docs.rs/heron-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod error;
mod handler;
mod types;

pub use context::{RequestContext, RequestId};
pub use error::{ErrorCategory, HeronError, HeronResult};
pub use handler::{handler_fn, BoxFuture, BoxedHandler, FnHandler, Handler};
pub use types::{Request, Response, ResponseExt};
