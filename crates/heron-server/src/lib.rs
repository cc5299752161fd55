//! # Heron Server
//!
//! HTTP server for Heron, built on Hyper and Tokio.
//!
//! Serving has two phases. During the bind phase a [`ServerBuilder`]
//! collects routes, middleware and static folders. [`ServerBuilder::build`]
//! freezes the route table into a [`Dispatcher`]; the resulting [`Server`]
//! exposes no way to register more routes, so the table is read-only for
//! the rest of the process.
//!
//! ## Request path
//!
//! ```text
//! accept ──► static prefix? ──yes──► StaticFiles
//!                 │ no
//!                 ▼
//!          collect body (408 on timeout)
//!                 ▼
//!          Dispatcher::dispatch (504 on timeout)
//!             ├─ unknown method ──► 405 + Allow
//!             ├─ unknown path   ──► 404
//!             └─ handler        ──► response, untouched
//! ```
//!
//! Every response carries an `x-request-id` header.
//!
//! ## Example
//!
//! ```no_run
//! use heron_core::{handler_fn, Response, ResponseExt};
//! use heron_server::Server;
//! use http::{Method, StatusCode};
//!
//! # async fn run() -> Result<(), heron_server::ServerError> {
//! let server = Server::builder()
//!     .addr("0.0.0.0:8080")
//!     .route(
//!         Method::GET,
//!         "/home",
//!         handler_fn(|_ctx, _req| async { Response::text(StatusCode::OK, "home") }),
//!     )
//!     .build();
//!
//! server.run().await
//! # }
//! ```

#![doc(html_root_url = "https://docs.rs/heron-server/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod dispatcher;
mod error;
mod server;
pub mod static_files;

pub use dispatcher::Dispatcher;
pub use error::ServerError;
pub use server::{
    Server, ServerBuilder, DEFAULT_MAX_BODY_SIZE, DEFAULT_REQUEST_TIMEOUT, REQUEST_ID_HEADER,
};
pub use static_files::{StaticFileError, StaticFiles};
