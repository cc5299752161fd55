//! # Heron Middleware
//!
//! Middleware wraps a handler and returns a new handler with the same
//! calling convention, so wrapped handlers can be wrapped again and the
//! dispatcher never knows the difference.
//!
//! ```text
//!   compose(T, [A, B])  ==  A.wrap(B.wrap(T))
//!
//!   request ──► A ──► B ──► T
//!                            │
//!   response ◄── A ◄── B ◄───┘
//! ```
//!
//! The first middleware in the list is the outermost: it sees the request
//! first and the response last.
//!
//! ## Provided middleware
//!
//! | Middleware | Behavior |
//! |------------|----------|
//! | [`AuthGate`] | Evaluates an [`AuthPredicate`]; answers `401` without calling the inner handler on denial |
//! | [`Timing`] | Logs elapsed time once per call from a drop guard, on every exit path |
//!
//! ## Example
//!
//! ```
//! use heron_core::{handler_fn, Response, ResponseExt};
//! use heron_middleware::{AuthGate, BearerToken, ChainBuilder, Timing};
//! use http::StatusCode;
//!
//! let delete = handler_fn(|_ctx, _req| async { Response::text(StatusCode::OK, "deleted") });
//!
//! let guarded = ChainBuilder::new()
//!     .with(Timing::new())
//!     .with(AuthGate::new(BearerToken::new("s3cret")))
//!     .handler(delete);
//! ```

#![doc(html_root_url = "https://docs.rs/heron-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod auth;
pub mod chain;
pub mod middleware;
pub mod timing;

pub use auth::{AuthGate, AuthPredicate, BearerToken};
pub use chain::{compose, ChainBuilder};
pub use middleware::{from_fn, BoxedMiddleware, FnMiddleware, Middleware};
pub use timing::{Timing, TimingGuard, TimingRecord};
