//! # Heron Storage
//!
//! The storage port that Heron handlers use to reach persistent state.
//!
//! Handlers depend on the object-safe [`Repository`] trait and receive a
//! concrete implementation by constructor injection, usually as
//! `Arc<dyn Repository>`. The crate ships one implementation,
//! [`SqliteRepository`], built on `sqlx`.
//!
//! ## Call model
//!
//! | Operation | Returns |
//! |-----------|---------|
//! | `read` | every row of the result set, columns in projection order |
//! | `write` | nothing |
//! | `update` | affected-row count |
//! | `remove` | affected-row count |
//! | `close` | nothing; later calls fail with [`StorageError::Closed`] |
//!
//! Every call is bounded by the repository's per-call timeout and by the
//! request deadline carried in the [`RequestContext`](heron_core::RequestContext),
//! whichever is sooner. See [`bounded`].
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use heron_core::RequestContext;
//! use heron_storage::{Repository, SqlArg, SqliteRepository};
//! use http::Method;
//!
//! # async fn example() -> Result<(), heron_storage::StorageError> {
//! let sqlite = SqliteRepository::in_memory().await?;
//! sqlite.migrate("CREATE TABLE customers (id INTEGER PRIMARY KEY, name TEXT)").await?;
//! let repo: Arc<dyn Repository> = Arc::new(sqlite);
//! let ctx = RequestContext::new(Method::GET, "/customer/1");
//! let rows = repo
//!     .read(&ctx, "SELECT id, name FROM customers WHERE id = $1", &[SqlArg::from(1_i64)])
//!     .await?;
//! assert!(rows.is_empty());
//! # Ok(())
//! # }
//! ```

#![doc(html_root_url = "https://docs.rs/heron-storage/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod port;
pub mod sqlite;
pub mod value;

pub use error::{StorageError, StorageResult};
pub use port::{bounded, Repository, DEFAULT_QUERY_TIMEOUT};
pub use sqlite::SqliteRepository;
pub use value::{Row, SqlArg};
