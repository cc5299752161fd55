//! # Heron
//!
//! A minimal HTTP application server: a deterministic route table, composable
//! middleware, and handlers that reach a relational store through a narrow
//! repository port.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use heron::config::ConfigLoader;
//! use heron::storage::Repository;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = ConfigLoader::new().with_process_env().with_env_file(".env")?.load()?;
//! let repo = heron::connect_storage(&config.storage).await?;
//! let server = heron::build_server(&config, Arc::clone(&repo) as Arc<dyn Repository>);
//! server.run().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Routes
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | GET | `/`, `/home` | welcome message |
//! | POST | `/customer` | create |
//! | GET | `/customer/\d+` | fetch by id |
//! | PUT | `/customer/\d+` | update |
//! | DELETE | `/customer/\d+` | delete, behind timing and bearer auth |
//! | GET, PUT, DELETE | `/customer/{id}` | `400 Invalid customer ID` |

#![doc(html_root_url = "https://docs.rs/heron/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use heron_core as core;

// Re-export routing
pub use heron_router as router;

// Re-export middleware
pub use heron_middleware as middleware;

// Re-export the storage port
pub use heron_storage as storage;

// Re-export configuration
pub use heron_config as config;

// Re-export telemetry
pub use heron_telemetry as telemetry;

// Re-export the server
pub use heron_server as server;

mod app;
pub mod handlers;
pub mod routes;
pub mod schema;

pub use app::{build_server, connect_storage, log_config};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
