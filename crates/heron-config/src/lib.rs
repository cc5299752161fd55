//! # Heron Config
//!
//! Startup configuration for Heron, read from a `KEY=VALUE` env file layered
//! over the process environment.
//!
//! ## Layers
//!
//! Later layers override earlier ones:
//! 1. Built-in defaults
//! 2. Process environment ([`ConfigLoader::with_process_env`])
//! 3. Env file ([`ConfigLoader::with_env_file`])
//!
//! ## Keys
//!
//! | Key | Default | Meaning |
//! |-----|---------|---------|
//! | `SERVER_PORT` | `:8080` | Listen address: `:3000`, `3000` or `host:3000` |
//! | `STATIC_FOLDER` | unset | Folder served under `/<folder>/` |
//! | `DB_MANAGEMENT_SYSTEM` | `sqlite` | Storage driver name |
//! | `DB_URL` | required | Storage connection string |
//! | `AUTH_TOKEN` | unset | Bearer token for protected routes |
//! | `LOG_LEVEL` | `info` | Default log filter |
//! | `LOG_FORMAT` | `json` | `json` or `pretty` |
//! | `METRICS_ADDR` | unset | Prometheus listener address |
//! | `REQUEST_TIMEOUT_SECS` | `30` | Per-request deadline |
//!
//! ## Example
//!
//! ```
//! use heron_config::{ConfigLoader, LogFormat};
//!
//! let config = ConfigLoader::new()
//!     .with_vars([("SERVER_PORT", ":3000"), ("DB_URL", "sqlite::memory:")])
//!     .load()
//!     .unwrap();
//!
//! assert_eq!(config.server.addr, "0.0.0.0:3000");
//! assert_eq!(config.logging.format, LogFormat::Json);
//! ```

#![doc(html_root_url = "https://docs.rs/heron-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod envfile;
mod error;
mod loader;
mod schema;

pub use envfile::EnvFile;
pub use error::ConfigError;
pub use loader::{keys, ConfigLoader};
pub use schema::{
    AppConfig, LogFormat, LoggingSettings, ServerSettings, StorageSettings,
    MAX_REQUEST_TIMEOUT_SECS,
};
