//! Configuration schema types.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Upper bound for `REQUEST_TIMEOUT_SECS` (one day).
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 24 * 60 * 60;

/// Complete application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    /// HTTP server settings.
    pub server: ServerSettings,
    /// Storage settings.
    pub storage: StorageSettings,
    /// Logging and metrics settings.
    pub logging: LoggingSettings,
}

impl AppConfig {
    /// Checks cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        port_of(&self.server.addr)?;

        if self.server.request_timeout_secs == 0
            || self.server.request_timeout_secs > MAX_REQUEST_TIMEOUT_SECS
        {
            return Err(ConfigError::invalid_value(
                "REQUEST_TIMEOUT_SECS",
                format!("must be between 1 and {MAX_REQUEST_TIMEOUT_SECS} seconds"),
            ));
        }

        if self.storage.driver.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "DB_MANAGEMENT_SYSTEM",
                "must not be empty",
            ));
        }

        if self.storage.url.trim().is_empty() {
            return Err(ConfigError::invalid_value("DB_URL", "must not be empty"));
        }

        if let Some(addr) = &self.logging.metrics_addr {
            if addr.parse::<std::net::SocketAddr>().is_err() {
                return Err(ConfigError::invalid_value(
                    "METRICS_ADDR",
                    format!("invalid socket address: {addr}"),
                ));
            }
        }

        Ok(())
    }
}

/// HTTP server settings.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerSettings {
    /// Listen address in `host:port` form.
    #[serde(default = "default_addr")]
    pub addr: String,

    /// Folder served under `/<folder>/`, if any.
    #[serde(default)]
    pub static_folder: Option<String>,

    /// Bearer token required by protected routes.
    #[serde(default, skip_serializing)]
    pub auth_token: Option<String>,

    /// Per-request deadline in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl ServerSettings {
    /// Returns the per-request deadline.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            static_folder: None,
            auth_token: None,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl std::fmt::Debug for ServerSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerSettings")
            .field("addr", &self.addr)
            .field("static_folder", &self.static_folder)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

fn default_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

/// Storage settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageSettings {
    /// Driver name, e.g. `sqlite`.
    #[serde(default = "default_driver")]
    pub driver: String,

    /// Connection string.
    pub url: String,
}

fn default_driver() -> String {
    "sqlite".to_string()
}

/// Log format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON formatted logs (production).
    #[default]
    Json,
    /// Human-readable pretty format (development).
    Pretty,
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            other => Err(ConfigError::invalid_value(
                "LOG_FORMAT",
                format!("expected 'json' or 'pretty', got '{other}'"),
            )),
        }
    }
}

/// Logging and metrics settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Default log filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Prometheus listener address; `None` disables export.
    #[serde(default)]
    pub metrics_addr: Option<String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            metrics_addr: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Normalizes `SERVER_PORT` to `host:port`.
///
/// `:3000` and `3000` bind all interfaces.
pub(crate) fn normalize_addr(raw: &str) -> Result<String, ConfigError> {
    let raw = raw.trim();
    let addr = if let Some(port) = raw.strip_prefix(':') {
        format!("0.0.0.0:{port}")
    } else if raw.contains(':') {
        raw.to_string()
    } else {
        format!("0.0.0.0:{raw}")
    };
    port_of(&addr)?;
    Ok(addr)
}

fn port_of(addr: &str) -> Result<u16, ConfigError> {
    addr.rsplit_once(':')
        .filter(|(host, _)| !host.is_empty())
        .and_then(|(_, port)| port.parse().ok())
        .ok_or_else(|| {
            ConfigError::invalid_value("SERVER_PORT", format!("invalid listen address: {addr}"))
        })
}
