//! Layered configuration loader.

use std::env;
use std::path::Path;

use indexmap::IndexMap;

use crate::envfile::EnvFile;
use crate::error::ConfigError;
use crate::schema::{
    normalize_addr, AppConfig, LogFormat, LoggingSettings, ServerSettings, StorageSettings,
};

/// Recognised configuration keys.
pub mod keys {
    /// Listen address.
    pub const SERVER_PORT: &str = "SERVER_PORT";
    /// Static asset folder.
    pub const STATIC_FOLDER: &str = "STATIC_FOLDER";
    /// Storage driver name.
    pub const DB_MANAGEMENT_SYSTEM: &str = "DB_MANAGEMENT_SYSTEM";
    /// Storage connection string.
    pub const DB_URL: &str = "DB_URL";
    /// Bearer token for protected routes.
    pub const AUTH_TOKEN: &str = "AUTH_TOKEN";
    /// Default log filter.
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
    /// `json` or `pretty`.
    pub const LOG_FORMAT: &str = "LOG_FORMAT";
    /// Prometheus listener address.
    pub const METRICS_ADDR: &str = "METRICS_ADDR";
    /// Per-request deadline in seconds.
    pub const REQUEST_TIMEOUT_SECS: &str = "REQUEST_TIMEOUT_SECS";

    /// Every key the loader reads.
    pub const ALL: &[&str] = &[
        SERVER_PORT,
        STATIC_FOLDER,
        DB_MANAGEMENT_SYSTEM,
        DB_URL,
        AUTH_TOKEN,
        LOG_LEVEL,
        LOG_FORMAT,
        METRICS_ADDR,
        REQUEST_TIMEOUT_SECS,
    ];
}

/// Configuration loader with layered approach.
///
/// Each `with_*` call layers its values over everything added before it, so
/// the conventional order is process environment first, env file last.
///
/// # Example
///
/// ```no_run
/// use heron_config::ConfigLoader;
///
/// # fn main() -> Result<(), heron_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_process_env()
///     .with_env_file(".env")?
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default, Clone)]
pub struct ConfigLoader {
    vars: IndexMap<String, String>,
}

impl ConfigLoader {
    /// Create a loader holding only built-in defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Layers the known keys from the process environment.
    #[must_use]
    pub fn with_process_env(self) -> Self {
        let found: Vec<(&str, String)> = keys::ALL
            .iter()
            .filter_map(|key| env::var(key).ok().map(|value| (*key, value)))
            .collect();
        self.with_vars(found)
    }

    /// Layers an env file; a missing or unreadable file is an error.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::FileNotFound` or `ConfigError::ReadError`.
    pub fn with_env_file(self, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file = EnvFile::load(path)?;
        tracing::debug!(path = %path.display(), entries = file.len(), "Loaded environment file");
        Ok(self.with_vars(file.iter()))
    }

    /// Layers an env file if it exists.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadError` if the file exists but cannot be read.
    pub fn with_optional_env_file(self, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_env_file(path)
        } else {
            Ok(self)
        }
    }

    /// Layers explicit key/value pairs.
    #[must_use]
    pub fn with_vars<K, V>(mut self, vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in vars {
            self.vars.insert(key.into(), value.into());
        }
        self
    }

    /// Returns the raw value currently layered for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Builds and validates the configuration.
    ///
    /// Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required key is missing or a value is
    /// invalid.
    pub fn load(self) -> Result<AppConfig, ConfigError> {
        let mut server = ServerSettings::default();
        if let Some(port) = self.value(keys::SERVER_PORT) {
            server.addr = normalize_addr(port)?;
        }
        server.static_folder = self
            .value(keys::STATIC_FOLDER)
            .map(|folder| folder.trim_matches('/').to_string())
            .filter(|folder| !folder.is_empty());
        server.auth_token = self.value(keys::AUTH_TOKEN).map(str::to_string);
        if let Some(secs) = self.value(keys::REQUEST_TIMEOUT_SECS) {
            server.request_timeout_secs = secs.parse().map_err(|_| {
                ConfigError::invalid_value(keys::REQUEST_TIMEOUT_SECS, "expected integer")
            })?;
        }

        let storage = StorageSettings {
            driver: self
                .value(keys::DB_MANAGEMENT_SYSTEM)
                .unwrap_or("sqlite")
                .to_string(),
            url: self
                .value(keys::DB_URL)
                .ok_or_else(|| ConfigError::missing_field(keys::DB_URL))?
                .to_string(),
        };

        let mut logging = LoggingSettings::default();
        if let Some(level) = self.value(keys::LOG_LEVEL) {
            logging.level = level.to_string();
        }
        if let Some(format) = self.value(keys::LOG_FORMAT) {
            logging.format = format.parse::<LogFormat>()?;
        }
        logging.metrics_addr = self.value(keys::METRICS_ADDR).map(str::to_string);

        let config = AppConfig {
            server,
            storage,
            logging,
        };
        config.validate()?;
        Ok(config)
    }

    fn value(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|value| !value.is_empty())
    }
}
