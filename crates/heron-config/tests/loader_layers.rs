//! Env-file layering tests against real files.

use std::fs;

use heron_config::{keys, ConfigError, ConfigLoader, LogFormat};

const ENV_FILE: &str = "\
# Heron sample configuration
SERVER_PORT=:3000
STATIC_FOLDER=static
DB_MANAGEMENT_SYSTEM = sqlite
DB_URL = sqlite://customers.db

this line is ignored
AUTH_TOKEN=s3cret
LOG_FORMAT=pretty
";

#[test]
fn test_env_file_populates_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".env");
    fs::write(&path, ENV_FILE).unwrap();

    let config = ConfigLoader::new().with_env_file(&path).unwrap().load().unwrap();

    assert_eq!(config.server.addr, "0.0.0.0:3000");
    assert_eq!(config.server.static_folder.as_deref(), Some("static"));
    assert_eq!(config.server.auth_token.as_deref(), Some("s3cret"));
    assert_eq!(config.storage.driver, "sqlite");
    assert_eq!(config.storage.url, "sqlite://customers.db");
    assert_eq!(config.logging.format, LogFormat::Pretty);
}

#[test]
fn test_env_file_overrides_earlier_layers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".env");
    fs::write(&path, "DB_URL=sqlite://from-file.db\n").unwrap();

    let loader = ConfigLoader::new()
        .with_vars([(keys::DB_URL, "sqlite://from-env.db"), (keys::SERVER_PORT, "9000")])
        .with_env_file(&path)
        .unwrap();

    assert_eq!(loader.get(keys::DB_URL), Some("sqlite://from-file.db"));
    let config = loader.load().unwrap();
    assert_eq!(config.storage.url, "sqlite://from-file.db");
    assert_eq!(config.server.addr, "0.0.0.0:9000");
}

#[test]
fn test_unreadable_env_file() {
    let dir = tempfile::tempdir().unwrap();
    // A directory exists but cannot be read as a file.
    let err = ConfigLoader::new().with_env_file(dir.path()).unwrap_err();
    assert!(matches!(err, ConfigError::ReadError { .. }));
}
