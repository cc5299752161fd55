//! Wiring configuration into a running server.

use std::sync::Arc;

use heron_config::{AppConfig, LogFormat, LoggingSettings, StorageSettings};
use heron_middleware::BearerToken;
use heron_server::{Server, StaticFiles};
use heron_storage::{Repository, SqliteRepository, StorageResult, DEFAULT_QUERY_TIMEOUT};
use heron_telemetry::LogConfig;
use tracing::{info, warn};

use crate::routes::bind_routes;
use crate::schema;

/// Opens the configured store and makes sure the schema exists.
pub async fn connect_storage(settings: &StorageSettings) -> StorageResult<Arc<SqliteRepository>> {
    let repo =
        SqliteRepository::connect(&settings.driver, &settings.url, DEFAULT_QUERY_TIMEOUT).await?;
    repo.migrate(schema::CUSTOMERS).await?;
    info!(driver = %settings.driver, "Storage ready");
    Ok(Arc::new(repo))
}

/// Builds the server with every application route bound.
pub fn build_server(config: &AppConfig, repo: Arc<dyn Repository>) -> Server {
    let auth = BearerToken::from_config(config.server.auth_token.as_deref());
    if !auth.is_configured() {
        warn!("AUTH_TOKEN is not set; DELETE /customer/{{id}} will reject every request");
    }

    let mut builder = Server::builder()
        .addr(config.server.addr.clone())
        .request_timeout(config.server.request_timeout());

    if let Some(folder) = &config.server.static_folder {
        builder = builder.static_files(StaticFiles::new(folder));
    }

    bind_routes(builder, repo, auth).build()
}

/// Maps logging settings onto a subscriber configuration.
pub fn log_config(settings: &LoggingSettings) -> LogConfig {
    let base = match settings.format {
        LogFormat::Json => LogConfig::production(),
        LogFormat::Pretty => LogConfig::development(),
    };
    base.with_level(settings.level.clone())
}
