//! Heron - Entry point
//!
//! Loads configuration, connects storage and serves the customer API.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info};

use heron::config::ConfigLoader;
use heron::storage::Repository;
use heron::telemetry::{init_logging, init_metrics, MetricsConfig};

/// Command-line arguments.
struct Args {
    /// Path to the environment file.
    env_file: PathBuf,
}

impl Args {
    fn parse() -> Self {
        let mut args = std::env::args().skip(1);
        let mut env_file = PathBuf::from(".env");

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--env-file" | "-e" => {
                    if let Some(path) = args.next() {
                        env_file = PathBuf::from(path);
                    } else {
                        eprintln!("--env-file requires a path");
                        std::process::exit(1);
                    }
                }
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                "--version" | "-v" => {
                    println!("heron {}", heron::VERSION);
                    std::process::exit(0);
                }
                other => {
                    eprintln!("Unknown argument: {other}");
                    eprintln!("Use --help for usage information");
                    std::process::exit(1);
                }
            }
        }

        Self { env_file }
    }
}

fn print_help() {
    println!(
        r"Heron - Minimal HTTP application server

USAGE:
    heron [OPTIONS]

OPTIONS:
    -e, --env-file <PATH>  Path to the environment file (default: .env)
    -h, --help             Print help information
    -v, --version          Print version information

ENVIRONMENT VARIABLES:
    SERVER_PORT            Listen port or address (default: :8080)
    STATIC_FOLDER          Folder served under /<folder>/
    DB_MANAGEMENT_SYSTEM   Storage driver (default: sqlite)
    DB_URL                 Storage connection string (required)
    AUTH_TOKEN             Bearer token accepted by DELETE /customer/<id>
    LOG_LEVEL              Log filter directive (default: info)
    LOG_FORMAT             json or pretty (default: json)
    METRICS_ADDR           Prometheus exporter address
    REQUEST_TIMEOUT_SECS   Per-request deadline (default: 30)

Values in the environment file override the process environment.
"
    );
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        error!("Fatal: {e:#}");
        eprintln!("heron: {e:#}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = ConfigLoader::new()
        .with_process_env()
        .with_env_file(&args.env_file)
        .with_context(|| format!("failed to load {}", args.env_file.display()))?
        .load()
        .context("invalid configuration")?;

    init_logging(&heron::log_config(&config.logging)).context("failed to initialise logging")?;
    init_metrics(&MetricsConfig::from_addr(config.logging.metrics_addr.as_deref()))
        .context("failed to initialise metrics")?;

    info!(version = heron::VERSION, "Starting Heron");
    info!(addr = %config.server.addr, static_folder = ?config.server.static_folder, "Listening");

    let repo = heron::connect_storage(&config.storage)
        .await
        .context("failed to connect to storage")?;

    let server = heron::build_server(&config, Arc::clone(&repo) as Arc<dyn Repository>);

    let served = tokio::select! {
        result = server.run() => result.context("server error"),
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
            Ok(())
        }
    };

    repo.close().await.context("failed to close storage")?;
    info!("Storage closed");
    served
}
