//! Observability for Heron services.
//!
//! - **Logging**: structured output through `tracing-subscriber`, JSON in
//!   production and pretty-printed in development
//! - **Metrics**: counters, gauges and histograms through the `metrics`
//!   facade, optionally exported in Prometheus format
//!
//! # Standard Metrics
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `heron_requests_total` | Counter | `method`, `status` | Requests answered by the server |
//! | `heron_request_duration_seconds` | Histogram | `method` | Latency of timed handlers |
//! | `heron_in_flight_requests` | Gauge | - | Requests currently being processed |
//! | `heron_auth_decisions_total` | Counter | `allowed` | Auth gate outcomes |
//!
//! Recording is always safe: without an installed recorder the `metrics`
//! macros are no-ops.
//!
//! # Example
//!
//! ```rust,ignore
//! use heron_telemetry::{init_logging, init_metrics, LogConfig, MetricsConfig};
//!
//! init_logging(&LogConfig::production())?;
//! init_metrics(&MetricsConfig::listen("0.0.0.0:9090"))?;
//!
//! tracing::info!(http.path = "/home", "Serving request");
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::TelemetryError;
pub use logging::{init_logging, LogConfig};
pub use metrics::{init_metrics, InFlightGuard, MetricsConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
