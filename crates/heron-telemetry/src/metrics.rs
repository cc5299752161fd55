//! Prometheus metrics for Heron.
//!
//! The recording functions go through the `metrics` facade; they are cheap
//! no-ops until [`init_metrics`] installs the Prometheus recorder.

use crate::error::TelemetryError;
use crate::TelemetryResult;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Duration;

/// Metrics configuration.
#[derive(Debug, Clone, Default)]
pub struct MetricsConfig {
    /// Whether metrics export is enabled.
    pub enabled: bool,

    /// Address for the Prometheus scrape listener (e.g., "0.0.0.0:9090").
    pub addr: String,
}

impl MetricsConfig {
    /// Enables export on `addr`.
    #[must_use]
    pub fn listen(addr: impl Into<String>) -> Self {
        Self {
            enabled: true,
            addr: addr.into(),
        }
    }

    /// Builds a config from an optional listen address.
    #[must_use]
    pub fn from_addr(addr: Option<&str>) -> Self {
        addr.map_or_else(Self::default, Self::listen)
    }
}

/// Installs the Prometheus recorder and spawns its HTTP scrape listener.
///
/// Must be called from within a Tokio runtime.
///
/// # Errors
///
/// Returns `TelemetryError::InvalidAddress` for an unparsable address and
/// `TelemetryError::MetricsInit` if a recorder is already installed.
pub fn init_metrics(config: &MetricsConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let addr: SocketAddr = config
        .addr
        .parse()
        .map_err(|e| TelemetryError::InvalidAddress(format!("{}: {e}", config.addr)))?;

    let (recorder, exporter) = PrometheusBuilder::new()
        .with_http_listener(addr)
        .build()
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;

    metrics::set_global_recorder(recorder).map_err(|_| {
        TelemetryError::MetricsInit("a global metrics recorder is already installed".to_string())
    })?;

    tokio::spawn(async move {
        if let Err(e) = exporter.await {
            tracing::error!(error = ?e, "Prometheus exporter stopped");
        }
    });

    register_metric_descriptions();
    tracing::info!(%addr, "Prometheus metrics exporter listening");

    Ok(())
}

fn register_metric_descriptions() {
    describe_counter!(
        "heron_requests_total",
        "Total number of HTTP requests answered"
    );
    describe_histogram!(
        "heron_request_duration_seconds",
        "Duration of timed handlers in seconds"
    );
    describe_gauge!(
        "heron_in_flight_requests",
        "Number of HTTP requests currently being processed"
    );
    describe_counter!(
        "heron_auth_decisions_total",
        "Auth gate decisions by outcome"
    );
}

/// Records an answered request.
pub fn record_request(method: &str, status_code: u16) {
    counter!(
        "heron_requests_total",
        "method" => method.to_string(),
        "status" => status_code.to_string()
    )
    .increment(1);
}

/// Records how long a timed handler ran.
pub fn record_duration(method: &str, duration: Duration) {
    histogram!(
        "heron_request_duration_seconds",
        "method" => method.to_string()
    )
    .record(duration.as_secs_f64());
}

/// Records an auth gate decision.
pub fn record_auth_decision(allowed: bool) {
    counter!(
        "heron_auth_decisions_total",
        "allowed" => allowed.to_string()
    )
    .increment(1);
}

/// Keeps `heron_in_flight_requests` raised while alive.
#[derive(Debug)]
pub struct InFlightGuard {
    _private: (),
}

impl InFlightGuard {
    /// Increments the gauge and returns the guard that decrements it.
    #[must_use]
    pub fn new() -> Self {
        gauge!("heron_in_flight_requests").increment(1.0);
        Self { _private: () }
    }
}

impl Default for InFlightGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        gauge!("heron_in_flight_requests").decrement(1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_disabled() {
        let config = MetricsConfig::default();
        assert!(!config.enabled);
        assert!(init_metrics(&config).is_ok());
    }

    #[test]
    fn test_from_addr() {
        let config = MetricsConfig::from_addr(Some("127.0.0.1:9100"));
        assert!(config.enabled);
        assert_eq!(config.addr, "127.0.0.1:9100");

        assert!(!MetricsConfig::from_addr(None).enabled);
    }

    #[test]
    fn test_invalid_address() {
        let result = init_metrics(&MetricsConfig::listen("not-an-address"));
        assert!(matches!(result, Err(TelemetryError::InvalidAddress(_))));
    }

    #[test]
    fn test_record_functions_without_recorder() {
        record_request("GET", 200);
        record_duration("DELETE", Duration::from_millis(12));
        record_auth_decision(false);
        let guard = InFlightGuard::new();
        drop(guard);
    }
}
