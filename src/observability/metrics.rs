//! Metrics collection and exposition.
//!
//! # Metrics
//! - `pages_requests_total` (counter): requests by method, status, operation
//! - `pages_request_duration_seconds` (histogram): latency by operation
//! - `pages_store_errors_total` (counter): store failures by backend, operation
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed, so tests need no setup
//! - Prometheus exporter is optional and runs its own listener

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record a finished request.
pub fn record_request(method: &str, status: u16, operation: &str, start: Instant) {
    metrics::counter!(
        "pages_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "operation" => operation.to_string()
    )
    .increment(1);

    metrics::histogram!(
        "pages_request_duration_seconds",
        "operation" => operation.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record a store failure (misses are not failures).
pub fn record_store_error(backend: &'static str, operation: &'static str) {
    metrics::counter!(
        "pages_store_errors_total",
        "backend" => backend,
        "operation" => operation
    )
    .increment(1);
}
