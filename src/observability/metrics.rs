//! Metrics collection and exposition.
//!
//! # Metrics
//! - `forwarder_requests_total` (counter): forwarded calls by outcome
//! - `forwarder_request_duration_seconds` (histogram): end-to-end latency by outcome
//!
//! Outcomes: `success`, `target_http`, `timeout`, `transport`, `validation`.
//! Recording is a no-op until a recorder is installed.

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

/// Start the Prometheus scrape endpoint. Requires a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one forwarded call.
pub fn record_forward(outcome: &'static str, started: Instant) {
    metrics::counter!("forwarder_requests_total", "outcome" => outcome).increment(1);
    metrics::histogram!("forwarder_request_duration_seconds", "outcome" => outcome)
        .record(started.elapsed().as_secs_f64());
}
