//! Metrics collection and exposition.
//!
//! # Metrics
//! - `canonical_host_redirects_total` (counter): redirects issued, by policy
//! - `canonical_host_passthrough_total` (counter): requests handed downstream
//! - `canonical_host_upstream_requests_total` (counter): forwards, by status
//! - `canonical_host_upstream_duration_seconds` (histogram): forward latency
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and serve it on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_redirect(policy: &'static str) {
    metrics::counter!("canonical_host_redirects_total", "policy" => policy).increment(1);
}

pub fn record_passthrough() {
    metrics::counter!("canonical_host_passthrough_total").increment(1);
}

pub fn record_upstream(status: u16, start: Instant) {
    metrics::counter!("canonical_host_upstream_requests_total", "status" => status.to_string())
        .increment(1);
    metrics::histogram!("canonical_host_upstream_duration_seconds")
        .record(start.elapsed().as_secs_f64());
}
