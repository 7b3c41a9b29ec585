//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define service metrics (requests, cache lookups, conversions)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `avatar_requests_total` (counter): requests by format, status
//! - `avatar_request_duration_seconds` (histogram): latency by format
//! - `avatar_cache_lookups_total` (counter): by format, outcome (hit/miss/joined)
//! - `avatar_cache_entries` (gauge): current entries per format
//! - `avatar_conversions_total` (counter): by format, outcome (ok/error)
//! - `avatar_conversion_duration_seconds` (histogram): conversion time by format
//!
//! # Design Decisions
//! - Recording without an installed exporter is a no-op, so tests need no setup
//! - Exporter runs on its own listener, separate from model traffic

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(format: &str, status: u16, start: Instant) {
    counter!("avatar_requests_total", "format" => format.to_string(), "status" => status.to_string())
        .increment(1);
    histogram!("avatar_request_duration_seconds", "format" => format.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_cache_lookup(format: &str, outcome: &'static str) {
    counter!("avatar_cache_lookups_total", "format" => format.to_string(), "outcome" => outcome)
        .increment(1);
}

pub fn record_cache_size(format: &str, entries: usize) {
    gauge!("avatar_cache_entries", "format" => format.to_string()).set(entries as f64);
}

pub fn record_conversion(format: &str, success: bool, start: Instant) {
    let outcome = if success { "ok" } else { "error" };
    counter!("avatar_conversions_total", "format" => format.to_string(), "outcome" => outcome)
        .increment(1);
    histogram!("avatar_conversion_duration_seconds", "format" => format.to_string())
        .record(start.elapsed().as_secs_f64());
}
