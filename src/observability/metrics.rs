//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define settings-service metrics (cache hits, storage fetches, writes)
//! - Expose Prometheus-compatible metrics endpoint
//! - Track HTTP request counts and latency
//!
//! # Metrics
//! - `settings_cache_lookups_total` (counter): cache lookups by result (hit, miss)
//! - `settings_storage_fetches_total` (counter): storage reads by outcome
//! - `settings_writes_total` (counter): POST writes by outcome
//! - `settings_validation_errors_total` (counter): rejected fields by section
//! - `settings_http_requests_total` (counter): requests by method, status
//! - `settings_http_request_duration_seconds` (histogram): latency by method
//!
//! # Design Decisions
//! - Without an installed recorder every call is a no-op
//! - Labels are low-cardinality (no field values, no request ids)

use ::metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_cache_lookup(hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    counter!("settings_cache_lookups_total", "result" => result).increment(1);
}

/// `outcome` is one of found, empty, error.
pub fn record_storage_fetch(outcome: &'static str) {
    counter!("settings_storage_fetches_total", "outcome" => outcome).increment(1);
}

/// `outcome` is one of ok, unauthorized, storage_error.
pub fn record_write(outcome: &'static str) {
    counter!("settings_writes_total", "outcome" => outcome).increment(1);
}

pub fn record_validation_error(section: &str) {
    counter!("settings_validation_errors_total", "section" => section.to_string()).increment(1);
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    let duration = start.elapsed().as_secs_f64();
    counter!(
        "settings_http_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("settings_http_request_duration_seconds", "method" => method.to_string())
        .record(duration);
}
