//! Prometheus metrics for request latency and store activity.
//!
//! This module provides:
//! - HTTP request latency per endpoint
//! - HTTP request counts per endpoint and status
//! - Song create/update/delete counters

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::debug;

use crate::error::AppError;

// === Metric Name Constants ===

/// HTTP request latency metric name.
pub const METRIC_HTTP_REQUEST_LATENCY: &str = "http_request_latency_ms";
/// HTTP requests counter metric name.
pub const METRIC_HTTP_REQUESTS: &str = "http_requests_total";
/// Songs created counter metric name.
pub const METRIC_SONGS_CREATED: &str = "songs_created_total";
/// Songs updated counter metric name.
pub const METRIC_SONGS_UPDATED: &str = "songs_updated_total";
/// Songs deleted counter metric name.
pub const METRIC_SONGS_DELETED: &str = "songs_deleted_total";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_HTTP_REQUEST_LATENCY,
        "HTTP request handling latency in milliseconds"
    );

    describe_counter!(METRIC_HTTP_REQUESTS, "Total number of HTTP requests handled");
    describe_counter!(METRIC_SONGS_CREATED, "Total number of songs created");
    describe_counter!(METRIC_SONGS_UPDATED, "Total number of songs replaced");
    describe_counter!(METRIC_SONGS_DELETED, "Total number of songs deleted");

    debug!("Metrics initialized");
}

/// Install the global Prometheus recorder and describe all metrics.
pub fn install_prometheus() -> Result<PrometheusHandle, AppError> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| AppError::Metrics(e.to_string()))?;
    init_metrics();
    Ok(handle)
}

/// Record HTTP request latency.
pub fn record_http_latency(start: Instant, endpoint: &str) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_HTTP_REQUEST_LATENCY, "endpoint" => endpoint.to_string()).record(latency_ms);
}

/// Increment the request counter for an endpoint and response status.
pub fn inc_http_requests(endpoint: &str, status: u16) {
    counter!(METRIC_HTTP_REQUESTS, "endpoint" => endpoint.to_string(), "status" => status.to_string())
        .increment(1);
}

/// Increment songs created counter.
pub fn inc_songs_created() {
    counter!(METRIC_SONGS_CREATED).increment(1);
}

/// Increment songs updated counter.
pub fn inc_songs_updated() {
    counter!(METRIC_SONGS_UPDATED).increment(1);
}

/// Increment songs deleted counter.
pub fn inc_songs_deleted() {
    counter!(METRIC_SONGS_DELETED).increment(1);
}

/// RAII guard for timing a request.
/// Records latency for its endpoint when dropped.
pub struct RequestTimer {
    start: Instant,
    endpoint: String,
}

impl RequestTimer {
    /// Start timing a request to `endpoint`.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            endpoint: endpoint.into(),
        }
    }

    /// Get elapsed time in milliseconds (without recording).
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for RequestTimer {
    fn drop(&mut self) {
        record_http_latency(self.start, &self.endpoint);
    }
}
