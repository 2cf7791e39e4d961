//! Request metrics for the Manifold client.
//!
//! Recorded through the `metrics` facade. Without an installed recorder
//! (as in the CLI) these calls do nothing.

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use tracing::debug;

// === Metric Name Constants ===

/// HTTP request latency metric name.
pub const METRIC_HTTP_REQUEST_LATENCY: &str = "http_request_latency_ms";
/// HTTP requests counter metric name.
pub const METRIC_HTTP_REQUESTS: &str = "http_requests_total";
/// Failed HTTP requests counter metric name.
pub const METRIC_HTTP_REQUEST_FAILURES: &str = "http_request_failures_total";

/// Initialize all metric descriptions.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_HTTP_REQUEST_LATENCY,
        "Manifold API request latency in milliseconds"
    );
    describe_counter!(
        METRIC_HTTP_REQUESTS,
        "Total number of Manifold API requests sent"
    );
    describe_counter!(
        METRIC_HTTP_REQUEST_FAILURES,
        "Total number of Manifold API requests that failed"
    );

    debug!("Metrics initialized");
}

/// Increment the request counter for an endpoint.
pub fn inc_http_requests(endpoint: &'static str) {
    counter!(METRIC_HTTP_REQUESTS, "endpoint" => endpoint).increment(1);
}

/// Increment the failure counter for an endpoint.
pub fn inc_http_request_failures(endpoint: &'static str) {
    counter!(METRIC_HTTP_REQUEST_FAILURES, "endpoint" => endpoint).increment(1);
}

/// RAII guard for timing a request.
/// Records latency for its endpoint when dropped.
pub struct LatencyTimer {
    start: Instant,
    endpoint: &'static str,
}

impl LatencyTimer {
    /// Start timing a request to `endpoint`.
    pub fn new(endpoint: &'static str) -> Self {
        Self {
            start: Instant::now(),
            endpoint,
        }
    }

    /// Get elapsed time in milliseconds (without recording).
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        histogram!(METRIC_HTTP_REQUEST_LATENCY, "endpoint" => self.endpoint)
            .record(self.elapsed_ms());
    }
}
