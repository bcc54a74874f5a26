//! Prometheus metrics for monitoring pack tracking and the HTTP surface.
//!
//! Metrics are exposed in Prometheus text format on a separate listener
//! (`METRICS_BIND`). Recording is a no-op until the exporter is installed.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use pb_server::metrics;
//! use std::net::SocketAddr;
//!
//! let addr: SocketAddr = "127.0.0.1:9090".parse().unwrap();
//! metrics::init_metrics(addr).unwrap();
//!
//! metrics::packs_tracked_total("tracked");
//! metrics::double_packs_pending(2);
//! ```

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Initialize Prometheus metrics exporter.
///
/// Metrics will be available at `http://<addr>/metrics`.
///
/// # Arguments
///
/// - `addr`: Address to bind the metrics server to (e.g., `0.0.0.0:9090`)
///
/// # Returns
///
/// Result indicating success or error message
pub fn init_metrics(addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {}", e))
}

// ============================================================================
// HTTP Metrics
// ============================================================================

/// Record HTTP request.
///
/// Increments the total HTTP request counter with method, path, and status labels.
pub fn http_requests_total(method: &str, path: &str, status: u16) {
    metrics::counter!("http_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record HTTP request duration in milliseconds.
pub fn http_request_duration_ms(method: &str, path: &str, duration_ms: f64) {
    metrics::histogram!("http_request_duration_ms",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(duration_ms);
}

// ============================================================================
// Pool Metrics
// ============================================================================

/// Increment pack-tracking outcomes (`tracked`, `pending`, or an error label).
pub fn packs_tracked_total(outcome: &str) {
    metrics::counter!("packs_tracked_total",
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// Increment published pool rebuilds by what triggered them.
pub fn pool_rebuilds_total(trigger: &str) {
    metrics::counter!("pool_rebuilds_total",
        "trigger" => trigger.to_string()
    )
    .increment(1);
}

/// Set current open double-pack bundles.
pub fn double_packs_pending(count: usize) {
    metrics::gauge!("double_packs_pending").set(count as f64);
}
