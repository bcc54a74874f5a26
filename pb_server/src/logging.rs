//! Structured logging configuration.
//!
//! Library crates log through the `log` facade; the subscriber installed here
//! bridges those records into `tracing` so both end up in one stream.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "info,reqwest=warn,hyper=warn";

/// Initialize structured logging
///
/// Features:
/// - Request ID correlation
/// - Configurable log levels via RUST_LOG env var
/// - `log` records from the pool bot library
///
/// # Example
///
/// ```no_run
/// use pb_server::logging;
///
/// #[tokio::main]
/// async fn main() {
///     logging::init();
///     tracing::info!("Server starting");
/// }
/// ```
pub fn init() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Structured logging initialized");
}

/// Log the outcome of a pack-tracking request
///
/// # Arguments
///
/// * `owner_id` - Owner identity id, when known
/// * `outcome` - `tracked`, `pending`, or an error label
/// * `detail` - Pool id or error text
pub fn log_pack_event(owner_id: Option<&str>, outcome: &str, detail: &str) {
    match outcome {
        "tracked" | "pending" => tracing::info!(
            owner_id = owner_id,
            outcome = outcome,
            "PACK: {}",
            detail
        ),
        _ => tracing::warn!(
            owner_id = owner_id,
            outcome = outcome,
            "PACK: {}",
            detail
        ),
    }
}

/// Log API request/response
///
/// # Arguments
///
/// * `method` - HTTP method
/// * `path` - Matched route
/// * `status_code` - Response status code
/// * `duration_ms` - Request duration in milliseconds
pub fn log_api_request(method: &str, path: &str, status_code: u16, duration_ms: u64) {
    if duration_ms > 5_000 {
        tracing::warn!(
            http_method = method,
            http_path = path,
            http_status = status_code,
            duration_ms = duration_ms,
            "Slow API request"
        );
    } else {
        tracing::debug!(
            http_method = method,
            http_path = path,
            http_status = status_code,
            duration_ms = duration_ms,
            "API request completed"
        );
    }
}
