//! Prometheus metrics for monitoring wallet server health and performance.
//!
//! Metrics are exposed in Prometheus text format on a separate listener,
//! started only when `METRICS_BIND` is configured. Without an installed
//! recorder the recording functions are no-ops.
//!
//! # Metrics Categories
//!
//! - **HTTP Metrics**: Request counts and duration by route and status
//! - **Ledger Metrics**: Operation counts by kind and outcome, operation duration
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use wallet_server::metrics;
//! use std::net::SocketAddr;
//!
//! // Initialize metrics exporter
//! let addr: SocketAddr = "127.0.0.1:9090".parse().unwrap();
//! metrics::init_metrics(addr).unwrap();
//!
//! // Record HTTP request
//! metrics::http_requests_total("GET", "/api/v1/wallets/{wallet_uuid}", 200);
//! ```

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use wallet_ledger::wallet::{Balance, OperationType, WalletError, WalletResult};

/// Initialize Prometheus metrics exporter.
///
/// Sets up a Prometheus scrape endpoint on the specified address.
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
/// Increments the total HTTP request counter with method, route, and status labels.
/// `path` should be the matched route template, not the raw URI, to keep
/// wallet identifiers out of label values.
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
// Ledger Metrics
// ============================================================================

/// Label describing how a ledger operation ended.
pub fn outcome_label(result: &WalletResult<Balance>) -> &'static str {
    match result {
        Ok(_) => "success",
        Err(WalletError::InvalidRequest(_)) => "invalid_request",
        Err(WalletError::LimitExceeded { .. }) => "limit_exceeded",
        Err(WalletError::WalletNotFound(_)) => "wallet_not_found",
        Err(WalletError::InsufficientFunds { .. }) => "insufficient_funds",
        Err(WalletError::Database(_) | WalletError::Timeout(_)) => "storage_error",
    }
}

/// Increment ledger operations counter.
pub fn ledger_operations_total(operation: OperationType, outcome: &'static str) {
    metrics::counter!("ledger_operations_total",
        "operation" => operation.as_str(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Record ledger operation duration in milliseconds, lock wait included.
pub fn ledger_operation_duration_ms(operation: OperationType, duration_ms: f64) {
    metrics::histogram!("ledger_operation_duration_ms",
        "operation" => operation.as_str()
    )
    .record(duration_ms);
}
