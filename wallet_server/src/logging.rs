//! Structured logging configuration.
//!
//! This module provides structured logging with request correlation and
//! per-operation ledger events.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use wallet_ledger::wallet::{Balance, OperationType};

/// Initialize structured logging
///
/// Features:
/// - Request ID correlation
/// - Records from the `log` facade (used by `wallet_ledger`) are forwarded
/// - Configurable log levels via RUST_LOG env var
///
/// # Example
///
/// ```no_run
/// use wallet_server::logging;
///
/// #[tokio::main]
/// async fn main() {
///     logging::init();
///     tracing::info!("Server starting");
/// }
/// ```
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,hyper=warn"));

    // Console layer for development
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Structured logging initialized");
}

/// Log the outcome of one ledger operation
///
/// # Arguments
///
/// * `request_id` - Correlation ID of the HTTP request
/// * `wallet_id` - Wallet identifier
/// * `operation` - Operation kind
/// * `amount` - Requested amount
/// * `outcome` - Outcome label (see [`crate::metrics::outcome_label`])
/// * `duration_ms` - Duration including lock wait
pub fn log_ledger_operation(
    request_id: &str,
    wallet_id: &str,
    operation: OperationType,
    amount: Balance,
    outcome: &str,
    duration_ms: u64,
) {
    if outcome == "storage_error" {
        tracing::error!(
            request_id = request_id,
            wallet_id = wallet_id,
            operation = %operation,
            amount = amount,
            duration_ms = duration_ms,
            "LEDGER: Storage failure"
        );
    } else if duration_ms > 1000 {
        tracing::warn!(
            request_id = request_id,
            wallet_id = wallet_id,
            operation = %operation,
            amount = amount,
            outcome = outcome,
            duration_ms = duration_ms,
            "LEDGER: Slow operation"
        );
    } else {
        tracing::info!(
            request_id = request_id,
            wallet_id = wallet_id,
            operation = %operation,
            amount = amount,
            outcome = outcome,
            duration_ms = duration_ms,
            "Ledger operation completed"
        );
    }
}
