//! Wallet error types.

use super::models::{Balance, WalletId};
use crate::db::timeouts::TimeoutError;
use std::time::Duration;
use thiserror::Error;

/// Wallet errors
#[derive(Debug, Error)]
pub enum WalletError {
    /// Malformed operation type, non-positive amount, or a deposit that
    /// would overflow the balance
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Withdrawal over the fixed per-operation ceiling
    #[error("Withdrawal of {amount} exceeds one-time limit of {limit}")]
    LimitExceeded { amount: Balance, limit: Balance },

    /// Wallet not found
    #[error("Wallet not found: {0}")]
    WalletNotFound(WalletId),

    /// Insufficient funds
    #[error("Insufficient funds: available {available}, required {required}")]
    InsufficientFunds { available: Balance, required: Balance },

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Storage operation did not finish in time; the transaction was rolled back
    #[error("Storage operation timed out after {0:?}")]
    Timeout(Duration),
}

impl WalletError {
    /// Get a client-safe error message that doesn't leak sensitive information
    ///
    /// These strings are part of the HTTP contract and must stay stable.
    pub fn client_message(&self) -> String {
        match self {
            WalletError::InvalidRequest(reason) => reason.clone(),
            WalletError::LimitExceeded { .. } => {
                "Withdrawal amount exceeds one-time limit".to_string()
            }
            // Don't echo the identifier back
            WalletError::WalletNotFound(_) => "Wallet not found".to_string(),
            WalletError::InsufficientFunds { .. } => "Insufficient funds".to_string(),
            // Sanitize storage errors - don't expose SQL details
            WalletError::Database(_) | WalletError::Timeout(_) => {
                "Internal server error".to_string()
            }
        }
    }

    /// Whether this error comes from the underlying storage rather than
    /// from a business rule.
    ///
    /// Every other kind leaves the wallet unchanged and is safe to retry.
    pub fn is_storage_error(&self) -> bool {
        matches!(self, WalletError::Database(_) | WalletError::Timeout(_))
    }
}

impl From<TimeoutError> for WalletError {
    fn from(err: TimeoutError) -> Self {
        match err {
            TimeoutError::Timeout(duration) => WalletError::Timeout(duration),
            TimeoutError::Database(e) => WalletError::Database(e),
        }
    }
}

/// Result type for wallet operations
pub type WalletResult<T> = Result<T, WalletError>;
