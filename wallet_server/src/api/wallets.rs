//! Wallet API handlers.
//!
//! This module provides the HTTP endpoints for:
//! - Reading a wallet's balance
//! - Depositing to or withdrawing from a wallet
//!
//! Each failure kind maps to a fixed error string in an `{"error": ...}` body.
//!
//! # Examples
//!
//! Read a balance:
//! ```bash
//! curl http://localhost:8000/api/v1/wallets/550e8400-e29b-41d4-a716-446655440000
//! ```
//!
//! Deposit:
//! ```bash
//! curl -X POST http://localhost:8000/api/v1/wallets/550e8400-e29b-41d4-a716-446655440000/operation \
//!   -H "Content-Type: application/json" \
//!   -d '{"operation_type": "DEPOSIT", "amount": 500}'
//! ```

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use wallet_ledger::wallet::{Balance, OperationRequest, WalletError};

use super::{AppState, request_id::RequestId};
use crate::{logging, metrics};

#[derive(Debug, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub balance: Balance,
}

/// Operation body as sent by clients
///
/// `operation_type` stays a string here so an unknown value produces the
/// same `{"error": ...}` body as every other validation failure.
#[derive(Debug, Serialize, Deserialize)]
pub struct OperationPayload {
    pub operation_type: String,
    pub amount: AmountField,
}

/// `amount` as a JSON integer or a string holding one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountField {
    Number(Balance),
    Text(String),
}

impl AmountField {
    /// Integer value; a string that is not an integer is an invalid request
    pub fn value(&self) -> Result<Balance, WalletError> {
        match self {
            AmountField::Number(amount) => Ok(*amount),
            AmountField::Text(raw) => raw.trim().parse::<Balance>().map_err(|_| {
                WalletError::InvalidRequest(format!("A valid integer is required, got \"{raw}\""))
            }),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OperationResponse {
    pub updated_balance: Balance,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Error half of every wallet handler
pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// HTTP status for a wallet error
pub fn http_status(err: &WalletError) -> StatusCode {
    match err {
        WalletError::InvalidRequest(_)
        | WalletError::LimitExceeded { .. }
        | WalletError::InsufficientFunds { .. } => StatusCode::BAD_REQUEST,
        WalletError::WalletNotFound(_) => StatusCode::NOT_FOUND,
        WalletError::Database(_) | WalletError::Timeout(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn api_error(err: &WalletError) -> ApiError {
    (
        http_status(err),
        Json(ErrorResponse {
            error: err.client_message(),
        }),
    )
}

/// Get the balance of a wallet.
///
/// # Response
///
/// Returns `200 OK` with:
/// ```json
/// {"balance": 1000}
/// ```
///
/// # Errors
///
/// - `404 Not Found`: `{"error": "Wallet not found"}`
/// - `500 Internal Server Error`: Storage failure
pub async fn get_balance(
    State(state): State<AppState>,
    Path(wallet_uuid): Path<String>,
) -> Result<Json<BalanceResponse>, ApiError> {
    match state.executor.balance(&wallet_uuid).await {
        Ok(balance) => Ok(Json(BalanceResponse { balance })),
        Err(e) => {
            if e.is_storage_error() {
                tracing::error!(wallet_id = %wallet_uuid, "Balance lookup failed: {}", e);
            }
            Err(api_error(&e))
        }
    }
}

/// Deposit to or withdraw from a wallet.
///
/// # Request Body
///
/// ```json
/// {"operation_type": "DEPOSIT", "amount": 500}
/// ```
///
/// # Response
///
/// Returns `200 OK` with the committed balance:
/// ```json
/// {"updated_balance": 1500}
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: `{"error": "Insufficient funds"}`,
///   `{"error": "Withdrawal amount exceeds one-time limit"}`, or a validation
///   message for an unknown operation type, a non-positive amount or a
///   malformed body
/// - `404 Not Found`: `{"error": "Wallet not found"}`
/// - `500 Internal Server Error`: Storage failure
pub async fn perform_operation(
    State(state): State<AppState>,
    Path(wallet_uuid): Path<String>,
    request_id: RequestId,
    payload: Result<Json<OperationPayload>, JsonRejection>,
) -> Result<Json<OperationResponse>, ApiError> {
    let Json(payload) = payload.map_err(|rejection| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: rejection.body_text(),
            }),
        )
    })?;

    let request = payload
        .amount
        .value()
        .and_then(|amount| OperationRequest::parse(wallet_uuid, &payload.operation_type, amount))
        .map_err(|e| api_error(&e))?;

    let started = Instant::now();
    let result = state.executor.apply_request(&request).await;
    let elapsed = started.elapsed();

    let outcome = metrics::outcome_label(&result);
    metrics::ledger_operations_total(request.operation_type, outcome);
    metrics::ledger_operation_duration_ms(request.operation_type, elapsed.as_secs_f64() * 1000.0);
    logging::log_ledger_operation(
        request_id.as_str(),
        &request.wallet_id,
        request.operation_type,
        request.amount,
        outcome,
        elapsed.as_millis() as u64,
    );

    result
        .map(|updated_balance| Json(OperationResponse { updated_balance }))
        .map_err(|e| api_error(&e))
}
