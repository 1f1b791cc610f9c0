//! HTTP API for the wallet server.
//!
//! # Architecture
//!
//! The API is built with:
//! - **Axum**: Async web framework for HTTP
//! - **Tower**: Middleware for CORS and request IDs
//! - **LedgerExecutor**: All balance changes go through the ledger core
//!
//! # Modules
//!
//! - [`wallets`]: Balance lookup and deposit/withdraw operations
//! - [`request_id`]: Request ID propagation, request logging and HTTP metrics
//!
//! # Endpoints Overview
//!
//! ## Wallets
//! - `GET /api/v1/wallets/{wallet_uuid}` - Current balance
//! - `POST /api/v1/wallets/{wallet_uuid}/operation` - Deposit or withdraw
//!
//! ## Health Check
//! - `GET /health` - Server health status
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use wallet_ledger::{LedgerExecutor, MemoryWalletStore};
//! use wallet_server::api::{create_router, AppState};
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!
//! let executor = LedgerExecutor::new(Arc::new(MemoryWalletStore::new()));
//! let app = create_router(AppState {
//!     executor: Arc::new(executor),
//! });
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # CORS
//!
//! CORS is configured permissively for development. In production, configure
//! appropriate origins, methods, and headers.

pub mod request_id;
pub mod wallets;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use wallet_ledger::LedgerExecutor;

/// Application state shared across all HTTP handlers.
///
/// Cloned for each request (cheap due to Arc wrappers).
#[derive(Clone)]
pub struct AppState {
    /// Ledger core; owns the wallet store handle
    pub executor: Arc<LedgerExecutor>,
}

/// Create the complete API router with all endpoints and middleware.
///
/// # Endpoint Summary
///
/// ```text
/// GET  /health                                   - Health check
/// GET  /api/v1/wallets/{wallet_uuid}             - Balance
/// POST /api/v1/wallets/{wallet_uuid}/operation   - Deposit / withdraw
/// ```
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", create_v1_router())
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Create API v1 router with all versioned endpoints.
fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/wallets/{wallet_uuid}", get(wallets::get_balance))
        .route(
            "/wallets/{wallet_uuid}/operation",
            post(wallets::perform_operation),
        )
}

/// Health check endpoint for monitoring and load balancers.
///
/// Checks that the wallet store can serve requests.
///
/// # Response
///
/// Returns `200 OK` if healthy, or `503 Service Unavailable` otherwise.
///
/// ```bash
/// curl http://localhost:8000/health
/// # {"status":"healthy","version":"0.1.0","storage":{"backend":"postgres","healthy":true},"timestamp":"..."}
/// ```
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.executor.store();
    let storage_healthy = match store.health_check().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(backend = store.backend(), "Storage health check failed: {}", e);
            false
        }
    };

    let status_code = if storage_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = json!({
        "status": if storage_healthy { "healthy" } else { "unhealthy" },
        "version": env!("CARGO_PKG_VERSION"),
        "storage": {
            "backend": store.backend(),
            "healthy": storage_healthy,
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (status_code, Json(response))
}
