//! Integration tests for the HTTP API.
//!
//! Runs the full router (middleware included) against the in-memory store, so
//! no database is required.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt; // For `oneshot` method
use wallet_ledger::{LedgerExecutor, MemoryWalletStore};
use wallet_server::api::{AppState, create_router, request_id::REQUEST_ID_HEADER};

const WALLET: &str = "550e8400-e29b-41d4-a716-446655440000";

/// Helper to create test server with one seeded wallet
async fn create_test_server(balance: i64) -> (axum::Router, MemoryWalletStore) {
    let store = MemoryWalletStore::new();
    store
        .get_or_create_wallet(WALLET, balance)
        .await
        .expect("seed wallet");

    let executor = Arc::new(LedgerExecutor::new(Arc::new(store.clone())));
    (create_router(AppState { executor }), store)
}

fn operation_request(wallet: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/api/v1/wallets/{wallet}/operation"))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn balance_request(wallet: &str) -> Request<Body> {
    Request::builder()
        .uri(format!("/api/v1/wallets/{wallet}"))
        .body(Body::empty())
        .unwrap()
}

async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

// ============================================================================
// Balance Tests
// ============================================================================

#[tokio::test]
async fn test_get_balance() {
    let (app, _) = create_test_server(1000).await;

    let (status, body) = send(&app, balance_request(WALLET)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"balance": 1000}));
}

#[tokio::test]
async fn test_get_balance_unknown_wallet() {
    let (app, store) = create_test_server(1000).await;

    let (status, body) = send(&app, balance_request("missing-wallet")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Wallet not found"}));
    assert_eq!(store.len().await, 1);
}

// ============================================================================
// Operation Tests
// ============================================================================

#[tokio::test]
async fn test_deposit_then_withdraw() {
    let (app, _) = create_test_server(1000).await;

    let (status, body) = send(
        &app,
        operation_request(WALLET, json!({"operation_type": "DEPOSIT", "amount": 500})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"updated_balance": 1500}));

    let (status, body) = send(
        &app,
        operation_request(WALLET, json!({"operation_type": "WITHDRAW", "amount": 200})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"updated_balance": 1300}));

    let (_, body) = send(&app, balance_request(WALLET)).await;
    assert_eq!(body, json!({"balance": 1300}));
}

#[tokio::test]
async fn test_withdraw_over_limit() {
    let (app, _) = create_test_server(60_000).await;

    let (status, body) = send(
        &app,
        operation_request(WALLET, json!({"operation_type": "WITHDRAW", "amount": 55_000})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"error": "Withdrawal amount exceeds one-time limit"})
    );

    let (_, body) = send(&app, balance_request(WALLET)).await;
    assert_eq!(body, json!({"balance": 60_000}));
}

#[tokio::test]
async fn test_withdraw_insufficient_funds() {
    let (app, _) = create_test_server(1000).await;

    let (status, body) = send(
        &app,
        operation_request(WALLET, json!({"operation_type": "WITHDRAW", "amount": 2000})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Insufficient funds"}));

    let (_, body) = send(&app, balance_request(WALLET)).await;
    assert_eq!(body, json!({"balance": 1000}));
}

#[tokio::test]
async fn test_operation_unknown_wallet() {
    let (app, store) = create_test_server(1000).await;

    for operation in ["DEPOSIT", "WITHDRAW"] {
        let (status, body) = send(
            &app,
            operation_request(
                "missing-wallet",
                json!({"operation_type": operation, "amount": 100}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Wallet not found"}));
    }
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_invalid_operation_type() {
    let (app, _) = create_test_server(1000).await;

    let (status, body) = send(
        &app,
        operation_request(WALLET, json!({"operation_type": "TRANSFER", "amount": 100})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_non_positive_amount() {
    let (app, _) = create_test_server(1000).await;

    for amount in [0, -5] {
        let (status, body) = send(
            &app,
            operation_request(WALLET, json!({"operation_type": "DEPOSIT", "amount": amount})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("positive"));
    }

    let (_, body) = send(&app, balance_request(WALLET)).await;
    assert_eq!(body, json!({"balance": 1000}));
}

#[tokio::test]
async fn test_amount_as_integer_string() {
    let (app, _) = create_test_server(1000).await;

    let (status, body) = send(
        &app,
        operation_request(WALLET, json!({"operation_type": "DEPOSIT", "amount": "500"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"updated_balance": 1500}));

    let (status, body) = send(
        &app,
        operation_request(WALLET, json!({"operation_type": "DEPOSIT", "amount": "five"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (_, body) = send(&app, balance_request(WALLET)).await;
    assert_eq!(body, json!({"balance": 1500}));
}

#[tokio::test]
async fn test_malformed_json_request() {
    let (app, _) = create_test_server(1000).await;

    let request = Request::builder()
        .method("POST")
        .uri(format!("/api/v1/wallets/{WALLET}/operation"))
        .header("content-type", "application/json")
        .body(Body::from("{invalid json"))
        .unwrap();

    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_missing_amount_field() {
    let (app, _) = create_test_server(1000).await;

    let (status, body) = send(
        &app,
        operation_request(WALLET, json!({"operation_type": "DEPOSIT"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

// ============================================================================
// Middleware and Health Tests
// ============================================================================

#[tokio::test]
async fn test_request_id_is_echoed() {
    let (app, _) = create_test_server(1000).await;

    let request = Request::builder()
        .uri(format!("/api/v1/wallets/{WALLET}"))
        .header(REQUEST_ID_HEADER, "trace-abc")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(
        response.headers().get(REQUEST_ID_HEADER).unwrap(),
        "trace-abc"
    );

    // Generated when absent, error responses included
    let response = app.oneshot(balance_request("missing-wallet")).await.unwrap();
    assert!(response.headers().contains_key(REQUEST_ID_HEADER));
}

#[tokio::test]
async fn test_health_check_endpoint() {
    let (app, _) = create_test_server(0).await;

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storage"]["backend"], "memory");
    assert_eq!(body["storage"]["healthy"], true);
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_404_for_invalid_endpoint() {
    let (app, _) = create_test_server(0).await;

    let request = Request::builder()
        .uri("/api/v1/nonexistent")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Concurrency Tests
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_operations() {
    let (app, _) = create_test_server(1000).await;

    let mut requests = Vec::new();
    for _ in 0..10 {
        requests.push(("DEPOSIT", 500));
    }
    for _ in 0..5 {
        requests.push(("WITHDRAW", 2000));
    }

    let handles: Vec<_> = requests
        .into_iter()
        .map(|(operation, amount)| {
            let app = app.clone();
            tokio::spawn(async move {
                let body = json!({"operation_type": operation, "amount": amount});
                let (status, body) = send(&app, operation_request(WALLET, body)).await;
                (operation, status, body)
            })
        })
        .collect();

    let mut successful_withdrawals = 0;
    for result in futures_util::future::join_all(handles).await {
        let (operation, status, body) = result.unwrap();
        match (operation, status) {
            ("DEPOSIT", StatusCode::OK) => {}
            ("WITHDRAW", StatusCode::OK) => successful_withdrawals += 1,
            ("WITHDRAW", StatusCode::BAD_REQUEST) => {
                assert_eq!(body, json!({"error": "Insufficient funds"}));
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        if status == StatusCode::OK {
            assert!(body["updated_balance"].as_i64().unwrap() >= 0);
        }
    }

    let (_, body) = send(&app, balance_request(WALLET)).await;
    assert_eq!(
        body["balance"].as_i64().unwrap(),
        1000 + 10 * 500 - successful_withdrawals * 2000
    );
}
