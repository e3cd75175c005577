use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use balance_service::{BalanceService, router, store::MemoryLedgerStore};
use serde_json::{Value, json};
use tower::ServiceExt;

fn app() -> Router {
    router(BalanceService::new(Arc::new(MemoryLedgerStore::new())))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_introduction_then_get_balance() {
    let app = app();

    let (status, body) = send(
        &app,
        post("/balance/introduction", json!({"user_id": 1, "amount": 100})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Introduction completed successfully");

    let (status, body) = send(&app, get("/balance/get/1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], 1);
    assert_eq!(body["balance"].as_f64(), Some(100.0));

    let (status, body) = send(&app, get("/balance/get?user_id=1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance"].as_f64(), Some(100.0));
}

#[tokio::test]
async fn test_full_scenario_over_http() {
    let app = app();

    send(
        &app,
        post("/balance/introduction", json!({"user_id": 1, "amount": 100})),
    )
    .await;

    let (status, body) = send(
        &app,
        post("/balance/debit", json!({"user_id": 1, "amount": 150})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "insufficient_funds");

    let (status, _) = send(
        &app,
        post(
            "/balance/transfer",
            json!({"from_user_id": 1, "to_user_id": 2, "amount": 60}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, get("/balance/get/1")).await;
    assert_eq!(body["balance"].as_f64(), Some(40.0));
    let (_, body) = send(&app, get("/balance/get/2")).await;
    assert_eq!(body["balance"].as_f64(), Some(60.0));

    let (status, body) = send(&app, get("/balance/get/99")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "user_not_found");
}

#[tokio::test]
async fn test_debit_success_returns_ok() {
    let app = app();
    send(
        &app,
        post("/balance/introduction", json!({"user_id": 3, "amount": 10.5})),
    )
    .await;

    let (status, body) = send(
        &app,
        post("/balance/debit", json!({"user_id": 3, "amount": 0.5})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Debit completed successfully");

    let (_, body) = send(&app, get("/balance/get/3")).await;
    assert_eq!(body["balance"].as_f64(), Some(10.0));
}

#[tokio::test]
async fn test_validation_errors_are_bad_request() {
    let app = app();

    let (status, body) = send(
        &app,
        post("/balance/introduction", json!({"user_id": 1, "amount": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "invalid_amount");

    let (status, body) = send(
        &app,
        post(
            "/balance/transfer",
            json!({"from_user_id": 4, "to_user_id": 4, "amount": 1}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "same_account");
}

#[tokio::test]
async fn test_malformed_requests_are_bad_request() {
    let app = app();

    let request = Request::builder()
        .method("POST")
        .uri("/balance/debit")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "invalid_request");

    let (status, _) = send(&app, post("/balance/debit", json!({"user_id": 1}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, get("/balance/get/abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, get("/balance/get")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_wrong_method_is_method_not_allowed() {
    let app = app();

    let (status, _) = send(&app, get("/balance/debit")).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

    let (status, _) = send(&app, post("/balance/get/1", json!({}))).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_health_check() {
    let app = app();

    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_amount_beyond_balance_limit_is_rejected() {
    let app = app();

    let request = Request::builder()
        .method("POST")
        .uri("/balance/introduction")
        .header("content-type", "application/json")
        .body(Body::from(
            r#"{"user_id": 1, "amount": 50000000000000000000000000000}"#,
        ))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "invalid_amount");

    let (status, _) = send(&app, get("/balance/get/1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_credit_past_limit_is_conflict() {
    let app = app();

    let large = json!({"user_id": 1, "amount": 90000000000000000000.0});

    let (status, _) = send(&app, post("/balance/introduction", large.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, post("/balance/introduction", large)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "balance_limit_exceeded");

    let (status, body) = send(&app, get("/balance/get/1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance"].as_f64(), Some(9e19));
}
