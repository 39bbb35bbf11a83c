mod common;

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use common::*;
use serde_json::{json, Value};
use token_recover_approver::http::router;
use tower::ServiceExt;

fn app() -> Router { router(Arc::new(fixture_service())) }

async fn call(app: Router, request: Request<Body>) -> Value {
    let response = app.oneshot(request).await.unwrap();
    // every outcome is carried in the envelope
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn post(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

#[tokio::test]
async fn test_ping() {
    let body = call(app(), Request::get("/ping").body(Body::empty()).unwrap()).await;
    assert_eq!(body, json!({ "code": 0, "data": "pong" }));
}

#[tokio::test]
async fn test_claim_approval_over_http() {
    let request = json!({
        "token_symbol": "BNB",
        "owner_pub_key": ALICE_PK,
        "owner_signature": ALICE_CLAIM_BNB_SIG,
        "claim_address": DESTINATION,
    });
    let body = call(app(), post("/claim-approval", request.to_string())).await;

    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["amount"], 1_000_000_000);
    assert_eq!(body["data"]["approval_signature"], FIXTURE_ALICE_BNB_APPROVAL);
    assert_eq!(body["data"]["proofs"].as_array().map(Vec::len), Some(2));
    assert!(body["data"].get("prefix_node").is_none());
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn test_register_token_approval_over_http() {
    let request = json!({
        "token_symbol": "BUSD-BD1",
        "owner_pub_key": BOB_PK,
        "owner_signature": BOB_REGISTER_BUSD_SIG,
        "register_address": DESTINATION,
    });
    let body = call(app(), post("/register-token-approval", request.to_string())).await;

    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["amount"], 250_000_000_000i64);
    assert_eq!(body["data"]["approval_signature"], FIXTURE_BOB_REGISTER_APPROVAL);
}

#[tokio::test]
async fn test_malformed_body_is_invalid_request() {
    let body = call(app(), post("/claim-approval", "{\"token_symbol\":")).await;
    assert_eq!(body["code"], 1);
    assert!(body["error"].as_str().unwrap().contains("invalid request body"));
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn test_engine_errors_are_invalid_request() {
    let request = json!({
        "token_symbol": "BTCB-1DE",
        "owner_pub_key": ALICE_PK,
        "owner_signature": ALICE_CLAIM_ZERO_SIG,
        "claim_address": DESTINATION,
    });
    let body = call(app(), post("/claim-approval", request.to_string())).await;
    assert_eq!(body["code"], 1);
    assert_eq!(body["error"], "proof not found");
}

#[tokio::test]
async fn test_unknown_route() {
    let response = app()
        .oneshot(Request::get("/claim").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
