// ./src/http/mod.rs
//! JSON-over-HTTP transport for the approval engine.

pub mod types;

use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{Method, Request};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::de::DeserializeOwned;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info_span, warn, Span};
use uuid::Uuid;

pub use types::{Envelope, ResponseCode};

use crate::approval::{
    ApprovalService, ClaimApprovalRequest, ClaimApprovalResponse, RegisterTokenApprovalRequest,
    RegisterTokenApprovalResponse,
};
use crate::error::ApprovalError;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ApprovalService>,
}

pub fn router(service: Arc<ApprovalService>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/ping", get(ping))
        .route("/claim-approval", post(claim_approval))
        .route("/register-token-approval", post(register_token_approval))
        .with_state(AppState { service })
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
            info_span!(
                "request",
                request_id = %Uuid::new_v4(),
                method = %req.method(),
                uri = %req.uri(),
            )
        }))
}

async fn ping() -> Json<Envelope<&'static str>> { Json(Envelope::ok("pong")) }

async fn claim_approval(
    State(state): State<AppState>,
    body: Bytes,
) -> Json<Envelope<ClaimApprovalResponse>> {
    Json(
        run::<ClaimApprovalRequest, _, _>(&body, move |req| {
            state.service.get_claim_approval(&req)
        })
        .await,
    )
}

async fn register_token_approval(
    State(state): State<AppState>,
    body: Bytes,
) -> Json<Envelope<RegisterTokenApprovalResponse>> {
    Json(
        run::<RegisterTokenApprovalRequest, _, _>(&body, move |req| {
            state.service.get_register_token_approval(&req)
        })
        .await,
    )
}

/// Decodes `body` and runs `handler` on the blocking pool inside the request span.
async fn run<Req, Resp, F>(body: &[u8], handler: F) -> Envelope<Resp>
where
    Req: DeserializeOwned + Send + 'static,
    Resp: Send + 'static,
    F: FnOnce(Req) -> Result<Resp, ApprovalError> + Send + 'static,
{
    let req: Req = match serde_json::from_slice(body) {
        Ok(req) => req,
        Err(e) => {
            let err = ApprovalError::BadRequest(format!("invalid request body: {e}"));
            warn!(kind = err.kind(), error = %err, "request rejected");
            return Envelope::invalid(err);
        }
    };

    let span = Span::current();
    match tokio::task::spawn_blocking(move || span.in_scope(|| handler(req))).await {
        Ok(Ok(resp)) => Envelope::ok(resp),
        Ok(Err(err)) => {
            warn!(kind = err.kind(), error = %err, "request rejected");
            Envelope::invalid(err)
        }
        Err(e) => {
            warn!(error = %e, "approval worker failed");
            Envelope::invalid(format!("internal error: {e}"))
        }
    }
}
