//! Axum handlers for the gateway routes.

use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::http::server::AppState;
use crate::observability::metrics;
use crate::proxy::{AnalysisRequest, ProxyError, SubscriptionRequest};

/// `POST /api/analyze`
pub async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Response {
    let start = Instant::now();
    // An unreadable body is treated the same as a missing field.
    let input = payload.ok().and_then(|Json(body)| body.input);

    let response = match state.analysis.analyze(input.as_deref()).await {
        Ok(reply) => reply.into_response(),
        Err(e) => e.into_response(),
    };

    metrics::record_request("analyze", response.status().as_u16(), start);
    response
}

/// `POST /api/subscribe`
pub async fn subscribe(
    State(state): State<AppState>,
    payload: Result<Json<SubscriptionRequest>, JsonRejection>,
) -> Response {
    let start = Instant::now();
    let email = payload.ok().and_then(|Json(body)| body.email);

    let response = match state.subscription.subscribe(email.as_deref()).await {
        Ok(receipt) => receipt.into_response(),
        Err(e) => e.into_response(),
    };

    metrics::record_request("subscribe", response.status().as_u16(), start);
    response
}

/// Any method other than POST on a proxy route.
pub async fn method_not_allowed(route: &'static str) -> Response {
    let start = Instant::now();
    let response = ProxyError::MethodNotAllowed.into_response();
    metrics::record_request(route, response.status().as_u16(), start);
    response
}

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
