//! Boundary middleware: request logging, device-id validation (warn,
//! never reject), and bearer-token validation with exact equality and no
//! scheme prefix.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use sensecap_core::AppState;

pub const DEVICE_ID_HEADER: &str = "API-OBITER-DEVICE-EUI";

pub async fn request_logger(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let response = next.run(request).await;
    info!(%method, %uri, status = %response.status(), "handled request");
    response
}

/// Warns on a missing or wrong-length device-id header; never rejects.
pub async fn device_id_validator(request: Request<Body>, next: Next) -> Response {
    match request.headers().get(DEVICE_ID_HEADER).and_then(|v| v.to_str().ok()) {
        Some(id) if id.len() == 16 => {}
        Some(id) => warn!(device_id = %id, "device-id header is not 16 hex characters"),
        None => warn!("request is missing the device-id header"),
    }
    next.run(request).await
}

/// Rejects with `{"code":401}` when a token is configured and the
/// `Authorization` header does not equal it exactly (no scheme prefix).
pub async fn token_validator(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let Some(expected) = state.config.bearer_token.as_deref() else {
        return next.run(request).await;
    };

    let provided = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    if provided == Some(expected) {
        next.run(request).await
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({ "code": 401 }))).into_response()
    }
}
