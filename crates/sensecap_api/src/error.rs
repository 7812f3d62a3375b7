//! Boundary error type: every `CoreError` and validation failure funnels
//! through here on its way to an HTTP response, mapped onto the status
//! codes in the error handling design.

use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use sensecap_core::CoreError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("upstream transcription failed: {0}")]
    UpstreamTranscription(String),

    #[error("upstream speech synthesis failed: {0}")]
    UpstreamSynthesis(String),

    #[error("upstream vision analysis failed: {0}")]
    UpstreamVision(String),

    #[error("upstream language model request failed: {0}")]
    UpstreamLlm(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<CoreError> for ApiError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::BadRequest(msg) => ApiError::BadRequest(msg),
            CoreError::UpstreamTranscription(e) => ApiError::UpstreamTranscription(e.to_string()),
            CoreError::UpstreamSynthesis(e) => ApiError::UpstreamSynthesis(e.to_string()),
            CoreError::UpstreamVision(e) => ApiError::UpstreamVision(e.to_string()),
            CoreError::UpstreamLlm(e) => ApiError::UpstreamLlm(e.to_string()),
            // A store read failure (e.g. fetching task flows for a device)
            // is distinct from the write-path failures this system already
            // swallows at the point they occur; it has no fallback value to
            // return, so it surfaces.
            CoreError::Store(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::UpstreamTranscription(msg)
            | ApiError::UpstreamSynthesis(msg)
            | ApiError::UpstreamVision(msg)
            | ApiError::UpstreamLlm(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self, "request failed");
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_request_maps_to_400() {
        let response = ApiError::BadRequest("missing img".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn upstream_failures_map_to_500() {
        for err in [
            ApiError::UpstreamTranscription("x".to_string()),
            ApiError::UpstreamSynthesis("x".to_string()),
            ApiError::UpstreamVision("x".to_string()),
            ApiError::UpstreamLlm("x".to_string()),
            ApiError::Internal("x".to_string()),
        ] {
            assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn core_store_error_maps_to_internal() {
        let core_err = CoreError::Store(sensecap_db::DbError::InvalidData("bad row".to_string()));
        let api_err: ApiError = core_err.into();
        assert!(matches!(api_err, ApiError::Internal(_)));
    }
}
