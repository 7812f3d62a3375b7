//! Device-facing endpoint handlers.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use sensecap_core::{events, taskflow, vision, voice};
use std::sync::Arc;
use tracing::warn;

use crate::error::ApiError;
use crate::middleware::DEVICE_ID_HEADER;
use crate::models::{
    CodeResponse, HealthResponse, NotFoundResponse, NotificationEventRequest, TaskDetailData,
    TaskDetailResponse, VisionRequestBody, VisionResponseData, VisionResponseEnvelope,
    VoiceResponseData, VoiceResponseHeader,
};

type ApiResult<T> = Result<T, ApiError>;

fn device_id_from_headers(headers: &HeaderMap) -> String {
    headers
        .get(DEVICE_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "sensecap-local-server",
    })
}

pub async fn not_found_handler(method: Method, uri: Uri, _headers: HeaderMap, body: Bytes) -> Response {
    warn!(%method, %uri, body_len = body.len(), "unmatched route");
    (
        StatusCode::NOT_FOUND,
        Json(NotFoundResponse {
            error: "not found",
            path: uri.path().to_string(),
            method: method.to_string(),
        }),
    )
        .into_response()
}

pub async fn notification_event_handler(
    State(state): State<Arc<sensecap_core::AppState>>,
    Json(payload): Json<NotificationEventRequest>,
) -> Json<CodeResponse> {
    events::ingest(
        &state,
        events::IngestRequest {
            request_id: payload.request_id,
            device_id: payload.device_eui,
            event_timestamp_ms: payload.events.timestamp,
            text: payload.events.text,
            img: payload.events.img,
            inference: payload.events.data.as_ref().and_then(|d| d.inference.clone()),
            sensor: payload.events.data.and_then(|d| d.sensor),
        },
    )
    .await;

    Json(CodeResponse { code: 200 })
}

pub async fn vision_handler(
    State(state): State<Arc<sensecap_core::AppState>>,
    Json(payload): Json<VisionRequestBody>,
) -> ApiResult<Json<VisionResponseEnvelope>> {
    let result = vision::run_vision_pipeline(
        &state,
        vision::VisionRequest {
            img: payload.img,
            prompt: payload.prompt,
            audio_txt: payload.audio_txt,
            request_type: payload.request_type,
        },
    )
    .await?;

    Ok(Json(VisionResponseEnvelope {
        code: 200,
        data: VisionResponseData {
            state: result.state,
            request_type: result.request_type,
            audio: result.audio_base64,
            img: None,
        },
    }))
}

pub async fn audio_stream_handler(
    State(state): State<Arc<sensecap_core::AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Response> {
    let device_id = device_id_from_headers(&headers);

    let result = voice::run_voice_pipeline(&state, &body, &device_id).await?;

    let json_header = serde_json::to_vec(&VoiceResponseHeader {
        code: 200,
        data: VoiceResponseData {
            mode: result.mode.as_i32(),
            duration: result.duration_ms,
            stt_result: result.transcript,
            screen_text: result.reply_text,
        },
    })
    .map_err(|e| ApiError::Internal(format!("failed to serialize voice response header: {e}")))?;

    let body = frame_voice_response(&json_header, &result.audio_reply);

    // Content-Length is set automatically by the server from the body's
    // fixed byte length; the framing contract only requires it be exact,
    // which a concrete Vec<u8> body guarantees.
    Ok((StatusCode::OK, [(header::CONTENT_TYPE, "application/octet-stream")], body).into_response())
}

const VOICE_RESPONSE_BOUNDARY: &[u8] = b"---sensecraftboundary---\n";

/// Concatenates the JSON header, the fixed boundary literal, and the raw
/// WAV bytes into one framed body.
fn frame_voice_response(json_header: &[u8], audio_reply: &[u8]) -> Vec<u8> {
    let mut body =
        Vec::with_capacity(json_header.len() + VOICE_RESPONSE_BOUNDARY.len() + audio_reply.len());
    body.extend_from_slice(json_header);
    body.extend_from_slice(VOICE_RESPONSE_BOUNDARY);
    body.extend_from_slice(audio_reply);
    body
}

pub async fn view_task_detail_handler(
    State(state): State<Arc<sensecap_core::AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<TaskDetailResponse>> {
    let device_id = device_id_from_headers(&headers);
    let tl = taskflow::task_detail(&state, &device_id).await?;
    Ok(Json(TaskDetailResponse {
        code: 200,
        data: TaskDetailData { tl },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn device_id_from_headers_reads_the_device_eui_header() {
        let mut headers = HeaderMap::new();
        headers.insert(DEVICE_ID_HEADER, HeaderValue::from_static("2CF7F1C04430000C"));
        assert_eq!(device_id_from_headers(&headers), "2CF7F1C04430000C");
    }

    #[test]
    fn device_id_from_headers_defaults_to_empty_when_absent() {
        let headers = HeaderMap::new();
        assert_eq!(device_id_from_headers(&headers), "");
    }

    #[test]
    fn frame_voice_response_concatenates_header_boundary_and_audio_exactly() {
        let header = br#"{"code":200}"#;
        let audio = b"RIFF....WAVEfmt ";
        let framed = frame_voice_response(header, audio);

        assert_eq!(
            framed.len(),
            header.len() + VOICE_RESPONSE_BOUNDARY.len() + audio.len()
        );
        assert!(framed.starts_with(header));
        assert_eq!(
            &framed[header.len()..header.len() + VOICE_RESPONSE_BOUNDARY.len()],
            VOICE_RESPONSE_BOUNDARY
        );
        assert!(framed.ends_with(audio));
    }

    #[test]
    fn frame_voice_response_handles_empty_audio() {
        let header = br#"{"code":200}"#;
        let framed = frame_voice_response(header, &[]);
        assert_eq!(framed, [header, VOICE_RESPONSE_BOUNDARY].concat());
    }
}
