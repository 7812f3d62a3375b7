//! Vision Orchestrator: a single still image and an optional prompt
//! go to the vision LLM; the reply is reduced to a state flag and, for
//! monitoring requests with accompanying text, optionally spoken aloud.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::error::CoreError;
use crate::heuristics;
use crate::state::AppState;

const DEFAULT_PROMPT: &str = "what's in the picture?";

pub struct VisionRequest {
    /// Base64-encoded JPEG frame.
    pub img: String,
    pub prompt: Option<String>,
    /// Optional text to speak back to the device alongside the result.
    pub audio_txt: Option<String>,
    /// 0 = one-shot recognition, 1 = monitoring check against a trigger.
    pub request_type: i32,
}

pub struct VisionResult {
    pub state: i32,
    pub request_type: i32,
    /// Base64-encoded WAV reply, present only when `audio_txt` was given
    /// and synthesis succeeded.
    pub audio_base64: Option<String>,
}

/// Runs the vision pipeline. A vision-LLM failure is fatal; a TTS failure on
/// the optional spoken reply is not -- the caller still gets its state flag.
pub async fn run_vision_pipeline(
    state: &AppState,
    request: VisionRequest,
) -> Result<VisionResult, CoreError> {
    if request.img.trim().is_empty() {
        return Err(CoreError::BadRequest("img must not be empty".to_string()));
    }

    let prompt = request
        .prompt
        .as_deref()
        .filter(|p| !p.trim().is_empty())
        .unwrap_or(DEFAULT_PROMPT);

    let analysis = state
        .llm_client
        .generate_vision(prompt, &request.img)
        .await
        .map_err(CoreError::UpstreamVision)?;

    let vision_state = heuristics::compute_vision_state(request.request_type, &analysis);

    let audio_base64 = match request.audio_txt.as_deref() {
        Some(text) if !text.trim().is_empty() => match state.tts_client.synthesize(text).await {
            Ok(wav) => Some(BASE64.encode(wav)),
            Err(e) => {
                tracing::warn!(error = %e, "vision reply speech synthesis failed, continuing without audio");
                None
            }
        },
        _ => None,
    };

    Ok(VisionResult {
        state: vision_state,
        request_type: request.request_type,
        audio_base64,
    })
}
