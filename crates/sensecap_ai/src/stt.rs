//! STT upstream client: `POST {whisperBase}/transcribe`.

use reqwest::Client;
use sensecap_types::AiError;
use serde::Deserialize;
use tracing::{debug, error, instrument};

use crate::STT_TIMEOUT;

#[derive(Debug, Deserialize)]
struct TranscribeResponse {
    text: String,
    #[allow(dead_code)]
    #[serde(default)]
    language: String,
}

/// Client for the speech-to-text upstream.
#[derive(Debug, Clone)]
pub struct SttClient {
    http_client: Client,
    base_url: String,
}

impl SttClient {
    pub fn new(http_client: Client, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
        }
    }

    /// Submits raw captured audio bytes (forwarded verbatim, including any
    /// trailing padding) and returns the transcript text.
    #[instrument(skip(self, audio), fields(audio_len = audio.len()))]
    pub async fn transcribe(&self, audio: &[u8]) -> Result<String, AiError> {
        let url = format!("{}/transcribe", self.base_url.trim_end_matches('/'));
        debug!("submitting audio to STT upstream");

        let response = self
            .http_client
            .post(&url)
            .timeout(STT_TIMEOUT)
            .header("Content-Type", "application/octet-stream")
            .body(audio.to_vec())
            .send()
            .await
            .map_err(|e| AiError::RequestError(format!("STT request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(%status, %body, "STT upstream returned an error");
            return Err(AiError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let parsed: TranscribeResponse = response
            .json()
            .await
            .map_err(|e| AiError::ResponseParseError(format!("invalid STT response: {e}")))?;

        Ok(parsed.text)
    }
}
