//! TTS upstream client: `POST {piperBase}/synthesize`.

use reqwest::Client;
use sensecap_types::AiError;
use serde::Serialize;
use tracing::{debug, error, instrument};

use crate::TTS_TIMEOUT;

#[derive(Debug, Serialize)]
struct SynthesizeRequest<'a> {
    text: &'a str,
    format: &'static str,
}

/// Client for the text-to-speech upstream.
#[derive(Debug, Clone)]
pub struct TtsClient {
    http_client: Client,
    base_url: String,
}

impl TtsClient {
    pub fn new(http_client: Client, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
        }
    }

    /// Synthesizes `text` and returns the raw WAV bytes (header included).
    #[instrument(skip(self, text), fields(text_len = text.chars().count()))]
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>, AiError> {
        let url = format!("{}/synthesize", self.base_url.trim_end_matches('/'));
        debug!("requesting TTS synthesis");

        let response = self
            .http_client
            .post(&url)
            .timeout(TTS_TIMEOUT)
            .json(&SynthesizeRequest {
                text,
                format: "wav",
            })
            .send()
            .await
            .map_err(|e| AiError::RequestError(format!("TTS request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(%status, %body, "TTS upstream returned an error");
            return Err(AiError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AiError::ResponseParseError(format!("failed to read TTS audio: {e}")))?;

        Ok(bytes.to_vec())
    }
}
