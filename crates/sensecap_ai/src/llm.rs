//! Text and vision LLM upstream client: `POST {ollamaBase}/api/generate`.
//! The text and vision models share one endpoint and differ only in the
//! configured model name and the presence of an `images` field.

use reqwest::Client;
use sensecap_types::AiError;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use crate::{LLM_TIMEOUT, VLM_TIMEOUT};

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    images: Option<Vec<&'a str>>,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Client for the text LLM and vision LLM upstream.
#[derive(Debug, Clone)]
pub struct LlmClient {
    http_client: Client,
    base_url: String,
    text_model: String,
    vision_model: String,
}

impl LlmClient {
    pub fn new(
        http_client: Client,
        base_url: impl Into<String>,
        text_model: impl Into<String>,
        vision_model: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
            text_model: text_model.into(),
            vision_model: vision_model.into(),
        }
    }

    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        images: Option<Vec<&str>>,
        timeout: std::time::Duration,
    ) -> Result<String, AiError> {
        let url = format!("{}/api/generate", self.base_url.trim_end_matches('/'));
        debug!(%model, "submitting prompt to LLM upstream");

        let response = self
            .http_client
            .post(&url)
            .timeout(timeout)
            .json(&GenerateRequest {
                model,
                prompt,
                images,
                stream: false,
            })
            .send()
            .await
            .map_err(|e| AiError::RequestError(format!("LLM request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(%status, %body, "LLM upstream returned an error");
            return Err(AiError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AiError::ResponseParseError(format!("invalid LLM response: {e}")))?;

        Ok(parsed.response)
    }

    /// Text-only completion using the configured text model.
    #[instrument(skip(self, prompt))]
    pub async fn generate_text(&self, prompt: &str) -> Result<String, AiError> {
        self.generate(&self.text_model.clone(), prompt, None, LLM_TIMEOUT).await
    }

    /// Vision completion: `prompt` plus a single base64 JPEG image, using
    /// the configured vision model.
    #[instrument(skip(self, prompt, image_base64_jpeg))]
    pub async fn generate_vision(
        &self,
        prompt: &str,
        image_base64_jpeg: &str,
    ) -> Result<String, AiError> {
        self.generate(
            &self.vision_model.clone(),
            prompt,
            Some(vec![image_base64_jpeg]),
            VLM_TIMEOUT,
        )
        .await
    }
}
