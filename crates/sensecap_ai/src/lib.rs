//! Typed HTTP clients for the four external AI services this system calls:
//! STT, TTS, and the text/vision LLM. Each client wraps a shared
//! `reqwest::Client` and a base URL: one client struct per provider, a
//! `#[derive(Serialize)]` request struct, and a status-code branch between
//! `.bytes()`/`.json()` success and `AiError::ApiError` failure.

pub mod llm;
pub mod stt;
pub mod tts;

pub use llm::LlmClient;
pub use stt::SttClient;
pub use tts::TtsClient;

use std::time::Duration;

pub const STT_TIMEOUT: Duration = Duration::from_secs(30);
pub const LLM_TIMEOUT: Duration = Duration::from_secs(30);
pub const VLM_TIMEOUT: Duration = Duration::from_secs(120);
pub const TTS_TIMEOUT: Duration = Duration::from_secs(30);
