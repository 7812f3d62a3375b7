use sensecap_db::DbError;
use sensecap_types::AiError;
use thiserror::Error;

/// Top-level orchestrator error. The boundary (`sensecap_api::ApiError`)
/// maps each variant to the status codes in the error handling design.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("transcription failed: {0}")]
    UpstreamTranscription(#[source] AiError),

    #[error("speech synthesis failed: {0}")]
    UpstreamSynthesis(#[source] AiError),

    #[error("vision analysis failed: {0}")]
    UpstreamVision(#[source] AiError),

    #[error("language model request failed: {0}")]
    UpstreamLlm(#[source] AiError),

    #[error("store error: {0}")]
    Store(#[from] DbError),
}
