use sensecap_ai::{LlmClient, SttClient, TtsClient};
use sensecap_types::AppConfig;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Shared application state accessible across handlers. Holds the
/// configuration, the store pool, and the three upstream AI clients -- no
/// other shared mutable state is permitted.
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db_pool: SqlitePool,
    pub stt_client: SttClient,
    pub tts_client: TtsClient,
    pub llm_client: LlmClient,
}

impl AppState {
    pub fn new(
        config: Arc<AppConfig>,
        db_pool: SqlitePool,
        stt_client: SttClient,
        tts_client: TtsClient,
        llm_client: LlmClient,
    ) -> Self {
        Self {
            config,
            db_pool,
            stt_client,
            tts_client,
            llm_client,
        }
    }
}
