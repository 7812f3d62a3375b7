//! Notification/Event ingest. Always succeeds from the device's
//! perspective: a store failure is logged and swallowed rather than
//! surfaced, since the device has no retry path for this endpoint.

use crate::state::AppState;
use sensecap_types::{InferencePayload, NotificationEventRecord, SensorPayload};

pub struct IngestRequest {
    pub request_id: String,
    pub device_id: String,
    /// Missing or null becomes 0.
    pub event_timestamp_ms: Option<i64>,
    /// Missing or null becomes an empty string.
    pub text: Option<String>,
    pub img: Option<String>,
    pub inference: Option<InferencePayload>,
    pub sensor: Option<SensorPayload>,
}

pub async fn ingest(state: &AppState, request: IngestRequest) {
    let device_id = request.device_id.clone();
    let record = NotificationEventRecord {
        id: None,
        request_id: request.request_id,
        device_id: request.device_id,
        event_timestamp_ms: request.event_timestamp_ms.unwrap_or(0),
        text: request.text.unwrap_or_default(),
        img: request.img,
        inference: request.inference,
        sensor: request.sensor,
        received_at_ms: 0,
    };

    if let Err(e) = sensecap_db::save_notification_event(&state.db_pool, record).await {
        tracing::warn!(%device_id, error = %e, "failed to persist notification event");
    }
}
