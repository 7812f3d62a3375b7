//! Wire-level request/response shapes for the device-facing endpoints.
//! Field names and casing follow the literal JSON the device firmware
//! sends and expects, not Rust naming conventions.

use sensecap_types::{InferencePayload, SensorPayload};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

#[derive(Debug, Deserialize)]
pub struct NotificationEventRequest {
    #[serde(rename = "requestId")]
    pub request_id: String,
    #[serde(rename = "deviceEui")]
    pub device_eui: String,
    #[serde(default)]
    pub events: NotificationEventBody,
}

#[derive(Debug, Deserialize, Default)]
pub struct NotificationEventBody {
    pub timestamp: Option<i64>,
    pub text: Option<String>,
    pub img: Option<String>,
    pub data: Option<NotificationEventData>,
}

#[derive(Debug, Deserialize, Default)]
pub struct NotificationEventData {
    pub inference: Option<InferencePayload>,
    pub sensor: Option<SensorPayload>,
}

#[derive(Debug, Serialize)]
pub struct CodeResponse {
    pub code: u16,
}

#[derive(Debug, Deserialize)]
pub struct VisionRequestBody {
    pub img: String,
    pub prompt: Option<String>,
    pub audio_txt: Option<String>,
    #[serde(rename = "type")]
    pub request_type: i32,
}

#[derive(Debug, Serialize)]
pub struct VisionResponseEnvelope {
    pub code: u16,
    pub data: VisionResponseData,
}

#[derive(Debug, Serialize)]
pub struct VisionResponseData {
    pub state: i32,
    #[serde(rename = "type")]
    pub request_type: i32,
    pub audio: Option<String>,
    pub img: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TaskDetailResponse {
    pub code: u16,
    pub data: TaskDetailData,
}

#[derive(Debug, Serialize)]
pub struct TaskDetailData {
    pub tl: JsonValue,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

#[derive(Debug, Serialize)]
pub struct NotFoundResponse {
    pub error: &'static str,
    pub path: String,
    pub method: String,
}

/// JSON header prefixing the framed voice response.
#[derive(Debug, Serialize)]
pub struct VoiceResponseHeader {
    pub code: u16,
    pub data: VoiceResponseData,
}

#[derive(Debug, Serialize)]
pub struct VoiceResponseData {
    pub mode: i32,
    pub duration: u64,
    pub stt_result: String,
    pub screen_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_event_request_reads_camel_case_fields() {
        let body = r#"{
            "requestId": "req-1",
            "deviceEui": "2CF7F1C04430000C",
            "events": { "timestamp": 1700000000000, "text": "motion detected" }
        }"#;
        let parsed: NotificationEventRequest = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.request_id, "req-1");
        assert_eq!(parsed.device_eui, "2CF7F1C04430000C");
        assert_eq!(parsed.events.text.as_deref(), Some("motion detected"));
    }

    #[test]
    fn notification_event_request_tolerates_a_missing_events_object() {
        let body = r#"{"requestId": "req-2", "deviceEui": "2CF7F1C04430000C"}"#;
        let parsed: NotificationEventRequest = serde_json::from_str(body).unwrap();
        assert!(parsed.events.text.is_none());
        assert!(parsed.events.data.is_none());
    }

    #[test]
    fn vision_request_body_reads_type_field() {
        let body = r#"{"img": "base64...", "type": 1}"#;
        let parsed: VisionRequestBody = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.request_type, 1);
        assert!(parsed.prompt.is_none());
    }

    #[test]
    fn vision_response_data_writes_type_field() {
        let data = VisionResponseData {
            state: 2,
            request_type: 1,
            audio: None,
            img: None,
        };
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["type"], 1);
        assert!(json.get("request_type").is_none());
    }
}
