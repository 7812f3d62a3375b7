//! Domain types shared across the workspace: task flows, notification events,
//! the voice session, and the application configuration shape.
//!
//! Kept in its own leaf crate (no dependency on any other workspace member)
//! so that the store, the AI clients, the orchestrators, and the HTTP
//! boundary all agree on one definition.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

/// Interaction mode detected for one voice session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    Chat = 0,
    Task = 1,
    TaskAuto = 2,
}

impl Mode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

/// On-device ML model selected to run continuous inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelKind {
    Cloud = 0,
    Person = 1,
    Pet = 2,
    Gesture = 3,
}

impl ModelKind {
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

/// A persisted automation for one device. At most one is active per device;
/// creating a new one supersedes all prior flows for that device.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskFlowRecord {
    pub id: Option<i64>,
    pub device_id: String,
    /// Original natural-language request, verbatim.
    pub name: String,
    /// Short summary, <=6 words.
    pub headline: String,
    /// Normalized trigger phrase.
    pub trigger: String,
    /// Target object class names, drawn from the fixed vocabulary.
    pub target_objects: Vec<String>,
    /// Action tags; currently only "notify" is produced.
    pub actions: Vec<String>,
    pub model_kind: ModelKind,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

/// One detection box: (x, y, width, height, confidence-percent, class-index).
pub type DetectionBox = (f64, f64, f64, f64, u8, i64);

/// One classification result: (confidence-percent, class-index).
pub type ClassificationItem = (u8, i64);

/// Polymorphic inference result attached to a notification event. The store
/// persists whichever shape was submitted as opaque JSON text; this type
/// exists so the rest of the crate can work with it typed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum InferencePayload {
    Detection {
        boxes: Vec<DetectionBox>,
        classes: HashMap<String, String>,
    },
    Classification {
        scores: Vec<ClassificationItem>,
        classes: HashMap<String, String>,
    },
}

/// Optional environmental readings attached to a notification event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SensorPayload {
    pub temperature: Option<f32>,
    pub humidity: Option<u32>,
    pub co2: Option<u32>,
}

/// An append-only alarm/notification row reported by a device.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationEventRecord {
    pub id: Option<i64>,
    pub request_id: String,
    pub device_id: String,
    pub event_timestamp_ms: i64,
    pub text: String,
    pub img: Option<String>,
    pub inference: Option<InferencePayload>,
    pub sensor: Option<SensorPayload>,
    pub received_at_ms: i64,
}

/// Transient per-request state for one voice interaction. Owned exclusively
/// by the Voice Orchestrator for the lifetime of one request.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub device_id: String,
    pub session_id: String,
    pub audio: Vec<u8>,
    pub mode: Option<Mode>,
    pub transcript: String,
    pub reply_text: String,
    pub audio_reply: Vec<u8>,
    pub duration_ms: u64,
}

/// Errors raised by the STT/TTS/LLM/VLM HTTP clients. Shared between
/// `sensecap_ai` (which produces it) and `sensecap_core` (which matches on
/// it to decide whether a failure is fatal or falls back to a default).
#[derive(Error, Debug, Clone)]
pub enum AiError {
    #[error("request error: {0}")]
    RequestError(String),
    #[error("upstream returned status {status}: {message}")]
    ApiError { status: u16, message: String },
    #[error("failed to parse upstream response: {0}")]
    ResponseParseError(String),
}

/// The full set of configuration values enumerated in the configuration
/// surface: one field per CLI flag / environment variable override.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub listen_port: u16,
    pub listen_host: String,
    pub bearer_token: Option<String>,
    pub db_path: PathBuf,
    pub stt_base_url: String,
    pub llm_base_url: String,
    pub llm_text_model: String,
    pub llm_vision_model: String,
    pub tts_base_url: String,
    pub api_schema: String,
    pub api_base_url: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            listen_port: 8080,
            listen_host: "0.0.0.0".to_string(),
            bearer_token: None,
            db_path: PathBuf::from("./sensecap.db"),
            stt_base_url: "http://127.0.0.1:9001".to_string(),
            llm_base_url: "http://127.0.0.1:11434".to_string(),
            llm_text_model: "llama3".to_string(),
            llm_vision_model: "llava".to_string(),
            tts_base_url: "http://127.0.0.1:9002".to_string(),
            api_schema: "http".to_string(),
            api_base_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inference_payload_detection_roundtrips() {
        let payload = InferencePayload::Detection {
            boxes: vec![(1.0, 2.0, 3.0, 4.0, 91, 0), (5.0, 6.0, 7.0, 8.0, 80, 14)],
            classes: HashMap::from([("0".to_string(), "person".to_string())]),
        };
        let text = serde_json::to_string(&payload).unwrap();
        let back: InferencePayload = serde_json::from_str(&text).unwrap();
        assert_eq!(payload, back);
    }

    #[test]
    fn inference_payload_classification_roundtrips() {
        let payload = InferencePayload::Classification {
            scores: vec![(77, 3)],
            classes: HashMap::from([("3".to_string(), "cat".to_string())]),
        };
        let text = serde_json::to_string(&payload).unwrap();
        let back: InferencePayload = serde_json::from_str(&text).unwrap();
        assert_eq!(payload, back);
    }

    #[test]
    fn model_kind_as_i32() {
        assert_eq!(ModelKind::Cloud.as_i32(), 0);
        assert_eq!(ModelKind::Person.as_i32(), 1);
        assert_eq!(ModelKind::Pet.as_i32(), 2);
        assert_eq!(ModelKind::Gesture.as_i32(), 3);
    }
}
