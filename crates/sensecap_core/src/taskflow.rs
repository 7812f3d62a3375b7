//! Task-Flow Compiler: turns a Task/TaskAuto transcript into a
//! persisted automation and a reified device task-flow graph.

use crate::error::CoreError;
use crate::heuristics;
use crate::prompts;
use crate::state::AppState;
use crate::vocabulary::is_known_class;
use sensecap_types::{ModelKind, TaskFlowRecord};
use serde_json::{json, Value as JsonValue};

/// Runs the six-stage compilation pipeline and persists the result,
/// superseding any prior flow for the device. Every LLM sub-call is
/// non-fatal: failures fall back to the documented default for that stage.
/// Returns the spoken confirmation sentence.
pub async fn compile(state: &AppState, transcript: &str, device_id: &str) -> Result<String, CoreError> {
    let trigger = extract_trigger(state, transcript).await;
    let target_class = match_target_class(state, &trigger).await;
    let model_kind = select_model_kind(state, &target_class).await;
    let headline = build_headline(state, transcript).await;

    if let Err(e) = sensecap_db::delete_task_flows_by_device(&state.db_pool, device_id).await {
        tracing::warn!(%device_id, error = %e, "failed to clear prior task flows before supersession");
    }

    let record = TaskFlowRecord {
        id: None,
        device_id: device_id.to_string(),
        name: transcript.to_string(),
        headline: headline.clone(),
        trigger: trigger.clone(),
        target_objects: vec![target_class],
        actions: vec!["notify".to_string()],
        model_kind,
        created_at_ms: 0,
        updated_at_ms: 0,
    };

    if let Err(e) = sensecap_db::save_task_flow(&state.db_pool, record).await {
        tracing::warn!(%device_id, error = %e, "failed to persist new task flow");
    }

    Ok(format!(
        "I've created a monitoring task: {headline}. I'll watch for {trigger}."
    ))
}

async fn extract_trigger(state: &AppState, transcript: &str) -> String {
    let raw = state
        .llm_client
        .generate_text(&prompts::trigger_extractor_prompt(transcript))
        .await
        .unwrap_or_default();
    heuristics::normalize(&raw)
}

async fn match_target_class(state: &AppState, trigger: &str) -> String {
    let raw = state
        .llm_client
        .generate_text(&prompts::word_matcher_prompt(trigger))
        .await
        .unwrap_or_default();
    let candidate = heuristics::normalize(&raw).to_lowercase();
    if is_known_class(&candidate) {
        candidate
    } else {
        "person".to_string()
    }
}

async fn select_model_kind(state: &AppState, target_class: &str) -> ModelKind {
    let raw = state
        .llm_client
        .generate_text(&prompts::model_selector_prompt(target_class))
        .await
        .unwrap_or_default();
    heuristics::parse_model_kind(&raw)
}

async fn build_headline(state: &AppState, transcript: &str) -> String {
    match state
        .llm_client
        .generate_text(&prompts::headline_prompt(transcript))
        .await
    {
        Ok(raw) => {
            let normalized = heuristics::normalize(&raw);
            if normalized.is_empty() {
                "Task created".to_string()
            } else {
                normalized
            }
        }
        Err(_) => "Task created".to_string(),
    }
}

/// Looks up the active task flow for a device and reifies it into the
/// device-facing graph shape, or `{}` if none exists.
pub async fn task_detail(state: &AppState, device_id: &str) -> Result<JsonValue, CoreError> {
    let flows = sensecap_db::get_task_flows_by_device(&state.db_pool, device_id).await?;
    Ok(match flows.into_iter().next() {
        Some(flow) => reify(&flow),
        None => json!({}),
    })
}

/// Reifies one task flow into the fixed four-node automation graph: an `ai
/// camera` node feeding an `image analyzer` node, which fans out to a
/// `local alarm` node and a `sensecraft alarm` node.
fn reify(flow: &TaskFlowRecord) -> JsonValue {
    let primary_class = flow.target_objects.first().cloned().unwrap_or_default();

    json!({
        "type": 0,
        "tlid": flow.id,
        "ctd": flow.created_at_ms,
        "tn": flow.headline,
        "task_flow": [
            {
                "node_id": 1,
                "kind": "ai camera",
                "wires": [2],
                "modes": 0,
                "model_type": flow.model_kind.as_i32(),
                "conditions": [
                    { "class": primary_class, "mode": 1, "type": 2, "num": 0 }
                ],
                "conditions_combo": 0,
                "silent_period": { "silence_duration": 5 },
                "output_type": 1,
                "shutter": 0
            },
            {
                "node_id": 2,
                "kind": "image analyzer",
                "wires": [3, 4],
                "body": {
                    "prompt": flow.trigger,
                    "type": 1,
                    "audio_txt": ""
                }
            },
            {
                "node_id": 3,
                "kind": "local alarm",
                "wires": [],
                "sound": 1,
                "rgb": 1,
                "img": 0,
                "text": 0,
                "duration": 5
            },
            {
                "node_id": 4,
                "kind": "sensecraft alarm",
                "wires": [],
                "silence_duration": 30
            }
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_flow() -> TaskFlowRecord {
        TaskFlowRecord {
            id: Some(7),
            device_id: "2CF7F1C04430000C".to_string(),
            name: "watch for the dog on the porch".to_string(),
            headline: "Watch for dog".to_string(),
            trigger: "dog on the porch".to_string(),
            target_objects: vec!["dog".to_string()],
            actions: vec!["notify".to_string()],
            model_kind: ModelKind::Pet,
            created_at_ms: 1_700_000_000_000,
            updated_at_ms: 1_700_000_000_000,
        }
    }

    #[test]
    fn reify_produces_the_four_fixed_nodes() {
        let graph = reify(&sample_flow());
        let nodes = graph["task_flow"].as_array().unwrap();
        assert_eq!(nodes.len(), 4);
        assert_eq!(nodes[0]["kind"], "ai camera");
        assert_eq!(nodes[1]["kind"], "image analyzer");
        assert_eq!(nodes[2]["kind"], "local alarm");
        assert_eq!(nodes[3]["kind"], "sensecraft alarm");
        assert_eq!(nodes[0]["wires"], json!([2]));
        assert_eq!(nodes[1]["wires"], json!([3, 4]));
        assert_eq!(graph["tlid"], 7);
        assert_eq!(graph["tn"], "Watch for dog");
    }

    #[test]
    fn reify_carries_model_kind_and_trigger_into_nodes() {
        let graph = reify(&sample_flow());
        assert_eq!(graph["task_flow"][0]["model_type"], ModelKind::Pet.as_i32());
        assert_eq!(graph["task_flow"][1]["body"]["prompt"], "dog on the porch");
    }
}
