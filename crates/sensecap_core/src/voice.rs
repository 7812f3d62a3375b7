//! Voice Interaction Orchestrator: speech in, speech out. Runs STT,
//! classifies the interaction mode, branches into a chat reply or a
//! compiled task flow, then synthesizes the spoken reply and computes its
//! duration for the response framing.

use crate::error::CoreError;
use crate::heuristics;
use crate::prompts;
use crate::state::AppState;
use crate::taskflow;
use sensecap_types::Mode;

/// Everything the boundary needs to assemble the framed multipart response.
pub struct VoiceResult {
    pub mode: Mode,
    pub transcript: String,
    pub reply_text: String,
    pub audio_reply: Vec<u8>,
    pub duration_ms: u64,
}

/// Runs the full pipeline. Only STT and TTS failures are fatal; mode
/// classification and the task-compilation sub-calls are each individually
/// non-fatal and fall back to their documented defaults.
pub async fn run_voice_pipeline(
    state: &AppState,
    audio: &[u8],
    device_id: &str,
) -> Result<VoiceResult, CoreError> {
    let transcript = state
        .stt_client
        .transcribe(audio)
        .await
        .map_err(CoreError::UpstreamTranscription)?;

    let mode = classify_mode(state, &transcript).await;

    let reply_text = match mode {
        Mode::Chat => generate_chat_reply(state, &transcript).await,
        Mode::Task | Mode::TaskAuto => taskflow::compile(state, &transcript, device_id).await?,
    };

    let audio_reply = state
        .tts_client
        .synthesize(&reply_text)
        .await
        .map_err(CoreError::UpstreamSynthesis)?;

    let duration_ms = wav_duration_ms(audio_reply.len());

    Ok(VoiceResult {
        mode,
        transcript,
        reply_text,
        audio_reply,
        duration_ms,
    })
}

async fn classify_mode(state: &AppState, transcript: &str) -> Mode {
    match state
        .llm_client
        .generate_text(&prompts::mode_classifier_prompt(transcript))
        .await
    {
        Ok(raw) => heuristics::parse_mode(&raw),
        Err(e) => {
            tracing::warn!(error = %e, "mode classification failed, defaulting to Chat");
            Mode::Chat
        }
    }
}

async fn generate_chat_reply(state: &AppState, transcript: &str) -> String {
    match state
        .llm_client
        .generate_text(&prompts::chat_prompt(transcript))
        .await
    {
        Ok(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                "I'm not sure how to respond to that.".to_string()
            } else {
                trimmed.to_string()
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "chat reply generation failed");
            "I'm not sure how to respond to that.".to_string()
        }
    }
}

/// 16-bit mono PCM at 16 kHz: duration is `(byte_len - 44) * 1000 / 32000`,
/// truncated, never negative. `32000` is `sample_rate * bytes_per_sample *
/// channels` (16000 * 2 * 1).
pub fn wav_duration_ms(byte_len: usize) -> u64 {
    if byte_len <= 44 {
        return 0;
    }
    (((byte_len - 44) as u64) * 1000) / 32000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_reply_trim_keeps_trailing_punctuation() {
        // The chat branch must not reuse `heuristics::normalize`, which would
        // strip the trailing period and shift the framed Content-Length.
        let raw = "  Hi there.  ";
        assert_eq!(raw.trim(), "Hi there.");
    }

    #[test]
    fn wav_duration_handles_header_only_and_empty() {
        assert_eq!(wav_duration_ms(0), 0);
        assert_eq!(wav_duration_ms(44), 0);
    }

    #[test]
    fn wav_duration_computes_one_second_of_audio() {
        // One second of 16kHz 16-bit mono PCM: 32000 bytes plus the header.
        assert_eq!(wav_duration_ms(44 + 32_000), 1000);
    }

    #[test]
    fn wav_duration_truncates_rather_than_rounds() {
        assert_eq!(wav_duration_ms(44 + 31_999), 999);
    }
}
