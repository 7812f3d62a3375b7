//! Centralizes every "extract first matching token" heuristic applied to
//! short, lower-cased LLM replies: mode parsing, model-kind selection, and
//! vision-state cue matching. Kept in one place (per the design note on
//! string-based classification) so the fragile substring rules can be
//! tightened later without touching orchestrator logic.

use sensecap_types::{Mode, ModelKind};

/// Trims whitespace, strips one layer of surrounding single/double quotes,
/// and strips trailing `.,!?;:`. Idempotent.
pub fn normalize(input: &str) -> String {
    let trimmed = input.trim();
    let unquoted = strip_surrounding_quotes(trimmed).trim();
    unquoted
        .trim_end_matches(|c: char| ".,!?;:".contains(c))
        .to_string()
}

fn strip_surrounding_quotes(s: &str) -> &str {
    let mut chars = s.chars();
    match (chars.next(), chars.next_back()) {
        (Some('"'), Some('"')) | (Some('\''), Some('\'')) if s.chars().count() >= 2 => {
            &s['"'.len_utf8()..s.len() - '"'.len_utf8()]
        }
        _ => s,
    }
}

/// Mode classifier parse: the first of '1' or '2' to occur by string
/// position wins; neither present defaults to Chat.
pub fn parse_mode(response: &str) -> Mode {
    let pos_1 = response.find('1');
    let pos_2 = response.find('2');
    match (pos_1, pos_2) {
        (Some(p1), Some(p2)) if p1 < p2 => Mode::Task,
        (Some(_), Some(_)) => Mode::TaskAuto,
        (Some(_), None) => Mode::Task,
        (None, Some(_)) => Mode::TaskAuto,
        (None, None) => Mode::Chat,
    }
}

/// Model-kind selector parse: precedence order 2, 3, 0, else Person -- any
/// mention of 2/3/0 anywhere in the output overrides the default Person,
/// regardless of position.
pub fn parse_model_kind(response: &str) -> ModelKind {
    if response.contains('2') {
        ModelKind::Pet
    } else if response.contains('3') {
        ModelKind::Gesture
    } else if response.contains('0') {
        ModelKind::Cloud
    } else {
        ModelKind::Person
    }
}

const POSITIVE_CUES: [&str; 7] = [
    "yes",
    "there is",
    "i can see",
    "visible",
    "present",
    "wearing",
    "detected",
];
const NEGATIVE_CUES: [&str; 5] = ["no", "not", "cannot", "can't", "unable"];

/// Vision state computation. Recognize requests (`type=0`) always yield 0;
/// monitoring requests (`type=1`) yield 1 iff a positive cue is present and
/// no negative cue is present.
pub fn compute_vision_state(request_type: i32, analysis: &str) -> i32 {
    if request_type != 1 {
        return 0;
    }
    let lower = analysis.to_lowercase();
    let has_positive = POSITIVE_CUES.iter().any(|cue| lower.contains(cue));
    let has_negative = NEGATIVE_CUES.iter().any(|cue| lower.contains(cue));
    if has_positive && !has_negative {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_quotes_whitespace_and_trailing_punctuation() {
        assert_eq!(normalize(" \"Hello world.\" "), "Hello world");
    }

    #[test]
    fn normalize_is_idempotent() {
        let once = normalize(" \"Hello world.\" ");
        let twice = normalize(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn mode_parse_prefers_earliest_digit() {
        assert_eq!(parse_mode("answer is 1 not 2"), Mode::Task);
        assert_eq!(parse_mode("answer is 2 not 1"), Mode::TaskAuto);
        assert_eq!(parse_mode("no digits here"), Mode::Chat);
    }

    #[test]
    fn model_kind_precedence_overrides_default_person() {
        assert_eq!(parse_model_kind("1"), ModelKind::Person);
        assert_eq!(parse_model_kind("it's a 2"), ModelKind::Pet);
        assert_eq!(parse_model_kind("could be 1 or 3"), ModelKind::Gesture);
        assert_eq!(parse_model_kind("0 or 1"), ModelKind::Cloud);
        assert_eq!(parse_model_kind(""), ModelKind::Person);
    }

    #[test]
    fn vision_state_recognize_is_always_zero() {
        assert_eq!(compute_vision_state(0, "Yes, there is a person."), 0);
    }

    #[test]
    fn vision_state_monitoring_requires_positive_without_negative() {
        assert_eq!(
            compute_vision_state(1, "Yes, there is a person in the frame."),
            1
        );
        assert_eq!(compute_vision_state(1, "No person is visible."), 0);
        assert_eq!(compute_vision_state(1, "A quiet empty room."), 0);
    }
}
