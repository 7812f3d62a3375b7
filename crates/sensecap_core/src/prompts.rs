//! Prompt builders for every LLM call the orchestrators make. Kept
//! as plain string templates, one function per prompt, so the wording can be
//! tuned without hunting through orchestrator control flow.

use crate::vocabulary::TARGET_CLASS_VOCABULARY;

/// Classifies a transcript into Chat (0), Task (1), or TaskAuto (2).
pub fn mode_classifier_prompt(transcript: &str) -> String {
    format!(
        "You are classifying a voice command into exactly one of three modes: \
         0 = Chat (casual conversation, answering a question, no monitoring \
         involved), 1 = Task (create a new monitoring task), 2 = TaskAuto \
         (adjust or replace an existing monitoring task). Respond with a \
         single digit only: 0, 1, or 2. Do not explain your answer.\n\
         Transcript: \"{transcript}\""
    )
}

/// Produces a short conversational reply for Chat-mode transcripts.
pub fn chat_prompt(transcript: &str) -> String {
    format!(
        "You are \"watcher\", a helpful home-monitoring voice assistant \
         running on a local camera device. Reply to the user's message in \
         one or two sentences. Do not discuss topics unrelated to home \
         monitoring and everyday conversation.\n\
         User said: \"{transcript}\""
    )
}

/// Extracts the core monitoring trigger from a Task/TaskAuto transcript.
pub fn trigger_extractor_prompt(transcript: &str) -> String {
    format!(
        "Extract the core monitoring trigger from this request. Remove any \
         mention of time, place, interval, or the action to take once \
         triggered -- keep only what should be watched for. Respond with \
         five words or fewer, no punctuation, no explanation.\n\
         Request: \"{transcript}\""
    )
}

/// Matches a trigger phrase to exactly one class in the fixed vocabulary.
pub fn word_matcher_prompt(trigger: &str) -> String {
    format!(
        "Given the trigger phrase \"{trigger}\", choose exactly one word \
         from this list that best describes the object or subject being \
         watched for: {}. Respond with exactly one word copied verbatim \
         from the list, nothing else.",
        TARGET_CLASS_VOCABULARY.join(", ")
    )
}

/// Selects the on-device model kind for a matched class word.
pub fn model_selector_prompt(class_word: &str) -> String {
    format!(
        "The monitored subject is \"{class_word}\". Choose which on-device \
         detection model applies: 1 = Person, 2 = Pet, 3 = Gesture, 0 = \
         Cloud (anything else, including objects and vehicles). Respond \
         with a single digit: 0, 1, 2, or 3."
    )
}

/// Summarizes a Task/TaskAuto transcript into a short headline.
pub fn headline_prompt(transcript: &str) -> String {
    format!(
        "Summarize this monitoring request as a short title of six words \
         or fewer. No punctuation beyond what the title needs.\n\
         Request: \"{transcript}\""
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_classifier_prompt_names_all_three_digits() {
        let prompt = mode_classifier_prompt("turn off the lights");
        assert!(prompt.contains("0 = Chat"));
        assert!(prompt.contains("1 = Task"));
        assert!(prompt.contains("2 = TaskAuto"));
        assert!(prompt.contains("turn off the lights"));
    }

    #[test]
    fn word_matcher_prompt_includes_full_vocabulary() {
        let prompt = word_matcher_prompt("someone at the door");
        assert!(prompt.contains("person"));
        assert!(prompt.contains("toothbrush"));
    }

    #[test]
    fn model_selector_prompt_names_all_four_digits() {
        let prompt = model_selector_prompt("dog");
        assert!(prompt.contains("1 = Person"));
        assert!(prompt.contains("2 = Pet"));
        assert!(prompt.contains("3 = Gesture"));
        assert!(prompt.contains("0 = Cloud"));
    }
}
