//! Backend-supplied option maps for choice-bound inputs.
//!
//! # Responsibility
//! - Carry the task type, rating type, participant label and experiment title
//!   maps that the hosting page passes next to the document.
//! - Answer membership checks for select-style inputs.
//!
//! # Invariants
//! - Maps are ordered by key so option lists render deterministically.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Choice key to display label.
pub type ChoiceMap = BTreeMap<String, String>;

const BUILTIN_TASK_TYPES: &[(&str, &str)] = &[
    ("cloze", "Cloze test"),
    ("digit-span", "Digit span"),
    ("lexical-decision", "Lexical decision"),
    ("n-back", "n-back"),
    ("picture-naming", "Picture-naming"),
    ("question-answering", "Question answering"),
    ("reaction-time", "Reaction time"),
    ("reading", "Reading"),
    ("simon-game", "Simon game"),
    ("trail-making", "Trail making"),
];

const BUILTIN_RATING_TYPES: &[(&str, &str)] = &[
    ("emoticon", "Emoticons (right-positive)"),
    ("emoticon-reversed", "Emoticons (left-positive)"),
    ("radio", "Radio buttons"),
    ("radio-vertical", "Radio buttons (vertical)"),
    ("slider", "Slider"),
];

/// Option maps accompanying one experiment document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormOptions {
    #[serde(default)]
    pub task_type_choices: ChoiceMap,
    #[serde(default)]
    pub rating_type_choices: ChoiceMap,
    /// Participant id to display label. Defines which assignment lists exist.
    #[serde(default)]
    pub participant_labels: ChoiceMap,
    /// Experiment id to title, for the requirements list.
    #[serde(default)]
    pub experiment_titles: ChoiceMap,
}

impl FormOptions {
    /// Options with the known task and rating types and no participants.
    pub fn with_builtin_choices() -> Self {
        Self {
            task_type_choices: to_choice_map(BUILTIN_TASK_TYPES),
            rating_type_choices: to_choice_map(BUILTIN_RATING_TYPES),
            participant_labels: ChoiceMap::new(),
            experiment_titles: ChoiceMap::new(),
        }
    }

    /// Parses the option maps from the backend's JSON payload.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Adds or relabels one participant.
    pub fn with_participant(mut self, id: impl Into<String>, label: impl Into<String>) -> Self {
        self.participant_labels.insert(id.into(), label.into());
        self
    }

    pub fn is_task_type(&self, key: &str) -> bool {
        self.task_type_choices.contains_key(key)
    }

    pub fn is_rating_type(&self, key: &str) -> bool {
        self.rating_type_choices.contains_key(key)
    }

    pub fn is_participant(&self, id: &str) -> bool {
        self.participant_labels.contains_key(id)
    }
}

fn to_choice_map(entries: &[(&str, &str)]) -> ChoiceMap {
    entries
        .iter()
        .map(|(key, label)| ((*key).to_string(), (*label).to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::FormOptions;

    #[test]
    fn builtin_choices_include_default_rating_type() {
        let options = FormOptions::with_builtin_choices();
        assert!(options.is_rating_type("emoticon"));
        assert!(options.is_task_type("reaction-time"));
        assert!(!options.is_task_type("unknown"));
    }

    #[test]
    fn from_json_accepts_partial_payload() {
        let options = FormOptions::from_json(
            r#"{"participant_labels": {"p-1": "first"}, "rating_type_choices": {"slider": "Slider"}}"#,
        )
        .expect("partial payload should parse");
        assert!(options.is_participant("p-1"));
        assert!(options.is_rating_type("slider"));
        assert!(options.task_type_choices.is_empty());
    }
}
