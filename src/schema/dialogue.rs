use serde::{Deserialize, Serialize};
use std::fmt;

use super::language::{Language, Localized};

/// Newtype wrapper for dialogue asset names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DialogueId(pub String);

impl DialogueId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DialogueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DialogueId {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

/// A single spoken line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueLine {
    pub speaker: String,
    pub text: Localized,
    /// Portrait asset name, resolved by the view.
    #[serde(default)]
    pub portrait: Option<String>,
}

impl DialogueLine {
    pub fn new(speaker: impl Into<String>, spanish: &str, english: &str) -> Self {
        Self {
            speaker: speaker.into(),
            text: Localized::new(spanish, english),
            portrait: None,
        }
    }
}

/// A branch offered once every line of a dialogue has been shown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueChoice {
    pub label: Localized,
    /// Dialogue started when this choice is picked. The referenced
    /// dialogue is a separate asset in the library.
    #[serde(default)]
    pub follow_up: Option<DialogueId>,
    /// Vocabulary word associated with the choice. Carried for the
    /// host; orchestration ignores it.
    #[serde(default)]
    pub special_word: Option<String>,
}

impl DialogueChoice {
    pub fn new(spanish: &str, english: &str, follow_up: Option<&str>) -> Self {
        Self {
            label: Localized::new(spanish, english),
            follow_up: follow_up.map(DialogueId::from),
            special_word: None,
        }
    }

    pub fn label(&self, language: Language) -> &str {
        self.label.get(language)
    }
}

/// An authored conversation: lines played in order, then choices.
/// No choices means the conversation ends after its last line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dialogue {
    #[serde(default)]
    pub lines: Vec<DialogueLine>,
    #[serde(default)]
    pub choices: Vec<DialogueChoice>,
}

impl Dialogue {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.choices.is_empty()
    }

    /// Follow-up dialogues referenced by this dialogue's choices.
    pub fn follow_ups(&self) -> impl Iterator<Item = &DialogueId> {
        self.choices.iter().filter_map(|c| c.follow_up.as_ref())
    }
}
