/// Tunables for the interaction core, loaded from RON.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::core::lock::Subsystem;
use crate::core::typewriter::DEFAULT_CHAR_DELAY;
use crate::schema::content::ContentError;
use crate::schema::language::Language;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("content error: {0}")]
    Content(#[from] ContentError),
    #[error("missing collaborator: {0}")]
    MissingCollaborator(&'static str),
    #[error("lock handle for {0:?} was already issued")]
    HandleTaken(Subsystem),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seconds per revealed character.
    pub typing_delay: f32,
    /// Seconds between a solved puzzle and the panel closing.
    pub puzzle_close_delay: f32,
    pub total_fragments: usize,
    pub total_puzzles: usize,
    pub initial_language: Language,
    /// Fixed seed for puzzle shuffles. Entropy-seeded when absent.
    pub shuffle_seed: Option<u64>,
    pub puzzle_title: String,
    pub puzzle_instructions: String,
    pub success_message: String,
    pub failure_message: String,
    pub fragment_title: String,
    pub fragment_button: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            typing_delay: DEFAULT_CHAR_DELAY,
            puzzle_close_delay: 2.0,
            total_fragments: 4,
            total_puzzles: 3,
            initial_language: Language::Spanish,
            shuffle_seed: None,
            puzzle_title: "Rebuild the story".to_string(),
            puzzle_instructions: "Drag the phrases into the correct order:".to_string(),
            success_message: "¡Perfecto! You've rebuilt the story correctly.".to_string(),
            failure_message: "Not quite right. Try again!".to_string(),
            fragment_title: "Story Fragment Unlocked!".to_string(),
            fragment_button: "Add to Journal".to_string(),
        }
    }
}

impl Settings {
    pub fn load_from_ron(path: &Path) -> Result<Settings, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    pub fn parse_ron(input: &str) -> Result<Settings, ConfigError> {
        Ok(ron::from_str(input)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_ron_gives_defaults() {
        let settings = Settings::parse_ron("()").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.total_fragments, 4);
        assert_eq!(settings.initial_language, Language::Spanish);
    }

    #[test]
    fn partial_ron_overrides_fields() {
        let settings = Settings::parse_ron(
            r#"(typing_delay: 0.05, initial_language: English, shuffle_seed: Some(9))"#,
        )
        .unwrap();
        assert_eq!(settings.typing_delay, 0.05);
        assert_eq!(settings.initial_language, Language::English);
        assert_eq!(settings.shuffle_seed, Some(9));
        assert_eq!(settings.total_puzzles, 3);
    }

    #[test]
    fn malformed_ron_is_an_error() {
        assert!(matches!(
            Settings::parse_ron("(typing_delay: \"fast\")"),
            Err(ConfigError::Ron(_))
        ));
    }
}
