/// Authored content: dialogues, puzzles, fragments and thoughts loaded
/// from RON and looked up by name at runtime.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::dialogue::{Dialogue, DialogueId};
use super::fragment::Fragment;
use super::language::Localized;
use super::puzzle::RetellingPuzzle;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// A problem found by [`ContentLibrary::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentIssue {
    #[error("dialogue '{dialogue}' choice {choice} follows up with missing dialogue '{missing}'")]
    MissingFollowUp {
        dialogue: DialogueId,
        choice: usize,
        missing: DialogueId,
    },
    #[error("dialogue '{0}' has no lines and no choices")]
    EmptyDialogue(DialogueId),
    #[error("puzzle '{name}' has {phrases} phrases but {english} English phrases")]
    PuzzleLengthMismatch {
        name: String,
        phrases: usize,
        english: usize,
    },
    #[error("puzzle '{0}' has no phrases")]
    EmptyPuzzle(String),
    #[error("fragment '{0}' has no text")]
    EmptyFragment(String),
}

/// Every authored asset the interaction core can be asked to play.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentLibrary {
    #[serde(default)]
    pub dialogues: FxHashMap<DialogueId, Dialogue>,
    #[serde(default)]
    pub puzzles: FxHashMap<String, RetellingPuzzle>,
    #[serde(default)]
    pub fragments: FxHashMap<String, Fragment>,
    #[serde(default)]
    pub thoughts: FxHashMap<String, Vec<Localized>>,
}

impl ContentLibrary {
    /// Load a content library from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<ContentLibrary, ContentError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Load a RON file, or every `.ron` file under a directory tree.
    /// Files are merged in path order, so later files override earlier
    /// ones.
    pub fn load_from_path(path: &Path) -> Result<ContentLibrary, ContentError> {
        let mut library = ContentLibrary::default();
        if path.is_dir() {
            let mut files = Vec::new();
            collect_ron_files(path, &mut files)?;
            files.sort();
            for file in files {
                library.merge(Self::load_from_ron(&file)?);
            }
        } else {
            library.merge(Self::load_from_ron(path)?);
        }
        Ok(library)
    }

    /// Parse a content library from a RON string.
    pub fn parse_ron(input: &str) -> Result<ContentLibrary, ContentError> {
        Ok(ron::from_str(input)?)
    }

    /// Merge another library into this one. Entries from `other`
    /// override entries in `self` with the same name.
    pub fn merge(&mut self, other: ContentLibrary) {
        self.dialogues.extend(other.dialogues);
        self.puzzles.extend(other.puzzles);
        self.fragments.extend(other.fragments);
        self.thoughts.extend(other.thoughts);
    }

    pub fn dialogue(&self, id: &DialogueId) -> Option<&Dialogue> {
        self.dialogues.get(id)
    }

    pub fn puzzle(&self, name: &str) -> Option<&RetellingPuzzle> {
        self.puzzles.get(name)
    }

    pub fn fragment(&self, name: &str) -> Option<&Fragment> {
        self.fragments.get(name)
    }

    pub fn thought(&self, name: &str) -> Option<&[Localized]> {
        self.thoughts.get(name).map(Vec::as_slice)
    }

    /// Check cross-references and shapes. Issues are sorted so repeated
    /// runs report them in the same order.
    pub fn validate(&self) -> Vec<ContentIssue> {
        let mut issues = Vec::new();

        let mut dialogue_ids: Vec<&DialogueId> = self.dialogues.keys().collect();
        dialogue_ids.sort();
        for id in dialogue_ids {
            let dialogue = &self.dialogues[id];
            if dialogue.is_empty() {
                issues.push(ContentIssue::EmptyDialogue(id.clone()));
            }
            for (choice, c) in dialogue.choices.iter().enumerate() {
                if let Some(next) = &c.follow_up {
                    if !self.dialogues.contains_key(next) {
                        issues.push(ContentIssue::MissingFollowUp {
                            dialogue: id.clone(),
                            choice,
                            missing: next.clone(),
                        });
                    }
                }
            }
        }

        let mut puzzle_names: Vec<&String> = self.puzzles.keys().collect();
        puzzle_names.sort();
        for name in puzzle_names {
            let puzzle = &self.puzzles[name];
            if puzzle.phrases.is_empty() {
                issues.push(ContentIssue::EmptyPuzzle(name.clone()));
            } else if !puzzle.is_well_formed() {
                issues.push(ContentIssue::PuzzleLengthMismatch {
                    name: name.clone(),
                    phrases: puzzle.phrases.len(),
                    english: puzzle.english.len(),
                });
            }
        }

        let mut fragment_names: Vec<&String> = self.fragments.keys().collect();
        fragment_names.sort();
        for name in fragment_names {
            if self.fragments[name].is_empty() {
                issues.push(ContentIssue::EmptyFragment(name.clone()));
            }
        }

        issues
    }
}

fn collect_ron_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), ContentError> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_ron_files(&path, files)?;
        } else if path.extension().and_then(|s| s.to_str()) == Some("ron") {
            files.push(path);
        }
    }
    Ok(())
}
