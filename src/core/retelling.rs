/// Retelling puzzle orchestrator: the player drags shuffled story
/// phrases back into their correct order and submits.
///
/// The live order is only ever permuted: tokens are never added or
/// removed while a puzzle is active. Every token carries both language
/// texts, so a language change re-renders the same order in place.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::core::language::LanguageView;
use crate::core::lock::LockHandle;
use crate::core::settings::Settings;
use crate::core::view::{Feedback, Point, PuzzleView};
use crate::schema::language::{Language, Localized};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PuzzleError {
    #[error("{primary} phrases but {secondary} English phrases")]
    LengthMismatch { primary: usize, secondary: usize },
    #[error("puzzle has no phrases")]
    Empty,
    #[error("phrases are not a reordering of the correct order")]
    NotAPermutation,
    #[error("no puzzle is active")]
    NotActive,
    #[error("no token in slot {0}")]
    NoSuchSlot(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PuzzleState {
    Idle,
    Active,
    /// Solved. The panel stays up until the close delay runs out.
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect,
}

/// Reported by [`RetellingOrchestrator::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PuzzleEvent {
    /// A solved puzzle closed and released the player.
    Completed,
}

pub struct RetellingOrchestrator {
    view: Box<dyn PuzzleView>,
    language: LanguageView,
    lock: LockHandle,
    rng: StdRng,
    title: String,
    instructions: String,
    success_message: String,
    failure_message: String,
    close_delay: f32,
    correct: Vec<Localized>,
    live: Vec<Localized>,
    drag_origin: Option<usize>,
    closing: Option<f32>,
    state: PuzzleState,
}

impl RetellingOrchestrator {
    pub fn new(
        view: Box<dyn PuzzleView>,
        language: LanguageView,
        lock: LockHandle,
        settings: &Settings,
    ) -> Self {
        let rng = match settings.shuffle_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            view,
            language,
            lock,
            rng,
            title: settings.puzzle_title.clone(),
            instructions: settings.puzzle_instructions.clone(),
            success_message: settings.success_message.clone(),
            failure_message: settings.failure_message.clone(),
            close_delay: settings.puzzle_close_delay,
            correct: Vec::new(),
            live: Vec::new(),
            drag_origin: None,
            closing: None,
            state: PuzzleState::Idle,
        }
    }

    pub fn state(&self) -> PuzzleState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == PuzzleState::Active
    }

    /// The correct order in `language`.
    pub fn correct_order(&self, language: Language) -> Vec<String> {
        texts(&self.correct, language)
    }

    /// The player's current order in `language`.
    pub fn live_order(&self, language: Language) -> Vec<String> {
        texts(&self.live, language)
    }

    /// Record the correct order. Once an order is set it is kept:
    /// returns `Ok(false)` without changes on later calls.
    pub fn set_correct_order(
        &mut self,
        phrases: &[String],
        secondary: Option<&[String]>,
    ) -> Result<bool, PuzzleError> {
        let pairs = pair_up(phrases, secondary)?;
        if !self.correct.is_empty() {
            tracing::debug!("correct order already set, keeping it");
            return Ok(false);
        }
        if pairs.is_empty() {
            tracing::error!("refusing empty correct order");
            return Err(PuzzleError::Empty);
        }
        self.correct = pairs;
        Ok(true)
    }

    /// Open the puzzle with `phrases` in the given (shuffled) order.
    /// If no correct order is set yet, the input order becomes it.
    pub fn show(
        &mut self,
        phrases: &[String],
        secondary: Option<&[String]>,
    ) -> Result<(), PuzzleError> {
        let mut tokens = pair_up(phrases, secondary)?;
        if tokens.is_empty() {
            tracing::error!("refusing to show a puzzle with no phrases");
            return Err(PuzzleError::Empty);
        }

        if self.correct.is_empty() {
            self.correct = tokens.clone();
        } else if !same_phrases(&self.correct, &tokens) {
            tracing::error!(
                expected = self.correct.len(),
                got = tokens.len(),
                "puzzle phrases do not match the correct order"
            );
            return Err(PuzzleError::NotAPermutation);
        }

        if secondary.is_none() {
            for token in tokens.iter_mut() {
                if let Some(known) = self.correct.iter().find(|c| c.spanish == token.spanish) {
                    token.english = known.english.clone();
                }
            }
        }

        self.live = tokens;
        self.drag_origin = None;
        self.closing = None;
        self.state = PuzzleState::Active;
        self.lock.acquire();

        self.view.set_visible(true);
        self.view.set_header(&self.title, &self.instructions);
        self.view.show_feedback(None);
        self.render();
        tracing::debug!(phrases = self.live.len(), "retelling puzzle shown");
        Ok(())
    }

    /// Randomly permute the displayed phrases.
    pub fn shuffle(&mut self) -> Result<(), PuzzleError> {
        self.require_active()?;
        self.live.shuffle(&mut self.rng);
        self.render();
        Ok(())
    }

    /// Remember where a token sat before it started moving.
    pub fn begin_drag(&mut self, slot: usize) -> Result<(), PuzzleError> {
        self.require_active()?;
        if slot >= self.live.len() {
            return Err(PuzzleError::NoSuchSlot(slot));
        }
        self.drag_origin = Some(slot);
        Ok(())
    }

    /// Drop the token from `slot` at `at`: it takes the place of the
    /// nearest other token on screen. Returns the token's new slot.
    pub fn drop_token(&mut self, slot: usize, at: Point) -> Result<usize, PuzzleError> {
        self.require_active()?;
        if slot >= self.live.len() {
            return Err(PuzzleError::NoSuchSlot(slot));
        }

        let origin = self.drag_origin.take().unwrap_or(slot);
        let positions = self.view.token_positions();
        let target = positions
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != slot && *i < self.live.len())
            .map(|(i, p)| (i, at.distance(*p)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map_or(origin, |(i, _)| i);

        self.move_token(slot, target)?;
        Ok(target.min(self.live.len() - 1))
    }

    /// Remove the token at `from` and insert it at `to`.
    pub fn move_token(&mut self, from: usize, to: usize) -> Result<(), PuzzleError> {
        self.require_active()?;
        if from >= self.live.len() {
            return Err(PuzzleError::NoSuchSlot(from));
        }
        let token = self.live.remove(from);
        let to = to.min(self.live.len());
        self.live.insert(to, token);
        self.render();
        Ok(())
    }

    /// Compare the live order with the correct order in the active
    /// language. A wrong answer leaves the puzzle open.
    pub fn submit(&mut self) -> Result<Verdict, PuzzleError> {
        self.require_active()?;
        let language = self.language.current();

        if self.live_order(language) == self.correct_order(language) {
            let feedback = Feedback {
                message: self.success_message.clone(),
                success: true,
            };
            self.view.show_feedback(Some(&feedback));
            self.state = PuzzleState::Ended;
            self.closing = Some(self.close_delay);
            tracing::info!("retelling puzzle solved");
            Ok(Verdict::Correct)
        } else {
            let feedback = Feedback {
                message: self.failure_message.clone(),
                success: false,
            };
            self.view.show_feedback(Some(&feedback));
            tracing::debug!("retelling puzzle submitted out of order");
            Ok(Verdict::Incorrect)
        }
    }

    /// Count down the close delay after a solve.
    pub fn tick(&mut self, delta_seconds: f32) -> Option<PuzzleEvent> {
        let remaining = self.closing.as_mut()?;
        *remaining -= delta_seconds;
        if *remaining > 0.0 {
            return None;
        }

        self.closing = None;
        self.live.clear();
        self.correct.clear();
        self.view.show_feedback(None);
        self.view.set_visible(false);
        self.lock.release();
        Some(PuzzleEvent::Completed)
    }

    /// Re-render the tokens in the active language, keeping their order.
    pub fn refresh_language(&mut self) {
        if self.state == PuzzleState::Active || self.closing.is_some() {
            self.render();
        }
    }

    fn render(&mut self) {
        let phrases = self.live_order(self.language.current());
        self.view.render_tokens(&phrases);
    }

    fn require_active(&self) -> Result<(), PuzzleError> {
        if self.state == PuzzleState::Active {
            Ok(())
        } else {
            tracing::warn!(state = ?self.state, "puzzle input while not active");
            Err(PuzzleError::NotActive)
        }
    }
}

fn texts(entries: &[Localized], language: Language) -> Vec<String> {
    entries.iter().map(|e| e.get(language).to_string()).collect()
}

/// Pair Spanish phrases with English ones by index.
fn pair_up(phrases: &[String], secondary: Option<&[String]>) -> Result<Vec<Localized>, PuzzleError> {
    match secondary {
        Some(english) if english.len() != phrases.len() => {
            tracing::error!(
                primary = phrases.len(),
                secondary = english.len(),
                "phrase lists differ in length"
            );
            Err(PuzzleError::LengthMismatch {
                primary: phrases.len(),
                secondary: english.len(),
            })
        }
        Some(english) => Ok(phrases
            .iter()
            .zip(english)
            .map(|(es, en)| Localized::new(es.as_str(), en.as_str()))
            .collect()),
        None => Ok(phrases.iter().map(|es| Localized::spanish(es.as_str())).collect()),
    }
}

/// True if both lists hold the same Spanish phrases, ignoring order.
fn same_phrases(a: &[Localized], b: &[Localized]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut counts: FxHashMap<&str, isize> = FxHashMap::default();
    for entry in a {
        *counts.entry(entry.spanish.as_str()).or_default() += 1;
    }
    for entry in b {
        *counts.entry(entry.spanish.as_str()).or_default() -= 1;
    }
    counts.values().all(|&n| n == 0)
}
