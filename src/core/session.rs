/// The interaction hub: one shared language setting, one interaction
/// lock, the journal, and every orchestrator, driven by input events
/// and host ticks.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::mpsc::Receiver;
use thiserror::Error;

use crate::core::dialogue::{DialogueError, DialogueOrchestrator, DialogueState};
use crate::core::fragment::FragmentDisplay;
use crate::core::journal::{Direction, Inventory, Journal};
use crate::core::language::{LanguageSetting, LanguageToggle};
use crate::core::lock::{InteractionLock, LockHandle, LockView, Locomotion, Subsystem};
use crate::core::retelling::{PuzzleError, PuzzleEvent, RetellingOrchestrator, Verdict};
use crate::core::settings::{ConfigError, Settings};
use crate::core::thought::{ThoughtBubble, ThoughtError};
use crate::core::view::{
    DialogueView, FragmentView, InventoryView, LanguageButton, Point, PuzzleView, ThoughtView,
};
use crate::schema::content::ContentLibrary;
use crate::schema::dialogue::DialogueId;
use crate::schema::language::Language;

#[derive(Debug, Error)]
pub enum InteractionError {
    #[error("dialogue error: {0}")]
    Dialogue(#[from] DialogueError),
    #[error("puzzle error: {0}")]
    Puzzle(#[from] PuzzleError),
    #[error("thought error: {0}")]
    Thought(#[from] ThoughtError),
    #[error("no {kind} named '{name}'")]
    UnknownContent { kind: &'static str, name: String },
}

/// Discrete player input, decoupled from keys and clicks.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Space or primary click: finish typing, or continue.
    Advance,
    ToggleLanguage,
    SelectChoice(usize),
    BeginDrag(usize),
    DropToken { slot: usize, at: Point },
    Shuffle,
    Submit,
    ConfirmFragment,
    ToggleInventory,
    Navigate(Direction),
}

pub struct Interactions {
    library: Rc<ContentLibrary>,
    toggle: LanguageToggle,
    lock: InteractionLock,
    journal: Journal,
    dialogue: DialogueOrchestrator,
    retelling: RetellingOrchestrator,
    fragments: FragmentDisplay,
    inventory: Inventory,
    thoughts: ThoughtBubble,
    language_button: Box<dyn LanguageButton>,
    rng: StdRng,
}

/// Builder for constructing `Interactions`. Every view and the player
/// locomotion handle must be supplied.
#[derive(Default)]
pub struct InteractionsBuilder {
    settings: Option<Settings>,
    settings_path: Option<PathBuf>,
    library: Option<ContentLibrary>,
    content_paths: Vec<PathBuf>,
    locomotion: Option<Box<dyn Locomotion>>,
    dialogue_view: Option<Box<dyn DialogueView>>,
    puzzle_view: Option<Box<dyn PuzzleView>>,
    fragment_view: Option<Box<dyn FragmentView>>,
    inventory_view: Option<Box<dyn InventoryView>>,
    thought_view: Option<Box<dyn ThoughtView>>,
    language_button: Option<Box<dyn LanguageButton>>,
}

impl Interactions {
    pub fn builder() -> InteractionsBuilder {
        InteractionsBuilder::default()
    }

    pub fn language(&self) -> Language {
        self.toggle.current()
    }

    pub fn lock_view(&self) -> LockView {
        self.lock.view()
    }

    pub fn dialogue_active(&self) -> bool {
        self.lock.view().dialogue_active()
    }

    pub fn fragment_active(&self) -> bool {
        self.lock.view().fragment_active()
    }

    pub fn retelling_active(&self) -> bool {
        self.lock.view().retelling_active()
    }

    pub fn dialogue(&self) -> &DialogueOrchestrator {
        &self.dialogue
    }

    pub fn retelling(&self) -> &RetellingOrchestrator {
        &self.retelling
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    pub fn library(&self) -> &ContentLibrary {
        &self.library
    }

    /// Record a fragment collected outside the fragment panel.
    pub fn add_fragment(&mut self, spanish: &str, english: &str) -> bool {
        let added = self.journal.add_fragment(spanish, english);
        self.inventory.render(&self.journal);
        added
    }

    /// Record a completed puzzle.
    pub fn add_puzzle(&mut self) {
        self.journal.add_puzzle();
        self.inventory.render(&self.journal);
    }

    pub fn trigger_dialogue(&mut self, id: &DialogueId) -> Result<DialogueState, InteractionError> {
        let state = self.dialogue.start(id)?;
        self.sync_language_button();
        Ok(state)
    }

    pub fn trigger_fragment(&mut self, name: &str) -> Result<bool, InteractionError> {
        let fragment = self
            .library
            .fragment(name)
            .ok_or_else(|| unknown("fragment", name))?;
        let shown = self.fragments.show(fragment.text());
        self.sync_language_button();
        Ok(shown)
    }

    /// Open the named puzzle with its phrases shuffled.
    pub fn trigger_puzzle(&mut self, name: &str) -> Result<(), InteractionError> {
        let puzzle = self
            .library
            .puzzle(name)
            .ok_or_else(|| unknown("puzzle", name))?;

        self.retelling
            .set_correct_order(&puzzle.phrases, puzzle.secondary())?;
        let (phrases, english) = puzzle.shuffled(&mut self.rng);
        self.retelling.show(&phrases, english.as_deref())?;
        self.sync_language_button();
        Ok(())
    }

    pub fn trigger_thought(&mut self, name: &str) -> Result<(), InteractionError> {
        let thoughts = self
            .library
            .thought(name)
            .ok_or_else(|| unknown("thought", name))?;
        self.thoughts.start(thoughts)?;
        self.sync_language_button();
        Ok(())
    }

    /// Apply one input event.
    pub fn handle(&mut self, event: InputEvent) -> Result<(), InteractionError> {
        let result = self.dispatch(event);
        self.sync_language_button();
        result
    }

    /// Drain every pending event from `events`. Returns how many were
    /// handled. Refused events have already been logged.
    pub fn pump(&mut self, events: &Receiver<InputEvent>) -> usize {
        let mut handled = 0;
        while let Ok(event) = events.try_recv() {
            if let Err(err) = self.handle(event) {
                tracing::debug!(%err, "input event refused");
            }
            handled += 1;
        }
        handled
    }

    /// Advance time by `delta_seconds`.
    pub fn tick(&mut self, delta_seconds: f32) {
        self.dialogue.tick(delta_seconds);
        self.thoughts.tick(delta_seconds);
        if let Some(PuzzleEvent::Completed) = self.retelling.tick(delta_seconds) {
            self.journal.add_puzzle();
            self.inventory.render(&self.journal);
            self.sync_language_button();
        }
    }

    fn dispatch(&mut self, event: InputEvent) -> Result<(), InteractionError> {
        match event {
            InputEvent::Advance => {
                if self.dialogue.is_active() {
                    self.dialogue.advance();
                } else if self.thoughts.is_active() {
                    self.thoughts.advance();
                }
            }
            InputEvent::ToggleLanguage => self.toggle_language(),
            InputEvent::SelectChoice(index) => {
                self.dialogue.select_choice(index)?;
            }
            InputEvent::BeginDrag(slot) => self.retelling.begin_drag(slot)?,
            InputEvent::DropToken { slot, at } => {
                self.retelling.drop_token(slot, at)?;
            }
            InputEvent::Shuffle => self.retelling.shuffle()?,
            InputEvent::Submit => {
                if self.retelling.submit()? == Verdict::Correct {
                    tracing::debug!("puzzle solved, closing after delay");
                }
            }
            InputEvent::ConfirmFragment => {
                if let Some(fragment) = self.fragments.confirm() {
                    self.journal
                        .add_fragment(&fragment.spanish, &fragment.english);
                    self.inventory.render(&self.journal);
                }
            }
            InputEvent::ToggleInventory => self.inventory.toggle(&self.journal),
            InputEvent::Navigate(direction) => {
                if self.inventory.is_open() {
                    self.inventory.navigate(&mut self.journal, direction);
                }
            }
        }
        Ok(())
    }

    fn toggle_language(&mut self) {
        self.toggle.toggle();
        self.dialogue.refresh_language();
        self.retelling.refresh_language();
        self.fragments.refresh_language();
        self.thoughts.refresh_language();
        self.inventory.render(&self.journal);
    }

    /// The language button is up whenever any interaction is.
    fn sync_language_button(&mut self) {
        self.language_button
            .set_visible(self.lock.view().any_active());
        self.language_button
            .set_label(self.toggle.current().toggle_label());
    }
}

fn unknown(kind: &'static str, name: &str) -> InteractionError {
    tracing::error!(kind, name, "trigger references missing content");
    InteractionError::UnknownContent {
        kind,
        name: name.to_string(),
    }
}

impl InteractionsBuilder {
    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn settings_file(mut self, path: impl AsRef<Path>) -> Self {
        self.settings_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Provide content directly (for testing without files).
    pub fn with_library(mut self, library: ContentLibrary) -> Self {
        self.library = Some(library);
        self
    }

    /// Load content from a RON file or every `.ron` file under a
    /// directory, subdirectories included. Later paths override earlier
    /// ones.
    pub fn content_path(mut self, path: impl AsRef<Path>) -> Self {
        self.content_paths.push(path.as_ref().to_path_buf());
        self
    }

    pub fn locomotion(mut self, locomotion: Box<dyn Locomotion>) -> Self {
        self.locomotion = Some(locomotion);
        self
    }

    pub fn dialogue_view(mut self, view: Box<dyn DialogueView>) -> Self {
        self.dialogue_view = Some(view);
        self
    }

    pub fn puzzle_view(mut self, view: Box<dyn PuzzleView>) -> Self {
        self.puzzle_view = Some(view);
        self
    }

    pub fn fragment_view(mut self, view: Box<dyn FragmentView>) -> Self {
        self.fragment_view = Some(view);
        self
    }

    pub fn inventory_view(mut self, view: Box<dyn InventoryView>) -> Self {
        self.inventory_view = Some(view);
        self
    }

    pub fn thought_view(mut self, view: Box<dyn ThoughtView>) -> Self {
        self.thought_view = Some(view);
        self
    }

    pub fn language_button(mut self, button: Box<dyn LanguageButton>) -> Self {
        self.language_button = Some(button);
        self
    }

    pub fn build(self) -> Result<Interactions, ConfigError> {
        let locomotion = required(self.locomotion, "player locomotion")?;
        let dialogue_view = required(self.dialogue_view, "dialogue view")?;
        let puzzle_view = required(self.puzzle_view, "puzzle view")?;
        let fragment_view = required(self.fragment_view, "fragment view")?;
        let inventory_view = required(self.inventory_view, "inventory view")?;
        let thought_view = required(self.thought_view, "thought view")?;
        let mut language_button = required(self.language_button, "language button")?;

        let settings = match (self.settings, &self.settings_path) {
            (Some(settings), _) => settings,
            (None, Some(path)) => Settings::load_from_ron(path)?,
            (None, None) => Settings::default(),
        };

        let mut library = self.library.unwrap_or_default();
        for path in &self.content_paths {
            library.merge(ContentLibrary::load_from_path(path)?);
        }
        for issue in library.validate() {
            tracing::warn!(%issue, "content issue");
        }
        let library = Rc::new(library);

        let (toggle, language) = LanguageSetting::new(settings.initial_language);
        let lock = InteractionLock::new(locomotion);

        let dialogue = DialogueOrchestrator::new(
            Rc::clone(&library),
            dialogue_view,
            language.clone(),
            take_handle(&lock, Subsystem::Dialogue)?,
            settings.typing_delay,
        );
        let retelling = RetellingOrchestrator::new(
            puzzle_view,
            language.clone(),
            take_handle(&lock, Subsystem::Retelling)?,
            &settings,
        );
        let fragments = FragmentDisplay::new(
            fragment_view,
            language.clone(),
            take_handle(&lock, Subsystem::Fragment)?,
            &settings.fragment_title,
            &settings.fragment_button,
        );
        let inventory = Inventory::new(
            inventory_view,
            language.clone(),
            take_handle(&lock, Subsystem::Inventory)?,
        );
        let thoughts = ThoughtBubble::new(
            thought_view,
            language,
            take_handle(&lock, Subsystem::Thought)?,
            settings.typing_delay,
        );

        language_button.set_visible(false);
        language_button.set_label(settings.initial_language.toggle_label());

        let rng = match settings.shuffle_seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
            None => StdRng::from_entropy(),
        };

        tracing::info!(
            dialogues = library.dialogues.len(),
            puzzles = library.puzzles.len(),
            fragments = library.fragments.len(),
            "interactions ready"
        );

        Ok(Interactions {
            library,
            toggle,
            lock,
            journal: Journal::new(settings.total_fragments, settings.total_puzzles),
            dialogue,
            retelling,
            fragments,
            inventory,
            thoughts,
            language_button,
            rng,
        })
    }
}

fn take_handle(lock: &InteractionLock, subsystem: Subsystem) -> Result<LockHandle, ConfigError> {
    lock.handle(subsystem).ok_or(ConfigError::HandleTaken(subsystem))
}

fn required<T>(value: Option<T>, name: &'static str) -> Result<T, ConfigError> {
    value.ok_or_else(|| {
        tracing::error!(collaborator = name, "collaborator not supplied");
        ConfigError::MissingCollaborator(name)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::{
        RecordingDialogueView, RecordingFragmentView, RecordingInventoryView,
        RecordingLanguageButton, RecordingLocomotion, RecordingPuzzleView, RecordingThoughtView,
    };

    #[test]
    fn build_without_views_is_misconfiguration() {
        let err = Interactions::builder()
            .locomotion(Box::new(RecordingLocomotion::default()))
            .build()
            .err()
            .unwrap();
        assert!(matches!(
            err,
            ConfigError::MissingCollaborator("dialogue view")
        ));
    }

    #[test]
    fn build_without_locomotion_is_misconfiguration() {
        let err = Interactions::builder().build().err().unwrap();
        assert!(matches!(
            err,
            ConfigError::MissingCollaborator("player locomotion")
        ));
    }

    #[test]
    fn build_with_missing_content_file_fails() {
        let err = Interactions::builder()
            .locomotion(Box::new(RecordingLocomotion::default()))
            .dialogue_view(Box::new(RecordingDialogueView::default()))
            .puzzle_view(Box::new(RecordingPuzzleView::default()))
            .fragment_view(Box::new(RecordingFragmentView::default()))
            .inventory_view(Box::new(RecordingInventoryView::default()))
            .thought_view(Box::new(RecordingThoughtView::default()))
            .language_button(Box::new(RecordingLanguageButton::default()))
            .content_path("tests/fixtures/missing.ron")
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, ConfigError::Content(_)));
    }

    #[test]
    fn build_with_all_collaborators() {
        let button = RecordingLanguageButton::default();
        let interactions = Interactions::builder()
            .settings(Settings {
                initial_language: Language::English,
                ..Settings::default()
            })
            .locomotion(Box::new(RecordingLocomotion::default()))
            .dialogue_view(Box::new(RecordingDialogueView::default()))
            .puzzle_view(Box::new(RecordingPuzzleView::default()))
            .fragment_view(Box::new(RecordingFragmentView::default()))
            .inventory_view(Box::new(RecordingInventoryView::default()))
            .thought_view(Box::new(RecordingThoughtView::default()))
            .language_button(Box::new(button.clone()))
            .build()
            .unwrap();

        assert_eq!(interactions.language(), Language::English);
        assert!(!interactions.lock_view().any_active());
        assert_eq!(button.state().label, "Change to Spanish");
        assert!(!button.state().visible);
    }
}
