/// Dialogue orchestrator: plays a dialogue line by line, then offers
/// its choices and follows the picked branch.
///
/// ```text
/// Idle ──start──▶ PresentingLine ──advance──▶ LineComplete
///                      ▲   │tick done             │advance
///                      │   └──────────────────────┤
///                      └──── next line ◀──────────┤
///                 PresentingChoices ◀── choices ──┤
///                      │select                    │
///                      └──▶ (follow-up start) │ Ended ◀── no choices
/// ```

use std::collections::VecDeque;
use std::rc::Rc;
use thiserror::Error;

use crate::core::language::LanguageView;
use crate::core::lock::LockHandle;
use crate::core::typewriter::{Reveal, Typewriter};
use crate::core::view::{ChoiceButton, DialogueView};
use crate::schema::content::ContentLibrary;
use crate::schema::dialogue::{Dialogue, DialogueId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DialogueError {
    #[error("no dialogue named '{0}'")]
    UnknownDialogue(DialogueId),
    #[error("choice {0} is not on offer")]
    InvalidChoice(usize),
    #[error("no choices are being presented")]
    NotPresentingChoices,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueState {
    Idle,
    PresentingLine,
    /// The line is fully shown and the continue indicator is up.
    LineComplete,
    PresentingChoices,
    Ended,
}

impl DialogueState {
    pub fn is_active(self) -> bool {
        !matches!(self, Self::Idle | Self::Ended)
    }
}

/// Per-start state, rebuilt on every `start`.
#[derive(Debug)]
struct Session {
    id: DialogueId,
    dialogue: Dialogue,
    remaining: VecDeque<usize>,
    current_line: Option<usize>,
    /// Authored indices of the choices currently rendered.
    offered: Vec<usize>,
}

pub struct DialogueOrchestrator {
    library: Rc<ContentLibrary>,
    view: Box<dyn DialogueView>,
    language: LanguageView,
    lock: LockHandle,
    typewriter: Typewriter,
    state: DialogueState,
    session: Option<Session>,
}

impl DialogueOrchestrator {
    pub fn new(
        library: Rc<ContentLibrary>,
        view: Box<dyn DialogueView>,
        language: LanguageView,
        lock: LockHandle,
        typing_delay: f32,
    ) -> Self {
        Self {
            library,
            view,
            language,
            lock,
            typewriter: Typewriter::new(typing_delay),
            state: DialogueState::Idle,
            session: None,
        }
    }

    pub fn state(&self) -> DialogueState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Name of the dialogue being played, if any.
    pub fn current_dialogue(&self) -> Option<&DialogueId> {
        self.session.as_ref().map(|s| &s.id)
    }

    /// Lines not yet shown in the current dialogue.
    pub fn remaining_lines(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.remaining.len())
    }

    /// Start (or restart) playing the named dialogue from its first line.
    pub fn start(&mut self, id: &DialogueId) -> Result<DialogueState, DialogueError> {
        let Some(dialogue) = self.library.dialogue(id) else {
            tracing::error!(dialogue = %id, "cannot start unknown dialogue");
            return Err(DialogueError::UnknownDialogue(id.clone()));
        };

        tracing::debug!(
            dialogue = %id,
            lines = dialogue.lines.len(),
            choices = dialogue.choices.len(),
            "starting dialogue"
        );

        self.session = Some(Session {
            id: id.clone(),
            dialogue: dialogue.clone(),
            remaining: (0..dialogue.lines.len()).collect(),
            current_line: None,
            offered: Vec::new(),
        });
        self.lock.acquire();
        self.view.set_visible(true);
        self.view.clear_choices();
        self.view.set_continue_indicator(false);

        self.next_step();
        Ok(self.state)
    }

    /// The generic "continue" input. Finishes a typing line, otherwise
    /// moves on. Ignored while choices are up.
    pub fn advance(&mut self) -> DialogueState {
        match self.state {
            DialogueState::PresentingLine => {
                self.typewriter.finish();
                self.view.set_text(self.typewriter.visible_text());
                self.view.set_continue_indicator(true);
                self.state = DialogueState::LineComplete;
            }
            DialogueState::LineComplete => self.next_step(),
            DialogueState::PresentingChoices | DialogueState::Idle | DialogueState::Ended => {
                tracing::trace!(state = ?self.state, "advance ignored");
            }
        }
        self.state
    }

    /// Pick one of the offered choices by its authored index.
    pub fn select_choice(&mut self, index: usize) -> Result<DialogueState, DialogueError> {
        if self.state != DialogueState::PresentingChoices {
            tracing::warn!(index, state = ?self.state, "choice selected while none are offered");
            return Err(DialogueError::NotPresentingChoices);
        }
        let Some(session) = self.session.as_ref() else {
            return Err(DialogueError::NotPresentingChoices);
        };
        if !session.offered.contains(&index) {
            tracing::warn!(index, dialogue = %session.id, "choice is not on offer");
            return Err(DialogueError::InvalidChoice(index));
        }

        let follow_up = session.dialogue.choices[index].follow_up.clone();
        tracing::debug!(index, dialogue = %session.id, follow_up = ?follow_up, "choice selected");
        self.view.clear_choices();

        match follow_up {
            Some(next) => {
                if self.start(&next).is_err() {
                    self.end();
                }
            }
            None => self.end(),
        }
        Ok(self.state)
    }

    /// Advance the typing line by `delta_seconds`.
    pub fn tick(&mut self, delta_seconds: f32) {
        if self.state != DialogueState::PresentingLine {
            return;
        }
        match self.typewriter.tick(delta_seconds) {
            Reveal::Idle => {}
            Reveal::Progress => self.view.set_text(self.typewriter.visible_text()),
            Reveal::Completed => {
                self.view.set_text(self.typewriter.visible_text());
                self.view.set_continue_indicator(true);
                self.state = DialogueState::LineComplete;
            }
        }
    }

    /// Re-render the visible text in the active language without
    /// touching queue position or typing progress.
    pub fn refresh_language(&mut self) {
        let language = self.language.current();
        match self.state {
            DialogueState::PresentingLine | DialogueState::LineComplete => {
                let Some(session) = self.session.as_ref() else {
                    return;
                };
                let Some(index) = session.current_line else {
                    return;
                };
                let text = session.dialogue.lines[index].text.get(language);
                self.typewriter.retarget(text);
                self.view.set_text(self.typewriter.visible_text());
            }
            DialogueState::PresentingChoices => {
                self.render_choices();
            }
            DialogueState::Idle | DialogueState::Ended => {}
        }
    }

    fn next_step(&mut self) {
        let language = self.language.current();
        let Some(session) = self.session.as_mut() else {
            return;
        };

        if let Some(index) = session.remaining.pop_front() {
            session.current_line = Some(index);
            let line = &session.dialogue.lines[index];
            self.view.set_speaker(&line.speaker, line.portrait.as_deref());
            self.typewriter.start(line.text.get(language));
            self.view.set_text(self.typewriter.visible_text());
            self.view.set_continue_indicator(false);
            self.state = DialogueState::PresentingLine;
            return;
        }

        session.current_line = None;
        self.view.set_continue_indicator(false);
        if session.dialogue.choices.is_empty() {
            tracing::debug!(dialogue = %session.id, "no choices, ending dialogue");
            self.end();
            return;
        }

        self.typewriter.clear();
        self.state = DialogueState::PresentingChoices;
        if !self.render_choices() {
            self.end();
        }
    }

    /// Rebuild the choice buttons. Returns false if none could be shown.
    fn render_choices(&mut self) -> bool {
        let language = self.language.current();
        let Some(session) = self.session.as_mut() else {
            return false;
        };

        let mut buttons = Vec::with_capacity(session.dialogue.choices.len());
        for (index, choice) in session.dialogue.choices.iter().enumerate() {
            if choice.label.is_blank() {
                tracing::warn!(dialogue = %session.id, index, "skipping choice with no text");
                continue;
            }
            buttons.push(ChoiceButton {
                index,
                label: choice.label(language).to_string(),
            });
        }
        session.offered = buttons.iter().map(|b| b.index).collect();

        self.view.clear_choices();
        if buttons.is_empty() {
            tracing::warn!(dialogue = %session.id, "no choice has text, ending dialogue");
            return false;
        }
        self.view.show_choices(&buttons);
        true
    }

    fn end(&mut self) {
        self.typewriter.clear();
        self.session = None;
        self.state = DialogueState::Ended;
        self.view.clear_choices();
        self.view.set_continue_indicator(false);
        self.view.set_visible(false);
        self.lock.release();
        tracing::debug!("dialogue ended");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::language::{LanguageSetting, LanguageToggle};
    use crate::core::lock::{InteractionLock, LockView, Subsystem};
    use crate::core::testing::{RecordingDialogueView, RecordingLocomotion};
    use crate::schema::dialogue::{DialogueChoice, DialogueLine};
    use crate::schema::language::Language;

    struct Fixture {
        dialogue: DialogueOrchestrator,
        view: RecordingDialogueView,
        player: RecordingLocomotion,
        lock: LockView,
        toggle: LanguageToggle,
    }

    fn library() -> ContentLibrary {
        let mut library = ContentLibrary::default();
        library.dialogues.insert(
            DialogueId::from("greeting"),
            Dialogue {
                lines: vec![
                    DialogueLine::new("A", "Hola", "Hi"),
                    DialogueLine::new("A", "Adiós", "Bye"),
                ],
                choices: Vec::new(),
            },
        );
        library.dialogues.insert(
            DialogueId::from("question"),
            Dialogue {
                lines: vec![DialogueLine::new("Abuela", "¿Vienes?", "Coming?")],
                choices: vec![
                    DialogueChoice::new("Sí", "Yes", Some("greeting")),
                    DialogueChoice::new("", "", None),
                    DialogueChoice::new("No", "", None),
                ],
            },
        );
        library.dialogues.insert(
            DialogueId::from("dangling"),
            Dialogue {
                lines: Vec::new(),
                choices: vec![DialogueChoice::new("Ir", "Go", Some("missing"))],
            },
        );
        library
            .dialogues
            .insert(DialogueId::from("empty"), Dialogue::default());
        library.dialogues.insert(
            DialogueId::from("blank_choices"),
            Dialogue {
                lines: Vec::new(),
                choices: vec![DialogueChoice::new(" ", "", None)],
            },
        );
        library
    }

    fn fixture(language: Language) -> Fixture {
        let view = RecordingDialogueView::default();
        let player = RecordingLocomotion::default();
        let lock = InteractionLock::new(Box::new(player.clone()));
        let (toggle, language) = LanguageSetting::new(language);
        let dialogue = DialogueOrchestrator::new(
            Rc::new(library()),
            Box::new(view.clone()),
            language,
            lock.handle(Subsystem::Dialogue).unwrap(),
            0.25,
        );
        Fixture {
            dialogue,
            view,
            player,
            lock: lock.view(),
            toggle,
        }
    }

    #[test]
    fn two_line_dialogue_plays_to_end() {
        let mut f = fixture(Language::Spanish);

        assert_eq!(
            f.dialogue.start(&DialogueId::from("greeting")).unwrap(),
            DialogueState::PresentingLine
        );
        assert!(f.lock.dialogue_active());
        assert!(f.player.is_stopped());
        assert_eq!(f.view.screen().text, "");

        f.dialogue.tick(0.25);
        assert_eq!(f.view.screen().text, "H");
        f.dialogue.tick(0.75);
        assert_eq!(f.view.screen().text, "Hola");
        assert_eq!(f.dialogue.state(), DialogueState::LineComplete);
        assert!(f.view.screen().continue_indicator);

        assert_eq!(f.dialogue.advance(), DialogueState::PresentingLine);
        assert!(!f.view.screen().continue_indicator);
        f.dialogue.tick(10.0);
        assert_eq!(f.view.screen().text, "Adiós");

        assert_eq!(f.dialogue.advance(), DialogueState::Ended);
        assert!(!f.lock.dialogue_active());
        assert!(!f.player.is_stopped());
        assert!(!f.view.screen().visible);
    }

    #[test]
    fn english_is_shown_when_active() {
        let mut f = fixture(Language::English);
        f.dialogue.start(&DialogueId::from("greeting")).unwrap();
        f.dialogue.advance();
        assert_eq!(f.view.screen().text, "Hi");
        assert_eq!(f.view.screen().speaker, "A");
    }

    #[test]
    fn advance_while_typing_snaps_full_line() {
        let mut f = fixture(Language::Spanish);
        f.dialogue.start(&DialogueId::from("greeting")).unwrap();
        f.dialogue.tick(0.25);

        assert_eq!(f.dialogue.advance(), DialogueState::LineComplete);
        assert_eq!(f.view.screen().text, "Hola");
        assert!(f.view.screen().continue_indicator);
        assert_eq!(f.dialogue.remaining_lines(), 1);
    }

    #[test]
    fn unknown_dialogue_changes_nothing() {
        let mut f = fixture(Language::Spanish);
        assert_eq!(
            f.dialogue.start(&DialogueId::from("nope")),
            Err(DialogueError::UnknownDialogue(DialogueId::from("nope")))
        );
        assert_eq!(f.dialogue.state(), DialogueState::Idle);
        assert!(!f.lock.dialogue_active());
        assert_eq!(f.player.stops(), 0);
    }

    #[test]
    fn empty_dialogue_ends_immediately() {
        let mut f = fixture(Language::Spanish);
        assert_eq!(
            f.dialogue.start(&DialogueId::from("empty")).unwrap(),
            DialogueState::Ended
        );
        assert!(!f.lock.any_active());
        assert_eq!(f.player.stops(), 1);
        assert_eq!(f.player.resumes(), 1);
    }

    #[test]
    fn choices_skip_blank_labels_and_ignore_advance() {
        let mut f = fixture(Language::Spanish);
        f.dialogue.start(&DialogueId::from("question")).unwrap();
        f.dialogue.advance();
        assert_eq!(f.dialogue.advance(), DialogueState::PresentingChoices);

        let choices = f.view.screen().choices;
        assert_eq!(
            choices,
            vec![
                ChoiceButton {
                    index: 0,
                    label: "Sí".to_string()
                },
                ChoiceButton {
                    index: 2,
                    label: "No".to_string()
                },
            ]
        );

        assert_eq!(f.dialogue.advance(), DialogueState::PresentingChoices);
        assert_eq!(
            f.dialogue.select_choice(1),
            Err(DialogueError::InvalidChoice(1))
        );
        assert!(f.lock.dialogue_active());
    }

    #[test]
    fn choice_with_follow_up_restarts_fresh() {
        let mut f = fixture(Language::Spanish);
        f.dialogue.start(&DialogueId::from("question")).unwrap();
        f.dialogue.advance();
        f.dialogue.advance();

        assert_eq!(
            f.dialogue.select_choice(0).unwrap(),
            DialogueState::PresentingLine
        );
        assert_eq!(
            f.dialogue.current_dialogue(),
            Some(&DialogueId::from("greeting"))
        );
        assert_eq!(f.dialogue.remaining_lines(), 1);
        assert!(f.view.screen().choices.is_empty());
        assert_eq!(f.player.stops(), 1);
    }

    #[test]
    fn choice_without_follow_up_ends() {
        let mut f = fixture(Language::Spanish);
        f.dialogue.start(&DialogueId::from("question")).unwrap();
        f.dialogue.advance();
        f.dialogue.advance();

        assert_eq!(f.dialogue.select_choice(2).unwrap(), DialogueState::Ended);
        assert!(!f.lock.dialogue_active());
    }

    #[test]
    fn dangling_follow_up_ends_dialogue() {
        let mut f = fixture(Language::Spanish);
        assert_eq!(
            f.dialogue.start(&DialogueId::from("dangling")).unwrap(),
            DialogueState::PresentingChoices
        );
        assert_eq!(f.dialogue.select_choice(0).unwrap(), DialogueState::Ended);
        assert!(!f.player.is_stopped());
    }

    #[test]
    fn all_blank_choices_end_dialogue() {
        let mut f = fixture(Language::Spanish);
        assert_eq!(
            f.dialogue.start(&DialogueId::from("blank_choices")).unwrap(),
            DialogueState::Ended
        );
    }

    #[test]
    fn select_without_choices_is_refused() {
        let mut f = fixture(Language::Spanish);
        assert_eq!(
            f.dialogue.select_choice(0),
            Err(DialogueError::NotPresentingChoices)
        );
    }

    #[test]
    fn language_toggle_mid_line_round_trips() {
        let mut f = fixture(Language::Spanish);
        f.dialogue.start(&DialogueId::from("greeting")).unwrap();
        f.dialogue.tick(0.5);
        assert_eq!(f.view.screen().text, "Ho");

        f.toggle.toggle();
        f.dialogue.refresh_language();
        assert_eq!(f.view.screen().text, "Hi");
        assert_eq!(f.dialogue.state(), DialogueState::PresentingLine);

        f.toggle.toggle();
        f.dialogue.refresh_language();
        assert_eq!(f.view.screen().text, "Ho");
        assert_eq!(f.dialogue.remaining_lines(), 1);
        assert_eq!(f.dialogue.state(), DialogueState::PresentingLine);
    }

    #[test]
    fn shorter_text_after_toggle_completes_on_next_tick() {
        let mut f = fixture(Language::Spanish);
        f.dialogue.start(&DialogueId::from("greeting")).unwrap();
        f.dialogue.tick(0.5);

        f.toggle.toggle();
        f.dialogue.refresh_language();
        assert_eq!(f.dialogue.state(), DialogueState::PresentingLine);

        f.dialogue.tick(0.0);
        assert_eq!(f.dialogue.state(), DialogueState::LineComplete);
        assert_eq!(f.view.screen().text, "Hi");
        assert!(f.view.screen().continue_indicator);
    }

    #[test]
    fn language_toggle_after_line_complete() {
        let mut f = fixture(Language::Spanish);
        f.dialogue.start(&DialogueId::from("greeting")).unwrap();
        f.dialogue.advance();

        f.toggle.toggle();
        f.dialogue.refresh_language();
        assert_eq!(f.view.screen().text, "Hi");
        assert_eq!(f.dialogue.state(), DialogueState::LineComplete);
    }

    #[test]
    fn language_toggle_rebuilds_choices() {
        let mut f = fixture(Language::Spanish);
        f.dialogue.start(&DialogueId::from("question")).unwrap();
        f.dialogue.advance();
        f.dialogue.advance();

        f.toggle.toggle();
        f.dialogue.refresh_language();
        let labels: Vec<String> = f
            .view
            .screen()
            .choices
            .into_iter()
            .map(|c| c.label)
            .collect();
        assert_eq!(labels, vec!["Yes".to_string(), "No".to_string()]);
    }
}
