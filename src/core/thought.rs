/// Thought bubble: the player character's inner monologue, typed out
/// one thought at a time.

use std::collections::VecDeque;
use thiserror::Error;

use crate::core::language::LanguageView;
use crate::core::lock::LockHandle;
use crate::core::typewriter::{Reveal, Typewriter};
use crate::core::view::ThoughtView;
use crate::schema::language::Localized;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ThoughtError {
    #[error("no thoughts to show")]
    Empty,
}

pub struct ThoughtBubble {
    view: Box<dyn ThoughtView>,
    language: LanguageView,
    lock: LockHandle,
    typewriter: Typewriter,
    queue: VecDeque<Localized>,
    current: Option<Localized>,
}

impl ThoughtBubble {
    pub fn new(
        view: Box<dyn ThoughtView>,
        language: LanguageView,
        lock: LockHandle,
        typing_delay: f32,
    ) -> Self {
        Self {
            view,
            language,
            lock,
            typewriter: Typewriter::new(typing_delay),
            queue: VecDeque::new(),
            current: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    pub fn start(&mut self, thoughts: &[Localized]) -> Result<(), ThoughtError> {
        if thoughts.is_empty() {
            tracing::error!("thought sequence has no thoughts");
            return Err(ThoughtError::Empty);
        }
        self.queue = thoughts.iter().cloned().collect();
        self.lock.acquire();
        self.view.set_visible(true);
        self.next_thought();
        Ok(())
    }

    /// Finish the typing thought, otherwise show the next or close.
    pub fn advance(&mut self) {
        if self.current.is_none() {
            return;
        }
        if self.typewriter.finish() {
            self.view.set_text(self.typewriter.visible_text());
            self.view.set_continue_indicator(true);
        } else {
            self.next_thought();
        }
    }

    pub fn tick(&mut self, delta_seconds: f32) {
        match self.typewriter.tick(delta_seconds) {
            Reveal::Idle => {}
            Reveal::Progress => self.view.set_text(self.typewriter.visible_text()),
            Reveal::Completed => {
                self.view.set_text(self.typewriter.visible_text());
                self.view.set_continue_indicator(true);
            }
        }
    }

    pub fn refresh_language(&mut self) {
        if let Some(thought) = &self.current {
            self.typewriter.retarget(thought.get(self.language.current()));
            self.view.set_text(self.typewriter.visible_text());
        }
    }

    fn next_thought(&mut self) {
        match self.queue.pop_front() {
            Some(thought) => {
                self.typewriter.start(thought.get(self.language.current()));
                self.current = Some(thought);
                self.view.set_text(self.typewriter.visible_text());
                self.view.set_continue_indicator(false);
            }
            None => {
                self.current = None;
                self.typewriter.clear();
                self.view.set_continue_indicator(false);
                self.view.set_visible(false);
                self.lock.release();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::language::LanguageSetting;
    use crate::core::lock::{InteractionLock, Subsystem};
    use crate::core::testing::{RecordingLocomotion, RecordingThoughtView};
    use crate::schema::language::Language;

    #[test]
    fn thoughts_play_in_order_then_close() {
        let view = RecordingThoughtView::default();
        let player = RecordingLocomotion::default();
        let lock = InteractionLock::new(Box::new(player.clone()));
        let (_toggle, language) = LanguageSetting::new(Language::English);
        let mut bubble = ThoughtBubble::new(
            Box::new(view.clone()),
            language,
            lock.handle(Subsystem::Thought).unwrap(),
            0.5,
        );

        bubble
            .start(&[
                Localized::new("¿Dónde estoy?", "Where am I?"),
                Localized::spanish("Tengo hambre"),
            ])
            .unwrap();
        assert!(player.is_stopped());

        bubble.tick(0.5);
        assert_eq!(view.screen().text, "W");
        bubble.advance();
        assert_eq!(view.screen().text, "Where am I?");
        assert!(view.screen().continue_indicator);

        bubble.advance();
        bubble.tick(100.0);
        assert_eq!(view.screen().text, "Tengo hambre");

        bubble.advance();
        assert!(!bubble.is_active());
        assert!(!player.is_stopped());
        assert!(!view.screen().visible);
    }

    #[test]
    fn empty_sequence_is_refused() {
        let lock = InteractionLock::new(Box::new(RecordingLocomotion::default()));
        let (_toggle, language) = LanguageSetting::new(Language::Spanish);
        let mut bubble = ThoughtBubble::new(
            Box::new(RecordingThoughtView::default()),
            language,
            lock.handle(Subsystem::Thought).unwrap(),
            0.5,
        );
        assert_eq!(bubble.start(&[]), Err(ThoughtError::Empty));
        assert!(!lock.view().any_active());
    }
}
