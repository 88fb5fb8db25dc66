/// Fragment display: the "story fragment unlocked" panel.

use crate::core::language::LanguageView;
use crate::core::lock::LockHandle;
use crate::core::view::FragmentView;
use crate::schema::language::Localized;

pub struct FragmentDisplay {
    view: Box<dyn FragmentView>,
    language: LanguageView,
    lock: LockHandle,
    title: String,
    button_label: String,
    current: Option<Localized>,
}

impl FragmentDisplay {
    pub fn new(
        view: Box<dyn FragmentView>,
        language: LanguageView,
        lock: LockHandle,
        title: &str,
        button_label: &str,
    ) -> Self {
        Self {
            view,
            language,
            lock,
            title: title.to_string(),
            button_label: button_label.to_string(),
            current: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    /// Show a fragment. Blank fragments are ignored.
    pub fn show(&mut self, text: Localized) -> bool {
        if text.is_blank() {
            tracing::debug!("ignoring blank fragment");
            return false;
        }
        self.current = Some(text);
        self.lock.acquire();
        self.view.set_visible(true);
        self.render();
        true
    }

    /// Close the panel, handing back the fragment for the journal.
    pub fn confirm(&mut self) -> Option<Localized> {
        let fragment = self.current.take()?;
        self.view.set_visible(false);
        self.lock.release();
        Some(fragment)
    }

    pub fn refresh_language(&mut self) {
        self.render();
    }

    fn render(&mut self) {
        if let Some(text) = &self.current {
            self.view.show(
                &self.title,
                text.get(self.language.current()),
                &self.button_label,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::language::LanguageSetting;
    use crate::core::lock::{InteractionLock, Subsystem};
    use crate::core::testing::{RecordingFragmentView, RecordingLocomotion};
    use crate::schema::language::Language;

    #[test]
    fn show_confirm_cycle() {
        let view = RecordingFragmentView::default();
        let player = RecordingLocomotion::default();
        let lock = InteractionLock::new(Box::new(player.clone()));
        let (toggle, language) = LanguageSetting::new(Language::Spanish);
        let mut display = FragmentDisplay::new(
            Box::new(view.clone()),
            language,
            lock.handle(Subsystem::Fragment).unwrap(),
            "Fragment",
            "Keep",
        );

        assert!(display.show(Localized::new("La luna", "The moon")));
        assert!(lock.view().fragment_active());
        assert_eq!(view.screen().text, "La luna");
        assert_eq!(view.screen().button, "Keep");

        toggle.toggle();
        display.refresh_language();
        assert_eq!(view.screen().text, "The moon");

        let kept = display.confirm().unwrap();
        assert_eq!(kept.spanish, "La luna");
        assert!(!lock.view().fragment_active());
        assert!(!player.is_stopped());
        assert!(!view.screen().visible);
        assert!(display.confirm().is_none());
    }

    #[test]
    fn blank_fragment_is_ignored() {
        let lock = InteractionLock::new(Box::new(RecordingLocomotion::default()));
        let (_toggle, language) = LanguageSetting::new(Language::Spanish);
        let mut display = FragmentDisplay::new(
            Box::new(RecordingFragmentView::default()),
            language,
            lock.handle(Subsystem::Fragment).unwrap(),
            "Fragment",
            "Keep",
        );
        assert!(!display.show(Localized::spanish("  ")));
        assert!(!display.is_active());
        assert!(!lock.view().any_active());
    }
}
