/// Shared language setting: one writer, many readers.

use std::cell::Cell;
use std::rc::Rc;

use crate::schema::language::Language;

/// Constructor for the shared language setting.
pub struct LanguageSetting;

impl LanguageSetting {
    /// Create the setting, returning the single writer and a reader
    /// that can be cloned into every presentation component.
    pub fn new(initial: Language) -> (LanguageToggle, LanguageView) {
        let shared = Rc::new(Cell::new(initial));
        (
            LanguageToggle {
                shared: Rc::clone(&shared),
            },
            LanguageView { shared },
        )
    }
}

/// The only handle allowed to change the active language.
#[derive(Debug)]
pub struct LanguageToggle {
    shared: Rc<Cell<Language>>,
}

impl LanguageToggle {
    /// Flip the active language and return the new one.
    pub fn toggle(&self) -> Language {
        let next = self.shared.get().toggled();
        self.shared.set(next);
        tracing::info!(language = ?next, "language toggled");
        next
    }

    pub fn current(&self) -> Language {
        self.shared.get()
    }

    pub fn view(&self) -> LanguageView {
        LanguageView {
            shared: Rc::clone(&self.shared),
        }
    }
}

/// Read-only view of the active language.
#[derive(Debug, Clone)]
pub struct LanguageView {
    shared: Rc<Cell<Language>>,
}

impl LanguageView {
    pub fn current(&self) -> Language {
        self.shared.get()
    }

    pub fn is_english(&self) -> bool {
        self.current() == Language::English
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn views_observe_toggles() {
        let (toggle, view) = LanguageSetting::new(Language::Spanish);
        let other = view.clone();
        assert!(!view.is_english());

        assert_eq!(toggle.toggle(), Language::English);
        assert!(view.is_english());
        assert_eq!(other.current(), Language::English);
        assert_eq!(toggle.view().current(), Language::English);
    }

    #[test]
    fn double_toggle_restores() {
        let (toggle, view) = LanguageSetting::new(Language::English);
        toggle.toggle();
        toggle.toggle();
        assert_eq!(view.current(), Language::English);
    }
}
