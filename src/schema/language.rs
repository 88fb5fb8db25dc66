use serde::{Deserialize, Serialize};

/// A display language. Spanish is the primary authoring language;
/// English text is optional and falls back to Spanish when missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    Spanish,
    English,
}

impl Default for Language {
    fn default() -> Self {
        Self::Spanish
    }
}

impl Language {
    /// The other language.
    pub fn toggled(self) -> Self {
        match self {
            Self::Spanish => Self::English,
            Self::English => Self::Spanish,
        }
    }

    /// Label for the language button while this language is active.
    pub fn toggle_label(self) -> &'static str {
        match self {
            Self::Spanish => "Change to English",
            Self::English => "Change to Spanish",
        }
    }
}

/// A pair of authored strings, one per language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Localized {
    pub spanish: String,
    #[serde(default)]
    pub english: String,
}

impl Localized {
    pub fn new(spanish: impl Into<String>, english: impl Into<String>) -> Self {
        Self {
            spanish: spanish.into(),
            english: english.into(),
        }
    }

    /// Spanish-only text; English display falls back to it.
    pub fn spanish(text: impl Into<String>) -> Self {
        Self::new(text, String::new())
    }

    /// Text for the given language, falling back to Spanish when the
    /// English side is blank.
    pub fn get(&self, language: Language) -> &str {
        match language {
            Language::English if !self.english.trim().is_empty() => &self.english,
            _ => &self.spanish,
        }
    }

    /// Returns true if the primary text is blank.
    pub fn is_blank(&self) -> bool {
        self.spanish.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_between_languages() {
        assert_eq!(Language::Spanish.toggled(), Language::English);
        assert_eq!(Language::English.toggled(), Language::Spanish);
        assert_eq!(Language::default(), Language::Spanish);
    }

    #[test]
    fn toggle_label_names_the_other_language() {
        assert_eq!(Language::Spanish.toggle_label(), "Change to English");
        assert_eq!(Language::English.toggle_label(), "Change to Spanish");
    }

    #[test]
    fn english_falls_back_to_spanish_when_blank() {
        let text = Localized::spanish("Hola");
        assert_eq!(text.get(Language::English), "Hola");

        let padded = Localized::new("Hola", "   ");
        assert_eq!(padded.get(Language::English), "Hola");
    }

    #[test]
    fn get_selects_language() {
        let text = Localized::new("Adiós", "Bye");
        assert_eq!(text.get(Language::Spanish), "Adiós");
        assert_eq!(text.get(Language::English), "Bye");
    }

    #[test]
    fn blank_detection_uses_primary_text() {
        assert!(Localized::new(" \n", "Hi").is_blank());
        assert!(!Localized::spanish("Hola").is_blank());
    }
}
