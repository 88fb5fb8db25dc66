use serde::{Deserialize, Serialize};

use super::language::Localized;

/// A collectible story fragment, authored as one or more lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    pub lines: Vec<String>,
    #[serde(default)]
    pub english: Vec<String>,
}

impl Fragment {
    pub fn new(lines: &[&str], english: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|s| s.to_string()).collect(),
            english: english.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// The fragment's lines joined into a single display text.
    pub fn text(&self) -> Localized {
        Localized::new(self.lines.join("\n"), self.english.join("\n"))
    }

    pub fn is_empty(&self) -> bool {
        self.text().is_blank()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::language::Language;

    #[test]
    fn lines_join_with_newlines() {
        let fragment = Fragment::new(&["El río", "canta"], &["The river", "sings"]);
        let text = fragment.text();
        assert_eq!(text.get(Language::Spanish), "El río\ncanta");
        assert_eq!(text.get(Language::English), "The river\nsings");
    }

    #[test]
    fn fragment_without_lines_is_empty() {
        assert!(Fragment::default().is_empty());
        assert!(Fragment::new(&["  "], &[]).is_empty());
        assert!(!Fragment::new(&["Hola"], &[]).is_empty());
    }
}
