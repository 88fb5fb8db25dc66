/// Fragment journal and the inventory panel that pages through it.

use rustc_hash::FxHashSet;

use crate::core::language::LanguageView;
use crate::core::lock::LockHandle;
use crate::core::view::{InventoryPage, InventoryView};
use crate::schema::language::{Language, Localized};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// Collected fragments in collection order, plus a page cursor.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    entries: Vec<Localized>,
    seen: FxHashSet<String>,
    cursor: usize,
    puzzles_completed: usize,
    total_fragments: usize,
    total_puzzles: usize,
}

impl Journal {
    pub fn new(total_fragments: usize, total_puzzles: usize) -> Self {
        Self {
            total_fragments,
            total_puzzles,
            ..Self::default()
        }
    }

    /// Record a fragment. Blank text and text already in the journal
    /// are skipped. Returns true if the fragment was added.
    pub fn add_fragment(&mut self, spanish: &str, english: &str) -> bool {
        if spanish.trim().is_empty() {
            return false;
        }
        if !self.seen.insert(spanish.to_string()) {
            tracing::debug!(fragment = spanish, "fragment already collected");
            return false;
        }
        self.entries.push(Localized::new(spanish, english));
        tracing::info!(count = self.entries.len(), "fragment added to journal");
        true
    }

    pub fn add_puzzle(&mut self) {
        self.puzzles_completed += 1;
    }

    /// Move the cursor one page, wrapping at either end.
    pub fn navigate(&mut self, direction: Direction) {
        let count = self.entries.len();
        if count == 0 {
            return;
        }
        self.cursor = match direction {
            Direction::Previous => (self.cursor + count - 1) % count,
            Direction::Next => (self.cursor + 1) % count,
        };
    }

    pub fn fragment_count(&self) -> usize {
        self.entries.len()
    }

    pub fn puzzle_count(&self) -> usize {
        self.puzzles_completed
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// More than one page to flip through.
    pub fn can_navigate(&self) -> bool {
        self.entries.len() > 1
    }

    /// Text of the fragment under the cursor.
    pub fn current_text(&self, language: Language) -> Option<&str> {
        self.entries.get(self.cursor).map(|entry| entry.get(language))
    }

    pub fn page_text(&self, language: Language) -> String {
        match self.current_text(language) {
            Some(text) => format!(
                "Fragment {} of {}:\n\n{}",
                self.cursor + 1,
                self.entries.len(),
                text
            ),
            None => "No fragments collected yet.".to_string(),
        }
    }

    pub fn page(&self, language: Language) -> InventoryPage {
        InventoryPage {
            fragments_summary: format!(
                "Fragments: {}/{}",
                self.fragment_count(),
                self.total_fragments
            ),
            puzzles_summary: format!(
                "Retelling Puzzles: {}/{}",
                self.puzzles_completed, self.total_puzzles
            ),
            page_text: self.page_text(language),
            can_navigate: self.can_navigate(),
        }
    }
}

/// The inventory panel. Holds the interaction lock while open.
pub struct Inventory {
    view: Box<dyn InventoryView>,
    language: LanguageView,
    lock: LockHandle,
    open: bool,
}

impl Inventory {
    pub fn new(view: Box<dyn InventoryView>, language: LanguageView, lock: LockHandle) -> Self {
        Self {
            view,
            language,
            lock,
            open: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self, journal: &Journal) {
        self.open = true;
        self.lock.acquire();
        self.view.set_visible(true);
        self.render(journal);
    }

    pub fn close(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        self.view.set_visible(false);
        self.lock.release();
    }

    pub fn toggle(&mut self, journal: &Journal) {
        if self.open {
            self.close();
        } else {
            self.open(journal);
        }
    }

    pub fn navigate(&mut self, journal: &mut Journal, direction: Direction) {
        journal.navigate(direction);
        self.render(journal);
    }

    /// Redraw from the journal. Cheap; called after every change.
    pub fn render(&mut self, journal: &Journal) {
        if self.open {
            self.view.render(&journal.page(self.language.current()));
        }
    }
}
