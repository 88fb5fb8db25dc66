/// Typewriter presenter: reveals a line one character per interval.
///
/// Time comes from the host as per-frame deltas passed to [`Typewriter::tick`].
/// [`Typewriter::finish`] is the player's skip: the full line snaps into
/// place and the reveal counts as complete. [`Typewriter::start`] drops
/// whatever was in flight without snapping it, so a line replaced before
/// it finished typing never flashes its full text.

/// Default seconds per revealed character.
pub const DEFAULT_CHAR_DELAY: f32 = 0.02;

/// What a call to [`Typewriter::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reveal {
    /// Nothing in flight, or not enough time passed for a new character.
    Idle,
    /// At least one more character is visible.
    Progress,
    /// The last character was revealed on this tick.
    Completed,
}

#[derive(Debug, Clone)]
pub struct Typewriter {
    full_text: String,
    total_chars: usize,
    revealed: usize,
    timer: f32,
    char_delay: f32,
    typing: bool,
}

impl Default for Typewriter {
    fn default() -> Self {
        Self::new(DEFAULT_CHAR_DELAY)
    }
}

impl Typewriter {
    pub fn new(char_delay: f32) -> Self {
        Self {
            full_text: String::new(),
            total_chars: 0,
            revealed: 0,
            timer: 0.0,
            char_delay: char_delay.max(0.0),
            typing: false,
        }
    }

    /// Begin revealing `text` from its first character, replacing any
    /// reveal in flight.
    pub fn start(&mut self, text: &str) {
        self.full_text = text.to_string();
        self.total_chars = text.chars().count();
        self.revealed = 0;
        self.timer = 0.0;
        self.typing = true;
    }

    /// Advance by `delta_seconds`.
    pub fn tick(&mut self, delta_seconds: f32) -> Reveal {
        if !self.typing {
            return Reveal::Idle;
        }

        let before = self.revealed;
        self.timer += delta_seconds;
        if self.char_delay <= 0.0 {
            self.revealed = self.total_chars.max(self.revealed);
        } else {
            while self.timer >= self.char_delay && self.revealed < self.total_chars {
                self.timer -= self.char_delay;
                self.revealed += 1;
            }
        }

        if self.revealed >= self.total_chars {
            self.typing = false;
            self.timer = 0.0;
            return Reveal::Completed;
        }
        if self.revealed > before {
            Reveal::Progress
        } else {
            Reveal::Idle
        }
    }

    /// Snap to the full text. Returns true if a reveal was in flight.
    pub fn finish(&mut self) -> bool {
        if !self.typing {
            return false;
        }
        self.revealed = self.revealed.max(self.total_chars);
        self.typing = false;
        self.timer = 0.0;
        true
    }

    /// Drop the current reveal without snapping it.
    pub fn clear(&mut self) {
        self.full_text.clear();
        self.total_chars = 0;
        self.revealed = 0;
        self.timer = 0.0;
        self.typing = false;
    }

    /// Swap the text being revealed while keeping progress and typing
    /// state. Used when the display language changes mid-line.
    pub fn retarget(&mut self, text: &str) {
        self.full_text = text.to_string();
        self.total_chars = text.chars().count();
        if !self.typing {
            self.revealed = self.total_chars;
        }
    }

    pub fn is_typing(&self) -> bool {
        self.typing
    }

    pub fn full_text(&self) -> &str {
        &self.full_text
    }

    /// The revealed prefix of the text, cut on a char boundary.
    pub fn visible_text(&self) -> &str {
        if !self.typing {
            return &self.full_text;
        }
        self.full_text
            .char_indices()
            .nth(self.revealed)
            .map(|(i, _)| &self.full_text[..i])
            .unwrap_or(&self.full_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveals_one_char_per_interval() {
        let mut tw = Typewriter::new(0.1);
        tw.start("Hola");
        assert_eq!(tw.visible_text(), "");

        assert_eq!(tw.tick(0.1), Reveal::Progress);
        assert_eq!(tw.visible_text(), "H");
        assert_eq!(tw.tick(0.05), Reveal::Idle);
        assert_eq!(tw.tick(0.05), Reveal::Progress);
        assert_eq!(tw.visible_text(), "Ho");
        assert_eq!(tw.tick(0.2), Reveal::Completed);
        assert_eq!(tw.visible_text(), "Hola");
        assert!(!tw.is_typing());
        assert_eq!(tw.tick(1.0), Reveal::Idle);
    }

    #[test]
    fn multibyte_prefixes_stay_on_char_boundaries() {
        let mut tw = Typewriter::new(1.0);
        tw.start("¿Adiós?");
        tw.tick(1.0);
        assert_eq!(tw.visible_text(), "¿");
        tw.tick(4.0);
        assert_eq!(tw.visible_text(), "¿Adió");
    }

    #[test]
    fn finish_snaps_to_full_text() {
        let mut tw = Typewriter::new(0.1);
        tw.start("Hola");
        tw.tick(0.1);
        assert!(tw.finish());
        assert_eq!(tw.visible_text(), "Hola");
        assert!(!tw.is_typing());
        assert!(!tw.finish());
    }

    #[test]
    fn start_replaces_in_flight_reveal_without_snapping() {
        let mut tw = Typewriter::new(0.1);
        tw.start("Primera línea");
        tw.tick(0.3);
        tw.start("Segunda");
        assert_eq!(tw.visible_text(), "");
        assert!(tw.is_typing());
        assert_eq!(tw.full_text(), "Segunda");
    }

    #[test]
    fn empty_text_completes_on_first_tick() {
        let mut tw = Typewriter::new(0.1);
        tw.start("");
        assert_eq!(tw.tick(0.0), Reveal::Completed);
    }

    #[test]
    fn zero_delay_reveals_everything_at_once() {
        let mut tw = Typewriter::new(0.0);
        tw.start("Hi");
        assert_eq!(tw.tick(0.0), Reveal::Completed);
        assert_eq!(tw.visible_text(), "Hi");
    }

    #[test]
    fn retarget_keeps_progress_and_round_trips() {
        let mut tw = Typewriter::new(0.25);
        tw.start("Hola amigo");
        tw.tick(0.75);
        assert_eq!(tw.visible_text(), "Hol");

        tw.retarget("Hi");
        assert_eq!(tw.visible_text(), "Hi");
        assert!(tw.is_typing());

        tw.retarget("Hola amigo");
        assert_eq!(tw.visible_text(), "Hol");
    }

    #[test]
    fn retarget_after_completion_shows_full_text() {
        let mut tw = Typewriter::new(0.1);
        tw.start("Hi");
        tw.finish();
        tw.retarget("Hola amigo");
        assert_eq!(tw.visible_text(), "Hola amigo");
        assert!(!tw.is_typing());
    }
}
