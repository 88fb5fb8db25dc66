/// Render targets the interaction core draws into.
///
/// The host implements these over its UI toolkit. The core only calls
/// them; it never builds widgets itself.

/// A position on screen, in the host's UI units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// A choice button. `index` is the choice's position in the authored
/// dialogue and is what a selection event must carry back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceButton {
    pub index: usize,
    pub label: String,
}

/// Puzzle result banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub message: String,
    pub success: bool,
}

pub trait DialogueView {
    fn set_visible(&mut self, visible: bool);
    fn set_speaker(&mut self, name: &str, portrait: Option<&str>);
    fn set_text(&mut self, text: &str);
    fn set_continue_indicator(&mut self, visible: bool);
    fn show_choices(&mut self, choices: &[ChoiceButton]);
    fn clear_choices(&mut self);
}

pub trait PuzzleView {
    fn set_visible(&mut self, visible: bool);
    fn set_header(&mut self, title: &str, instructions: &str);
    /// Replace the draggable tokens. Slice order is container order.
    fn render_tokens(&mut self, phrases: &[String]);
    /// Current on-screen centre of each token, in container order.
    fn token_positions(&self) -> Vec<Point>;
    fn show_feedback(&mut self, feedback: Option<&Feedback>);
}

pub trait FragmentView {
    fn set_visible(&mut self, visible: bool);
    fn show(&mut self, title: &str, text: &str, button_label: &str);
}

/// Inventory panel contents, fully derived at render time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryPage {
    pub fragments_summary: String,
    pub puzzles_summary: String,
    pub page_text: String,
    pub can_navigate: bool,
}

pub trait InventoryView {
    fn set_visible(&mut self, visible: bool);
    fn render(&mut self, page: &InventoryPage);
}

pub trait ThoughtView {
    fn set_visible(&mut self, visible: bool);
    fn set_text(&mut self, text: &str);
    fn set_continue_indicator(&mut self, visible: bool);
}

/// The on-screen button that flips the display language.
pub trait LanguageButton {
    fn set_visible(&mut self, visible: bool);
    fn set_label(&mut self, label: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance(b) - 5.0).abs() < f32::EPSILON);
        assert_eq!(a.distance(a), 0.0);
    }
}
