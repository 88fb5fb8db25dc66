/// Recording test doubles for every collaborator trait.
///
/// Each double shares its state through an `Rc<RefCell<_>>`, so a test
/// keeps one clone, boxes the other into the orchestrator, and inspects
/// what was drawn via `screen()`.

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::lock::Locomotion;
use crate::core::view::{
    ChoiceButton, DialogueView, Feedback, FragmentView, InventoryPage, InventoryView,
    LanguageButton, Point, PuzzleView, ThoughtView,
};

/// Vertical spacing of tokens in the default puzzle layout.
pub const TOKEN_SPACING: f32 = 50.0;

#[derive(Debug, Default)]
struct LocomotionLog {
    stops: usize,
    resumes: usize,
    stopped: bool,
}

/// A player that counts stop/resume calls.
#[derive(Debug, Default, Clone)]
pub struct RecordingLocomotion {
    log: Rc<RefCell<LocomotionLog>>,
}

impl RecordingLocomotion {
    pub fn stops(&self) -> usize {
        self.log.borrow().stops
    }

    pub fn resumes(&self) -> usize {
        self.log.borrow().resumes
    }

    pub fn is_stopped(&self) -> bool {
        self.log.borrow().stopped
    }
}

impl Locomotion for RecordingLocomotion {
    fn stop_movement(&mut self) {
        let mut log = self.log.borrow_mut();
        log.stops += 1;
        log.stopped = true;
    }

    fn resume_movement(&mut self) {
        let mut log = self.log.borrow_mut();
        log.resumes += 1;
        log.stopped = false;
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct DialogueScreen {
    pub visible: bool,
    pub speaker: String,
    pub portrait: Option<String>,
    pub text: String,
    pub continue_indicator: bool,
    pub choices: Vec<ChoiceButton>,
}

#[derive(Debug, Default, Clone)]
pub struct RecordingDialogueView {
    screen: Rc<RefCell<DialogueScreen>>,
}

impl RecordingDialogueView {
    pub fn screen(&self) -> DialogueScreen {
        self.screen.borrow().clone()
    }
}

impl DialogueView for RecordingDialogueView {
    fn set_visible(&mut self, visible: bool) {
        self.screen.borrow_mut().visible = visible;
    }

    fn set_speaker(&mut self, name: &str, portrait: Option<&str>) {
        let mut screen = self.screen.borrow_mut();
        screen.speaker = name.to_string();
        screen.portrait = portrait.map(str::to_string);
    }

    fn set_text(&mut self, text: &str) {
        self.screen.borrow_mut().text = text.to_string();
    }

    fn set_continue_indicator(&mut self, visible: bool) {
        self.screen.borrow_mut().continue_indicator = visible;
    }

    fn show_choices(&mut self, choices: &[ChoiceButton]) {
        self.screen.borrow_mut().choices = choices.to_vec();
    }

    fn clear_choices(&mut self) {
        self.screen.borrow_mut().choices.clear();
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct PuzzleScreen {
    pub visible: bool,
    pub title: String,
    pub instructions: String,
    pub tokens: Vec<String>,
    pub positions: Vec<Point>,
    pub feedback: Option<Feedback>,
}

/// Puzzle view laying tokens out in a vertical column. Tests move a
/// token with [`RecordingPuzzleView::place_token`] to simulate a drag.
#[derive(Debug, Default, Clone)]
pub struct RecordingPuzzleView {
    screen: Rc<RefCell<PuzzleScreen>>,
}

impl RecordingPuzzleView {
    pub fn screen(&self) -> PuzzleScreen {
        self.screen.borrow().clone()
    }

    pub fn place_token(&self, slot: usize, at: Point) {
        if let Some(position) = self.screen.borrow_mut().positions.get_mut(slot) {
            *position = at;
        }
    }

    /// Where the column layout puts `slot`.
    pub fn slot_position(slot: usize) -> Point {
        Point::new(0.0, slot as f32 * TOKEN_SPACING)
    }
}

impl PuzzleView for RecordingPuzzleView {
    fn set_visible(&mut self, visible: bool) {
        self.screen.borrow_mut().visible = visible;
    }

    fn set_header(&mut self, title: &str, instructions: &str) {
        let mut screen = self.screen.borrow_mut();
        screen.title = title.to_string();
        screen.instructions = instructions.to_string();
    }

    fn render_tokens(&mut self, phrases: &[String]) {
        let mut screen = self.screen.borrow_mut();
        screen.tokens = phrases.to_vec();
        screen.positions = (0..phrases.len()).map(Self::slot_position).collect();
    }

    fn token_positions(&self) -> Vec<Point> {
        self.screen.borrow().positions.clone()
    }

    fn show_feedback(&mut self, feedback: Option<&Feedback>) {
        self.screen.borrow_mut().feedback = feedback.cloned();
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct FragmentScreen {
    pub visible: bool,
    pub title: String,
    pub text: String,
    pub button: String,
}

#[derive(Debug, Default, Clone)]
pub struct RecordingFragmentView {
    screen: Rc<RefCell<FragmentScreen>>,
}

impl RecordingFragmentView {
    pub fn screen(&self) -> FragmentScreen {
        self.screen.borrow().clone()
    }
}

impl FragmentView for RecordingFragmentView {
    fn set_visible(&mut self, visible: bool) {
        self.screen.borrow_mut().visible = visible;
    }

    fn show(&mut self, title: &str, text: &str, button_label: &str) {
        let mut screen = self.screen.borrow_mut();
        screen.title = title.to_string();
        screen.text = text.to_string();
        screen.button = button_label.to_string();
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct InventoryScreen {
    pub visible: bool,
    pub page: Option<InventoryPage>,
}

#[derive(Debug, Default, Clone)]
pub struct RecordingInventoryView {
    screen: Rc<RefCell<InventoryScreen>>,
}

impl RecordingInventoryView {
    pub fn screen(&self) -> InventoryScreen {
        self.screen.borrow().clone()
    }
}

impl InventoryView for RecordingInventoryView {
    fn set_visible(&mut self, visible: bool) {
        self.screen.borrow_mut().visible = visible;
    }

    fn render(&mut self, page: &InventoryPage) {
        self.screen.borrow_mut().page = Some(page.clone());
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ThoughtScreen {
    pub visible: bool,
    pub text: String,
    pub continue_indicator: bool,
}

#[derive(Debug, Default, Clone)]
pub struct RecordingThoughtView {
    screen: Rc<RefCell<ThoughtScreen>>,
}

impl RecordingThoughtView {
    pub fn screen(&self) -> ThoughtScreen {
        self.screen.borrow().clone()
    }
}

impl ThoughtView for RecordingThoughtView {
    fn set_visible(&mut self, visible: bool) {
        self.screen.borrow_mut().visible = visible;
    }

    fn set_text(&mut self, text: &str) {
        self.screen.borrow_mut().text = text.to_string();
    }

    fn set_continue_indicator(&mut self, visible: bool) {
        self.screen.borrow_mut().continue_indicator = visible;
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LanguageButtonState {
    pub visible: bool,
    pub label: String,
}

#[derive(Debug, Default, Clone)]
pub struct RecordingLanguageButton {
    state: Rc<RefCell<LanguageButtonState>>,
}

impl RecordingLanguageButton {
    pub fn state(&self) -> LanguageButtonState {
        self.state.borrow().clone()
    }
}

impl LanguageButton for RecordingLanguageButton {
    fn set_visible(&mut self, visible: bool) {
        self.state.borrow_mut().visible = visible;
    }

    fn set_label(&mut self, label: &str) {
        self.state.borrow_mut().label = label.to_string();
    }
}
