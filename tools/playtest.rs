/// Playtest: drive dialogues, puzzles and the journal from a terminal.
///
/// Usage: playtest --content <path> [--settings <path>] [--seed <n>]
///
/// Commands:
///   talk <dialogue>      - start a dialogue
///   puzzle <name>        - open a retelling puzzle
///   fragment <name>      - show a story fragment
///   think <name>         - start a thought sequence
///   (empty line) | next  - advance / skip typing
///   choose <n>           - pick choice n
///   move <from> <to>     - drag token from slot to slot
///   shuffle | submit     - puzzle controls
///   confirm              - add the shown fragment to the journal
///   lang                 - toggle Spanish/English
///   inv | prev | fwd     - journal panel and paging
///   wait <seconds>       - let time pass
///   status | help | quit

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::mpsc::{self, Sender};
use story_interactions::core::journal::Direction;
use story_interactions::core::lock::Locomotion;
use story_interactions::core::session::{InputEvent, Interactions};
use story_interactions::core::settings::Settings;
use story_interactions::core::view::{
    ChoiceButton, DialogueView, Feedback, FragmentView, InventoryPage, InventoryView,
    LanguageButton, Point, PuzzleView, ThoughtView,
};
use story_interactions::schema::dialogue::DialogueId;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const FRAME: f32 = 1.0 / 60.0;
const TOKEN_SPACING: f32 = 50.0;

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "story_interactions=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return;
    }

    let mut content_path = None;
    let mut settings_path = None;
    let mut seed = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--content" if i + 1 < args.len() => {
                i += 1;
                content_path = Some(args[i].clone());
            }
            "--settings" if i + 1 < args.len() => {
                i += 1;
                settings_path = Some(args[i].clone());
            }
            "--seed" if i + 1 < args.len() => {
                i += 1;
                seed = args[i].parse::<u64>().ok();
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let mut settings = match settings_path {
        Some(ref path) => match Settings::load_from_ron(Path::new(path)) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("ERROR: Failed to load settings: {}", e);
                std::process::exit(1);
            }
        },
        None => Settings::default(),
    };
    if seed.is_some() {
        settings.shuffle_seed = seed;
    }

    let mut builder = Interactions::builder()
        .settings(settings)
        .locomotion(Box::new(ConsolePlayer))
        .dialogue_view(Box::new(ConsoleDialogue::default()))
        .puzzle_view(Box::new(ConsolePuzzle::default()))
        .fragment_view(Box::new(ConsoleFragment))
        .inventory_view(Box::new(ConsoleInventory))
        .thought_view(Box::new(ConsoleThought::default()))
        .language_button(Box::new(ConsoleLanguageButton));
    if let Some(ref path) = content_path {
        builder = builder.content_path(path);
    }

    let mut interactions = match builder.build() {
        Ok(i) => i,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    };

    let library = interactions.library();
    println!(
        "Loaded {} dialogues, {} puzzles, {} fragments",
        library.dialogues.len(),
        library.puzzles.len(),
        library.fragments.len()
    );
    println!("Type 'help' for commands.\n");

    let (events, inbox) = mpsc::channel();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("playtest> ");
        stdout.flush().ok();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let parts: Vec<&str> = line.split_whitespace().collect();
        let cmd = parts.first().map(|c| c.to_lowercase()).unwrap_or_default();

        let mut wait = 0.5;
        match cmd.as_str() {
            "quit" | "exit" | "q" => break,
            "help" | "h" | "?" => print_help(),
            "" | "next" | "n" => send(&events, InputEvent::Advance),
            "lang" => send(&events, InputEvent::ToggleLanguage),
            "shuffle" => send(&events, InputEvent::Shuffle),
            "submit" => send(&events, InputEvent::Submit),
            "confirm" => send(&events, InputEvent::ConfirmFragment),
            "inv" => send(&events, InputEvent::ToggleInventory),
            "prev" => send(&events, InputEvent::Navigate(Direction::Previous)),
            "fwd" => send(&events, InputEvent::Navigate(Direction::Next)),
            "choose" => match parts.get(1).and_then(|n| n.parse().ok()) {
                Some(n) => send(&events, InputEvent::SelectChoice(n)),
                None => println!("Usage: choose <n>"),
            },
            "move" => {
                let from = parts.get(1).and_then(|n| n.parse::<usize>().ok());
                let to = parts.get(2).and_then(|n| n.parse::<usize>().ok());
                match (from, to) {
                    (Some(from), Some(to)) => {
                        send(&events, InputEvent::BeginDrag(from));
                        send(
                            &events,
                            InputEvent::DropToken {
                                slot: from,
                                at: slot_position(to),
                            },
                        );
                    }
                    _ => println!("Usage: move <from> <to>"),
                }
            }
            "wait" => match parts.get(1).and_then(|s| s.parse::<f32>().ok()) {
                Some(seconds) if seconds >= 0.0 => wait = seconds,
                _ => println!("Usage: wait <seconds>"),
            },
            "talk" | "puzzle" | "fragment" | "think" => {
                let Some(name) = parts.get(1) else {
                    println!("Usage: {} <name>", cmd);
                    continue;
                };
                let result = match cmd.as_str() {
                    "talk" => interactions
                        .trigger_dialogue(&DialogueId::new(*name))
                        .map(|_| ()),
                    "puzzle" => interactions.trigger_puzzle(name),
                    "fragment" => interactions.trigger_fragment(name).map(|_| ()),
                    _ => interactions.trigger_thought(name),
                };
                if let Err(e) = result {
                    println!("ERROR: {}", e);
                }
            }
            "status" => {
                let journal = interactions.journal();
                println!("Language: {:?}", interactions.language());
                println!("Locked by: {:?}", interactions.lock_view().holders());
                println!("Dialogue: {:?}", interactions.dialogue().state());
                println!("Puzzle: {:?}", interactions.retelling().state());
                println!(
                    "Journal: {} fragments, {} puzzles",
                    journal.fragment_count(),
                    journal.puzzle_count()
                );
            }
            other => println!("Unknown command: {}. Type 'help'.", other),
        }

        interactions.pump(&inbox);
        run_frames(&mut interactions, wait);
    }

    println!("Goodbye.");
}

fn send(events: &Sender<InputEvent>, event: InputEvent) {
    // The receiver lives as long as main's loop.
    events.send(event).ok();
}

fn run_frames(interactions: &mut Interactions, seconds: f32) {
    let frames = (seconds / FRAME).ceil() as usize;
    for _ in 0..frames {
        interactions.tick(FRAME);
    }
}

fn slot_position(slot: usize) -> Point {
    Point::new(0.0, slot as f32 * TOKEN_SPACING)
}

fn print_usage() {
    println!("Usage: playtest --content <path> [--settings <path>] [--seed <n>]");
}

fn print_help() {
    println!("Commands:");
    println!("  talk <dialogue>     start a dialogue");
    println!("  puzzle <name>       open a retelling puzzle");
    println!("  fragment <name>     show a story fragment");
    println!("  think <name>        start a thought sequence");
    println!("  (enter) | next      advance or skip typing");
    println!("  choose <n>          pick choice n");
    println!("  move <from> <to>    drag a puzzle token");
    println!("  shuffle | submit    puzzle controls");
    println!("  confirm             add the shown fragment to the journal");
    println!("  lang                toggle Spanish/English");
    println!("  inv | prev | fwd    journal panel and paging");
    println!("  wait <seconds>      let time pass");
    println!("  status | help | quit");
}

struct ConsolePlayer;

impl Locomotion for ConsolePlayer {
    fn stop_movement(&mut self) {
        println!("(player stops)");
    }

    fn resume_movement(&mut self) {
        println!("(player moves again)");
    }
}

#[derive(Default)]
struct ConsoleDialogue {
    speaker: String,
    text: String,
}

impl DialogueView for ConsoleDialogue {
    fn set_visible(&mut self, visible: bool) {
        if !visible {
            println!("[dialogue closed]");
        }
    }

    fn set_speaker(&mut self, name: &str, portrait: Option<&str>) {
        self.speaker = match portrait {
            Some(p) => format!("{} ({})", name, p),
            None => name.to_string(),
        };
    }

    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    fn set_continue_indicator(&mut self, visible: bool) {
        if visible {
            println!("{}: {} ▸", self.speaker, self.text);
        }
    }

    fn show_choices(&mut self, choices: &[ChoiceButton]) {
        for choice in choices {
            println!("  [{}] {}", choice.index, choice.label);
        }
    }

    fn clear_choices(&mut self) {}
}

#[derive(Default)]
struct ConsolePuzzle {
    count: usize,
}

impl PuzzleView for ConsolePuzzle {
    fn set_visible(&mut self, visible: bool) {
        if !visible {
            println!("[puzzle closed]");
        }
    }

    fn set_header(&mut self, title: &str, instructions: &str) {
        println!("== {} ==\n{}", title, instructions);
    }

    fn render_tokens(&mut self, phrases: &[String]) {
        self.count = phrases.len();
        for (slot, phrase) in phrases.iter().enumerate() {
            println!("  {}. {}", slot, phrase);
        }
    }

    fn token_positions(&self) -> Vec<Point> {
        (0..self.count).map(slot_position).collect()
    }

    fn show_feedback(&mut self, feedback: Option<&Feedback>) {
        if let Some(f) = feedback {
            println!("{} {}", if f.success { "✔" } else { "✘" }, f.message);
        }
    }
}

struct ConsoleFragment;

impl FragmentView for ConsoleFragment {
    fn set_visible(&mut self, _visible: bool) {}

    fn show(&mut self, title: &str, text: &str, button_label: &str) {
        println!("*** {} ***\n{}\n[{}]", title, text, button_label);
    }
}

struct ConsoleInventory;

impl InventoryView for ConsoleInventory {
    fn set_visible(&mut self, visible: bool) {
        if !visible {
            println!("[journal closed]");
        }
    }

    fn render(&mut self, page: &InventoryPage) {
        println!("--- Journal ---");
        println!("{}   {}", page.fragments_summary, page.puzzles_summary);
        println!("{}", page.page_text);
        if page.can_navigate {
            println!("(prev / fwd)");
        }
    }
}

#[derive(Default)]
struct ConsoleThought {
    text: String,
}

impl ThoughtView for ConsoleThought {
    fn set_visible(&mut self, _visible: bool) {}

    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    fn set_continue_indicator(&mut self, visible: bool) {
        if visible {
            println!("( {} ) ▸", self.text);
        }
    }
}

struct ConsoleLanguageButton;

impl LanguageButton for ConsoleLanguageButton {
    fn set_visible(&mut self, _visible: bool) {}

    fn set_label(&mut self, _label: &str) {}
}
