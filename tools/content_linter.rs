/// Content Linter: checks authored dialogues, puzzles, fragments and
/// thoughts for dangling follow-ups and malformed entries.
///
/// Usage: content_linter <content_dir_or_file> [--strict]

use std::path::Path;
use std::process;
use story_interactions::schema::content::{ContentIssue, ContentLibrary};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Usage: content_linter <content_dir_or_file> [--strict]");
        println!("  --strict  treat warnings (empty entries) as errors");
        process::exit(0);
    }

    let content_dir = &args[1];
    let strict = args.iter().skip(2).any(|a| a == "--strict");

    let mut library = ContentLibrary::default();
    let mut load_failures = 0;
    let content_path = Path::new(content_dir);

    if content_path.is_file() {
        match ContentLibrary::load_from_ron(content_path) {
            Ok(lib) => library.merge(lib),
            Err(e) => {
                eprintln!("ERROR: Failed to load content file: {}", e);
                process::exit(1);
            }
        }
    } else if content_path.is_dir() {
        load_content_recursive(content_path, &mut library, &mut load_failures);
    } else {
        eprintln!("ERROR: Path '{}' does not exist", content_dir);
        process::exit(1);
    }

    println!(
        "Loaded {} dialogues, {} puzzles, {} fragments, {} thought sequences",
        library.dialogues.len(),
        library.puzzles.len(),
        library.fragments.len(),
        library.thoughts.len()
    );

    let mut errors = load_failures;
    let mut warnings = 0;
    for issue in library.validate() {
        if is_error(&issue) || strict {
            println!("  ERROR: {}", issue);
            errors += 1;
        } else {
            println!("  WARN:  {}", issue);
            warnings += 1;
        }
    }

    println!("\n{} errors, {} warnings", errors, warnings);
    if errors > 0 {
        process::exit(1);
    }
}

/// Dangling references and mismatched phrase lists break play; empty
/// entries only do nothing when triggered.
fn is_error(issue: &ContentIssue) -> bool {
    matches!(
        issue,
        ContentIssue::MissingFollowUp { .. } | ContentIssue::PuzzleLengthMismatch { .. }
    )
}

fn load_content_recursive(dir: &Path, library: &mut ContentLibrary, failures: &mut usize) {
    let mut paths: Vec<_> = match std::fs::read_dir(dir) {
        Ok(entries) => entries.flatten().map(|e| e.path()).collect(),
        Err(e) => {
            eprintln!("  ERROR reading {}: {}", dir.display(), e);
            *failures += 1;
            return;
        }
    };
    paths.sort();

    for path in paths {
        if path.is_dir() {
            load_content_recursive(&path, library, failures);
        } else if path.extension().and_then(|s| s.to_str()) == Some("ron") {
            match ContentLibrary::load_from_ron(&path) {
                Ok(lib) => {
                    println!("  Loaded: {}", path.display());
                    library.merge(lib);
                }
                Err(e) => {
                    eprintln!("  ERROR loading {}: {}", path.display(), e);
                    *failures += 1;
                }
            }
        }
    }
}
