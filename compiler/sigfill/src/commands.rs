//! Command implementations for the `sigfill` binary.

use sigfill::{apply_all, collect_file, SourceLines, SuggestConfig, Suggestion};
use sigfill_lexer::tokenize_definition;

/// Flags accepted by `sigfill annotate`.
#[derive(Debug, Default)]
pub struct AnnotateOptions {
    pub config: SuggestConfig,
    /// Print the whole file with the edits applied.
    pub apply: bool,
}

/// Run every suggestion in `suggestions_path` against `path` and print the
/// resulting edits.
pub fn annotate_file(path: &str, suggestions_path: &str, options: &AnnotateOptions) {
    let source = SourceLines::new(&read_file(path));
    let json = read_file(suggestions_path);
    let mut suggestions: Vec<Suggestion> = match serde_json::from_str(&json) {
        Ok(suggestions) => suggestions,
        Err(e) => {
            eprintln!("error: '{suggestions_path}' is not a list of suggestions: {e}");
            std::process::exit(1);
        }
    };
    // The collector reports 1-based lines.
    for suggestion in &mut suggestions {
        suggestion.line = suggestion.line.saturating_sub(1);
    }

    let outcomes = collect_file(&suggestions, &source, &options.config);
    tracing::debug!(
        suggestions = suggestions.len(),
        edits = outcomes.len(),
        "collected edits"
    );

    if options.apply {
        print!("{}", apply_all(&outcomes, &source));
        return;
    }
    if outcomes.is_empty() {
        eprintln!("{path}: nothing to change");
        return;
    }
    for outcome in &outcomes {
        let action = if outcome.replace {
            format!("replace {} line(s)", outcome.line_count)
        } else {
            "insert".to_string()
        };
        println!("{path}:{}: {action}", outcome.start_line + 1);
        print!("{}", outcome.text);
    }
}

/// Print the definition tokens of the header at the 1-based `line`.
pub fn dump_tokens(path: &str, line: usize) {
    let mut source = SourceLines::new(&read_file(path));
    match tokenize_definition(line.saturating_sub(1), &mut source) {
        Ok(lexed) => {
            for token in &lexed.tokens {
                println!("{token:?}");
            }
            println!();
            println!("header spans {} line(s)", lexed.line_count);
        }
        Err(e) => {
            eprintln!("{path}:{line}: {}", e.into_parse_error());
            std::process::exit(1);
        }
    }
}

/// Read a file from disk, exiting with a user-friendly error message on failure.
fn read_file(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            let msg = match e.kind() {
                std::io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
                std::io::ErrorKind::PermissionDenied => {
                    format!("permission denied reading '{path}'")
                }
                std::io::ErrorKind::InvalidData => {
                    format!("'{path}' contains invalid UTF-8 data")
                }
                _ => format!("error reading '{path}': {e}"),
            };
            eprintln!("{msg}");
            std::process::exit(1);
        }
    }
}
