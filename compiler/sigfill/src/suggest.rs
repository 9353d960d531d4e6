//! Turning a set of suggestions for one function into an edit.
//!
//! The type daemon may return several candidate signatures for the same
//! function. Each is annotated independently; a failure turns into an inline
//! diagnostic comment instead of aborting the others. The surviving texts are
//! ordered by how many call samples support them and merged into one block.

use std::collections::BTreeMap;

use sigfill_lexer_core::SourceLines;

use crate::annotate::{annotate, Annotated, Suggestion};

/// Marker carried by every fallback diagnostic line.
pub const ERROR_MARKER: &str = "Error generating suggestion: ";

/// Prefix for lines that are inserted rather than replacing the header.
const DISABLED_PREFIX: &str = "##";

/// How suggestions are written back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SuggestConfig {
    /// Comment prefix for diagnostic lines.
    pub comment_prefix: String,
    /// Replace the header instead of inserting the suggestion above it.
    pub replace: bool,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        SuggestConfig {
            comment_prefix: "# types: ".to_string(),
            replace: false,
        }
    }
}

/// A block ready to be spliced into the source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchOutcome {
    /// 0-based line the block goes to.
    pub start_line: usize,
    /// Lines the block replaces when `replace` is set.
    pub line_count: usize,
    /// Block text, ending in a newline.
    pub text: String,
    pub replace: bool,
}

impl BatchOutcome {
    /// The whole source with this block spliced in.
    pub fn apply(&self, source: &SourceLines) -> String {
        let start = self.start_line.min(source.len());
        let resume = if self.replace {
            (self.start_line + self.line_count).min(source.len())
        } else {
            start
        };
        let mut out = source.joined(0, start);
        out.push_str(&self.text);
        out.push_str(&source.joined(resume, source.len() - resume));
        out
    }
}

/// Annotate one suggestion against `source`.
///
/// Returns `None` when the result equals the current text. A failure becomes
/// a one-line diagnostic comment, indented like the header.
pub fn suggestion_text(
    suggestion: &Suggestion,
    source: &SourceLines,
    config: &SuggestConfig,
) -> Option<Annotated> {
    let mut lines = |index: usize| source.get(index).map(str::to_string);
    match annotate(suggestion, &mut lines) {
        Ok(annotated) => {
            let existing = existing_text(source, suggestion.line, annotated.line_count);
            (annotated.text != existing).then_some(annotated)
        }
        Err(err) => {
            tracing::warn!(line = suggestion.line, %err, "could not annotate suggestion");
            let indent = source
                .get(suggestion.line)
                .map_or(0, |line| line.chars().take_while(|&c| c == ' ').count());
            Some(Annotated {
                text: format!(
                    "{}{}{ERROR_MARKER}{err}",
                    " ".repeat(indent),
                    config.comment_prefix
                ),
                line_count: 1,
            })
        }
    }
}

/// Merge all suggestions for one function into a single block.
///
/// Texts are ordered by sample count, highest first, and de-duplicated. The
/// block starts at the first suggestion's line and covers the widest header
/// any of them produced. Unless it replaces the header
/// (a single, successful text with `replace` configured), every line is
/// disabled with `##` so the user can pick one. Returns `None` when nothing
/// would change.
#[tracing::instrument(level = "debug", skip_all, fields(count = suggestions.len()))]
pub fn collect_batch(
    suggestions: &[Suggestion],
    source: &SourceLines,
    config: &SuggestConfig,
) -> Option<BatchOutcome> {
    let start_line = suggestions.first()?.line;

    let mut by_samples: BTreeMap<u64, Vec<String>> = BTreeMap::new();
    let mut line_count = 0;
    for suggestion in suggestions {
        let Some(annotated) = suggestion_text(suggestion, source, config) else {
            continue;
        };
        by_samples
            .entry(suggestion.samples)
            .or_default()
            .push(annotated.text);
        line_count = line_count.max(annotated.line_count);
    }

    let mut texts: Vec<String> = Vec::new();
    for text in by_samples.into_values().rev().flatten() {
        if !texts.contains(&text) {
            texts.push(text);
        }
    }

    let (mut text, replace) = match texts.as_slice() {
        [] => return None,
        [only] => (only.clone(), config.replace && !only.contains(ERROR_MARKER)),
        _ => (texts.join("\n"), false),
    };
    if text.is_empty() || text == existing_text(source, start_line, line_count) {
        tracing::debug!(start_line, "suggestions change nothing");
        return None;
    }

    if !replace && !text.contains(ERROR_MARKER) {
        text = text
            .lines()
            .map(|line| format!("{DISABLED_PREFIX}{line}"))
            .collect::<Vec<_>>()
            .join("\n");
    }
    text.push('\n');
    Some(BatchOutcome {
        start_line,
        line_count,
        text,
        replace,
    })
}

/// Run [`collect_batch`] for every header a file's suggestions point at.
///
/// Outcomes come back in line order.
pub fn collect_file(
    suggestions: &[Suggestion],
    source: &SourceLines,
    config: &SuggestConfig,
) -> Vec<BatchOutcome> {
    let mut by_line: BTreeMap<usize, Vec<Suggestion>> = BTreeMap::new();
    for suggestion in suggestions {
        by_line
            .entry(suggestion.line)
            .or_default()
            .push(suggestion.clone());
    }
    by_line
        .values()
        .filter_map(|group| collect_batch(group, source, config))
        .collect()
}

/// Splice all `outcomes` into `source`, last line first.
pub fn apply_all(outcomes: &[BatchOutcome], source: &SourceLines) -> String {
    let mut ordered: Vec<&BatchOutcome> = outcomes.iter().collect();
    ordered.sort_by_key(|outcome| std::cmp::Reverse(outcome.start_line));
    let mut text = source.joined(0, source.len());
    for outcome in ordered {
        text = outcome.apply(&SourceLines::new(&text));
    }
    text
}

/// Current text of `count` lines from `start`, without the final line break.
fn existing_text(source: &SourceLines, start: usize, count: usize) -> String {
    let mut text = source.joined(start, count);
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
    text
}
