//! Lexer for inferred type strings.
//!
//! Inferred types arrive as flat strings such as `"Callable[[int], str]"` or
//! `"Union[int, None]"`. Punctuation becomes `Separator` tokens and every run
//! of identifier characters (dots, colons and backticks included) becomes one
//! `DottedName`.

use sigfill_ir::{ParseError, Token, TokenKind};

/// Single-character separators.
const SEPARATORS: &str = "()[],*|";

/// Prefix of the per-timezone classes generated by pytz.
const PYTZ_TZFILE: &str = "pytz.tzfile.";

pub fn tokenize_type(text: &str) -> Result<Vec<Token>, ParseError> {
    // `?` marks legacy optionals and carries no information.
    let cleaned: String = text.chars().filter(|&c| c != '?').collect();
    let mut tokens = Vec::new();
    let mut rest = cleaned.as_str();
    while let Some(c) = rest.chars().next() {
        if c.is_whitespace() {
            rest = &rest[c.len_utf8()..];
        } else if SEPARATORS.contains(c) {
            tokens.push(Token::new(TokenKind::Separator, c));
            rest = &rest[1..];
        } else if let Some(after) = rest.strip_prefix("->") {
            tokens.push(Token::new(TokenKind::Separator, "->"));
            rest = after;
        } else if let Some(after) = rest.strip_prefix("...") {
            tokens.push(Token::new(TokenKind::DottedName, "..."));
            rest = after;
        } else {
            let len = name_len(rest);
            if len == 0 {
                return Err(ParseError::new(format!(
                    "could not parse {rest:?} from {text:?}"
                )));
            }
            tokens.push(Token::new(TokenKind::DottedName, normalize_name(&rest[..len])));
            rest = &rest[len..];
        }
    }
    tokens.push(Token::end());
    Ok(tokens)
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Index of the first char at or after `from` that fails `pred`.
fn eat(text: &str, from: usize, pred: impl Fn(char) -> bool) -> usize {
    text[from..]
        .char_indices()
        .find(|&(_, c)| !pred(c))
        .map_or(text.len(), |(i, _)| from + i)
}

/// Length of the name at the start of `text`.
///
/// A head of word characters, `-` and backticks, then any number of
/// `.`/`:`-separated segments of word characters, `-` and `/`, with optional
/// whitespace around each separator.
fn name_len(text: &str) -> usize {
    let head = eat(text, 0, |c| is_word(c) || c == '-' || c == '`');
    if head == 0 {
        return 0;
    }
    let mut end = head;
    loop {
        let separator = eat(text, end, char::is_whitespace);
        match text[separator..].chars().next() {
            Some('.' | ':') => {
                let segment = eat(text, separator + 1, char::is_whitespace);
                end = eat(text, segment, |c| is_word(c) || c == '-' || c == '/');
            }
            _ => return end,
        }
    }
}

fn normalize_name(raw: &str) -> String {
    let mut name: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    // Type variable ids: "T`1" is the type variable T.
    if let Some(tick) = name.find('`') {
        name.truncate(tick);
    }
    // pytz names classes after the zone ("pytz.tzfile.America/Los_Angeles").
    if name.starts_with(PYTZ_TZFILE) {
        name = "datetime.tzinfo".to_string();
    }
    if name.contains(['-', '/']) {
        tracing::warn!(name = %name, "inferred type is not a valid name, using Any");
        name = "Any".to_string();
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn texts(text: &str) -> Vec<String> {
        match tokenize_type(text) {
            Ok(tokens) => tokens.iter().map(|t| format!("{t:?}")).collect(),
            Err(err) => panic!("tokenize_type({text:?}) failed: {err}"),
        }
    }

    #[test]
    fn generic_application() {
        assert_eq!(
            texts("Union[int, str]"),
            vec![
                "DottedName(\"Union\")",
                "Separator(\"[\")",
                "DottedName(\"int\")",
                "Separator(\",\")",
                "DottedName(\"str\")",
                "Separator(\"]\")",
                "End",
            ]
        );
    }

    #[test]
    fn callable_with_ellipsis() {
        assert_eq!(
            texts("Callable[..., Any]"),
            vec![
                "DottedName(\"Callable\")",
                "Separator(\"[\")",
                "DottedName(\"...\")",
                "Separator(\",\")",
                "DottedName(\"Any\")",
                "Separator(\"]\")",
                "End",
            ]
        );
    }

    #[test]
    fn arrow_is_one_separator() {
        assert_eq!(
            texts("def (x) -> int"),
            vec![
                "DottedName(\"def\")",
                "Separator(\"(\")",
                "DottedName(\"x\")",
                "Separator(\")\")",
                "Separator(\"->\")",
                "DottedName(\"int\")",
                "End",
            ]
        );
    }

    #[test]
    fn backtick_suffix_is_truncated() {
        assert_eq!(texts("T`1"), vec!["DottedName(\"T\")", "End"]);
    }

    #[test]
    fn dash_suffix_becomes_any() {
        assert_eq!(texts("T-1"), vec!["DottedName(\"Any\")", "End"]);
    }

    #[test]
    fn pytz_zone_class_becomes_tzinfo() {
        assert_eq!(
            texts("pytz.tzfile.America/Los_Angeles"),
            vec!["DottedName(\"datetime.tzinfo\")", "End"]
        );
    }

    #[test]
    fn slash_in_name_becomes_any() {
        assert_eq!(texts("foo.bar/baz"), vec!["DottedName(\"Any\")", "End"]);
    }

    #[test]
    fn question_marks_are_dropped() {
        assert_eq!(texts("int?"), vec!["DottedName(\"int\")", "End"]);
    }

    #[test]
    fn whitespace_around_dots_collapses() {
        assert_eq!(
            texts("typing . List"),
            vec!["DottedName(\"typing.List\")", "End"]
        );
    }

    #[test]
    fn colon_qualified_name() {
        assert_eq!(texts("mod:Name"), vec!["DottedName(\"mod:Name\")", "End"]);
    }

    #[test]
    fn pipe_is_a_separator() {
        assert_eq!(
            texts("int | None"),
            vec![
                "DottedName(\"int\")",
                "Separator(\"|\")",
                "DottedName(\"None\")",
                "End",
            ]
        );
    }

    #[test]
    fn empty_input_is_just_end() {
        assert_eq!(texts(""), vec!["End"]);
    }

    #[test]
    fn unknown_character_fails() {
        let err = tokenize_type("<nothing>");
        assert!(matches!(err, Err(ref e) if e.to_string().contains("could not parse")));
    }
}
