//! Parse failures.

use thiserror::Error;

/// Malformed or unsupported token sequence.
///
/// Raised by every stage (type lexer, definition lexer, parser, synthesizer).
/// A failure is always local to one signature: there is no partial result.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{}", .message.as_deref().unwrap_or("parse error"))]
pub struct ParseError {
    message: Option<String>,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        ParseError {
            message: Some(message.into()),
        }
    }

    /// A parse error without a description.
    pub fn empty() -> Self {
        ParseError { message: None }
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

/// Join alternatives for "expected ..." messages.
///
/// One item is returned as-is, two are joined with `" or "`, three or more
/// are comma separated with `"or "` before the last item.
pub fn list_or<S: AsRef<str>>(values: &[S]) -> String {
    match values {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [first, second] => format!("{} or {}", first.as_ref(), second.as_ref()),
        [init @ .., last] => {
            let mut out = String::new();
            for value in init {
                out.push_str(value.as_ref());
                out.push_str(", ");
            }
            out.push_str("or ");
            out.push_str(last.as_ref());
            out
        }
    }
}
