//! Raw token tags and positions.

/// Raw token classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RawTag {
    Name,
    Number,
    String,
    /// Prefix and opening quote of an f-string, e.g. `f"`.
    FStringStart,
    /// Literal text between replacement fields.
    FStringMiddle,
    /// Closing quote of an f-string.
    FStringEnd,
    Op,
    Comment,
    /// End of a logical line.
    Newline,
    /// Line break that does not end a logical line.
    Nl,
    Indent,
    Dedent,
    /// Unrecognized byte or unterminated single-line string.
    ErrorToken,
    EndMarker,
}

/// Position relative to the first requested line.
///
/// `row` counts physical lines, `col` is a byte offset into that line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    #[inline]
    pub const fn new(row: usize, col: usize) -> Self {
        Pos { row, col }
    }
}

/// A raw token with its source text and extent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawToken {
    pub tag: RawTag,
    pub text: String,
    pub start: Pos,
    pub end: Pos,
}

impl RawToken {
    pub fn new(tag: RawTag, text: impl Into<String>, start: Pos, end: Pos) -> Self {
        RawToken {
            tag,
            text: text.into(),
            start,
            end,
        }
    }

    /// Whether this is an `Op` token with exactly `text`.
    #[inline]
    pub fn is_op(&self, text: &str) -> bool {
        self.tag == RawTag::Op && self.text == text
    }
}
