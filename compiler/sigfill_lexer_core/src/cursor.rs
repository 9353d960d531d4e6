//! Byte cursor over a single physical line.
//!
//! `current()` returns `0` once the cursor runs past the end of the line, so
//! callers can dispatch on the byte without a separate bounds check. An
//! interior NUL is told apart from the end by [`Cursor::is_eof`].

/// Returns the earliest (minimum) of two optional positions.
///
/// Combines the results of separate memchr calls when more bytes are needed
/// than `memchr3` handles.
fn earliest_of(a: Option<usize>, b: Option<usize>) -> Option<usize> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x.min(y)),
        (Some(x), None) | (None, Some(x)) => Some(x),
        (None, None) => None,
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    #[inline]
    pub fn new(line: &'a str) -> Self {
        Cursor {
            buf: line.as_bytes(),
            pos: 0,
        }
    }

    /// Cursor starting at byte offset `pos`.
    #[inline]
    pub fn at(line: &'a str, pos: usize) -> Self {
        Cursor {
            buf: line.as_bytes(),
            pos,
        }
    }

    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.buf.len()
    }

    #[inline]
    pub fn current(&self) -> u8 {
        self.byte_at(self.pos)
    }

    #[inline]
    pub fn peek(&self) -> u8 {
        self.byte_at(self.pos + 1)
    }

    #[inline]
    pub fn peek2(&self) -> u8 {
        self.byte_at(self.pos + 2)
    }

    #[inline]
    fn byte_at(&self, pos: usize) -> u8 {
        self.buf.get(pos).copied().unwrap_or(0)
    }

    #[inline]
    pub fn advance(&mut self) {
        self.pos += 1;
    }

    #[inline]
    pub fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    /// Whether the remaining bytes start with `prefix`.
    #[inline]
    pub fn starts_with(&self, prefix: &[u8]) -> bool {
        self.buf
            .get(self.pos..)
            .is_some_and(|rest| rest.starts_with(prefix))
    }

    pub fn eat_while(&mut self, pred: impl Fn(u8) -> bool) {
        while !self.is_eof() && pred(self.current()) {
            self.pos += 1;
        }
    }

    /// Skip spaces, tabs and form feeds.
    pub fn eat_whitespace(&mut self) {
        self.eat_while(|b| matches!(b, b' ' | b'\t' | b'\x0c'));
    }

    /// Skip to the line terminator (or the end of the line).
    pub fn skip_to_line_end(&mut self) {
        let rest = self.rest();
        self.pos += memchr::memchr2(b'\r', b'\n', rest).unwrap_or(rest.len());
    }

    /// Skip to the next `quote`, backslash or newline in a string body.
    ///
    /// Returns the byte stopped at, or `0` at the end of the line.
    pub fn skip_to_string_delim(&mut self, quote: u8) -> u8 {
        let rest = self.rest();
        self.pos += memchr::memchr3(quote, b'\\', b'\n', rest).unwrap_or(rest.len());
        self.current()
    }

    /// Skip to the next byte that is significant inside f-string literal text:
    /// `quote`, `{`, `}`, backslash or newline.
    ///
    /// Returns the byte stopped at, or `0` at the end of the line.
    pub fn skip_to_fstring_delim(&mut self, quote: u8) -> u8 {
        let rest = self.rest();
        let found = earliest_of(
            memchr::memchr3(quote, b'{', b'}', rest),
            memchr::memchr2(b'\\', b'\n', rest),
        );
        self.pos += found.unwrap_or(rest.len());
        self.current()
    }

    fn rest(&self) -> &'a [u8] {
        self.buf.get(self.pos..).unwrap_or(&[])
    }
}
