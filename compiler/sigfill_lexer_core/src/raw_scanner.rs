//! Raw scanner producing `RawToken`s from a pull-based line source.
//!
//! Lines are fetched on demand through [`LineSource`], so scanning a single
//! function header only touches the lines that header spans. Every token
//! records its start and end position, and [`RawScanner::slice`] recovers the
//! verbatim source between any two positions, across rows.
//!
//! # F-strings
//!
//! An f-string is scanned as a stack of frames. While a frame has no open
//! replacement field (or the innermost field is in its format spec) the
//! scanner produces `FStringMiddle` literal pieces. A `{` opens a field, after
//! which ordinary tokens are produced until the matching top-level `}`. The
//! bracket nesting of each field is tracked in an [`InterpolationDepth`] so
//! that `:` and `}` inside nested brackets do not end the field.

use std::collections::VecDeque;

use crate::cursor::Cursor;
use crate::source::LineSource;
use crate::tag::{Pos, RawTag, RawToken};

const OPERATORS_3: [&str; 5] = ["...", "**=", "//=", ">>=", "<<="];

const OPERATORS_2: [&str; 19] = [
    "->", "**", "//", "<<", ">>", "<=", ">=", "==", "!=", ":=", "+=", "-=", "*=", "/=", "%=",
    "&=", "|=", "^=", "@=",
];

const OPERATORS_1: &[u8] = b"()[]{}:,;.+-*/|&<>=%~^@!";

/// Width of a tab stop when measuring indentation.
const TAB_SIZE: usize = 8;

/// Tracks bracket nesting inside one f-string replacement field.
///
/// Only at the top level does `:` start the format spec and `}` close the
/// field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct InterpolationDepth {
    brace: u32,
    paren: u32,
    bracket: u32,
}

impl InterpolationDepth {
    fn is_top_level(self) -> bool {
        self.brace == 0 && self.paren == 0 && self.bracket == 0
    }

    fn open(&mut self, b: u8) {
        match b {
            b'{' => self.brace += 1,
            b'(' => self.paren += 1,
            b'[' => self.bracket += 1,
            _ => {}
        }
    }

    fn close(&mut self, b: u8) {
        match b {
            b'}' => self.brace = self.brace.saturating_sub(1),
            b')' => self.paren = self.paren.saturating_sub(1),
            b']' => self.bracket = self.bracket.saturating_sub(1),
            _ => {}
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct Field {
    depth: InterpolationDepth,
    in_spec: bool,
}

#[derive(Clone, Debug)]
struct FStringFrame {
    quote: u8,
    triple: bool,
    fields: Vec<Field>,
}

/// Lines fetched so far, relative to the first requested line.
struct LineBuffer<'s, S: LineSource + ?Sized> {
    source: &'s mut S,
    first: usize,
    lines: Vec<String>,
    exhausted: bool,
}

impl<S: LineSource + ?Sized> LineBuffer<'_, S> {
    /// Make sure `row` is loaded. Returns `false` at end of input.
    fn load(&mut self, row: usize) -> bool {
        while self.lines.len() <= row {
            if self.exhausted {
                return false;
            }
            match self.source.line(self.first + self.lines.len()) {
                Some(line) if !line.is_empty() => self.lines.push(line),
                _ => {
                    self.exhausted = true;
                    return false;
                }
            }
        }
        true
    }

    fn get(&self, row: usize) -> &str {
        self.lines.get(row).map_or("", String::as_str)
    }
}

/// Scanner over a [`LineSource`], starting at a given line.
pub struct RawScanner<'s, S: LineSource + ?Sized> {
    lines: LineBuffer<'s, S>,
    row: usize,
    col: usize,
    /// Open brackets, including f-string replacement fields.
    depth: usize,
    indents: Vec<usize>,
    at_line_start: bool,
    line_has_content: bool,
    fstrings: Vec<FStringFrame>,
    pending: VecDeque<RawToken>,
    finished: bool,
    yielded_end: bool,
}

impl<'s, S: LineSource + ?Sized> RawScanner<'s, S> {
    /// Scan `source` starting at the 0-based line `first_line`.
    pub fn new(source: &'s mut S, first_line: usize) -> Self {
        RawScanner {
            lines: LineBuffer {
                source,
                first: first_line,
                lines: Vec::new(),
                exhausted: false,
            },
            row: 0,
            col: 0,
            depth: 0,
            indents: vec![0],
            at_line_start: true,
            line_has_content: false,
            fstrings: Vec::new(),
            pending: VecDeque::new(),
            finished: false,
            yielded_end: false,
        }
    }

    /// Number of physical lines fetched from the source so far.
    pub fn lines_read(&self) -> usize {
        self.lines.lines.len()
    }

    /// A fetched line by row, including its terminator.
    pub fn line(&self, row: usize) -> Option<&str> {
        self.lines.lines.get(row).map(String::as_str)
    }

    /// Verbatim source text between two positions.
    pub fn slice(&self, start: Pos, end: Pos) -> String {
        if end <= start {
            return String::new();
        }
        if start.row == end.row {
            let line = self.lines.get(start.row);
            return line.get(start.col..end.col).unwrap_or("").to_string();
        }
        let mut out = String::new();
        out.push_str(self.lines.get(start.row).get(start.col..).unwrap_or(""));
        for row in start.row + 1..end.row {
            out.push_str(self.lines.get(row));
        }
        out.push_str(self.lines.get(end.row).get(..end.col).unwrap_or(""));
        out
    }

    /// Produce the next token. After the end of input this keeps returning
    /// `EndMarker`.
    pub fn next_token(&mut self) -> RawToken {
        if let Some(token) = self.pending.pop_front() {
            return token;
        }
        if self.finished {
            return self.end_marker();
        }
        if self.in_fstring_literal() {
            return self.fstring_literal();
        }
        loop {
            if !self.lines.load(self.row) {
                return self.finish();
            }
            if self.at_line_start {
                self.at_line_start = false;
                if let Some(token) = self.indentation() {
                    return token;
                }
            }

            let line = self.lines.get(self.row);
            let mut cursor = Cursor::at(line, self.col);
            cursor.eat_whitespace();
            let start = cursor.pos();
            let (b, next, eof) = (cursor.current(), cursor.peek(), cursor.is_eof());
            self.col = start;

            return match b {
                0 if eof => self.line_break(start, ""),
                b'#' => self.comment(start),
                b'\n' => self.line_break(start, "\n"),
                b'\r' if next == b'\n' => self.line_break(start, "\r\n"),
                b'\r' => self.line_break(start, "\r"),
                b'\\' if matches!(next, b'\n' | b'\r') => {
                    self.row += 1;
                    self.col = 0;
                    continue;
                }
                b'0'..=b'9' => self.number(start),
                b'.' if next.is_ascii_digit() => self.number(start),
                b'"' | b'\'' => self.string(start, start),
                b if is_ident_start(b) => self.name(start),
                _ => self.operator(start),
            };
        }
    }

    fn token(&mut self, tag: RawTag, start: usize, end: usize) -> RawToken {
        let text = self.lines.get(self.row).get(start..end).unwrap_or("").to_string();
        self.col = end;
        if !matches!(tag, RawTag::Comment | RawTag::Nl | RawTag::Newline) {
            self.line_has_content = true;
        }
        RawToken::new(tag, text, Pos::new(self.row, start), Pos::new(self.row, end))
    }

    fn end_marker(&self) -> RawToken {
        let pos = Pos::new(self.lines.lines.len(), 0);
        RawToken::new(RawTag::EndMarker, "", pos, pos)
    }

    fn finish(&mut self) -> RawToken {
        if !self.finished {
            self.finished = true;
            let pos = Pos::new(self.lines.lines.len(), 0);
            while self.indents.len() > 1 {
                self.indents.pop();
                self.pending
                    .push_back(RawToken::new(RawTag::Dedent, "", pos, pos));
            }
        }
        match self.pending.pop_front() {
            Some(token) => token,
            None => self.end_marker(),
        }
    }

    /// Indent/dedent bookkeeping at the start of a logical line.
    ///
    /// Blank and comment-only lines leave the indentation untouched.
    fn indentation(&mut self) -> Option<RawToken> {
        let line = self.lines.get(self.row);
        let mut cursor = Cursor::new(line);
        let mut width = 0;
        loop {
            match cursor.current() {
                b' ' => width += 1,
                b'\t' => width = (width / TAB_SIZE + 1) * TAB_SIZE,
                b'\x0c' => width = 0,
                _ => break,
            }
            cursor.advance();
        }
        if cursor.is_eof() || matches!(cursor.current(), b'#' | b'\r' | b'\n') {
            return None;
        }
        let col = cursor.pos();
        let pos = Pos::new(self.row, col);
        let current = self.indents.last().copied().unwrap_or(0);
        if width > current {
            self.indents.push(width);
            let text = line.get(..col).unwrap_or("").to_string();
            return Some(RawToken::new(RawTag::Indent, text, Pos::new(self.row, 0), pos));
        }
        while self.indents.last().is_some_and(|&last| last > width) {
            self.indents.pop();
            self.pending
                .push_back(RawToken::new(RawTag::Dedent, "", pos, pos));
        }
        if self.indents.last().copied().unwrap_or(0) != width {
            self.pending.push_back(RawToken::new(
                RawTag::ErrorToken,
                "unindent does not match any outer indentation level",
                pos,
                pos,
            ));
        }
        self.pending.pop_front()
    }

    fn line_break(&mut self, start: usize, text: &str) -> RawToken {
        let logical = self.depth == 0 && self.fstrings.is_empty();
        let tag = if logical && self.line_has_content {
            RawTag::Newline
        } else {
            RawTag::Nl
        };
        let token = RawToken::new(
            tag,
            text,
            Pos::new(self.row, start),
            Pos::new(self.row, start + text.len()),
        );
        if tag == RawTag::Newline {
            self.line_has_content = false;
        }
        self.row += 1;
        self.col = 0;
        self.at_line_start = logical;
        token
    }

    fn comment(&mut self, start: usize) -> RawToken {
        let mut cursor = Cursor::at(self.lines.get(self.row), start);
        cursor.skip_to_line_end();
        let end = cursor.pos();
        self.token(RawTag::Comment, start, end)
    }

    fn number(&mut self, start: usize) -> RawToken {
        let mut cursor = Cursor::at(self.lines.get(self.row), start);
        let digits = |b: u8| b.is_ascii_digit() || b == b'_';
        if cursor.current() == b'0' && matches!(cursor.peek(), b'x' | b'X' | b'o' | b'O' | b'b' | b'B')
        {
            cursor.advance_n(2);
            cursor.eat_while(|b| b.is_ascii_hexdigit() || b == b'_');
        } else {
            cursor.eat_while(digits);
            if cursor.current() == b'.' {
                cursor.advance();
                cursor.eat_while(digits);
            }
            let signed_exponent =
                matches!(cursor.peek(), b'+' | b'-') && cursor.peek2().is_ascii_digit();
            if matches!(cursor.current(), b'e' | b'E')
                && (cursor.peek().is_ascii_digit() || signed_exponent)
            {
                cursor.advance_n(if signed_exponent { 2 } else { 1 });
                cursor.eat_while(digits);
            }
            if matches!(cursor.current(), b'j' | b'J') {
                cursor.advance();
            }
        }
        let end = cursor.pos();
        self.token(RawTag::Number, start, end)
    }

    /// Identifier, or the prefix of a string literal.
    fn name(&mut self, start: usize) -> RawToken {
        let line = self.lines.get(self.row);
        let mut cursor = Cursor::at(line, start);
        cursor.eat_while(is_ident_continue);
        let end = cursor.pos();
        let word = line.get(start..end).unwrap_or("");
        if is_string_prefix(word) && matches!(cursor.current(), b'"' | b'\'') {
            return self.string(start, end);
        }
        self.token(RawTag::Name, start, end)
    }

    /// String literal whose prefix starts at `start` and quote at `quote_at`.
    fn string(&mut self, start: usize, quote_at: usize) -> RawToken {
        let line = self.lines.get(self.row);
        let prefix = line.get(start..quote_at).unwrap_or("");
        let is_fstring = prefix.bytes().any(|b| matches!(b, b'f' | b'F'));
        let cursor = Cursor::at(line, quote_at);
        let quote = cursor.current();
        let triple = cursor.peek() == quote && cursor.peek2() == quote;
        let body = quote_at + if triple { 3 } else { 1 };

        if is_fstring {
            self.fstrings.push(FStringFrame {
                quote,
                triple,
                fields: Vec::new(),
            });
            return self.token(RawTag::FStringStart, start, body);
        }

        let start_pos = Pos::new(self.row, start);
        let mut row = self.row;
        let mut col = body;
        let end = loop {
            let mut cursor = Cursor::at(self.lines.get(row), col);
            let b = cursor.skip_to_string_delim(quote);
            let pos = cursor.pos();
            match b {
                b'\\' => {
                    cursor.advance();
                    if !matches!(cursor.current(), 0 | b'\n' | b'\r') {
                        cursor.advance();
                        col = cursor.pos();
                        continue;
                    }
                }
                b'\n' | 0 if triple => {}
                b'\n' | 0 => {
                    let end_pos = Pos::new(row, pos);
                    let text = self.slice(start_pos, end_pos);
                    self.row = row;
                    self.col = pos;
                    return RawToken::new(RawTag::ErrorToken, text, start_pos, end_pos);
                }
                _ if triple && !cursor.starts_with(&[quote; 3]) => {
                    col = pos + 1;
                    continue;
                }
                _ => break pos + if triple { 3 } else { 1 },
            }
            // The literal continues on the next physical line.
            row += 1;
            col = 0;
            if !self.lines.load(row) {
                return self.finish();
            }
        };
        let end_pos = Pos::new(row, end);
        let text = self.slice(start_pos, end_pos);
        self.row = row;
        self.col = end;
        self.line_has_content = true;
        RawToken::new(RawTag::String, text, start_pos, end_pos)
    }

    fn operator(&mut self, start: usize) -> RawToken {
        let line = self.lines.get(self.row);
        let rest = line.get(start..).unwrap_or("");
        let len = if OPERATORS_3.iter().any(|op| rest.starts_with(op)) {
            3
        } else if OPERATORS_2.iter().any(|op| rest.starts_with(op)) {
            2
        } else if rest.bytes().next().is_some_and(|b| OPERATORS_1.contains(&b)) {
            1
        } else {
            let width = rest.chars().next().map_or(1, char::len_utf8);
            return self.token(RawTag::ErrorToken, start, start + width);
        };
        let b = rest.as_bytes().first().copied().unwrap_or(0);
        if len == 1 {
            match b {
                b'(' | b'[' | b'{' => {
                    self.depth += 1;
                    if let Some(field) = self.current_field() {
                        field.depth.open(b);
                    }
                }
                b')' | b']' | b'}' => {
                    let closes_field = b == b'}'
                        && self
                            .current_field()
                            .is_some_and(|field| field.depth.is_top_level());
                    self.depth = self.depth.saturating_sub(1);
                    if closes_field {
                        self.close_field();
                    } else if let Some(field) = self.current_field() {
                        field.depth.close(b);
                    }
                }
                b':' => {
                    if let Some(field) = self.current_field() {
                        if field.depth.is_top_level() {
                            field.in_spec = true;
                        }
                    }
                }
                _ => {}
            }
        }
        self.token(RawTag::Op, start, start + len)
    }

    fn current_field(&mut self) -> Option<&mut Field> {
        self.fstrings.last_mut().and_then(|frame| frame.fields.last_mut())
    }

    fn close_field(&mut self) {
        if let Some(frame) = self.fstrings.last_mut() {
            frame.fields.pop();
        }
    }

    fn in_fstring_literal(&self) -> bool {
        self.fstrings
            .last()
            .is_some_and(|frame| frame.fields.last().map_or(true, |field| field.in_spec))
    }

    /// Literal text of the innermost f-string (or of its format spec).
    fn fstring_literal(&mut self) -> RawToken {
        let Some(frame) = self.fstrings.last() else {
            return self.next_token();
        };
        let (quote, triple) = (frame.quote, frame.triple);
        let in_spec = !frame.fields.is_empty();

        if !self.lines.load(self.row) {
            return self.finish();
        }
        let line = self.lines.get(self.row);
        let start = self.col;
        let mut cursor = Cursor::at(line, start);
        loop {
            let b = cursor.skip_to_fstring_delim(quote);
            let pos = cursor.pos();
            match b {
                0 if cursor.is_eof() => {
                    if pos > start {
                        return self.token(RawTag::FStringMiddle, start, pos);
                    }
                    if triple {
                        self.row += 1;
                        self.col = 0;
                        return self.next_token();
                    }
                    self.fstrings.pop();
                    return self.token(RawTag::ErrorToken, start, pos);
                }
                b'\n' => {
                    if triple {
                        let token = self.token(RawTag::FStringMiddle, start, pos + 1);
                        self.row += 1;
                        self.col = 0;
                        return token;
                    }
                    if pos > start {
                        return self.token(RawTag::FStringMiddle, start, pos);
                    }
                    self.fstrings.pop();
                    return self.token(RawTag::ErrorToken, start, pos);
                }
                b'\\' => {
                    cursor.advance();
                    if !matches!(cursor.current(), 0 | b'\n' | b'{' | b'}') {
                        cursor.advance();
                    }
                }
                b'{' if !in_spec && cursor.peek() == b'{' => cursor.advance_n(2),
                b'{' => {
                    if pos > start {
                        return self.token(RawTag::FStringMiddle, start, pos);
                    }
                    self.depth += 1;
                    if let Some(frame) = self.fstrings.last_mut() {
                        frame.fields.push(Field::default());
                    }
                    return self.token(RawTag::Op, pos, pos + 1);
                }
                b'}' if in_spec => {
                    if pos > start {
                        return self.token(RawTag::FStringMiddle, start, pos);
                    }
                    self.depth = self.depth.saturating_sub(1);
                    self.close_field();
                    return self.token(RawTag::Op, pos, pos + 1);
                }
                b'}' if cursor.peek() == b'}' => cursor.advance_n(2),
                b'}' => {
                    if pos > start {
                        return self.token(RawTag::FStringMiddle, start, pos);
                    }
                    return self.token(RawTag::ErrorToken, pos, pos + 1);
                }
                _ if in_spec => cursor.advance(),
                _ if triple && !cursor.starts_with(&[quote; 3]) => cursor.advance(),
                _ => {
                    if pos > start {
                        return self.token(RawTag::FStringMiddle, start, pos);
                    }
                    self.fstrings.pop();
                    let len = if triple { 3 } else { 1 };
                    return self.token(RawTag::FStringEnd, pos, pos + len);
                }
            }
        }
    }
}

impl<S: LineSource + ?Sized> Iterator for RawScanner<'_, S> {
    type Item = RawToken;

    /// Yields every token up to and including the `EndMarker`.
    fn next(&mut self) -> Option<RawToken> {
        if self.yielded_end {
            return None;
        }
        let token = self.next_token();
        if token.tag == RawTag::EndMarker {
            self.yielded_end = true;
        }
        Some(token)
    }
}

/// Tokenize a whole in-memory text.
pub fn tokenize(text: &str) -> Vec<RawToken> {
    let mut source = crate::source::SourceLines::new(text);
    RawScanner::new(&mut source, 0).collect()
}

#[inline]
fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b >= 0x80
}

#[inline]
fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}

fn is_string_prefix(word: &str) -> bool {
    let lower = word.to_ascii_lowercase();
    matches!(
        lower.as_str(),
        "r" | "u" | "b" | "f" | "br" | "rb" | "fr" | "rf"
    )
}

#[cfg(test)]
mod tests;
