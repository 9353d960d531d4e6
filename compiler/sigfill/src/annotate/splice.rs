//! Splicing inferred types into a lexed header.
//!
//! The header's tokens are copied back to text one by one. Argument names
//! without an annotation get the next inferred type, existing annotations
//! and defaults are re-rendered, and the return type is inserted before the
//! final `:` unless the header already has one.

use rustc_hash::FxHashSet;
use sigfill_ir::{list_or, ParseError, Token, TokenKind, TypeRenderer};
use sigfill_parse::Parser;

/// Which argument positions receive an inferred type.
///
/// Positions count argument names plus the bare `*` and `/` markers at
/// argument-list level, in visual order.
#[derive(Debug)]
struct Slots {
    /// Positions that never consume an inferred type.
    skip: FxHashSet<usize>,
    /// Index of the first inferred type to consume.
    first_type: usize,
}

pub(super) struct Splicer<'a> {
    parser: Parser<'a>,
    arg_types: &'a [Vec<Token>],
    return_type: &'a [Token],
    renderer: &'a TypeRenderer,
    /// Renderer for default values, which never drop module qualifiers.
    plain: TypeRenderer,
    /// Next inferred argument type to consume.
    arg_place: usize,
    out: String,
}

impl<'a> Splicer<'a> {
    pub(super) fn new(
        tokens: &'a [Token],
        arg_types: &'a [Vec<Token>],
        return_type: &'a [Token],
        renderer: &'a TypeRenderer,
    ) -> Self {
        Splicer {
            parser: Parser::new(tokens),
            arg_types,
            return_type,
            renderer,
            plain: TypeRenderer::default(),
            arg_place: 0,
            out: String::new(),
        }
    }

    pub(super) fn splice(mut self) -> Result<String, ParseError> {
        self.preamble()?;
        let slots = self.scan_slots()?;
        tracing::trace!(?slots, "argument slots");
        self.arg_place = slots.first_type;
        self.arguments(&slots)?;
        self.ending()?;
        Ok(self.out)
    }

    /// Copy everything up to and including the `(` that opens the argument
    /// list.
    fn preamble(&mut self) -> Result<(), ParseError> {
        let mut seen_def = false;
        loop {
            let token = self.parser.next()?;
            if token.kind == TokenKind::End {
                return Err(ParseError::new("expected argument list, got End"));
            }
            self.push_verbatim(token);
            if token.kind == TokenKind::Definition {
                seen_def = true;
            } else if seen_def && token.is_opener() && token.text() == "(" {
                return Ok(());
            }
        }
    }

    /// Count argument slots up to the closing `)` and work out which ones
    /// take no inferred type. Does not move the parser.
    fn scan_slots(&self) -> Result<Slots, ParseError> {
        let mut skip = FxHashSet::default();
        let mut names = Vec::new();
        let mut depth = 0usize;
        let mut position = 0usize;
        for token in self.parser.rest() {
            if token.kind == TokenKind::End {
                return Err(ParseError::new(
                    "found End token while locating arguments",
                ));
            }
            if token.is_opener() {
                depth += 1;
            } else if token.is_closer() {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            } else if depth == 0 && token.kind == TokenKind::ArgumentName {
                names.push(position);
                position += 1;
            } else if depth == 0 && is_marker(token) {
                skip.insert(position);
                position += 1;
            }
        }

        let types = self.arg_types.len();
        let first_type = types.saturating_sub(names.len());
        // Fewer types than names: the leading names are `self`/`cls`.
        let untyped = names.len().saturating_sub(types);
        skip.extend(names.iter().take(untyped));
        Ok(Slots { skip, first_type })
    }

    /// Copy the argument list, filling in annotations, through its closing
    /// `)`.
    fn arguments(&mut self, slots: &Slots) -> Result<(), ParseError> {
        let mut position = 0usize;
        loop {
            let token = self.parser.next()?;
            match token.kind {
                TokenKind::End => {
                    return Err(ParseError::new("expected ')' closing the argument list"));
                }
                TokenKind::ArgumentName => {
                    self.argument(token, slots.skip.contains(&position))?;
                    position += 1;
                }
                _ => {
                    self.push_verbatim(token);
                    if token.is_closer() {
                        return Ok(());
                    }
                    if is_marker(token) {
                        position += 1;
                    }
                }
            }
        }
    }

    fn argument(&mut self, name: &Token, skipped: bool) -> Result<(), ParseError> {
        self.out.push_str(name.text());
        if self.parser.peek()?.kind == TokenKind::TypeDef {
            self.parser.next()?;
            self.out.push_str(": ");
            self.user_annotation()?;
            if !skipped {
                self.arg_place += 1;
            }
        } else if !skipped {
            let tokens = self.arg_types.get(self.arg_place).ok_or_else(|| {
                ParseError::new(format!("no inferred type left for argument {:?}", name.text()))
            })?;
            let value = Parser::new(tokens).parse_complete()?;
            self.out.push_str(": ");
            self.out.push_str(&self.renderer.render(&value));
            self.arg_place += 1;
        }
        if self.parser.peek()?.kind == TokenKind::DefaultDef {
            self.parser.next()?;
            self.out.push_str(" = ");
            self.user_default()?;
        }
        Ok(())
    }

    /// Re-render an annotation the author wrote, or copy it as-is when it
    /// does not parse as a type.
    fn user_annotation(&mut self) -> Result<(), ParseError> {
        let start = self.parser.position();
        let parsed = self
            .parser
            .parse_type()
            .map(|value| self.renderer.render(&value));
        self.keep_or_copy(start, parsed)
    }

    /// Re-render a default value, or copy it as-is when it does not parse.
    fn user_default(&mut self) -> Result<(), ParseError> {
        let start = self.parser.position();
        let parsed = if self.parser.peek()?.is_opener() {
            self.parser
                .parse_collection()
                .map(|literal| literal.render(&self.plain))
        } else {
            self.parser
                .parse_type()
                .map(|value| self.plain.render(&value))
        };
        self.keep_or_copy(start, parsed)
    }

    /// Keep a re-rendered text when it ends where the annotation or default
    /// ends. Otherwise rewind and copy the original tokens.
    fn keep_or_copy(
        &mut self,
        start: usize,
        parsed: Result<String, ParseError>,
    ) -> Result<(), ParseError> {
        match parsed {
            Ok(text) if is_terminator(self.parser.peek()?) => {
                self.out.push_str(&text);
                Ok(())
            }
            _ => {
                self.parser.set_position(start);
                self.copy_until_terminator()
            }
        }
    }

    /// Copy tokens verbatim up to the next terminator outside brackets.
    fn copy_until_terminator(&mut self) -> Result<(), ParseError> {
        let mut openers: Vec<&str> = Vec::new();
        loop {
            let token = self.parser.peek()?;
            if openers.is_empty() && is_terminator(token) {
                return Ok(());
            }
            if token.kind == TokenKind::End {
                return Err(ParseError::new("unbalanced brackets, got End"));
            }
            if token.is_opener() {
                openers.push(token.text());
            } else if token.is_closer() {
                openers.pop();
            }
            self.parser.next()?;
            // Slice colons stay tight: `a[1:2]`.
            if token.kind == TokenKind::Colon && openers.last() == Some(&"[") {
                self.out.push(':');
            } else {
                self.push_verbatim(token);
            }
        }
    }

    /// Return annotation, the final `:` and whatever follows it.
    fn ending(&mut self) -> Result<(), ParseError> {
        loop {
            let token = self.parser.next()?;
            match token.kind {
                TokenKind::EndDefinition => {
                    let value = Parser::new(self.return_type).parse_complete()?;
                    self.push_arrow();
                    self.out.push_str(&self.renderer.render(&value));
                    self.push_verbatim(token);
                    break;
                }
                TokenKind::ReturnTypeDef => {
                    self.push_arrow();
                    self.user_annotation()?;
                    break;
                }
                TokenKind::EndSeparator if token.is_layout() => self.push_verbatim(token),
                _ => {
                    return Err(ParseError::new(format!(
                        "expected {}, got {token:?}",
                        list_or(&["'ReturnTypeDef'", "'EndDefinition'"])
                    )));
                }
            }
        }
        loop {
            let token = self.parser.next()?;
            if token.kind == TokenKind::End {
                return Ok(());
            }
            self.push_verbatim(token);
        }
    }

    fn push_arrow(&mut self) {
        if self.out.ends_with(char::is_whitespace) {
            self.out.push_str("-> ");
        } else {
            self.out.push_str(" -> ");
        }
    }

    /// Append a token the way it reads in source.
    fn push_verbatim(&mut self, token: &Token) {
        let text = token.text();
        // Source whitespace before a line tail replaces the space added after
        // the previous token.
        if token.is_layout() && text.starts_with([' ', '\t']) && self.out.ends_with(' ') {
            self.out.pop();
        }
        match token.kind {
            TokenKind::Separator if text == "|" => self.out.push_str(" | "),
            TokenKind::Separator | TokenKind::Keyword | TokenKind::Definition => {
                self.out.push_str(text);
                self.out.push(' ');
            }
            TokenKind::TypeDef | TokenKind::Colon => self.out.push_str(": "),
            TokenKind::DefaultDef => self.out.push_str(" = "),
            TokenKind::ReturnTypeDef => self.push_arrow(),
            TokenKind::LambdaBody => {
                if !text.starts_with(':') {
                    self.out.push(' ');
                }
                self.out.push_str(text);
            }
            _ => self.out.push_str(text),
        }
    }
}

/// A bare `*` or `/` parameter marker.
fn is_marker(token: &Token) -> bool {
    token.kind == TokenKind::EndSeparator && matches!(token.text(), "*" | "/")
}

/// Whether `token` ends an annotation or default value.
fn is_terminator(token: &Token) -> bool {
    match token.kind {
        TokenKind::DefaultDef | TokenKind::EndDefinition | TokenKind::End => true,
        TokenKind::Separator => token.text() == ",",
        TokenKind::EndSeparator => token.text() == "," || token.is_closer() || token.is_layout(),
        _ => false,
    }
}
