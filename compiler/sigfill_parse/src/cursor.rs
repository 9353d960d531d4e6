//! Token cursor for the type parser.
//!
//! Provides lookahead, consumption and the "expected X, got Y" checks the
//! grammar is written in terms of.

use sigfill_ir::{list_or, ParseError, Token, TokenKind};

/// Cursor over a token slice, plus the type grammar (see `grammar`).
///
/// Reading past the final token fails with a [`ParseError`] instead of
/// panicking.
pub struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
}

impl<'t> Parser<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        Parser { tokens, pos: 0 }
    }

    /// Index of the next token to be read.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Rewind or fast-forward to a position from [`Parser::position`].
    pub fn set_position(&mut self, pos: usize) {
        debug_assert!(
            pos <= self.tokens.len(),
            "parser position {} out of bounds (max {})",
            pos,
            self.tokens.len()
        );
        self.pos = pos;
    }

    /// The next token, without consuming it.
    pub fn peek(&self) -> Result<&'t Token, ParseError> {
        self.tokens
            .get(self.pos)
            .ok_or_else(|| ParseError::new("ran out of tokens"))
    }

    /// Consume and return the next token.
    #[allow(
        clippy::should_implement_trait,
        reason = "fallible, so it cannot be Iterator::next"
    )]
    pub fn next(&mut self) -> Result<&'t Token, ParseError> {
        let token = self.peek()?;
        self.pos += 1;
        Ok(token)
    }

    /// Text of the next token (`""` for `End`).
    pub fn lookup(&self) -> Result<&'t str, ParseError> {
        self.peek().map(Token::text)
    }

    /// Consume the next token, which must have exactly `text`.
    pub fn expect(&mut self, text: &str) -> Result<(), ParseError> {
        let token = self.next()?;
        if token.text() == text {
            Ok(())
        } else {
            Err(ParseError::new(format!("expected {text:?}, got {token:?}")))
        }
    }

    /// Consume the next token, which must be one of `kinds` (or a subkind).
    pub fn expect_type(&mut self, kinds: &[TokenKind]) -> Result<&'t Token, ParseError> {
        let token = self.next()?;
        if kinds.iter().any(|&kind| token.is_a(kind)) {
            return Ok(token);
        }
        let names: Vec<String> = kinds.iter().map(|kind| format!("'{kind}'")).collect();
        Err(ParseError::new(format!(
            "expected {}, got {token:?}",
            list_or(&names)
        )))
    }

    /// Step back over the last consumed token.
    pub fn back(&mut self) {
        self.pos = self.pos.saturating_sub(1);
    }

    /// Tokens not consumed yet.
    pub fn rest(&self) -> &'t [Token] {
        self.tokens.get(self.pos..).unwrap_or(&[])
    }

    /// Whether the next token is `End`.
    pub fn at_end(&self) -> bool {
        self.peek().is_ok_and(|token| token.kind == TokenKind::End)
    }
}
