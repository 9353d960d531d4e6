//! Lexer for function-definition headers.
//!
//! Drives a [`RawScanner`] over the header's source lines and classifies each
//! raw token by its role: argument name, annotation fragment, default-value
//! text, parameter marker or layout. Layout (line breaks, indentation and
//! comments) is kept as `EndSeparator` text so a multi-line header can be
//! reproduced with its original shape.
//!
//! Scanning stops at the `:` that ends the header. Lines are pulled from the
//! source only as the scanner needs them, so the reported line count is the
//! number of physical lines the header spans.

use sigfill_ir::{ParseError, Token, TokenKind};
use sigfill_lexer_core::{LineSource, Pos, RawScanner, RawTag, RawToken};
use thiserror::Error;

/// Operators that fold into default-value text as binary operators.
const BINARY_OPERATORS: [&str; 19] = [
    "+", "-", "*", "/", "//", "%", "**", "@", "^", "&", "|", ">>", "<<", "==", "!=", "<", ">",
    "<=", ">=",
];

/// Operators that may also appear in prefix position.
const UNARY_OPERATORS: [&str; 5] = ["-", "+", "~", "*", "**"];

/// Failure while lexing a definition header.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DefinitionError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The source ran out before the header's final `:`.
    #[error("reached end of input while reading function definition")]
    EndOfInput,
}

impl DefinitionError {
    /// Collapse into the single error kind callers see.
    pub fn into_parse_error(self) -> ParseError {
        match self {
            DefinitionError::Parse(err) => err,
            DefinitionError::EndOfInput => {
                ParseError::new("reached end of input, expected end of definition")
            }
        }
    }
}

/// Tokens of one header plus the number of source lines it spans.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LexedDefinition {
    pub tokens: Vec<Token>,
    pub line_count: usize,
}

/// Lex the header starting at the 0-based `start_line`.
///
/// The returned token list always ends with `End`.
#[tracing::instrument(level = "debug", skip(source))]
pub fn tokenize_definition<S: LineSource + ?Sized>(
    start_line: usize,
    source: &mut S,
) -> Result<LexedDefinition, DefinitionError> {
    let mut lexer = DefinitionLexer::new(RawScanner::new(source, start_line));
    lexer.run()?;
    lexer.tokens.push(Token::end());
    let line_count = lexer.scanner.lines_read();
    tracing::debug!(tokens = lexer.tokens.len(), line_count, "lexed definition");
    Ok(LexedDefinition {
        tokens: lexer.tokens,
        line_count,
    })
}

/// Scanning state for one header.
#[derive(Clone, Copy, Debug, Default)]
struct HeaderScan {
    /// Seen `def`.
    has_def: bool,
    /// Seen the `(` opening the argument list.
    def_started: bool,
    brackets: usize,
    /// Non-zero inside an argument or return annotation.
    type_depth: usize,
    /// Non-zero inside a default value.
    default_depth: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Done,
}

struct DefinitionLexer<'s, S: LineSource + ?Sized> {
    scanner: RawScanner<'s, S>,
    /// A raw token handed back by a sub-scan that read one token too far.
    pushback: Option<RawToken>,
    tokens: Vec<Token>,
    state: HeaderScan,
    /// End of the last significant token.
    last_end: Option<Pos>,
    /// Row whose leading layout has already been emitted.
    row_started: Option<usize>,
    /// The previous row ended in a line-break token (not a backslash join).
    line_broken: bool,
}

impl<'s, S: LineSource + ?Sized> DefinitionLexer<'s, S> {
    fn new(scanner: RawScanner<'s, S>) -> Self {
        DefinitionLexer {
            scanner,
            pushback: None,
            tokens: Vec::new(),
            state: HeaderScan::default(),
            last_end: None,
            row_started: None,
            line_broken: false,
        }
    }

    fn next_raw(&mut self) -> RawToken {
        match self.pushback.take() {
            Some(raw) => raw,
            None => self.scanner.next_token(),
        }
    }

    fn run(&mut self) -> Result<(), DefinitionError> {
        loop {
            let raw = self.next_raw();
            match raw.tag {
                RawTag::Indent | RawTag::Dedent => {}
                RawTag::EndMarker => return Err(DefinitionError::EndOfInput),
                RawTag::ErrorToken => {
                    return Err(ParseError::new(format!(
                        "unrecognized source text {:?}",
                        raw.text
                    ))
                    .into());
                }
                RawTag::Newline | RawTag::Nl => self.line_break(&raw),
                RawTag::Comment => self.comment(&raw),
                RawTag::Name => {
                    self.layout(raw.start);
                    self.name(raw)?;
                }
                RawTag::Number | RawTag::String => {
                    self.layout(raw.start);
                    self.operand(&raw.text);
                    self.mark(raw.end);
                }
                RawTag::FStringStart => {
                    self.layout(raw.start);
                    let end = self.fstring(raw.start)?;
                    self.mark(end);
                }
                RawTag::FStringMiddle | RawTag::FStringEnd => {
                    return Err(ParseError::new(format!(
                        "unexpected f-string fragment {:?}",
                        raw.text
                    ))
                    .into());
                }
                RawTag::Op => {
                    self.layout(raw.start);
                    if self.op(&raw)? == Flow::Done {
                        return Ok(());
                    }
                }
            }
        }
    }

    fn push(&mut self, kind: TokenKind, text: impl Into<String>) {
        let token = Token::new(kind, text);
        tracing::trace!(?token, "definition token");
        self.tokens.push(token);
    }

    fn last_kind(&self) -> Option<TokenKind> {
        self.tokens.last().map(|token| token.kind)
    }

    /// Append to the text of the last token.
    fn extend_last(&mut self, text: &str) {
        if let Some(last) = self.tokens.last_mut() {
            last.text.get_or_insert_with(String::new).push_str(text);
        }
    }

    fn mark(&mut self, end: Pos) {
        self.last_end = Some(end);
        self.row_started = Some(end.row);
    }

    /// Emit the layout preceding the first token of a new row.
    fn layout(&mut self, start: Pos) {
        if self.row_started == Some(start.row) {
            return;
        }
        if let Some(last) = self.last_end {
            if !self.line_broken && last.row < start.row {
                // Backslash join: keep the rest of the previous line.
                let tail = self
                    .scanner
                    .line(last.row)
                    .and_then(|line| line.get(last.col..))
                    .unwrap_or("")
                    .to_string();
                if !tail.is_empty() {
                    self.push(TokenKind::EndSeparator, tail);
                }
            }
        }
        let indent = self
            .scanner
            .line(start.row)
            .and_then(|line| line.get(..start.col))
            .unwrap_or("")
            .to_string();
        if !indent.is_empty() {
            self.push(TokenKind::EndSeparator, indent);
        }
        self.row_started = Some(start.row);
        self.line_broken = false;
    }

    /// A separator right before a line break or comment needs no space.
    fn demote_trailing_separator(&mut self) {
        if let Some(last) = self.tokens.last_mut() {
            if last.kind == TokenKind::Separator {
                last.kind = TokenKind::EndSeparator;
            }
        }
    }

    fn line_break(&mut self, raw: &RawToken) {
        self.demote_trailing_separator();
        if !raw.text.is_empty() {
            self.push(TokenKind::EndSeparator, raw.text.as_str());
        }
        self.line_broken = true;
        self.last_end = Some(raw.end);
    }

    fn comment(&mut self, raw: &RawToken) {
        let gap = match self.last_end {
            Some(last) if last.row == raw.start.row && self.row_started == Some(last.row) => self
                .scanner
                .line(last.row)
                .and_then(|line| line.get(last.col..raw.start.col))
                .unwrap_or("")
                .to_string(),
            _ => String::new(),
        };
        self.layout(raw.start);
        self.demote_trailing_separator();
        self.push(TokenKind::EndSeparator, gap + &raw.text);
        self.mark(raw.end);
    }

    fn name(&mut self, raw: RawToken) -> Result<(), DefinitionError> {
        let text = raw.text.as_str();
        let state = self.state;
        if text == "async" && !state.def_started {
            self.push(TokenKind::Keyword, text);
        } else if text == "def" && !state.def_started {
            if state.has_def {
                return Err(ParseError::new("did not expect second definition keyword").into());
            }
            self.push(TokenKind::Definition, text);
            self.state.has_def = true;
        } else if !state.def_started {
            self.push_or_extend_dotted(TokenKind::FunctionName, text);
        } else if state.type_depth > 0 {
            self.push_or_extend_dotted(TokenKind::DottedName, text);
        } else if state.default_depth > 0 && text == "lambda" {
            self.push(TokenKind::ArgumentDefault, text);
            let (body, end) = self.lambda_body(raw.end)?;
            self.push(TokenKind::LambdaBody, body);
            self.mark(end);
            return Ok(());
        } else if state.default_depth > 0 {
            self.operand(text);
        } else {
            self.push(TokenKind::ArgumentName, text);
        }
        self.mark(raw.end);
        Ok(())
    }

    /// Continue a dotted name (`pkg.` + `mod`) or start a new one.
    fn push_or_extend_dotted(&mut self, kind: TokenKind, text: &str) {
        let continues = self.tokens.last().is_some_and(|last| {
            (last.kind == kind || last.is_a(TokenKind::DottedName)) && last.text().ends_with('.')
        });
        if continues {
            self.extend_last(text);
        } else {
            self.push(kind, text);
        }
    }

    /// Fold a literal or name into the current default-value text.
    fn operand(&mut self, text: &str) {
        match self.tokens.last_mut() {
            Some(last) if last.kind == TokenKind::ArgumentDefault => {
                let current = last.text.get_or_insert_with(String::new);
                if ends_with_operand(current) && starts_with_operand(text) {
                    current.push(' ');
                }
                current.push_str(text);
            }
            _ => self.push(TokenKind::ArgumentDefault, text),
        }
    }

    /// Fold an operator into the current default-value text.
    fn operator(&mut self, op: &str) -> Result<(), ParseError> {
        match self.tokens.last_mut() {
            Some(last) if last.kind == TokenKind::ArgumentDefault => {
                let current = last.text.get_or_insert_with(String::new);
                let trimmed = current.trim_end();
                if op != "~" && ends_with_operand(trimmed) {
                    *current = format!("{trimmed} {op} ");
                } else {
                    current.push_str(op);
                }
                Ok(())
            }
            Some(last) if last.is_closer() => {
                self.push(TokenKind::ArgumentDefault, format!(" {op} "));
                Ok(())
            }
            _ if UNARY_OPERATORS.contains(&op) => {
                self.push(TokenKind::ArgumentDefault, op);
                Ok(())
            }
            _ => Err(ParseError::new(format!(
                "unexpected operator {op:?} in function definition"
            ))),
        }
    }

    fn op(&mut self, raw: &RawToken) -> Result<Flow, DefinitionError> {
        let text = raw.text.as_str();
        match text {
            "(" | "[" | "{" => {
                let opens_arguments = text == "("
                    && self.state.has_def
                    && !self.state.def_started
                    && self.state.brackets == 0;
                if opens_arguments {
                    self.state.def_started = true;
                }
                self.state.brackets += 1;
                if self.state.type_depth > 0 {
                    self.state.type_depth += 1;
                }
                if self.state.default_depth > 0 {
                    self.state.default_depth += 1;
                }
                self.push(TokenKind::EndSeparator, text);
            }
            ")" | "]" | "}" => {
                self.state.brackets = self.state.brackets.saturating_sub(1);
                self.state.type_depth = self.state.type_depth.saturating_sub(1);
                self.state.default_depth = self.state.default_depth.saturating_sub(1);
                self.push(TokenKind::EndSeparator, text);
            }
            "*" | "**" | "/" if self.state.default_depth == 0 => {
                self.push(TokenKind::EndSeparator, text);
            }
            "," => {
                if self.state.type_depth == 1 {
                    self.state.type_depth = 0;
                }
                if self.state.default_depth == 1 {
                    self.state.default_depth = 0;
                }
                self.push(TokenKind::Separator, text);
            }
            "->" => {
                self.state.type_depth = 1;
                self.push(TokenKind::ReturnTypeDef, text);
            }
            ":" if self.state.def_started && self.state.brackets == 0 => {
                self.state.type_depth = 0;
                self.push(TokenKind::EndDefinition, text);
                self.header_tail(raw.end);
                return Ok(Flow::Done);
            }
            ":" if self.state.default_depth > 0 => self.push(TokenKind::Colon, text),
            ":" => {
                self.state.type_depth = 1;
                self.push(TokenKind::TypeDef, text);
            }
            // Keyword argument inside a call in a default value.
            "=" if self.state.default_depth > 1 => {
                if self.last_kind() == Some(TokenKind::ArgumentDefault) {
                    self.extend_last(text);
                } else {
                    self.push(TokenKind::ArgumentDefault, text);
                }
            }
            "=" => {
                self.state.type_depth = 0;
                self.state.default_depth = 1;
                self.push(TokenKind::DefaultDef, text);
            }
            "." => match self.last_kind() {
                Some(TokenKind::DottedName | TokenKind::ArgumentDefault | TokenKind::FunctionName) => {
                    self.extend_last(text);
                }
                _ if self.state.default_depth > 0 => self.push(TokenKind::ArgumentDefault, text),
                _ => {
                    return Err(ParseError::new("unexpected \".\" in function definition").into());
                }
            },
            "..." => self.push(TokenKind::DottedName, text),
            "@" if !self.state.has_def => self.push(TokenKind::EndSeparator, text),
            "|" if self.state.default_depth == 0 => self.push(TokenKind::Separator, text),
            _ if BINARY_OPERATORS.contains(&text) || UNARY_OPERATORS.contains(&text) => {
                self.operator(text)?;
            }
            _ => {
                return Err(ParseError::new(format!(
                    "unexpected operator {text:?} in function definition"
                ))
                .into());
            }
        }
        self.mark(raw.end);
        Ok(Flow::Continue)
    }

    /// Keep whatever follows the final `:` on its line (a comment or a
    /// one-line body).
    fn header_tail(&mut self, colon_end: Pos) {
        let tail = self
            .scanner
            .line(colon_end.row)
            .and_then(|line| line.get(colon_end.col..))
            .unwrap_or("")
            .trim_end_matches(['\r', '\n'])
            .to_string();
        if !tail.trim().is_empty() {
            self.push(TokenKind::EndSeparator, tail);
        }
        self.mark(colon_end);
    }

    /// Capture a lambda body verbatim, starting right after `lambda`.
    ///
    /// The body ends before a top-level `,`, line break or comment once the
    /// lambda's own `:` was seen, or before a closing bracket that belongs to
    /// an enclosing construct. The stopping token is handed back so the
    /// caller still sees it.
    fn lambda_body(&mut self, lambda_end: Pos) -> Result<(String, Pos), DefinitionError> {
        let mut depth = 0usize;
        let mut seen_colon = false;
        let mut end = lambda_end;
        loop {
            let raw = self.next_raw();
            let stop = match raw.tag {
                RawTag::EndMarker => return Err(DefinitionError::EndOfInput),
                RawTag::ErrorToken => {
                    return Err(ParseError::new(format!(
                        "unrecognized source text {:?} in lambda",
                        raw.text
                    ))
                    .into());
                }
                RawTag::Op => match raw.text.as_str() {
                    "(" | "[" | "{" => {
                        depth += 1;
                        false
                    }
                    ")" | "]" | "}" if depth == 0 => true,
                    ")" | "]" | "}" => {
                        depth -= 1;
                        false
                    }
                    ":" if depth == 0 => {
                        seen_colon = true;
                        false
                    }
                    "," => depth == 0 && seen_colon,
                    _ => false,
                },
                RawTag::Newline | RawTag::Nl | RawTag::Comment => depth == 0 && seen_colon,
                _ => false,
            };
            if stop {
                self.pushback = Some(raw);
                break;
            }
            end = raw.end;
        }
        let body = self.scanner.slice(lambda_end, end).trim().to_string();
        Ok((body, end))
    }

    /// Capture an f-string verbatim, nested f-strings included.
    fn fstring(&mut self, start: Pos) -> Result<Pos, DefinitionError> {
        let mut nesting = 1usize;
        loop {
            let raw = self.next_raw();
            match raw.tag {
                RawTag::EndMarker => return Err(DefinitionError::EndOfInput),
                RawTag::ErrorToken => {
                    return Err(ParseError::new(format!(
                        "unterminated f-string near {:?}",
                        raw.text
                    ))
                    .into());
                }
                RawTag::FStringStart => nesting += 1,
                RawTag::FStringEnd => {
                    nesting -= 1;
                    if nesting == 0 {
                        let text = self.scanner.slice(start, raw.end);
                        self.operand(&text);
                        return Ok(raw.end);
                    }
                }
                _ => {}
            }
        }
    }
}

fn is_operand_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '\'' | '"')
}

fn ends_with_operand(text: &str) -> bool {
    text.chars().next_back().is_some_and(is_operand_char)
}

fn starts_with_operand(text: &str) -> bool {
    text.chars().next().is_some_and(is_operand_char)
}
