//! Role-tagged tokens.
//!
//! One token type serves two streams: the type-expression lexer only ever
//! produces `DottedName`, `Separator` and `End`, while the definition lexer
//! uses the whole vocabulary. Kinds form a small "is-a" hierarchy
//! (an `ArgumentDefault` is a `DottedName`, a `TypeDef` is a `Colon`, ...)
//! which consumers query through [`TokenKind::is_a`] instead of matching
//! every leaf kind.

use std::fmt;

/// Token kind.
///
/// The hierarchy, with parents on the left:
///
/// ```text
/// Name ── DottedName ── ArgumentDefault
///      ├─ ArgumentName
///      └─ Keyword ── Definition
/// Operator ── Separator ── EndSeparator
///                       ├─ Colon ── TypeDef
///                       │        └─ EndDefinition
///                       ├─ DefaultDef
///                       └─ ReturnTypeDef
/// FunctionName   LambdaBody   End
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Name,
    /// Identifier such as `List`, `int` or `package.name`.
    DottedName,
    /// Text of an argument default value.
    ArgumentDefault,
    ArgumentName,
    /// `async`.
    Keyword,
    /// `def`.
    Definition,
    FunctionName,
    Operator,
    /// Punctuation followed by one space when re-emitted.
    Separator,
    /// Punctuation or layout text re-emitted without a following space.
    EndSeparator,
    Colon,
    /// `:` introducing an argument annotation.
    TypeDef,
    /// The `:` that ends the header.
    EndDefinition,
    /// `=` introducing a default value.
    DefaultDef,
    /// `->`.
    ReturnTypeDef,
    /// Verbatim text of a lambda after the `lambda` keyword.
    LambdaBody,
    /// Terminates every token stream.
    End,
}

impl TokenKind {
    /// Immediate parent in the kind hierarchy.
    pub const fn parent(self) -> Option<TokenKind> {
        match self {
            TokenKind::DottedName | TokenKind::ArgumentName | TokenKind::Keyword => {
                Some(TokenKind::Name)
            }
            TokenKind::ArgumentDefault => Some(TokenKind::DottedName),
            TokenKind::Definition => Some(TokenKind::Keyword),
            TokenKind::Separator => Some(TokenKind::Operator),
            TokenKind::EndSeparator
            | TokenKind::Colon
            | TokenKind::DefaultDef
            | TokenKind::ReturnTypeDef => Some(TokenKind::Separator),
            TokenKind::TypeDef | TokenKind::EndDefinition => Some(TokenKind::Colon),
            TokenKind::Name
            | TokenKind::FunctionName
            | TokenKind::Operator
            | TokenKind::LambdaBody
            | TokenKind::End => None,
        }
    }

    /// Whether `self` is `ancestor` or one of its descendants.
    pub fn is_a(self, ancestor: TokenKind) -> bool {
        let mut kind = Some(self);
        while let Some(current) = kind {
            if current == ancestor {
                return true;
            }
            kind = current.parent();
        }
        false
    }

    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Name => "Name",
            TokenKind::DottedName => "DottedName",
            TokenKind::ArgumentDefault => "ArgumentDefault",
            TokenKind::ArgumentName => "ArgumentName",
            TokenKind::Keyword => "Keyword",
            TokenKind::Definition => "Definition",
            TokenKind::FunctionName => "FunctionName",
            TokenKind::Operator => "Operator",
            TokenKind::Separator => "Separator",
            TokenKind::EndSeparator => "EndSeparator",
            TokenKind::Colon => "Colon",
            TokenKind::TypeDef => "TypeDef",
            TokenKind::EndDefinition => "EndDefinition",
            TokenKind::DefaultDef => "DefaultDef",
            TokenKind::ReturnTypeDef => "ReturnTypeDef",
            TokenKind::LambdaBody => "LambdaBody",
            TokenKind::End => "End",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A token: a kind and its optional source text.
///
/// Only `End` carries no text.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub text: Option<String>,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Token {
            kind,
            text: Some(text.into()),
        }
    }

    #[inline]
    pub fn end() -> Self {
        Token {
            kind: TokenKind::End,
            text: None,
        }
    }

    /// Text payload, or `""` for `End`.
    #[inline]
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    #[inline]
    pub fn is_a(&self, ancestor: TokenKind) -> bool {
        self.kind.is_a(ancestor)
    }

    /// `EndSeparator` opening a bracket: `(`, `[` or `{`.
    pub fn is_opener(&self) -> bool {
        self.kind == TokenKind::EndSeparator && matches!(self.text(), "(" | "[" | "{")
    }

    /// `EndSeparator` closing a bracket: `)`, `]` or `}`.
    pub fn is_closer(&self) -> bool {
        self.kind == TokenKind::EndSeparator && matches!(self.text(), ")" | "]" | "}")
    }

    /// `EndSeparator` carrying line breaks, indentation, comments or other
    /// verbatim source layout rather than punctuation.
    pub fn is_layout(&self) -> bool {
        self.kind == TokenKind::EndSeparator
            && self
                .text()
                .chars()
                .next()
                .map_or(true, |c| c.is_whitespace() || c == '#' || c == '\\')
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.text {
            Some(text) => write!(f, "{}({text:?})", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests;
