//! Type-expression grammar.

use sigfill_ir::{list_or, ParseError, TokenKind, TypeRenderer, TypeValue};

use crate::Parser;

/// Tokens accepted where a name is expected.
const NAME_KINDS: [TokenKind; 1] = [TokenKind::DottedName];

/// A bracketed literal from a default value: `[]`, `(a,)`, `{k: v}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Collection {
    pub open: &'static str,
    pub close: &'static str,
    /// Items, or dict-item pairings for a dict literal.
    pub items: Vec<TypeValue>,
    pub trailing_comma: bool,
}

impl Collection {
    /// Render the literal. Only a one-item tuple keeps its trailing comma.
    pub fn render(&self, renderer: &TypeRenderer) -> String {
        let items: Vec<String> = self.items.iter().map(|item| renderer.render(item)).collect();
        let comma = if self.open == "(" && self.items.len() == 1 && self.trailing_comma {
            ","
        } else {
            ""
        };
        format!("{}{}{comma}{}", self.open, items.join(", "), self.close)
    }
}

impl<'t> Parser<'t> {
    /// Comma-separated types up to (not including) `)` or `]`.
    pub fn parse_type_list(&mut self) -> Result<Vec<TypeValue>, ParseError> {
        let mut types = Vec::new();
        while !matches!(self.lookup()?, ")" | "]") {
            types.push(self.parse_type()?);
            match self.lookup()? {
                "," => self.expect(",")?,
                ")" | "]" => {}
                other => {
                    return Err(ParseError::new(format!(
                        "expected {}, got {other:?}",
                        list_or(&["','", "')'", "']'"])
                    )));
                }
            }
        }
        Ok(types)
    }

    /// `|`-separated singles.
    pub fn parse_union_list(&mut self) -> Result<Vec<TypeValue>, ParseError> {
        let mut types = vec![self.parse_single()?];
        while self.lookup()? == "|" {
            self.expect("|")?;
            types.push(self.parse_single()?);
        }
        Ok(types)
    }

    /// One type without a top-level `|` union.
    pub fn parse_single(&mut self) -> Result<TypeValue, ParseError> {
        if self.lookup()? == "[" {
            // Parameter list of `Callable[[...], ...]`.
            let args = self.bracketed("[", "]")?;
            return Ok(TypeValue::new("", args));
        }
        let name = self.expect_type(&NAME_KINDS)?.text();
        match name {
            "Any" => Ok(TypeValue::leaf("Any")),
            "mypy_extensions.NoReturn" | "typing.NoReturn" => Ok(TypeValue::leaf("NoReturn")),
            "Tuple" => Ok(TypeValue::new(name, self.bracketed("[", "]")?)),
            "Union" => {
                let mut items = self.bracketed("[", "]")?;
                match items.len() {
                    0 => Err(ParseError::new("No items in Union")),
                    1 => Ok(items.remove(0)),
                    _ => Ok(TypeValue::union(items)),
                }
            }
            "lambda" => {
                let body = self.parse_lambda()?;
                let space = if body.starts_with(':') { "" } else { " " };
                Ok(TypeValue::leaf(format!("lambda{space}{body}")))
            }
            "Overload" => Ok(TypeValue::new(name, self.bracketed("(", ")")?)),
            _ if self.lookup()? == "[" => {
                let mut args = self.bracketed("[", "]")?;
                if name == "Optional" && args.len() == 1 {
                    return Ok(TypeValue::optional(args.remove(0)));
                }
                Ok(TypeValue::new(name, args))
            }
            _ => Ok(TypeValue::leaf(name)),
        }
    }

    /// Text of the `LambdaBody` following a `lambda` name.
    pub fn parse_lambda(&mut self) -> Result<&'t str, ParseError> {
        Ok(self.expect_type(&[TokenKind::LambdaBody])?.text())
    }

    /// One type, including `|` unions.
    pub fn parse_type(&mut self) -> Result<TypeValue, ParseError> {
        let first = self.parse_single()?;
        if self.lookup()? != "|" {
            return Ok(first);
        }
        self.expect("|")?;
        let mut args = vec![first];
        args.extend(self.parse_union_list()?);
        Ok(TypeValue::union(args))
    }

    /// One type that must use up the whole stream.
    pub fn parse_complete(&mut self) -> Result<TypeValue, ParseError> {
        let value = self.parse_type()?;
        if self.at_end() {
            Ok(value)
        } else {
            let extra = self.peek()?;
            Err(ParseError::new(format!(
                "expected end of type, got {extra:?}"
            )))
        }
    }

    /// A bracketed literal whose items parse as types.
    ///
    /// A `{...}` literal is a dict when a `:` appears before the first
    /// top-level `,`; its items become dict-item pairings.
    pub fn parse_collection(&mut self) -> Result<Collection, ParseError> {
        let (open, close) = match self.next()?.text() {
            "(" => ("(", ")"),
            "[" => ("[", "]"),
            "{" => ("{", "}"),
            other => {
                return Err(ParseError::new(format!(
                    "expected {}, got {other:?}",
                    list_or(&["'('", "'['", "'{'"])
                )));
            }
        };
        let is_dict = open == "{" && self.dict_ahead();
        let mut items = Vec::new();
        let mut trailing_comma = false;
        while self.lookup()? != close {
            let item = self.parse_type()?;
            let item = if is_dict {
                self.expect(":")?;
                TypeValue::dict_item(item, self.parse_type()?)
            } else {
                item
            };
            items.push(item);
            trailing_comma = false;
            match self.lookup()? {
                "," => {
                    self.next()?;
                    trailing_comma = true;
                }
                text if text == close => {}
                other => {
                    return Err(ParseError::new(format!(
                        "expected ',' or {close:?}, got {other:?}"
                    )));
                }
            }
        }
        self.expect(close)?;
        Ok(Collection {
            open,
            close,
            items,
            trailing_comma,
        })
    }

    /// `open type_list close`.
    fn bracketed(&mut self, open: &str, close: &str) -> Result<Vec<TypeValue>, ParseError> {
        self.expect(open)?;
        let args = self.parse_type_list()?;
        self.expect(close)?;
        Ok(args)
    }

    /// Whether a top-level `:` comes before the first top-level `,` or the
    /// closing brace. Does not consume anything.
    fn dict_ahead(&self) -> bool {
        let mut depth = 0usize;
        for token in self.rest() {
            match token.text() {
                "(" | "[" | "{" if token.is_opener() => depth += 1,
                ")" | "]" | "}" if token.is_closer() => {
                    if depth == 0 {
                        return false;
                    }
                    depth -= 1;
                }
                ":" if depth == 0 => return true,
                "," if depth == 0 => return false,
                _ if token.kind == TokenKind::End => return false,
                _ => {}
            }
        }
        false
    }
}
