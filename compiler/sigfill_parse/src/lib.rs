//! Recursive-descent parser for type expressions.
//!
//! The same [`Parser`] reads two kinds of token stream: the tokens of one
//! inferred type string, and the annotation/default fragments inside a
//! function header. Both end in `End`.
//!
//! ```text
//! type      := single ('|' single)*
//! single    := '[' type_list ']' | name ['[' type_list ']']
//! type_list := type (',' type)*
//! ```

mod cursor;
mod grammar;

pub use cursor::Parser;
pub use grammar::Collection;
