//! Sigfill IR - shared data types
//!
//! This crate contains the data structures passed between the stages of
//! signature synthesis:
//! - `Token` and `TokenKind` for both the type-expression and definition lexers
//! - `TypeValue` trees produced by the parser
//! - `TypeRenderer` for turning a `TypeValue` back into source text
//! - `ParseError`, the single failure type surfaced to callers
//!
//! Nothing in here performs I/O or holds global state, so every type is
//! `Send + Sync` and can be used from independent threads.

mod error;
mod token;
mod type_value;

pub use error::{list_or, ParseError};
pub use token::{Token, TokenKind};
pub use type_value::{TypeRenderer, TypeValue, DICT_ITEM, TYPING_LOWER};
