//! Low-level tokenizer for Python source, driven by a pull-based line source.
//!
//! The scanner asks for one physical line at a time and never looks back, so
//! a caller can stop as soon as it has what it needs (a single function
//! header, say) without the rest of the file ever being read.
//!
//! Token tags follow the host language's standard tokenizer: `Newline` ends a
//! logical line, `Nl` is a line break inside brackets or on a blank line,
//! `Indent`/`Dedent` track block structure, and f-strings are split into
//! start, middle and end pieces with ordinary tokens for their replacement
//! fields.

mod cursor;
mod raw_scanner;
mod source;
mod tag;

pub use raw_scanner::{tokenize, RawScanner};
pub use source::{LineSource, SourceLines};
pub use tag::{Pos, RawTag, RawToken};
