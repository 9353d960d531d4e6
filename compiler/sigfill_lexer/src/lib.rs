//! Lexers for sigfill.
//!
//! Two independent lexers feed the parser:
//! - [`tokenize_type`] turns one inferred type string (`"Union[int, str]"`)
//!   into `DottedName`/`Separator` tokens.
//! - [`tokenize_definition`] turns the source lines of one function header
//!   into role-tagged tokens (argument names, annotations, defaults, layout),
//!   using the raw scanner from `sigfill_lexer_core` as its substrate.

mod definition;
mod type_lexer;

pub use definition::{tokenize_definition, DefinitionError, LexedDefinition};
pub use type_lexer::tokenize_type;
