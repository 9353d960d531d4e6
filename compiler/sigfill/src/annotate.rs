//! Annotation of one function header from one suggestion.

use std::ffi::OsStr;
use std::path::Path;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use sigfill_ir::{ParseError, Token, TypeRenderer};
use sigfill_lexer::{tokenize_definition, tokenize_type, DefinitionError};
use sigfill_lexer_core::LineSource;

mod splice;

use splice::Splicer;

/// Inferred types for one function.
///
/// `arg_types` follows the visual order of the header's arguments and has no
/// entry for a leading `self`/`cls`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub arg_types: Vec<String>,
    pub return_type: String,
}

/// One suggestion record as the type daemon reports it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub func_name: Option<String>,
    /// 0-based line of the header's first line.
    pub line: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// How many call samples back this suggestion.
    #[serde(default)]
    pub samples: u64,
    pub signature: Signature,
}

impl Suggestion {
    pub fn new(line: usize, signature: Signature) -> Self {
        Suggestion {
            func_name: None,
            line,
            path: None,
            samples: 0,
            signature,
        }
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_samples(mut self, samples: u64) -> Self {
        self.samples = samples;
        self
    }
}

/// The rewritten header and how many source lines it replaces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Annotated {
    pub text: String,
    pub line_count: usize,
}

/// Rewrite the header at `suggestion.line` with the suggested types filled in.
///
/// Annotations already present are re-rendered rather than replaced. The
/// returned text replaces exactly `line_count` lines starting at the header.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(line = suggestion.line, args = suggestion.signature.arg_types.len())
)]
pub fn annotate<S: LineSource + ?Sized>(
    suggestion: &Suggestion,
    source: &mut S,
) -> Result<Annotated, ParseError> {
    let lexed = tokenize_definition(suggestion.line, source)
        .map_err(DefinitionError::into_parse_error)?;

    let signature = &suggestion.signature;
    let arg_types = signature
        .arg_types
        .iter()
        .map(String::as_str)
        .map(tokenize_type)
        .collect::<Result<Vec<Vec<Token>>, _>>()?;
    let return_type = tokenize_type(&signature.return_type)?;

    let renderer = TypeRenderer::new(module_ignore_set(suggestion.path.as_deref()));
    let text = Splicer::new(&lexed.tokens, &arg_types, &return_type, &renderer).splice()?;
    tracing::debug!(line_count = lexed.line_count, "annotated header");
    Ok(Annotated {
        text,
        line_count: lexed.line_count,
    })
}

/// Module names whose qualification is redundant inside `path`.
///
/// That is the file stem, or the package directory for `__init__` files.
pub fn module_ignore_set(path: Option<&str>) -> FxHashSet<String> {
    let mut modules = FxHashSet::default();
    let Some(path) = path.map(Path::new) else {
        return modules;
    };
    let stem = path.file_stem().and_then(OsStr::to_str);
    let module = if stem == Some("__init__") {
        path.parent()
            .and_then(Path::file_name)
            .and_then(OsStr::to_str)
    } else {
        stem
    };
    if let Some(module) = module.filter(|module| !module.is_empty()) {
        modules.insert(module.to_string());
    }
    modules
}
