//! Signature annotation synthesis for Python function headers.
//!
//! Given the source of a `def` header and the argument/return types an
//! external inference tool suggested for it, [`annotate`] rewrites the header
//! with the missing annotations filled in. Layout, comments, defaults and
//! annotations the author already wrote are kept.
//!
//! [`collect_batch`] runs a whole set of suggestions for one function and
//! turns them into a single block to insert into (or replace in) the file.

mod annotate;
mod suggest;

use std::sync::Once;

pub use annotate::{annotate, module_ignore_set, Annotated, Signature, Suggestion};
pub use sigfill_ir::ParseError;
pub use sigfill_lexer_core::{LineSource, SourceLines};
pub use suggest::{
    apply_all, collect_batch, collect_file, suggestion_text, BatchOutcome, SuggestConfig,
    ERROR_MARKER,
};

static TRACING_INIT: Once = Once::new();

/// Initialize the tracing subscriber.
///
/// Only installs a subscriber when `RUST_LOG` is set, so normal runs pay
/// nothing. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(filter)
                .init();
        }
    });
}
