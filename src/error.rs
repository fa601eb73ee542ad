// Chunk: docs/chunks/highlight_overlay - Incremental syntax highlighting overlay for tree documents

use lite_edit_syntax::SyntaxError;
use thiserror::Error;

/// Errors surfaced by the highlight overlay.
///
/// A missing document, an empty target set, or a node whose language has no
/// parser are not errors; those produce empty results. Parser failures are,
/// and they abort the whole recompute pass.
#[derive(Debug, Error)]
pub enum HighlightError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error("configured language {0:?} is not in the language registry")]
    UnknownLanguage(String),

    #[error("invalid highlight configuration: {0}")]
    Config(#[from] serde_json::Error),
}
