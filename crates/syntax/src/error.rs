// Chunk: docs/chunks/syntax_highlighting - Parser construction and parse errors

use thiserror::Error;
use tree_sitter::{IncludedRangesError, LanguageError, QueryError};

/// Errors raised while building or running a tree-sitter parser.
#[derive(Debug, Error)]
pub enum SyntaxError {
    #[error("grammar for {language} is incompatible with this tree-sitter version")]
    Language {
        language: String,
        #[source]
        source: LanguageError,
    },

    #[error("highlight query for {language} failed to compile")]
    Query {
        language: String,
        #[source]
        source: QueryError,
    },

    #[error("invalid inline ranges for {language}")]
    IncludedRanges {
        language: String,
        #[source]
        source: IncludedRangesError,
    },

    #[error("parser for {language} produced no tree")]
    ParseFailed { language: String },

    #[error("unknown language: {0}")]
    UnknownLanguage(String),
}
