// Chunk: docs/chunks/document_model - Tree document and position mapping for the highlight overlay

use thiserror::Error;

/// Errors raised when a replacement cannot be applied to a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocError {
    #[error("range {from}..{to} is outside content of size {size}")]
    OutOfRange { from: usize, to: usize, size: usize },

    #[error("position {0} is not a node boundary")]
    NotABoundary(usize),

    #[error("position {0} is not on a character boundary")]
    NotCharBoundary(usize),

    #[error("slice does not fit the content at position {pos}")]
    SliceMismatch { pos: usize },
}
