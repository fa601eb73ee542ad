// Chunk: docs/chunks/document_model - Tree document and position mapping for the highlight overlay

//! lite-edit-doc: the tree-structured document model.
//!
//! This crate provides what the highlight overlay needs from a rich-text
//! document:
//!
//! - [`DocNode`]: the read-only node capability (type, attributes, text, size,
//!   traversal)
//! - [`PositionMapping`]: mapping positions across an edit
//! - [`Node`] and [`Transaction`]: an immutable reference document and the
//!   replace steps that produce new versions of it

mod error;
mod mapping;
mod node;
mod transaction;

pub use error::DocError;
pub use mapping::{Bias, ChangedRange, MapResult, Mapping, PositionMapping, StepMap};
pub use node::{Content, DocNode, Node, Slice};
pub use transaction::{Selection, Transaction};
