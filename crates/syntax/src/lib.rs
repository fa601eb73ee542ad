// Chunk: docs/chunks/syntax_highlighting - Tree-sitter syntax highlighting

//! lite-edit-syntax: Tree-sitter-based parsing and highlight classification.
//!
//! This crate parses the text of a single document node and turns the
//! resulting tree into classified spans. Parse state is kept and handed back
//! on the next parse so edits re-parse incrementally.
//!
//! # Overview
//!
//! The main types are:
//!
//! - [`LanguageRegistry`]: Maps language names and aliases to grammar configurations.
//!
//! - [`IncrementalParser`] / [`TreeSitterParser`]: Parse text, optionally
//!   seeded with a prior [`SyntaxTree`].
//!
//! - [`Highlighter`] / [`ClassHighlighter`]: Map capture names to class strings.
//!
//! - [`highlight_tree`]: Walks a tree and emits `(from, to, classes)` spans.
//!
//! # Example
//!
//! ```ignore
//! use lite_edit_syntax::{highlight_tree, ClassHighlighter, IncrementalParser, LanguageRegistry, TreeSitterParser};
//!
//! let registry = LanguageRegistry::new();
//! let parser = TreeSitterParser::from_registry(&registry, "rust")?;
//! let tree = parser.parse("fn main() {}", None)?;
//! highlight_tree(&tree, &ClassHighlighter::default(), |from, to, class| {
//!     println!("{from}..{to} {class}");
//! });
//! ```

mod classes;
mod edit;
mod error;
mod highlight;
mod parser;
mod registry;

pub use classes::{ClassHighlighter, Highlighter};
pub use edit::{point_at, TextEdit};
pub use error::SyntaxError;
pub use highlight::highlight_tree;
pub use parser::{IncrementalParser, SyntaxTree, TreeSitterParser};
pub use registry::{InlineLayer, LanguageConfig, LanguageRegistry};
