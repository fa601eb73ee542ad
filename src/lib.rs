// Chunk: docs/chunks/highlight_overlay - Incremental syntax highlighting overlay for tree documents

//! lite-edit-overlay: syntax highlighting for code nodes inside a rich-text
//! document tree.
//!
//! # Overview
//!
//! The overlay finds the nodes of a document that hold code (by default,
//! `code_block` nodes), works out each node's language, parses its text with
//! tree-sitter, and emits styled ranges in absolute document positions. The
//! editor paints those ranges over the document without the document itself
//! changing.
//!
//! Work is kept proportional to the edit:
//!
//! - A [`PositionCache`] remembers what rendering produced for each node,
//!   keyed by position. After an edit, entries for nodes that are unchanged
//!   follow them to their new positions and are reused without parsing.
//! - Nodes whose text changed are re-parsed incrementally from the edited
//!   parse tree of their previous version.
//! - Transactions that change only the selection map the existing
//!   decorations instead of recomputing them.
//!
//! # Example
//!
//! ```ignore
//! use lite_edit_doc::{Node, Transaction};
//! use lite_edit_overlay::{HighlightConfig, HighlightPlugin};
//! use lite_edit_syntax::LanguageRegistry;
//!
//! let coordinator = HighlightConfig::default().into_coordinator(&LanguageRegistry::new())?;
//! let plugin = HighlightPlugin::new(coordinator);
//!
//! let doc = Node::doc(vec![Node::code_block("rust", "fn main() {}")]);
//! let state = plugin.init(&doc)?;
//!
//! let mut tr = Transaction::new(doc);
//! tr.insert_text(1, "pub ")?;
//! let state = plugin.apply(&state, &tr, tr.doc())?;
//! ```
//!
//! # Extension points
//!
//! [`HighlightCoordinator`] takes a custom [`LanguageResolver`], a custom
//! [`Highlighter`](lite_edit_syntax::Highlighter) for capture-to-class
//! naming, an [`ArtifactPolicy`] choosing what is cached, and pre/post-render
//! hooks that can veto, replace, or observe the rendering of each node.

mod cache;
mod config;
mod coordinator;
mod decoration;
mod engine;
mod error;
mod language;
mod locator;
mod parsers;
mod plugin;

pub use cache::{Artifact, ArtifactPolicy, CacheEntry, PositionCache};
pub use config::HighlightConfig;
pub use coordinator::{
    HighlightCoordinator, PostRenderHook, PreRender, PreRenderHook, Recomputed, DEFAULT_TARGET_TYPE,
};
pub use decoration::{DecorationSet, StyledRange};
pub use engine::{HighlightEngine, Rendered};
pub use error::HighlightError;
pub use language::{default_sources, LanguageResolver, LanguageSource, DETECTED_LANGUAGE_ATTR, PARAMS_ATTR, WILDCARD};
pub use locator::{locate, TargetNode, TargetPos, ROOT_TYPE};
pub use parsers::ParserCollection;
pub use plugin::{HighlightPlugin, HighlightState};
