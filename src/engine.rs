// Chunk: docs/chunks/highlight_engine - Parsing one node and emitting document ranges

//! Renders one node: parse its text, classify the tree, and translate the
//! node-local spans into document positions.

use lite_edit_syntax::{highlight_tree, ClassHighlighter, Highlighter, IncrementalParser, SyntaxTree};

use crate::decoration::StyledRange;
use crate::error::HighlightError;
use crate::locator::TargetPos;

/// The output of rendering one node.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    /// Styled ranges in absolute document positions.
    pub ranges: Vec<StyledRange>,
    /// Parse state to seed the next parse of this node.
    pub tree: SyntaxTree,
}

pub struct HighlightEngine {
    highlighter: Box<dyn Highlighter>,
}

impl HighlightEngine {
    pub fn new(highlighter: Box<dyn Highlighter>) -> Self {
        Self { highlighter }
    }

    /// Parses `text` with `parser`, seeded with `prior`, and returns its
    /// ranges shifted to the node's content start.
    pub fn render(
        &self,
        text: &str,
        pos: TargetPos,
        parser: &dyn IncrementalParser,
        prior: Option<&SyntaxTree>,
    ) -> Result<Rendered, HighlightError> {
        let tree = parser.parse(text, prior)?;
        let offset = pos.content_start();

        let mut ranges = Vec::new();
        highlight_tree(&tree, self.highlighter.as_ref(), |from, to, class| {
            ranges.push(StyledRange::new(from + offset, to + offset, class));
        });

        Ok(Rendered { ranges, tree })
    }
}

impl Default for HighlightEngine {
    fn default() -> Self {
        Self::new(Box::new(ClassHighlighter::default()))
    }
}
