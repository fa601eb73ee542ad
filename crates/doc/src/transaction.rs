// Chunk: docs/chunks/document_model - Tree document and position mapping for the highlight overlay

//! Transactions: a sequence of replace steps over a document.
//!
//! All positions passed to a transaction are in the coordinates of the
//! document as it is after the steps already added.
//!
//! # Example
//!
//! ```ignore
//! let mut tr = Transaction::new(doc);
//! tr.insert(0, vec![Node::paragraph("intro")])?;
//! tr.insert_text(10, "pub ")?;
//! let new_doc = tr.doc();
//! ```

use crate::error::DocError;
use crate::mapping::{Bias, ChangedRange, MapResult, Mapping, PositionMapping, StepMap};
use crate::node::{Node, Slice};

/// A selection expressed as an anchor and a head position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub anchor: usize,
    pub head: usize,
}

#[derive(Debug, Clone)]
pub struct Transaction {
    before: Node,
    doc: Node,
    mapping: Mapping,
    selection: Option<Selection>,
}

impl Transaction {
    pub fn new(doc: Node) -> Self {
        Transaction {
            before: doc.clone(),
            doc,
            mapping: Mapping::new(),
            selection: None,
        }
    }

    /// Replaces `from..to` with `slice`.
    pub fn replace(&mut self, from: usize, to: usize, slice: Slice) -> Result<&mut Self, DocError> {
        // Validate against the document first; the map assumes `from <= to`.
        let doc = self.doc.replace(from, to, &slice)?;
        let map = StepMap::replace(from, to, slice.size());
        if map.is_empty() {
            return Ok(self);
        }
        self.doc = doc;
        self.mapping.push(map);
        Ok(self)
    }

    /// Inserts block nodes at a child boundary.
    pub fn insert(&mut self, pos: usize, nodes: Vec<Node>) -> Result<&mut Self, DocError> {
        self.replace(pos, pos, Slice::Nodes(nodes))
    }

    /// Inserts text inside a text-content node.
    pub fn insert_text(&mut self, pos: usize, text: &str) -> Result<&mut Self, DocError> {
        self.replace(pos, pos, Slice::Text(text.to_string()))
    }

    pub fn delete(&mut self, from: usize, to: usize) -> Result<&mut Self, DocError> {
        self.replace(from, to, Slice::Empty)
    }

    /// Records a selection change. Does not modify the document.
    pub fn set_selection(&mut self, anchor: usize, head: usize) -> &mut Self {
        self.selection = Some(Selection { anchor, head });
        self
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// The document after all steps.
    pub fn doc(&self) -> &Node {
        &self.doc
    }

    /// The document before the first step.
    pub fn before(&self) -> &Node {
        &self.before
    }

    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    pub fn doc_changed(&self) -> bool {
        !self.mapping.maps().is_empty()
    }
}

impl PositionMapping for Transaction {
    fn map_result_with(&self, pos: usize, bias: Bias) -> MapResult {
        self.mapping.map_result_with(pos, bias)
    }

    fn changed_ranges(&self) -> Vec<ChangedRange> {
        self.mapping.changed_ranges()
    }

    fn doc_changed(&self) -> bool {
        Transaction::doc_changed(self)
    }
}
