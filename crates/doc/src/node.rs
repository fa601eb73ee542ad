// Chunk: docs/chunks/document_model - Tree document and position mapping for the highlight overlay

//! Document nodes and the `DocNode` capability.
//!
//! A document is a tree of immutable nodes. Every node occupies
//! `content_size + 2` positions: one for its opening boundary, its content,
//! and one for its closing boundary. Text content counts one position per
//! byte. The root's content starts at position 0, so the position of a child
//! of the root is the sum of the sizes of its preceding siblings.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::DocError;

/// The document capability consumed by the highlight overlay.
///
/// `PartialEq` is structural equality: two nodes are equal iff their type,
/// attributes and full content are equal.
pub trait DocNode: Clone + PartialEq + fmt::Debug {
    /// The structural type name (e.g. `"code_block"`).
    fn type_name(&self) -> &str;

    /// Returns the value of an attribute, if set.
    fn attr(&self, name: &str) -> Option<&str>;

    /// Returns true for block-level nodes.
    fn is_block(&self) -> bool;

    /// The concatenated text of this node's content.
    fn text_content(&self) -> Cow<'_, str>;

    /// Number of positions this node occupies, boundaries included.
    fn node_size(&self) -> usize;

    /// Size of the content, excluding the two boundary positions.
    fn content_size(&self) -> usize {
        self.node_size().saturating_sub(2)
    }

    /// Walks all descendants depth-first in document order.
    ///
    /// `f` receives each node and its absolute position (relative to the start
    /// of this node's content) and returns whether to descend into its children.
    fn descendants<'a, F>(&'a self, f: F)
    where
        F: FnMut(&'a Self, usize) -> bool;

    /// Returns the node starting directly at `pos`, searching nested content.
    fn node_at(&self, pos: usize) -> Option<&Self>;
}

/// The content of a node: either a run of text or a list of child nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Children(Vec<Node>),
}

impl Content {
    fn size(&self) -> usize {
        match self {
            Content::Text(text) => text.len(),
            Content::Children(children) => children.iter().map(Node::node_size).sum(),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
struct NodeData {
    kind: String,
    attrs: BTreeMap<String, String>,
    inline: bool,
    content: Content,
    size: usize,
}

/// An immutable, cheaply clonable document node.
#[derive(Clone, PartialEq, Eq)]
pub struct Node(Arc<NodeData>);

impl Node {
    fn build<K, V>(kind: &str, attrs: impl IntoIterator<Item = (K, V)>, inline: bool, content: Content) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let size = content.size() + 2;
        Node(Arc::new(NodeData {
            kind: kind.to_string(),
            attrs: attrs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            inline,
            content,
            size,
        }))
    }

    /// Creates a block whose content is text (a code block, a paragraph).
    pub fn textblock<K, V>(kind: &str, attrs: impl IntoIterator<Item = (K, V)>, text: &str) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::build(kind, attrs, false, Content::Text(text.to_string()))
    }

    /// Creates a block that holds child nodes (a blockquote, a list item).
    pub fn container<K, V>(kind: &str, attrs: impl IntoIterator<Item = (K, V)>, children: Vec<Node>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::build(kind, attrs, false, Content::Children(children))
    }

    /// Creates an inline node with text content.
    pub fn inline<K, V>(kind: &str, attrs: impl IntoIterator<Item = (K, V)>, text: &str) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::build(kind, attrs, true, Content::Text(text.to_string()))
    }

    /// Creates a `doc` root holding `children`.
    pub fn doc(children: Vec<Node>) -> Self {
        Self::container("doc", no_attrs(), children)
    }

    /// Creates a `doc` root whose content is plain text.
    pub fn text_doc(text: &str) -> Self {
        Self::textblock("doc", no_attrs(), text)
    }

    /// Shorthand for a `code_block` whose `params` attribute names the language.
    pub fn code_block(params: &str, code: &str) -> Self {
        Self::textblock("code_block", [("params", params)], code)
    }

    /// Shorthand for a `paragraph` of plain text.
    pub fn paragraph(text: &str) -> Self {
        Self::textblock("paragraph", no_attrs(), text)
    }

    pub fn content(&self) -> &Content {
        &self.0.content
    }

    pub fn children(&self) -> &[Node] {
        match &self.0.content {
            Content::Children(children) => children,
            Content::Text(_) => &[],
        }
    }

    pub fn attrs(&self) -> &BTreeMap<String, String> {
        &self.0.attrs
    }

    /// Returns a copy of this node with attribute `name` set to `value`.
    pub fn with_attr(&self, name: &str, value: &str) -> Self {
        let mut attrs = self.0.attrs.clone();
        attrs.insert(name.to_string(), value.to_string());
        Self::build(&self.0.kind, attrs, self.0.inline, self.0.content.clone())
    }

    fn with_content(&self, content: Content) -> Self {
        Self::build(&self.0.kind, self.0.attrs.clone(), self.0.inline, content)
    }

    fn walk<'a>(&'a self, base: usize, f: &mut dyn FnMut(&'a Node, usize) -> bool) {
        let mut pos = base;
        for child in self.children() {
            if f(child, pos) {
                child.walk(pos + 1, f);
            }
            pos += child.node_size();
        }
    }

    /// Replaces the content between `from` and `to` (relative to this node's
    /// content start) with `slice`, returning the new node.
    ///
    /// The range must either lie strictly inside one child, or start and end
    /// on child boundaries of this node. Text content accepts text slices,
    /// child lists accept node slices; `Slice::Empty` deletes in both.
    pub(crate) fn replace(&self, from: usize, to: usize, slice: &Slice) -> Result<Node, DocError> {
        let size = self.content_size();
        if from > to || to > size {
            return Err(DocError::OutOfRange { from, to, size });
        }

        match &self.0.content {
            Content::Text(text) => {
                let insert = match slice {
                    Slice::Text(text) => text.as_str(),
                    Slice::Empty => "",
                    Slice::Nodes(_) => return Err(DocError::SliceMismatch { pos: from }),
                };
                for pos in [from, to] {
                    if !text.is_char_boundary(pos) {
                        return Err(DocError::NotCharBoundary(pos));
                    }
                }
                let mut replaced = String::with_capacity(text.len() - (to - from) + insert.len());
                replaced.push_str(&text[..from]);
                replaced.push_str(insert);
                replaced.push_str(&text[to..]);
                Ok(self.with_content(Content::Text(replaced)))
            }
            Content::Children(children) => {
                let mut offset = 0;
                for (idx, child) in children.iter().enumerate() {
                    let end = offset + child.node_size();
                    if offset < from && to < end {
                        let inner = child.replace(from - offset - 1, to - offset - 1, slice)?;
                        let mut replaced = children.clone();
                        replaced[idx] = inner;
                        return Ok(self.with_content(Content::Children(replaced)));
                    }
                    offset = end;
                }

                let nodes: &[Node] = match slice {
                    Slice::Nodes(nodes) => nodes,
                    Slice::Empty => &[],
                    Slice::Text(_) => return Err(DocError::SliceMismatch { pos: from }),
                };
                let start = boundary_index(children, from).ok_or(DocError::NotABoundary(from))?;
                let end = boundary_index(children, to).ok_or(DocError::NotABoundary(to))?;

                let mut replaced = Vec::with_capacity(children.len() - (end - start) + nodes.len());
                replaced.extend_from_slice(&children[..start]);
                replaced.extend_from_slice(nodes);
                replaced.extend_from_slice(&children[end..]);
                Ok(self.with_content(Content::Children(replaced)))
            }
        }
    }
}

/// Returns the index of the child that starts at `pos`, or `children.len()`
/// when `pos` is the end of the content.
fn boundary_index(children: &[Node], pos: usize) -> Option<usize> {
    let mut offset = 0;
    for (idx, child) in children.iter().enumerate() {
        if offset == pos {
            return Some(idx);
        }
        if offset > pos {
            return None;
        }
        offset += child.node_size();
    }
    (offset == pos).then_some(children.len())
}

fn no_attrs() -> [(&'static str, &'static str); 0] {
    []
}

impl DocNode for Node {
    fn type_name(&self) -> &str {
        &self.0.kind
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.0.attrs.get(name).map(String::as_str)
    }

    fn is_block(&self) -> bool {
        !self.0.inline
    }

    fn text_content(&self) -> Cow<'_, str> {
        match &self.0.content {
            Content::Text(text) => Cow::Borrowed(text),
            Content::Children(children) => {
                let mut text = String::new();
                for child in children {
                    text.push_str(&child.text_content());
                }
                Cow::Owned(text)
            }
        }
    }

    fn node_size(&self) -> usize {
        self.0.size
    }

    fn descendants<'a, F>(&'a self, mut f: F)
    where
        F: FnMut(&'a Self, usize) -> bool,
    {
        self.walk(0, &mut f);
    }

    fn node_at(&self, pos: usize) -> Option<&Self> {
        let mut offset = 0;
        for child in self.children() {
            let end = offset + child.node_size();
            if pos == offset {
                return Some(child);
            }
            if pos < end {
                return child.node_at(pos - offset - 1);
            }
            offset = end;
        }
        None
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("Node");
        out.field("type", &self.0.kind);
        if !self.0.attrs.is_empty() {
            out.field("attrs", &self.0.attrs);
        }
        match &self.0.content {
            Content::Text(text) => out.field("text", text),
            Content::Children(children) => out.field("children", children),
        };
        out.finish()
    }
}

/// Replacement content for a `Transaction` step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slice {
    /// Deletes the range.
    Empty,
    /// Text inserted into a text-content node.
    Text(String),
    /// Nodes inserted between children of a container.
    Nodes(Vec<Node>),
}

impl Slice {
    /// Number of positions the slice occupies once inserted.
    pub fn size(&self) -> usize {
        match self {
            Slice::Empty => 0,
            Slice::Text(text) => text.len(),
            Slice::Nodes(nodes) => nodes.iter().map(Node::node_size).sum(),
        }
    }
}
