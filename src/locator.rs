// Chunk: docs/chunks/node_discovery - Locating highlight targets in the document tree

//! Node discovery: which nodes of a document get highlighted.
//!
//! A target is a block-level node whose type name is in the caller's target
//! set. Targets are leaves for highlighting: a code block nested inside
//! another target is highlighted as part of its ancestor, not on its own.
//! The root is only a target when the set names the `doc` pseudo-type.

use std::collections::BTreeSet;

use lite_edit_doc::DocNode;

/// Type name that selects the document root itself.
pub const ROOT_TYPE: &str = "doc";

/// Where a target sits in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TargetPos {
    /// The document root. Not an addressable position and never cached.
    Root,
    /// A node starting at this absolute position.
    At(usize),
}

impl TargetPos {
    /// The cache key for this position, if it has one.
    pub fn offset(self) -> Option<usize> {
        match self {
            TargetPos::Root => None,
            TargetPos::At(pos) => Some(pos),
        }
    }

    /// Absolute position of the first character of the node's content.
    ///
    /// Node-local offsets are shifted by this to become document offsets;
    /// the extra one skips the node's opening boundary.
    pub fn content_start(self) -> usize {
        match self {
            TargetPos::Root => 0,
            TargetPos::At(pos) => pos + 1,
        }
    }
}

/// A located target node.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetNode<'a, N> {
    pub node: &'a N,
    pub pos: TargetPos,
}

/// Returns every target node of `doc` in document order.
pub fn locate<'a, N: DocNode>(doc: &'a N, target_types: &BTreeSet<String>) -> Vec<TargetNode<'a, N>> {
    let mut targets = Vec::new();
    if target_types.is_empty() {
        return targets;
    }

    if target_types.contains(ROOT_TYPE) {
        targets.push(TargetNode {
            node: doc,
            pos: TargetPos::Root,
        });
    }

    doc.descendants(|node, pos| {
        if node.is_block() && target_types.contains(node.type_name()) {
            targets.push(TargetNode {
                node,
                pos: TargetPos::At(pos),
            });
            return false;
        }
        true
    });

    targets
}

#[cfg(test)]
mod tests {
    use super::*;
    use lite_edit_doc::Node;

    fn types(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    fn no_attrs() -> [(&'static str, &'static str); 0] {
        []
    }

    fn positions<N: DocNode>(targets: &[TargetNode<'_, N>]) -> Vec<TargetPos> {
        targets.iter().map(|target| target.pos).collect()
    }

    #[test]
    fn test_finds_code_blocks_in_order() {
        let doc = Node::doc(vec![
            Node::code_block("rust", "fn a() {}"),
            Node::paragraph("text"),
            Node::code_block("go", "x := 1"),
        ]);
        let targets = locate(&doc, &types(&["code_block"]));
        // 9 + 2, then 4 + 2
        assert_eq!(positions(&targets), vec![TargetPos::At(0), TargetPos::At(17)]);
        assert_eq!(targets[1].node.attr("params"), Some("go"));
    }

    #[test]
    fn test_empty_target_set_finds_nothing() {
        let doc = Node::doc(vec![Node::code_block("rust", "fn a() {}")]);
        assert!(locate(&doc, &BTreeSet::new()).is_empty());
    }

    #[test]
    fn test_root_included_first() {
        let doc = Node::doc(vec![Node::code_block("", "x")]);
        let targets = locate(&doc, &types(&["doc", "code_block"]));
        assert_eq!(positions(&targets), vec![TargetPos::Root, TargetPos::At(0)]);
        assert_eq!(targets[0].node, &doc);
    }

    #[test]
    fn test_nested_targets_are_found() {
        let doc = Node::doc(vec![Node::container(
            "blockquote",
            no_attrs(),
            vec![Node::code_block("js", "a")],
        )]);
        let targets = locate(&doc, &types(&["code_block"]));
        assert_eq!(positions(&targets), vec![TargetPos::At(1)]);
    }

    #[test]
    fn test_does_not_descend_into_selected_nodes() {
        let doc = Node::doc(vec![Node::container(
            "figure",
            no_attrs(),
            vec![Node::code_block("js", "a")],
        )]);
        let targets = locate(&doc, &types(&["figure", "code_block"]));
        assert_eq!(positions(&targets), vec![TargetPos::At(0)]);
        assert_eq!(targets[0].node.type_name(), "figure");
    }

    #[test]
    fn test_inline_nodes_are_never_targets() {
        let doc = Node::doc(vec![Node::container(
            "paragraph",
            no_attrs(),
            vec![Node::inline("code_block", no_attrs(), "x")],
        )]);
        assert!(locate(&doc, &types(&["code_block"])).is_empty());
    }

    #[test]
    fn test_content_start() {
        assert_eq!(TargetPos::Root.content_start(), 0);
        assert_eq!(TargetPos::At(7).content_start(), 8);
        assert_eq!(TargetPos::Root.offset(), None);
        assert_eq!(TargetPos::At(7).offset(), Some(7));
    }
}
