// Chunk: docs/chunks/syntax_highlighting - Tree walk emitting classified spans

//! Walks a parsed [`SyntaxTree`] and emits classified, non-overlapping spans.
//!
//! Captures from every layer are collected with a `QueryCursor` over the
//! whole tree, classified through a [`Highlighter`], and flattened so that
//! each byte belongs to at most one span: the innermost capture covering a
//! byte wins, and among captures of the same node the earliest query
//! pattern wins. Adjacent spans with the same class are merged.

use std::cmp::Reverse;

use streaming_iterator::StreamingIterator;
use tree_sitter::QueryCursor;

use crate::classes::Highlighter;
use crate::parser::SyntaxTree;

/// A classified capture: (start_byte, end_byte, order, class).
///
/// `order` is the position of the capture in query output across all layers.
type ClassifiedCapture<'a> = (usize, usize, usize, &'a str);

/// Emits `(from, to, classes)` for every highlighted span in `tree`.
///
/// Offsets are byte offsets into the tree's source. Spans are emitted in
/// ascending order, never overlap, and never have `from == to`.
pub fn highlight_tree<F>(tree: &SyntaxTree, highlighter: &dyn Highlighter, mut emit: F)
where
    F: FnMut(usize, usize, &str),
{
    let captures = collect_captures(tree, highlighter);
    for (from, to, class) in flatten(captures) {
        emit(from, to, class);
    }
}

fn collect_captures<'h>(tree: &SyntaxTree, highlighter: &'h dyn Highlighter) -> Vec<ClassifiedCapture<'h>> {
    let mut captures = Vec::new();
    let source = tree.source().as_bytes();

    for (layer, query) in tree.layers() {
        let mut cursor = QueryCursor::new();
        let mut captures_iter = cursor.captures(query, layer.root_node(), source);
        while let Some((mat, capture_idx)) = captures_iter.next() {
            let capture = &mat.captures[*capture_idx];
            let node = capture.node;
            if node.start_byte() >= node.end_byte() {
                continue;
            }
            // Unclassified captures are dropped so an enclosing classified
            // capture shows through.
            let Some(name) = query.capture_names().get(capture.index as usize) else {
                continue;
            };
            if let Some(class) = highlighter.classes(name) {
                let order = captures.len();
                captures.push((node.start_byte(), node.end_byte(), order, class));
            }
        }
    }

    captures
}

/// Flattens possibly nested captures into ordered, disjoint, merged spans.
fn flatten(mut captures: Vec<ClassifiedCapture<'_>>) -> Vec<(usize, usize, &str)> {
    // Outer before inner; for the same node the earliest pattern is pushed
    // last so it ends up on top of the stack.
    captures.sort_by_key(|(start, end, order, _)| (*start, Reverse(*end), Reverse(*order)));

    let mut spans: Vec<(usize, usize, &str)> = Vec::new();
    let mut stack: Vec<(usize, &str)> = Vec::new();
    let mut cursor = 0;

    for (start, end, _, class) in captures {
        advance(&mut stack, &mut cursor, start, &mut spans);
        stack.push((end, class));
    }
    advance(&mut stack, &mut cursor, usize::MAX, &mut spans);

    spans
}

/// Emits spans for the innermost open capture until `to` is reached or the
/// stack runs out.
fn advance<'a>(
    stack: &mut Vec<(usize, &'a str)>,
    cursor: &mut usize,
    to: usize,
    spans: &mut Vec<(usize, usize, &'a str)>,
) {
    while *cursor < to {
        while stack.last().is_some_and(|(end, _)| *end <= *cursor) {
            stack.pop();
        }
        let Some(&(end, class)) = stack.last() else {
            *cursor = to;
            return;
        };
        let segment_end = end.min(to);
        push_merged(spans, *cursor, segment_end, class);
        *cursor = segment_end;
    }
}

fn push_merged<'a>(spans: &mut Vec<(usize, usize, &'a str)>, from: usize, to: usize, class: &'a str) {
    if let Some(last) = spans.last_mut() {
        if last.1 == from && last.2 == class {
            last.1 = to;
            return;
        }
    }
    spans.push((from, to, class));
}
