// Chunk: docs/chunks/syntax_highlighting - Edit translation for tree-sitter

//! Edit translation between node text snapshots and tree-sitter edits.
//!
//! The document hands the highlighter whole text snapshots, not keystrokes.
//! Tree-sitter needs edits expressed as byte offsets plus (row, column)
//! points, so [`TextEdit::between`] recovers the single replaced region from
//! two snapshots by trimming their common prefix and suffix.

use tree_sitter::{InputEdit, Point};

/// A single replaced region in tree-sitter format.
///
/// Columns are byte offsets from the start of the row, as tree-sitter expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextEdit {
    /// Byte offset where the edit starts
    pub start_byte: usize,
    /// Byte offset where the old content ends
    pub old_end_byte: usize,
    /// Byte offset where the new content ends
    pub new_end_byte: usize,
    pub start_position: Point,
    pub old_end_position: Point,
    pub new_end_position: Point,
}

impl TextEdit {
    /// Computes the edit that turns `old` into `new`.
    ///
    /// Returns `None` when the texts are identical. Boundaries are moved
    /// outward until they fall on character boundaries of both texts.
    pub fn between(old: &str, new: &str) -> Option<TextEdit> {
        if old == new {
            return None;
        }

        let mut prefix = old
            .bytes()
            .zip(new.bytes())
            .take_while(|(a, b)| a == b)
            .count();
        while !old.is_char_boundary(prefix) || !new.is_char_boundary(prefix) {
            prefix -= 1;
        }

        let max_suffix = old.len().min(new.len()) - prefix;
        let mut suffix = old
            .bytes()
            .rev()
            .zip(new.bytes().rev())
            .take(max_suffix)
            .take_while(|(a, b)| a == b)
            .count();
        while !old.is_char_boundary(old.len() - suffix) || !new.is_char_boundary(new.len() - suffix) {
            suffix -= 1;
        }

        let old_end = old.len() - suffix;
        let new_end = new.len() - suffix;
        Some(TextEdit {
            start_byte: prefix,
            old_end_byte: old_end,
            new_end_byte: new_end,
            start_position: point_at(old, prefix),
            old_end_position: point_at(old, old_end),
            new_end_position: point_at(new, new_end),
        })
    }

    /// Converts this edit to a tree-sitter `InputEdit`.
    pub fn to_input_edit(&self) -> InputEdit {
        InputEdit {
            start_byte: self.start_byte,
            old_end_byte: self.old_end_byte,
            new_end_byte: self.new_end_byte,
            start_position: self.start_position,
            old_end_position: self.old_end_position,
            new_end_position: self.new_end_position,
        }
    }
}

/// Calculates the tree-sitter point for a byte offset in `source`.
///
/// Offsets past the end clamp to the end of the source.
///
/// # Example
///
/// ```
/// use lite_edit_syntax::point_at;
///
/// let source = "hello\nworld";
/// assert_eq!(point_at(source, 0).row, 0);
/// assert_eq!(point_at(source, 6).row, 1);
/// assert_eq!(point_at(source, 6).column, 0);
/// assert_eq!(point_at(source, 11).column, 5);
/// ```
pub fn point_at(source: &str, byte_offset: usize) -> Point {
    let end = byte_offset.min(source.len());
    let before = &source.as_bytes()[..end];
    let row = before.iter().filter(|b| **b == b'\n').count();
    let column = match before.iter().rposition(|b| *b == b'\n') {
        Some(newline) => end - newline - 1,
        None => end,
    };
    Point { row, column }
}
