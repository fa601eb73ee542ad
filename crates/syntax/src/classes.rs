// Chunk: docs/chunks/syntax_highlighting - Capture name to style class mapping

//! Highlight classification: tree-sitter capture names to style classes.
//!
//! The editor renders highlights as CSS-like class strings rather than
//! colours, so a classifier only decides *which* class a capture gets. The
//! default table uses the `tok-*` class vocabulary common to rich-text
//! editors.

use std::collections::HashMap;

/// Classifies a tree-sitter capture name into a style class string.
pub trait Highlighter {
    /// Returns the class string for `capture`, or `None` to leave the
    /// captured span unstyled.
    fn classes(&self, capture: &str) -> Option<&str>;
}

/// A table-driven classifier.
///
/// Looking up a capture like "function.method" first tries the exact
/// match, then falls back to prefix matches ("function").
#[derive(Debug, Clone)]
pub struct ClassHighlighter {
    /// Map from capture name to class string
    classes: HashMap<String, String>,
}

impl ClassHighlighter {
    /// Creates a classifier with no mappings.
    pub fn empty() -> Self {
        Self {
            classes: HashMap::new(),
        }
    }

    /// Creates the default `tok-*` classifier.
    pub fn tok_classes() -> Self {
        let mut classes = HashMap::new();

        let mappings: &[(&str, &str)] = &[
            // Keywords
            ("keyword", "tok-keyword"),
            ("conditional", "tok-keyword"),
            ("repeat", "tok-keyword"),
            ("include", "tok-keyword"),
            // Functions
            ("function", "tok-function"),
            ("function.macro", "tok-macroName"),
            ("constructor", "tok-className"),
            // Types
            ("type", "tok-typeName"),
            ("type.builtin", "tok-typeName tok-standard"),
            // Strings
            ("string", "tok-string"),
            ("string.special", "tok-string2"),
            ("string.escape", "tok-string2"),
            ("escape", "tok-string2"),
            ("character", "tok-string"),
            // Constants and literals
            ("constant", "tok-atom"),
            ("constant.builtin", "tok-bool"),
            ("boolean", "tok-bool"),
            ("number", "tok-number"),
            ("float", "tok-number"),
            // Comments
            ("comment", "tok-comment"),
            // Variables and properties
            ("variable", "tok-variableName"),
            ("variable.builtin", "tok-variableName tok-standard"),
            ("variable.parameter", "tok-variableName tok-definition"),
            ("property", "tok-propertyName"),
            ("label", "tok-labelName"),
            ("namespace", "tok-namespace"),
            ("module", "tok-namespace"),
            ("tag", "tok-typeName"),
            ("attribute", "tok-meta"),
            // Punctuation and operators
            ("punctuation", "tok-punctuation"),
            ("operator", "tok-operator"),
            // Markup
            ("text.title", "tok-heading"),
            ("text.literal", "tok-literal"),
            ("text.uri", "tok-url"),
            ("text.reference", "tok-link"),
            ("text.emphasis", "tok-emphasis"),
            ("text.strong", "tok-strong"),
        ];

        for (capture, class) in mappings {
            classes.insert((*capture).to_string(), (*class).to_string());
        }

        Self { classes }
    }

    /// Adds or overrides the class for a capture name.
    pub fn with_class(mut self, capture: &str, class: &str) -> Self {
        self.classes.insert(capture.to_string(), class.to_string());
        self
    }

    /// Returns the class for a capture name, if defined.
    ///
    /// First tries an exact match, then tries prefix matching
    /// (e.g., "function.method.call" would match "function.method" then "function").
    pub fn class_for_capture(&self, name: &str) -> Option<&str> {
        // Try exact match first
        if let Some(class) = self.classes.get(name) {
            return Some(class);
        }

        // Try progressively shorter prefixes
        let mut prefix = name;
        while let Some(dot_pos) = prefix.rfind('.') {
            prefix = &prefix[..dot_pos];
            if let Some(class) = self.classes.get(prefix) {
                return Some(class);
            }
        }

        None
    }
}

impl Default for ClassHighlighter {
    fn default() -> Self {
        Self::tok_classes()
    }
}

impl Highlighter for ClassHighlighter {
    fn classes(&self, capture: &str) -> Option<&str> {
        self.class_for_capture(capture)
    }
}

impl<F> Highlighter for F
where
    F: Fn(&str) -> Option<&'static str>,
{
    fn classes(&self, capture: &str) -> Option<&str> {
        self(capture)
    }
}
