// Chunk: docs/chunks/highlight_overlay - Shared helpers for overlay integration tests

#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use lite_edit_syntax::{IncrementalParser, LanguageRegistry, SyntaxError, SyntaxTree, TreeSitterParser};

pub fn parser(name: &str) -> TreeSitterParser {
    TreeSitterParser::from_registry(&LanguageRegistry::new(), name).unwrap()
}

/// Shared counters of a [`CountingParser`].
#[derive(Clone, Default)]
pub struct ParseCounts {
    calls: Rc<Cell<usize>>,
    seeded: Rc<Cell<usize>>,
}

impl ParseCounts {
    /// Total parse calls.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    /// Parse calls that were given prior parse state.
    pub fn seeded(&self) -> usize {
        self.seeded.get()
    }
}

/// Counts parse calls before delegating to a real parser.
pub struct CountingParser {
    inner: TreeSitterParser,
    counts: ParseCounts,
}

impl CountingParser {
    pub fn new(name: &str) -> (Self, ParseCounts) {
        let counts = ParseCounts::default();
        let parser = CountingParser {
            inner: parser(name),
            counts: counts.clone(),
        };
        (parser, counts)
    }
}

impl IncrementalParser for CountingParser {
    fn language(&self) -> &str {
        self.inner.language()
    }

    fn parse(&self, text: &str, prior: Option<&SyntaxTree>) -> Result<SyntaxTree, SyntaxError> {
        self.counts.calls.set(self.counts.calls.get() + 1);
        if prior.is_some() {
            self.counts.seeded.set(self.counts.seeded.get() + 1);
        }
        self.inner.parse(text, prior)
    }
}

/// A parser that always fails.
pub struct FailingParser;

impl IncrementalParser for FailingParser {
    fn language(&self) -> &str {
        "broken"
    }

    fn parse(&self, _text: &str, _prior: Option<&SyntaxTree>) -> Result<SyntaxTree, SyntaxError> {
        Err(SyntaxError::ParseFailed {
            language: "broken".to_string(),
        })
    }
}
