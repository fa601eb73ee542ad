// Chunk: docs/chunks/highlight_engine - Parser lookup with wildcard fallback

use std::collections::BTreeMap;
use std::fmt;

use lite_edit_syntax::IncrementalParser;

use crate::language::WILDCARD;

/// Parsers keyed by language, with [`WILDCARD`] as the fallback entry.
#[derive(Default)]
pub struct ParserCollection {
    parsers: BTreeMap<String, Box<dyn IncrementalParser>>,
}

impl ParserCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `parser` under `language`, replacing any previous entry.
    pub fn insert(&mut self, language: impl Into<String>, parser: Box<dyn IncrementalParser>) {
        self.parsers.insert(language.into(), parser);
    }

    pub fn with_parser(mut self, language: impl Into<String>, parser: impl IncrementalParser + 'static) -> Self {
        self.insert(language, Box::new(parser));
        self
    }

    /// Registers `parser` as the fallback for unmatched languages.
    pub fn with_fallback(self, parser: impl IncrementalParser + 'static) -> Self {
        self.with_parser(WILDCARD, parser)
    }

    /// Looks up the parser for `language`: exact match, else the wildcard
    /// entry, else `None` (the node is not highlighted).
    pub fn resolve(&self, language: &str) -> Option<&dyn IncrementalParser> {
        self.parsers
            .get(language)
            .or_else(|| self.parsers.get(WILDCARD))
            .map(|parser| parser.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.parsers.keys().map(String::as_str)
    }
}

impl fmt::Debug for ParserCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.parsers.iter().map(|(key, parser)| (key, parser.language())))
            .finish()
    }
}
