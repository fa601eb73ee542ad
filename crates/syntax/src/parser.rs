// Chunk: docs/chunks/syntax_highlighting - Incremental parsing with reusable parse state
// Chunk: docs/chunks/highlight_injection - Markdown inline layer parsing

//! Incremental parsers and the parse state they hand back.
//!
//! A [`SyntaxTree`] is the reusable product of one parse: the tree-sitter
//! tree, the source it was parsed from, and the compiled highlight query.
//! Passing it back as `prior` on the next parse of the same node lets
//! tree-sitter reuse every subtree outside the edited region.
//!
//! # Example
//!
//! ```ignore
//! let registry = LanguageRegistry::new();
//! let parser = TreeSitterParser::from_registry(&registry, "json")?;
//! let first = parser.parse("{\"a\": 1}", None)?;
//! // Only the changed region is re-parsed
//! let second = parser.parse("{\"a\": 12}", Some(&first))?;
//! ```

use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;

use tree_sitter::{Parser, Query, Range, Tree};

use crate::edit::TextEdit;
use crate::error::SyntaxError;
use crate::registry::{InlineLayer, LanguageConfig, LanguageRegistry};

/// A language-specific parser that can reuse prior parse state.
///
/// Implementations must produce the same tree whether or not `prior` is
/// given; `prior` only saves work.
pub trait IncrementalParser {
    /// The language this parser handles.
    fn language(&self) -> &str;

    /// Parses `text`, optionally seeded with the state of an earlier parse.
    fn parse(&self, text: &str, prior: Option<&SyntaxTree>) -> Result<SyntaxTree, SyntaxError>;
}

#[derive(Clone)]
struct InlineTree {
    tree: Tree,
    query: Arc<Query>,
}

/// Reusable parse state for one node's text.
#[derive(Clone)]
pub struct SyntaxTree {
    language: Arc<str>,
    source: Arc<str>,
    tree: Tree,
    query: Arc<Query>,
    inline: Option<InlineTree>,
}

impl SyntaxTree {
    pub fn language(&self) -> &str {
        &self.language
    }

    /// The text this tree was parsed from (or, for an edited seed, the text
    /// it has been told about).
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Returns true when an inline layer was parsed over the primary tree.
    pub fn has_inline_layer(&self) -> bool {
        self.inline.is_some()
    }

    /// S-expression of the primary tree, for comparisons and debugging.
    pub fn to_sexp(&self) -> String {
        self.tree.root_node().to_sexp()
    }

    /// Each parsed layer with the query that classifies it, primary first.
    pub(crate) fn layers(&self) -> impl Iterator<Item = (&Tree, &Query)> {
        std::iter::once((&self.tree, &*self.query))
            .chain(self.inline.iter().map(|layer| (&layer.tree, &*layer.query)))
    }

    /// Returns a seed for re-parsing `new_source`.
    ///
    /// The trees are told about the replaced region between the old and new
    /// source, so subtrees outside it can be reused by the next parse.
    pub fn edited(&self, new_source: &str) -> SyntaxTree {
        let mut seed = self.clone();
        if let Some(edit) = TextEdit::between(&self.source, new_source) {
            let input = edit.to_input_edit();
            seed.tree.edit(&input);
            if let Some(layer) = seed.inline.as_mut() {
                layer.tree.edit(&input);
            }
        }
        seed.source = Arc::from(new_source);
        seed
    }
}

impl PartialEq for SyntaxTree {
    fn eq(&self, other: &Self) -> bool {
        self.language == other.language
            && self.source == other.source
            && self.to_sexp() == other.to_sexp()
            && self.inline.as_ref().map(|l| l.tree.root_node().to_sexp())
                == other.inline.as_ref().map(|l| l.tree.root_node().to_sexp())
    }
}

impl fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("language", &self.language)
            .field("source", &self.source)
            .field("tree", &self.to_sexp())
            .field("inline", &self.inline.is_some())
            .finish()
    }
}

struct InlineParser {
    parser: RefCell<Parser>,
    query: Arc<Query>,
    host_kind: &'static str,
}

impl InlineParser {
    fn new(language: &str, layer: &InlineLayer) -> Result<Self, SyntaxError> {
        Ok(Self {
            parser: RefCell::new(new_parser(language, &layer.language)?),
            query: Arc::new(compile_query(language, &layer.language, layer.highlights_query)?),
            host_kind: layer.host_kind,
        })
    }

    fn parse(
        &self,
        language: &str,
        text: &str,
        host: &Tree,
        prior: Option<&InlineTree>,
    ) -> Result<Option<InlineTree>, SyntaxError> {
        let ranges = host_ranges(host, self.host_kind);
        // No host nodes: an empty range list would mean "the whole text"
        if ranges.is_empty() {
            return Ok(None);
        }

        let mut parser = self.parser.borrow_mut();
        parser
            .set_included_ranges(&ranges)
            .map_err(|source| SyntaxError::IncludedRanges {
                language: language.to_string(),
                source,
            })?;
        let tree = parser
            .parse(text, prior.map(|layer| &layer.tree))
            .ok_or_else(|| SyntaxError::ParseFailed {
                language: language.to_string(),
            })?;

        Ok(Some(InlineTree {
            tree,
            query: Arc::clone(&self.query),
        }))
    }
}

/// Collects the ranges of every `kind` node in document order, without
/// descending into matches.
fn host_ranges(tree: &Tree, kind: &str) -> Vec<Range> {
    let mut ranges = Vec::new();
    let mut cursor = tree.walk();
    loop {
        let node = cursor.node();
        let is_host = node.kind() == kind;
        if is_host {
            ranges.push(node.range());
        }
        if !is_host && cursor.goto_first_child() {
            continue;
        }
        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                return ranges;
            }
        }
    }
}

fn new_parser(language: &str, grammar: &tree_sitter::Language) -> Result<Parser, SyntaxError> {
    let mut parser = Parser::new();
    parser
        .set_language(grammar)
        .map_err(|source| SyntaxError::Language {
            language: language.to_string(),
            source,
        })?;
    Ok(parser)
}

fn compile_query(language: &str, grammar: &tree_sitter::Language, source: &str) -> Result<Query, SyntaxError> {
    Query::new(grammar, source).map_err(|source| SyntaxError::Query {
        language: language.to_string(),
        source,
    })
}

/// A tree-sitter backed [`IncrementalParser`].
///
/// ## Thread Safety
///
/// The tree-sitter `Parser` needs `&mut` to parse; it sits in a `RefCell`
/// so `parse()` can take `&self`. Parsers are used from one thread only.
pub struct TreeSitterParser {
    language: Arc<str>,
    parser: RefCell<Parser>,
    /// The compiled highlight query, shared with every tree this parser produces
    query: Arc<Query>,
    inline: Option<InlineParser>,
}

impl TreeSitterParser {
    /// Creates a parser for `config`, reporting itself as `language`.
    pub fn new(language: &str, config: &LanguageConfig) -> Result<Self, SyntaxError> {
        let parser = new_parser(language, &config.language)?;
        // One-time cost per parser; every parse reuses the compiled query.
        let query = compile_query(language, &config.language, config.highlights_query)?;
        let inline = config
            .inline
            .as_ref()
            .map(|layer| InlineParser::new(language, layer))
            .transpose()?;

        Ok(Self {
            language: Arc::from(language),
            parser: RefCell::new(parser),
            query: Arc::new(query),
            inline,
        })
    }

    /// Creates a parser for a registry language, named by its canonical name.
    pub fn from_registry(registry: &LanguageRegistry, name: &str) -> Result<Self, SyntaxError> {
        let canonical = registry
            .canonical_name(name)
            .ok_or_else(|| SyntaxError::UnknownLanguage(name.to_string()))?;
        let config = registry
            .config_for_language_name(canonical)
            .ok_or_else(|| SyntaxError::UnknownLanguage(name.to_string()))?;
        Self::new(canonical, config)
    }
}

impl IncrementalParser for TreeSitterParser {
    fn language(&self) -> &str {
        &self.language
    }

    fn parse(&self, text: &str, prior: Option<&SyntaxTree>) -> Result<SyntaxTree, SyntaxError> {
        // A tree from another grammar cannot seed this one. A prior parsed
        // from different text is edited first so its offsets line up.
        let seed = prior
            .filter(|prior| prior.language == self.language)
            .map(|prior| {
                if &*prior.source == text {
                    prior.clone()
                } else {
                    prior.edited(text)
                }
            });

        let tree = self
            .parser
            .borrow_mut()
            .parse(text, seed.as_ref().map(|seed| &seed.tree))
            .ok_or_else(|| SyntaxError::ParseFailed {
                language: self.language.to_string(),
            })?;

        let inline = match &self.inline {
            Some(layer) => layer.parse(
                &self.language,
                text,
                &tree,
                seed.as_ref().and_then(|seed| seed.inline.as_ref()),
            )?,
            None => None,
        };

        Ok(SyntaxTree {
            language: Arc::clone(&self.language),
            source: Arc::from(text),
            tree,
            query: Arc::clone(&self.query),
            inline,
        })
    }
}

impl fmt::Debug for TreeSitterParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeSitterParser")
            .field("language", &self.language)
            .field("inline", &self.inline.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser(name: &str) -> TreeSitterParser {
        TreeSitterParser::from_registry(&LanguageRegistry::new(), name).expect("language should load")
    }

    // ==================== Construction ====================

    #[test]
    fn test_from_registry_uses_canonical_name() {
        let js = parser("js");
        assert_eq!(js.language(), "javascript");
    }

    #[test]
    fn test_unknown_language_is_an_error() {
        let result = TreeSitterParser::from_registry(&LanguageRegistry::new(), "fortran");
        assert!(matches!(result, Err(SyntaxError::UnknownLanguage(name)) if name == "fortran"));
    }

    #[test]
    fn test_bad_query_is_an_error() {
        let config = LanguageConfig::new(tree_sitter_json::LANGUAGE.into(), "(no_such_node) @x");
        let result = TreeSitterParser::new("json", &config);
        assert!(matches!(result, Err(SyntaxError::Query { .. })));
    }

    // ==================== Parsing ====================

    #[test]
    fn test_parse_produces_tree_and_snapshot() {
        let json = parser("json");
        let tree = json.parse("{\"a\": 1}", None).unwrap();
        assert_eq!(tree.language(), "json");
        assert_eq!(tree.source(), "{\"a\": 1}");
        assert!(tree.to_sexp().starts_with("(document"));
        assert!(!tree.has_inline_layer());
    }

    #[test]
    fn test_incremental_parse_matches_fresh_parse() {
        let js = parser("javascript");
        let first = js.parse("let x = 1;\nlet y = 2;", None).unwrap();
        let incremental = js.parse("let x = 1;\nlet yy = 2;", Some(&first)).unwrap();
        let fresh = js.parse("let x = 1;\nlet yy = 2;", None).unwrap();
        assert_eq!(incremental, fresh);
    }

    #[test]
    fn test_prior_of_other_language_is_ignored() {
        let json = parser("json");
        let js = parser("javascript");
        let json_tree = json.parse("[1, 2]", None).unwrap();
        let with_foreign_prior = js.parse("[1, 2]", Some(&json_tree)).unwrap();
        let fresh = js.parse("[1, 2]", None).unwrap();
        assert_eq!(with_foreign_prior, fresh);
        assert_eq!(with_foreign_prior.language(), "javascript");
    }

    #[test]
    fn test_same_text_reuses_prior() {
        let json = parser("json");
        let first = json.parse("[true]", None).unwrap();
        let second = json.parse("[true]", Some(&first)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_edited_seed_tracks_new_source() {
        let json = parser("json");
        let first = json.parse("[1]", None).unwrap();
        let seed = first.edited("[1, 2]");
        assert_eq!(seed.source(), "[1, 2]");
        // The original is untouched
        assert_eq!(first.source(), "[1]");

        let reparsed = json.parse("[1, 2]", Some(&seed)).unwrap();
        assert_eq!(reparsed, json.parse("[1, 2]", None).unwrap());
    }

    // ==================== Markdown inline layer ====================

    #[test]
    fn test_markdown_parses_inline_layer() {
        let md = parser("markdown");
        let tree = md.parse("**Hello** _world_!", None).unwrap();
        assert!(tree.has_inline_layer());
        assert_eq!(tree.layers().count(), 2);
    }

    #[test]
    fn test_markdown_without_inline_content() {
        let md = parser("markdown");
        let tree = md.parse("", None).unwrap();
        assert!(!tree.has_inline_layer());
        assert_eq!(tree.layers().count(), 1);
    }

    #[test]
    fn test_markdown_incremental_parse_matches_fresh_parse() {
        let md = parser("md");
        let first = md.parse("# Title\n\nsome *text*\n", None).unwrap();
        let incremental = md.parse("# Title\n\nsome **text**\n", Some(&first)).unwrap();
        let fresh = md.parse("# Title\n\nsome **text**\n", None).unwrap();
        assert_eq!(incremental, fresh);
    }
}
