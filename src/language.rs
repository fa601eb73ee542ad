// Chunk: docs/chunks/node_discovery - Resolving the language of a target node

//! Language resolution for target nodes.
//!
//! By default a node's language comes from an explicit detected-language
//! attribute, falling back to the first word of the code block's `params`
//! (the info string of a fenced block, e.g. `rust ignore`). Hosts can
//! replace the strategy list or supply an arbitrary function.

use std::fmt;

use lite_edit_doc::DocNode;
use serde::{Deserialize, Serialize};

/// Parser key used when a node's language cannot be resolved.
pub const WILDCARD: &str = "*";

/// Attribute holding a language set by auto-detection.
pub const DETECTED_LANGUAGE_ATTR: &str = "detectedHighlightLanguage";

/// Attribute holding a fenced code block's info string.
pub const PARAMS_ATTR: &str = "params";

/// One way of reading a language name off a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "attr", rename_all = "snake_case")]
pub enum LanguageSource {
    /// The attribute's whole value.
    Attr(String),
    /// The first whitespace-delimited word of the attribute.
    FirstToken(String),
}

impl LanguageSource {
    fn extract<N: DocNode>(&self, node: &N) -> Option<String> {
        let value = match self {
            LanguageSource::Attr(name) => node.attr(name)?.trim(),
            LanguageSource::FirstToken(name) => node.attr(name)?.split_whitespace().next()?,
        };
        (!value.is_empty()).then(|| value.to_string())
    }
}

/// The default strategy list: detected language, then the first word of `params`.
pub fn default_sources() -> Vec<LanguageSource> {
    vec![
        LanguageSource::Attr(DETECTED_LANGUAGE_ATTR.to_string()),
        LanguageSource::FirstToken(PARAMS_ATTR.to_string()),
    ]
}

/// Decides which language applies to a node.
pub enum LanguageResolver<N> {
    /// Ordered strategies; the first non-empty result wins.
    Strategies(Vec<LanguageSource>),
    /// A host-supplied function.
    Custom(Box<dyn Fn(&N) -> Option<String>>),
}

impl<N: DocNode> LanguageResolver<N> {
    pub fn custom<F>(resolve: F) -> Self
    where
        F: Fn(&N) -> Option<String> + 'static,
    {
        LanguageResolver::Custom(Box::new(resolve))
    }

    /// Returns the node's language, or `None` when nothing applies.
    pub fn resolve(&self, node: &N) -> Option<String> {
        match self {
            LanguageResolver::Strategies(sources) => sources.iter().find_map(|source| source.extract(node)),
            LanguageResolver::Custom(resolve) => resolve(node).filter(|language| !language.is_empty()),
        }
    }

    /// Returns the parser key for the node: its language, or [`WILDCARD`].
    pub fn resolve_key(&self, node: &N) -> String {
        self.resolve(node).unwrap_or_else(|| WILDCARD.to_string())
    }
}

impl<N: DocNode> Default for LanguageResolver<N> {
    fn default() -> Self {
        LanguageResolver::Strategies(default_sources())
    }
}

impl<N> fmt::Debug for LanguageResolver<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LanguageResolver::Strategies(sources) => f.debug_tuple("Strategies").field(sources).finish(),
            LanguageResolver::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
