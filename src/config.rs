// Chunk: docs/chunks/overlay_config - Declarative overlay configuration

//! Declarative configuration for the overlay.
//!
//! Hosts that do not need hooks or custom resolvers can describe the whole
//! overlay as JSON and build a coordinator from it:
//!
//! ```ignore
//! let config = HighlightConfig::from_json(r#"{
//!     "target_types": ["code_block"],
//!     "languages": ["rust", "markdown"],
//!     "fallback_language": "markdown"
//! }"#)?;
//! let coordinator = config.into_coordinator::<Node>(&LanguageRegistry::new())?;
//! ```
//!
//! Every field is optional.

use lite_edit_doc::DocNode;
use lite_edit_syntax::{LanguageRegistry, TreeSitterParser};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cache::ArtifactPolicy;
use crate::coordinator::{HighlightCoordinator, DEFAULT_TARGET_TYPE};
use crate::error::HighlightError;
use crate::language::{default_sources, LanguageResolver, LanguageSource};
use crate::parsers::ParserCollection;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Node types to highlight. `doc` selects the document root.
    pub target_types: Vec<String>,
    /// Where to read each node's language from, in order.
    pub language_sources: Vec<LanguageSource>,
    /// Languages to build parsers for. Empty means every registered language.
    pub languages: Vec<String>,
    /// Language used for nodes whose language has no parser.
    pub fallback_language: Option<String>,
    pub artifact_policy: ArtifactPolicy,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            target_types: vec![DEFAULT_TARGET_TYPE.to_string()],
            language_sources: default_sources(),
            languages: Vec::new(),
            fallback_language: None,
            artifact_policy: ArtifactPolicy::default(),
        }
    }
}

impl HighlightConfig {
    pub fn from_json(json: &str) -> Result<Self, HighlightError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builds one parser per configured language, plus the fallback.
    ///
    /// Languages are registered under both the configured name and the
    /// registry's canonical name, so `js` in the config matches `javascript`
    /// in a document and vice versa.
    pub fn build_parsers(&self, registry: &LanguageRegistry) -> Result<ParserCollection, HighlightError> {
        let languages: Vec<String> = if self.languages.is_empty() {
            registry.names().iter().map(|name| name.to_string()).collect()
        } else {
            self.languages.clone()
        };

        let mut parsers = ParserCollection::new();
        for language in &languages {
            let canonical = registry
                .canonical_name(language)
                .ok_or_else(|| HighlightError::UnknownLanguage(language.clone()))?;
            parsers.insert(canonical, Box::new(TreeSitterParser::from_registry(registry, canonical)?));
            if language != canonical {
                parsers.insert(language.clone(), Box::new(TreeSitterParser::from_registry(registry, canonical)?));
            }
        }

        if let Some(fallback) = &self.fallback_language {
            let canonical = registry
                .canonical_name(fallback)
                .ok_or_else(|| HighlightError::UnknownLanguage(fallback.clone()))?;
            parsers = parsers.with_fallback(TreeSitterParser::from_registry(registry, canonical)?);
        }

        debug!(languages = languages.len(), fallback = ?self.fallback_language, "built highlight parsers");
        Ok(parsers)
    }

    pub fn into_coordinator<N: DocNode>(
        self,
        registry: &LanguageRegistry,
    ) -> Result<HighlightCoordinator<N>, HighlightError> {
        let parsers = self.build_parsers(registry)?;
        Ok(HighlightCoordinator::new(parsers)
            .with_target_types(self.target_types)
            .with_resolver(LanguageResolver::Strategies(self.language_sources))
            .with_policy(self.artifact_policy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lite_edit_doc::Node;

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(HighlightConfig::from_json("{}").unwrap(), HighlightConfig::default());
    }

    #[test]
    fn test_full_json() {
        let config = HighlightConfig::from_json(
            r#"{
                "target_types": ["code_block", "doc"],
                "language_sources": [{"kind": "attr", "attr": "lang"}],
                "languages": ["js"],
                "fallback_language": "markdown",
                "artifact_policy": "ranges"
            }"#,
        )
        .unwrap();
        assert_eq!(config.target_types, vec!["code_block", "doc"]);
        assert_eq!(config.language_sources, vec![LanguageSource::Attr("lang".to_string())]);
        assert_eq!(config.artifact_policy, ArtifactPolicy::Ranges);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            HighlightConfig::from_json("{\"languages\": 3}"),
            Err(HighlightError::Config(_))
        ));
    }

    #[test]
    fn test_parsers_under_alias_and_canonical_name() {
        let config = HighlightConfig {
            languages: vec!["js".to_string()],
            fallback_language: Some("json".to_string()),
            ..HighlightConfig::default()
        };
        let parsers = config.build_parsers(&LanguageRegistry::new()).unwrap();
        assert_eq!(parsers.languages().collect::<Vec<_>>(), vec!["*", "javascript", "js"]);
        assert_eq!(parsers.resolve("js").map(|p| p.language()), Some("javascript"));
        assert_eq!(parsers.resolve("cobol").map(|p| p.language()), Some("json"));
    }

    #[test]
    fn test_all_languages_by_default() {
        let registry = LanguageRegistry::new();
        let parsers = HighlightConfig::default().build_parsers(&registry).unwrap();
        assert_eq!(parsers.languages().count(), registry.names().len());
    }

    #[test]
    fn test_unknown_language_rejected() {
        let config = HighlightConfig {
            languages: vec!["cobol".to_string()],
            ..HighlightConfig::default()
        };
        match config.build_parsers(&LanguageRegistry::new()) {
            Err(HighlightError::UnknownLanguage(name)) => assert_eq!(name, "cobol"),
            other => panic!("expected unknown language, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_into_coordinator() {
        let config = HighlightConfig::from_json(r#"{"target_types": ["doc"], "languages": ["json"]}"#).unwrap();
        let coordinator = config.into_coordinator::<Node>(&LanguageRegistry::new()).unwrap();
        assert!(coordinator.target_types().contains("doc"));
        assert_eq!(coordinator.parsers().languages().collect::<Vec<_>>(), vec!["json"]);
    }
}
