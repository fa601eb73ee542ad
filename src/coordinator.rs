// Chunk: docs/chunks/highlight_overlay - Recomputing decorations for a document

//! The recompute pass.
//!
//! [`HighlightCoordinator::recompute`] walks every target node of a
//! document, reuses what the cache already knows about it, renders the rest,
//! and returns the decorations together with the cache updated by the pass.
//!
//! # Per-target flow
//!
//! 1. Look up the cache entry at the target's position. An entry whose node
//!    differs from the target is ignored.
//! 2. Ask the pre-render hook what to do. Without a hook, cached ranges are
//!    reused as they are and anything else is rendered.
//! 3. Resolve the node's language and then its parser. Nodes with no parser
//!    (no exact match and no wildcard) get no decorations.
//! 4. Render, seeding the parser with the cached tree or an invalidation seed.
//! 5. Notify the post-render hook, then write the artifact to the cache.
//!
//! A parser failure aborts the pass; the caller keeps its previous state.

use std::collections::BTreeSet;
use std::fmt;

use lite_edit_doc::DocNode;
use lite_edit_syntax::Highlighter;
use tracing::{debug, trace};

use crate::cache::{Artifact, ArtifactPolicy, PositionCache};
use crate::decoration::{DecorationSet, StyledRange};
use crate::engine::HighlightEngine;
use crate::error::HighlightError;
use crate::language::LanguageResolver;
use crate::locator::{locate, TargetPos};
use crate::parsers::ParserCollection;

/// Node type highlighted when the caller names none.
pub const DEFAULT_TARGET_TYPE: &str = "code_block";

/// What to do with one target before rendering it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreRender {
    /// Render, seeded with the cached parse tree when there is one.
    Continue,
    /// Render from scratch.
    Reparse,
    /// Do not render. The given ranges stand in for the node's decorations.
    Skip(Vec<StyledRange>),
}

pub type PreRenderHook<N> = Box<dyn Fn(&N, TargetPos, Option<&Artifact>) -> PreRender>;
pub type PostRenderHook<N> = Box<dyn Fn(&N, TargetPos, &[StyledRange])>;

/// Decorations from one pass and the cache it left behind.
#[derive(Debug, Clone)]
pub struct Recomputed<N> {
    pub decorations: DecorationSet,
    pub cache: PositionCache<N>,
}

pub struct HighlightCoordinator<N> {
    parsers: ParserCollection,
    target_types: BTreeSet<String>,
    resolver: Option<LanguageResolver<N>>,
    engine: HighlightEngine,
    policy: ArtifactPolicy,
    pre_render: Option<PreRenderHook<N>>,
    post_render: Option<PostRenderHook<N>>,
}

impl<N: DocNode> HighlightCoordinator<N> {
    /// Creates a coordinator that highlights `code_block` nodes with the
    /// default language resolver.
    pub fn new(parsers: ParserCollection) -> Self {
        Self {
            parsers,
            target_types: BTreeSet::from([DEFAULT_TARGET_TYPE.to_string()]),
            resolver: Some(LanguageResolver::default()),
            engine: HighlightEngine::default(),
            policy: ArtifactPolicy::default(),
            pre_render: None,
            post_render: None,
        }
    }

    pub fn with_target_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.target_types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_resolver(mut self, resolver: LanguageResolver<N>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Removes the language resolver. Every pass then yields no decorations.
    pub fn without_resolver(mut self) -> Self {
        self.resolver = None;
        self
    }

    pub fn with_highlighter(mut self, highlighter: Box<dyn Highlighter>) -> Self {
        self.engine = HighlightEngine::new(highlighter);
        self
    }

    pub fn with_policy(mut self, policy: ArtifactPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_pre_render<F>(mut self, hook: F) -> Self
    where
        F: Fn(&N, TargetPos, Option<&Artifact>) -> PreRender + 'static,
    {
        self.pre_render = Some(Box::new(hook));
        self
    }

    pub fn with_post_render<F>(mut self, hook: F) -> Self
    where
        F: Fn(&N, TargetPos, &[StyledRange]) + 'static,
    {
        self.post_render = Some(Box::new(hook));
        self
    }

    pub fn target_types(&self) -> &BTreeSet<String> {
        &self.target_types
    }

    pub fn parsers(&self) -> &ParserCollection {
        &self.parsers
    }

    pub fn policy(&self) -> ArtifactPolicy {
        self.policy
    }

    /// Computes the decorations of `doc`, starting from `cache`.
    ///
    /// `cache` must already be carried through any edit that produced `doc`
    /// (see [`PositionCache::invalidate`]). It is not modified; the updated
    /// cache is part of the result. Invalidation seeds are consumed by the
    /// pass and are absent from the returned cache.
    pub fn recompute(&self, doc: Option<&N>, cache: &PositionCache<N>) -> Result<Recomputed<N>, HighlightError> {
        let unchanged = || Recomputed {
            decorations: DecorationSet::empty(),
            cache: cache.clone(),
        };

        let Some(doc) = doc else {
            return Ok(unchanged());
        };
        let Some(resolver) = &self.resolver else {
            return Ok(unchanged());
        };
        if doc.content_size() == 0 || self.target_types.is_empty() {
            return Ok(unchanged());
        }

        let mut next = cache.clone();
        let mut ranges = Vec::new();
        let (mut rendered_count, mut reused_count) = (0usize, 0usize);

        let targets = locate(doc, &self.target_types);
        for target in &targets {
            let node = target.node;
            let pos = target.pos;
            let cached = next.get(pos).filter(|entry| entry.node == *node);

            let decision = match &self.pre_render {
                Some(hook) => hook(node, pos, cached.map(|entry| &entry.artifact)),
                None => match cached.and_then(|entry| entry.artifact.ranges.as_ref()) {
                    Some(reused) => PreRender::Skip(reused.clone()),
                    None => PreRender::Continue,
                },
            };

            let prior = match decision {
                PreRender::Skip(reused) => {
                    trace!(?pos, ranges = reused.len(), "target skipped");
                    reused_count += 1;
                    ranges.extend(reused);
                    continue;
                }
                PreRender::Reparse => None,
                PreRender::Continue => cached
                    .and_then(|entry| entry.artifact.tree.as_ref())
                    .or_else(|| next.seed(pos)),
            };

            let language = resolver.resolve_key(node);
            let Some(parser) = self.parsers.resolve(&language) else {
                trace!(?pos, %language, "no parser for target");
                continue;
            };

            let text = node.text_content();
            let rendered = self.engine.render(&text, pos, parser, prior)?;
            trace!(?pos, %language, ranges = rendered.ranges.len(), seeded = prior.is_some(), "target rendered");
            rendered_count += 1;

            if let Some(hook) = &self.post_render {
                hook(node, pos, &rendered.ranges);
            }
            ranges.extend(rendered.ranges.iter().cloned());
            next.set(pos, node.clone(), self.policy.artifact(rendered));
        }

        next.clear_seeds();
        debug!(
            targets = targets.len(),
            rendered = rendered_count,
            reused = reused_count,
            ranges = ranges.len(),
            "highlight pass complete"
        );

        Ok(Recomputed {
            decorations: DecorationSet::new(ranges),
            cache: next,
        })
    }
}

impl<N> fmt::Debug for HighlightCoordinator<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HighlightCoordinator")
            .field("parsers", &self.parsers)
            .field("target_types", &self.target_types)
            .field("resolver", &self.resolver)
            .field("policy", &self.policy)
            .field("pre_render", &self.pre_render.is_some())
            .field("post_render", &self.post_render.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lite_edit_doc::Node;
    use lite_edit_syntax::{LanguageRegistry, TreeSitterParser};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn parsers(names: &[&str]) -> ParserCollection {
        let registry = LanguageRegistry::new();
        names.iter().fold(ParserCollection::new(), |parsers, name| {
            parsers.with_parser(*name, TreeSitterParser::from_registry(&registry, name).unwrap())
        })
    }

    fn sample() -> Node {
        Node::doc(vec![
            Node::code_block("json", "[1]"),
            Node::paragraph("prose"),
            Node::code_block("plain", "[2]"),
        ])
    }

    // ==================== Early exits ====================

    #[test]
    fn test_no_document() {
        let coordinator = HighlightCoordinator::<Node>::new(parsers(&["json"]));
        let out = coordinator.recompute(None, &PositionCache::new()).unwrap();
        assert!(out.decorations.is_empty());
        assert!(out.cache.is_empty());
    }

    #[test]
    fn test_empty_document() {
        let coordinator = HighlightCoordinator::new(parsers(&["json"]));
        let out = coordinator.recompute(Some(&Node::doc(vec![])), &PositionCache::new()).unwrap();
        assert!(out.decorations.is_empty());
    }

    #[test]
    fn test_no_target_types() {
        let coordinator = HighlightCoordinator::new(parsers(&["json"])).with_target_types(Vec::<String>::new());
        let out = coordinator.recompute(Some(&sample()), &PositionCache::new()).unwrap();
        assert!(out.decorations.is_empty());
        assert!(out.cache.is_empty());
    }

    #[test]
    fn test_no_resolver() {
        let coordinator = HighlightCoordinator::new(parsers(&["json"])).without_resolver();
        let out = coordinator.recompute(Some(&sample()), &PositionCache::new()).unwrap();
        assert!(out.decorations.is_empty());
        assert!(out.cache.is_empty());
    }

    // ==================== Rendering ====================

    #[test]
    fn test_only_resolved_targets_render() {
        let coordinator = HighlightCoordinator::new(parsers(&["json"]));
        let out = coordinator.recompute(Some(&sample()), &PositionCache::new()).unwrap();

        // The json block's number sits at 2; the plain block has no parser.
        assert!(out.decorations.ranges().contains(&StyledRange::new(2, 3, "tok-number")));
        assert!(out.decorations.iter().all(|range| range.to <= 5));
        assert_eq!(out.cache.positions(), vec![0]);
    }

    #[test]
    fn test_wildcard_parser_catches_unknown_languages() {
        let registry = LanguageRegistry::new();
        let parsers = parsers(&["json"]).with_fallback(TreeSitterParser::from_registry(&registry, "json").unwrap());
        let coordinator = HighlightCoordinator::new(parsers);
        let out = coordinator.recompute(Some(&sample()), &PositionCache::new()).unwrap();
        assert_eq!(out.cache.positions(), vec![0, 12]);
        assert!(out.decorations.ranges().contains(&StyledRange::new(14, 15, "tok-number")));
    }

    #[test]
    fn test_cached_ranges_reused_without_hook() {
        let coordinator = HighlightCoordinator::new(parsers(&["json"]));
        let doc = sample();
        let mut cache = PositionCache::new();
        let stale = vec![StyledRange::new(1, 2, "cached")];
        cache.set(TargetPos::At(0), doc.node_at(0).unwrap().clone(), Artifact::from_ranges(stale.clone()));

        let out = coordinator.recompute(Some(&doc), &cache).unwrap();
        assert_eq!(out.decorations.ranges(), stale.as_slice());
    }

    #[test]
    fn test_entry_for_other_node_is_ignored() {
        let coordinator = HighlightCoordinator::new(parsers(&["json"]));
        let mut cache = PositionCache::new();
        cache.set(
            TargetPos::At(0),
            Node::code_block("json", "[9]"),
            Artifact::from_ranges(vec![StyledRange::new(1, 2, "cached")]),
        );

        let out = coordinator.recompute(Some(&sample()), &cache).unwrap();
        assert!(out.decorations.iter().all(|range| range.class != "cached"));
        assert_eq!(out.cache.get(TargetPos::At(0)).unwrap().node, Node::code_block("json", "[1]"));
    }

    #[test]
    fn test_input_cache_untouched() {
        let coordinator = HighlightCoordinator::new(parsers(&["json"]));
        let cache = PositionCache::new();
        let out = coordinator.recompute(Some(&sample()), &cache).unwrap();
        assert!(cache.is_empty());
        assert_eq!(out.cache.len(), 1);
    }

    #[test]
    fn test_policy_controls_artifact() {
        let coordinator = HighlightCoordinator::new(parsers(&["json"])).with_policy(ArtifactPolicy::ParseState);
        let out = coordinator.recompute(Some(&sample()), &PositionCache::new()).unwrap();
        let artifact = &out.cache.get(TargetPos::At(0)).unwrap().artifact;
        assert!(artifact.tree.is_some());
        assert!(artifact.ranges.is_none());

        // Without cached ranges the next pass renders again and agrees.
        let again = coordinator.recompute(Some(&sample()), &out.cache).unwrap();
        assert_eq!(again.decorations, out.decorations);
    }

    // ==================== Hooks ====================

    #[test]
    fn test_pre_render_skip_contributes_its_ranges() {
        let coordinator = HighlightCoordinator::new(parsers(&["json"]))
            .with_pre_render(|_: &Node, pos, _| PreRender::Skip(vec![StyledRange::new(pos.content_start(), pos.content_start() + 1, "x")]));
        let out = coordinator.recompute(Some(&sample()), &PositionCache::new()).unwrap();
        assert_eq!(
            out.decorations.ranges(),
            &[StyledRange::new(1, 2, "x"), StyledRange::new(13, 14, "x")]
        );
        assert!(out.cache.is_empty());
    }

    #[test]
    fn test_pre_render_reparse_ignores_cache() {
        let coordinator = HighlightCoordinator::new(parsers(&["json"])).with_pre_render(|_: &Node, _, _| PreRender::Reparse);
        let doc = sample();
        let mut cache = PositionCache::new();
        cache.set(
            TargetPos::At(0),
            doc.node_at(0).unwrap().clone(),
            Artifact::from_ranges(vec![StyledRange::new(1, 2, "cached")]),
        );

        let out = coordinator.recompute(Some(&doc), &cache).unwrap();
        assert!(out.decorations.ranges().contains(&StyledRange::new(2, 3, "tok-number")));
        assert!(out.decorations.iter().all(|range| range.class != "cached"));
    }

    #[test]
    fn test_post_render_sees_rendered_targets() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        let coordinator = HighlightCoordinator::new(parsers(&["json"]))
            .with_post_render(move |node: &Node, pos, ranges| log.borrow_mut().push((node.type_name().to_string(), pos, ranges.len())));
        coordinator.recompute(Some(&sample()), &PositionCache::new()).unwrap();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "code_block");
        assert_eq!(seen[0].1, TargetPos::At(0));
        assert!(seen[0].2 > 0);
    }
}
