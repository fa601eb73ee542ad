// Chunk: docs/chunks/position_cache - Position-keyed artifact cache and its invalidation

//! The position-keyed cache of per-node highlight artifacts.
//!
//! Each entry remembers the node that occupied its position when it was
//! rendered and what rendering produced (the parse tree, the ranges, or
//! both). After an edit, [`PositionCache::invalidate`] carries entries to
//! their new positions, keeping only those whose node is still structurally
//! equal: a matching position with different content is stale.
//!
//! # Ownership
//!
//! A cache is a value. Entries sit behind `Arc`, so cloning a cache shares
//! every entry, and `invalidate` builds a new cache without touching the
//! one it was called on. A state holding a cache never observes later
//! changes made to a clone.
//!
//! # Re-parse seeds
//!
//! When an entry is dropped because its node's content changed (the node
//! survived the edit and kept its type), the cached tree is edited to the
//! node's new text and kept as a seed at the new position. The next
//! recompute pass hands the seed to the parser, turning the re-parse of an
//! edited node into an incremental one. Seeds are never returned by
//! [`PositionCache::get`].

use std::sync::Arc;

use lite_edit_doc::{DocNode, PositionMapping};
use lite_edit_syntax::SyntaxTree;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::decoration::StyledRange;
use crate::engine::Rendered;
use crate::locator::TargetPos;

/// What a cache entry keeps from rendering a node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Artifact {
    /// Parse state for seeding the next parse.
    pub tree: Option<SyntaxTree>,
    /// Rendered ranges in absolute document positions.
    pub ranges: Option<Vec<StyledRange>>,
}

impl Artifact {
    pub fn from_tree(tree: SyntaxTree) -> Self {
        Self {
            tree: Some(tree),
            ranges: None,
        }
    }

    pub fn from_ranges(ranges: Vec<StyledRange>) -> Self {
        Self {
            tree: None,
            ranges: Some(ranges),
        }
    }

    /// Returns the artifact as it applies after its node moved from
    /// `old_pos` to `new_pos` with its content unchanged.
    ///
    /// Parse trees hold node-local offsets and are kept as they are. Cached
    /// ranges are absolute and move by the node's displacement.
    pub fn moved(&self, old_pos: usize, new_pos: usize) -> Artifact {
        Artifact {
            tree: self.tree.clone(),
            ranges: self
                .ranges
                .as_ref()
                .map(|ranges| ranges.iter().map(|range| range.moved(old_pos, new_pos)).collect()),
        }
    }
}

/// Which parts of a render result are cached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactPolicy {
    /// Only the parse tree: every pass re-highlights, re-parsing incrementally.
    ParseState,
    /// Only the ranges: unchanged nodes are not re-parsed, changed ones are
    /// parsed from scratch.
    Ranges,
    #[default]
    Both,
}

impl ArtifactPolicy {
    pub fn artifact(self, rendered: Rendered) -> Artifact {
        match self {
            ArtifactPolicy::ParseState => Artifact::from_tree(rendered.tree),
            ArtifactPolicy::Ranges => Artifact::from_ranges(rendered.ranges),
            ArtifactPolicy::Both => Artifact {
                tree: Some(rendered.tree),
                ranges: Some(rendered.ranges),
            },
        }
    }
}

/// A cached node and its artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<N> {
    pub node: N,
    pub artifact: Artifact,
}

/// Per-node artifacts keyed by document position.
#[derive(Debug, Clone)]
pub struct PositionCache<N> {
    entries: FxHashMap<usize, Arc<CacheEntry<N>>>,
    seeds: FxHashMap<usize, SyntaxTree>,
}

impl<N> Default for PositionCache<N> {
    fn default() -> Self {
        Self {
            entries: FxHashMap::default(),
            seeds: FxHashMap::default(),
        }
    }
}

impl<N: DocNode> PositionCache<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry at `pos`. The root never has one.
    pub fn get(&self, pos: TargetPos) -> Option<&CacheEntry<N>> {
        let pos = pos.offset()?;
        self.entries.get(&pos).map(Arc::as_ref)
    }

    /// Stores an entry at `pos`, overwriting any existing one. Writes for the
    /// root are ignored.
    pub fn set(&mut self, pos: TargetPos, node: N, artifact: Artifact) {
        let Some(pos) = pos.offset() else {
            trace!("ignoring cache write for the document root");
            return;
        };
        self.entries.insert(pos, Arc::new(CacheEntry { node, artifact }));
    }

    /// Moves an entry: removes `old_pos`, then stores the entry at `new_pos`.
    pub fn replace(&mut self, old_pos: TargetPos, new_pos: TargetPos, node: N, artifact: Artifact) {
        self.remove(old_pos);
        self.set(new_pos, node, artifact);
    }

    /// Removes the entry at `pos`, if any.
    pub fn remove(&mut self, pos: TargetPos) {
        if let Some(pos) = pos.offset() {
            self.entries.remove(&pos);
        }
    }

    /// Returns the re-parse seed left at `pos` by the last invalidation.
    pub fn seed(&self, pos: TargetPos) -> Option<&SyntaxTree> {
        self.seeds.get(&pos.offset()?)
    }

    pub fn clear_seeds(&mut self) {
        self.seeds.clear();
    }

    pub fn seed_count(&self) -> usize {
        self.seeds.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Positions of all entries, ascending.
    pub fn positions(&self) -> Vec<usize> {
        let mut positions: Vec<_> = self.entries.keys().copied().collect();
        positions.sort_unstable();
        positions
    }

    /// Carries the cache through an edit.
    ///
    /// `doc` is the document after the edit. For every entry, its position
    /// is mapped through `mapping`; the entry survives only if the position
    /// was not deleted and the node now at the mapped position is
    /// structurally equal to the cached node. Survivors that moved take
    /// their cached ranges with them by the node's own displacement.
    pub fn invalidate(&self, mapping: &dyn PositionMapping, doc: &N) -> PositionCache<N> {
        let mut next = PositionCache::new();

        for (&pos, entry) in &self.entries {
            let result = mapping.map_result(pos);
            let current = if result.deleted { None } else { doc.node_at(result.pos) };

            match current {
                Some(node) if *node == entry.node => {
                    if result.pos == pos {
                        trace!(pos, "cache entry kept");
                        next.entries.insert(pos, Arc::clone(entry));
                    } else {
                        trace!(pos, new_pos = result.pos, "cache entry moved");
                        next.entries.insert(
                            result.pos,
                            Arc::new(CacheEntry {
                                node: entry.node.clone(),
                                artifact: entry.artifact.moved(pos, result.pos),
                            }),
                        );
                    }
                }
                Some(node) if node.type_name() == entry.node.type_name() => {
                    trace!(pos, new_pos = result.pos, "cache entry dropped, node content changed");
                    if let Some(tree) = &entry.artifact.tree {
                        next.seeds.insert(result.pos, tree.edited(&node.text_content()));
                    }
                }
                _ => {
                    trace!(pos, deleted = result.deleted, "cache entry dropped");
                }
            }
        }

        // Seeds not yet consumed by a recompute move with the document.
        for (&pos, seed) in &self.seeds {
            let result = mapping.map_result(pos);
            if !result.deleted && !next.seeds.contains_key(&result.pos) {
                next.seeds.insert(result.pos, seed.clone());
            }
        }

        next
    }
}
