// Chunk: docs/chunks/overlay_plugin - Driving the highlight pass from editor transactions

//! The overlay as the editor sees it: a state value and a transition.
//!
//! The editor calls [`HighlightPlugin::init`] once for the initial document
//! and [`HighlightPlugin::apply`] for every transaction after that. Each
//! call returns a new [`HighlightState`]; the previous one is left intact.
//!
//! ```ignore
//! let plugin = HighlightPlugin::new(coordinator);
//! let mut state = plugin.init(tr.before())?;
//! tr.insert_text(5, "x")?;
//! state = plugin.apply(&state, &tr, tr.doc())?;
//! for range in state.decorations() {
//!     paint(range.from, range.to, &range.class);
//! }
//! ```

use lite_edit_doc::{DocNode, PositionMapping};
use tracing::trace;

use crate::cache::PositionCache;
use crate::coordinator::{HighlightCoordinator, Recomputed};
use crate::decoration::DecorationSet;
use crate::error::HighlightError;

/// The overlay's state for one version of the document.
#[derive(Debug, Clone)]
pub struct HighlightState<N> {
    cache: PositionCache<N>,
    decorations: DecorationSet,
}

impl<N: DocNode> HighlightState<N> {
    pub fn cache(&self) -> &PositionCache<N> {
        &self.cache
    }

    pub fn decorations(&self) -> &DecorationSet {
        &self.decorations
    }
}

impl<N> From<Recomputed<N>> for HighlightState<N> {
    fn from(out: Recomputed<N>) -> Self {
        Self {
            cache: out.cache,
            decorations: out.decorations,
        }
    }
}

#[derive(Debug)]
pub struct HighlightPlugin<N> {
    coordinator: HighlightCoordinator<N>,
}

impl<N: DocNode> HighlightPlugin<N> {
    pub fn new(coordinator: HighlightCoordinator<N>) -> Self {
        Self { coordinator }
    }

    pub fn coordinator(&self) -> &HighlightCoordinator<N> {
        &self.coordinator
    }

    /// Computes the state for the initial document from an empty cache.
    pub fn init(&self, doc: &N) -> Result<HighlightState<N>, HighlightError> {
        self.coordinator.recompute(Some(doc), &PositionCache::new()).map(Into::into)
    }

    /// Carries `state` through one transaction.
    ///
    /// `mapping` describes the transaction's steps and `doc` is the
    /// document after them. The cache is always invalidated first. When the
    /// document did not change the existing decorations are mapped through
    /// the transaction; otherwise they are recomputed from the invalidated
    /// cache.
    pub fn apply(
        &self,
        state: &HighlightState<N>,
        mapping: &dyn PositionMapping,
        doc: &N,
    ) -> Result<HighlightState<N>, HighlightError> {
        let cache = state.cache.invalidate(mapping, doc);

        if !mapping.doc_changed() {
            trace!("document unchanged, mapping decorations");
            return Ok(HighlightState {
                cache,
                decorations: state.decorations.map(mapping),
            });
        }

        self.coordinator.recompute(Some(doc), &cache).map(Into::into)
    }
}
