// Chunk: docs/chunks/decoration_mapping - Styled ranges and their mapping across edits

//! Styled ranges and the ordered set the editor paints.

use lite_edit_doc::{Bias, PositionMapping};

/// One highlighted span in absolute document positions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StyledRange {
    pub from: usize,
    pub to: usize,
    /// Space-separated style classes.
    pub class: String,
}

impl StyledRange {
    pub fn new(from: usize, to: usize, class: impl Into<String>) -> Self {
        Self {
            from,
            to,
            class: class.into(),
        }
    }

    /// Moves the range along with a node that moved from `old_start` to
    /// `new_start` without changing its content.
    pub fn moved(&self, old_start: usize, new_start: usize) -> StyledRange {
        StyledRange {
            from: (self.from + new_start).saturating_sub(old_start),
            to: (self.to + new_start).saturating_sub(old_start),
            class: self.class.clone(),
        }
    }
}

/// An ordered sequence of styled ranges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecorationSet {
    ranges: Vec<StyledRange>,
}

impl DecorationSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a set from `ranges`, ordered by start. Ranges with the same
    /// start keep their relative order.
    pub fn new(mut ranges: Vec<StyledRange>) -> Self {
        ranges.sort_by_key(|range| range.from);
        Self { ranges }
    }

    pub fn ranges(&self) -> &[StyledRange] {
        &self.ranges
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StyledRange> {
        self.ranges.iter()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Maps every range through `mapping`.
    ///
    /// Starts stick to the right and ends to the left, so text inserted at
    /// either edge is not styled. Ranges that collapse are dropped.
    pub fn map(&self, mapping: &dyn PositionMapping) -> DecorationSet {
        let ranges = self
            .ranges
            .iter()
            .filter_map(|range| {
                let from = mapping.map(range.from, Bias::Right);
                let to = mapping.map(range.to, Bias::Left);
                (from < to).then(|| StyledRange::new(from, to, range.class.clone()))
            })
            .collect();
        DecorationSet::new(ranges)
    }
}

impl<'a> IntoIterator for &'a DecorationSet {
    type Item = &'a StyledRange;
    type IntoIter = std::slice::Iter<'a, StyledRange>;

    fn into_iter(self) -> Self::IntoIter {
        self.ranges.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lite_edit_doc::StepMap;

    #[test]
    fn test_new_orders_by_start() {
        let set = DecorationSet::new(vec![
            StyledRange::new(10, 12, "b"),
            StyledRange::new(1, 3, "a"),
            StyledRange::new(10, 11, "c"),
        ]);
        let classes: Vec<_> = set.iter().map(|range| range.class.as_str()).collect();
        assert_eq!(classes, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_map_shifts_ranges_after_insert() {
        let set = DecorationSet::new(vec![StyledRange::new(5, 8, "kw")]);
        let mapped = set.map(&StepMap::replace(0, 0, 4));
        assert_eq!(mapped.ranges(), &[StyledRange::new(9, 12, "kw")]);
    }

    #[test]
    fn test_map_does_not_grow_at_edges() {
        let set = DecorationSet::new(vec![StyledRange::new(5, 8, "kw")]);
        let at_start = set.map(&StepMap::replace(5, 5, 2));
        assert_eq!(at_start.ranges(), &[StyledRange::new(7, 10, "kw")]);
        let at_end = set.map(&StepMap::replace(8, 8, 2));
        assert_eq!(at_end.ranges(), &[StyledRange::new(5, 8, "kw")]);
    }

    #[test]
    fn test_map_drops_collapsed_ranges() {
        let set = DecorationSet::new(vec![StyledRange::new(5, 8, "kw"), StyledRange::new(10, 12, "s")]);
        let mapped = set.map(&StepMap::replace(4, 9, 0));
        assert_eq!(mapped.ranges(), &[StyledRange::new(5, 7, "s")]);
    }

    #[test]
    fn test_moved_with_node() {
        let range = StyledRange::new(20, 25, "n");
        assert_eq!(range.moved(18, 30), StyledRange::new(32, 37, "n"));
        assert_eq!(range.moved(18, 3), StyledRange::new(5, 10, "n"));
        assert_eq!(range.moved(18, 18), range);
    }
}
