// Chunk: docs/chunks/document_model - Tree document and position mapping for the highlight overlay

//! Position mapping across edits.
//!
//! A `StepMap` describes one replacement as a list of changed ranges in the
//! old coordinate space. A `Mapping` chains step maps so that a position from
//! the document before a transaction can be carried to the document after it.

/// Which side a position sticks to when content is inserted exactly at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bias {
    Left,
    Right,
}

/// The result of mapping a single position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapResult {
    /// The mapped position.
    pub pos: usize,
    /// True when the position was inside replaced content.
    pub deleted: bool,
}

/// A replaced range: `from_a..to_a` in the old document became
/// `from_b..to_b` in the new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangedRange {
    pub from_a: usize,
    pub to_a: usize,
    pub from_b: usize,
    pub to_b: usize,
}

/// Maps positions from the document before a change to the document after.
pub trait PositionMapping {
    /// Maps `pos` and reports whether it was inside deleted content.
    fn map_result_with(&self, pos: usize, bias: Bias) -> MapResult;

    /// Right-biased `map_result_with`.
    fn map_result(&self, pos: usize) -> MapResult {
        self.map_result_with(pos, Bias::Right)
    }

    fn map(&self, pos: usize, bias: Bias) -> usize {
        self.map_result_with(pos, bias).pos
    }

    /// Changed ranges, each expressed in the coordinates of the final document
    /// for its `_b` side and of the original document for its `_a` side.
    fn changed_ranges(&self) -> Vec<ChangedRange>;

    /// True when the mapping changes at least one position.
    fn doc_changed(&self) -> bool {
        !self.changed_ranges().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Range {
    start: usize,
    old_size: usize,
    new_size: usize,
}

/// The position map of a single replace step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepMap {
    ranges: Vec<Range>,
}

impl StepMap {
    /// A map that replaces `from..to` with `new_size` positions.
    pub fn replace(from: usize, to: usize, new_size: usize) -> Self {
        if from == to && new_size == 0 {
            return Self::default();
        }
        StepMap {
            ranges: vec![Range {
                start: from,
                old_size: to - from,
                new_size,
            }],
        }
    }

    /// A map that changes nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

impl PositionMapping for StepMap {
    fn map_result_with(&self, pos: usize, bias: Bias) -> MapResult {
        let mut diff: isize = 0;
        for range in &self.ranges {
            let start = range.start;
            if start > pos {
                break;
            }
            let end = start + range.old_size;
            if pos <= end {
                let side = if range.old_size == 0 {
                    bias
                } else if pos == start {
                    Bias::Left
                } else if pos == end {
                    Bias::Right
                } else {
                    bias
                };
                let base = (start as isize + diff) as usize;
                let mapped = match side {
                    Bias::Left => base,
                    Bias::Right => base + range.new_size,
                };
                let anchor = match side {
                    Bias::Left => start,
                    Bias::Right => end,
                };
                return MapResult {
                    pos: mapped,
                    deleted: pos != anchor,
                };
            }
            diff += range.new_size as isize - range.old_size as isize;
        }
        MapResult {
            pos: (pos as isize + diff) as usize,
            deleted: false,
        }
    }

    fn changed_ranges(&self) -> Vec<ChangedRange> {
        let mut diff: isize = 0;
        self.ranges
            .iter()
            .map(|range| {
                let from_b = (range.start as isize + diff) as usize;
                diff += range.new_size as isize - range.old_size as isize;
                ChangedRange {
                    from_a: range.start,
                    to_a: range.start + range.old_size,
                    from_b,
                    to_b: from_b + range.new_size,
                }
            })
            .collect()
    }
}

/// A sequence of step maps applied in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mapping {
    maps: Vec<StepMap>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, map: StepMap) {
        self.maps.push(map);
    }

    pub fn maps(&self) -> &[StepMap] {
        &self.maps
    }
}

impl FromIterator<StepMap> for Mapping {
    fn from_iter<I: IntoIterator<Item = StepMap>>(iter: I) -> Self {
        Mapping {
            maps: iter.into_iter().collect(),
        }
    }
}

impl PositionMapping for Mapping {
    fn map_result_with(&self, pos: usize, bias: Bias) -> MapResult {
        let mut pos = pos;
        let mut deleted = false;
        for map in &self.maps {
            let result = map.map_result_with(pos, bias);
            pos = result.pos;
            deleted |= result.deleted;
        }
        MapResult { pos, deleted }
    }

    fn changed_ranges(&self) -> Vec<ChangedRange> {
        // Each step's ranges are carried forward through the later steps on
        // the b side and back through the earlier steps on the a side.
        let mut ranges = Vec::new();
        for (idx, map) in self.maps.iter().enumerate() {
            for changed in map.changed_ranges() {
                let mut from_b = changed.from_b;
                let mut to_b = changed.to_b;
                for later in &self.maps[idx + 1..] {
                    from_b = later.map(from_b, Bias::Left);
                    to_b = later.map(to_b, Bias::Right);
                }
                let mut from_a = changed.from_a;
                let mut to_a = changed.to_a;
                for earlier in self.maps[..idx].iter().rev() {
                    from_a = invert(earlier).map(from_a, Bias::Left);
                    to_a = invert(earlier).map(to_a, Bias::Right);
                }
                ranges.push(ChangedRange {
                    from_a,
                    to_a,
                    from_b,
                    to_b: to_b.max(from_b),
                });
            }
        }
        ranges.sort_by_key(|r| (r.from_b, r.to_b));
        ranges
    }
}

fn invert(map: &StepMap) -> StepMap {
    let mut diff: isize = 0;
    StepMap {
        ranges: map
            .ranges
            .iter()
            .map(|range| {
                let start = (range.start as isize + diff) as usize;
                diff += range.new_size as isize - range.old_size as isize;
                Range {
                    start,
                    old_size: range.new_size,
                    new_size: range.old_size,
                }
            })
            .collect(),
    }
}
