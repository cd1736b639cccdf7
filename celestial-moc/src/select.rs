//! Positional (`isel`) and label-based (`sel`) selection.
//!
//! Positions address the ascending sequence of cell ids an index stands
//! for. Both kinds of selection are resolved against the interval list and
//! its running offsets, so a contiguous slice never materializes the ids it
//! skips over.

use std::ops::Range;

use celestial_healpix::n_cells;

use crate::error::{MocError, MocResult};
use crate::index::{check_depths, intersect, push_range, RangeMocIndex};
use crate::slice::{ConcreteSlice, Slice};

/// Positions to pick from an index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Indexer<'a> {
    Slice(Slice),
    Positions(&'a [u64]),
}

impl From<Slice> for Indexer<'_> {
    fn from(slice: Slice) -> Self {
        Indexer::Slice(slice)
    }
}

impl<'a> From<&'a [u64]> for Indexer<'a> {
    fn from(positions: &'a [u64]) -> Self {
        Indexer::Positions(positions)
    }
}

/// Cell ids to look up in an index.
///
/// A label slice includes its `stop` label. Missing bounds default to the
/// first and last cell of the depth; the step must be positive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelIndexer<'a> {
    Slice(Slice),
    Labels(&'a [u64]),
}

impl From<Slice> for LabelIndexer<'_> {
    fn from(slice: Slice) -> Self {
        LabelIndexer::Slice(slice)
    }
}

impl<'a> From<&'a [u64]> for LabelIndexer<'a> {
    fn from(labels: &'a [u64]) -> Self {
        LabelIndexer::Labels(labels)
    }
}

/// Positions matched by [`RangeMocIndex::sel`]: a slice when they form one
/// contiguous run, the explicit list otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SelIndexer {
    ConcreteSlice(ConcreteSlice),
    ExplicitIndices(Vec<u64>),
}

impl SelIndexer {
    pub fn len(&self) -> u64 {
        match self {
            SelIndexer::ConcreteSlice(s) => s.len(),
            SelIndexer::ExplicitIndices(p) => p.len() as u64,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn positions(&self) -> Vec<u64> {
        match self {
            SelIndexer::ConcreteSlice(s) => s.positions().map(|p| p as u64).collect(),
            SelIndexer::ExplicitIndices(p) => p.clone(),
        }
    }

    fn from_positions(positions: Vec<u64>) -> Self {
        let contiguous = positions.windows(2).all(|w| w[1] == w[0] + 1);
        match (positions.first(), positions.last()) {
            (Some(&first), Some(&last)) if contiguous => SelIndexer::ConcreteSlice(ConcreteSlice {
                start: first as i64,
                stop: last as i64 + 1,
                step: 1,
            }),
            _ => SelIndexer::ExplicitIndices(positions),
        }
    }
}

impl RangeMocIndex {
    /// The cells at the given positions of the ascending id sequence.
    ///
    /// A slice with step `±1` is resolved on the intervals directly. Any
    /// other step, like an explicit position list, builds the selected ids
    /// one by one, so its cost grows with the number of cells selected.
    pub fn isel<'a>(&self, indexer: impl Into<Indexer<'a>>) -> MocResult<Self> {
        match indexer.into() {
            Indexer::Slice(slice) => self.isel_slice(&slice),
            Indexer::Positions(positions) => self.isel_positions(positions.iter().copied()),
        }
    }

    /// Looks up cell ids at `depth`, silently dropping those not covered.
    ///
    /// Returns the positions of the covered ids along with the index
    /// restricted to them. Explicit labels are deduplicated and sorted
    /// first, so the positions come out ascending.
    ///
    /// A label slice with step 1 is resolved on the intervals directly. A
    /// larger step visits every covered label it hits, so on a deep index
    /// its cost grows with the number of cells selected.
    pub fn sel<'a>(
        &self,
        indexer: impl Into<LabelIndexer<'a>>,
        depth: u8,
    ) -> MocResult<(SelIndexer, Self)> {
        check_depths(self.depth(), depth)?;
        match indexer.into() {
            LabelIndexer::Slice(slice) => self.sel_slice(&slice),
            LabelIndexer::Labels(labels) => {
                let mut labels = labels.to_vec();
                labels.sort_unstable();
                labels.dedup();
                Ok(self.sel_sorted_labels(labels))
            }
        }
    }

    fn isel_slice(&self, slice: &Slice) -> MocResult<Self> {
        let concrete = slice.indices(self.size())?;
        if concrete.is_empty() {
            return Ok(self.with_ranges(Vec::new()));
        }
        match concrete.step {
            1 => Ok(self.position_range(concrete.start as u64..concrete.stop as u64)),
            -1 => Ok(self.position_range((concrete.stop + 1) as u64..(concrete.start + 1) as u64)),
            _ => {
                let mut positions: Vec<u64> = concrete.positions().map(|p| p as u64).collect();
                if concrete.step < 0 {
                    positions.reverse();
                }
                self.isel_positions(positions)
            }
        }
    }

    fn isel_positions(&self, positions: impl IntoIterator<Item = u64>) -> MocResult<Self> {
        let size = self.size();
        let offsets = self.offsets();
        let ranges = self.intervals();
        let mut ids = Vec::new();
        for position in positions {
            if position >= size {
                return Err(MocError::index_out_of_bounds(position, size));
            }
            let i = offsets.partition_point(|&o| o <= position) - 1;
            ids.push(ranges[i].start + (position - offsets[i]));
        }
        if !ids.windows(2).all(|w| w[0] <= w[1]) {
            ids.sort_unstable();
        }
        Ok(Self::from_sorted_ids(self.depth(), ids))
    }

    /// Cells at positions `wanted`, clipped to the index size.
    fn position_range(&self, wanted: Range<u64>) -> Self {
        let mut out = Vec::new();
        let mut offset = 0u64;
        for r in self.intervals() {
            let len = r.end - r.start;
            let lo = wanted.start.max(offset);
            let hi = wanted.end.min(offset + len);
            if lo < hi {
                push_range(&mut out, r.start + (lo - offset)..r.start + (hi - offset));
            }
            offset += len;
            if offset >= wanted.end {
                break;
            }
        }
        self.with_ranges(out)
    }

    fn sel_slice(&self, slice: &Slice) -> MocResult<(SelIndexer, Self)> {
        let last = n_cells(self.depth()) - 1;
        let label = |bound: Option<i64>, default: u64| match bound {
            None => Ok(default),
            Some(v) if v < 0 => Err(MocError::invalid_slice(format!(
                "label bounds must be non-negative, got {}",
                v
            ))),
            Some(v) => Ok(v as u64),
        };
        let start = label(slice.start, 0)?;
        let stop = label(slice.stop, last)?.min(last);
        let step = match slice.step.unwrap_or(1) {
            s if s > 0 => s as u64,
            s => {
                return Err(MocError::invalid_slice(format!(
                    "label slices need a positive step, got {}",
                    s
                )))
            }
        };

        if start > stop {
            let empty = ConcreteSlice { start: 0, stop: 0, step: 1 };
            return Ok((SelIndexer::ConcreteSlice(empty), self.with_ranges(Vec::new())));
        }
        if step > 1 {
            let labels = self.intervals().iter().flat_map(move |r| {
                let lo = r.start.max(start);
                let hi = r.end.min(stop + 1);
                let first = lo + (step - (lo - start) % step) % step;
                (first..hi.max(first)).step_by(step as usize)
            });
            return Ok(self.sel_sorted_labels(labels));
        }

        let window = [start..stop + 1];
        let restricted = self.with_ranges(intersect(self.intervals(), &window));
        let offsets = self.offsets();
        let first = self.rank(&offsets, start);
        let end = self.rank(&offsets, stop + 1);
        let positions = ConcreteSlice {
            start: first as i64,
            stop: end as i64,
            step: 1,
        };
        Ok((SelIndexer::ConcreteSlice(positions), restricted))
    }

    fn sel_sorted_labels(&self, labels: impl IntoIterator<Item = u64>) -> (SelIndexer, Self) {
        let offsets = self.offsets();
        let ranges = self.intervals();
        let mut positions = Vec::new();
        let mut matched = Vec::new();
        for label in labels {
            let i = ranges.partition_point(|r| r.end <= label);
            if let Some(r) = ranges.get(i).filter(|r| r.start <= label) {
                positions.push(offsets[i] + (label - r.start));
                matched.push(label);
            }
        }
        let restricted = Self::from_sorted_ids(self.depth(), matched);
        (SelIndexer::from_positions(positions), restricted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level_one() -> RangeMocIndex {
        RangeMocIndex::from_cell_ids(1, [0, 1, 2, 4, 5, 11, 12, 13, 25, 26, 27]).unwrap()
    }

    #[test]
    fn test_isel_full_slice_is_identity() {
        let idx = level_one();
        assert_eq!(idx.isel(Slice::full()).unwrap(), idx);
    }

    #[test]
    fn test_isel_matches_elementwise_indexing() {
        let idx = level_one();
        let ids = idx.cell_ids();
        let slices = [
            Slice::new(None, Some(4), None),
            Slice::new(Some(2), None, None),
            Slice::range(3, 7),
            Slice::new(Some(1), None, Some(3)),
            Slice::new(None, None, Some(-2)),
            Slice::new(Some(-3), Some(-1), None),
        ];
        for slice in slices {
            let concrete = slice.indices(ids.len() as u64).unwrap();
            let mut expected: Vec<u64> = concrete.positions().map(|p| ids[p as usize]).collect();
            expected.sort_unstable();
            assert_eq!(idx.isel(slice).unwrap().cell_ids(), expected, "{}", slice);
        }

        let positions: &[u64] = &[1, 2, 4, 6, 8];
        assert_eq!(idx.isel(positions).unwrap().cell_ids(), vec![1, 2, 5, 12, 25]);
    }

    #[test]
    fn test_isel_out_of_bounds() {
        let idx = level_one();
        let positions: &[u64] = &[0, 11];
        assert!(matches!(
            idx.isel(positions),
            Err(MocError::IndexOutOfBounds { index: 11, size: 11 })
        ));
    }

    #[test]
    fn test_sel_label_slice_is_inclusive() {
        let idx = level_one();
        let (positions, restricted) = idx.sel(Slice::range(4, 12), 1).unwrap();
        assert_eq!(restricted.cell_ids(), vec![4, 5, 11, 12]);
        assert_eq!(
            positions,
            SelIndexer::ConcreteSlice(ConcreteSlice { start: 3, stop: 7, step: 1 })
        );
    }

    #[test]
    fn test_sel_labels_drop_missing() {
        let idx = level_one();
        let labels: &[u64] = &[27, 3, 0, 27, 12, 40];
        let (positions, restricted) = idx.sel(labels, 1).unwrap();
        assert_eq!(restricted.cell_ids(), vec![0, 12, 27]);
        assert_eq!(positions, SelIndexer::ExplicitIndices(vec![0, 6, 10]));

        let labels: &[u64] = &[4, 5, 11, 12, 13];
        let (positions, _) = idx.sel(labels, 1).unwrap();
        assert_eq!(
            positions,
            SelIndexer::ConcreteSlice(ConcreteSlice { start: 3, stop: 8, step: 1 })
        );
    }

    #[test]
    fn test_sel_stepped_slice() {
        let idx = level_one();
        let (positions, restricted) = idx.sel(Slice::new(Some(0), Some(12), Some(4)), 1).unwrap();
        assert_eq!(restricted.cell_ids(), vec![0, 4, 12]);
        assert_eq!(positions.positions(), vec![0, 3, 6]);
    }

    #[test]
    fn test_sel_depth_mismatch_and_bad_slices() {
        let idx = level_one();
        assert!(matches!(
            idx.sel(Slice::full(), 2),
            Err(MocError::DepthMismatch { left: 1, right: 2 })
        ));
        assert!(idx.sel(Slice::new(Some(-1), None, None), 1).is_err());
        assert!(idx.sel(Slice::new(None, None, Some(-1)), 1).is_err());
    }

    #[test]
    fn test_sel_on_huge_index_stays_compact() {
        let full = RangeMocIndex::full_domain(29).unwrap();
        let (positions, restricted) = full.sel(Slice::range(1 << 40, 1 << 50), 29).unwrap();
        assert_eq!(restricted.n_intervals(), 1);
        assert_eq!(restricted.size(), (1 << 50) - (1 << 40) + 1);
        assert_eq!(positions.len(), restricted.size());
    }

    #[test]
    fn test_sel_stepped_slice_skips_uncovered_labels() {
        let base = 7 * 4u64.pow(29);
        let idx = RangeMocIndex::from_intervals(29, vec![base..base + 10, base + 100..base + 103]).unwrap();
        let (positions, restricted) = idx.sel(Slice::new(None, None, Some(3)), 29).unwrap();
        let expected: Vec<u64> = idx.iter().filter(|id| id % 3 == 0).collect();
        assert_eq!(restricted.cell_ids(), expected);
        let expected_positions: Vec<u64> = idx
            .iter()
            .enumerate()
            .filter(|(_, id)| id % 3 == 0)
            .map(|(p, _)| p as u64)
            .collect();
        assert_eq!(positions.positions(), expected_positions);

        let (_, restricted) = idx.sel(Slice::new(Some(base as i64 + 1), None, Some(4)), 29).unwrap();
        assert_eq!(restricted.cell_ids(), vec![base + 1, base + 5, base + 9, base + 101]);
    }
}

