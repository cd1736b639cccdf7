//! The interval set itself and its set algebra.

use std::fmt;
use std::ops::Range;

use celestial_healpix::{check_depth, n_cells, Ellipsoid, Layer, Scheme, Zone};

use crate::error::{MocError, MocResult};

/// A set of nested cell ids at one depth, stored as sorted half-open
/// intervals.
///
/// The intervals are ascending, non-empty, and neither overlap nor touch,
/// so every set has exactly one representation and storage grows with the
/// number of runs rather than the number of cells. Every operation returns
/// a new index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RangeMocIndex {
    depth: u8,
    ranges: Vec<Range<u64>>,
}

impl RangeMocIndex {
    pub fn empty(depth: u8) -> MocResult<Self> {
        check_depth(depth)?;
        Ok(Self {
            depth,
            ranges: Vec::new(),
        })
    }

    /// Every cell of the sphere at `depth`.
    pub fn full_domain(depth: u8) -> MocResult<Self> {
        check_depth(depth)?;
        Ok(Self {
            depth,
            ranges: vec![0..n_cells(depth)],
        })
    }

    /// Builds an index from cell ids in any order, duplicates allowed.
    pub fn from_cell_ids<I>(depth: u8, cell_ids: I) -> MocResult<Self>
    where
        I: IntoIterator<Item = u64>,
    {
        check_depth(depth)?;
        let max = n_cells(depth);
        let mut ids: Vec<u64> = cell_ids.into_iter().collect();
        if let Some(&bad) = ids.iter().find(|&&id| id >= max) {
            return Err(celestial_healpix::HealpixError::invalid_cell(depth, bad).into());
        }
        if !ids.windows(2).all(|w| w[0] <= w[1]) {
            ids.sort_unstable();
        }
        Ok(Self::from_sorted_ids(depth, ids))
    }

    /// Builds an index from arbitrary intervals, merging overlapping and
    /// touching ones. Empty intervals are ignored.
    pub fn from_intervals<I>(depth: u8, intervals: I) -> MocResult<Self>
    where
        I: IntoIterator<Item = Range<u64>>,
    {
        check_depth(depth)?;
        let max = n_cells(depth);
        let mut sorted: Vec<Range<u64>> = intervals.into_iter().filter(|r| r.start < r.end).collect();
        if let Some(bad) = sorted.iter().find(|r| r.end > max) {
            return Err(MocError::invalid_intervals(format!(
                "interval {:?} exceeds the {} cells of depth {}",
                bad, max, depth
            )));
        }
        sorted.sort_unstable_by_key(|r| r.start);
        let mut ranges = Vec::with_capacity(sorted.len());
        for r in sorted {
            push_range(&mut ranges, r);
        }
        Ok(Self { depth, ranges })
    }

    /// Cells at `depth` overlapping a longitude/latitude zone of
    /// `ellipsoid`. Whole blocks inside the zone stay single intervals.
    pub fn zone_coverage(depth: u8, zone: &Zone, ellipsoid: &Ellipsoid) -> MocResult<Self> {
        let ranges = celestial_healpix::zone_coverage(depth, zone, ellipsoid)?;
        Self::from_canonical(depth, ranges)
    }

    /// Wraps intervals that must already be canonical.
    pub(crate) fn from_canonical(depth: u8, ranges: Vec<Range<u64>>) -> MocResult<Self> {
        check_depth(depth)?;
        let max = n_cells(depth);
        if let Some(bad) = ranges.iter().find(|r| r.start >= r.end || r.end > max) {
            return Err(MocError::invalid_intervals(format!(
                "interval {:?} is empty or exceeds the {} cells of depth {}",
                bad, max, depth
            )));
        }
        if let Some(pair) = ranges.windows(2).find(|w| w[0].end >= w[1].start) {
            return Err(MocError::invalid_intervals(format!(
                "intervals {:?} and {:?} are out of order, overlap or touch",
                pair[0], pair[1]
            )));
        }
        Ok(Self { depth, ranges })
    }

    pub(crate) fn from_sorted_ids(depth: u8, ids: impl IntoIterator<Item = u64>) -> Self {
        let mut ranges: Vec<Range<u64>> = Vec::new();
        for id in ids {
            push_range(&mut ranges, id..id + 1);
        }
        Self { depth, ranges }
    }

    pub(crate) fn with_ranges(&self, ranges: Vec<Range<u64>>) -> Self {
        Self {
            depth: self.depth,
            ranges,
        }
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Number of cells in the set.
    pub fn size(&self) -> u64 {
        self.ranges.iter().map(|r| r.end - r.start).sum()
    }

    /// Bytes used by the interval bounds.
    pub fn nbytes(&self) -> usize {
        self.ranges.len() * 2 * std::mem::size_of::<u64>()
    }

    pub fn n_intervals(&self) -> usize {
        self.ranges.len()
    }

    pub fn intervals(&self) -> &[Range<u64>] {
        &self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn contains(&self, cell: u64) -> bool {
        let i = self.ranges.partition_point(|r| r.end <= cell);
        self.ranges.get(i).is_some_and(|r| r.start <= cell)
    }

    /// Ascending cell ids, produced lazily.
    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.ranges.iter().flat_map(|r| r.clone())
    }

    /// Every cell id, ascending.
    pub fn cell_ids(&self) -> Vec<u64> {
        let mut ids = Vec::with_capacity(self.size() as usize);
        ids.extend(self.iter());
        ids
    }

    pub fn union(&self, other: &Self) -> MocResult<Self> {
        self.check_same_depth(other)?;
        let (a, b) = (&self.ranges, &other.ranges);
        let mut out = Vec::with_capacity(a.len() + b.len());
        let (mut i, mut j) = (0, 0);
        while i < a.len() || j < b.len() {
            let take_a = j >= b.len() || (i < a.len() && a[i].start <= b[j].start);
            if take_a {
                push_range(&mut out, a[i].clone());
                i += 1;
            } else {
                push_range(&mut out, b[j].clone());
                j += 1;
            }
        }
        Ok(self.with_ranges(out))
    }

    pub fn intersection(&self, other: &Self) -> MocResult<Self> {
        self.check_same_depth(other)?;
        Ok(self.with_ranges(intersect(&self.ranges, &other.ranges)))
    }

    /// Cells of `self` that are not in `other`.
    pub fn difference(&self, other: &Self) -> MocResult<Self> {
        self.check_same_depth(other)?;
        let b = &other.ranges;
        let mut out = Vec::with_capacity(self.ranges.len());
        let mut j = 0;
        for a in &self.ranges {
            let mut start = a.start;
            while j < b.len() && b[j].end <= start {
                j += 1;
            }
            let mut k = j;
            while k < b.len() && b[k].start < a.end {
                if b[k].start > start {
                    out.push(start..b[k].start);
                }
                start = start.max(b[k].end);
                k += 1;
            }
            if start < a.end {
                out.push(start..a.end);
            }
        }
        Ok(self.with_ranges(out))
    }

    /// Every cell of the sphere not in `self`.
    pub fn complement(&self) -> Self {
        let mut out = Vec::with_capacity(self.ranges.len() + 1);
        let mut next = 0;
        for r in &self.ranges {
            if r.start > next {
                out.push(next..r.start);
            }
            next = r.end;
        }
        let max = n_cells(self.depth);
        if next < max {
            out.push(next..max);
        }
        self.with_ranges(out)
    }

    /// Cells of the set with at least one existing neighbour outside it.
    ///
    /// Every interval is split into aligned nested blocks. A block whose
    /// neighbouring blocks at its own depth all lie inside the set holds no
    /// boundary cell; any other block is examined through its four children.
    /// The work follows the length of the boundary, not the number of cells.
    pub fn internal_boundary(&self) -> MocResult<Self> {
        let layers = (0..=self.depth).map(Layer::new).collect::<Result<Vec<_>, _>>()?;
        let mut boundary: Vec<Range<u64>> = Vec::new();
        for r in &self.ranges {
            for (order, block) in aligned_blocks(r.clone(), self.depth) {
                self.collect_boundary(&layers, order, block, &mut boundary)?;
            }
        }
        tracing::trace!(
            depth = self.depth,
            intervals = self.ranges.len(),
            boundary_intervals = boundary.len(),
            "computed internal boundary"
        );
        Ok(self.with_ranges(boundary))
    }

    /// `block` is a cell at depth `self.depth - order` whose `4^order`
    /// descendants all belong to the set.
    fn collect_boundary(
        &self,
        layers: &[Layer],
        order: u8,
        block: u64,
        out: &mut Vec<Range<u64>>,
    ) -> MocResult<()> {
        let layer = &layers[(self.depth - order) as usize];
        let shift = 2 * order as u32;
        let enclosed = layer
            .neighbours(Scheme::Nested, block)?
            .iter()
            .filter(|&&n| n >= 0)
            .all(|&n| self.covers((n as u64) << shift..(n as u64 + 1) << shift));
        if enclosed {
            return Ok(());
        }
        if order == 0 {
            push_range(out, block..block + 1);
            return Ok(());
        }
        for child in block << 2..(block << 2) + 4 {
            self.collect_boundary(layers, order - 1, child, out)?;
        }
        Ok(())
    }

    /// Whether every cell of `cells` belongs to the set.
    pub fn covers(&self, cells: Range<u64>) -> bool {
        if cells.start >= cells.end {
            return true;
        }
        let i = self.ranges.partition_point(|r| r.end <= cells.start);
        self.ranges
            .get(i)
            .is_some_and(|r| r.start <= cells.start && cells.end <= r.end)
    }

    pub(crate) fn check_same_depth(&self, other: &Self) -> MocResult<()> {
        check_depths(self.depth, other.depth)
    }

    /// Position of each interval's first cell in the ascending id sequence.
    pub(crate) fn offsets(&self) -> Vec<u64> {
        self.ranges
            .iter()
            .scan(0u64, |acc, r| {
                let start = *acc;
                *acc += r.end - r.start;
                Some(start)
            })
            .collect()
    }

    /// Number of cells of the set below `cell`.
    pub(crate) fn rank(&self, offsets: &[u64], cell: u64) -> u64 {
        let i = self.ranges.partition_point(|r| r.end <= cell);
        match self.ranges.get(i) {
            Some(r) if r.start < cell => offsets[i] + (cell - r.start),
            Some(_) => offsets[i],
            None => self.size(),
        }
    }
}

impl fmt::Display for RangeMocIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RangeMocIndex(depth={}, size={}, intervals={})",
            self.depth,
            self.size(),
            self.ranges.len()
        )
    }
}

pub(crate) fn check_depths(left: u8, right: u8) -> MocResult<()> {
    if left != right {
        return Err(MocError::depth_mismatch(left, right));
    }
    Ok(())
}

/// Appends `r` to a list sorted by start, merging it into the last interval
/// when they overlap or touch.
pub(crate) fn push_range(out: &mut Vec<Range<u64>>, r: Range<u64>) {
    if r.start >= r.end {
        return;
    }
    match out.last_mut() {
        Some(last) if last.end >= r.start => last.end = last.end.max(r.end),
        _ => out.push(r),
    }
}

/// Splits `cells` into maximal aligned nested blocks, ascending, as
/// `(order, id)` pairs: block `id` at depth `depth - order` spans the cells
/// `id·4^order..(id + 1)·4^order`.
fn aligned_blocks(cells: Range<u64>, depth: u8) -> impl Iterator<Item = (u8, u64)> {
    let mut start = cells.start;
    std::iter::from_fn(move || {
        if start >= cells.end {
            return None;
        }
        let aligned = if start == 0 {
            depth as u32
        } else {
            (start.trailing_zeros() / 2).min(depth as u32)
        };
        let mut order = aligned;
        while 1u64 << (2 * order) > cells.end - start {
            order -= 1;
        }
        let block = start >> (2 * order);
        start += 1u64 << (2 * order);
        Some((order as u8, block))
    })
}

pub(crate) fn intersect(a: &[Range<u64>], b: &[Range<u64>]) -> Vec<Range<u64>> {
    let mut out = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        let lo = a[i].start.max(b[j].start);
        let hi = a[i].end.min(b[j].end);
        push_range(&mut out, lo..hi);
        if a[i].end < b[j].end {
            i += 1;
        } else {
            j += 1;
        }
    }
    out
}
