//! Moving cells between depths.
//!
//! In the nested layout a cell's id at a coarser depth is its id with the
//! lowest `2Δ` bits dropped, and its descendants `Δ` levels down form the
//! contiguous block `id·4^Δ .. (id + 1)·4^Δ`.

use std::ops::Range;

use crate::depth::{check_cell, check_depth, n_cells};
use crate::error::{HealpixError, HealpixResult};

/// Ancestor of `cell` at the coarser `new_depth`.
pub fn parent(depth: u8, cell: u64, new_depth: u8) -> HealpixResult<u64> {
    check_cell(depth, cell)?;
    check_depth(new_depth)?;
    if new_depth > depth {
        return Err(HealpixError::invalid_parameter(format!(
            "parent depth {} is finer than the cell depth {}",
            new_depth, depth
        )));
    }
    Ok(cell >> (2 * (depth - new_depth) as u32))
}

/// Descendants of `cell` at the finer `new_depth`, as an id range.
pub fn children(depth: u8, cell: u64, new_depth: u8) -> HealpixResult<Range<u64>> {
    check_cell(depth, cell)?;
    check_depth(new_depth)?;
    if new_depth < depth {
        return Err(HealpixError::invalid_parameter(format!(
            "children depth {} is coarser than the cell depth {}",
            new_depth, depth
        )));
    }
    let shift = 2 * (new_depth - depth) as u32;
    Ok(cell << shift..(cell + 1) << shift)
}

/// Cells covering `cell` at `new_depth`.
///
/// The identity when the depths are equal, the single parent when zooming
/// out and the `4^Δ` children when zooming in.
pub fn zoom_to(depth: u8, cell: u64, new_depth: u8) -> HealpixResult<Range<u64>> {
    if new_depth <= depth {
        let p = parent(depth, cell, new_depth)?;
        Ok(p..p + 1)
    } else {
        children(depth, cell, new_depth)
    }
}

/// The four cells sharing `cell`'s parent, including `cell` itself. At depth
/// 0 these are the twelve base cells.
pub fn siblings(depth: u8, cell: u64) -> HealpixResult<Range<u64>> {
    check_cell(depth, cell)?;
    if depth == 0 {
        return Ok(0..n_cells(0));
    }
    let first = cell & !3;
    Ok(first..first + 4)
}

/// Number of cells a zoom from `depth` to `new_depth` yields per input cell.
pub fn zoom_width(depth: u8, new_depth: u8) -> usize {
    if new_depth <= depth {
        1
    } else {
        1usize << (2 * (new_depth - depth) as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_in_base_cell() {
        assert_eq!(zoom_to(0, 0, 1).unwrap(), 0..4);
        assert_eq!(zoom_to(0, 11, 2).unwrap(), 176..192);
    }

    #[test]
    fn test_zoom_out() {
        assert_eq!(zoom_to(2, 47, 1).unwrap(), 11..12);
        assert_eq!(zoom_to(2, 47, 0).unwrap(), 2..3);
        assert_eq!(zoom_to(3, 100, 3).unwrap(), 100..101);
    }

    #[test]
    fn test_zoom_in_then_out_contains_cell() {
        for depth in 0..6u8 {
            for cell in (0..n_cells(depth)).step_by(7) {
                for child in zoom_to(depth, cell, depth + 1).unwrap() {
                    assert_eq!(zoom_to(depth + 1, child, depth).unwrap(), cell..cell + 1);
                }
            }
        }
    }

    #[test]
    fn test_deepest_children() {
        let last = n_cells(0) - 1;
        let range = children(0, last, 29).unwrap();
        assert_eq!(range.end, n_cells(29));
        assert_eq!(range.end - range.start, 1 << 58);
    }

    #[test]
    fn test_invalid_requests() {
        assert!(zoom_to(1, 48, 2).is_err());
        assert!(zoom_to(1, 0, 30).is_err());
        assert!(parent(1, 0, 2).is_err());
        assert!(children(2, 0, 1).is_err());
    }

    #[test]
    fn test_siblings() {
        assert_eq!(siblings(0, 5).unwrap(), 0..12);
        assert_eq!(siblings(1, 6).unwrap(), 4..8);
        assert_eq!(siblings(3, 767).unwrap(), 764..768);
    }

    #[test]
    fn test_zoom_width() {
        assert_eq!(zoom_width(3, 1), 1);
        assert_eq!(zoom_width(1, 1), 1);
        assert_eq!(zoom_width(1, 3), 16);
    }
}
