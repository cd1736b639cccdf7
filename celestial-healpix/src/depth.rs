//! Depth and cell id validation.
//!
//! Every public entry point funnels through [`check_depth`] and
//! [`check_cell`] before doing any arithmetic, so the bit tricks used
//! elsewhere can assume `depth <= 29` and `id < 12·4^depth`.

use crate::constants::{MAX_DEPTH, N_BASE_CELLS};
use crate::error::{HealpixError, HealpixResult};

pub fn check_depth(depth: u8) -> HealpixResult<()> {
    if depth > MAX_DEPTH {
        return Err(HealpixError::invalid_depth(depth));
    }
    Ok(())
}

/// Checks both the depth and that `cell` lies in `[0, 12·4^depth)`.
pub fn check_cell(depth: u8, cell: u64) -> HealpixResult<()> {
    check_depth(depth)?;
    if cell >= n_cells(depth) {
        return Err(HealpixError::invalid_cell(depth, cell));
    }
    Ok(())
}

/// Number of cells along a face edge, `2^depth`.
#[inline]
pub fn nside(depth: u8) -> u64 {
    1u64 << depth
}

/// Total number of cells at `depth`, `12·4^depth`.
#[inline]
pub fn n_cells(depth: u8) -> u64 {
    N_BASE_CELLS << (2 * depth as u32)
}

/// Mean angular size of a cell edge in radians.
pub fn cell_angular_size(depth: u8) -> f64 {
    libm::sqrt(4.0 * crate::constants::PI / n_cells(depth) as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_n_cells() {
        assert_eq!(n_cells(0), 12);
        assert_eq!(n_cells(1), 48);
        assert_eq!(n_cells(29), 12 * (1u64 << 58));
    }

    #[test]
    fn test_check_depth() {
        assert!(check_depth(0).is_ok());
        assert!(check_depth(29).is_ok());
        assert_eq!(check_depth(30), Err(HealpixError::invalid_depth(30)));
    }

    #[test]
    fn test_check_cell_bounds() {
        assert!(check_cell(0, 11).is_ok());
        assert_eq!(check_cell(0, 12), Err(HealpixError::invalid_cell(0, 12)));
        assert!(check_cell(2, 191).is_ok());
        assert!(check_cell(2, 192).is_err());
        assert!(matches!(
            check_cell(31, 0),
            Err(HealpixError::InvalidDepth { depth: 31 })
        ));
    }

    #[test]
    fn test_cell_angular_size_shrinks() {
        let s0 = cell_angular_size(0);
        let s1 = cell_angular_size(1);
        assert!((s0 / s1 - 2.0).abs() < 1e-12);
    }
}
