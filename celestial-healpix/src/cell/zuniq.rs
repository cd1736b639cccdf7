//! Depth-tagged single-integer cell encoding.
//!
//! A nested id at depth `d` is stored as `((id << 1) | 1) << 2·(29 - d)`:
//! the sentinel bit marks where the id ends, so ids of every depth share
//! one ordered `u64` space and coarser cells sort between their children.

use crate::constants::MAX_DEPTH;
use crate::depth::check_cell;
use crate::error::{HealpixError, HealpixResult};

pub fn to_zuniq(depth: u8, cell: u64) -> HealpixResult<u64> {
    check_cell(depth, cell)?;
    Ok(encode(depth, cell))
}

pub fn from_zuniq(zuniq: u64) -> HealpixResult<(u8, u64)> {
    let trailing = zuniq.trailing_zeros();
    if zuniq == 0 || trailing % 2 != 0 || trailing > 2 * MAX_DEPTH as u32 {
        return Err(HealpixError::invalid_parameter(format!(
            "{} is not a valid zuniq value",
            zuniq
        )));
    }
    let (depth, cell) = decode(zuniq);
    check_cell(depth, cell)?;
    Ok((depth, cell))
}

/// Encodes a cell already known to be valid at `depth`.
pub(crate) fn encode(depth: u8, cell: u64) -> u64 {
    ((cell << 1) | 1) << (2 * (MAX_DEPTH - depth) as u32)
}

/// Decodes a value already accepted by [`from_zuniq`].
pub(crate) fn decode(zuniq: u64) -> (u8, u64) {
    let trailing = zuniq.trailing_zeros();
    (MAX_DEPTH - (trailing / 2) as u8, zuniq >> (trailing + 1))
}
