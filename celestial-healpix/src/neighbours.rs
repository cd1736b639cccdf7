//! Neighbourhoods over the cell graph.
//!
//! Neighbours are located on the local face lattice: a cell at `(x, y)` on
//! its face sees the cells at `(x + dx, y + dy)` for `dx, dy ∈ [-k, k]`,
//! positions past the face edge being carried onto the adjacent face. The
//! `(2k + 1)²` slots of a neighbourhood are laid out row by row,
//!
//! ```text
//! slot = (dy + k)·(2k + 1) + (dx + k)
//! ```
//!
//! so the queried cell always sits in the middle slot. For `k = 1` the slots
//! read S, SE, E, SW, C, NE, W, NW, N. Positions past a corner where only
//! three base cells meet do not exist and are reported as `-1`.

use crate::cell::{FaceXY, Layer};
use crate::error::{HealpixError, HealpixResult};
use crate::scheme::Scheme;

/// The eight compass directions plus the cell itself, in slot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    S,
    SE,
    E,
    SW,
    C,
    NE,
    W,
    NW,
    N,
}

impl Direction {
    pub const ALL: [Direction; 9] = [
        Direction::S,
        Direction::SE,
        Direction::E,
        Direction::SW,
        Direction::C,
        Direction::NE,
        Direction::W,
        Direction::NW,
        Direction::N,
    ];

    /// Offset on the face lattice; `x` grows toward the north-east and `y`
    /// toward the north-west.
    pub fn offset(&self) -> (i64, i64) {
        match self {
            Direction::S => (-1, -1),
            Direction::SE => (0, -1),
            Direction::E => (1, -1),
            Direction::SW => (-1, 0),
            Direction::C => (0, 0),
            Direction::NE => (1, 0),
            Direction::W => (-1, 1),
            Direction::NW => (0, 1),
            Direction::N => (1, 1),
        }
    }
}

/// Number of slots in a ring-`k` neighbourhood.
pub fn neighbourhood_size(ring: u32) -> usize {
    let width = 2 * ring as usize + 1;
    width * width
}

/// Validates a ring parameter: it must be non-negative and reach at most one
/// face away (`ring <= nside`).
pub fn check_ring(layer: &Layer, ring: i64) -> HealpixResult<u32> {
    if ring < 0 || ring as u64 > layer.nside() {
        return Err(HealpixError::invalid_ring(ring, layer.nside()));
    }
    Ok(ring as u32)
}

impl Layer {
    /// Neighbour of `cell` in one direction, `None` where it does not exist.
    pub fn neighbour(&self, scheme: Scheme, cell: u64, direction: Direction) -> HealpixResult<Option<u64>> {
        let fxy = self.to_face_xy(scheme, cell)?;
        let (dx, dy) = direction.offset();
        Ok(self
            .resolve(fxy.face, fxy.x as i64 + dx, fxy.y as i64 + dy)
            .map(|n| self.from_face_xy(scheme, n)))
    }

    /// The 8 neighbours and the cell itself, in [`Direction::ALL`] order.
    pub fn neighbours(&self, scheme: Scheme, cell: u64) -> HealpixResult<[i64; 9]> {
        let mut out = [-1i64; 9];
        self.kth_neighbourhood_into(scheme, cell, 1, &mut out)?;
        Ok(out)
    }

    /// Ring-`k` neighbourhood of `cell`: `(2k + 1)²` ids with `-1` for
    /// positions that do not exist.
    pub fn kth_neighbourhood(&self, scheme: Scheme, cell: u64, ring: u32) -> HealpixResult<Vec<i64>> {
        let mut out = vec![-1i64; neighbourhood_size(ring)];
        self.kth_neighbourhood_into(scheme, cell, ring, &mut out)?;
        Ok(out)
    }

    /// Writes the ring-`k` neighbourhood of `cell` into `out`, which must
    /// hold exactly `(2k + 1)²` slots.
    pub fn kth_neighbourhood_into(
        &self,
        scheme: Scheme,
        cell: u64,
        ring: u32,
        out: &mut [i64],
    ) -> HealpixResult<()> {
        check_ring(self, ring as i64)?;
        if out.len() != neighbourhood_size(ring) {
            return Err(HealpixError::shape_mismatch(format!(
                "a ring {} neighbourhood has {} slots, got {}",
                ring,
                neighbourhood_size(ring),
                out.len()
            )));
        }
        let center = self.to_face_xy(scheme, cell)?;
        self.fill_neighbourhood(scheme, center, ring as i64, out);
        Ok(())
    }

    /// Cells of `cells` lying on the border of the set: those with at least
    /// one existing neighbour outside it. `contains` answers membership.
    pub fn boundary_cells<F>(&self, scheme: Scheme, cells: &[u64], contains: F) -> HealpixResult<Vec<u64>>
    where
        F: Fn(u64) -> bool,
    {
        let mut out = Vec::new();
        let mut around = [-1i64; 9];
        for &cell in cells {
            self.kth_neighbourhood_into(scheme, cell, 1, &mut around)?;
            if around.iter().any(|&n| n >= 0 && !contains(n as u64)) {
                out.push(cell);
            }
        }
        Ok(out)
    }

    pub(crate) fn fill_neighbourhood(&self, scheme: Scheme, center: FaceXY, k: i64, out: &mut [i64]) {
        let (cx, cy) = (center.x as i64, center.y as i64);
        let width = 2 * k + 1;
        for dy in -k..=k {
            for dx in -k..=k {
                let slot = ((dy + k) * width + (dx + k)) as usize;
                out[slot] = self
                    .resolve(center.face, cx + dx, cy + dy)
                    .map_or(-1, |n| self.from_face_xy(scheme, n) as i64);
            }
        }
    }
}
