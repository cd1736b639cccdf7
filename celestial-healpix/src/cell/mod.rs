//! Cell codec: ids ↔ (face, x, y) ↔ positions on the unit sphere.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `bits` | Morton interleaving used by the nested layout |
//! | `nested` | nested id ↔ face coordinates |
//! | `ring` | ring id ↔ face coordinates |
//! | `projection` | face coordinates ↔ longitude/latitude |
//! | [`zuniq`] | depth-tagged single-integer encoding |
//!
//! All positions handled here live on the unit sphere. Mapping them onto an
//! ellipsoid (authalic latitude) is the job of [`crate::grid`].

mod bits;
mod nested;
mod projection;
mod ring;
pub mod zuniq;

use crate::depth::{check_cell, check_depth, n_cells, nside};
use crate::error::HealpixResult;
use crate::scheme::Scheme;

/// A cell expressed as a base face and its integer position on that face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaceXY {
    pub face: u8,
    pub x: u64,
    pub y: u64,
}

/// Base faces reached when leaving a face through one of its 9 lattice
/// directions, indexed by `4 + sign(dx) + 3·sign(dy)`. `-1` marks corners
/// where only three faces meet.
const FACE_ARRAY: [[i8; 12]; 9] = [
    [8, 9, 10, 11, -1, -1, -1, -1, 10, 11, 8, 9],
    [5, 6, 7, 4, 8, 9, 10, 11, 9, 10, 11, 8],
    [-1, -1, -1, -1, 5, 6, 7, 4, -1, -1, -1, -1],
    [4, 5, 6, 7, 11, 8, 9, 10, 11, 8, 9, 10],
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11],
    [1, 2, 3, 0, 0, 1, 2, 3, 5, 6, 7, 4],
    [-1, -1, -1, -1, 7, 4, 5, 6, -1, -1, -1, -1],
    [3, 0, 1, 2, 3, 0, 1, 2, 4, 5, 6, 7],
    [2, 3, 0, 1, -1, -1, -1, -1, 0, 1, 2, 3],
];

/// Axis fix-ups applied after wrapping into the new face, per direction and
/// face row (north, equator, south): bit 1 mirrors x, bit 2 mirrors y,
/// bit 4 swaps the axes.
const SWAP_ARRAY: [[u8; 3]; 9] = [
    [0, 0, 3],
    [0, 0, 6],
    [0, 0, 0],
    [0, 0, 5],
    [0, 0, 0],
    [5, 0, 0],
    [0, 0, 0],
    [6, 0, 0],
    [3, 0, 0],
];

/// One resolution level of the tessellation.
///
/// A `Layer` is a validated depth; every method taking a cell id checks it
/// against the layer before touching its bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Layer {
    depth: u8,
    nside: u64,
}

impl Layer {
    pub fn new(depth: u8) -> HealpixResult<Self> {
        check_depth(depth)?;
        Ok(Self {
            depth,
            nside: nside(depth),
        })
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn nside(&self) -> u64 {
        self.nside
    }

    pub fn n_cells(&self) -> u64 {
        n_cells(self.depth)
    }

    pub fn check(&self, cell: u64) -> HealpixResult<()> {
        check_cell(self.depth, cell)
    }

    pub fn to_face_xy(&self, scheme: Scheme, cell: u64) -> HealpixResult<FaceXY> {
        self.check(cell)?;
        Ok(self.face_xy_of(scheme, cell))
    }

    /// Id of an in-range face position. `fxy.x` and `fxy.y` must be below
    /// `nside`.
    pub fn from_face_xy(&self, scheme: Scheme, fxy: FaceXY) -> u64 {
        match scheme {
            Scheme::Nested => nested::from_face_xy(self.depth, fxy),
            Scheme::Ring => ring::from_face_xy(self.depth, fxy),
        }
    }

    pub(crate) fn face_xy_of(&self, scheme: Scheme, cell: u64) -> FaceXY {
        match scheme {
            Scheme::Nested => nested::to_face_xy(self.depth, cell),
            Scheme::Ring => ring::to_face_xy(self.depth, cell),
        }
    }

    pub fn nested_to_ring(&self, cell: u64) -> HealpixResult<u64> {
        self.check(cell)?;
        Ok(self.relabel(Scheme::Nested, Scheme::Ring, cell))
    }

    pub fn ring_to_nested(&self, cell: u64) -> HealpixResult<u64> {
        self.check(cell)?;
        Ok(self.relabel(Scheme::Ring, Scheme::Nested, cell))
    }

    pub(crate) fn relabel(&self, from: Scheme, to: Scheme, cell: u64) -> u64 {
        if from == to {
            return cell;
        }
        self.from_face_xy(to, self.face_xy_of(from, cell))
    }

    /// Center of `cell` as `(lon, lat)` in radians on the unit sphere,
    /// longitude in `[0, 2π)`.
    pub fn center(&self, scheme: Scheme, cell: u64) -> HealpixResult<(f64, f64)> {
        self.check(cell)?;
        Ok(self.center_of(scheme, cell))
    }

    /// Corners of `cell` in south, east, north, west order.
    pub fn vertices(&self, scheme: Scheme, cell: u64) -> HealpixResult<[(f64, f64); 4]> {
        self.check(cell)?;
        Ok(self.vertices_of(scheme, cell))
    }

    pub(crate) fn center_of(&self, scheme: Scheme, cell: u64) -> (f64, f64) {
        self.position(self.face_xy_of(scheme, cell), 0.5, 0.5)
    }

    pub(crate) fn vertices_of(&self, scheme: Scheme, cell: u64) -> [(f64, f64); 4] {
        let fxy = self.face_xy_of(scheme, cell);
        [
            self.position(fxy, 0.0, 0.0),
            self.position(fxy, 1.0, 0.0),
            self.position(fxy, 1.0, 1.0),
            self.position(fxy, 0.0, 1.0),
        ]
    }

    /// Cell containing the point `(lon, lat)` given in radians.
    pub fn hash(&self, scheme: Scheme, lon: f64, lat: f64) -> u64 {
        let (face, x, y) = projection::lonlat_to_face_xy(self.nside, lon, lat);
        let max = self.nside - 1;
        let fxy = FaceXY {
            face,
            x: (libm::floor(x) as u64).min(max),
            y: (libm::floor(y) as u64).min(max),
        };
        self.from_face_xy(scheme, fxy)
    }

    /// The four nested cells whose centers surround `(lon, lat)` together
    /// with their bilinear weights.
    ///
    /// Where a surrounding center would lie past a corner shared by only
    /// three faces, the nearest in-face cell takes its weight.
    pub fn bilinear_interpolation(&self, lon: f64, lat: f64) -> [(u64, f64); 4] {
        let (face, x, y) = projection::lonlat_to_face_xy(self.nside, lon, lat);
        let (x, y) = (x - 0.5, y - 0.5);
        let (x0, y0) = (libm::floor(x), libm::floor(y));
        let (dx, dy) = (x - x0, y - y0);
        let (x0, y0) = (x0 as i64, y0 as i64);

        let corners = [
            (x0, y0, (1.0 - dx) * (1.0 - dy)),
            (x0 + 1, y0, dx * (1.0 - dy)),
            (x0, y0 + 1, (1.0 - dx) * dy),
            (x0 + 1, y0 + 1, dx * dy),
        ];
        let max = self.nside as i64 - 1;
        corners.map(|(cx, cy, weight)| {
            let fxy = self.resolve(face, cx, cy).unwrap_or(FaceXY {
                face,
                x: cx.clamp(0, max) as u64,
                y: cy.clamp(0, max) as u64,
            });
            (nested::from_face_xy(self.depth, fxy), weight)
        })
    }

    /// Resolves a lattice position relative to `face`, possibly one face
    /// away, onto the face that owns it. Offsets may reach at most `nside`
    /// cells past the face edge. Returns `None` past a corner where only
    /// three faces meet.
    pub(crate) fn resolve(&self, face: u8, x: i64, y: i64) -> Option<FaceXY> {
        let n = self.nside as i64;
        let (mut x, mut y) = (x, y);
        let mut direction = 4i64;
        if x < 0 {
            x += n;
            direction -= 1;
        } else if x >= n {
            x -= n;
            direction += 1;
        }
        if y < 0 {
            y += n;
            direction -= 3;
        } else if y >= n {
            y -= n;
            direction += 3;
        }
        if direction == 4 {
            return Some(FaceXY {
                face,
                x: x as u64,
                y: y as u64,
            });
        }

        let target = FACE_ARRAY[direction as usize][face as usize];
        if target < 0 {
            return None;
        }
        let bits = SWAP_ARRAY[direction as usize][(face >> 2) as usize];
        if bits & 1 != 0 {
            x = n - x - 1;
        }
        if bits & 2 != 0 {
            y = n - y - 1;
        }
        if bits & 4 != 0 {
            std::mem::swap(&mut x, &mut y);
        }
        Some(FaceXY {
            face: target as u8,
            x: x as u64,
            y: y as u64,
        })
    }

    fn position(&self, fxy: FaceXY, dx: f64, dy: f64) -> (f64, f64) {
        let n = self.nside as f64;
        projection::face_xy_to_lonlat(fxy.face, (fxy.x as f64 + dx) / n, (fxy.y as f64 + dy) / n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{HALF_PI, PI};

    #[test]
    fn test_layer_rejects_bad_depth() {
        assert!(Layer::new(29).is_ok());
        assert!(Layer::new(30).is_err());
    }

    #[test]
    fn test_center_then_hash_is_identity() {
        for depth in [0u8, 1, 3, 6] {
            let layer = Layer::new(depth).unwrap();
            for scheme in [Scheme::Nested, Scheme::Ring] {
                for cell in 0..layer.n_cells() {
                    let (lon, lat) = layer.center(scheme, cell).unwrap();
                    assert!((0.0..2.0 * PI).contains(&lon), "lon {} for {}", lon, cell);
                    assert!(lat.abs() < HALF_PI);
                    assert_eq!(layer.hash(scheme, lon, lat), cell, "depth {} {:?}", depth, scheme);
                }
            }
        }
    }

    #[test]
    fn test_center_deepest_layer() {
        let layer = Layer::new(29).unwrap();
        for cell in [0, 1, 2, 3, layer.n_cells() - 1, layer.n_cells() / 2 + 17] {
            let (lon, lat) = layer.center(Scheme::Nested, cell).unwrap();
            assert!(lon.is_finite() && lat.is_finite());
            assert_eq!(layer.hash(Scheme::Nested, lon, lat), cell);
        }
    }

    #[test]
    fn test_nested_ring_conversion() {
        let layer = Layer::new(4).unwrap();
        for cell in 0..layer.n_cells() {
            let ring = layer.nested_to_ring(cell).unwrap();
            assert_eq!(layer.ring_to_nested(ring).unwrap(), cell);
        }
        assert!(layer.nested_to_ring(layer.n_cells()).is_err());
    }

    #[test]
    fn test_poles_hash() {
        let layer = Layer::new(5).unwrap();
        let north = layer.hash(Scheme::Ring, 0.3, HALF_PI);
        assert!(north < 4, "north pole lands in ring cell {}", north);
        let south = layer.hash(Scheme::Ring, 0.3, -HALF_PI);
        assert!(south >= layer.n_cells() - 4);
    }

    #[test]
    fn test_vertices_surround_center() {
        let layer = Layer::new(2).unwrap();
        for cell in 0..layer.n_cells() {
            let (_, lat) = layer.center(Scheme::Nested, cell).unwrap();
            let [s, e, n, w] = layer.vertices(Scheme::Nested, cell).unwrap();
            assert!(s.1 < lat && lat < n.1, "cell {}", cell);
            assert!(e.1 > s.1 && w.1 > s.1);
        }
    }

    #[test]
    fn test_bilinear_weights_sum_to_one() {
        let layer = Layer::new(3).unwrap();
        for (lon, lat) in [(0.1, 0.2), (1.0, 1.2), (3.0, -1.5), (5.5, 1.56), (0.0, 0.0)] {
            let cells = layer.bilinear_interpolation(lon, lat);
            let total: f64 = cells.iter().map(|(_, w)| w).sum();
            assert!((total - 1.0).abs() < 1e-12, "weights sum to {}", total);
            let containing = layer.hash(Scheme::Nested, lon, lat);
            assert!(cells.iter().any(|&(c, _)| c == containing));
        }
    }

    #[test]
    fn test_resolve_across_pole() {
        let layer = Layer::new(2).unwrap();
        // north-east of the pole cell of face 0 is the pole cell of face 1
        let fxy = layer.resolve(0, 4, 3).unwrap();
        assert_eq!(fxy, FaceXY { face: 1, x: 3, y: 3 });
        // diagonal across the pole
        let fxy = layer.resolve(0, 4, 4).unwrap();
        assert_eq!(fxy, FaceXY { face: 2, x: 3, y: 3 });
        // three-face corner
        assert!(layer.resolve(0, -1, 4).is_none());
    }
}
