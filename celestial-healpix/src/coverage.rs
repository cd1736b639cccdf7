//! Cells overlapping a longitude/latitude zone.
//!
//! A [`Zone`] is bounded by two meridians and two parallels. Coverage walks
//! the nested hierarchy down from the base cells and compares each cell with
//! the zone through its longitude/latitude bounding box: blocks inside the
//! zone are kept whole, blocks outside are dropped, and only the cells
//! straddling an edge of the zone are split further. The work therefore
//! follows the perimeter of the zone, not its area.
//!
//! Between two corners a cell edge is monotonic in both longitude and
//! latitude, so the corners bound the cell. A corner sitting on a pole has
//! no longitude and is left out of the longitude bound.

use std::ops::Range;

use crate::cell::Layer;
use crate::constants::{DEG_TO_RAD, HALF_PI, MAX_DEPTH, N_BASE_CELLS, PI, TWOPI};
use crate::depth::check_depth;
use crate::ellipsoid::Ellipsoid;
use crate::error::{HealpixError, HealpixResult};
use crate::lonlat::LonLat;
use crate::scheme::Scheme;

/// Levels below the target depth used to settle a straddling cell.
const REFINE_LEVELS: u8 = 3;

const POLE_EPSILON: f64 = 1e-12;

/// Widening of every cell bound (radians) against rounding in the corners.
const BOUND_MARGIN: f64 = 1e-12;

/// A region bounded by two meridians and two parallels, in degrees.
///
/// The longitude range runs eastward from `lon_min` to `lon_max` and wraps
/// across longitude 0 when `lon_min > lon_max`. A range of 360° or more
/// covers every longitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zone {
    lon_start: f64,
    lon_span: f64,
    lat_min: f64,
    lat_max: f64,
}

impl Zone {
    pub fn new(lon_min: f64, lat_min: f64, lon_max: f64, lat_max: f64) -> HealpixResult<Self> {
        if ![lon_min, lat_min, lon_max, lat_max].iter().all(|v| v.is_finite()) {
            return Err(HealpixError::invalid_parameter(format!(
                "zone bounds must be finite, got ({}, {}, {}, {})",
                lon_min, lat_min, lon_max, lat_max
            )));
        }
        let lat_range = -90.0..=90.0;
        if !lat_range.contains(&lat_min) || !lat_range.contains(&lat_max) || lat_min >= lat_max {
            return Err(HealpixError::invalid_parameter(format!(
                "zone latitudes must satisfy -90 <= lat_min < lat_max <= 90, got {} and {}",
                lat_min, lat_max
            )));
        }
        let lon_span = if lon_max - lon_min >= 360.0 {
            360.0
        } else {
            (lon_max - lon_min).rem_euclid(360.0)
        };
        if lon_span == 0.0 {
            return Err(HealpixError::invalid_parameter(format!(
                "zone longitudes {} and {} enclose no width",
                lon_min, lon_max
            )));
        }
        let lon_start = lon_min.rem_euclid(360.0);
        Ok(Self {
            lon_start: if lon_start >= 360.0 { 0.0 } else { lon_start },
            lon_span,
            lat_min,
            lat_max,
        })
    }

    /// Western bound in `[0, 360)`.
    pub fn lon_min(&self) -> f64 {
        self.lon_start
    }

    /// Eastward longitude extent, in `(0, 360]`.
    pub fn lon_span(&self) -> f64 {
        self.lon_span
    }

    pub fn lat_min(&self) -> f64 {
        self.lat_min
    }

    pub fn lat_max(&self) -> f64 {
        self.lat_max
    }

    pub fn contains(&self, position: LonLat) -> bool {
        (self.lat_min..=self.lat_max).contains(&position.lat)
            && (position.lon - self.lon_start).rem_euclid(360.0) <= self.lon_span
    }
}

/// Nested cells at `depth` overlapping `zone`, as ascending, merged
/// intervals of ids.
///
/// The zone is given in geographic latitudes and mapped onto the authalic
/// sphere of `ellipsoid`. Every point of the zone lies in a returned cell;
/// a returned cell may miss the zone by a fraction of its own width.
pub fn zone_coverage(depth: u8, zone: &Zone, ellipsoid: &Ellipsoid) -> HealpixResult<Vec<Range<u64>>> {
    check_depth(depth)?;
    let authalic = ellipsoid.authalic();
    let bounds = Bounds {
        lon_start: zone.lon_start * DEG_TO_RAD,
        lon_span: zone.lon_span * DEG_TO_RAD,
        all_longitudes: zone.lon_span >= 360.0,
        lat_min: authalic.to_authalic(zone.lat_min * DEG_TO_RAD),
        lat_max: authalic.to_authalic(zone.lat_max * DEG_TO_RAD),
    };
    let deepest = (depth + REFINE_LEVELS).min(MAX_DEPTH);
    let layers = (0..=deepest).map(Layer::new).collect::<HealpixResult<Vec<_>>>()?;

    let mut out = Vec::new();
    for base in 0..N_BASE_CELLS {
        bounds.cover(&layers, depth, 0, base, &mut out);
    }
    tracing::debug!(depth, intervals = out.len(), "computed zone coverage");
    Ok(out)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Overlap {
    Outside,
    Partial,
    Inside,
}

/// A zone on the authalic sphere, in radians.
struct Bounds {
    lon_start: f64,
    lon_span: f64,
    all_longitudes: bool,
    lat_min: f64,
    lat_max: f64,
}

impl Bounds {
    fn cover(&self, layers: &[Layer], target: u8, depth: u8, cell: u64, out: &mut Vec<Range<u64>>) {
        match self.classify(&layers[depth as usize], cell) {
            Overlap::Outside => {}
            Overlap::Inside => {
                let shift = 2 * (target - depth) as u32;
                push_range(out, cell << shift..(cell + 1) << shift);
            }
            Overlap::Partial if depth < target => {
                for child in cell << 2..(cell << 2) + 4 {
                    self.cover(layers, target, depth + 1, child, out);
                }
            }
            Overlap::Partial => {
                if self.overlaps(layers, depth, cell, REFINE_LEVELS) {
                    push_range(out, cell..cell + 1);
                }
            }
        }
    }

    /// Whether `cell` touches the zone once split `extra` more levels.
    fn overlaps(&self, layers: &[Layer], depth: u8, cell: u64, extra: u8) -> bool {
        match self.classify(&layers[depth as usize], cell) {
            Overlap::Outside => false,
            Overlap::Inside => true,
            Overlap::Partial if extra == 0 || depth as usize + 1 >= layers.len() => true,
            Overlap::Partial => {
                (cell << 2..(cell << 2) + 4).any(|child| self.overlaps(layers, depth + 1, child, extra - 1))
            }
        }
    }

    fn classify(&self, layer: &Layer, cell: u64) -> Overlap {
        let (center_lon, center_lat) = layer.center_of(Scheme::Nested, cell);
        let (mut lat_lo, mut lat_hi) = (center_lat, center_lat);
        let (mut west, mut east) = (0.0f64, 0.0f64);
        for (lon, lat) in layer.vertices_of(Scheme::Nested, cell) {
            lat_lo = lat_lo.min(lat);
            lat_hi = lat_hi.max(lat);
            if lat.abs() < HALF_PI - POLE_EPSILON {
                let offset = (lon - center_lon + PI).rem_euclid(TWOPI) - PI;
                west = west.min(offset);
                east = east.max(offset);
            }
        }

        let (lat_lo, lat_hi) = (lat_lo - BOUND_MARGIN, lat_hi + BOUND_MARGIN);
        let (west, east) = (west - BOUND_MARGIN, east + BOUND_MARGIN);

        if lat_hi < self.lat_min || lat_lo > self.lat_max {
            return Overlap::Outside;
        }
        let lat_inside = self.lat_min <= lat_lo && lat_hi <= self.lat_max;
        if self.all_longitudes {
            return if lat_inside { Overlap::Inside } else { Overlap::Partial };
        }

        let width = east - west;
        let start = (center_lon + west - self.lon_start).rem_euclid(TWOPI);
        if start > self.lon_span && start + width < TWOPI {
            return Overlap::Outside;
        }
        if lat_inside && start + width <= self.lon_span {
            Overlap::Inside
        } else {
            Overlap::Partial
        }
    }
}

fn push_range(out: &mut Vec<Range<u64>>, r: Range<u64>) {
    match out.last_mut() {
        Some(last) if last.end >= r.start => last.end = last.end.max(r.end),
        _ => out.push(r),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::depth::{cell_angular_size, n_cells};
    use crate::grid::Grid;

    fn covered(ranges: &[Range<u64>], cell: u64) -> bool {
        let i = ranges.partition_point(|r| r.end <= cell);
        ranges.get(i).is_some_and(|r| r.start <= cell)
    }

    fn cells(ranges: &[Range<u64>]) -> Vec<u64> {
        ranges.iter().flat_map(|r| r.clone()).collect()
    }

    #[test]
    fn test_zone_validation() {
        assert!(Zone::new(0.0, -10.0, 10.0, 10.0).is_ok());
        assert!(Zone::new(0.0, 10.0, 10.0, -10.0).is_err());
        assert!(Zone::new(0.0, -91.0, 10.0, 10.0).is_err());
        assert!(Zone::new(5.0, 0.0, 5.0, 10.0).is_err());
        assert!(Zone::new(f64::NAN, 0.0, 5.0, 10.0).is_err());

        let wrapped = Zone::new(350.0, 0.0, 10.0, 5.0).unwrap();
        assert_eq!((wrapped.lon_min(), wrapped.lon_span()), (350.0, 20.0));
        assert!(wrapped.contains(LonLat::new(355.0, 1.0).unwrap()));
        assert!(wrapped.contains(LonLat::new(-5.0, 1.0).unwrap()));
        assert!(!wrapped.contains(LonLat::new(180.0, 1.0).unwrap()));
        assert_eq!(Zone::new(-180.0, 0.0, 180.0, 5.0).unwrap().lon_span(), 360.0);
    }

    #[test]
    fn test_whole_sphere_is_one_interval() {
        let zone = Zone::new(0.0, -90.0, 360.0, 90.0).unwrap();
        for depth in [0u8, 4, 29] {
            let ranges = zone_coverage(depth, &zone, &Ellipsoid::WGS84).unwrap();
            assert_eq!(ranges, vec![0..n_cells(depth)]);
        }
    }

    #[test]
    fn test_coverage_contains_every_point_and_stays_close() {
        let zone = Zone::new(10.0, 20.0, 60.0, 50.0).unwrap();
        let depth = 5;
        let layer = Layer::new(depth).unwrap();
        let ranges = zone_coverage(depth, &zone, &Ellipsoid::SPHERE).unwrap();
        assert!(ranges.windows(2).all(|w| w[0].end < w[1].start));

        for i in 0..=100 {
            for j in 0..=60 {
                let lon = 10.0 + 0.5 * i as f64;
                let lat = 20.0 + 0.5 * j as f64;
                let cell = layer.hash(Scheme::Nested, lon * DEG_TO_RAD, lat * DEG_TO_RAD);
                assert!(covered(&ranges, cell), "({}, {}) in {}", lon, lat, cell);
            }
        }

        let margin = 4.0 * cell_angular_size(depth).to_degrees();
        for cell in cells(&ranges) {
            let (lon, lat) = layer.center(Scheme::Nested, cell).unwrap();
            let (lon, lat) = (lon.to_degrees(), lat.to_degrees());
            assert!(lat > 20.0 - margin && lat < 50.0 + margin, "cell {} at {}", cell, lat);
            assert!(lon > 10.0 - margin && lon < 60.0 + margin, "cell {} at {}", cell, lon);
        }
    }

    #[test]
    fn test_wrapping_zone_is_the_union_of_its_halves() {
        let depth = 4;
        let wrapped = zone_coverage(depth, &Zone::new(350.0, -10.0, 10.0, 10.0).unwrap(), &Ellipsoid::SPHERE).unwrap();
        let west = zone_coverage(depth, &Zone::new(350.0, -10.0, 360.0, 10.0).unwrap(), &Ellipsoid::SPHERE).unwrap();
        let east = zone_coverage(depth, &Zone::new(0.0, -10.0, 10.0, 10.0).unwrap(), &Ellipsoid::SPHERE).unwrap();
        let mut halves = cells(&west);
        halves.extend(cells(&east));
        halves.sort_unstable();
        halves.dedup();
        assert_eq!(cells(&wrapped), halves);
    }

    #[test]
    fn test_coverage_on_ellipsoid_uses_authalic_latitude() {
        let zone = Zone::new(0.0, 40.0, 20.0, 50.0).unwrap();
        let grid = Grid::new(8, Scheme::Nested, Ellipsoid::WGS84).unwrap();
        let ranges = zone_coverage(8, &zone, &Ellipsoid::WGS84).unwrap();
        for lat in [40.0, 40.01, 45.0, 49.99, 50.0] {
            for lon in [0.0, 7.5, 19.99] {
                let cell = grid.lonlat_to_cell(LonLat::new(lon, lat).unwrap());
                assert!(covered(&ranges, cell), "({}, {})", lon, lat);
            }
        }
    }

    #[test]
    fn test_deepest_layer_small_zone() {
        let zone = Zone::new(1.0, 1.0, 1.0001, 1.0001).unwrap();
        let layer = Layer::new(29).unwrap();
        let ranges = zone_coverage(29, &zone, &Ellipsoid::SPHERE).unwrap();
        assert!(!ranges.is_empty());
        let inside = layer.hash(Scheme::Nested, 1.00005 * DEG_TO_RAD, 1.00005 * DEG_TO_RAD);
        assert!(covered(&ranges, inside));
        let far = layer.hash(Scheme::Nested, 2.0 * DEG_TO_RAD, 1.00005 * DEG_TO_RAD);
        assert!(!covered(&ranges, far));
    }
}
