//! Array entry points.
//!
//! Every function here validates its whole input first (depths, cell ids,
//! shapes, coordinate ranges) and only then maps the per-cell operation
//! over the arrays, on a dedicated thread pool when the `parallel` feature
//! is enabled. An error therefore never comes with partial output.
//!
//! Outputs that carry several values per input cell (vertices,
//! neighbourhoods, children) gain one trailing axis.

mod config;

pub use config::{resolve_threads, BulkConfig, Executor};

use ndarray::{ArrayD, ArrayViewD, ArrayViewMut1, IxDyn, Zip};

use crate::cell::Layer;
use crate::cell::zuniq;
use crate::constants::{HALF_PI, MAX_DEPTH};
use crate::depth::check_depth;
use crate::ellipsoid::Ellipsoid;
use crate::error::{HealpixError, HealpixResult};
use crate::grid::Grid;
use crate::lonlat::LonLat;
use crate::neighbours::{check_ring, neighbourhood_size};
use crate::scheme::Scheme;
use crate::zoom;

macro_rules! zip_for_each {
    ($executor:expr, $zip:expr, $body:expr) => {{
        let zip = $zip;
        #[cfg(feature = "parallel")]
        $executor.install(|| zip.par_for_each($body));
        #[cfg(not(feature = "parallel"))]
        {
            let _ = &$executor;
            zip.for_each($body);
        }
    }};
}

/// Geographic centers of `cells`, as `(lon, lat)` arrays in degrees.
pub fn healpix_to_lonlat(
    grid: &Grid,
    cells: ArrayViewD<u64>,
    config: &BulkConfig,
) -> HealpixResult<(ArrayD<f64>, ArrayD<f64>)> {
    check_cells(grid.layer(), &cells)?;
    let executor = Executor::new(config)?;

    let mut lon = ArrayD::<f64>::zeros(cells.raw_dim());
    let mut lat = ArrayD::<f64>::zeros(cells.raw_dim());
    zip_for_each!(
        executor,
        Zip::from(&mut lon).and(&mut lat).and(&cells),
        |lon, lat, &cell| {
            let center = grid.center_of(cell);
            *lon = center.lon;
            *lat = center.lat;
        }
    );
    Ok((lon, lat))
}

/// Cells containing the geographic positions `(lon, lat)` in degrees.
pub fn lonlat_to_healpix(
    grid: &Grid,
    lon: ArrayViewD<f64>,
    lat: ArrayViewD<f64>,
    config: &BulkConfig,
) -> HealpixResult<ArrayD<u64>> {
    check_positions(&lon, &lat)?;
    let executor = Executor::new(config)?;

    let mut cells = ArrayD::<u64>::zeros(lon.raw_dim());
    zip_for_each!(
        executor,
        Zip::from(&mut cells).and(&lon).and(&lat),
        |cell, &lon, &lat| {
            *cell = grid.lonlat_to_cell(LonLat { lon, lat });
        }
    );
    Ok(cells)
}

/// Corners of `cells` (south, east, north, west) along a trailing axis of 4.
pub fn vertices(
    grid: &Grid,
    cells: ArrayViewD<u64>,
    config: &BulkConfig,
) -> HealpixResult<(ArrayD<f64>, ArrayD<f64>)> {
    check_cells(grid.layer(), &cells)?;
    let executor = Executor::new(config)?;

    let shape = trailing_shape(cells.shape(), 4);
    let mut lon = ArrayD::<f64>::zeros(shape.clone());
    let mut lat = ArrayD::<f64>::zeros(shape);
    zip_for_each!(
        executor,
        Zip::from(lon.rows_mut()).and(lat.rows_mut()).and(&cells),
        |mut lon_row: ArrayViewMut1<f64>, mut lat_row: ArrayViewMut1<f64>, &cell| {
            for (i, vertex) in grid.vertices_of(cell).iter().enumerate() {
                lon_row[i] = vertex.lon;
                lat_row[i] = vertex.lat;
            }
        }
    );
    Ok((lon, lat))
}

/// Surrounding cells and bilinear weights for each position, along a
/// trailing axis of 4.
pub fn bilinear_interpolation(
    grid: &Grid,
    lon: ArrayViewD<f64>,
    lat: ArrayViewD<f64>,
    config: &BulkConfig,
) -> HealpixResult<(ArrayD<u64>, ArrayD<f64>)> {
    check_positions(&lon, &lat)?;
    let executor = Executor::new(config)?;

    let shape = trailing_shape(lon.shape(), 4);
    let mut cells = ArrayD::<u64>::zeros(shape.clone());
    let mut weights = ArrayD::<f64>::zeros(shape);
    zip_for_each!(
        executor,
        Zip::from(cells.rows_mut())
            .and(weights.rows_mut())
            .and(&lon)
            .and(&lat),
        |mut cell_row: ArrayViewMut1<u64>, mut weight_row: ArrayViewMut1<f64>, &lon, &lat| {
            let around = grid.bilinear_interpolation(LonLat { lon, lat });
            for (i, (cell, weight)) in around.iter().enumerate() {
                cell_row[i] = *cell;
                weight_row[i] = *weight;
            }
        }
    );
    Ok((cells, weights))
}

/// Ring-`k` neighbourhoods of `cells` along a trailing axis of `(2k + 1)²`,
/// `-1` marking positions that do not exist.
pub fn kth_neighbourhood(
    layer: &Layer,
    scheme: Scheme,
    cells: ArrayViewD<u64>,
    ring: i64,
    config: &BulkConfig,
) -> HealpixResult<ArrayD<i64>> {
    let ring = check_ring(layer, ring)?;
    check_cells(layer, &cells)?;
    let executor = Executor::new(config)?;

    let width = neighbourhood_size(ring);
    let mut out = ArrayD::<i64>::from_elem(trailing_shape(cells.shape(), width), -1);
    zip_for_each!(
        executor,
        Zip::from(out.rows_mut()).and(&cells),
        |mut row: ArrayViewMut1<i64>, &cell| {
            let center = layer.face_xy_of(scheme, cell);
            match row.as_slice_mut() {
                Some(slots) => layer.fill_neighbourhood(scheme, center, ring as i64, slots),
                None => {
                    let mut slots = vec![-1i64; width];
                    layer.fill_neighbourhood(scheme, center, ring as i64, &mut slots);
                    row.iter_mut().zip(slots).for_each(|(dst, src)| *dst = src);
                }
            }
        }
    );
    Ok(out)
}

/// Nested `cells` moved from `depth` to `new_depth`.
///
/// Zooming out (or staying) keeps the input shape; zooming in by `Δ` levels
/// appends a trailing axis of `4^Δ` children.
pub fn zoom_to(
    depth: u8,
    cells: ArrayViewD<u64>,
    new_depth: u8,
    config: &BulkConfig,
) -> HealpixResult<ArrayD<u64>> {
    let layer = Layer::new(depth)?;
    check_depth(new_depth)?;
    check_cells(&layer, &cells)?;
    let executor = Executor::new(config)?;

    if new_depth <= depth {
        let shift = 2 * (depth - new_depth) as u32;
        let mut out = ArrayD::<u64>::zeros(cells.raw_dim());
        zip_for_each!(executor, Zip::from(&mut out).and(&cells), |parent, &cell| {
            *parent = cell >> shift;
        });
        return Ok(out);
    }

    let width = zoom::zoom_width(depth, new_depth);
    check_output_size(cells.len(), width)?;
    let shift = 2 * (new_depth - depth) as u32;
    let mut out = ArrayD::<u64>::zeros(trailing_shape(cells.shape(), width));
    zip_for_each!(
        executor,
        Zip::from(out.rows_mut()).and(&cells),
        |mut row: ArrayViewMut1<u64>, &cell| {
            let first = cell << shift;
            row.iter_mut()
                .zip(first..)
                .for_each(|(dst, child)| *dst = child);
        }
    );
    Ok(out)
}

/// The cells sharing each cell's parent, along a trailing axis of 4 (12 at
/// depth 0).
pub fn siblings(layer: &Layer, cells: ArrayViewD<u64>, config: &BulkConfig) -> HealpixResult<ArrayD<u64>> {
    check_cells(layer, &cells)?;
    let executor = Executor::new(config)?;

    let depth = layer.depth();
    let width = if depth == 0 { 12 } else { 4 };
    let mut out = ArrayD::<u64>::zeros(trailing_shape(cells.shape(), width));
    zip_for_each!(
        executor,
        Zip::from(out.rows_mut()).and(&cells),
        |mut row: ArrayViewMut1<u64>, &cell| {
            let first = if depth == 0 { 0 } else { cell & !3 };
            row.iter_mut()
                .zip(first..)
                .for_each(|(dst, sibling)| *dst = sibling);
        }
    );
    Ok(out)
}

/// Geodesic distance between the centers of `from` and `to`, in the unit
/// of the ellipsoid's semi-major axis.
///
/// `to` has either the shape of `from` or one extra trailing axis. A `-1`
/// destination yields `NaN`.
pub fn geodesic_distance(
    grid: &Grid,
    from: ArrayViewD<u64>,
    to: ArrayViewD<i64>,
    config: &BulkConfig,
) -> HealpixResult<ArrayD<f64>> {
    let pairing = pairing(from.shape(), to.shape())?;
    check_cells(grid.layer(), &from)?;
    for &cell in to.iter() {
        if cell != -1 {
            if cell < 0 {
                return Err(HealpixError::invalid_parameter(format!(
                    "destination cell ids must be valid ids or -1, got {}",
                    cell
                )));
            }
            grid.layer().check(cell as u64)?;
        }
    }
    let executor = Executor::new(config)?;

    let distance = |from: u64, to: i64| {
        if to < 0 {
            f64::NAN
        } else {
            grid.distance_of(from, to as u64)
        }
    };
    let mut out = ArrayD::<f64>::zeros(to.raw_dim());
    match pairing {
        Pairing::Elementwise => {
            zip_for_each!(
                executor,
                Zip::from(&mut out).and(&from).and(&to),
                |d, &a, &b| *d = distance(a, b)
            );
        }
        Pairing::Rows => {
            zip_for_each!(
                executor,
                Zip::from(out.rows_mut()).and(&from).and(to.rows()),
                |mut row: ArrayViewMut1<f64>, &a, targets: ndarray::ArrayView1<i64>| {
                    row.iter_mut()
                        .zip(targets.iter())
                        .for_each(|(d, &b)| *d = distance(a, b));
                }
            );
        }
    }
    Ok(out)
}

/// Great-circle angle (radians) between cell centers on the unit sphere,
/// broadcast like [`geodesic_distance`].
pub fn angular_distances(
    grid: &Grid,
    from: ArrayViewD<u64>,
    to: ArrayViewD<u64>,
    config: &BulkConfig,
) -> HealpixResult<ArrayD<f64>> {
    let pairing = pairing(from.shape(), to.shape())?;
    check_cells(grid.layer(), &from)?;
    check_cells(grid.layer(), &to)?;
    let executor = Executor::new(config)?;

    let mut out = ArrayD::<f64>::zeros(to.raw_dim());
    match pairing {
        Pairing::Elementwise => {
            zip_for_each!(
                executor,
                Zip::from(&mut out).and(&from).and(&to),
                |d, &a, &b| *d = grid.angle_of(a, b)
            );
        }
        Pairing::Rows => {
            zip_for_each!(
                executor,
                Zip::from(out.rows_mut()).and(&from).and(to.rows()),
                |mut row: ArrayViewMut1<f64>, &a, targets: ndarray::ArrayView1<u64>| {
                    row.iter_mut()
                        .zip(targets.iter())
                        .for_each(|(d, &b)| *d = grid.angle_of(a, b));
                }
            );
        }
    }
    Ok(out)
}

/// Geographic latitudes in degrees to authalic latitudes in radians.
pub fn latitude_geographic_to_authalic(
    ellipsoid: &Ellipsoid,
    lat: ArrayViewD<f64>,
    config: &BulkConfig,
) -> HealpixResult<ArrayD<f64>> {
    if let Some(bad) = lat.iter().find(|v| !(-90.0..=90.0).contains(*v)) {
        return Err(HealpixError::invalid_parameter(format!(
            "latitude must be in [-90, 90] degrees, got {}",
            bad
        )));
    }
    let executor = Executor::new(config)?;
    let authalic = ellipsoid.authalic();

    let mut out = ArrayD::<f64>::zeros(lat.raw_dim());
    zip_for_each!(executor, Zip::from(&mut out).and(&lat), |xi, &phi| {
        *xi = authalic.to_authalic(phi.to_radians());
    });
    Ok(out)
}

/// Authalic latitudes in radians to geographic latitudes in degrees.
pub fn latitude_authalic_to_geographic(
    ellipsoid: &Ellipsoid,
    lat: ArrayViewD<f64>,
    config: &BulkConfig,
) -> HealpixResult<ArrayD<f64>> {
    if let Some(bad) = lat.iter().find(|v| !(-HALF_PI..=HALF_PI).contains(*v)) {
        return Err(HealpixError::invalid_parameter(format!(
            "authalic latitude must be in [-π/2, π/2] radians, got {}",
            bad
        )));
    }
    let executor = Executor::new(config)?;
    let authalic = ellipsoid.authalic();

    let mut out = ArrayD::<f64>::zeros(lat.raw_dim());
    zip_for_each!(executor, Zip::from(&mut out).and(&lat), |phi, &xi| {
        *phi = authalic.to_geographic(xi).to_degrees().clamp(-90.0, 90.0);
    });
    Ok(out)
}

/// Relabels `cells` of `layer` from one ordering to the other.
pub fn convert_scheme(
    layer: &Layer,
    cells: ArrayViewD<u64>,
    from: Scheme,
    to: Scheme,
    config: &BulkConfig,
) -> HealpixResult<ArrayD<u64>> {
    check_cells(layer, &cells)?;
    let executor = Executor::new(config)?;

    let mut out = ArrayD::<u64>::zeros(cells.raw_dim());
    zip_for_each!(executor, Zip::from(&mut out).and(&cells), |dst, &cell| {
        *dst = layer.relabel(from, to, cell);
    });
    Ok(out)
}

pub fn nested_to_ring(layer: &Layer, cells: ArrayViewD<u64>, config: &BulkConfig) -> HealpixResult<ArrayD<u64>> {
    convert_scheme(layer, cells, Scheme::Nested, Scheme::Ring, config)
}

pub fn ring_to_nested(layer: &Layer, cells: ArrayViewD<u64>, config: &BulkConfig) -> HealpixResult<ArrayD<u64>> {
    convert_scheme(layer, cells, Scheme::Ring, Scheme::Nested, config)
}

/// Nested `cells` of `layer` to their zuniq encoding.
pub fn to_zuniq(layer: &Layer, cells: ArrayViewD<u64>, config: &BulkConfig) -> HealpixResult<ArrayD<u64>> {
    check_cells(layer, &cells)?;
    let executor = Executor::new(config)?;

    let depth = layer.depth();
    let mut out = ArrayD::<u64>::zeros(cells.raw_dim());
    zip_for_each!(executor, Zip::from(&mut out).and(&cells), |dst, &cell| {
        *dst = zuniq::encode(depth, cell);
    });
    Ok(out)
}

/// Decodes zuniq values into `(depth, nested id)` arrays.
pub fn from_zuniq(values: ArrayViewD<u64>, config: &BulkConfig) -> HealpixResult<(ArrayD<u8>, ArrayD<u64>)> {
    check_zuniq(&values)?;
    let executor = Executor::new(config)?;

    let mut depths = ArrayD::<u8>::zeros(values.raw_dim());
    let mut cells = ArrayD::<u64>::zeros(values.raw_dim());
    zip_for_each!(
        executor,
        Zip::from(&mut depths).and(&mut cells).and(&values),
        |depth, cell, &z| {
            let (d, c) = zuniq::decode(z);
            *depth = d;
            *cell = c;
        }
    );
    Ok((depths, cells))
}

/// Geographic centers of zuniq-encoded cells, each at its own depth.
pub fn zuniq_to_lonlat(
    ellipsoid: &Ellipsoid,
    values: ArrayViewD<u64>,
    config: &BulkConfig,
) -> HealpixResult<(ArrayD<f64>, ArrayD<f64>)> {
    check_zuniq(&values)?;
    let grids = nested_grids(ellipsoid)?;
    let executor = Executor::new(config)?;

    let mut lon = ArrayD::<f64>::zeros(values.raw_dim());
    let mut lat = ArrayD::<f64>::zeros(values.raw_dim());
    zip_for_each!(
        executor,
        Zip::from(&mut lon).and(&mut lat).and(&values),
        |lon, lat, &z| {
            let (depth, cell) = zuniq::decode(z);
            let center = grids[depth as usize].center_of(cell);
            *lon = center.lon;
            *lat = center.lat;
        }
    );
    Ok((lon, lat))
}

/// Zuniq values of the depth-`depth` cells containing the positions
/// `(lon, lat)` in degrees.
pub fn lonlat_to_zuniq(
    depth: u8,
    ellipsoid: &Ellipsoid,
    lon: ArrayViewD<f64>,
    lat: ArrayViewD<f64>,
    config: &BulkConfig,
) -> HealpixResult<ArrayD<u64>> {
    let grid = Grid::new(depth, Scheme::Nested, *ellipsoid)?;
    check_positions(&lon, &lat)?;
    let executor = Executor::new(config)?;

    let mut out = ArrayD::<u64>::zeros(lon.raw_dim());
    zip_for_each!(
        executor,
        Zip::from(&mut out).and(&lon).and(&lat),
        |z, &lon, &lat| {
            *z = zuniq::encode(depth, grid.lonlat_to_cell(LonLat { lon, lat }));
        }
    );
    Ok(out)
}

/// Corners of zuniq-encoded cells along a trailing axis of 4, like
/// [`vertices`].
pub fn zuniq_vertices(
    ellipsoid: &Ellipsoid,
    values: ArrayViewD<u64>,
    config: &BulkConfig,
) -> HealpixResult<(ArrayD<f64>, ArrayD<f64>)> {
    check_zuniq(&values)?;
    let grids = nested_grids(ellipsoid)?;
    let executor = Executor::new(config)?;

    let shape = trailing_shape(values.shape(), 4);
    let mut lon = ArrayD::<f64>::zeros(shape.clone());
    let mut lat = ArrayD::<f64>::zeros(shape);
    zip_for_each!(
        executor,
        Zip::from(lon.rows_mut()).and(lat.rows_mut()).and(&values),
        |mut lon_row: ArrayViewMut1<f64>, mut lat_row: ArrayViewMut1<f64>, &z| {
            let (depth, cell) = zuniq::decode(z);
            for (i, vertex) in grids[depth as usize].vertices_of(cell).iter().enumerate() {
                lon_row[i] = vertex.lon;
                lat_row[i] = vertex.lat;
            }
        }
    );
    Ok((lon, lat))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pairing {
    Elementwise,
    Rows,
}

fn pairing(from: &[usize], to: &[usize]) -> HealpixResult<Pairing> {
    if from == to {
        return Ok(Pairing::Elementwise);
    }
    if to.len() == from.len() + 1 && &to[..from.len()] == from {
        return Ok(Pairing::Rows);
    }
    Err(HealpixError::shape_mismatch(format!(
        "The shape of `from_` must be compatible with the shape of `to_`: {:?} vs {:?}",
        from, to
    )))
}

fn check_cells(layer: &Layer, cells: &ArrayViewD<u64>) -> HealpixResult<()> {
    cells.iter().try_for_each(|&cell| layer.check(cell))
}

fn check_zuniq(values: &ArrayViewD<u64>) -> HealpixResult<()> {
    values.iter().try_for_each(|&z| zuniq::from_zuniq(z).map(|_| ()))
}

/// One nested grid per depth, indexed by depth.
fn nested_grids(ellipsoid: &Ellipsoid) -> HealpixResult<Vec<Grid>> {
    (0..=MAX_DEPTH)
        .map(|depth| Grid::new(depth, Scheme::Nested, *ellipsoid))
        .collect()
}

fn check_positions(lon: &ArrayViewD<f64>, lat: &ArrayViewD<f64>) -> HealpixResult<()> {
    if lon.shape() != lat.shape() {
        return Err(HealpixError::shape_mismatch(format!(
            "longitude and latitude arrays differ: {:?} vs {:?}",
            lon.shape(),
            lat.shape()
        )));
    }
    lon.iter()
        .zip(lat.iter())
        .try_for_each(|(&lon, &lat)| LonLat::new(lon, lat).map(|_| ()))
}

fn check_output_size(n_cells: usize, width: usize) -> HealpixResult<()> {
    match n_cells.checked_mul(width) {
        Some(total) if total <= isize::MAX as usize / std::mem::size_of::<u64>() => Ok(()),
        _ => Err(HealpixError::invalid_parameter(format!(
            "zooming {} cells into {} children each does not fit in memory",
            n_cells, width
        ))),
    }
}

fn trailing_shape(shape: &[usize], width: usize) -> IxDyn {
    let mut dims = shape.to_vec();
    dims.push(width);
    IxDyn(&dims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, arr2, ArrayD};

    fn config() -> BulkConfig {
        BulkConfig::with_threads(2)
    }

    #[test]
    fn test_zoom_in_appends_axis() {
        let cells = arr1(&[0u64]).into_dyn();
        let out = zoom_to(0, cells.view(), 1, &config()).unwrap();
        assert_eq!(out.shape(), &[1, 4]);
        assert_eq!(out.iter().copied().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_zoom_out_keeps_shape() {
        let cells = arr2(&[[4u64, 5], [46, 47]]).into_dyn();
        let out = zoom_to(1, cells.view(), 0, &config()).unwrap();
        assert_eq!(out, arr2(&[[1u64, 1], [11, 11]]).into_dyn());
    }

    #[test]
    fn test_invalid_cell_fails_before_work() {
        let cells = arr1(&[0u64, 48]).into_dyn();
        let err = zoom_to(1, cells.view(), 2, &config()).unwrap_err();
        assert_eq!(err, HealpixError::invalid_cell(1, 48));
    }

    #[test]
    fn test_pairing_rules() {
        assert_eq!(pairing(&[5], &[5]).unwrap(), Pairing::Elementwise);
        assert_eq!(pairing(&[5], &[5, 1]).unwrap(), Pairing::Rows);
        assert_eq!(pairing(&[], &[3]).unwrap(), Pairing::Rows);
        assert!(matches!(pairing(&[2], &[3, 2]), Err(HealpixError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_zuniq_runs_on_executor() {
        let layer = Layer::new(3).unwrap();
        let cells = arr2(&[[0u64, 1], [500, 767]]).into_dyn();
        let z = to_zuniq(&layer, cells.view(), &config()).unwrap();
        assert_eq!(z.shape(), &[2, 2]);
        assert_eq!(z[[1, 0]], zuniq::to_zuniq(3, 500).unwrap());
        let (depths, back) = from_zuniq(z.view(), &config()).unwrap();
        assert!(depths.iter().all(|&d| d == 3));
        assert_eq!(back, cells);

        let bad = arr1(&[z[[0, 0]], 0b10]).into_dyn();
        assert!(from_zuniq(bad.view(), &config()).is_err());
        assert!(to_zuniq(&layer, arr1(&[768u64]).into_dyn().view(), &config()).is_err());
    }

    #[test]
    fn test_zuniq_centers_follow_each_depth() {
        let mixed = arr1(&[
            zuniq::to_zuniq(0, 4).unwrap(),
            zuniq::to_zuniq(5, 1234).unwrap(),
            zuniq::to_zuniq(29, 7).unwrap(),
        ])
        .into_dyn();
        let (lon, lat) = zuniq_to_lonlat(&Ellipsoid::WGS84, mixed.view(), &config()).unwrap();
        for (i, (depth, cell)) in [(0u8, 4u64), (5, 1234), (29, 7)].into_iter().enumerate() {
            let grid = Grid::new(depth, Scheme::Nested, Ellipsoid::WGS84).unwrap();
            let center = grid.cell_to_lonlat(cell).unwrap();
            assert_eq!((lon[[i]], lat[[i]]), (center.lon, center.lat), "depth {}", depth);
        }

        let back = lonlat_to_zuniq(5, &Ellipsoid::WGS84, lon.view(), lat.view(), &config()).unwrap();
        assert_eq!(back[[1]], mixed[[1]]);

        let (vlon, vlat) = zuniq_vertices(&Ellipsoid::WGS84, mixed.view(), &config()).unwrap();
        assert_eq!(vlon.shape(), &[3, 4]);
        let grid = Grid::new(5, Scheme::Nested, Ellipsoid::WGS84).unwrap();
        for (j, vertex) in grid.vertices(1234).unwrap().iter().enumerate() {
            assert_eq!((vlon[[1, j]], vlat[[1, j]]), (vertex.lon, vertex.lat));
        }
    }

    #[test]
    fn test_scalar_array_input() {
        let grid = Grid::new(2, Scheme::Nested, Ellipsoid::SPHERE).unwrap();
        let cell = ArrayD::from_elem(IxDyn(&[]), 17u64);
        let (lon, lat) = healpix_to_lonlat(&grid, cell.view(), &config()).unwrap();
        assert_eq!(lon.ndim(), 0);
        let expected = grid.cell_to_lonlat(17).unwrap();
        assert_eq!(lon[IxDyn(&[])], expected.lon);
        assert_eq!(lat[IxDyn(&[])], expected.lat);
    }
}
