use celestial_healpix::bulk::{self, BulkConfig};
use celestial_healpix::{Ellipsoid, Grid, HealpixError, Layer, Scheme};
use ndarray::{arr1, arr2, Array1, ArrayD, Axis, IxDyn};

fn config() -> BulkConfig {
    BulkConfig::with_threads(2)
}

#[test]
fn test_centers_hash_back_to_their_cells() {
    for scheme in [Scheme::Nested, Scheme::Ring] {
        let grid = Grid::new(6, scheme, Ellipsoid::WGS84).unwrap();
        let cells = Array1::from_iter(0..grid.layer().n_cells()).into_dyn();
        let (lon, lat) = bulk::healpix_to_lonlat(&grid, cells.view(), &config()).unwrap();
        assert!(lon.iter().all(|v| (0.0..360.0).contains(v)));
        assert!(lat.iter().all(|v| (-90.0..=90.0).contains(v)));
        let back = bulk::lonlat_to_healpix(&grid, lon.view(), lat.view(), &config()).unwrap();
        assert_eq!(back, cells);
    }
}

#[test]
fn test_invalid_cell_rejects_whole_batch() {
    let grid = Grid::new(2, Scheme::Nested, Ellipsoid::SPHERE).unwrap();
    let cells = arr1(&[0u64, 5, 192]).into_dyn();
    let err = bulk::healpix_to_lonlat(&grid, cells.view(), &config()).unwrap_err();
    assert_eq!(err, HealpixError::invalid_cell(2, 192));
}

#[test]
fn test_lonlat_validation() {
    let grid = Grid::new(2, Scheme::Nested, Ellipsoid::SPHERE).unwrap();
    let lon = arr1(&[0.0, 10.0]).into_dyn();
    let lat = arr1(&[0.0, 91.0]).into_dyn();
    assert!(bulk::lonlat_to_healpix(&grid, lon.view(), lat.view(), &config()).is_err());

    let lat = arr1(&[0.0]).into_dyn();
    let err = bulk::lonlat_to_healpix(&grid, lon.view(), lat.view(), &config()).unwrap_err();
    assert!(matches!(err, HealpixError::ShapeMismatch { .. }));
}

#[test]
fn test_vertices_trailing_axis() {
    let grid = Grid::new(3, Scheme::Ring, Ellipsoid::WGS84).unwrap();
    let cells = arr2(&[[0u64, 1, 2], [100, 200, 767]]).into_dyn();
    let (lon, lat) = bulk::vertices(&grid, cells.view(), &config()).unwrap();
    assert_eq!(lon.shape(), &[2, 3, 4]);
    assert_eq!(lat.shape(), &[2, 3, 4]);
    let single = grid.vertices(200).unwrap();
    for (i, vertex) in single.iter().enumerate() {
        assert_eq!(lon[[1, 1, i]], vertex.lon);
        assert_eq!(lat[[1, 1, i]], vertex.lat);
    }
}

#[test]
fn test_bilinear_weights_sum_to_one() {
    let grid = Grid::new(5, Scheme::Nested, Ellipsoid::WGS84).unwrap();
    let lon = arr1(&[0.0, 45.3, 181.0, 359.9]).into_dyn();
    let lat = arr1(&[0.0, 60.2, -33.3, 89.9]).into_dyn();
    let (cells, weights) = bulk::bilinear_interpolation(&grid, lon.view(), lat.view(), &config()).unwrap();
    assert_eq!(cells.shape(), &[4, 4]);
    for row in weights.axis_iter(Axis(0)) {
        assert!((row.sum() - 1.0).abs() < 1e-12, "{:?}", row);
        assert!(row.iter().all(|w| (0.0..=1.0).contains(w)));
    }
    assert!(cells.iter().all(|&c| c < grid.layer().n_cells()));
}

#[test]
fn test_kth_neighbourhood_shape_and_center() {
    let layer = Layer::new(3).unwrap();
    let cells = arr1(&[0u64, 300, 767]).into_dyn();
    let out = bulk::kth_neighbourhood(&layer, Scheme::Nested, cells.view(), 2, &config()).unwrap();
    assert_eq!(out.shape(), &[3, 25]);
    for (row, &cell) in out.axis_iter(Axis(0)).zip(cells.iter()) {
        assert_eq!(row[[12]], cell as i64);
        let single = layer.kth_neighbourhood(Scheme::Nested, cell, 2).unwrap();
        assert_eq!(row.iter().copied().collect::<Vec<_>>(), single);
    }
}

#[test]
fn test_kth_neighbourhood_ring_bounds() {
    let layer = Layer::new(0).unwrap();
    let cells = arr1(&[0u64]).into_dyn();
    let err = bulk::kth_neighbourhood(&layer, Scheme::Nested, cells.view(), 2, &config()).unwrap_err();
    assert_eq!(err, HealpixError::invalid_ring(2, 1));
    let err = bulk::kth_neighbourhood(&layer, Scheme::Nested, cells.view(), -1, &config()).unwrap_err();
    assert!(matches!(err, HealpixError::InvalidRing { ring: -1, .. }));
}

#[test]
fn test_zoom_and_siblings() {
    let cells = arr1(&[1u64, 11]).into_dyn();
    let children = bulk::zoom_to(0, cells.view(), 2, &BulkConfig::default()).unwrap();
    assert_eq!(children.shape(), &[2, 16]);
    assert_eq!(children[[0, 0]], 16);
    assert_eq!(children[[1, 15]], 191);

    let layer = Layer::new(2).unwrap();
    let sibs = bulk::siblings(&layer, arr1(&[6u64]).into_dyn().view(), &config()).unwrap();
    assert_eq!(sibs, arr2(&[[4u64, 5, 6, 7]]).into_dyn());

    let layer = Layer::new(0).unwrap();
    let sibs = bulk::siblings(&layer, arr1(&[3u64]).into_dyn().view(), &config()).unwrap();
    assert_eq!(sibs.shape(), &[1, 12]);
}

#[test]
fn test_geodesic_distance_broadcasting() {
    let grid = Grid::new(4, Scheme::Nested, Ellipsoid::WGS84).unwrap();
    let from = arr1(&[0u64, 10, 20, 30, 40]).into_dyn();

    let to = arr2(&[[1i64], [10], [-1], [31], [3071]]).into_dyn();
    let d = bulk::geodesic_distance(&grid, from.view(), to.view(), &config()).unwrap();
    assert_eq!(d.shape(), &[5, 1]);
    assert!(d[[0, 0]] > 0.0);
    assert_eq!(d[[1, 0]], 0.0);
    assert!(d[[2, 0]].is_nan());
    assert_eq!(d[[4, 0]], grid.geodesic_distance(40, 3071).unwrap());

    let to = arr1(&[0i64, 11, 21, 31, 41]).into_dyn();
    let d = bulk::geodesic_distance(&grid, from.view(), to.view(), &config()).unwrap();
    assert_eq!(d.shape(), &[5]);
    assert_eq!(d[[0]], 0.0);

    let from = arr1(&[0u64, 1]).into_dyn();
    let to = ArrayD::<i64>::zeros(IxDyn(&[3, 2]));
    let err = bulk::geodesic_distance(&grid, from.view(), to.view(), &config()).unwrap_err();
    assert!(err
        .to_string()
        .contains("The shape of `from_` must be compatible"));
}

#[test]
fn test_geodesic_distance_rejects_bad_destinations() {
    let grid = Grid::new(1, Scheme::Nested, Ellipsoid::WGS84).unwrap();
    let from = arr1(&[0u64]).into_dyn();
    let to = arr1(&[-2i64]).into_dyn();
    assert!(bulk::geodesic_distance(&grid, from.view(), to.view(), &config()).is_err());
    let to = arr1(&[48i64]).into_dyn();
    assert!(bulk::geodesic_distance(&grid, from.view(), to.view(), &config()).is_err());
}

#[test]
fn test_unit_sphere_distance_matches_angle() {
    let grid = Grid::new(3, Scheme::Nested, Ellipsoid::UNIT_SPHERE).unwrap();
    let from = arr1(&[0u64, 100, 500]).into_dyn();
    let to = arr2(&[[1u64, 700], [101, 300], [0, 767]]).into_dyn();
    let to_signed = to.mapv(|c| c as i64);
    let angles = bulk::angular_distances(&grid, from.view(), to.view(), &config()).unwrap();
    let dist = bulk::geodesic_distance(&grid, from.view(), to_signed.view(), &config()).unwrap();
    for (a, d) in angles.iter().zip(dist.iter()) {
        assert!((a - d).abs() < 1e-9, "{} vs {}", a, d);
    }
}

#[test]
fn test_latitude_conversion_round_trip() {
    let lat = Array1::linspace(-90.0, 90.0, 181).into_dyn();
    let xi = bulk::latitude_geographic_to_authalic(&Ellipsoid::WGS84, lat.view(), &config()).unwrap();
    let back = bulk::latitude_authalic_to_geographic(&Ellipsoid::WGS84, xi.view(), &config()).unwrap();
    for (a, b) in lat.iter().zip(back.iter()) {
        assert!((a - b).abs() < 1e-10, "{} vs {}", a, b);
    }

    let sphere = bulk::latitude_geographic_to_authalic(&Ellipsoid::SPHERE, lat.view(), &config()).unwrap();
    for (a, b) in lat.iter().zip(sphere.iter()) {
        assert!((a.to_radians() - b).abs() < 1e-15);
    }

    let bad = arr1(&[2.0]).into_dyn();
    assert!(bulk::latitude_authalic_to_geographic(&Ellipsoid::WGS84, bad.view(), &config()).is_err());
}

#[test]
fn test_scheme_conversion_round_trip() {
    let layer = Layer::new(4).unwrap();
    let cells = Array1::from_iter(0..layer.n_cells()).into_dyn();
    let ring = bulk::nested_to_ring(&layer, cells.view(), &config()).unwrap();
    let nested = bulk::ring_to_nested(&layer, ring.view(), &config()).unwrap();
    assert_eq!(nested, cells);
    let mut sorted = ring.iter().copied().collect::<Vec<_>>();
    sorted.sort_unstable();
    assert_eq!(sorted, (0..layer.n_cells()).collect::<Vec<_>>());
}

#[test]
fn test_zuniq_round_trip() {
    let layer = Layer::new(7).unwrap();
    let cells = arr1(&[0u64, 12345, layer.n_cells() - 1]).into_dyn();
    let z = bulk::to_zuniq(&layer, cells.view(), &config()).unwrap();
    let (depths, back) = bulk::from_zuniq(z.view(), &config()).unwrap();
    assert!(depths.iter().all(|&d| d == 7));
    assert_eq!(back, cells);
}

#[cfg(not(feature = "parallel"))]
#[test]
fn test_sequential_executor() {
    let executor = bulk::Executor::new(&config()).unwrap();
    assert_eq!(executor.threads(), 1);
}
