//! HEALPix cell indexing on the sphere and on reference ellipsoids.
//!
//! `celestial-healpix` maps geographic positions to equal-area HEALPix cells
//! and back. Cells are defined on the authalic sphere of an ellipsoid, so
//! areas stay equal on WGS84 just as they do on a sphere. On top of the cell
//! codec sit neighbourhood queries, hierarchical zooming and geodesic
//! distances between cell centers.
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`cell`] | Nested and ring codecs, face coordinates, hashing, vertices, interpolation |
//! | [`ellipsoid`] | Named ellipsoids, derived parameters, authalic latitude |
//! | [`grid`] | A layer, an ordering and an ellipsoid combined: lon/lat ↔ cell ids |
//! | [`neighbours`] | Ring-`k` neighbourhoods and set boundaries |
//! | [`coverage`] | Cells overlapping a longitude/latitude zone |
//! | [`zoom`] | Parents, children and siblings across depths |
//! | [`geodesic`] | Vincenty inverse distances and spherical angles |
//! | [`bulk`] | Validated, optionally parallel, array entry points |
//! | [`depth`] | Depth and cell-id validation, `nside`, cell counts |
//! | [`scheme`] | The `nested` and `ring` orderings |
//! | [`lonlat`] | Geographic positions in degrees |
//! | [`error`] | [`HealpixError`] and [`HealpixResult`] |
//!
//! # Example
//!
//! ```
//! use celestial_healpix::{Ellipsoid, Grid, LonLat, Scheme};
//!
//! let grid = Grid::new(10, Scheme::Nested, Ellipsoid::WGS84).unwrap();
//! let cell = grid.lonlat_to_cell(LonLat::new(2.35, 48.85).unwrap());
//! let center = grid.cell_to_lonlat(cell).unwrap();
//! assert_eq!(grid.lonlat_to_cell(center), cell);
//! ```
//!
//! # Features
//!
//! - `parallel` (default): bulk functions run on a rayon pool.
//! - `serde`: `Serialize`/`Deserialize` for the value types.

pub mod bulk;
pub mod cell;
pub mod constants;
pub mod coverage;
pub mod depth;
pub mod ellipsoid;
pub mod error;
pub mod geodesic;
pub mod grid;
pub mod lonlat;
pub mod neighbours;
pub mod scheme;
pub mod zoom;

pub use bulk::BulkConfig;
pub use cell::{FaceXY, Layer};
pub use coverage::{zone_coverage, Zone};
pub use depth::{check_cell, check_depth, n_cells, nside};
pub use ellipsoid::{AuthalicLatitude, Ellipsoid};
pub use error::{HealpixError, HealpixResult};
pub use grid::{latitude_authalic_to_geographic, latitude_geographic_to_authalic, Grid};
pub use lonlat::LonLat;
pub use neighbours::Direction;
pub use scheme::Scheme;
