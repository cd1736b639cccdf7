//! HEALPix on a reference ellipsoid.
//!
//! The tessellation itself is defined on the authalic sphere: a geographic
//! latitude is first turned into its authalic counterpart, hashed on the
//! unit sphere, and cell positions come back through the inverse
//! conversion. On a sphere both conversions are the identity.

use crate::cell::Layer;
use crate::constants::{DEG_TO_RAD, RAD_TO_DEG};
use crate::ellipsoid::{AuthalicLatitude, Ellipsoid};
use crate::error::HealpixResult;
use crate::geodesic;
use crate::lonlat::LonLat;
use crate::scheme::Scheme;

/// A layer, an ordering and an ellipsoid: everything needed to go between
/// cell ids and geographic positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    layer: Layer,
    scheme: Scheme,
    ellipsoid: Ellipsoid,
    authalic: AuthalicLatitude,
}

impl Grid {
    pub fn new(depth: u8, scheme: Scheme, ellipsoid: Ellipsoid) -> HealpixResult<Self> {
        Ok(Self {
            layer: Layer::new(depth)?,
            scheme,
            ellipsoid,
            authalic: ellipsoid.authalic(),
        })
    }

    pub fn layer(&self) -> &Layer {
        &self.layer
    }

    pub fn depth(&self) -> u8 {
        self.layer.depth()
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }

    /// Geographic center of `cell`, longitude wrapped into `[0, 360)`.
    pub fn cell_to_lonlat(&self, cell: u64) -> HealpixResult<LonLat> {
        self.layer.check(cell)?;
        Ok(self.center_of(cell))
    }

    /// Cell containing a geographic position.
    pub fn lonlat_to_cell(&self, position: LonLat) -> u64 {
        let (lon, lat) = position.to_radians();
        self.layer.hash(self.scheme, lon, self.authalic.to_authalic(lat))
    }

    /// Corners of `cell` in south, east, north, west order.
    pub fn vertices(&self, cell: u64) -> HealpixResult<[LonLat; 4]> {
        self.layer.check(cell)?;
        Ok(self.vertices_of(cell))
    }

    /// The four cells whose centers surround `position`, with bilinear
    /// weights summing to one. Ids are labelled in this grid's scheme.
    pub fn bilinear_interpolation(&self, position: LonLat) -> [(u64, f64); 4] {
        let (lon, lat) = position.to_radians();
        self.layer
            .bilinear_interpolation(lon, self.authalic.to_authalic(lat))
            .map(|(cell, weight)| (self.layer.relabel(Scheme::Nested, self.scheme, cell), weight))
    }

    /// Geodesic distance between the centers of two cells, in the unit of
    /// the ellipsoid's semi-major axis.
    pub fn geodesic_distance(&self, from: u64, to: u64) -> HealpixResult<f64> {
        self.layer.check(from)?;
        self.layer.check(to)?;
        Ok(self.distance_of(from, to))
    }

    /// Great-circle angle (radians) between two cell centers on the unit
    /// sphere.
    pub fn angular_distance(&self, from: u64, to: u64) -> HealpixResult<f64> {
        self.layer.check(from)?;
        self.layer.check(to)?;
        Ok(self.angle_of(from, to))
    }

    pub(crate) fn center_of(&self, cell: u64) -> LonLat {
        let (lon, lat) = self.layer.center_of(self.scheme, cell);
        self.to_geographic(lon, lat)
    }

    pub(crate) fn vertices_of(&self, cell: u64) -> [LonLat; 4] {
        self.layer
            .vertices_of(self.scheme, cell)
            .map(|(lon, lat)| self.to_geographic(lon, lat))
    }

    pub(crate) fn distance_of(&self, from: u64, to: u64) -> f64 {
        if from == to {
            return 0.0;
        }
        let (lon1, lat1) = self.center_of(from).to_radians();
        let (lon2, lat2) = self.center_of(to).to_radians();
        geodesic::inverse_distance(&self.ellipsoid, lon1, lat1, lon2, lat2)
    }

    pub(crate) fn angle_of(&self, from: u64, to: u64) -> f64 {
        let (lon1, lat1) = self.layer.center_of(self.scheme, from);
        let (lon2, lat2) = self.layer.center_of(self.scheme, to);
        geodesic::angular_separation(lon1, lat1, lon2, lat2)
    }

    fn to_geographic(&self, lon: f64, lat: f64) -> LonLat {
        LonLat {
            lon: lon * RAD_TO_DEG,
            lat: (self.authalic.to_geographic(lat) * RAD_TO_DEG).clamp(-90.0, 90.0),
        }
        .normalized()
    }
}

/// Geographic latitude in degrees to authalic latitude in radians.
pub fn latitude_geographic_to_authalic(ellipsoid: &Ellipsoid, lat_deg: f64) -> f64 {
    ellipsoid.authalic().to_authalic(lat_deg * DEG_TO_RAD)
}

/// Authalic latitude in radians to geographic latitude in degrees.
pub fn latitude_authalic_to_geographic(ellipsoid: &Ellipsoid, lat_rad: f64) -> f64 {
    (ellipsoid.authalic().to_geographic(lat_rad) * RAD_TO_DEG).clamp(-90.0, 90.0)
}
