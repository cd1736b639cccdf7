use std::fmt;

use crate::constants::{DEG_TO_RAD, RAD_TO_DEG};
use crate::error::{HealpixError, HealpixResult};

/// A geographic position in degrees.
///
/// Longitude is kept as given (any finite value); [`LonLat::normalized`]
/// wraps it into `[0, 360)`. Latitude is always within `[-90, 90]`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    pub fn new(lon: f64, lat: f64) -> HealpixResult<Self> {
        if !lon.is_finite() {
            return Err(HealpixError::invalid_parameter(format!(
                "longitude must be finite, got {}",
                lon
            )));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(HealpixError::invalid_parameter(format!(
                "latitude must be in [-90, 90], got {}",
                lat
            )));
        }
        Ok(Self { lon, lat })
    }

    pub fn from_radians(lon: f64, lat: f64) -> Self {
        Self {
            lon: lon * RAD_TO_DEG,
            lat: (lat * RAD_TO_DEG).clamp(-90.0, 90.0),
        }
    }

    pub fn to_radians(&self) -> (f64, f64) {
        (self.lon * DEG_TO_RAD, self.lat * DEG_TO_RAD)
    }

    pub fn normalized(&self) -> Self {
        let lon = self.lon.rem_euclid(360.0);
        Self {
            // rem_euclid can round up to exactly 360 for tiny negatives
            lon: if lon >= 360.0 { 0.0 } else { lon },
            lat: self.lat,
        }
    }
}

impl fmt::Display for LonLat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}°, {:.6}°)", self.lon, self.lat)
    }
}
