//! Reference ellipsoids.
//!
//! An [`Ellipsoid`] is just `(a, f)`: the equatorial radius and the
//! flattening. Named models resolve through [`Ellipsoid::named`]; the names
//! follow the usual PROJ spellings and are matched case-insensitively.
//! `"sphere"` and `"unitsphere"` have `f = 0`, which turns every latitude
//! conversion into the identity.

mod authalic;

pub use authalic::AuthalicLatitude;

use std::fmt;
use std::str::FromStr;

use crate::error::{HealpixError, HealpixResult};

/// Named models: `(name, a in meters, inverse flattening)`. An inverse
/// flattening of zero denotes a sphere.
const NAMED_ELLIPSOIDS: &[(&str, f64, f64)] = &[
    ("sphere", 6_370_997.0, 0.0),
    ("unitsphere", 1.0, 0.0),
    ("WGS84", 6_378_137.0, 298.257_223_563),
    ("WGS72", 6_378_135.0, 298.26),
    ("WGS66", 6_378_145.0, 298.25),
    ("GRS80", 6_378_137.0, 298.257_222_101),
    ("GRS67", 6_378_160.0, 298.247_167_427),
    ("CGCS2000", 6_378_137.0, 298.257_222_101),
    ("bessel", 6_377_397.155, 299.152_812_8),
    ("intl", 6_378_388.0, 297.0),
    ("clrk66", 6_378_206.4, 294.978_698_213_9),
    ("clrk80", 6_378_249.145, 293.466_3),
    ("airy", 6_377_563.396, 299.324_964_6),
    ("mod_airy", 6_377_340.189, 299.324_964_6),
    ("krass", 6_378_245.0, 298.3),
    ("helmert", 6_378_200.0, 298.3),
    ("evrst30", 6_377_276.345, 300.801_7),
    ("aust_SA", 6_378_160.0, 298.25),
    ("IAU76", 6_378_140.0, 298.257),
];

/// Equatorial radius `a` and flattening `f`, always with `a` positive and
/// finite and `f` in `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawEllipsoid")
)]
pub struct Ellipsoid {
    a: f64,
    f: f64,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawEllipsoid {
    a: f64,
    f: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawEllipsoid> for Ellipsoid {
    type Error = HealpixError;

    fn try_from(raw: RawEllipsoid) -> Result<Self, Self::Error> {
        Self::new(raw.a, raw.f)
    }
}

impl Ellipsoid {
    pub const WGS84: Self = Self {
        a: 6_378_137.0,
        f: 1.0 / 298.257_223_563,
    };

    pub const GRS80: Self = Self {
        a: 6_378_137.0,
        f: 1.0 / 298.257_222_101,
    };

    pub const SPHERE: Self = Self {
        a: 6_370_997.0,
        f: 0.0,
    };

    pub const UNIT_SPHERE: Self = Self { a: 1.0, f: 0.0 };

    pub fn new(a: f64, f: f64) -> HealpixResult<Self> {
        if !a.is_finite() || a <= 0.0 {
            return Err(HealpixError::invalid_ellipsoid(format!(
                "semi-major axis must be positive and finite, got {}",
                a
            )));
        }
        if !(0.0..1.0).contains(&f) {
            return Err(HealpixError::invalid_ellipsoid(format!(
                "flattening must be in [0, 1), got {}",
                f
            )));
        }
        Ok(Self { a, f })
    }

    /// Builds an ellipsoid from its semi-major axis and inverse flattening.
    pub fn from_inverse_flattening(a: f64, inverse_flattening: f64) -> HealpixResult<Self> {
        if inverse_flattening.is_nan() || inverse_flattening <= 1.0 {
            return Err(HealpixError::invalid_ellipsoid(format!(
                "inverse flattening must be greater than 1, got {}",
                inverse_flattening
            )));
        }
        Self::new(a, 1.0 / inverse_flattening)
    }

    pub fn sphere(radius: f64) -> HealpixResult<Self> {
        Self::new(radius, 0.0)
    }

    pub fn named(name: &str) -> HealpixResult<Self> {
        let wanted = name.trim();
        NAMED_ELLIPSOIDS
            .iter()
            .find(|(known, _, _)| known.eq_ignore_ascii_case(wanted))
            .map(|&(_, a, rf)| Self {
                a,
                f: if rf == 0.0 { 0.0 } else { 1.0 / rf },
            })
            .ok_or_else(|| HealpixError::unknown_ellipsoid(name))
    }

    /// Names accepted by [`Ellipsoid::named`].
    pub fn known_names() -> impl Iterator<Item = &'static str> {
        NAMED_ELLIPSOIDS.iter().map(|(name, _, _)| *name)
    }

    /// Equatorial radius.
    #[inline]
    pub fn a(&self) -> f64 {
        self.a
    }

    /// Flattening `(a - b) / a`.
    #[inline]
    pub fn f(&self) -> f64 {
        self.f
    }

    pub fn is_spherical(&self) -> bool {
        self.f == 0.0
    }

    /// Polar radius.
    #[inline]
    pub fn b(&self) -> f64 {
        self.a * (1.0 - self.f)
    }

    /// First eccentricity squared, `e² = f (2 - f)`.
    #[inline]
    pub fn e2(&self) -> f64 {
        self.f * (2.0 - self.f)
    }

    #[inline]
    pub fn e(&self) -> f64 {
        libm::sqrt(self.e2())
    }

    /// Third flattening `n = f / (2 - f)`.
    #[inline]
    pub fn n(&self) -> f64 {
        self.f / (2.0 - self.f)
    }

    /// Radius of the sphere whose great circles have the ellipsoid's
    /// meridian length (the rectifying radius).
    pub fn rectifying_radius(&self) -> f64 {
        let n = self.n();
        let n2 = n * n;
        self.a / (1.0 + n) * (1.0 + n2 / 4.0 + n2 * n2 / 64.0 + n2 * n2 * n2 / 256.0)
    }

    /// Converter between geographic and authalic latitudes on this ellipsoid.
    pub fn authalic(&self) -> AuthalicLatitude {
        AuthalicLatitude::new(self)
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::SPHERE
    }
}

impl FromStr for Ellipsoid {
    type Err = HealpixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::named(s)
    }
}

impl fmt::Display for Ellipsoid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_spherical() {
            write!(f, "Sphere(r={})", self.a)
        } else {
            write!(f, "Ellipsoid(a={}, 1/f={:.9})", self.a, 1.0 / self.f)
        }
    }
}
