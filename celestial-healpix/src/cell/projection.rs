//! The HEALPix projection between face coordinates and the unit sphere.
//!
//! Face coordinates are continuous: `x` and `y` run over `[0, 1]` on a face,
//! `(0, 0)` being its southern corner, `(1, 0)` the eastern, `(1, 1)` the
//! northern and `(0, 1)` the western one.

use crate::constants::{HALF_PI, JPLL, JRLL, QUARTER_PI, TWO_THIRDS, TWOPI};

/// Longitude and latitude (radians, unit sphere) of a continuous face point.
///
/// Near the poles the latitude is derived from `1 - z` directly so the
/// result stays accurate (and finite) right up to ±π/2.
pub(crate) fn face_xy_to_lonlat(face: u8, x: f64, y: f64) -> (f64, f64) {
    let f = face as usize;
    let jr = JRLL[f] as f64 - x - y;

    let (nr, z, sth) = if jr < 1.0 {
        let tmp = jr * jr / 3.0;
        (jr, 1.0 - tmp, libm::sqrt(tmp * (2.0 - tmp)))
    } else if jr > 3.0 {
        let nr = 4.0 - jr;
        let tmp = nr * nr / 3.0;
        (nr, tmp - 1.0, libm::sqrt(tmp * (2.0 - tmp)))
    } else {
        let z = (2.0 - jr) * TWO_THIRDS;
        (1.0, z, libm::sqrt((1.0 - z) * (1.0 + z)))
    };

    let mut tmp = JPLL[f] as f64 * nr + x - y;
    if tmp < 0.0 {
        tmp += 8.0;
    }
    if tmp >= 8.0 {
        tmp -= 8.0;
    }
    let lon = if nr < 1e-15 { 0.0 } else { QUARTER_PI * tmp / nr };
    (lon.rem_euclid(TWOPI), libm::atan2(z, sth))
}

/// Face and continuous in-face position (in units of cells, `[0, nside]`)
/// of a point on the unit sphere.
pub(crate) fn lonlat_to_face_xy(nside: u64, lon: f64, lat: f64) -> (u8, f64, f64) {
    let n = nside as f64;
    let z = libm::sin(lat);
    let tt = (lon / HALF_PI).rem_euclid(4.0);

    if libm::fabs(z) <= TWO_THIRDS {
        let temp1 = n * (0.5 + tt);
        let temp2 = n * z * 0.75;
        let jp = temp1 - temp2;
        let jm = temp1 + temp2;
        let ifp = libm::floor(jp / n) as i64;
        let ifm = libm::floor(jm / n) as i64;
        let face = if ifp == ifm {
            ifp | 4
        } else if ifp < ifm {
            ifp
        } else {
            ifm + 8
        };
        (face as u8, jm.rem_euclid(n), n - jp.rem_euclid(n))
    } else {
        let ntt = libm::floor(tt).min(3.0);
        let tp = tt - ntt;
        // sqrt(3 (1 - |z|)) evaluated without cancellation near the pole
        let colat = HALF_PI - libm::fabs(lat);
        let tmp = n * libm::sqrt(6.0) * libm::sin(0.5 * colat);
        let jp = (tp * tmp).min(n);
        let jm = ((1.0 - tp) * tmp).min(n);
        if z > 0.0 {
            (ntt as u8, n - jm, n - jp)
        } else {
            (ntt as u8 + 8, jp, jm)
        }
    }
}
