//! Ring-ordered labels.
//!
//! Cells are numbered ring by ring from the north pole. The polar caps hold
//! `2·nside·(nside-1)` cells each, with ring `i` carrying `4i` cells; every
//! equatorial ring carries `4·nside` cells, every other one shifted by half
//! a cell.

use super::bits::isqrt;
use super::FaceXY;
use crate::constants::{JPLL, JRLL};

#[inline]
fn layout(depth: u8) -> (i64, i64, i64) {
    let nside = 1i64 << depth;
    let ncap = 2 * nside * (nside - 1);
    let npix = 12 * nside * nside;
    (nside, ncap, npix)
}

pub(crate) fn to_face_xy(depth: u8, cell: u64) -> FaceXY {
    let (nside, ncap, npix) = layout(depth);
    let pix = cell as i64;

    let (iring, iphi, kshift, nr, face) = if pix < ncap {
        let iring = (1 + isqrt(1 + 2 * cell) as i64) >> 1;
        let iphi = (pix + 1) - 2 * iring * (iring - 1);
        (iring, iphi, 0, iring, (iphi - 1) / iring)
    } else if pix < npix - ncap {
        let ip = pix - ncap;
        let tmp = ip / (4 * nside);
        let iring = tmp + nside;
        let iphi = ip - tmp * 4 * nside + 1;
        let kshift = (iring + nside) & 1;
        let ire = tmp + 1;
        let irm = 2 * nside + 2 - ire;
        let ifm = (iphi - ire / 2 + nside - 1) / nside;
        let ifp = (iphi - irm / 2 + nside - 1) / nside;
        let face = if ifp == ifm {
            ifp | 4
        } else if ifp < ifm {
            ifp
        } else {
            ifm + 8
        };
        (iring, iphi, kshift, nside, face)
    } else {
        let ip = npix - pix;
        let nr = (1 + isqrt((2 * ip - 1) as u64) as i64) >> 1;
        let iphi = 4 * nr + 1 - (ip - 2 * nr * (nr - 1));
        (4 * nside - nr, iphi, 0, nr, 8 + (iphi - 1) / nr)
    };

    let f = face as usize;
    let irt = iring - JRLL[f] * nside + 1;
    let mut ipt = 2 * iphi - JPLL[f] * nr - kshift - 1;
    if ipt >= 4 * nside {
        ipt -= 8 * nside;
    }
    FaceXY {
        face: face as u8,
        x: ((ipt - irt) >> 1) as u64,
        y: ((-ipt - irt) >> 1) as u64,
    }
}

pub(crate) fn from_face_xy(depth: u8, fxy: FaceXY) -> u64 {
    let (nside, ncap, npix) = layout(depth);
    let f = fxy.face as usize;
    let (ix, iy) = (fxy.x as i64, fxy.y as i64);

    let jr = JRLL[f] * nside - ix - iy - 1;
    let (nr, n_before, kshift) = if jr < nside {
        (jr, 2 * jr * (jr - 1), 0)
    } else if jr > 3 * nside {
        let nr = 4 * nside - jr;
        (nr, npix - 2 * (nr + 1) * nr, 0)
    } else {
        (nside, ncap + (jr - nside) * 4 * nside, (jr - nside) & 1)
    };

    let mut jp = (JPLL[f] * nr + ix - iy + 1 + kshift) / 2;
    if jp > 4 * nside {
        jp -= 4 * nside;
    } else if jp < 1 {
        jp += 4 * nside;
    }
    (n_before + jp - 1) as u64
}
