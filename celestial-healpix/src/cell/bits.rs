//! Bit interleaving for the nested (Morton) layout.
//!
//! `x` occupies the even bit positions and `y` the odd ones, so a cell
//! and its three siblings differ only in the two lowest bits.

/// Spreads the low 32 bits of `v` onto the even bit positions.
#[inline]
pub(crate) fn spread(v: u64) -> u64 {
    let mut v = v & 0x0000_0000_FFFF_FFFF;
    v = (v | (v << 16)) & 0x0000_FFFF_0000_FFFF;
    v = (v | (v << 8)) & 0x00FF_00FF_00FF_00FF;
    v = (v | (v << 4)) & 0x0F0F_0F0F_0F0F_0F0F;
    v = (v | (v << 2)) & 0x3333_3333_3333_3333;
    (v | (v << 1)) & 0x5555_5555_5555_5555
}

/// Inverse of [`spread`]: gathers the even bit positions.
#[inline]
pub(crate) fn compact(v: u64) -> u64 {
    let mut v = v & 0x5555_5555_5555_5555;
    v = (v | (v >> 1)) & 0x3333_3333_3333_3333;
    v = (v | (v >> 2)) & 0x0F0F_0F0F_0F0F_0F0F;
    v = (v | (v >> 4)) & 0x00FF_00FF_00FF_00FF;
    v = (v | (v >> 8)) & 0x0000_FFFF_0000_FFFF;
    (v | (v >> 16)) & 0x0000_0000_FFFF_FFFF
}

#[inline]
pub(crate) fn interleave(x: u64, y: u64) -> u64 {
    spread(x) | (spread(y) << 1)
}

#[inline]
pub(crate) fn deinterleave(v: u64) -> (u64, u64) {
    (compact(v), compact(v >> 1))
}

/// Integer square root, exact for every `u64` this crate produces.
pub(crate) fn isqrt(v: u64) -> u64 {
    let mut r = libm::sqrt(v as f64) as u64;
    while r > 0 && r.saturating_mul(r) > v {
        r -= 1;
    }
    while (r + 1).saturating_mul(r + 1) <= v {
        r += 1;
    }
    r
}
