use super::bits::{deinterleave, interleave};
use super::FaceXY;

#[inline]
pub(crate) fn to_face_xy(depth: u8, cell: u64) -> FaceXY {
    let shift = 2 * depth as u32;
    let face = (cell >> shift) as u8;
    let (x, y) = deinterleave(cell & ((1u64 << shift) - 1));
    FaceXY { face, x, y }
}

#[inline]
pub(crate) fn from_face_xy(depth: u8, fxy: FaceXY) -> u64 {
    ((fxy.face as u64) << (2 * depth as u32)) | interleave(fxy.x, fxy.y)
}
