//! Binary encoding of a [`RangeMocIndex`].
//!
//! Layout (little-endian):
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0 | 4 | magic `HMOC` |
//! | 4 | 4 | format version |
//! | 8 | 1 | depth |
//! | 9 | 3 | reserved, zero |
//! | 12 | 8 | interval count `n` |
//! | 20 | 16·n | `(lo, hi)` pairs |
//!
//! Decoding re-checks every invariant of the interval list, so a decoded
//! index is indistinguishable from one built in memory.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::ops::Range;
use std::path::Path;

use byteorder::{ByteOrder, LittleEndian, ReadBytesExt, WriteBytesExt};
use celestial_healpix::{check_depth, n_cells};

use crate::error::{MocError, MocResult};
use crate::index::RangeMocIndex;

const MOC_MAGIC: &[u8; 4] = b"HMOC";
const MOC_VERSION: u32 = 1;
const HEADER_SIZE: usize = 20;
const INTERVAL_SIZE: usize = 16;

impl RangeMocIndex {
    pub fn to_bytes(&self) -> Vec<u8> {
        let ranges = self.intervals();
        let mut buf = vec![0u8; HEADER_SIZE + INTERVAL_SIZE * ranges.len()];
        buf[0..4].copy_from_slice(MOC_MAGIC);
        LittleEndian::write_u32(&mut buf[4..8], MOC_VERSION);
        buf[8] = self.depth();
        LittleEndian::write_u64(&mut buf[12..20], ranges.len() as u64);
        for (chunk, r) in buf[HEADER_SIZE..].chunks_exact_mut(INTERVAL_SIZE).zip(ranges) {
            LittleEndian::write_u64(&mut chunk[0..8], r.start);
            LittleEndian::write_u64(&mut chunk[8..16], r.end);
        }
        buf
    }

    pub fn from_bytes(bytes: &[u8]) -> MocResult<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(MocError::decode(format!(
                "buffer too small: {} bytes, header needs {}",
                bytes.len(),
                HEADER_SIZE
            )));
        }
        let (depth, count) = parse_header(&bytes[..HEADER_SIZE])?;
        let expected = count
            .checked_mul(INTERVAL_SIZE as u64)
            .and_then(|n| n.checked_add(HEADER_SIZE as u64));
        if expected != Some(bytes.len() as u64) {
            return Err(MocError::decode(format!(
                "{} intervals do not match a buffer of {} bytes",
                count,
                bytes.len()
            )));
        }
        let ranges = bytes[HEADER_SIZE..]
            .chunks_exact(INTERVAL_SIZE)
            .map(|chunk| LittleEndian::read_u64(&chunk[0..8])..LittleEndian::read_u64(&chunk[8..16]))
            .collect();
        let index = Self::from_canonical(depth, ranges)?;
        tracing::debug!(depth, intervals = count, "decoded coverage index");
        Ok(index)
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> MocResult<()> {
        writer.write_all(MOC_MAGIC)?;
        writer.write_u32::<LittleEndian>(MOC_VERSION)?;
        writer.write_u8(self.depth())?;
        writer.write_all(&[0u8; 3])?;
        writer.write_u64::<LittleEndian>(self.n_intervals() as u64)?;
        for r in self.intervals() {
            writer.write_u64::<LittleEndian>(r.start)?;
            writer.write_u64::<LittleEndian>(r.end)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn read_from<R: Read>(mut reader: R) -> MocResult<Self> {
        let mut header = [0u8; HEADER_SIZE];
        reader.read_exact(&mut header)?;
        let (depth, count) = parse_header(&header)?;

        // at most one interval per pair of cells survives validation
        let limit = n_cells(depth) / 2 + 1;
        if count > limit {
            return Err(MocError::decode(format!(
                "{} intervals exceed the {} possible at depth {}",
                count, limit, depth
            )));
        }
        let mut ranges: Vec<Range<u64>> = Vec::with_capacity(count.min(1 << 16) as usize);
        for _ in 0..count {
            let lo = reader.read_u64::<LittleEndian>()?;
            let hi = reader.read_u64::<LittleEndian>()?;
            ranges.push(lo..hi);
        }
        let index = Self::from_canonical(depth, ranges)?;
        tracing::debug!(depth, intervals = count, "read coverage index");
        Ok(index)
    }

    /// Writes the index to a file, replacing it.
    pub fn save(&self, path: impl AsRef<Path>) -> MocResult<()> {
        let file = File::create(path.as_ref())?;
        self.write_to(BufWriter::new(file))
    }

    pub fn open(path: impl AsRef<Path>) -> MocResult<Self> {
        let file = File::open(path.as_ref())?;
        Self::read_from(BufReader::new(file))
    }
}

fn parse_header(header: &[u8]) -> MocResult<(u8, u64)> {
    let magic = &header[0..4];
    if magic != MOC_MAGIC {
        return Err(MocError::decode(format!(
            "invalid magic: expected {:?}, got {:?}",
            MOC_MAGIC, magic
        )));
    }
    let version = LittleEndian::read_u32(&header[4..8]);
    if version != MOC_VERSION {
        return Err(MocError::decode(format!(
            "unsupported version: expected {}, got {}",
            MOC_VERSION, version
        )));
    }
    let depth = header[8];
    check_depth(depth)?;
    let count = LittleEndian::read_u64(&header[12..20]);
    Ok((depth, count))
}

#[cfg(feature = "serde")]
mod serde_impl {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::index::RangeMocIndex;

    #[derive(Serialize, Deserialize)]
    struct RawIndex {
        depth: u8,
        intervals: Vec<(u64, u64)>,
    }

    impl Serialize for RangeMocIndex {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            RawIndex {
                depth: self.depth(),
                intervals: self.intervals().iter().map(|r| (r.start, r.end)).collect(),
            }
            .serialize(serializer)
        }
    }

    impl<'de> Deserialize<'de> for RangeMocIndex {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let raw = RawIndex::deserialize(deserializer)?;
            let ranges = raw.intervals.into_iter().map(|(lo, hi)| lo..hi).collect();
            RangeMocIndex::from_canonical(raw.depth, ranges).map_err(D::Error::custom)
        }
    }
}
