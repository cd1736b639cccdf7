use celestial_healpix::HealpixError;
use thiserror::Error;

pub type MocResult<T> = Result<T, MocError>;

#[derive(Debug, Error)]
pub enum MocError {
    #[error("Depth mismatch: {left} vs {right}")]
    DepthMismatch { left: u8, right: u8 },

    #[error("Position {index} out of bounds for an index of {size} cells")]
    IndexOutOfBounds { index: u64, size: u64 },

    #[error("Invalid slice: {message}")]
    InvalidSlice { message: String },

    #[error("Invalid interval list: {message}")]
    InvalidIntervals { message: String },

    #[error("Cannot decode coverage index: {message}")]
    Decode { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HEALPix error: {source}")]
    Healpix {
        #[from]
        source: HealpixError,
    },
}

impl MocError {
    pub fn depth_mismatch(left: u8, right: u8) -> Self {
        Self::DepthMismatch { left, right }
    }

    pub fn index_out_of_bounds(index: u64, size: u64) -> Self {
        Self::IndexOutOfBounds { index, size }
    }

    pub fn invalid_slice(message: impl Into<String>) -> Self {
        Self::InvalidSlice {
            message: message.into(),
        }
    }

    pub fn invalid_intervals(message: impl Into<String>) -> Self {
        Self::InvalidIntervals {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}
