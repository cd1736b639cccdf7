use thiserror::Error;

pub type HealpixResult<T> = Result<T, HealpixError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum HealpixError {
    #[error("Invalid depth {depth}: expected a value in [0, 29]")]
    InvalidDepth { depth: u8 },

    #[error("Invalid cell id {cell} at depth {depth}: expected a value in [0, 12*4^{depth})")]
    InvalidCell { depth: u8, cell: u64 },

    #[error("Unknown ellipsoid: {name}")]
    UnknownEllipsoid { name: String },

    #[error("Invalid ellipsoid parameters: {message}")]
    InvalidEllipsoid { message: String },

    #[error("Unknown indexing scheme: {name}")]
    InvalidScheme { name: String },

    #[error("Shape mismatch: {message}")]
    ShapeMismatch { message: String },

    #[error("Invalid ring {ring}: expected a value in [0, {max}]")]
    InvalidRing { ring: i64, max: u64 },

    #[error("Invalid parameter: {message}")]
    InvalidParameter { message: String },

    #[error("Thread pool error: {message}")]
    ThreadPool { message: String },
}

impl HealpixError {
    pub fn invalid_depth(depth: u8) -> Self {
        Self::InvalidDepth { depth }
    }

    pub fn invalid_cell(depth: u8, cell: u64) -> Self {
        Self::InvalidCell { depth, cell }
    }

    pub fn unknown_ellipsoid(name: impl Into<String>) -> Self {
        Self::UnknownEllipsoid { name: name.into() }
    }

    pub fn invalid_ellipsoid(message: impl Into<String>) -> Self {
        Self::InvalidEllipsoid {
            message: message.into(),
        }
    }

    pub fn invalid_scheme(name: impl Into<String>) -> Self {
        Self::InvalidScheme { name: name.into() }
    }

    pub fn shape_mismatch(message: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            message: message.into(),
        }
    }

    pub fn invalid_ring(ring: i64, max: u64) -> Self {
        Self::InvalidRing { ring, max }
    }

    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    pub fn thread_pool(message: impl Into<String>) -> Self {
        Self::ThreadPool {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = HealpixError::invalid_depth(30);
        assert_eq!(err.to_string(), "Invalid depth 30: expected a value in [0, 29]");

        let err = HealpixError::invalid_cell(0, 12);
        assert!(err.to_string().contains("Invalid cell id 12 at depth 0"));

        let err = HealpixError::unknown_ellipsoid("mars");
        assert_eq!(err.to_string(), "Unknown ellipsoid: mars");

        let err = HealpixError::invalid_ring(-1, 4);
        assert_eq!(err.to_string(), "Invalid ring -1: expected a value in [0, 4]");
    }

    #[test]
    fn test_constructors_accept_owned_and_borrowed() {
        let owned = HealpixError::shape_mismatch(String::from("(3,) vs (4,)"));
        let borrowed = HealpixError::shape_mismatch("(3,) vs (4,)");
        assert_eq!(owned, borrowed);
    }
}
