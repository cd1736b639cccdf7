use std::fmt;
use std::str::FromStr;

use crate::error::HealpixError;

/// Label ordering of the cells of a layer.
///
/// Both orderings label the same geometric partition; they only differ in
/// which id a given cell receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Scheme {
    /// Quad-tree (Morton) order inside each base cell.
    #[default]
    Nested,
    /// Iso-latitude rings, counted from the north pole and increasing
    /// eastward inside each ring.
    Ring,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Nested => "nested",
            Scheme::Ring => "ring",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = HealpixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nested" | "nest" => Ok(Scheme::Nested),
            "ring" => Ok(Scheme::Ring),
            _ => Err(HealpixError::invalid_scheme(s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scheme() {
        assert_eq!("nested".parse::<Scheme>().unwrap(), Scheme::Nested);
        assert_eq!("NEST".parse::<Scheme>().unwrap(), Scheme::Nested);
        assert_eq!(" ring ".parse::<Scheme>().unwrap(), Scheme::Ring);
        assert!("zuniq".parse::<Scheme>().is_err());
    }

    #[test]
    fn test_display_round_trip() {
        for scheme in [Scheme::Nested, Scheme::Ring] {
            assert_eq!(scheme.to_string().parse::<Scheme>().unwrap(), scheme);
        }
    }
}
