//! Slices over positions and labels.
//!
//! [`Slice`] carries optional bounds the way a user writes them;
//! [`Slice::indices`] resolves it against a sequence length into a
//! [`ConcreteSlice`] using the usual clamping rules (negative bounds count
//! from the end, out-of-range bounds are clipped).

use std::fmt;

use crate::error::{MocError, MocResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Slice {
    pub start: Option<i64>,
    pub stop: Option<i64>,
    pub step: Option<i64>,
}

impl Slice {
    pub fn new(start: Option<i64>, stop: Option<i64>, step: Option<i64>) -> Self {
        Self { start, stop, step }
    }

    /// Every element.
    pub fn full() -> Self {
        Self::default()
    }

    /// `start..stop` with a unit step.
    pub fn range(start: i64, stop: i64) -> Self {
        Self::new(Some(start), Some(stop), None)
    }

    /// Resolves the bounds against a sequence of `size` elements.
    pub fn indices(&self, size: u64) -> MocResult<ConcreteSlice> {
        let size = i64::try_from(size)
            .map_err(|_| MocError::invalid_slice(format!("length {} is too large", size)))?;
        let step = self.step.unwrap_or(1);
        if step == 0 {
            return Err(MocError::invalid_slice("slice step cannot be zero"));
        }
        let (lower, upper) = if step > 0 { (0, size) } else { (-1, size - 1) };
        let clamp = |bound: i64| {
            if bound < 0 {
                (bound + size).max(lower)
            } else {
                bound.min(upper)
            }
        };
        let start = self
            .start
            .map_or(if step > 0 { lower } else { upper }, clamp);
        let stop = self.stop.map_or(if step > 0 { upper } else { lower }, clamp);
        Ok(ConcreteSlice { start, stop, step })
    }
}

impl fmt::Display for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |v: Option<i64>| v.map_or_else(|| "None".to_string(), |v| v.to_string());
        write!(
            f,
            "Slice({}, {}, {})",
            show(self.start),
            show(self.stop),
            show(self.step)
        )
    }
}

/// A slice with every bound resolved. `stop` is exclusive and may be `-1`
/// for a descending slice running to the first element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConcreteSlice {
    pub start: i64,
    pub stop: i64,
    pub step: i64,
}

impl ConcreteSlice {
    pub fn len(&self) -> u64 {
        if self.step > 0 && self.stop > self.start {
            ((self.stop - self.start - 1) / self.step + 1) as u64
        } else if self.step < 0 && self.start > self.stop {
            ((self.start - self.stop - 1) / -self.step + 1) as u64
        } else {
            0
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn indices(&self) -> (i64, i64, i64) {
        (self.start, self.stop, self.step)
    }

    /// The selected positions, in slice order.
    pub fn positions(&self) -> impl Iterator<Item = i64> + '_ {
        (0..self.len() as i64).map(move |i| self.start + i * self.step)
    }
}

impl fmt::Display for ConcreteSlice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConcreteSlice({}, {}, {})", self.start, self.stop, self.step)
    }
}
