//! Arena-specific error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur during block planning or block operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// The budget cannot hold the minimum block length starting at `min`.
    CapacityExceeded {
        /// Requested first slice coordinate.
        min: i32,
        /// Caller budget in bytes.
        budget: u64,
        /// Bytes needed for the minimum length plus one slice of headroom.
        required: u64,
    },
    /// A configuration field is out of range.
    InvalidConfig {
        /// What went wrong.
        reason: String,
    },
    /// Blocks store slices of `ndim - 1` axes and need at least two axes.
    DimensionTooSmall {
        /// The rejected dimension.
        ndim: usize,
    },
    /// A slice coordinate lies outside the block (or is negative).
    SliceOutOfRange {
        /// The offending slice coordinate.
        coord: i32,
        /// First valid coordinate.
        min: i32,
        /// Last valid coordinate.
        max: i32,
    },
    /// A replacement slice has the wrong number of axes.
    SliceShape {
        /// Axes per slice in this block.
        expected: usize,
        /// Axes in the replacement.
        got: usize,
    },
    /// The block was explicitly released.
    Released,
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityExceeded {
                min,
                budget,
                required,
            } => {
                write!(
                    f,
                    "budget of {budget} bytes cannot hold a block at {min}: need {required} bytes"
                )
            }
            Self::InvalidConfig { reason } => write!(f, "invalid block config: {reason}"),
            Self::DimensionTooSmall { ndim } => {
                write!(f, "blocks need at least 2 axes, got {ndim}")
            }
            Self::SliceOutOfRange { coord, min, max } => {
                write!(f, "slice {coord} outside [{min}, {max}]")
            }
            Self::SliceShape { expected, got } => {
                write!(f, "slice has {got} axes, block stores {expected}")
            }
            Self::Released => write!(f, "the grid block is no longer available"),
        }
    }
}

impl Error for ArenaError {}
