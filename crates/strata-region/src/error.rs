//! Error types for region construction.

use std::fmt;

/// Errors arising from region or section construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionError {
    /// A region needs at least one axis.
    NoAxes,
    /// Per-axis inputs disagree on the number of axes.
    ArityMismatch {
        /// Axes implied by the first input.
        expected: usize,
        /// Axes in the offending input.
        got: usize,
    },
    /// An axis has its lower bound above its upper bound.
    InvertedBounds {
        /// The offending axis.
        axis: usize,
        /// Requested lower bound.
        min: i32,
        /// Requested upper bound.
        max: i32,
    },
    /// A symmetric section needs a non-negative extent.
    NegativeExtent {
        /// The requested maximum coordinate.
        max: i32,
    },
    /// A coordinate entry is `i32::MIN`, whose absolute value overflows.
    AbsOverflow {
        /// The offending axis.
        axis: usize,
    },
}

impl fmt::Display for RegionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoAxes => write!(f, "region must have at least one axis"),
            Self::ArityMismatch { expected, got } => {
                write!(f, "expected {expected} axes, got {got}")
            }
            Self::InvertedBounds { axis, min, max } => {
                write!(f, "axis {axis}: min {min} exceeds max {max}")
            }
            Self::NegativeExtent { max } => {
                write!(f, "section extent {max} is negative")
            }
            Self::AbsOverflow { axis } => {
                write!(f, "axis {axis}: absolute value of {} overflows", i32::MIN)
            }
        }
    }
}

impl std::error::Error for RegionError {}
