//! Error types for view construction and processing sessions.

use std::error::Error;
use std::fmt;
use strata_core::LatticeError;

/// Errors reported when binding a view or driving a processing session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewError {
    /// An axis index is not below the source's dimension.
    AxisOutOfRange {
        /// The offending axis.
        axis: usize,
        /// Dimension of the source.
        ndim: usize,
    },
    /// Both axes of a diagonal relation are the same axis.
    SameAxis {
        /// The repeated axis.
        axis: usize,
    },
    /// The source has too few axes for this kind of view.
    DimensionTooSmall {
        /// Dimension of the source.
        ndim: usize,
        /// Smallest dimension the view accepts.
        required: usize,
    },
    /// A fixed coordinate lies outside the source's bound on its axis.
    CoordinateOutOfBounds {
        /// The constrained axis.
        axis: usize,
        /// The requested coordinate.
        coord: i32,
        /// Source lower bound.
        min: i32,
        /// Source upper bound.
        max: i32,
    },
    /// A diagonal relation never meets the source.
    NoIntersection {
        /// The relation, e.g. `y=-x+2`.
        relation: String,
    },
    /// Per-axis bound requests do not match the source's dimension.
    ArityMismatch {
        /// Dimension of the source.
        expected: usize,
        /// Number of requested bounds.
        got: usize,
    },
    /// A subsection request leaves every bound unset.
    EmptyRequest,
    /// A requested lower bound exceeds the requested upper bound.
    InvertedBounds {
        /// The offending axis.
        axis: usize,
        /// Requested lower bound.
        min: i32,
        /// Requested upper bound.
        max: i32,
    },
    /// A requested range lies entirely outside the source.
    OutsideSource {
        /// The offending axis.
        axis: usize,
        /// Description of the request and source range.
        reason: String,
    },
    /// A request was issued while a processing session is open.
    SessionOpen,
    /// A session phase was invoked without an open session.
    SessionNotOpen,
    /// Reading a block during a session failed.
    Read(LatticeError),
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AxisOutOfRange { axis, ndim } => {
                write!(f, "axis {axis} out of range for a {ndim}-dimensional source")
            }
            Self::SameAxis { axis } => write!(f, "diagonal relation uses axis {axis} twice"),
            Self::DimensionTooSmall { ndim, required } => {
                write!(f, "source has {ndim} axes, view needs at least {required}")
            }
            Self::CoordinateOutOfBounds {
                axis,
                coord,
                min,
                max,
            } => write!(f, "coordinate {coord} on axis {axis} outside [{min}, {max}]"),
            Self::NoIntersection { relation } => {
                write!(f, "{relation} does not intersect the source")
            }
            Self::ArityMismatch { expected, got } => {
                write!(f, "expected bounds for {expected} axes, got {got}")
            }
            Self::EmptyRequest => write!(f, "every requested bound is unset"),
            Self::InvertedBounds { axis, min, max } => {
                write!(f, "axis {axis}: requested min {min} exceeds max {max}")
            }
            Self::OutsideSource { axis, reason } => {
                write!(f, "axis {axis} outside source: {reason}")
            }
            Self::SessionOpen => write!(f, "a processing session is already open"),
            Self::SessionNotOpen => write!(f, "no processing session is open"),
            Self::Read(e) => write!(f, "block read failed: {e}"),
        }
    }
}

impl Error for ViewError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LatticeError> for ViewError {
    fn from(e: LatticeError) -> Self {
        Self::Read(e)
    }
}
