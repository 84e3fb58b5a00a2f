//! Error types shared by every lattice, storage block and view.
//!
//! Organised by the boundary that reports them: value reads
//! ([`LatticeError`]), generation steps ([`StepError`]) and persistence
//! requests forwarded to the backup collaborator ([`PersistError`]).

use crate::coord::Coord;
use std::error::Error;
use std::fmt;

/// Errors from reading a lattice value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LatticeError {
    /// The coordinate lies outside the current region.
    ///
    /// Only reported where detecting it is free; raw reads treat
    /// out-of-bounds access as a debug-checked precondition.
    OutOfBounds {
        /// The offending coordinate.
        coord: Coord,
        /// Human-readable description of the valid range.
        bounds: String,
    },
    /// The backing storage was explicitly released.
    Released {
        /// What was released (e.g. `"grid block"`).
        what: &'static str,
    },
    /// A view's defining relation no longer intersects its source.
    BoundaryLost {
        /// Description of the lost relation.
        reason: String,
    },
}

impl fmt::Display for LatticeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds { coord, bounds } => {
                write!(f, "coordinate {coord:?} out of bounds: {bounds}")
            }
            Self::Released { what } => write!(f, "the {what} is no longer available"),
            Self::BoundaryLost { reason } => write!(f, "view boundary lost: {reason}"),
        }
    }
}

impl Error for LatticeError {}

/// Errors from advancing a lattice by one generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepError {
    /// The transition collaborator failed to compute the next generation.
    Transition {
        /// Human-readable description of the failure.
        reason: String,
    },
    /// The source stepped, but the view on it no longer intersects it.
    ///
    /// The underlying mutation has already happened; the view must be
    /// rebuilt and its state must not be trusted.
    BoundaryLost {
        /// Storage path of the view that lost its boundary.
        view: String,
        /// Description of the lost relation.
        reason: String,
    },
    /// The backing storage was released before the step.
    Released {
        /// What was released.
        what: &'static str,
    },
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transition { reason } => write!(f, "transition failed: {reason}"),
            Self::BoundaryLost { view, reason } => {
                write!(f, "view '{view}' lost its boundary: {reason}")
            }
            Self::Released { what } => write!(f, "the {what} is no longer available"),
        }
    }
}

impl Error for StepError {}

/// Errors from a persistence request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PersistError {
    /// The root source has no backup collaborator.
    Unsupported {
        /// Identifier of the source.
        name: String,
    },
    /// The backup collaborator reported a failure.
    Failed {
        /// Human-readable description of the failure.
        reason: String,
    },
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported { name } => write!(f, "'{name}' cannot be persisted"),
            Self::Failed { reason } => write!(f, "persist failed: {reason}"),
        }
    }
}

impl Error for PersistError {}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn released_message_names_the_storage() {
        let err = LatticeError::Released { what: "grid block" };
        assert_eq!(err.to_string(), "the grid block is no longer available");
    }

    #[test]
    fn out_of_bounds_message_includes_coord() {
        let err = LatticeError::OutOfBounds {
            coord: smallvec![1, -2],
            bounds: "x in [0, 0]".into(),
        };
        assert!(err.to_string().contains("[1, -2]"));
    }

    #[test]
    fn boundary_lost_step_error_names_view() {
        let err = StepError::BoundaryLost {
            view: "root/y=3".into(),
            reason: "y=3 outside [0, 2]".into(),
        };
        assert!(err.to_string().starts_with("view 'root/y=3'"));
    }
}
