//! Views restricted to an optional `[lo, hi]` range per axis.

use crate::error::ViewError;
use crate::state::{inherited_loss, ViewState};
use smallvec::SmallVec;
use strata_core::{
    check_axis, Coord, Evolving, Generation, Lattice, LatticeError, PartialCoord, PersistError,
    Region, RegionExt, StepError,
};
use tracing::{debug, trace, warn};

type Request = SmallVec<[Option<i32>; 4]>;

/// Requested bounds clamped against the source.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Clamp {
    min: Coord,
    max: Coord,
}

/// A source restricted to a per-axis range.
///
/// Unset bounds follow the source. The request is kept as given and
/// re-clamped against the source after every step, so a subsection can
/// grow back after the source shrank and regrew.
///
/// ```
/// use strata_core::Region;
/// use strata_region::BoxRegion;
/// use strata_view::Subsection;
///
/// let source = BoxRegion::new(&[0, 0], &[9, 9]).unwrap();
/// let sub = Subsection::new(&source, &[Some(2), None], &[Some(20), Some(5)]).unwrap();
/// assert_eq!((sub.min_coord(0), sub.max_coord(0)), (2, 9));
/// assert_eq!((sub.min_coord(1), sub.max_coord(1)), (0, 5));
/// ```
#[derive(Clone, Debug)]
pub struct Subsection<S> {
    source: S,
    requested_min: Request,
    requested_max: Request,
    state: ViewState<Clamp>,
}

impl<S: Region> Subsection<S> {
    /// Validate the request and clamp it against the source.
    pub fn new(source: S, min: &[Option<i32>], max: &[Option<i32>]) -> Result<Self, ViewError> {
        let ndim = source.ndim();
        for got in [min.len(), max.len()] {
            if got != ndim {
                return Err(ViewError::ArityMismatch {
                    expected: ndim,
                    got,
                });
            }
        }
        if min.iter().chain(max).all(Option::is_none) {
            return Err(ViewError::EmptyRequest);
        }
        for axis in 0..ndim {
            if let (Some(lo), Some(hi)) = (min[axis], max[axis]) {
                if lo > hi {
                    return Err(ViewError::InvertedBounds {
                        axis,
                        min: lo,
                        max: hi,
                    });
                }
            }
        }
        let mut view = Self {
            source,
            requested_min: Request::from_slice(min),
            requested_max: Request::from_slice(max),
            state: ViewState::Lost(String::new()),
        };
        let clamp = view
            .clamp()
            .map_err(|(axis, reason)| ViewError::OutsideSource { axis, reason })?;
        debug!(bounds = %view.bounds_suffix(), "subsection bound");
        view.state = ViewState::Bound(clamp);
        Ok(view)
    }

    /// Requested lower bounds, as given at construction.
    pub fn requested_min(&self) -> &[Option<i32>] {
        &self.requested_min
    }

    /// Requested upper bounds, as given at construction.
    pub fn requested_max(&self) -> &[Option<i32>] {
        &self.requested_max
    }

    /// The underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Unwrap the source.
    pub fn into_source(self) -> S {
        self.source
    }

    /// `true` once a step moved the source entirely outside the request.
    pub fn is_lost(&self) -> bool {
        self.state.is_lost()
    }

    /// Intersect the original request with the source's current bounds.
    fn clamp(&self) -> Result<Clamp, (usize, String)> {
        let ndim = self.source.ndim();
        let mut min = Coord::with_capacity(ndim);
        let mut max = Coord::with_capacity(ndim);
        for axis in 0..ndim {
            let (src_lo, src_hi) = (self.source.min_coord(axis), self.source.max_coord(axis));
            let label = self.source.axis_label(axis);
            let lo = match self.requested_min[axis] {
                Some(lo) if lo > src_hi => {
                    return Err((axis, format!("{label} >= {lo} but source max is {src_hi}")))
                }
                Some(lo) => lo.max(src_lo),
                None => src_lo,
            };
            let hi = match self.requested_max[axis] {
                Some(hi) if hi < src_lo => {
                    return Err((axis, format!("{label} <= {hi} but source min is {src_lo}")))
                }
                Some(hi) => hi.min(src_hi),
                None => src_hi,
            };
            min.push(lo);
            max.push(hi);
        }
        Ok(Clamp { min, max })
    }

    /// Path segment describing the request, e.g. `x[1,3]_y(∞,5]`.
    ///
    /// Every requested axis after the first is prefixed with `_`, whether
    /// or not an earlier axis was requested, so `y` alone gives `_y[..]`.
    fn bounds_suffix(&self) -> String {
        let mut out = String::new();
        for axis in 0..self.source.ndim() {
            let (lo, hi) = (self.requested_min[axis], self.requested_max[axis]);
            if lo.is_none() && hi.is_none() {
                continue;
            }
            if axis > 0 {
                out.push('_');
            }
            let lo = lo.map_or_else(|| "(∞".to_string(), |v| format!("[{v}"));
            let hi = hi.map_or_else(|| "∞)".to_string(), |v| format!("{v}]"));
            out.push_str(&format!("{}{lo},{hi}", self.source.axis_label(axis)));
        }
        out
    }
}

impl<S: Region> Region for Subsection<S> {
    fn ndim(&self) -> usize {
        self.source.ndim()
    }

    fn min_coord(&self, axis: usize) -> i32 {
        check_axis(axis, self.ndim());
        self.state.bound().min[axis]
    }

    fn max_coord(&self, axis: usize) -> i32 {
        check_axis(axis, self.ndim());
        self.state.bound().max[axis]
    }

    fn min_coord_at(&self, axis: usize, fixed: &PartialCoord) -> i32 {
        check_axis(axis, self.ndim());
        let clamp = self.state.bound();
        clamp.min[axis].max(self.source.min_coord_at(axis, fixed))
    }

    fn max_coord_at(&self, axis: usize, fixed: &PartialCoord) -> i32 {
        check_axis(axis, self.ndim());
        let clamp = self.state.bound();
        clamp.max[axis].min(self.source.max_coord_at(axis, fixed))
    }

    fn axis_label(&self, axis: usize) -> String {
        self.source.axis_label(axis)
    }
}

impl<S: Lattice> Lattice for Subsection<S> {
    type Value = S::Value;

    fn read(&self, coord: &[i32]) -> Result<S::Value, LatticeError> {
        let clamp = self.state.readable()?;
        let inside = coord.len() == clamp.min.len()
            && coord
                .iter()
                .zip(clamp.min.iter().zip(&clamp.max))
                .all(|(c, (lo, hi))| lo <= c && c <= hi);
        if !inside {
            return Err(LatticeError::OutOfBounds {
                coord: Coord::from_slice(coord),
                bounds: self.describe_bounds(),
            });
        }
        self.source.read(coord)
    }
}

impl<S: Region + Evolving> Evolving for Subsection<S> {
    fn step(&mut self) -> Result<bool, StepError> {
        self.state.steppable(|| self.storage_path())?;
        let changed = match self.source.step() {
            Ok(changed) => changed,
            Err(e) => {
                if let Some(reason) = inherited_loss(&e) {
                    self.state = ViewState::Lost(reason);
                }
                return Err(e);
            }
        };
        match self.clamp() {
            Ok(clamp) => {
                trace!(min = ?clamp.min, max = ?clamp.max, "subsection refreshed");
                self.state = ViewState::Bound(clamp);
                Ok(changed)
            }
            Err((axis, reason)) => {
                let view = self.storage_path();
                warn!(%view, axis, %reason, "subsection lost its boundary");
                self.state = ViewState::Lost(reason.clone());
                Err(StepError::BoundaryLost { view, reason })
            }
        }
    }

    fn generation(&self) -> Generation {
        self.source.generation()
    }

    fn name(&self) -> String {
        self.source.name()
    }

    fn storage_path(&self) -> String {
        format!("{}/{}", self.source.storage_path(), self.bounds_suffix())
    }

    fn persist(&self, dir: &str, name: &str) -> Result<(), PersistError> {
        self.source.persist(dir, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Square(i32);

    impl Region for Square {
        fn ndim(&self) -> usize {
            2
        }
        fn min_coord(&self, _axis: usize) -> i32 {
            -self.0
        }
        fn max_coord(&self, _axis: usize) -> i32 {
            self.0
        }
    }

    #[test]
    fn validation_errors() {
        assert!(matches!(
            Subsection::new(Square(3), &[None], &[None, None]),
            Err(ViewError::ArityMismatch { expected: 2, got: 1 })
        ));
        assert!(matches!(
            Subsection::new(Square(3), &[None, None], &[None, None]),
            Err(ViewError::EmptyRequest)
        ));
        assert!(matches!(
            Subsection::new(Square(3), &[Some(2), None], &[Some(1), None]),
            Err(ViewError::InvertedBounds { axis: 0, min: 2, max: 1 })
        ));
        assert!(matches!(
            Subsection::new(Square(3), &[None, Some(4)], &[None, None]),
            Err(ViewError::OutsideSource { axis: 1, .. })
        ));
        assert!(matches!(
            Subsection::new(Square(3), &[None, None], &[Some(-4), None]),
            Err(ViewError::OutsideSource { axis: 0, .. })
        ));
    }

    #[test]
    fn clamps_to_source() {
        let s = Subsection::new(Square(3), &[Some(-10), Some(1)], &[Some(2), None]).unwrap();
        assert_eq!((s.min_coord(0), s.max_coord(0)), (-3, 2));
        assert_eq!((s.min_coord(1), s.max_coord(1)), (1, 3));
        assert_eq!(s.requested_min(), &[Some(-10), Some(1)]);
    }

    #[test]
    fn suffix_marks_open_ends() {
        let s = Subsection::new(Square(9), &[Some(1), None], &[Some(3), Some(5)]).unwrap();
        assert_eq!(s.bounds_suffix(), "x[1,3]_y(∞,5]");
        let s = Subsection::new(Square(9), &[None, Some(-2)], &[None, None]).unwrap();
        assert_eq!(s.bounds_suffix(), "_y[-2,∞)");
        let s = Subsection::new(Square(9), &[Some(0), None], &[None, None]).unwrap();
        assert_eq!(s.bounds_suffix(), "x[0,∞)");
    }

    struct Cube(i32);

    impl Region for Cube {
        fn ndim(&self) -> usize {
            3
        }
        fn min_coord(&self, _axis: usize) -> i32 {
            -self.0
        }
        fn max_coord(&self, _axis: usize) -> i32 {
            self.0
        }
    }

    #[test]
    fn suffix_skips_unrequested_middle_axis() {
        let s = Subsection::new(Cube(9), &[Some(1), None, None], &[None, None, Some(4)]).unwrap();
        assert_eq!(s.bounds_suffix(), "x[1,∞)_z(∞,4]");
        let s = Subsection::new(Cube(9), &[None, None, Some(-1)], &[None, None, Some(1)]).unwrap();
        assert_eq!(s.bounds_suffix(), "_z[-1,1]");
    }
}
