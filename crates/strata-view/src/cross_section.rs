//! Views that fix one axis to a constant.

use crate::error::ViewError;
use crate::state::{inherited_loss, ViewState};
use strata_core::{
    check_axis, Coord, Evolving, Generation, Lattice, LatticeError, PartialCoord, PersistError,
    Region, StepError,
};
use tracing::{debug, trace, warn};

/// The `ndim - 1` dimensional slice of a source at `axis = coord`.
///
/// Bounds are not cached: every query is forwarded to the source's
/// constrained bound functions with the fixed axis filled in. Axis `i` of
/// the view is source axis `i` below `axis` and `i + 1` from there on.
///
/// ```
/// use strata_core::{Region, RegionExt};
/// use strata_region::AsymmetricSection;
/// use strata_view::CrossSection;
///
/// let source = AsymmetricSection::new(3, 4, 0u8).unwrap();
/// let view = CrossSection::new(&source, 1, 2).unwrap();
/// assert_eq!(view.ndim(), 2);
/// assert_eq!(view.min_coord(0), 2); // x >= y
/// assert_eq!(view.max_coord(1), 2); // z <= y
/// assert_eq!(view.cell_count(), 3 * 3);
/// ```
#[derive(Clone, Debug)]
pub struct CrossSection<S> {
    source: S,
    axis: usize,
    coord: i32,
    fixed: PartialCoord,
    state: ViewState<()>,
}

impl<S: Region> CrossSection<S> {
    /// Bind the view: `coord` must lie within the source's bound on `axis`.
    pub fn new(source: S, axis: usize, coord: i32) -> Result<Self, ViewError> {
        let ndim = source.ndim();
        if axis >= ndim {
            return Err(ViewError::AxisOutOfRange { axis, ndim });
        }
        let (min, max) = (source.min_coord(axis), source.max_coord(axis));
        if coord < min || coord > max {
            return Err(ViewError::CoordinateOutOfBounds {
                axis,
                coord,
                min,
                max,
            });
        }
        debug!(axis, coord, "cross-section bound");
        Ok(Self {
            fixed: PartialCoord::free(ndim).with(axis, coord),
            source,
            axis,
            coord,
            state: ViewState::Bound(()),
        })
    }

    /// The fixed source axis.
    pub fn axis(&self) -> usize {
        self.axis
    }

    /// The fixed coordinate.
    pub fn coordinate(&self) -> i32 {
        self.coord
    }

    /// The underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Unwrap the source.
    pub fn into_source(self) -> S {
        self.source
    }

    /// `true` once a step moved the source away from the fixed coordinate.
    pub fn is_lost(&self) -> bool {
        self.state.is_lost()
    }

    fn source_axis(&self, axis: usize) -> usize {
        check_axis(axis, self.ndim());
        if axis < self.axis {
            axis
        } else {
            axis + 1
        }
    }

    fn lift(&self, partial: &PartialCoord) -> PartialCoord {
        let mut lifted = self.fixed.clone();
        for (axis, v) in partial.iter_fixed() {
            lifted.fix(self.source_axis(axis), v);
        }
        lifted
    }

    fn lift_coord(&self, coord: &[i32]) -> Coord {
        let mut lifted = Coord::with_capacity(coord.len() + 1);
        lifted.extend_from_slice(&coord[..self.axis]);
        lifted.push(self.coord);
        lifted.extend_from_slice(&coord[self.axis..]);
        lifted
    }

    fn rebind(&self) -> Result<(), String> {
        let (min, max) = (
            self.source.min_coord(self.axis),
            self.source.max_coord(self.axis),
        );
        if self.coord < min || self.coord > max {
            return Err(format!(
                "{}={} outside [{min}, {max}]",
                self.source.axis_label(self.axis),
                self.coord
            ));
        }
        Ok(())
    }
}

impl<S: Region> Region for CrossSection<S> {
    fn ndim(&self) -> usize {
        self.source.ndim() - 1
    }

    fn min_coord(&self, axis: usize) -> i32 {
        self.state.bound();
        self.source.min_coord_at(self.source_axis(axis), &self.fixed)
    }

    fn max_coord(&self, axis: usize) -> i32 {
        self.state.bound();
        self.source.max_coord_at(self.source_axis(axis), &self.fixed)
    }

    fn min_coord_at(&self, axis: usize, fixed: &PartialCoord) -> i32 {
        self.state.bound();
        self.source
            .min_coord_at(self.source_axis(axis), &self.lift(fixed))
    }

    fn max_coord_at(&self, axis: usize, fixed: &PartialCoord) -> i32 {
        self.state.bound();
        self.source
            .max_coord_at(self.source_axis(axis), &self.lift(fixed))
    }

    fn axis_label(&self, axis: usize) -> String {
        self.source.axis_label(self.source_axis(axis))
    }
}

impl<S: Lattice> Lattice for CrossSection<S> {
    type Value = S::Value;

    fn read(&self, coord: &[i32]) -> Result<S::Value, LatticeError> {
        self.state.readable()?;
        if coord.len() != self.ndim() {
            return Err(LatticeError::OutOfBounds {
                coord: Coord::from_slice(coord),
                bounds: format!("{} axes", self.ndim()),
            });
        }
        self.source.read(&self.lift_coord(coord))
    }
}

impl<S: Region + Evolving> Evolving for CrossSection<S> {
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
        match self.rebind() {
            Ok(()) => {
                trace!(axis = self.axis, coord = self.coord, "cross-section refreshed");
                Ok(changed)
            }
            Err(reason) => {
                let view = self.storage_path();
                warn!(%view, %reason, "cross-section lost its boundary");
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
        format!(
            "{}/{}={}",
            self.source.storage_path(),
            self.source.axis_label(self.axis),
            self.coord
        )
    }

    fn persist(&self, dir: &str, name: &str) -> Result<(), PersistError> {
        self.source.persist(dir, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::RegionExt;

    /// `[0, 3] x [-1, 1] x [5, 6]` with value `100x + 10y + z`.
    struct Cuboid;

    impl Region for Cuboid {
        fn ndim(&self) -> usize {
            3
        }
        fn min_coord(&self, axis: usize) -> i32 {
            [0, -1, 5][axis]
        }
        fn max_coord(&self, axis: usize) -> i32 {
            [3, 1, 6][axis]
        }
    }

    impl Lattice for Cuboid {
        type Value = i32;
        fn read(&self, c: &[i32]) -> Result<i32, LatticeError> {
            Ok(100 * c[0] + 10 * c[1] + c[2])
        }
    }

    #[test]
    fn bind_rejects_out_of_range() {
        assert!(matches!(
            CrossSection::new(Cuboid, 2, 7),
            Err(ViewError::CoordinateOutOfBounds { axis: 2, coord: 7, min: 5, max: 6 })
        ));
        assert!(matches!(
            CrossSection::new(Cuboid, 3, 0),
            Err(ViewError::AxisOutOfRange { axis: 3, ndim: 3 })
        ));
    }

    #[test]
    fn axes_are_relabelled() {
        let v = CrossSection::new(Cuboid, 1, 0).unwrap();
        assert_eq!(v.ndim(), 2);
        assert_eq!(v.axis_label(0), "x");
        assert_eq!(v.axis_label(1), "z");
        assert_eq!((v.min_coord(1), v.max_coord(1)), (5, 6));
    }

    #[test]
    fn reads_insert_fixed_coordinate() {
        let v = CrossSection::new(Cuboid, 1, -1).unwrap();
        assert_eq!(v.read(&[2, 6]).unwrap(), 200 - 10 + 6);
        assert_eq!(v.cell_count(), 8);
    }

    #[test]
    fn nested_cross_sections_compose() {
        let plane = CrossSection::new(Cuboid, 0, 3).unwrap();
        let line = CrossSection::new(&plane, 1, 5).unwrap();
        assert_eq!(line.ndim(), 1);
        assert_eq!(line.axis_label(0), "y");
        assert_eq!(line.read(&[1]).unwrap(), 315);
    }
}
