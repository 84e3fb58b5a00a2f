//! The asymmetric sub-region of any symmetric source, as a region of its own.

use strata_core::{
    check_axis, Coord, Evolving, Generation, Lattice, LatticeError, PartialCoord, PersistError,
    Region, RegionExt, StepError, Symmetric,
};

/// Path segment appended to the source's storage path.
const SEGMENT: &str = "asymmetric_section";

/// A symmetric source restricted to its asymmetric sub-region.
///
/// Bounds come from the source's asymmetric queries and reads go straight
/// to the source, so nothing is copied. The view follows the source
/// across steps.
///
/// ```
/// use strata_core::{Lattice, Region, RegionExt};
/// use strata_region::{AsymmetricSection, AsymmetricView, IsotropicLattice};
///
/// let section = AsymmetricSection::from_fn(2, 3, |c| c[0] * 10 + c[1]).unwrap();
/// let view = AsymmetricView::new(IsotropicLattice::new(section));
/// assert_eq!(view.cell_count(), 10);
/// assert_eq!(view.read(&[3, 1]).unwrap(), 31);
/// assert!(view.read(&[1, 3]).is_err());
/// ```
#[derive(Clone, Debug)]
pub struct AsymmetricView<S> {
    source: S,
}

impl<S: Symmetric> AsymmetricView<S> {
    /// Wrap a symmetric source.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// The underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Unwrap the source.
    pub fn into_source(self) -> S {
        self.source
    }
}

impl<S: Symmetric> Region for AsymmetricView<S> {
    fn ndim(&self) -> usize {
        self.source.ndim()
    }

    fn min_coord(&self, axis: usize) -> i32 {
        check_axis(axis, self.ndim());
        self.source.asymmetric_min_coord(axis)
    }

    fn max_coord(&self, axis: usize) -> i32 {
        check_axis(axis, self.ndim());
        self.source.asymmetric_max_coord(axis)
    }

    fn min_coord_at(&self, axis: usize, fixed: &PartialCoord) -> i32 {
        check_axis(axis, self.ndim());
        self.source.asymmetric_min_coord_at(axis, fixed)
    }

    fn max_coord_at(&self, axis: usize, fixed: &PartialCoord) -> i32 {
        check_axis(axis, self.ndim());
        self.source.asymmetric_max_coord_at(axis, fixed)
    }

    fn axis_label(&self, axis: usize) -> String {
        self.source.axis_label(axis)
    }
}

impl<S: Symmetric + Lattice> Lattice for AsymmetricView<S> {
    type Value = S::Value;

    fn read(&self, coord: &[i32]) -> Result<S::Value, LatticeError> {
        if !self.contains(coord) {
            return Err(LatticeError::OutOfBounds {
                coord: Coord::from_slice(coord),
                bounds: self.describe_bounds(),
            });
        }
        self.source.read(coord)
    }
}

impl<S: Symmetric + Evolving> Evolving for AsymmetricView<S> {
    fn step(&mut self) -> Result<bool, StepError> {
        self.source.step()
    }

    fn generation(&self) -> Generation {
        self.source.generation()
    }

    fn name(&self) -> String {
        self.source.name()
    }

    fn storage_path(&self) -> String {
        format!("{}/{SEGMENT}", self.source.storage_path())
    }

    fn persist(&self, dir: &str, name: &str) -> Result<(), PersistError> {
        self.source.persist(dir, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `[-r, r]^2` symmetric under `x <-> -x` only; the asymmetric
    /// sub-region is the half-plane `x >= 0`.
    struct MirroredSquare(i32);

    impl Region for MirroredSquare {
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

    impl Symmetric for MirroredSquare {
        fn asymmetric_min_coord(&self, axis: usize) -> i32 {
            if axis == 0 {
                0
            } else {
                -self.0
            }
        }
        fn asymmetric_max_coord(&self, _axis: usize) -> i32 {
            self.0
        }
    }

    impl Lattice for MirroredSquare {
        type Value = i32;
        fn read(&self, coord: &[i32]) -> Result<i32, LatticeError> {
            Ok(coord[0].abs() * 100 + coord[1])
        }
    }

    #[test]
    fn bounds_delegate_to_asymmetric_queries() {
        let v = AsymmetricView::new(MirroredSquare(2));
        assert_eq!(v.bounding_box(), vec![(0, 2), (-2, 2)]);
        assert_eq!(v.cell_count(), 15);
    }

    #[test]
    fn reads_pass_through_inside_and_fail_outside() {
        let v = AsymmetricView::new(MirroredSquare(2));
        assert_eq!(v.read(&[2, -1]).unwrap(), 199);
        assert!(matches!(
            v.read(&[-1, 0]),
            Err(LatticeError::OutOfBounds { .. })
        ));
        assert!(matches!(
            v.read(&[0]),
            Err(LatticeError::OutOfBounds { .. })
        ));
    }
}
