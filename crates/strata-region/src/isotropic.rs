//! Read-only view of a fully symmetric lattice.

use crate::canonical::canonicalize;
use strata_core::simplex::{ordered_max, ordered_min};
use strata_core::{
    check_axis, debug_assert_partial_within, Coord, Evolving, Generation, Lattice, LatticeError,
    PartialCoord, PersistError, Region, RegionExt, StepError, Symmetric,
};

/// A lattice symmetric under every axis permutation and sign flip, backed
/// by its canonical ordered orthant.
///
/// The source is typically an [`AsymmetricSection`](crate::AsymmetricSection)
/// or an evolving model over one. Bounds are `[-m, m]` on every axis, where
/// `m` is the source's maximum on axis 0; every read is answered from the
/// canonical representative of the requested coordinate.
///
/// ```
/// use strata_core::Lattice;
/// use strata_region::{AsymmetricSection, IsotropicLattice};
///
/// let section = AsymmetricSection::from_fn(3, 2, |c| c[0] * 100 + c[1] * 10 + c[2]).unwrap();
/// let lattice = IsotropicLattice::new(section);
/// assert_eq!(lattice.read(&[-2, 1, 0]).unwrap(), 210);
/// assert_eq!(lattice.read(&[0, 2, -1]).unwrap(), 210);
/// ```
#[derive(Clone, Debug)]
pub struct IsotropicLattice<S> {
    source: S,
}

impl<S: Region> IsotropicLattice<S> {
    /// Wrap a canonical-orthant source.
    pub fn new(source: S) -> Self {
        debug_assert!(
            (0..source.ndim()).all(|a| source.min_coord(a) == 0),
            "isotropic source must be an ordered orthant starting at 0"
        );
        Self { source }
    }

    /// The canonical-orthant source.
    pub fn asymmetric_section(&self) -> &S {
        &self.source
    }

    /// Mutable access to the source.
    pub fn asymmetric_section_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Unwrap the source.
    pub fn into_inner(self) -> S {
        self.source
    }

    fn extent(&self) -> i32 {
        self.source.max_coord(0)
    }
}

impl<S: Region> Region for IsotropicLattice<S> {
    fn ndim(&self) -> usize {
        self.source.ndim()
    }

    fn min_coord(&self, axis: usize) -> i32 {
        check_axis(axis, self.ndim());
        -self.extent()
    }

    fn max_coord(&self, axis: usize) -> i32 {
        check_axis(axis, self.ndim());
        self.extent()
    }

    fn axis_label(&self, axis: usize) -> String {
        self.source.axis_label(axis)
    }
}

/// The asymmetric sub-region is the canonical orthant
/// `m >= c0 >= c1 >= ... >= 0`.
impl<S: Region> Symmetric for IsotropicLattice<S> {
    fn asymmetric_min_coord(&self, axis: usize) -> i32 {
        check_axis(axis, self.ndim());
        0
    }

    fn asymmetric_max_coord(&self, axis: usize) -> i32 {
        check_axis(axis, self.ndim());
        self.extent()
    }

    fn asymmetric_min_coord_at(&self, axis: usize, fixed: &PartialCoord) -> i32 {
        check_axis(axis, self.ndim());
        debug_assert_partial_within(self, axis, fixed);
        ordered_min(axis, fixed, 0)
    }

    fn asymmetric_max_coord_at(&self, axis: usize, fixed: &PartialCoord) -> i32 {
        check_axis(axis, self.ndim());
        debug_assert_partial_within(self, axis, fixed);
        ordered_max(axis, fixed, self.extent())
    }
}

impl<S: Lattice> Lattice for IsotropicLattice<S> {
    type Value = S::Value;

    fn read(&self, coord: &[i32]) -> Result<S::Value, LatticeError> {
        let m = self.extent().unsigned_abs();
        let out_of_bounds = || LatticeError::OutOfBounds {
            coord: Coord::from_slice(coord),
            bounds: self.describe_bounds(),
        };
        if coord.len() != self.ndim() || coord.iter().any(|c| c.unsigned_abs() > m) {
            return Err(out_of_bounds());
        }
        let canonical = canonicalize(coord).map_err(|_| out_of_bounds())?;
        self.source.read(&canonical)
    }
}

impl<S: Evolving> Evolving for IsotropicLattice<S> {
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
        self.source.storage_path()
    }

    fn persist(&self, dir: &str, name: &str) -> Result<(), PersistError> {
        self.source.persist(dir, name)
    }
}
