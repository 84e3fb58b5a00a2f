//! The bound-query, value-read and evolution contracts.
//!
//! [`Region`] is the shared vocabulary of the workspace: every storage
//! type and every derived view describes its shape only through per-axis
//! min/max functions, optionally narrowed by already-fixed axes. This is
//! what lets irregular shapes (ordered orthants, diagonal slices) be
//! expressed without an explicit boundary representation.

use crate::coord::{axis_letter, Generation, PartialCoord};
use crate::error::{LatticeError, PersistError, StepError};

/// Shape of an N-axis lattice region, exposed through bound queries.
///
/// # Contract
///
/// - Fixing more axes never widens a bound:
///   `min_coord_at(a, more) >= min_coord_at(a, fewer)` and the mirror for max.
/// - The value the partial coordinate holds for the queried axis is ignored.
/// - Constrained queries must only be issued with fixed values inside the
///   fixed axes' own unconstrained bounds. This is checked in debug builds
///   (see [`debug_assert_partial_within`]) and undefined in release builds.
/// - An `axis >= ndim()` is a programming error and panics.
pub trait Region {
    /// Number of axes.
    fn ndim(&self) -> usize;

    /// Lower bound on `axis` over the whole region.
    fn min_coord(&self, axis: usize) -> i32;

    /// Upper bound on `axis` over the whole region.
    fn max_coord(&self, axis: usize) -> i32;

    /// Lower bound on `axis` given the fixed axes of `fixed`.
    ///
    /// Defaults to the unconstrained bound, which is exact for
    /// hyperrectangles.
    fn min_coord_at(&self, axis: usize, fixed: &PartialCoord) -> i32 {
        let _ = fixed;
        self.min_coord(axis)
    }

    /// Upper bound on `axis` given the fixed axes of `fixed`.
    fn max_coord_at(&self, axis: usize, fixed: &PartialCoord) -> i32 {
        let _ = fixed;
        self.max_coord(axis)
    }

    /// Cosmetic label of `axis`, used in storage paths.
    fn axis_label(&self, axis: usize) -> String {
        axis_letter(self.ndim(), axis).to_string()
    }
}

/// A region whose cells hold values.
pub trait Lattice: Region {
    /// Element type. Opaque to this crate beyond `Clone`.
    type Value: Clone;

    /// Read the value at `coord`.
    ///
    /// Reading outside the current bounds is a precondition violation:
    /// implementations report it where the check is free and may
    /// otherwise return any value. Reading released storage always fails
    /// with [`LatticeError::Released`].
    fn read(&self, coord: &[i32]) -> Result<Self::Value, LatticeError>;
}

/// A lattice that advances one generation at a time.
///
/// This is the boundary with the transition engine and the backup
/// collaborator. Views implement it by forwarding to their source and
/// re-validating their bounds afterwards.
pub trait Evolving {
    /// Advance exactly one generation.
    ///
    /// Returns `Ok(false)` when the state reached a fixed point.
    fn step(&mut self) -> Result<bool, StepError>;

    /// Number of steps taken since the initial state.
    fn generation(&self) -> Generation;

    /// Identifier of the root source.
    fn name(&self) -> String;

    /// Hierarchical storage path. Views append one segment to the
    /// source's path describing their defining relation.
    fn storage_path(&self) -> String;

    /// Ask the backup collaborator to persist the root source.
    fn persist(&self, dir: &str, name: &str) -> Result<(), PersistError>;
}

/// A region invariant under a symmetry group, with an asymmetric
/// sub-region from which every cell can be recovered.
///
/// The asymmetric queries follow the same contract as the [`Region`]
/// ones, evaluated over the sub-region instead of the whole region.
pub trait Symmetric: Region {
    /// Lower bound on `axis` over the asymmetric sub-region.
    fn asymmetric_min_coord(&self, axis: usize) -> i32;

    /// Upper bound on `axis` over the asymmetric sub-region.
    fn asymmetric_max_coord(&self, axis: usize) -> i32;

    /// Lower bound on `axis` within the asymmetric sub-region given the
    /// fixed axes of `fixed`.
    fn asymmetric_min_coord_at(&self, axis: usize, fixed: &PartialCoord) -> i32 {
        let _ = fixed;
        self.asymmetric_min_coord(axis)
    }

    /// Upper bound on `axis` within the asymmetric sub-region given the
    /// fixed axes of `fixed`.
    fn asymmetric_max_coord_at(&self, axis: usize, fixed: &PartialCoord) -> i32 {
        let _ = fixed;
        self.asymmetric_max_coord(axis)
    }
}

/// A readable, evolving lattice: what the transition engine exposes.
pub trait Model: Lattice + Evolving {}

impl<M: Lattice + Evolving + ?Sized> Model for M {}

/// Debug-only check of the constrained-query precondition.
///
/// Every fixed value in `fixed` (other than the one for `axis`) must lie
/// within the unconstrained bound of its own axis.
#[inline]
#[track_caller]
pub fn debug_assert_partial_within<R: Region + ?Sized>(
    region: &R,
    axis: usize,
    fixed: &PartialCoord,
) {
    debug_assert_eq!(
        fixed.ndim(),
        region.ndim(),
        "partial coordinate has {} axes, region has {}",
        fixed.ndim(),
        region.ndim()
    );
    if cfg!(debug_assertions) {
        for (a, v) in fixed.iter_fixed() {
            if a == axis {
                continue;
            }
            let (lo, hi) = (region.min_coord(a), region.max_coord(a));
            debug_assert!(
                lo <= v && v <= hi,
                "fixed value {v} on axis {a} outside [{lo}, {hi}] in bound query {fixed}"
            );
        }
    }
}

// Forwarding impls let views hold their source by value, by reference or
// boxed without separate code paths.
macro_rules! forward_region {
    ($r:ident, $($ty:ty),*) => {$(
        impl<$r: Region + ?Sized> Region for $ty {
            fn ndim(&self) -> usize {
                (**self).ndim()
            }
            fn min_coord(&self, axis: usize) -> i32 {
                (**self).min_coord(axis)
            }
            fn max_coord(&self, axis: usize) -> i32 {
                (**self).max_coord(axis)
            }
            fn min_coord_at(&self, axis: usize, fixed: &PartialCoord) -> i32 {
                (**self).min_coord_at(axis, fixed)
            }
            fn max_coord_at(&self, axis: usize, fixed: &PartialCoord) -> i32 {
                (**self).max_coord_at(axis, fixed)
            }
            fn axis_label(&self, axis: usize) -> String {
                (**self).axis_label(axis)
            }
        }

        impl<$r: Lattice + ?Sized> Lattice for $ty {
            type Value = $r::Value;
            fn read(&self, coord: &[i32]) -> Result<Self::Value, LatticeError> {
                (**self).read(coord)
            }
        }
    )*};
}

forward_region!(R, &R, &mut R, Box<R>);

macro_rules! forward_symmetric {
    ($r:ident, $($ty:ty),*) => {$(
        impl<$r: Symmetric + ?Sized> Symmetric for $ty {
            fn asymmetric_min_coord(&self, axis: usize) -> i32 {
                (**self).asymmetric_min_coord(axis)
            }
            fn asymmetric_max_coord(&self, axis: usize) -> i32 {
                (**self).asymmetric_max_coord(axis)
            }
            fn asymmetric_min_coord_at(&self, axis: usize, fixed: &PartialCoord) -> i32 {
                (**self).asymmetric_min_coord_at(axis, fixed)
            }
            fn asymmetric_max_coord_at(&self, axis: usize, fixed: &PartialCoord) -> i32 {
                (**self).asymmetric_max_coord_at(axis, fixed)
            }
        }
    )*};
}

forward_symmetric!(R, &R, &mut R, Box<R>);

macro_rules! forward_evolving {
    ($e:ident, $($ty:ty),*) => {$(
        impl<$e: Evolving + ?Sized> Evolving for $ty {
            fn step(&mut self) -> Result<bool, StepError> {
                (**self).step()
            }
            fn generation(&self) -> Generation {
                (**self).generation()
            }
            fn name(&self) -> String {
                (**self).name()
            }
            fn storage_path(&self) -> String {
                (**self).storage_path()
            }
            fn persist(&self, dir: &str, name: &str) -> Result<(), PersistError> {
                (**self).persist(dir, name)
            }
        }
    )*};
}

forward_evolving!(E, &mut E, Box<E>);
