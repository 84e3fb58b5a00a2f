//! Materialized storage for the canonical ordered orthant.

use crate::error::RegionError;
use strata_core::simplex::{is_ordered, ordered_max, ordered_min, simplex_count, simplex_offset};
use strata_core::{
    check_axis, debug_assert_partial_within, Coord, Lattice, LatticeError, OrderedTuples,
    PartialCoord, Region,
};
use tracing::debug;

const WHAT: &str = "asymmetric section";

/// Values on `c0 >= c1 >= ... >= c(n-1) >= 0` with `c0 <= max`.
///
/// This is the part of an isotropic lattice that is actually stored. The
/// cells are flattened in lexicographic order, so a section of `n` axes
/// and extent `m` holds exactly `C(m + n, n)` values.
///
/// ```
/// use strata_core::{Lattice, Region};
/// use strata_region::AsymmetricSection;
///
/// let s = AsymmetricSection::from_fn(2, 3, |c| c[0] * 10 + c[1]).unwrap();
/// assert_eq!(s.len(), 10);
/// assert_eq!(s.read(&[3, 1]).unwrap(), 31);
/// assert!(s.read(&[1, 3]).is_err());
/// ```
#[derive(Clone, Debug)]
pub struct AsymmetricSection<T> {
    ndim: usize,
    max: i32,
    cells: Option<Vec<T>>,
}

impl<T: Clone> AsymmetricSection<T> {
    /// A section with every cell set to `fill`.
    pub fn new(ndim: usize, max: i32, fill: T) -> Result<Self, RegionError> {
        Self::from_fn(ndim, max, |_| fill.clone())
    }
}

impl<T> AsymmetricSection<T> {
    /// A section whose cells are computed from their coordinates.
    pub fn from_fn<F>(ndim: usize, max: i32, mut f: F) -> Result<Self, RegionError>
    where
        F: FnMut(&[i32]) -> T,
    {
        if ndim == 0 {
            return Err(RegionError::NoAxes);
        }
        if max < 0 {
            return Err(RegionError::NegativeExtent { max });
        }
        let cells: Vec<T> = OrderedTuples::new(ndim, max).map(|c| f(&c)).collect();
        debug!(ndim, max, cells = cells.len(), "section materialized");
        Ok(Self {
            ndim,
            max,
            cells: Some(cells),
        })
    }

    /// Largest coordinate on axis 0.
    pub fn max(&self) -> i32 {
        self.max
    }

    /// Number of stored cells.
    pub fn len(&self) -> usize {
        simplex_count(self.max as u64 + 1, self.ndim) as usize
    }

    /// Always `false`: construction rejects negative extents.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Borrow the value at the canonical coordinate `coord`.
    pub fn get(&self, coord: &[i32]) -> Result<&T, LatticeError> {
        let idx = self.index(coord)?;
        let cells = self.cells.as_ref().ok_or(LatticeError::Released { what: WHAT })?;
        Ok(&cells[idx])
    }

    /// Overwrite the value at the canonical coordinate `coord`.
    pub fn set(&mut self, coord: &[i32], value: T) -> Result<(), LatticeError> {
        let idx = self.index(coord)?;
        let cells = self.cells.as_mut().ok_or(LatticeError::Released { what: WHAT })?;
        cells[idx] = value;
        Ok(())
    }

    /// Drop the stored cells. Every later read fails with
    /// [`LatticeError::Released`]. Idempotent.
    pub fn release(&mut self) {
        if self.cells.take().is_some() {
            debug!(ndim = self.ndim, max = self.max, "section released");
        }
    }

    /// `true` once [`release`](Self::release) has been called.
    pub fn is_released(&self) -> bool {
        self.cells.is_none()
    }

    /// Iterate `(coord, value)` in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &T)> + '_ {
        OrderedTuples::new(self.ndim, self.max).zip(self.cells.iter().flatten())
    }

    fn index(&self, coord: &[i32]) -> Result<usize, LatticeError> {
        if coord.len() != self.ndim || !is_ordered(coord) || coord[0] > self.max {
            return Err(LatticeError::OutOfBounds {
                coord: Coord::from_slice(coord),
                bounds: format!(
                    "{} descending non-negative axes with c0 <= {}",
                    self.ndim, self.max
                ),
            });
        }
        Ok(simplex_offset(coord))
    }
}

impl<T> Region for AsymmetricSection<T> {
    fn ndim(&self) -> usize {
        self.ndim
    }

    fn min_coord(&self, axis: usize) -> i32 {
        check_axis(axis, self.ndim);
        0
    }

    fn max_coord(&self, axis: usize) -> i32 {
        check_axis(axis, self.ndim);
        self.max
    }

    fn min_coord_at(&self, axis: usize, fixed: &PartialCoord) -> i32 {
        check_axis(axis, self.ndim);
        debug_assert_partial_within(self, axis, fixed);
        ordered_min(axis, fixed, 0)
    }

    fn max_coord_at(&self, axis: usize, fixed: &PartialCoord) -> i32 {
        check_axis(axis, self.ndim);
        debug_assert_partial_within(self, axis, fixed);
        ordered_max(axis, fixed, self.max)
    }
}

impl<T: Clone> Lattice for AsymmetricSection<T> {
    type Value = T;

    fn read(&self, coord: &[i32]) -> Result<T, LatticeError> {
        self.get(coord).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::RegionExt;

    #[test]
    fn rejects_degenerate_shapes() {
        assert!(matches!(
            AsymmetricSection::new(0, 3, 0u8),
            Err(RegionError::NoAxes)
        ));
        assert!(matches!(
            AsymmetricSection::new(2, -1, 0u8),
            Err(RegionError::NegativeExtent { max: -1 })
        ));
    }

    #[test]
    fn stored_cells_match_region_cells() {
        let s = AsymmetricSection::new(3, 4, 0u8).unwrap();
        assert_eq!(s.len(), 35);
        assert_eq!(s.cell_count(), 35);
        assert_eq!(s.iter().count(), 35);
    }

    #[test]
    fn set_then_read() {
        let mut s = AsymmetricSection::new(3, 2, 0i64).unwrap();
        s.set(&[2, 2, 1], 9).unwrap();
        assert_eq!(s.read(&[2, 2, 1]).unwrap(), 9);
        assert_eq!(s.read(&[2, 2, 0]).unwrap(), 0);
        assert!(matches!(
            s.set(&[1, 2, 0], 1),
            Err(LatticeError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn constrained_bounds_follow_ordering() {
        let s = AsymmetricSection::new(3, 5, ()).unwrap();
        let y2 = PartialCoord::free(3).with(1, 2);
        assert_eq!(s.min_coord_at(0, &y2), 2);
        assert_eq!(s.max_coord_at(0, &y2), 5);
        assert_eq!(s.min_coord_at(2, &y2), 0);
        assert_eq!(s.max_coord_at(2, &y2), 2);
    }

    #[test]
    fn release_poisons_every_read() {
        let mut s = AsymmetricSection::from_fn(2, 2, |c| c[0] + c[1]).unwrap();
        let cells: Vec<Coord> = s.positions().collect();
        s.release();
        s.release();
        assert!(s.is_released());
        for c in &cells {
            assert_eq!(
                s.read(c),
                Err(LatticeError::Released {
                    what: "asymmetric section"
                })
            );
        }
        assert_eq!(s.iter().count(), 0);
    }
}
