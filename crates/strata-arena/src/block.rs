//! Budgeted runs of slices along axis 0.

use crate::config::BlockConfig;
use crate::error::ArenaError;
use crate::planner::{BlockPlan, BlockPlanner};
use crate::slice::Slice;
use std::ops::RangeInclusive;
use strata_core::simplex::{ordered_max, ordered_min};
use strata_core::{
    check_axis, debug_assert_partial_within, Coord, Lattice, LatticeError, PartialCoord, Region,
    RegionExt,
};
use tracing::{debug, trace};

const WHAT: &str = "grid block";

/// Storage for the ordered orthant restricted to `[min, max]` on axis 0.
///
/// The extent is chosen by [`BlockPlanner`] so that the block plus one
/// slice of headroom fits the caller's byte budget. Slices are replaced in
/// place as the lattice evolves; [`release`](Self::release) drops the
/// storage and poisons every later read.
///
/// ```
/// use strata_arena::{Block, BlockConfig};
/// use strata_core::{Lattice, Region};
///
/// let block = Block::allocate(2, 0, 4096, &BlockConfig::default(), 0u64).unwrap();
/// assert_eq!(block.min_coord(0), 0);
/// assert!(block.max_coord(0) >= 1);
/// assert_eq!(block.read(&[1, 1]).unwrap(), 0);
/// ```
#[derive(Clone, Debug)]
pub struct Block<T> {
    plan: BlockPlan,
    slices: Option<Vec<Slice<T>>>,
}

impl<T: Clone> Block<T> {
    /// Plan and allocate a block starting at `min` within `budget` bytes.
    pub fn allocate(
        ndim: usize,
        min: i32,
        budget: u64,
        config: &BlockConfig,
        fill: T,
    ) -> Result<Self, ArenaError> {
        let plan = BlockPlanner::new(ndim, config.clone())?.plan(min, budget)?;
        Self::from_plan(plan, fill)
    }

    /// Allocate the block described by `plan` with every cell set to `fill`.
    pub fn from_plan(plan: BlockPlan, fill: T) -> Result<Self, ArenaError> {
        check_plan(&plan)?;
        let slices = (plan.min..=plan.max)
            .map(|a| Slice::filled(a, plan.ndim - 1, fill.clone()))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(
            min = plan.min,
            max = plan.max,
            planned_bytes = plan.planned_bytes,
            "block allocated"
        );
        Ok(Self {
            plan,
            slices: Some(slices),
        })
    }
}

impl<T> Block<T> {
    /// Allocate the block described by `plan`, computing each cell from its
    /// full coordinate.
    pub fn from_plan_with<F>(plan: BlockPlan, mut f: F) -> Result<Self, ArenaError>
    where
        F: FnMut(&[i32]) -> T,
    {
        check_plan(&plan)?;
        let mut full = Coord::new();
        let slices = (plan.min..=plan.max)
            .map(|a| {
                Slice::from_fn(a, plan.ndim - 1, |tail| {
                    full.clear();
                    full.push(a);
                    full.extend_from_slice(tail);
                    f(&full)
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        debug!(min = plan.min, max = plan.max, "block allocated");
        Ok(Self {
            plan,
            slices: Some(slices),
        })
    }

    /// The plan this block was allocated from.
    pub fn plan(&self) -> &BlockPlan {
        &self.plan
    }

    /// Rounded planned cost in bytes, excluding headroom.
    pub fn planned_bytes(&self) -> u64 {
        self.plan.planned_bytes
    }

    /// Slice coordinates held by this block.
    pub fn slice_range(&self) -> RangeInclusive<i32> {
        self.plan.min..=self.plan.max
    }

    /// The slice at axis-0 coordinate `a`.
    pub fn slice(&self, a: i32) -> Result<&Slice<T>, ArenaError> {
        let idx = self.slice_index(a)?;
        let slices = self.slices.as_ref().ok_or(ArenaError::Released)?;
        Ok(&slices[idx])
    }

    /// Mutable slice at axis-0 coordinate `a`.
    pub fn slice_mut(&mut self, a: i32) -> Result<&mut Slice<T>, ArenaError> {
        let idx = self.slice_index(a)?;
        let slices = self.slices.as_mut().ok_or(ArenaError::Released)?;
        Ok(&mut slices[idx])
    }

    /// Replace the slice at `slice.coord()`, returning the previous one.
    pub fn set_slice(&mut self, slice: Slice<T>) -> Result<Slice<T>, ArenaError> {
        let expected = self.plan.ndim - 1;
        if slice.depth() != expected {
            return Err(ArenaError::SliceShape {
                expected,
                got: slice.depth(),
            });
        }
        let a = slice.coord();
        let old = std::mem::replace(self.slice_mut(a)?, slice);
        trace!(slice = a, "slice replaced");
        Ok(old)
    }

    /// Overwrite one cell.
    pub fn set(&mut self, coord: &[i32], value: T) -> Result<(), LatticeError> {
        let (a, tail) = self.split(coord)?;
        match self.slice_mut(a) {
            Ok(slice) => {
                if let Some(cell) = slice.get_mut(tail) {
                    *cell = value;
                    return Ok(());
                }
            }
            Err(ArenaError::Released) => return Err(LatticeError::Released { what: WHAT }),
            Err(_) => {}
        }
        Err(out_of_bounds(coord, self.describe_bounds()))
    }

    /// Borrow one cell.
    pub fn get(&self, coord: &[i32]) -> Result<&T, LatticeError> {
        let (a, tail) = self.split(coord)?;
        let slice = self
            .slice(a)
            .map_err(|e| lattice_error(e, coord, &self.describe_bounds()))?;
        slice
            .get(tail)
            .ok_or_else(|| out_of_bounds(coord, self.describe_bounds()))
    }

    /// Drop the slices. Every later read fails with
    /// [`LatticeError::Released`]. Idempotent.
    pub fn release(&mut self) {
        if self.slices.take().is_some() {
            debug!(min = self.plan.min, max = self.plan.max, "block released");
        }
    }

    /// `true` once [`release`](Self::release) has been called.
    pub fn is_released(&self) -> bool {
        self.slices.is_none()
    }

    fn slice_index(&self, a: i32) -> Result<usize, ArenaError> {
        if !self.slice_range().contains(&a) {
            return Err(ArenaError::SliceOutOfRange {
                coord: a,
                min: self.plan.min,
                max: self.plan.max,
            });
        }
        Ok((a - self.plan.min) as usize)
    }

    fn split<'c>(&self, coord: &'c [i32]) -> Result<(i32, &'c [i32]), LatticeError> {
        match coord.split_first() {
            Some((&a, tail)) if coord.len() == self.plan.ndim => Ok((a, tail)),
            _ => Err(out_of_bounds(coord, self.describe_bounds())),
        }
    }
}

/// Plans are plain data, so a hand-built one may describe no slice depth.
fn check_plan(plan: &BlockPlan) -> Result<(), ArenaError> {
    if plan.ndim < 2 {
        return Err(ArenaError::DimensionTooSmall { ndim: plan.ndim });
    }
    Ok(())
}

fn out_of_bounds(coord: &[i32], bounds: String) -> LatticeError {
    LatticeError::OutOfBounds {
        coord: Coord::from_slice(coord),
        bounds,
    }
}

fn lattice_error(err: ArenaError, coord: &[i32], bounds: &str) -> LatticeError {
    match err {
        ArenaError::Released => LatticeError::Released { what: WHAT },
        _ => out_of_bounds(coord, bounds.to_string()),
    }
}

impl<T> Region for Block<T> {
    fn ndim(&self) -> usize {
        self.plan.ndim
    }

    fn min_coord(&self, axis: usize) -> i32 {
        check_axis(axis, self.plan.ndim);
        if axis == 0 {
            self.plan.min
        } else {
            0
        }
    }

    fn max_coord(&self, axis: usize) -> i32 {
        check_axis(axis, self.plan.ndim);
        self.plan.max
    }

    fn min_coord_at(&self, axis: usize, fixed: &PartialCoord) -> i32 {
        check_axis(axis, self.plan.ndim);
        debug_assert_partial_within(self, axis, fixed);
        ordered_min(axis, fixed, self.plan.min)
    }

    fn max_coord_at(&self, axis: usize, fixed: &PartialCoord) -> i32 {
        check_axis(axis, self.plan.ndim);
        debug_assert_partial_within(self, axis, fixed);
        ordered_max(axis, fixed, self.plan.max)
    }
}

impl<T: Clone> Lattice for Block<T> {
    type Value = T;

    fn read(&self, coord: &[i32]) -> Result<T, LatticeError> {
        if self.is_released() {
            return Err(LatticeError::Released { what: WHAT });
        }
        self.get(coord).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CostModel;

    fn plan(ndim: usize, min: i32, max: i32) -> BlockPlan {
        BlockPlan {
            ndim,
            min,
            max,
            planned_bytes: 0,
        }
    }

    #[test]
    fn region_is_clipped_orthant() {
        let b = Block::from_plan(plan(3, 2, 4), 0u8).unwrap();
        assert_eq!(b.min_coord(0), 2);
        assert_eq!(b.max_coord(2), 4);
        let x3 = PartialCoord::free(3).with(0, 3);
        assert_eq!(b.max_coord_at(1, &x3), 3);
        let y3 = PartialCoord::free(3).with(1, 3);
        assert_eq!(b.min_coord_at(0, &y3), 3);
        let y1 = PartialCoord::free(3).with(1, 1);
        assert_eq!(b.min_coord_at(0, &y1), 2);
    }

    #[test]
    fn read_after_set() {
        let mut b = Block::from_plan(plan(3, 0, 3), 0i32).unwrap();
        b.set(&[3, 2, 2], 7).unwrap();
        assert_eq!(b.read(&[3, 2, 2]).unwrap(), 7);
        assert!(matches!(
            b.read(&[4, 0, 0]),
            Err(LatticeError::OutOfBounds { .. })
        ));
        assert!(matches!(
            b.read(&[2, 3, 0]),
            Err(LatticeError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn set_slice_returns_previous() {
        let mut b = Block::from_plan(plan(2, 1, 3), 0u8).unwrap();
        let fresh = Slice::filled(2, 1, 9u8).unwrap();
        let old = b.set_slice(fresh).unwrap();
        assert_eq!(old.coord(), 2);
        assert_eq!(old.get(&[1]), Some(&0));
        assert_eq!(b.read(&[2, 1]).unwrap(), 9);
    }

    #[test]
    fn set_slice_validates_coordinate_and_shape() {
        let mut b = Block::from_plan(plan(2, 1, 3), 0u8).unwrap();
        assert!(matches!(
            b.set_slice(Slice::filled(4, 1, 0).unwrap()),
            Err(ArenaError::SliceOutOfRange { coord: 4, min: 1, max: 3 })
        ));
        assert!(matches!(
            b.set_slice(Slice::filled(2, 2, 0).unwrap()),
            Err(ArenaError::SliceShape { expected: 1, got: 2 })
        ));
    }

    #[test]
    fn hand_built_plans_need_two_axes() {
        for ndim in [0, 1] {
            assert_eq!(
                Block::from_plan(plan(ndim, 0, 3), 0u8).err(),
                Some(ArenaError::DimensionTooSmall { ndim })
            );
            assert_eq!(
                Block::from_plan_with(plan(ndim, 0, 3), |_| 0u8).err(),
                Some(ArenaError::DimensionTooSmall { ndim })
            );
        }
    }

    #[test]
    fn set_outside_reports_bounds() {
        let mut b = Block::from_plan(plan(2, 1, 3), 0u8).unwrap();
        match b.set(&[2, 3], 1) {
            Err(LatticeError::OutOfBounds { bounds, .. }) => {
                assert_eq!(bounds, b.describe_bounds());
            }
            other => panic!("expected OutOfBounds, got {other:?}"),
        }
        assert!(matches!(b.set(&[4, 0], 1), Err(LatticeError::OutOfBounds { .. })));
        assert!(matches!(b.set(&[2], 1), Err(LatticeError::OutOfBounds { .. })));
        b.set(&[2, 2], 5).unwrap();
        assert_eq!(b.read(&[2, 2]).unwrap(), 5);
    }

    #[test]
    fn from_plan_with_sees_full_coordinates() {
        let b = Block::from_plan_with(plan(3, 1, 2), |c| c.to_vec()).unwrap();
        assert_eq!(b.read(&[2, 1, 0]).unwrap(), vec![2, 1, 0]);
    }

    #[test]
    fn release_is_idempotent_and_poisons() {
        let mut b = Block::allocate(2, 0, 4096, &BlockConfig::new(CostModel::nested(8)), 1u16)
            .unwrap();
        b.release();
        b.release();
        assert!(b.is_released());
        assert_eq!(
            b.read(&[0, 0]),
            Err(LatticeError::Released { what: "grid block" })
        );
        assert_eq!(b.slice(0).err(), Some(ArenaError::Released));
        assert!(matches!(
            b.set(&[0, 0], 2),
            Err(LatticeError::Released { .. })
        ));
    }
}
