//! Derived operations on any [`Region`]: membership, enumeration, extent.

use crate::coord::{Coord, PartialCoord};
use crate::traits::Region;
use smallvec::SmallVec;

/// Extension methods available on every [`Region`].
pub trait RegionExt: Region {
    /// `true` if `coord` lies inside the region.
    ///
    /// Each axis is checked against its unconstrained bound, then against
    /// its bound given every other axis of `coord`.
    fn contains(&self, coord: &[i32]) -> bool {
        if coord.len() != self.ndim() {
            return false;
        }
        self.contains_partial(&PartialCoord::from(coord))
    }

    /// `true` if every fixed axis of `partial` lies within its bound given
    /// the remaining fixed axes.
    ///
    /// Unconstrained bounds are checked for every fixed axis before any
    /// constrained query is issued.
    fn contains_partial(&self, partial: &PartialCoord) -> bool {
        if partial.ndim() != self.ndim() {
            return false;
        }
        let within_box = partial
            .iter_fixed()
            .all(|(a, v)| self.min_coord(a) <= v && v <= self.max_coord(a));
        within_box
            && partial.iter_fixed().all(|(a, v)| {
                self.min_coord_at(a, partial) <= v && v <= self.max_coord_at(a, partial)
            })
    }

    /// Iterate every coordinate of the region.
    ///
    /// Axis 0 varies fastest. Each axis range is derived from the
    /// constrained bound queries, so irregular shapes are enumerated
    /// exactly.
    fn positions(&self) -> Positions<'_, Self> {
        Positions::new(self)
    }

    /// Number of cells in the region.
    fn cell_count(&self) -> u64 {
        self.positions().count() as u64
    }

    /// Per-axis `(min, max)` of the unconstrained bounds.
    fn bounding_box(&self) -> Vec<(i32, i32)> {
        (0..self.ndim())
            .map(|a| (self.min_coord(a), self.max_coord(a)))
            .collect()
    }

    /// Human-readable bounds, e.g. `x in [0, 3], y in [-1, 1]`.
    fn describe_bounds(&self) -> String {
        (0..self.ndim())
            .map(|a| {
                format!(
                    "{} in [{}, {}]",
                    self.axis_label(a),
                    self.min_coord(a),
                    self.max_coord(a)
                )
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl<R: Region + ?Sized> RegionExt for R {}

/// Odometer over the coordinates of a region. See [`RegionExt::positions`].
pub struct Positions<'a, R: ?Sized> {
    region: &'a R,
    partial: PartialCoord,
    current: Coord,
    upper: SmallVec<[i32; 4]>,
    pending: bool,
}

impl<'a, R: Region + ?Sized> Positions<'a, R> {
    fn new(region: &'a R) -> Self {
        let ndim = region.ndim();
        let mut it = Self {
            region,
            partial: PartialCoord::free(ndim),
            current: SmallVec::from_elem(0, ndim),
            upper: SmallVec::from_elem(0, ndim),
            pending: true,
        };
        if ndim > 0 {
            it.pending = match it.descend(ndim - 1) {
                Ok(()) => true,
                Err(axis) if axis + 1 < ndim => it.advance_from(axis + 1),
                Err(_) => false,
            };
        }
        it
    }

    /// Reset axes `0..=top` to their lowest values given the fixed higher
    /// axes. On an empty range returns the axis that had no room.
    fn descend(&mut self, top: usize) -> Result<(), usize> {
        for a in 0..=top {
            self.partial.unfix(a);
        }
        for a in (0..=top).rev() {
            let lo = self.region.min_coord_at(a, &self.partial);
            let hi = self.region.max_coord_at(a, &self.partial);
            if lo > hi {
                return Err(a);
            }
            self.current[a] = lo;
            self.upper[a] = hi;
            self.partial.fix(a, lo);
        }
        Ok(())
    }

    /// Move to the next coordinate, incrementing no axis below `start`.
    fn advance_from(&mut self, mut start: usize) -> bool {
        let ndim = self.current.len();
        loop {
            let Some(a) = (start..ndim).find(|&a| self.current[a] < self.upper[a]) else {
                return false;
            };
            self.current[a] += 1;
            self.partial.fix(a, self.current[a]);
            if a == 0 {
                return true;
            }
            match self.descend(a - 1) {
                Ok(()) => return true,
                Err(b) => start = b + 1,
            }
        }
    }
}

impl<R: Region + ?Sized> Iterator for Positions<'_, R> {
    type Item = Coord;

    fn next(&mut self) -> Option<Coord> {
        if !self.pending {
            return None;
        }
        let out = self.current.clone();
        self.pending = !self.current.is_empty() && self.advance_from(0);
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `x >= y >= 0`, `x <= max`.
    struct Triangle {
        max: i32,
    }

    impl Region for Triangle {
        fn ndim(&self) -> usize {
            2
        }
        fn min_coord(&self, _axis: usize) -> i32 {
            0
        }
        fn max_coord(&self, _axis: usize) -> i32 {
            self.max
        }
        fn min_coord_at(&self, axis: usize, fixed: &PartialCoord) -> i32 {
            match (axis, fixed.get(1)) {
                (0, Some(y)) => y,
                _ => 0,
            }
        }
        fn max_coord_at(&self, axis: usize, fixed: &PartialCoord) -> i32 {
            match (axis, fixed.get(0)) {
                (1, Some(x)) => x,
                _ => self.max,
            }
        }
    }

    struct Point;

    impl Region for Point {
        fn ndim(&self) -> usize {
            0
        }
        fn min_coord(&self, _axis: usize) -> i32 {
            unreachable!()
        }
        fn max_coord(&self, _axis: usize) -> i32 {
            unreachable!()
        }
    }

    #[test]
    fn triangle_enumerates_every_cell_once() {
        let t = Triangle { max: 3 };
        let cells: Vec<Coord> = t.positions().collect();
        assert_eq!(cells.len(), 10);
        assert_eq!(cells[0].as_slice(), &[0, 0]);
        assert_eq!(cells[1].as_slice(), &[1, 0]);
        assert_eq!(cells[4].as_slice(), &[1, 1]);
        assert!(cells.iter().all(|c| c[0] >= c[1]));
    }

    #[test]
    fn contains_respects_constrained_bounds() {
        let t = Triangle { max: 3 };
        assert!(t.contains(&[2, 1]));
        assert!(!t.contains(&[1, 2]));
        assert!(!t.contains(&[4, 0]));
        assert!(!t.contains(&[1]));
        assert!(t.contains_partial(&PartialCoord::free(2).with(1, 3)));
    }

    #[test]
    fn zero_dimensional_region_has_one_cell() {
        assert_eq!(Point.cell_count(), 1);
    }

    #[test]
    fn describe_bounds_uses_axis_labels() {
        let t = Triangle { max: 2 };
        assert_eq!(t.describe_bounds(), "x in [0, 2], y in [0, 2]");
        assert_eq!(t.bounding_box(), vec![(0, 2), (0, 2)]);
    }
}
