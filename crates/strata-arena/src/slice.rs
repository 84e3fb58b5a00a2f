//! One step of a block along axis 0.

use crate::error::ArenaError;
use strata_core::simplex::{is_ordered, simplex_count, simplex_offset};
use strata_core::{Coord, OrderedTuples};

/// Every canonical tail `(c1, ..., c(depth))` with `coord >= c1 >= ... >= 0`,
/// flattened in lexicographic order.
///
/// A slice of depth `k` at `a` holds `C(a + k, k)` values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Slice<T> {
    coord: i32,
    depth: usize,
    cells: Vec<T>,
}

impl<T> Slice<T> {
    /// Build a slice by computing every cell from its tail coordinate.
    pub fn from_fn<F>(coord: i32, depth: usize, mut f: F) -> Result<Self, ArenaError>
    where
        F: FnMut(&[i32]) -> T,
    {
        if coord < 0 {
            return Err(ArenaError::SliceOutOfRange {
                coord,
                min: 0,
                max: i32::MAX,
            });
        }
        let cells = OrderedTuples::new(depth, coord).map(|t| f(&t)).collect();
        Ok(Self {
            coord,
            depth,
            cells,
        })
    }

    /// Coordinate on axis 0.
    pub fn coord(&self) -> i32 {
        self.coord
    }

    /// Number of axes per tail.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`: every slice holds at least the all-zero tail.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Value at `tail`, or `None` if the tail is not in the slice.
    pub fn get(&self, tail: &[i32]) -> Option<&T> {
        self.offset(tail).map(|i| &self.cells[i])
    }

    /// Mutable value at `tail`.
    pub fn get_mut(&mut self, tail: &[i32]) -> Option<&mut T> {
        self.offset(tail).map(|i| &mut self.cells[i])
    }

    /// Iterate `(tail, value)` in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &T)> + '_ {
        OrderedTuples::new(self.depth, self.coord).zip(self.cells.iter())
    }

    fn offset(&self, tail: &[i32]) -> Option<usize> {
        let fits = tail.len() == self.depth
            && is_ordered(tail)
            && tail.first().is_none_or(|&c| c <= self.coord);
        fits.then(|| simplex_offset(tail))
    }
}

impl<T: Clone> Slice<T> {
    /// A slice with every cell set to `fill`.
    pub fn filled(coord: i32, depth: usize, fill: T) -> Result<Self, ArenaError> {
        if coord < 0 {
            return Err(ArenaError::SliceOutOfRange {
                coord,
                min: 0,
                max: i32::MAX,
            });
        }
        let len = simplex_count(coord as u64 + 1, depth) as usize;
        Ok(Self {
            coord,
            depth,
            cells: vec![fill; len],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_count_is_figurate() {
        assert_eq!(Slice::filled(0, 2, 0u8).unwrap().len(), 1);
        assert_eq!(Slice::filled(3, 1, 0u8).unwrap().len(), 4);
        assert_eq!(Slice::filled(3, 2, 0u8).unwrap().len(), 10);
        assert_eq!(Slice::filled(2, 3, 0u8).unwrap().len(), 10);
    }

    #[test]
    fn from_fn_and_filled_agree_on_layout() {
        let s = Slice::from_fn(3, 2, |t| (t[0], t[1])).unwrap();
        assert_eq!(s.len(), Slice::filled(3, 2, ()).unwrap().len());
        assert_eq!(s.get(&[2, 1]), Some(&(2, 1)));
        for (tail, v) in s.iter() {
            assert_eq!((tail[0], tail[1]), *v);
        }
    }

    #[test]
    fn tails_outside_slice_are_rejected() {
        let mut s = Slice::filled(2, 2, 0i32).unwrap();
        assert!(s.get(&[3, 0]).is_none());
        assert!(s.get(&[1, 2]).is_none());
        assert!(s.get(&[1]).is_none());
        *s.get_mut(&[2, 2]).unwrap() = 5;
        assert_eq!(s.get(&[2, 2]), Some(&5));
    }

    #[test]
    fn negative_coordinate_rejected() {
        assert!(Slice::filled(-1, 2, 0u8).is_err());
        assert!(Slice::from_fn(-1, 2, |_| 0u8).is_err());
    }
}
