//! Indexing and bounds for ordered orthants.
//!
//! An ordered orthant is the set of tuples `c0 >= c1 >= ... >= c(n-1) >= 0`.
//! It is the canonical sub-region of an isotropic lattice and the shape of
//! every storage slice. Tuples are laid out in lexicographic order, so a
//! tuple's flat offset is a sum of binomial coefficients and the storage
//! needs no per-row headers.

use crate::coord::{Coord, PartialCoord};
use smallvec::SmallVec;

/// Binomial coefficient `C(n, k)`.
///
/// Exact for every result that fits in `u64`; larger results saturate at
/// `u64::MAX`.
pub fn binomial(n: u64, k: u64) -> u64 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut acc: u128 = 1;
    for i in 0..k {
        // acc * (n - i) is divisible by (i + 1) at every step.
        acc = acc * u128::from(n - i) / u128::from(i + 1);
        if acc > u128::from(u64::MAX) {
            return u64::MAX;
        }
    }
    acc as u64
}

/// Number of descending `rank`-tuples whose entries all lie in `[0, side)`.
///
/// `simplex_count(side, 1) == side`, `simplex_count(side, 2)` is the
/// `side`-th triangular number, and so on.
pub fn simplex_count(side: u64, rank: usize) -> u64 {
    if rank == 0 {
        return 1;
    }
    if side == 0 {
        return 0;
    }
    binomial(side + rank as u64 - 1, rank as u64)
}

/// Flat offset of a descending non-negative tuple in lexicographic order.
///
/// `sorted` must satisfy `sorted[0] >= sorted[1] >= ... >= 0`; this is a
/// debug-checked precondition.
pub fn simplex_offset(sorted: &[i32]) -> usize {
    debug_assert!(
        is_ordered(sorted),
        "{sorted:?} is not a descending non-negative tuple"
    );
    let rank = sorted.len();
    sorted
        .iter()
        .enumerate()
        .map(|(i, &c)| simplex_count(c as u64, rank - i) as usize)
        .sum()
}

/// `true` if `coord` is descending and non-negative.
pub fn is_ordered(coord: &[i32]) -> bool {
    coord.windows(2).all(|w| w[0] >= w[1]) && coord.last().is_none_or(|&c| c >= 0)
}

/// Iterator over descending `rank`-tuples with entries in `[0, max]`, in
/// the order of [`simplex_offset`].
///
/// The last axis varies fastest.
#[derive(Clone, Debug)]
pub struct OrderedTuples {
    current: Coord,
    max: i32,
    pending: bool,
}

impl OrderedTuples {
    /// All descending `rank`-tuples bounded by `max`. Empty if `max < 0`.
    pub fn new(rank: usize, max: i32) -> Self {
        Self {
            current: SmallVec::from_elem(0, rank),
            max,
            pending: max >= 0 || rank == 0,
        }
    }
}

impl Iterator for OrderedTuples {
    type Item = Coord;

    fn next(&mut self) -> Option<Coord> {
        if !self.pending {
            return None;
        }
        let out = self.current.clone();
        let c = &self.current;
        let headroom = (0..c.len())
            .rev()
            .find(|&k| c[k] < if k == 0 { self.max } else { c[k - 1] });
        match headroom {
            Some(k) => {
                self.current[k] += 1;
                self.current[k + 1..].iter_mut().for_each(|c| *c = 0);
            }
            None => self.pending = false,
        }
        Some(out)
    }
}

/// Lower bound on `axis` inside an ordered orthant whose axis 0 is
/// restricted to `[axis0_min, ..]`.
///
/// The nearest fixed later axis is a floor; axis 0 is additionally
/// floored by `axis0_min`.
pub fn ordered_min(axis: usize, fixed: &PartialCoord, axis0_min: i32) -> i32 {
    let floor = fixed
        .iter_fixed()
        .filter(|&(a, _)| a > axis)
        .map(|(_, v)| v)
        .max()
        .unwrap_or(0);
    if axis == 0 {
        floor.max(axis0_min)
    } else {
        floor
    }
}

/// Upper bound on `axis` inside an ordered orthant whose axis 0 is
/// restricted to `[.., axis0_max]`.
///
/// The nearest fixed earlier axis is a ceiling.
pub fn ordered_max(axis: usize, fixed: &PartialCoord, axis0_max: i32) -> i32 {
    fixed
        .iter_fixed()
        .filter(|&(a, _)| a < axis)
        .map(|(_, v)| v)
        .min()
        .unwrap_or(axis0_max)
        .min(axis0_max)
}
