//! Reduction of coordinates to the canonical ordered orthant.
//!
//! A lattice symmetric under axis permutation and sign flips is fully
//! determined by its values on `c0 >= c1 >= ... >= 0`. Canonicalizing a
//! coordinate takes the absolute value of every entry and sorts the result
//! in descending order.

use crate::error::RegionError;
use strata_core::simplex::is_ordered;
use strata_core::Coord;

/// Canonicalize `coord` in place.
///
/// Fails without touching `coord` if an entry is `i32::MIN`, whose
/// absolute value has no `i32` representation.
///
/// Insertion sort: dimensions are small and the input is often already
/// close to ordered.
pub fn canonicalize_in_place(coord: &mut [i32]) -> Result<(), RegionError> {
    if let Some(axis) = coord.iter().position(|&c| c == i32::MIN) {
        return Err(RegionError::AbsOverflow { axis });
    }
    for c in coord.iter_mut() {
        *c = c.abs();
    }
    for i in 1..coord.len() {
        let v = coord[i];
        let mut j = i;
        while j > 0 && coord[j - 1] < v {
            coord[j] = coord[j - 1];
            j -= 1;
        }
        coord[j] = v;
    }
    Ok(())
}

/// Canonical representative of `coord`.
pub fn canonicalize(coord: &[i32]) -> Result<Coord, RegionError> {
    let mut out = Coord::from_slice(coord);
    canonicalize_in_place(&mut out)?;
    Ok(out)
}

/// `true` if `coord` is already its own canonical representative.
pub fn is_canonical(coord: &[i32]) -> bool {
    is_ordered(coord)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_absolute_values_descending() {
        assert_eq!(canonicalize(&[-2, 1, 0]).unwrap().as_slice(), &[2, 1, 0]);
        assert_eq!(canonicalize(&[0, 2, -1]).unwrap().as_slice(), &[2, 1, 0]);
        assert_eq!(canonicalize(&[3, -3, 3, 0]).unwrap().as_slice(), &[3, 3, 3, 0]);
    }

    #[test]
    fn canonical_input_is_unchanged() {
        let mut c = [5, 4, 4, 1];
        assert!(is_canonical(&c));
        canonicalize_in_place(&mut c).unwrap();
        assert_eq!(c, [5, 4, 4, 1]);
    }

    #[test]
    fn extreme_values() {
        assert_eq!(
            canonicalize(&[0, -i32::MAX, i32::MAX]).unwrap().as_slice(),
            &[i32::MAX, i32::MAX, 0]
        );
        assert_eq!(
            canonicalize(&[i32::MIN, 0]),
            Err(RegionError::AbsOverflow { axis: 0 })
        );
        let mut c = [-1, 2, i32::MIN];
        assert_eq!(
            canonicalize_in_place(&mut c),
            Err(RegionError::AbsOverflow { axis: 2 })
        );
        assert_eq!(c, [-1, 2, i32::MIN]);
    }

    #[test]
    fn empty_and_single_axis() {
        assert!(canonicalize(&[]).unwrap().is_empty());
        assert_eq!(canonicalize(&[-7]).unwrap().as_slice(), &[7]);
        assert!(!is_canonical(&[-1]));
    }
}
