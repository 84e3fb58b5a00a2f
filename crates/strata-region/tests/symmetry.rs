//! Symmetry canonicalization and section shape properties.

use proptest::prelude::*;
use strata_core::{Lattice, LatticeError, Region, RegionExt};
use strata_region::{
    canonicalize, is_canonical, AsymmetricSection, AsymmetricView, BoxRegion, IsotropicLattice,
};
use strata_test_utils::compliance;

fn encoded(ndim: usize, max: i32) -> IsotropicLattice<AsymmetricSection<u64>> {
    let section = AsymmetricSection::from_fn(ndim, max, |c| {
        c.iter().fold(0u64, |acc, &v| acc * 64 + v as u64)
    })
    .unwrap();
    IsotropicLattice::new(section)
}

#[test]
fn three_dimensional_scenario() {
    let section = AsymmetricSection::from_fn(3, 2, |c| format!("{c:?}")).unwrap();
    assert_eq!(section.len(), 10);
    let lattice = IsotropicLattice::new(section);
    let a = lattice.read(&[-2, 1, 0]).unwrap();
    let b = lattice.read(&[2, 1, 0]).unwrap();
    let c = lattice.read(&[0, 2, 1]).unwrap();
    assert_eq!(a, b);
    assert_eq!(b, c);
    assert_eq!(a, "[2, 1, 0]");
}

#[test]
fn section_bounds_are_monotone() {
    compliance::assert_bounds_monotone(&AsymmetricSection::new(3, 4, ()).unwrap());
    compliance::assert_bounds_monotone(&AsymmetricSection::new(4, 2, ()).unwrap());
}

#[test]
fn section_positions_match_brute_force() {
    let s = AsymmetricSection::new(3, 3, ()).unwrap();
    compliance::assert_positions_match_box_filter(&s, |c| is_canonical(c));
}

#[test]
fn box_positions_match_brute_force() {
    let b = BoxRegion::new(&[-1, 0, 2], &[1, 2, 3]).unwrap();
    compliance::assert_bounds_monotone(&b);
    compliance::assert_positions_match_box_filter(&b, |_| true);
}

#[test]
fn isotropic_lattice_covers_whole_cube() {
    let l = encoded(2, 3);
    assert_eq!(l.cell_count(), 49);
    for c in l.positions() {
        assert!(l.read(&c).is_ok(), "unreadable {c:?}");
    }
}

#[test]
fn asymmetric_view_of_isotropic_lattice_is_the_orthant() {
    for (ndim, max) in [(2, 4), (3, 3), (4, 2)] {
        let view = AsymmetricView::new(encoded(ndim, max));
        compliance::assert_bounds_monotone(&view);
        compliance::assert_positions_match_box_filter(&view, |c| is_canonical(c));
        let section = AsymmetricSection::<()>::new(ndim, max, ()).unwrap();
        assert_eq!(view.cell_count(), section.len() as u64);
    }
}

#[test]
fn asymmetric_view_reads_through_to_source() {
    let lattice = encoded(3, 3);
    let view = AsymmetricView::new(&lattice);
    for c in view.positions() {
        assert_eq!(view.read(&c).unwrap(), lattice.read(&c).unwrap());
    }
    assert!(matches!(
        view.read(&[1, 2, 0]),
        Err(LatticeError::OutOfBounds { .. })
    ));
    assert!(matches!(
        view.read(&[-3, 0, 0]),
        Err(LatticeError::OutOfBounds { .. })
    ));
}

#[test]
fn extreme_coordinates_are_out_of_bounds() {
    let l = encoded(2, 3);
    assert!(matches!(
        l.read(&[i32::MIN, 0]),
        Err(LatticeError::OutOfBounds { .. })
    ));
    assert!(canonicalize(&[i32::MIN, 0]).is_err());
}

proptest! {
    #[test]
    fn canonicalize_is_idempotent(c in proptest::collection::vec(-50i32..50, 1..6)) {
        let once = canonicalize(&c).unwrap();
        prop_assert!(is_canonical(&once));
        prop_assert_eq!(canonicalize(&once).unwrap(), once);
    }

    #[test]
    fn flips_and_permutations_are_invisible(
        c in proptest::collection::vec(-3i32..=3, 4),
        flips in proptest::collection::vec(any::<bool>(), 4),
        rotate in 0usize..4,
    ) {
        let l = encoded(4, 3);
        let mut other: Vec<i32> = c
            .iter()
            .zip(&flips)
            .map(|(&v, &f)| if f { -v } else { v })
            .collect();
        other.rotate_left(rotate);
        other.swap(0, 3);
        prop_assert_eq!(l.read(&c).unwrap(), l.read(&other).unwrap());
    }

    #[test]
    fn section_len_matches_cell_count(ndim in 1usize..5, max in 0i32..6) {
        let s = AsymmetricSection::new(ndim, max, 0u8).unwrap();
        prop_assert_eq!(s.len() as u64, s.cell_count());
        prop_assert_eq!(s.min_coord(ndim - 1), 0);
    }
}
