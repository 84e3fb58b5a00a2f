//! Region contract compliance helpers.
//!
//! These functions verify that a `Region` implementation satisfies the
//! bound-query contract. Reused across the region, arena and view test
//! suites.

use std::collections::BTreeSet;
use strata_core::{Coord, PartialCoord, Region, RegionExt};

/// Every coordinate of the box `bounds[a].0 ..= bounds[a].1`, axis 0 fastest.
pub fn box_cells(bounds: &[(i32, i32)]) -> Vec<Coord> {
    let mut cells = vec![Coord::new()];
    for &(lo, hi) in bounds {
        cells = (lo..=hi)
            .flat_map(|v| {
                cells.iter().map(move |c| {
                    let mut c = c.clone();
                    c.push(v);
                    c
                })
            })
            .collect();
    }
    cells
}

/// Assert that fixing more axes never widens a bound, and that every cell
/// lies within the bounds computed with all other axes fixed.
pub fn assert_bounds_monotone<R: Region + ?Sized>(region: &R) {
    let ndim = region.ndim();
    for cell in region.positions() {
        for axis in 0..ndim {
            let mut partial = PartialCoord::free(ndim);
            let mut lo = region.min_coord(axis);
            let mut hi = region.max_coord(axis);
            for other in (0..ndim).filter(|&a| a != axis) {
                partial.fix(other, cell[other]);
                let (next_lo, next_hi) = (
                    region.min_coord_at(axis, &partial),
                    region.max_coord_at(axis, &partial),
                );
                assert!(
                    next_lo >= lo && next_hi <= hi,
                    "axis {axis}: fixing {partial} widened [{lo}, {hi}] to [{next_lo}, {next_hi}]"
                );
                lo = next_lo;
                hi = next_hi;
            }
            assert!(
                lo <= cell[axis] && cell[axis] <= hi,
                "cell {cell:?} outside its own bound [{lo}, {hi}] on axis {axis}"
            );
        }
    }
}

/// Assert that `positions()` yields exactly the cells of the bounding box
/// accepted by `predicate`, each once, and that `cell_count` agrees.
pub fn assert_positions_match_box_filter<R, F>(region: &R, predicate: F)
where
    R: Region + ?Sized,
    F: Fn(&[i32]) -> bool,
{
    let listed: Vec<Coord> = region.positions().collect();
    let actual: BTreeSet<Coord> = listed.iter().cloned().collect();
    assert_eq!(actual.len(), listed.len(), "positions() yielded duplicates");
    let expected: BTreeSet<Coord> = box_cells(&region.bounding_box())
        .into_iter()
        .filter(|c| predicate(c))
        .collect();
    assert_eq!(actual, expected);
    assert_eq!(region.cell_count(), expected.len() as u64);
}

/// Per-axis `(min, max)` of the cells of `source` satisfying
/// `c[axis2] = slope * c[axis1] + offset`, with `axis2` removed.
///
/// `None` if no cell satisfies the relation.
pub fn diagonal_bounds_brute_force<R: Region + ?Sized>(
    source: &R,
    axis1: usize,
    axis2: usize,
    slope: i32,
    offset: i32,
) -> Option<Vec<(i32, i32)>> {
    let ndim = source.ndim() - 1;
    let mut bounds: Option<Vec<(i32, i32)>> = None;
    for cell in source.positions() {
        if cell[axis2] != slope * cell[axis1] + offset {
            continue;
        }
        let view: Vec<i32> = (0..source.ndim())
            .filter(|&a| a != axis2)
            .map(|a| cell[a])
            .collect();
        let b = bounds.get_or_insert_with(|| view.iter().map(|&v| (v, v)).collect());
        for (slot, &v) in b.iter_mut().zip(&view) {
            slot.0 = slot.0.min(v);
            slot.1 = slot.1.max(v);
        }
    }
    debug_assert!(bounds.as_ref().is_none_or(|b| b.len() == ndim));
    bounds
}
