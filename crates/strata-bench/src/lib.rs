//! Benchmark profiles for the Strata lattice storage crates.
//!
//! - [`reference_section`]: a 3D canonical orthant of extent 60 (~39K cells)
//! - [`reference_blocks`]: the same lattice split into budgeted blocks
//! - [`sample_coords`]: deterministic coordinates spread over the full lattice

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use strata_arena::{ArenaError, Block, BlockConfig, BlockPlanner};
use strata_core::Coord;
use strata_region::{AsymmetricSection, RegionError};

/// Extent of the reference lattice on axis 0.
pub const REFERENCE_EXTENT: i32 = 60;

/// Per-block byte budget of [`reference_blocks`].
pub const REFERENCE_BUDGET: u64 = 256 * 1024;

/// Deterministic cell value.
pub fn cell_value(coord: &[i32]) -> u64 {
    coord
        .iter()
        .fold(0xcbf2_9ce4_8422_2325u64, |h, &c| (h ^ c as u64).wrapping_mul(0x100_0000_01b3))
}

/// The 3D canonical orthant `0 <= z <= y <= x <= REFERENCE_EXTENT`.
pub fn reference_section() -> Result<AsymmetricSection<u64>, RegionError> {
    AsymmetricSection::from_fn(3, REFERENCE_EXTENT, cell_value)
}

/// The reference lattice partitioned into blocks of at most
/// [`REFERENCE_BUDGET`] bytes.
pub fn reference_blocks() -> Result<Vec<Block<u64>>, ArenaError> {
    let planner = BlockPlanner::new(3, BlockConfig::default())?;
    planner
        .partition(0, REFERENCE_EXTENT, REFERENCE_BUDGET)?
        .into_iter()
        .map(|plan| Block::from_plan_with(plan, cell_value))
        .collect()
}

/// `count` coordinates of the full lattice `[-extent, extent]^ndim`.
///
/// Uses a multiplicative hash so runs are reproducible without a RNG.
pub fn sample_coords(ndim: usize, extent: i32, count: usize) -> Vec<Coord> {
    let side = (2 * extent + 1) as u64;
    (0..count as u64)
        .map(|i| {
            (0..ndim as u64)
                .map(|a| {
                    let h = (i * 31 + a).wrapping_mul(6_364_136_223_846_793_007) >> 17;
                    (h % side) as i32 - extent
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::Region;

    #[test]
    fn profiles_build() {
        let section = reference_section().unwrap();
        assert_eq!(section.len(), 39_711);
        let blocks = reference_blocks().unwrap();
        assert_eq!(blocks.first().unwrap().min_coord(0), 0);
        assert_eq!(blocks.last().unwrap().max_coord(0), REFERENCE_EXTENT);
    }

    #[test]
    fn samples_stay_in_range() {
        let samples = sample_coords(3, 5, 200);
        assert_eq!(samples.len(), 200);
        assert!(samples.iter().flatten().all(|c| (-5..=5).contains(c)));
    }
}
