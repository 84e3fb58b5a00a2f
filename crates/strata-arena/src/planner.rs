//! Closed-form capacity planning.
//!
//! Given a first slice coordinate and a byte budget, the planner walks the
//! slice costs outward along axis 0 and reports how many slices a block
//! may hold. One slice of headroom is always left unplanned: it is the
//! slice being computed while the block's own slices are still live.

use crate::config::{BlockConfig, SliceLayout};
use crate::error::ArenaError;
use smallvec::SmallVec;
use strata_core::simplex::simplex_count;
use tracing::debug;

/// The extent and cost of one block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockPlan {
    /// Number of axes of the lattice.
    pub ndim: usize,
    /// First slice coordinate.
    pub min: i32,
    /// Last slice coordinate.
    pub max: i32,
    /// Rounded cost of the block and its slices, excluding headroom.
    pub planned_bytes: u64,
}

impl BlockPlan {
    /// Number of slices.
    pub fn length(&self) -> u32 {
        (self.max - self.min + 1) as u32
    }
}

/// Computes block extents under a byte budget.
#[derive(Clone, Debug)]
pub struct BlockPlanner {
    ndim: usize,
    config: BlockConfig,
}

impl BlockPlanner {
    /// Planner for lattices of `ndim` axes.
    pub fn new(ndim: usize, config: BlockConfig) -> Result<Self, ArenaError> {
        config.validate()?;
        if ndim < 2 {
            return Err(ArenaError::DimensionTooSmall { ndim });
        }
        Ok(Self { ndim, config })
    }

    /// Number of lattice axes.
    pub fn ndim(&self) -> usize {
        self.ndim
    }

    /// The configuration in use.
    pub fn config(&self) -> &BlockConfig {
        &self.config
    }

    /// Rounded byte cost of the slice at `a`, excluding its block slot.
    pub fn slice_cost(&self, a: i32) -> u64 {
        self.costs_from(a).next().unwrap_or(u64::MAX)
    }

    /// Plan the longest block starting at `min` that fits `budget` bytes.
    ///
    /// The block length `L` is one less than the number of slices whose
    /// cumulative cost fits, so the first `L + 1` slices fit and the first
    /// `L + 2` do not.
    pub fn plan(&self, min: i32, budget: u64) -> Result<BlockPlan, ArenaError> {
        if min < 0 {
            return Err(ArenaError::SliceOutOfRange {
                coord: min,
                min: 0,
                max: i32::MAX,
            });
        }
        let cost = &self.config.cost;
        let mut total = cost.block_overhead_bytes;
        let mut planned = 0u64;
        let mut fitting: u32 = 0;
        for slice in self.costs_from(min) {
            let next = total.saturating_add(slice).saturating_add(cost.slot_bytes);
            if cost.round(next) > budget {
                break;
            }
            planned = total;
            total = next;
            fitting += 1;
        }
        let length = fitting.saturating_sub(1);
        if length < self.config.min_length {
            let required = cost.round(self.bytes_for(min, self.config.min_length + 1));
            debug!(min, budget, required, "block does not fit");
            return Err(ArenaError::CapacityExceeded {
                min,
                budget,
                required,
            });
        }
        let plan = BlockPlan {
            ndim: self.ndim,
            min,
            max: min + length as i32 - 1,
            planned_bytes: cost.round(planned),
        };
        debug!(
            min,
            max = plan.max,
            length,
            planned_bytes = plan.planned_bytes,
            budget,
            "block planned"
        );
        Ok(plan)
    }

    /// Successive plans covering `[start, end]`.
    ///
    /// Each block starts right after the previous one ends; the last block
    /// is trimmed to end at `end`.
    pub fn partition(
        &self,
        start: i32,
        end: i32,
        budget: u64,
    ) -> Result<Vec<BlockPlan>, ArenaError> {
        if start > end {
            return Err(ArenaError::SliceOutOfRange {
                coord: start,
                min: 0,
                max: end,
            });
        }
        let mut plans = Vec::new();
        let mut cur = start;
        loop {
            let mut plan = self.plan(cur, budget)?;
            if plan.max >= end {
                plan.max = end;
                plan.planned_bytes = self.config.cost.round(self.bytes_for(cur, plan.length()));
                plans.push(plan);
                break;
            }
            cur = plan.max + 1;
            plans.push(plan);
        }
        debug!(start, end, blocks = plans.len(), "range partitioned");
        Ok(plans)
    }

    /// Unrounded cumulative cost of the block overhead plus `count` slices
    /// starting at `min`.
    fn bytes_for(&self, min: i32, count: u32) -> u64 {
        let cost = &self.config.cost;
        self.costs_from(min)
            .take(count as usize)
            .fold(cost.block_overhead_bytes, |acc, c| {
                acc.saturating_add(c).saturating_add(cost.slot_bytes)
            })
    }

    fn costs_from(&self, start: i32) -> SliceCosts<'_> {
        SliceCosts::new(self, start)
    }
}

/// Slice costs for `a = start, start + 1, ...`.
///
/// The nested layout keeps a running prefix sum per nesting level, so each
/// step costs `O(depth)` regardless of `a`. Reaching `start` costs
/// `O(depth^2 * period)`, independent of `start` (see [`Self::seek_nested`]).
struct SliceCosts<'a> {
    planner: &'a BlockPlanner,
    next: i64,
    /// `prefix[k]` = sum of level-`k + 1` costs for every coordinate below `next`.
    prefix: SmallVec<[u64; 4]>,
}

impl<'a> SliceCosts<'a> {
    fn new(planner: &'a BlockPlanner, start: i32) -> Self {
        let depth = planner.ndim - 1;
        let start = i64::from(start.max(0));
        let mut costs = Self {
            planner,
            next: 0,
            prefix: SmallVec::from_elem(0, depth),
        };
        if planner.config.cost.layout == SliceLayout::Nested {
            costs.seek_nested(start);
        }
        costs.next = start;
        costs
    }

    /// Slices after which every rounded level cost repeats its rounding
    /// remainder: `round(h + (s + p) * c) = round(h + s * c) + p * c`.
    fn period(&self) -> i64 {
        let cost = &self.planner.config.cost;
        let g = cost.granularity.max(1);
        let p1 = g / gcd(cost.element_bytes, g);
        let p2 = g / gcd(cost.reference_bytes, g);
        (p1 / gcd(p1, p2) * p2) as i64
    }

    /// Bring the prefix sums to `target` without visiting every slice.
    ///
    /// Every level cost is linear in the side plus a term periodic in
    /// [`Self::period`]. Sampled at `target`'s residue every period, the
    /// prefix sum of level `k + 1` is a polynomial of degree `k + 2` in
    /// the number of periods, so `depth + 2` samples determine it.
    fn seek_nested(&mut self, target: i64) {
        let period = self.period();
        let samples = self.prefix.len() + 2;
        let (periods, residue) = (target / period, target % period);
        if periods < samples as i64 {
            while self.next < target {
                self.advance_nested();
            }
            return;
        }
        while self.next < residue {
            self.advance_nested();
        }
        let mut table: Vec<SmallVec<[u64; 4]>> = Vec::with_capacity(samples);
        table.push(self.prefix.clone());
        for _ in 1..samples {
            for _ in 0..period {
                self.advance_nested();
            }
            table.push(self.prefix.clone());
        }
        for k in 0..self.prefix.len() {
            let ys: SmallVec<[u64; 8]> = table.iter().map(|row| row[k]).collect();
            self.prefix[k] = extrapolate(&ys, periods as u64);
        }
        self.next = target;
    }

    /// Cost of the nested slice at `self.next`; updates prefix sums.
    fn advance_nested(&mut self) -> u64 {
        let cost = &self.planner.config.cost;
        let side = (self.next + 1) as u64;
        let mut level = cost.round(
            cost.array_header_bytes
                .saturating_add(side.saturating_mul(cost.element_bytes)),
        );
        for k in 1..self.prefix.len() {
            self.prefix[k - 1] = self.prefix[k - 1].saturating_add(level);
            level = cost
                .round(
                    cost.array_header_bytes
                        .saturating_add(side.saturating_mul(cost.reference_bytes)),
                )
                .saturating_add(self.prefix[k - 1]);
        }
        if let Some(last) = self.prefix.last_mut() {
            *last = last.saturating_add(level);
        }
        self.next += 1;
        level
    }

    fn flat(&mut self) -> u64 {
        let cost = &self.planner.config.cost;
        let count = simplex_count(self.next as u64 + 1, self.prefix.len());
        self.next += 1;
        cost.round(
            cost.array_header_bytes
                .saturating_add(count.saturating_mul(cost.element_bytes)),
        )
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a.max(1)
}

/// Value at `x` of the polynomial through `(i, ys[i])`, via Newton's
/// forward differences. Saturates at `u64::MAX`, as the prefix sums do.
fn extrapolate(ys: &[u64], x: u64) -> u64 {
    if ys.contains(&u64::MAX) {
        return u64::MAX;
    }
    let mut diffs: SmallVec<[i128; 8]> = ys.iter().map(|&y| i128::from(y)).collect();
    let mut leading: SmallVec<[i128; 8]> = SmallVec::with_capacity(ys.len());
    for n in (1..=diffs.len()).rev() {
        leading.push(diffs[0]);
        for i in 0..n - 1 {
            diffs[i] = diffs[i + 1] - diffs[i];
        }
    }
    while leading.len() > 1 && leading.last() == Some(&0) {
        leading.pop();
    }
    let x = i128::from(x);
    let mut total: i128 = 0;
    let mut choose: i128 = 1;
    for (i, d) in leading.iter().enumerate() {
        if i > 0 {
            let i = i as i128;
            let Some(next) = choose.checked_mul(x - i + 1) else {
                return u64::MAX;
            };
            choose = next / i;
        }
        let Some(sum) = d.checked_mul(choose).and_then(|t| total.checked_add(t)) else {
            return u64::MAX;
        };
        total = sum;
    }
    u64::try_from(total.max(0)).unwrap_or(u64::MAX)
}

impl Iterator for SliceCosts<'_> {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.next > i64::from(i32::MAX) {
            return None;
        }
        Some(match self.planner.config.cost.layout {
            SliceLayout::Nested => self.advance_nested(),
            SliceLayout::Flat => self.flat(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CostModel;

    /// Nested 2D slices cost `16 + 8 (a + 1)`; every slot costs 8.
    fn scenario() -> BlockPlanner {
        let mut cost = CostModel::nested(8);
        cost.slot_bytes = 8;
        BlockPlanner::new(2, BlockConfig::new(cost)).unwrap()
    }

    #[test]
    fn nested_depth_one_cost() {
        let p = scenario();
        assert_eq!(p.slice_cost(0), 24);
        assert_eq!(p.slice_cost(3), 48);
        assert_eq!(p.slice_cost(4), 56);
    }

    #[test]
    fn nested_depth_two_cost() {
        // Level 1 at i: round(16 + 8(i + 1)); level 2 at a: round(16 + 4(a + 1)) + sum.
        let p = BlockPlanner::new(3, BlockConfig::default()).unwrap();
        assert_eq!(p.slice_cost(0), 24 + 24);
        assert_eq!(p.slice_cost(1), 24 + 24 + 32);
        assert_eq!(p.slice_cost(2), 32 + 24 + 32 + 40);
    }

    #[test]
    fn flat_cost_counts_simplex_cells() {
        let mut cost = CostModel::flat::<u64>();
        cost.array_header_bytes = 0;
        cost.granularity = 1;
        let p = BlockPlanner::new(3, BlockConfig::new(cost)).unwrap();
        assert_eq!(p.slice_cost(0), 8);
        assert_eq!(p.slice_cost(2), 6 * 8);
    }

    #[test]
    fn hand_derived_lengths() {
        let p = scenario();
        // 16, 48, 88, 136, 192, 256: four slices fit in 200 bytes.
        let plan = p.plan(0, 200).unwrap();
        assert_eq!(plan.length(), 3);
        assert_eq!((plan.min, plan.max), (0, 2));
        assert_eq!(plan.planned_bytes, 136);

        // Two slices fit in 100 bytes: length 1 is below the minimum.
        assert!(matches!(
            p.plan(0, 100),
            Err(ArenaError::CapacityExceeded { min: 0, budget: 100, .. })
        ));
    }

    #[test]
    fn plan_starting_mid_axis() {
        let p = scenario();
        // Slice plus slot at 3, 4, 5, 6: 56, 64, 72, 80 -> totals 72, 136, 208, 288.
        let plan = p.plan(3, 210).unwrap();
        assert_eq!((plan.min, plan.max), (3, 4));
    }

    #[test]
    fn negative_start_rejected() {
        assert!(matches!(
            scenario().plan(-1, 1_000),
            Err(ArenaError::SliceOutOfRange { coord: -1, .. })
        ));
    }

    #[test]
    fn one_dimensional_lattices_rejected() {
        assert!(matches!(
            BlockPlanner::new(1, BlockConfig::default()),
            Err(ArenaError::DimensionTooSmall { ndim: 1 })
        ));
    }

    #[test]
    fn partition_covers_range_contiguously() {
        let p = scenario();
        let plans = p.partition(0, 10, 400).unwrap();
        assert_eq!(plans[0].min, 0);
        assert_eq!(plans.last().map(|b| b.max), Some(10));
        for w in plans.windows(2) {
            assert_eq!(w[1].min, w[0].max + 1);
        }
        assert!(plans.iter().all(|b| b.planned_bytes <= 400));
    }

    fn walked_cost(p: &BlockPlanner, a: i32) -> u64 {
        let mut walk = SliceCosts {
            planner: p,
            next: 0,
            prefix: SmallVec::from_elem(0, p.ndim - 1),
        };
        for _ in 0..a {
            walk.advance_nested();
        }
        walk.advance_nested()
    }

    #[test]
    fn far_start_matches_walk() {
        let mut odd = CostModel::nested(12);
        odd.reference_bytes = 6;
        odd.granularity = 16;
        let mut coarse = CostModel::nested(1);
        coarse.granularity = 24;
        for cost in [CostModel::nested(8), odd, coarse] {
            for ndim in 2..=6 {
                let p = BlockPlanner::new(ndim, BlockConfig::new(cost.clone())).unwrap();
                for a in [0, 1, 7, 95, 96, 97, 311, 1_000, 4_099] {
                    assert_eq!(p.slice_cost(a), walked_cost(&p, a), "ndim {ndim} at {a}");
                }
            }
        }
    }

    #[test]
    fn huge_start_saturates_instead_of_walking() {
        let p = BlockPlanner::new(6, BlockConfig::default()).unwrap();
        assert_eq!(p.slice_cost(i32::MAX), u64::MAX);
        assert_eq!(p.slice_cost(200_000), walked_cost(&p, 200_000));
    }

    #[test]
    fn extrapolate_recovers_polynomials() {
        // 3x^2 + 2x + 5 sampled at 0..4.
        let ys: Vec<u64> = (0..4u64).map(|x| 3 * x * x + 2 * x + 5).collect();
        assert_eq!(extrapolate(&ys, 1_000), 3_002_005);
        assert_eq!(extrapolate(&[u64::MAX, u64::MAX], 3), u64::MAX);
        assert_eq!(extrapolate(&[0, 1 << 62, 1 << 63], 10), u64::MAX);
    }
}
