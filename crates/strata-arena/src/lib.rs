//! Memory-bounded block allocation for Strata lattices.
//!
//! A lattice too large to hold in memory is stored as a sequence of
//! [`Block`]s along axis 0. Each block is a contiguous run of [`Slice`]s
//! whose planned byte cost, plus one slice of headroom, fits a caller
//! budget.
//!
//! # Architecture
//!
//! ```text
//! CostModel ──► BlockPlanner::plan(min, budget) ──► BlockPlan ──► Block<T>
//!                          │
//!                          └──► partition(start, end, budget) ──► Vec<BlockPlan>
//! ```
//!
//! Costs are modelled rather than measured: [`CostModel::nested`] mimics
//! one array per nesting level on a managed heap, [`CostModel::flat`]
//! describes this crate's own flattened slices.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod block;
pub mod config;
pub mod error;
pub mod planner;
pub mod slice;

pub use block::Block;
pub use config::{BlockConfig, CostModel, SliceLayout};
pub use error::ArenaError;
pub use planner::{BlockPlan, BlockPlanner};
pub use slice::Slice;
