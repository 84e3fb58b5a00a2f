//! Core types and traits for Strata lattices.
//!
//! This is the leaf crate with no internal dependencies. It defines the
//! coordinate vocabulary, the bound-query [`Region`] contract every
//! storage type and view implements, the read and evolution traits, and
//! the error types shared across the workspace.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod coord;
pub mod error;
pub mod region;
pub mod simplex;
pub mod traits;

pub use coord::{axis_letter, check_axis, Coord, Generation, PartialCoord};
pub use error::{LatticeError, PersistError, StepError};
pub use region::{Positions, RegionExt};
pub use simplex::OrderedTuples;
pub use traits::{debug_assert_partial_within, Evolving, Lattice, Model, Region, Symmetric};
