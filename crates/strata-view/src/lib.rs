//! Lazily bound views over Strata lattices.
//!
//! Every view wraps a source region (held by value, by reference or boxed)
//! and exposes a derived [`Region`](strata_core::Region):
//!
//! - [`CrossSection`]: fix one axis to a constant, dropping it
//! - [`DiagonalCrossSection`]: fix `axis2 = ±axis1 + offset`, dropping `axis2`
//! - [`Subsection`]: restrict each axis to an optional range
//!
//! Views are bound at construction and re-bound after every
//! [`step`](strata_core::Evolving::step) of their source. A view whose
//! relation no longer meets the source fails that step with
//! [`StepError::BoundaryLost`](strata_core::StepError::BoundaryLost) and
//! stays lost: reads fail, further steps fail without touching the source,
//! and bound queries panic.
//!
//! The [`processor`] module provides the block-streaming session protocol
//! and [`CrossSectionCopier`], which assembles full cross-sections from
//! disjoint blocks.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cross_section;
pub mod diagonal;
pub mod error;
pub mod processor;
mod state;
pub mod subsection;

pub use cross_section::CrossSection;
pub use diagonal::{DiagonalCrossSection, Slope};
pub use error::ViewError;
pub use processor::{run_session, BlockProcessor, CopiedSection, CrossSectionCopier};
pub use subsection::Subsection;
