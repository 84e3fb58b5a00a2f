//! Rectangular and symmetry-restricted regions for Strata lattices.
//!
//! # Regions
//!
//! - [`BoxRegion`]: axis-aligned hyperrectangle
//! - [`AsymmetricSection`]: materialized canonical orthant
//!   `c0 >= c1 >= ... >= 0` of a fully symmetric lattice
//! - [`IsotropicLattice`]: the symmetric `[-m, m]^n` lattice read through
//!   its canonical orthant
//! - [`AsymmetricView`]: the asymmetric sub-region of any
//!   [`Symmetric`](strata_core::Symmetric) source
//!
//! Canonicalization ([`canonicalize`]) maps any coordinate to the orthant
//! by taking absolute values and sorting in descending order.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod asymmetric_view;
pub mod box_region;
pub mod canonical;
pub mod error;
pub mod isotropic;
pub mod section;

pub use asymmetric_view::AsymmetricView;
pub use box_region::BoxRegion;
pub use canonical::{canonicalize, canonicalize_in_place, is_canonical};
pub use error::RegionError;
pub use isotropic::IsotropicLattice;
pub use section::AsymmetricSection;
