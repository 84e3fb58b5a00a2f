//! Strata: N-dimensional lattice storage for cellular automata.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Strata sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use strata::prelude::*;
//!
//! // The canonical section of a 3D lattice symmetric under axis swaps and
//! // sign flips, holding c0 + c1 + c2.
//! let section = AsymmetricSection::from_fn(3, 4, |c| c.iter().sum::<i32>()).unwrap();
//! let lattice = IsotropicLattice::new(section);
//! assert_eq!(lattice.read(&[-1, 4, 0]).unwrap(), 5);
//! assert_eq!((lattice.min_coord(2), lattice.max_coord(2)), (-4, 4));
//!
//! // The plane y = 2 of the section: 0 <= z <= 2 <= x <= 4.
//! let plane = CrossSection::new(lattice.asymmetric_section(), 1, 2).unwrap();
//! assert_eq!(plane.cell_count(), 9);
//!
//! // The diagonal z = y of the section.
//! let diagonal =
//!     DiagonalCrossSection::new(lattice.asymmetric_section(), 1, 2, Slope::Positive, 0).unwrap();
//! assert_eq!(diagonal.read(&[3, 3]).unwrap(), 9);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `strata-core` | Bound-query traits, coordinates, errors, ordered-orthant indexing |
//! | [`region`] | `strata-region` | Boxes, canonicalization, asymmetric sections, isotropic lattices |
//! | [`arena`] | `strata-arena` | Cost models, block planning, memory-bounded blocks |
//! | [`view`] | `strata-view` | Cross-section, diagonal and subsection views; processing sessions |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Bound-query traits, coordinates and errors (`strata-core`).
///
/// The [`types::Region`] trait is the contract every storage type and view
/// implements.
pub use strata_core as types;

/// Symmetric regions and canonical sections (`strata-region`).
pub use strata_region as region;

/// Memory-bounded block planning and storage (`strata-arena`).
///
/// Plan with [`arena::BlockPlanner`], allocate with [`arena::Block`].
pub use strata_arena as arena;

/// Lazily bound views and processing sessions (`strata-view`).
pub use strata_view as view;

/// Common imports for typical Strata usage.
///
/// ```rust
/// use strata::prelude::*;
/// ```
pub mod prelude {
    // Core contracts
    pub use strata_core::{
        Coord, Evolving, Generation, Lattice, Model, PartialCoord, Region, RegionExt, Symmetric,
    };

    // Errors
    pub use strata_core::{LatticeError, PersistError, StepError};

    // Regions
    pub use strata_region::{
        AsymmetricSection, AsymmetricView, BoxRegion, IsotropicLattice, RegionError,
    };

    // Storage
    pub use strata_arena::{ArenaError, Block, BlockConfig, BlockPlanner, CostModel};

    // Views
    pub use strata_view::{
        run_session, BlockProcessor, CrossSection, CrossSectionCopier, DiagonalCrossSection,
        Slope, Subsection, ViewError,
    };
}
