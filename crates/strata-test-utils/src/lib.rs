//! Test utilities and mock models for Strata development.
//!
//! Provides evolving mock lattices ([`ScheduledBox`], [`GrowingPyramid`]),
//! region contract checks in [`compliance`], and [`init_tracing`] for
//! seeing library logs in test output.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod compliance;
pub mod fixtures;

pub use fixtures::{GrowingPyramid, PersistLog, ScheduledBox};

use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber writing through the test harness.
///
/// Filtered by `RUST_LOG` (e.g. `RUST_LOG=strata_view=trace`). Safe to call
/// from every test; only the first call installs anything.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
