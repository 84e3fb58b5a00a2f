//! Streaming block-processing sessions.
//!
//! A session has three phases: [`BlockProcessor::before_processing`], one
//! [`BlockProcessor::process_block`] per disjoint block delivered by the
//! upstream pipeline, then [`BlockProcessor::after_processing`]. Sessions
//! never nest, and results assembled during a session are only exposed
//! once it has ended.

use crate::cross_section::CrossSection;
use crate::error::ViewError;
use indexmap::{IndexMap, IndexSet};
use strata_core::{check_axis, Coord, Lattice, LatticeError, Region, RegionExt};
use tracing::debug;

/// A consumer of the blocks of one pass over a lattice.
pub trait BlockProcessor<B: ?Sized> {
    /// Open a session. Fails with [`ViewError::SessionOpen`] if one is
    /// already open.
    fn before_processing(&mut self) -> Result<(), ViewError>;

    /// Consume one block of the current session.
    fn process_block(&mut self, block: &B) -> Result<(), ViewError>;

    /// Close the session and publish its results.
    fn after_processing(&mut self) -> Result<(), ViewError>;

    /// Close the session without publishing anything.
    fn abort_processing(&mut self) {}
}

/// Drive one full session of `processor` over `blocks`.
///
/// A failure while processing aborts the session before the error is
/// returned.
pub fn run_session<'b, B, P, I>(processor: &mut P, blocks: I) -> Result<(), ViewError>
where
    B: ?Sized + 'b,
    P: BlockProcessor<B> + ?Sized,
    I: IntoIterator<Item = &'b B>,
{
    processor.before_processing()?;
    for block in blocks {
        if let Err(e) = processor.process_block(block) {
            processor.abort_processing();
            return Err(e);
        }
    }
    processor.after_processing()
}

/// Cells copied out of a lattice, keyed by coordinate.
///
/// The region is the bounding box of the copied cells; reading a
/// coordinate that was not copied fails with
/// [`LatticeError::OutOfBounds`].
#[derive(Clone, Debug, PartialEq)]
pub struct CopiedSection<T> {
    ndim: usize,
    cells: IndexMap<Coord, T>,
    min: Coord,
    max: Coord,
}

impl<T> CopiedSection<T> {
    fn new(ndim: usize, cells: IndexMap<Coord, T>) -> Self {
        let mut min = Coord::from_elem(i32::MAX, ndim);
        let mut max = Coord::from_elem(i32::MIN, ndim);
        for coord in cells.keys() {
            for (axis, &c) in coord.iter().enumerate() {
                min[axis] = min[axis].min(c);
                max[axis] = max[axis].max(c);
            }
        }
        Self {
            ndim,
            cells,
            min,
            max,
        }
    }

    /// Number of copied cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// `true` if nothing was copied.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Borrow a copied cell.
    pub fn get(&self, coord: &[i32]) -> Option<&T> {
        self.cells.get(coord)
    }

    /// Iterate copied cells in the order they were copied.
    pub fn iter(&self) -> impl Iterator<Item = (&Coord, &T)> + '_ {
        self.cells.iter()
    }
}

impl<T> Region for CopiedSection<T> {
    fn ndim(&self) -> usize {
        self.ndim
    }

    fn min_coord(&self, axis: usize) -> i32 {
        check_axis(axis, self.ndim);
        self.min[axis]
    }

    fn max_coord(&self, axis: usize) -> i32 {
        check_axis(axis, self.ndim);
        self.max[axis]
    }
}

impl<T: Clone> Lattice for CopiedSection<T> {
    type Value = T;

    fn read(&self, coord: &[i32]) -> Result<T, LatticeError> {
        self.cells
            .get(coord)
            .cloned()
            .ok_or_else(|| LatticeError::OutOfBounds {
                coord: Coord::from_slice(coord),
                bounds: format!("{} copied cells", self.cells.len()),
            })
    }
}

/// Assembles full cross-sections at `axis = k` from disjoint blocks.
///
/// Requests are registered between sessions with
/// [`request_copy`](Self::request_copy); the next session consumes them.
///
/// ```
/// use strata_arena::{Block, BlockPlan};
/// use strata_view::{run_session, CrossSectionCopier};
///
/// let plan = |min, max| BlockPlan { ndim: 2, min, max, planned_bytes: 0 };
/// let blocks = [
///     Block::from_plan_with(plan(0, 2), |c| c[0] + c[1]).unwrap(),
///     Block::from_plan_with(plan(3, 5), |c| c[0] + c[1]).unwrap(),
/// ];
///
/// let mut copier = CrossSectionCopier::new(1);
/// copier.request_copy(2).unwrap();
/// run_session(&mut copier, &blocks).unwrap();
///
/// // y = 2 holds x in [2, 5], spread over both blocks.
/// assert_eq!(copier.copy(2).map(|c| c.len()), Some(4));
/// ```
#[derive(Clone, Debug)]
pub struct CrossSectionCopier<T> {
    axis: usize,
    requested: IndexSet<i32>,
    session: Option<IndexMap<i32, IndexMap<Coord, T>>>,
    session_ndim: Option<usize>,
    results: IndexMap<i32, CopiedSection<T>>,
}

impl<T> CrossSectionCopier<T> {
    /// A copier of cross-sections perpendicular to `axis`.
    pub fn new(axis: usize) -> Self {
        Self {
            axis,
            requested: IndexSet::new(),
            session: None,
            session_ndim: None,
            results: IndexMap::new(),
        }
    }

    /// The fixed axis.
    pub fn axis(&self) -> usize {
        self.axis
    }

    /// Queue a copy of the cross-section at `coord` for the next session.
    pub fn request_copy(&mut self, coord: i32) -> Result<(), ViewError> {
        if self.session.is_some() {
            return Err(ViewError::SessionOpen);
        }
        self.requested.insert(coord);
        Ok(())
    }

    /// `true` while a session is open.
    pub fn is_processing(&self) -> bool {
        self.session.is_some()
    }

    /// A completed copy, if one was published.
    pub fn copy(&self, coord: i32) -> Option<&CopiedSection<T>> {
        self.results.get(&coord)
    }

    /// Remove and return a completed copy.
    pub fn take_copy(&mut self, coord: i32) -> Option<CopiedSection<T>> {
        self.results.shift_remove(&coord)
    }
}

impl<B, T> BlockProcessor<B> for CrossSectionCopier<T>
where
    B: Lattice<Value = T> + ?Sized,
    T: Clone,
{
    fn before_processing(&mut self) -> Result<(), ViewError> {
        if self.session.is_some() {
            return Err(ViewError::SessionOpen);
        }
        let pending: IndexMap<i32, IndexMap<Coord, T>> = self
            .requested
            .drain(..)
            .map(|k| (k, IndexMap::new()))
            .collect();
        debug!(axis = self.axis, copies = pending.len(), "copy session opened");
        self.session = Some(pending);
        self.session_ndim = None;
        Ok(())
    }

    fn process_block(&mut self, block: &B) -> Result<(), ViewError> {
        let axis = self.axis;
        let session = self.session.as_mut().ok_or(ViewError::SessionNotOpen)?;
        let ndim = block.ndim();
        if axis >= ndim {
            return Err(ViewError::AxisOutOfRange { axis, ndim });
        }
        self.session_ndim = Some(ndim - 1);
        let (lo, hi) = (block.min_coord(axis), block.max_coord(axis));
        for (&k, cells) in session.iter_mut().filter(|(k, _)| (lo..=hi).contains(*k)) {
            let view = CrossSection::new(block, axis, k)?;
            for coord in view.positions() {
                let value = view.read(&coord)?;
                cells.insert(coord, value);
            }
        }
        Ok(())
    }

    fn after_processing(&mut self) -> Result<(), ViewError> {
        let session = self.session.take().ok_or(ViewError::SessionNotOpen)?;
        let Some(ndim) = self.session_ndim.take() else {
            debug!(axis = self.axis, "copy session closed without blocks");
            return Ok(());
        };
        for (k, cells) in session {
            if !cells.is_empty() {
                self.results.insert(k, CopiedSection::new(ndim, cells));
            }
        }
        debug!(axis = self.axis, published = self.results.len(), "copy session closed");
        Ok(())
    }

    fn abort_processing(&mut self) {
        if self.session.take().is_some() {
            debug!(axis = self.axis, "copy session aborted");
        }
        self.session_ndim = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `[0, 3] x [0, 3]` split into row bands, value `10x + y`.
    struct Band {
        rows: (i32, i32),
    }

    impl Region for Band {
        fn ndim(&self) -> usize {
            2
        }
        fn min_coord(&self, axis: usize) -> i32 {
            if axis == 1 {
                self.rows.0
            } else {
                0
            }
        }
        fn max_coord(&self, axis: usize) -> i32 {
            if axis == 1 {
                self.rows.1
            } else {
                3
            }
        }
    }

    impl Lattice for Band {
        type Value = i32;
        fn read(&self, c: &[i32]) -> Result<i32, LatticeError> {
            Ok(10 * c[0] + c[1])
        }
    }

    fn bands() -> Vec<Band> {
        vec![Band { rows: (0, 1) }, Band { rows: (2, 3) }]
    }

    #[test]
    fn copies_assemble_across_blocks() {
        let mut copier = CrossSectionCopier::new(0);
        copier.request_copy(2).unwrap();
        run_session(&mut copier, &bands()).unwrap();
        let copy = copier.copy(2).unwrap();
        assert_eq!(copy.len(), 4);
        assert_eq!(copy.read(&[3]).unwrap(), 23);
        assert_eq!((copy.min_coord(0), copy.max_coord(0)), (0, 3));
    }

    #[test]
    fn requests_rejected_while_open() {
        let mut copier: CrossSectionCopier<i32> = CrossSectionCopier::new(1);
        BlockProcessor::<Band>::before_processing(&mut copier).unwrap();
        assert_eq!(copier.request_copy(0), Err(ViewError::SessionOpen));
        assert_eq!(
            BlockProcessor::<Band>::before_processing(&mut copier),
            Err(ViewError::SessionOpen)
        );
    }

    #[test]
    fn results_hidden_until_session_ends() {
        let blocks = bands();
        let mut copier = CrossSectionCopier::new(1);
        copier.request_copy(3).unwrap();
        BlockProcessor::<Band>::before_processing(&mut copier).unwrap();
        for b in &blocks {
            copier.process_block(b).unwrap();
        }
        assert!(copier.copy(3).is_none());
        BlockProcessor::<Band>::after_processing(&mut copier).unwrap();
        assert_eq!(copier.copy(3).map(CopiedSection::len), Some(4));
        assert!(copier.take_copy(3).is_some());
        assert!(copier.copy(3).is_none());
    }

    #[test]
    fn phases_outside_session_fail() {
        let mut copier: CrossSectionCopier<i32> = CrossSectionCopier::new(0);
        assert_eq!(
            copier.process_block(&Band { rows: (0, 1) }),
            Err(ViewError::SessionNotOpen)
        );
        assert_eq!(
            BlockProcessor::<Band>::after_processing(&mut copier),
            Err(ViewError::SessionNotOpen)
        );
    }
}
