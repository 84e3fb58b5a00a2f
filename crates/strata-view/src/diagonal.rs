//! Views along a diagonal `axis2 = slope * axis1 + offset`.
//!
//! The shape of such a view over an irregular source has no closed form.
//! Bounds are discovered by scanning: walk `axis1` from the source's lower
//! bound until the paired `axis2` coordinate first falls inside the source,
//! then keep walking while it stays inside, widening the other axes'
//! bounds at every step. The scan is re-run after every step of the source
//! because its boundary may move arbitrarily.

use crate::error::ViewError;
use crate::state::{inherited_loss, ViewState};
use strata_core::{
    check_axis, debug_assert_partial_within, Coord, Evolving, Generation, Lattice, LatticeError,
    PartialCoord, PersistError, Region, RegionExt, StepError,
};
use tracing::{debug, trace, warn};

/// Sign of a diagonal relation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Slope {
    /// `axis2 = axis1 + offset`.
    Positive,
    /// `axis2 = -axis1 + offset`.
    Negative,
}

impl Slope {
    /// `1` or `-1`.
    pub fn value(self) -> i64 {
        match self {
            Self::Positive => 1,
            Self::Negative => -1,
        }
    }
}

/// Bounds found by the scan, indexed by view axis.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Extent {
    min: Coord,
    max: Coord,
}

/// The `ndim - 1` dimensional view of the cells satisfying
/// `axis2 = slope * axis1 + offset`.
///
/// Axes are normalised so that `axis1 < axis2`; the view keeps `axis1`
/// and drops `axis2`. View axis `i` is source axis `i` below `axis2` and
/// `i + 1` from there on.
///
/// ```
/// use strata_core::Region;
/// use strata_region::AsymmetricSection;
/// use strata_view::{DiagonalCrossSection, Slope};
///
/// let triangle = AsymmetricSection::new(2, 5, 0u8).unwrap();
/// let diagonal = DiagonalCrossSection::new(&triangle, 0, 1, Slope::Positive, 0).unwrap();
/// assert_eq!((diagonal.min_coord(0), diagonal.max_coord(0)), (0, 5));
/// ```
#[derive(Clone, Debug)]
pub struct DiagonalCrossSection<S> {
    source: S,
    axis1: usize,
    axis2: usize,
    slope: Slope,
    offset: i32,
    state: ViewState<Extent>,
}

impl<S: Region> DiagonalCrossSection<S> {
    /// Bind the view by scanning the source.
    ///
    /// If `axis1 > axis2` the axes are swapped; for a positive slope this
    /// negates the offset, for a negative slope the offset is unchanged.
    pub fn new(
        source: S,
        axis1: usize,
        axis2: usize,
        slope: Slope,
        offset: i32,
    ) -> Result<Self, ViewError> {
        let ndim = source.ndim();
        if ndim < 2 {
            return Err(ViewError::DimensionTooSmall { ndim, required: 2 });
        }
        if let Some(axis) = [axis1, axis2].into_iter().find(|&a| a >= ndim) {
            return Err(ViewError::AxisOutOfRange { axis, ndim });
        }
        if axis1 == axis2 {
            return Err(ViewError::SameAxis { axis: axis1 });
        }
        let (axis1, axis2, offset) = if axis1 < axis2 {
            (axis1, axis2, offset)
        } else {
            let offset = match slope {
                Slope::Positive => offset.checked_neg().ok_or_else(|| {
                    ViewError::NoIntersection {
                        relation: format!("offset {offset}"),
                    }
                })?,
                Slope::Negative => offset,
            };
            (axis2, axis1, offset)
        };
        let mut view = Self {
            source,
            axis1,
            axis2,
            slope,
            offset,
            state: ViewState::Lost(String::new()),
        };
        let extent = view.scan().ok_or_else(|| ViewError::NoIntersection {
            relation: view.relation(),
        })?;
        debug!(
            relation = %view.relation(),
            first = extent.min[axis1],
            last = extent.max[axis1],
            "diagonal cross-section bound"
        );
        view.state = ViewState::Bound(extent);
        Ok(view)
    }

    /// The kept source axis.
    pub fn axis1(&self) -> usize {
        self.axis1
    }

    /// The dropped source axis, determined by `axis1`.
    pub fn axis2(&self) -> usize {
        self.axis2
    }

    /// Sign of the relation.
    pub fn slope(&self) -> Slope {
        self.slope
    }

    /// Offset of the relation after normalisation.
    pub fn offset(&self) -> i32 {
        self.offset
    }

    /// The underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Unwrap the source.
    pub fn into_source(self) -> S {
        self.source
    }

    /// `true` once a step moved the source away from the relation.
    pub fn is_lost(&self) -> bool {
        self.state.is_lost()
    }

    /// The relation in storage-path form, e.g. `z=-x+2`.
    pub fn relation(&self) -> String {
        let mut rel = format!(
            "{}={}{}",
            self.source.axis_label(self.axis2),
            if self.slope == Slope::Negative { "-" } else { "" },
            self.source.axis_label(self.axis1)
        );
        if self.offset > 0 {
            rel.push_str(&format!("+{}", self.offset));
        } else if self.offset < 0 {
            rel.push_str(&self.offset.to_string());
        }
        rel
    }

    /// `axis2` coordinate paired with `c1`, if it is representable.
    fn paired(&self, c1: i32) -> Option<i32> {
        i32::try_from(self.slope.value() * i64::from(c1) + i64::from(self.offset)).ok()
    }

    fn source_axis(&self, axis: usize) -> usize {
        check_axis(axis, self.ndim());
        if axis < self.axis2 {
            axis
        } else {
            axis + 1
        }
    }

    /// Source partial coordinate for a view partial, with `axis1` (and
    /// its paired `axis2`) overridden by `c1` when given.
    fn lift(&self, partial: &PartialCoord, c1: Option<i32>) -> PartialCoord {
        let mut lifted = PartialCoord::free(self.source.ndim());
        for (axis, v) in partial.iter_fixed() {
            lifted.fix(self.source_axis(axis), v);
        }
        if let Some(c1) = c1 {
            lifted.fix(self.axis1, c1);
        }
        if let Some(c2) = lifted.get(self.axis1).and_then(|c1| self.paired(c1)) {
            lifted.fix(self.axis2, c2);
        }
        lifted
    }

    fn lift_coord(&self, coord: &[i32]) -> Option<Coord> {
        let c2 = self.paired(coord[self.axis1])?;
        let mut lifted = Coord::with_capacity(coord.len() + 1);
        lifted.extend_from_slice(&coord[..self.axis2]);
        lifted.push(c2);
        lifted.extend_from_slice(&coord[self.axis2..]);
        Some(lifted)
    }

    /// `true` if the relation at `c1` lands inside the source on `axis2`.
    /// Leaves `p` with `axis1` and `axis2` fixed when it does.
    fn on_source(&self, p: &mut PartialCoord, c1: i32) -> bool {
        p.fix(self.axis1, c1);
        p.unfix(self.axis2);
        let Some(c2) = self.paired(c1) else {
            return false;
        };
        let lo = self.source.min_coord_at(self.axis2, p);
        let hi = self.source.max_coord_at(self.axis2, p);
        if c2 < lo || c2 > hi {
            return false;
        }
        p.fix(self.axis2, c2);
        true
    }

    fn scan(&self) -> Option<Extent> {
        let src_ndim = self.source.ndim();
        let (lo1, hi1) = (
            self.source.min_coord(self.axis1),
            self.source.max_coord(self.axis1),
        );
        let mut p = PartialCoord::free(src_ndim);
        let first = (lo1..=hi1).find(|&c1| self.on_source(&mut p, c1))?;

        let ndim = src_ndim - 1;
        let mut min = Coord::from_elem(i32::MAX, ndim);
        let mut max = Coord::from_elem(i32::MIN, ndim);
        let mut c1 = first;
        loop {
            for axis in (0..ndim).filter(|&a| a != self.axis1) {
                let s = self.source_axis(axis);
                min[axis] = min[axis].min(self.source.min_coord_at(s, &p));
                max[axis] = max[axis].max(self.source.max_coord_at(s, &p));
            }
            min[self.axis1] = first;
            max[self.axis1] = c1;
            if c1 == hi1 || !self.on_source(&mut p, c1 + 1) {
                break;
            }
            c1 += 1;
        }
        Some(Extent { min, max })
    }

    /// Every `axis1` value in the extent whose lifted point lies inside the
    /// source given the other fixed axes of `partial`.
    fn valid_points<'a>(
        &'a self,
        extent: &Extent,
        partial: &'a PartialCoord,
    ) -> impl DoubleEndedIterator<Item = PartialCoord> + 'a {
        (extent.min[self.axis1]..=extent.max[self.axis1])
            .map(move |c1| self.lift(partial, Some(c1)))
            .filter(move |lifted| self.source.contains_partial(lifted))
    }
}

impl<S: Region> Region for DiagonalCrossSection<S> {
    fn ndim(&self) -> usize {
        self.source.ndim() - 1
    }

    fn min_coord(&self, axis: usize) -> i32 {
        check_axis(axis, self.ndim());
        self.state.bound().min[axis]
    }

    fn max_coord(&self, axis: usize) -> i32 {
        check_axis(axis, self.ndim());
        self.state.bound().max[axis]
    }

    /// Exact lower bound given `fixed`.
    ///
    /// On `axis1` this is the first point of the extent inside the source;
    /// on other axes with `axis1` free it is the least source bound over
    /// every such point. An empty range (`min > max`) means no cell of the
    /// view matches `fixed`.
    fn min_coord_at(&self, axis: usize, fixed: &PartialCoord) -> i32 {
        check_axis(axis, self.ndim());
        debug_assert_partial_within(self, axis, fixed);
        let extent = self.state.bound();
        let mut partial = fixed.clone();
        partial.unfix(axis);
        if axis == self.axis1 {
            return self
                .valid_points(extent, &partial)
                .next()
                .and_then(|p| p.get(self.axis1))
                .unwrap_or_else(|| extent.max[axis].saturating_add(1));
        }
        let s = self.source_axis(axis);
        if partial.get(self.axis1).is_some() {
            return self.source.min_coord_at(s, &self.lift(&partial, None));
        }
        self.valid_points(extent, &partial)
            .map(|p| self.source.min_coord_at(s, &p))
            .min()
            .unwrap_or_else(|| extent.max[axis].saturating_add(1))
    }

    /// Exact upper bound given `fixed`; mirror of the lower bound.
    fn max_coord_at(&self, axis: usize, fixed: &PartialCoord) -> i32 {
        check_axis(axis, self.ndim());
        debug_assert_partial_within(self, axis, fixed);
        let extent = self.state.bound();
        let mut partial = fixed.clone();
        partial.unfix(axis);
        if axis == self.axis1 {
            return self
                .valid_points(extent, &partial)
                .next_back()
                .and_then(|p| p.get(self.axis1))
                .unwrap_or_else(|| extent.min[axis].saturating_sub(1));
        }
        let s = self.source_axis(axis);
        if partial.get(self.axis1).is_some() {
            return self.source.max_coord_at(s, &self.lift(&partial, None));
        }
        self.valid_points(extent, &partial)
            .map(|p| self.source.max_coord_at(s, &p))
            .max()
            .unwrap_or_else(|| extent.min[axis].saturating_sub(1))
    }

    fn axis_label(&self, axis: usize) -> String {
        self.source.axis_label(self.source_axis(axis))
    }
}

impl<S: Lattice> Lattice for DiagonalCrossSection<S> {
    type Value = S::Value;

    fn read(&self, coord: &[i32]) -> Result<S::Value, LatticeError> {
        self.state.readable()?;
        let lifted = (coord.len() == self.ndim())
            .then(|| self.lift_coord(coord))
            .flatten()
            .ok_or_else(|| LatticeError::OutOfBounds {
                coord: Coord::from_slice(coord),
                bounds: self.relation(),
            })?;
        self.source.read(&lifted)
    }
}

impl<S: Region + Evolving> Evolving for DiagonalCrossSection<S> {
    fn step(&mut self) -> Result<bool, StepError> {
        self.state.steppable(|| self.storage_path())?;
        let changed = match self.source.step() {
            Ok(changed) => changed,
            Err(e) => {
                if let Some(reason) = inherited_loss(&e) {
                    self.state = ViewState::Lost(reason);
                }
                return Err(e);
            }
        };
        match self.scan() {
            Some(extent) => {
                trace!(
                    first = extent.min[self.axis1],
                    last = extent.max[self.axis1],
                    "diagonal cross-section refreshed"
                );
                self.state = ViewState::Bound(extent);
                Ok(changed)
            }
            None => {
                let view = self.storage_path();
                let reason = format!("{} no longer intersects the source", self.relation());
                warn!(%view, %reason, "diagonal cross-section lost its boundary");
                self.state = ViewState::Lost(reason.clone());
                Err(StepError::BoundaryLost { view, reason })
            }
        }
    }

    fn generation(&self) -> Generation {
        self.source.generation()
    }

    fn name(&self) -> String {
        self.source.name()
    }

    fn storage_path(&self) -> String {
        format!("{}/{}", self.source.storage_path(), self.relation())
    }

    fn persist(&self, dir: &str, name: &str) -> Result<(), PersistError> {
        self.source.persist(dir, name)
    }
}
