//! Coordinate tuples, partial coordinates, generations and axis labels.

use smallvec::SmallVec;
use std::fmt;

/// A lattice coordinate: one signed integer per axis.
///
/// `SmallVec<[i32; 4]>` keeps grids of up to four dimensions on the
/// stack. The dimension is a runtime value so that views can drop an
/// axis without type-level arithmetic.
pub type Coord = SmallVec<[i32; 4]>;

/// A coordinate tuple in which any subset of axes may be left unset.
///
/// Used to narrow bound queries: `min_coord_at(axis, partial)` returns
/// the lower bound on `axis` given the values of every fixed axis in
/// `partial`. The value stored for `axis` itself is ignored by the query.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PartialCoord(SmallVec<[Option<i32>; 4]>);

impl PartialCoord {
    /// A partial coordinate of `ndim` axes with nothing fixed.
    pub fn free(ndim: usize) -> Self {
        Self(SmallVec::from_elem(None, ndim))
    }

    /// Build from per-axis optional values.
    pub fn from_options(values: &[Option<i32>]) -> Self {
        Self(SmallVec::from_slice(values))
    }

    /// Builder form of [`fix`](Self::fix).
    pub fn with(mut self, axis: usize, value: i32) -> Self {
        self.fix(axis, value);
        self
    }

    /// Number of axes (fixed or not).
    pub fn ndim(&self) -> usize {
        self.0.len()
    }

    /// Value fixed on `axis`, if any.
    ///
    /// # Panics
    ///
    /// Panics if `axis >= ndim()`.
    pub fn get(&self, axis: usize) -> Option<i32> {
        self.0[axis]
    }

    /// Fix `axis` to `value`.
    pub fn fix(&mut self, axis: usize, value: i32) {
        self.0[axis] = Some(value);
    }

    /// Release the constraint on `axis`.
    pub fn unfix(&mut self, axis: usize) {
        self.0[axis] = None;
    }

    /// Set or clear `axis` in one call.
    pub fn set(&mut self, axis: usize, value: Option<i32>) {
        self.0[axis] = value;
    }

    /// Release every constraint.
    pub fn clear(&mut self) {
        self.0.iter_mut().for_each(|v| *v = None);
    }

    /// Number of fixed axes.
    pub fn fixed_count(&self) -> usize {
        self.0.iter().filter(|v| v.is_some()).count()
    }

    /// `true` if no axis is fixed.
    pub fn is_free(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }

    /// Iterate `(axis, value)` over fixed axes in ascending axis order.
    pub fn iter_fixed(&self) -> impl Iterator<Item = (usize, i32)> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(axis, v)| v.map(|v| (axis, v)))
    }

    /// Per-axis view of the stored options.
    pub fn as_slice(&self) -> &[Option<i32>] {
        &self.0
    }

    /// Convert to a full coordinate if every axis is fixed.
    pub fn to_coord(&self) -> Option<Coord> {
        self.0.iter().copied().collect()
    }
}

impl From<&[i32]> for PartialCoord {
    fn from(coord: &[i32]) -> Self {
        Self(coord.iter().copied().map(Some).collect())
    }
}

impl fmt::Display for PartialCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match v {
                Some(v) => write!(f, "{v}")?,
                None => write!(f, "_")?,
            }
        }
        write!(f, ")")
    }
}

/// Monotonically increasing generation counter.
///
/// Incremented each time a lattice advances one step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(pub u64);

impl Generation {
    /// The generation after this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Generation {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Default label for `axis` in a grid of `ndim` dimensions.
///
/// Grids of fewer than three dimensions use `x`, `y`. Larger grids keep
/// `x`, `y`, `z` for the last three axes and count backwards through the
/// alphabet for the leading ones (`w` for 4D, `v` then `w` for 5D).
pub fn axis_letter(ndim: usize, axis: usize) -> char {
    let code = if ndim < 3 {
        b'x' as usize + axis
    } else {
        b'z' as usize + 1 + axis - ndim
    };
    char::from(code as u8)
}

/// Panic unless `axis < ndim`.
///
/// Axis indices are programmer-controlled; an out-of-range axis is a bug,
/// never a recoverable condition.
#[inline]
#[track_caller]
pub fn check_axis(axis: usize, ndim: usize) {
    assert!(axis < ndim, "axis {axis} out of range for a {ndim}-dimensional region");
}
