//! Axis-aligned hyperrectangles.

use crate::error::RegionError;
use strata_core::{axis_letter, check_axis, Coord, Region};

/// A hyperrectangle `min[a] <= c[a] <= max[a]` on every axis.
///
/// Constrained bound queries equal the unconstrained ones, so only the
/// required [`Region`] methods are implemented.
///
/// ```
/// use strata_core::{Region, RegionExt};
/// use strata_region::BoxRegion;
///
/// let b = BoxRegion::new(&[0, -1], &[2, 1]).unwrap();
/// assert_eq!(b.cell_count(), 9);
/// assert!(b.contains(&[2, -1]));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoxRegion {
    min: Coord,
    max: Coord,
    labels: Option<Vec<String>>,
}

impl BoxRegion {
    /// Create a box from per-axis inclusive bounds.
    pub fn new(min: &[i32], max: &[i32]) -> Result<Self, RegionError> {
        if min.is_empty() {
            return Err(RegionError::NoAxes);
        }
        if min.len() != max.len() {
            return Err(RegionError::ArityMismatch {
                expected: min.len(),
                got: max.len(),
            });
        }
        if let Some(axis) = (0..min.len()).find(|&a| min[a] > max[a]) {
            return Err(RegionError::InvertedBounds {
                axis,
                min: min[axis],
                max: max[axis],
            });
        }
        Ok(Self {
            min: Coord::from_slice(min),
            max: Coord::from_slice(max),
            labels: None,
        })
    }

    /// The cube `[-radius, radius]` on each of `ndim` axes.
    pub fn cube(ndim: usize, radius: i32) -> Result<Self, RegionError> {
        Self::new(&vec![-radius; ndim], &vec![radius; ndim])
    }

    /// Replace the default axis labels.
    pub fn with_labels<S: Into<String>>(
        mut self,
        labels: impl IntoIterator<Item = S>,
    ) -> Result<Self, RegionError> {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        if labels.len() != self.min.len() {
            return Err(RegionError::ArityMismatch {
                expected: self.min.len(),
                got: labels.len(),
            });
        }
        self.labels = Some(labels);
        Ok(self)
    }

    /// Lower corner.
    pub fn min(&self) -> &[i32] {
        &self.min
    }

    /// Upper corner.
    pub fn max(&self) -> &[i32] {
        &self.max
    }
}

impl Region for BoxRegion {
    fn ndim(&self) -> usize {
        self.min.len()
    }

    fn min_coord(&self, axis: usize) -> i32 {
        check_axis(axis, self.ndim());
        self.min[axis]
    }

    fn max_coord(&self, axis: usize) -> i32 {
        check_axis(axis, self.ndim());
        self.max[axis]
    }

    fn axis_label(&self, axis: usize) -> String {
        check_axis(axis, self.ndim());
        match &self.labels {
            Some(labels) => labels[axis].clone(),
            None => axis_letter(self.ndim(), axis).to_string(),
        }
    }
}
