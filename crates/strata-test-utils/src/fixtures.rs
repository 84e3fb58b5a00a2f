//! Evolving mock lattices.
//!
//! - [`ScheduledBox`]: a hyperrectangle whose bounds follow a per-generation
//!   schedule, for driving views across boundary changes.
//! - [`GrowingPyramid`]: a canonical ordered orthant whose extent grows by
//!   one every step, like the asymmetric section of a spreading automaton.

use std::cell::RefCell;
use std::rc::Rc;
use strata_core::{
    Coord, Evolving, Generation, Lattice, LatticeError, PartialCoord, PersistError, Region,
    RegionExt, StepError,
};
use strata_region::{AsymmetricSection, BoxRegion};

/// Shared record of `persist(dir, name)` calls that reached a root model.
#[derive(Clone, Debug, Default)]
pub struct PersistLog(Rc<RefCell<Vec<(String, String)>>>);

impl PersistLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every recorded `(dir, name)` pair, oldest first.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.0.borrow().clone()
    }

    fn record(&self, dir: &str, name: &str) {
        self.0.borrow_mut().push((dir.to_string(), name.to_string()));
    }
}

/// Value of `coord` at `generation` in every mock model.
pub fn mock_value(coord: &[i32], generation: u64) -> i64 {
    coord
        .iter()
        .fold(generation as i64, |acc, &c| acc * 1_000 + i64::from(c))
}

/// A box lattice whose bounds at generation `g` are `schedule[g]`
/// (the last entry repeats).
pub struct ScheduledBox {
    name: String,
    schedule: Vec<BoxRegion>,
    generation: Generation,
    fail_at: Option<u64>,
    persisted: PersistLog,
}

impl ScheduledBox {
    /// # Panics
    ///
    /// Panics if `schedule` is empty.
    pub fn new(name: impl Into<String>, schedule: Vec<BoxRegion>) -> Self {
        assert!(!schedule.is_empty(), "schedule needs at least one region");
        Self {
            name: name.into(),
            schedule,
            generation: Generation::default(),
            fail_at: None,
            persisted: PersistLog::new(),
        }
    }

    /// A box that never changes.
    pub fn fixed(name: impl Into<String>, region: BoxRegion) -> Self {
        Self::new(name, vec![region])
    }

    /// Make the step into generation `generation` fail with a transition error.
    pub fn failing_at(mut self, generation: u64) -> Self {
        self.fail_at = Some(generation);
        self
    }

    pub fn persist_log(&self) -> PersistLog {
        self.persisted.clone()
    }

    fn current(&self) -> &BoxRegion {
        let idx = (self.generation.0 as usize).min(self.schedule.len() - 1);
        &self.schedule[idx]
    }
}

impl Region for ScheduledBox {
    fn ndim(&self) -> usize {
        self.current().ndim()
    }
    fn min_coord(&self, axis: usize) -> i32 {
        self.current().min_coord(axis)
    }
    fn max_coord(&self, axis: usize) -> i32 {
        self.current().max_coord(axis)
    }
}

impl Lattice for ScheduledBox {
    type Value = i64;

    fn read(&self, coord: &[i32]) -> Result<i64, LatticeError> {
        if !self.contains(coord) {
            return Err(LatticeError::OutOfBounds {
                coord: Coord::from_slice(coord),
                bounds: self.describe_bounds(),
            });
        }
        Ok(mock_value(coord, self.generation.0))
    }
}

impl Evolving for ScheduledBox {
    fn step(&mut self) -> Result<bool, StepError> {
        let next = self.generation.next();
        if self.fail_at == Some(next.0) {
            return Err(StepError::Transition {
                reason: format!("scripted failure at generation {next}"),
            });
        }
        let before = self.current().clone();
        self.generation = next;
        Ok(*self.current() != before || next.0 < self.schedule.len() as u64)
    }

    fn generation(&self) -> Generation {
        self.generation
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn storage_path(&self) -> String {
        self.name.clone()
    }

    fn persist(&self, dir: &str, name: &str) -> Result<(), PersistError> {
        self.persisted.record(dir, name);
        Ok(())
    }
}

/// The canonical orthant `c0 >= ... >= 0`, `c0 <= initial + generation`.
pub struct GrowingPyramid {
    section: AsymmetricSection<i64>,
    generation: Generation,
    persisted: PersistLog,
}

impl GrowingPyramid {
    /// # Panics
    ///
    /// Panics if `ndim == 0` or `initial < 0`.
    pub fn new(ndim: usize, initial: i32) -> Self {
        let section = AsymmetricSection::from_fn(ndim, initial, |c| mock_value(c, 0))
            .unwrap_or_else(|e| panic!("invalid pyramid: {e}"));
        Self {
            section,
            generation: Generation::default(),
            persisted: PersistLog::new(),
        }
    }

    pub fn persist_log(&self) -> PersistLog {
        self.persisted.clone()
    }

    pub fn extent(&self) -> i32 {
        self.section.max()
    }
}

impl Region for GrowingPyramid {
    fn ndim(&self) -> usize {
        self.section.ndim()
    }
    fn min_coord(&self, axis: usize) -> i32 {
        self.section.min_coord(axis)
    }
    fn max_coord(&self, axis: usize) -> i32 {
        self.section.max_coord(axis)
    }
    fn min_coord_at(&self, axis: usize, fixed: &PartialCoord) -> i32 {
        self.section.min_coord_at(axis, fixed)
    }
    fn max_coord_at(&self, axis: usize, fixed: &PartialCoord) -> i32 {
        self.section.max_coord_at(axis, fixed)
    }
}

impl Lattice for GrowingPyramid {
    type Value = i64;

    fn read(&self, coord: &[i32]) -> Result<i64, LatticeError> {
        self.section.read(coord)
    }
}

impl Evolving for GrowingPyramid {
    fn step(&mut self) -> Result<bool, StepError> {
        let next = self.generation.next();
        let section = AsymmetricSection::from_fn(self.ndim(), self.extent() + 1, |c| {
            mock_value(c, next.0)
        })
        .map_err(|e| StepError::Transition {
            reason: e.to_string(),
        })?;
        self.section = section;
        self.generation = next;
        Ok(true)
    }

    fn generation(&self) -> Generation {
        self.generation
    }

    fn name(&self) -> String {
        "pyramid".to_string()
    }

    fn storage_path(&self) -> String {
        "pyramid".to_string()
    }

    fn persist(&self, dir: &str, name: &str) -> Result<(), PersistError> {
        self.persisted.record(dir, name);
        Ok(())
    }
}
