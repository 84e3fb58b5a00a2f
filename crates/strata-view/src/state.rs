//! Bound/lost state shared by every view.

use strata_core::{LatticeError, StepError};

/// Cached binding of a view, or the reason it was lost.
#[derive(Clone, Debug)]
pub(crate) enum ViewState<B> {
    Bound(B),
    Lost(String),
}

impl<B> ViewState<B> {
    /// The cached binding.
    ///
    /// # Panics
    ///
    /// Panics if the view lost its boundary: bound queries on a lost view
    /// are a usage error.
    #[track_caller]
    pub(crate) fn bound(&self) -> &B {
        match self {
            Self::Bound(b) => b,
            Self::Lost(reason) => panic!("bound query on a view that lost its boundary: {reason}"),
        }
    }

    /// The cached binding, or the read error for a lost view.
    pub(crate) fn readable(&self) -> Result<&B, LatticeError> {
        match self {
            Self::Bound(b) => Ok(b),
            Self::Lost(reason) => Err(LatticeError::BoundaryLost {
                reason: reason.clone(),
            }),
        }
    }

    /// Fail a step on a lost view without touching the source.
    pub(crate) fn steppable(&self, view: impl FnOnce() -> String) -> Result<(), StepError> {
        match self {
            Self::Bound(_) => Ok(()),
            Self::Lost(reason) => Err(StepError::BoundaryLost {
                view: view(),
                reason: reason.clone(),
            }),
        }
    }

    pub(crate) fn is_lost(&self) -> bool {
        matches!(self, Self::Lost(_))
    }
}

/// Reason to record when the source itself failed mid-step.
///
/// A source that lost its boundary can no longer answer bound queries, so
/// any view on it is lost too.
pub(crate) fn inherited_loss(err: &StepError) -> Option<String> {
    match err {
        StepError::BoundaryLost { view, reason } => {
            Some(format!("source '{view}' lost its boundary: {reason}"))
        }
        StepError::Released { what } => Some(format!("the {what} was released")),
        StepError::Transition { .. } => None,
    }
}
