//! Error types for assessment test operations

use crate::{TestId, WizardStep};
use thiserror::Error;

/// Field or collection rule failures of the authoring form.
///
/// These are queryable state, never thrown across the form boundary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required")]
    Required,

    #[error("Too long: {actual} characters, at most {max} allowed")]
    TooLong { max: usize, actual: usize },

    #[error("Must be at least {min}, got {actual}")]
    BelowMinimum { min: i64, actual: i64 },

    #[error("At least {min} entries required, got {actual}")]
    TooFewItems { min: usize, actual: usize },

    #[error("Answer does not match any current choice")]
    AnswerNotAChoice,

    #[error("Answer matches {matches} choices, expected exactly one")]
    AmbiguousAnswer { matches: usize },
}

/// Submit gating failures of the wizard.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WizardError {
    #[error("Submit is only available from the review step, current step is {step:?}")]
    NotOnReview { step: WizardStep },

    #[error("Form has {errors} validation error(s)")]
    Invalid { errors: usize },
}

/// Failures reported by the persistence collaborator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Assessment test not found: {id}")]
    NotFound { id: TestId },

    #[error("Transport failure: {reason}")]
    Transport { reason: String },
}

impl StoreError {
    pub fn transport(reason: impl Into<String>) -> Self {
        Self::Transport {
            reason: reason.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Failures of an authoring session.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Session is not accepting edits while {phase}")]
    NotEditable { phase: &'static str },

    #[error("Fetched test {id} does not belong to this session")]
    StaleLoad { id: TestId },

    #[error(transparent)]
    Wizard(#[from] WizardError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

// =============================================================================
// TESTS
// =============================================================================
