//! Submission workflow shared by invoice entry and manual exits
//!
//! `Idle -> Composing -> Validating -> Submitting -> {Succeeded | Failed}`.
//! `Failed` settles back to `Composing` with the offending fields marked and
//! `Succeeded` settles to `Idle`. Nothing is editable or submittable while a
//! submission is in flight.

use std::ops::{Deref, DerefMut};

use serde::Serialize;
use thiserror::Error;

use crate::validation::{FieldMark, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    Idle,
    Composing,
    Validating,
    Submitting,
    Succeeded,
    Failed,
}

impl std::fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionState::Idle => write!(f, "idle"),
            SubmissionState::Composing => write!(f, "composing"),
            SubmissionState::Validating => write!(f, "validating"),
            SubmissionState::Submitting => write!(f, "submitting"),
            SubmissionState::Succeeded => write!(f, "succeeded"),
            SubmissionState::Failed => write!(f, "failed"),
        }
    }
}

/// Recorded when an attempt is dropped before it finishes
pub const INTERRUPTED_MESSAGE: &str = "The submission was interrupted before it finished";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("A submission is already in progress")]
    SubmissionInProgress,

    #[error("Cannot go from {from} to {to}")]
    InvalidTransition {
        from: SubmissionState,
        to: SubmissionState,
    },
}

/// State of one composition
#[derive(Debug, Clone)]
pub struct Workflow {
    state: SubmissionState,
    marks: Vec<FieldMark>,
    last_error: Option<String>,
}

impl Default for Workflow {
    fn default() -> Self {
        Self {
            state: SubmissionState::Idle,
            marks: Vec::new(),
            last_error: None,
        }
    }
}

impl Workflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    /// Fields flagged by the last failed attempt
    pub fn marks(&self) -> &[FieldMark] {
        &self.marks
    }

    /// Message of the last failed attempt
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Whether the submit control should be enabled
    pub fn can_submit(&self) -> bool {
        matches!(self.state, SubmissionState::Idle | SubmissionState::Composing)
    }

    fn is_busy(&self) -> bool {
        matches!(
            self.state,
            SubmissionState::Validating | SubmissionState::Submitting
        )
    }

    fn transition(&mut self, to: SubmissionState) -> Result<(), WorkflowError> {
        use SubmissionState::*;

        let allowed = matches!(
            (self.state, to),
            (Idle, Composing)
                | (Idle, Validating)
                | (Composing, Idle)
                | (Composing, Validating)
                | (Validating, Submitting)
                | (Validating, Failed)
                | (Submitting, Succeeded)
                | (Submitting, Failed)
                | (Succeeded, Idle)
                | (Failed, Composing)
        );

        if !allowed {
            return Err(if self.is_busy() {
                WorkflowError::SubmissionInProgress
            } else {
                WorkflowError::InvalidTransition {
                    from: self.state,
                    to,
                }
            });
        }

        tracing::debug!(from = %self.state, to = %to, "workflow transition");
        self.state = to;
        Ok(())
    }

    /// Record a user edit
    pub fn touch(&mut self) -> Result<(), WorkflowError> {
        match self.state {
            SubmissionState::Composing => Ok(()),
            _ => self.transition(SubmissionState::Composing),
        }
    }

    /// Drop the composition without side effects
    pub fn abandon(&mut self) -> Result<(), WorkflowError> {
        match self.state {
            SubmissionState::Idle => Ok(()),
            _ => {
                self.transition(SubmissionState::Idle)?;
                self.marks.clear();
                self.last_error = None;
                Ok(())
            }
        }
    }

    pub fn begin_validation(&mut self) -> Result<(), WorkflowError> {
        self.transition(SubmissionState::Validating)?;
        self.marks.clear();
        self.last_error = None;
        Ok(())
    }

    /// Start validating and hold the workflow for the rest of the attempt
    pub fn begin_attempt(&mut self) -> Result<Attempt<'_>, WorkflowError> {
        self.begin_validation()?;
        Ok(Attempt { workflow: self })
    }

    pub fn begin_submission(&mut self) -> Result<(), WorkflowError> {
        self.transition(SubmissionState::Submitting)
    }

    /// Mark the attempt failed with the given message and fields
    pub fn fail(&mut self, message: impl Into<String>, marks: Vec<FieldMark>) -> Result<(), WorkflowError> {
        self.transition(SubmissionState::Failed)?;
        self.last_error = Some(message.into());
        self.marks = marks;
        Ok(())
    }

    /// Convenience for a local validation failure
    pub fn fail_validation(&mut self, errors: &[ValidationError]) -> Result<(), WorkflowError> {
        let message = errors
            .first()
            .map(ToString::to_string)
            .unwrap_or_default();
        self.fail(message, errors.iter().map(ValidationError::mark).collect())
    }

    pub fn succeed(&mut self) -> Result<(), WorkflowError> {
        self.transition(SubmissionState::Succeeded)
    }

    /// Move out of a terminal state: `Failed -> Composing`, `Succeeded -> Idle`
    pub fn settle(&mut self) -> Result<(), WorkflowError> {
        match self.state {
            SubmissionState::Failed => self.transition(SubmissionState::Composing),
            SubmissionState::Succeeded => {
                self.transition(SubmissionState::Idle)?;
                self.marks.clear();
                self.last_error = None;
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

/// A submission attempt in progress.
///
/// Dropped while still validating or submitting (the submit future was
/// cancelled), it fails the attempt and settles back to `Composing`.
#[derive(Debug)]
pub struct Attempt<'a> {
    workflow: &'a mut Workflow,
}

impl Deref for Attempt<'_> {
    type Target = Workflow;

    fn deref(&self) -> &Workflow {
        self.workflow
    }
}

impl DerefMut for Attempt<'_> {
    fn deref_mut(&mut self) -> &mut Workflow {
        self.workflow
    }
}

impl Drop for Attempt<'_> {
    fn drop(&mut self) {
        if !self.workflow.is_busy() {
            return;
        }
        tracing::warn!(state = %self.workflow.state, "submission interrupted");
        let workflow = &mut *self.workflow;
        if let Err(e) = workflow
            .fail(INTERRUPTED_MESSAGE, Vec::new())
            .and_then(|_| workflow.settle())
        {
            tracing::error!(error = %e, "could not recover interrupted submission");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let mut wf = Workflow::new();
        wf.touch().unwrap();
        assert_eq!(wf.state(), SubmissionState::Composing);
        wf.begin_validation().unwrap();
        wf.begin_submission().unwrap();
        assert!(!wf.can_submit());
        wf.succeed().unwrap();
        assert_eq!(wf.state(), SubmissionState::Succeeded);
        wf.settle().unwrap();
        assert_eq!(wf.state(), SubmissionState::Idle);
    }

    #[test]
    fn test_failure_returns_to_composing_with_marks() {
        let mut wf = Workflow::new();
        wf.touch().unwrap();
        wf.begin_validation().unwrap();
        wf.fail_validation(&[ValidationError::MissingInvoiceNumber]).unwrap();
        assert_eq!(wf.state(), SubmissionState::Failed);
        wf.settle().unwrap();

        assert_eq!(wf.state(), SubmissionState::Composing);
        assert_eq!(wf.marks()[0].field, "invoiceNumber");
        assert_eq!(wf.last_error(), Some("Invoice number is required"));
    }

    #[test]
    fn test_no_edits_or_second_submit_while_submitting() {
        let mut wf = Workflow::new();
        wf.begin_validation().unwrap();
        wf.begin_submission().unwrap();

        assert_eq!(wf.touch(), Err(WorkflowError::SubmissionInProgress));
        assert_eq!(wf.begin_validation(), Err(WorkflowError::SubmissionInProgress));
        assert_eq!(wf.abandon(), Err(WorkflowError::SubmissionInProgress));
    }

    #[test]
    fn test_dropped_attempt_returns_to_composing() {
        let mut wf = Workflow::new();
        wf.touch().unwrap();
        {
            let mut attempt = wf.begin_attempt().unwrap();
            attempt.begin_submission().unwrap();
            assert_eq!(attempt.state(), SubmissionState::Submitting);
        }

        assert_eq!(wf.state(), SubmissionState::Composing);
        assert_eq!(wf.last_error(), Some(INTERRUPTED_MESSAGE));
        wf.abandon().unwrap();
        assert_eq!(wf.state(), SubmissionState::Idle);
    }

    #[test]
    fn test_finished_attempt_is_left_alone() {
        let mut wf = Workflow::new();
        {
            let mut attempt = wf.begin_attempt().unwrap();
            attempt.begin_submission().unwrap();
            attempt.succeed().unwrap();
            attempt.settle().unwrap();
        }

        assert_eq!(wf.state(), SubmissionState::Idle);
        assert_eq!(wf.last_error(), None);
    }

    #[test]
    fn test_abandon_while_composing() {
        let mut wf = Workflow::new();
        wf.touch().unwrap();
        wf.abandon().unwrap();
        assert_eq!(wf.state(), SubmissionState::Idle);
    }

    #[test]
    fn test_invalid_transition() {
        let mut wf = Workflow::new();
        assert_eq!(
            wf.succeed(),
            Err(WorkflowError::InvalidTransition {
                from: SubmissionState::Idle,
                to: SubmissionState::Succeeded,
            })
        );
    }
}
