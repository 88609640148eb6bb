//! Pipeline stages and the outcome reported to the caller

use crate::error::StageError;
use crate::types::SubmissionId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One step of the fixed pipeline sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Intake invariants
    Validating,
    /// Advisory generation
    Advising,
    /// External log append
    Logging,
    /// Report rendering
    Rendering,
    /// Email delivery
    Notifying,
}

impl Stage {
    /// All stages in execution order
    pub const ALL: [Stage; 5] = [
        Stage::Validating,
        Stage::Advising,
        Stage::Logging,
        Stage::Rendering,
        Stage::Notifying,
    ];

    /// Stable lowercase name, used in logs and CLI output
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Validating => "validating",
            Stage::Advising => "advising",
            Stage::Logging => "logging",
            Stage::Rendering => "rendering",
            Stage::Notifying => "notifying",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal status of one pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeStatus {
    /// Report was sent
    Succeeded,
    /// First stage that failed, and why
    FailedAtStage {
        /// Failing stage
        stage: Stage,
        /// Stage error
        cause: StageError,
    },
}

/// Result of a pipeline run as seen by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryOutcome {
    /// Correlates the run's log lines
    pub submission_id: SubmissionId,
    /// Terminal status
    pub status: OutcomeStatus,
    /// Advisory text, present whenever advising succeeded
    pub advisory_text: Option<String>,
}

impl DeliveryOutcome {
    /// Successful run
    #[must_use]
    pub fn succeeded(submission_id: SubmissionId, advisory_text: String) -> Self {
        Self {
            submission_id,
            status: OutcomeStatus::Succeeded,
            advisory_text: Some(advisory_text),
        }
    }

    /// Failed run; the stage is taken from the error
    #[must_use]
    pub fn failed(
        submission_id: SubmissionId,
        cause: impl Into<StageError>,
        advisory_text: Option<String>,
    ) -> Self {
        let cause = cause.into();
        Self {
            submission_id,
            status: OutcomeStatus::FailedAtStage {
                stage: cause.stage(),
                cause,
            },
            advisory_text,
        }
    }

    /// Report reached the requester
    #[inline]
    #[must_use]
    pub fn is_done(&self) -> bool {
        matches!(self.status, OutcomeStatus::Succeeded)
    }

    /// Stage the run stopped at, if it failed
    #[inline]
    #[must_use]
    pub fn failed_stage(&self) -> Option<Stage> {
        match &self.status {
            OutcomeStatus::Succeeded => None,
            OutcomeStatus::FailedAtStage { stage, .. } => Some(*stage),
        }
    }

    /// Error that stopped the run, if any
    #[inline]
    #[must_use]
    pub fn cause(&self) -> Option<&StageError> {
        match &self.status {
            OutcomeStatus::Succeeded => None,
            OutcomeStatus::FailedAtStage { cause, .. } => Some(cause),
        }
    }

    /// Advice was generated but the report did not reach the requester
    #[inline]
    #[must_use]
    pub fn advice_undelivered(&self) -> bool {
        self.advisory_text.is_some() && !self.is_done()
    }
}
