//! Pipeline state table
//!
//! `Validating → Advising → Logging → Rendering → Notifying → Done`, with
//! `Failed(stage)` reachable from each non-terminal state. Terminal states
//! have no successors.

use crate::error::StateMachineError;
use advisor_model::Stage;
use std::fmt;

/// State of one pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineState {
    Validating,
    Advising,
    Logging,
    Rendering,
    Notifying,
    Done,
    Failed(Stage),
}

impl PipelineState {
    /// Every state, for exhaustive checks
    pub const ALL: [PipelineState; 11] = [
        PipelineState::Validating,
        PipelineState::Advising,
        PipelineState::Logging,
        PipelineState::Rendering,
        PipelineState::Notifying,
        PipelineState::Done,
        PipelineState::Failed(Stage::Validating),
        PipelineState::Failed(Stage::Advising),
        PipelineState::Failed(Stage::Logging),
        PipelineState::Failed(Stage::Rendering),
        PipelineState::Failed(Stage::Notifying),
    ];

    /// State in which `stage` runs
    #[inline]
    #[must_use]
    pub fn running(stage: Stage) -> Self {
        match stage {
            Stage::Validating => Self::Validating,
            Stage::Advising => Self::Advising,
            Stage::Logging => Self::Logging,
            Stage::Rendering => Self::Rendering,
            Stage::Notifying => Self::Notifying,
        }
    }

    /// Stage running in this state, if not terminal
    #[inline]
    #[must_use]
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Validating => Some(Stage::Validating),
            Self::Advising => Some(Stage::Advising),
            Self::Logging => Some(Stage::Logging),
            Self::Rendering => Some(Stage::Rendering),
            Self::Notifying => Some(Stage::Notifying),
            Self::Done | Self::Failed(_) => None,
        }
    }

    /// Whether the run has finished
    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.stage().is_none()
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Done => f.write_str("done"),
            Self::Failed(stage) => write!(f, "failed({stage})"),
            running => match running.stage() {
                Some(stage) => write!(f, "{stage}"),
                None => Ok(()),
            },
        }
    }
}

/// States reachable in one step from `from`
#[must_use]
pub fn allowed_transitions(from: PipelineState) -> Vec<PipelineState> {
    use PipelineState::*;
    match from {
        Validating => vec![Advising, Failed(Stage::Validating)],
        Advising => vec![Logging, Failed(Stage::Advising)],
        Logging => vec![Rendering, Failed(Stage::Logging)],
        Rendering => vec![Notifying, Failed(Stage::Rendering)],
        Notifying => vec![Done, Failed(Stage::Notifying)],
        Done | Failed(_) => vec![],
    }
}

/// Validates a state transition.
///
/// With the `strict-debug` feature an illegal transition panics instead.
///
/// # Errors
/// `StateMachineError::IllegalTransition` if `to` is not reachable from `from`.
pub fn validate_transition(
    from: PipelineState,
    to: PipelineState,
) -> Result<(), StateMachineError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        #[cfg(feature = "strict-debug")]
        panic!("Illegal pipeline transition attempted: {from:?} -> {to:?}");

        #[cfg(not(feature = "strict-debug"))]
        Err(StateMachineError::IllegalTransition { from, to })
    }
}
