//! Error types for the lead advisory pipeline
//!
//! One error type per stage:
//! - Validation of the intake form
//! - Advisory generation (completion service)
//! - Persistence (external log append)
//! - Report rendering
//! - Delivery (email relay)
//!
//! Causes are carried as strings so every error is `Clone`; a single failed
//! completion is shared by all callers waiting on the same prompt.

use crate::outcome::Stage;

/// Intake validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Required field is empty or whitespace
    #[error("required field is empty: {field}")]
    EmptyField { field: &'static str },

    /// Email address cannot be addressed
    #[error("invalid email address: '{0}'")]
    InvalidEmail(String),

    /// Budget bounds are inverted
    #[error("budget minimum {min} exceeds maximum {max}")]
    BudgetRange { min: u64, max: u64 },
}

/// Advisory generation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdvisoryError {
    /// Request never produced a response
    #[error("completion transport failed: {0}")]
    Transport(String),

    /// Service answered with a non-success status
    #[error("completion service returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body lacks `choices[0].message.content`
    #[error("malformed completion response: {0}")]
    MalformedResponse(String),

    /// No response within the configured budget
    #[error("completion timed out after {after_secs}s")]
    Timeout { after_secs: u64 },
}

impl AdvisoryError {
    /// Check if a caller-level retry of the whole pipeline could help
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Timeout { .. } => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::MalformedResponse(_) => false,
        }
    }
}

/// Log append errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PersistenceError {
    /// Credentials rejected
    #[error("log service rejected credentials: {0}")]
    Unauthorized(String),

    /// Rate limit or quota exhausted
    #[error("log service quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Service answered with another non-success status
    #[error("log append rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    /// Request never produced a response
    #[error("log transport failed: {0}")]
    Transport(String),

    /// No response within the configured budget
    #[error("log append timed out after {after_secs}s")]
    Timeout { after_secs: u64 },
}

/// Report rendering errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// Content stream could not be encoded
    #[error("failed to encode report content: {0}")]
    Encoding(String),

    /// Document could not be serialized
    #[error("failed to write report: {0}")]
    Write(String),
}

/// Email delivery errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    /// Sender or recipient address does not parse
    #[error("invalid address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    /// Message could not be assembled
    #[error("failed to compose message: {0}")]
    Compose(String),

    /// Relay rejected the credentials
    #[error("relay authentication failed: {0}")]
    Authentication(String),

    /// Connection or protocol failure
    #[error("relay transport failed: {0}")]
    Transport(String),

    /// No response within the configured budget
    #[error("send timed out after {after_secs}s")]
    Timeout { after_secs: u64 },
}

impl DeliveryError {
    /// Create invalid address error
    pub fn invalid_address(address: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidAddress {
            address: address.into(),
            reason: reason.to_string(),
        }
    }
}

/// Failure of a single pipeline stage
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StageError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("advisory failed: {0}")]
    Advisory(#[from] AdvisoryError),

    #[error("persistence failed: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("render failed: {0}")]
    Render(#[from] RenderError),

    #[error("delivery failed: {0}")]
    Delivery(#[from] DeliveryError),
}

impl StageError {
    /// Stage that produced this error
    #[inline]
    #[must_use]
    pub fn stage(&self) -> Stage {
        match self {
            Self::Validation(_) => Stage::Validating,
            Self::Advisory(_) => Stage::Advising,
            Self::Persistence(_) => Stage::Logging,
            Self::Render(_) => Stage::Rendering,
            Self::Delivery(_) => Stage::Notifying,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_display() {
        let err = ValidationError::EmptyField { field: "email" };
        assert_eq!(err.to_string(), "required field is empty: email");
    }

    #[test]
    fn advisory_error_is_retryable() {
        assert!(AdvisoryError::Transport("reset".to_string()).is_retryable());
        assert!(AdvisoryError::Timeout { after_secs: 60 }.is_retryable());
        assert!(AdvisoryError::Status {
            status: 500,
            body: String::new()
        }
        .is_retryable());
        assert!(!AdvisoryError::Status {
            status: 401,
            body: String::new()
        }
        .is_retryable());
        assert!(!AdvisoryError::MalformedResponse("no choices".to_string()).is_retryable());
    }

    #[test]
    fn stage_error_reports_stage() {
        let err: StageError = PersistenceError::QuotaExceeded("daily".to_string()).into();
        assert_eq!(err.stage(), Stage::Logging);
        assert!(err.to_string().starts_with("persistence failed"));

        let err: StageError = DeliveryError::invalid_address("nobody", "missing @").into();
        assert_eq!(err.stage(), Stage::Notifying);
    }
}
