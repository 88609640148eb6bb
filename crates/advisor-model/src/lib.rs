//! Lead Advisor data model
//!
//! Shared vocabulary of the lead advisory pipeline:
//! - Lead requests and their intake invariants
//! - Advisory prompts, results and log records
//! - Stage error taxonomy and the caller-facing outcome
//! - Ports implemented by the external collaborators
//!
//! # Example
//!
//! ```rust
//! use advisor_model::LeadRequest;
//!
//! let lead = LeadRequest::new("A", "a@x.com", "2BR near beach")
//!     .with_region("Al Rawda")
//!     .with_budget(Some(200_000), Some(400_000));
//! assert!(lead.validate().is_ok());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod error;
pub mod outcome;
pub mod ports;
pub mod types;

pub use error::{
    AdvisoryError, DeliveryError, PersistenceError, RenderError, StageError, ValidationError,
};
pub use outcome::{DeliveryOutcome, OutcomeStatus, Stage};
pub use ports::{Advisor, LeadLog, Notifier, ReportRenderer};
pub use types::{
    AdvisoryPrompt, AdvisoryResult, CellValue, LeadRecord, LeadRequest, ReportArtifact,
    SubmissionId, RECORD_TIMESTAMP_FORMAT,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
