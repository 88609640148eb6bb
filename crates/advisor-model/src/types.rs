//! Core types for the lead advisory pipeline
//!
//! Defines the values that flow between stages:
//! - Lead requests and their validation
//! - Advisory prompts and results
//! - Log records and rendered report artifacts

use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

/// Timestamp layout used when a record is written to the external log
pub const RECORD_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Unique submission identifier (ULID for sortability)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SubmissionId(pub Ulid);

impl SubmissionId {
    /// Generate new submission ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for SubmissionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A prospective customer's inquiry, as received from the intake form
///
/// Field-separated but not yet validated. Call [`LeadRequest::validate`]
/// before handing it to any external collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadRequest {
    /// Requester's name
    pub name: String,
    /// Requester's email address (report destination)
    pub email: String,
    /// Free-text description of what the requester is looking for
    pub message: String,
    /// Preferred region, if any
    pub region: Option<String>,
    /// Lower budget bound in AED
    pub budget_min: Option<u64>,
    /// Upper budget bound in AED
    pub budget_max: Option<u64>,
    /// Time the form was submitted
    pub submitted_at: DateTime<Utc>,
}

impl LeadRequest {
    /// Create a lead with no region or budget filters, submitted now
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            message: message.into(),
            region: None,
            budget_min: None,
            budget_max: None,
            submitted_at: Utc::now(),
        }
    }

    /// With preferred region; a blank region is treated as absent
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        let region = region.into();
        self.region = if region.trim().is_empty() {
            None
        } else {
            Some(region)
        };
        self
    }

    /// With budget bounds
    #[inline]
    #[must_use]
    pub fn with_budget(mut self, min: Option<u64>, max: Option<u64>) -> Self {
        self.budget_min = min;
        self.budget_max = max;
        self
    }

    /// With explicit submission time
    #[inline]
    #[must_use]
    pub fn with_submitted_at(mut self, submitted_at: DateTime<Utc>) -> Self {
        self.submitted_at = submitted_at;
        self
    }

    /// Region with blank values filtered out
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.region
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
    }

    /// Check the intake invariants
    ///
    /// # Errors
    /// - `ValidationError::EmptyField` if name, email or message is blank
    /// - `ValidationError::InvalidEmail` if the address has no usable `@` form
    /// - `ValidationError::BudgetRange` if `budget_min > budget_max`
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("message", &self.message),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::EmptyField { field });
            }
        }

        if !looks_like_email(self.email.trim()) {
            return Err(ValidationError::InvalidEmail(self.email.clone()));
        }

        if let (Some(min), Some(max)) = (self.budget_min, self.budget_max) {
            if min > max {
                return Err(ValidationError::BudgetRange { min, max });
            }
        }

        Ok(())
    }
}

fn looks_like_email(address: &str) -> bool {
    match address.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !address.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

/// Prompt sent to the completion service
///
/// Derived deterministically from a [`LeadRequest`]; two leads with
/// byte-identical prompts are the same advisory request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AdvisoryPrompt(String);

impl AdvisoryPrompt {
    /// Wrap prompt text
    #[inline]
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Prompt text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AdvisoryPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Advisory text produced for a prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryResult {
    /// Normalized advisory text
    pub text: String,
    /// When the completion was received
    pub generated_at: DateTime<Utc>,
    /// Prompt the text answers
    pub source_prompt: AdvisoryPrompt,
}

impl AdvisoryResult {
    /// Create result stamped now
    #[must_use]
    pub fn new(text: impl Into<String>, source_prompt: AdvisoryPrompt) -> Self {
        Self {
            text: text.into(),
            generated_at: Utc::now(),
            source_prompt,
        }
    }
}

/// One scalar cell of a log row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    /// Text cell
    Text(String),
    /// Whole-number cell
    Number(u64),
    /// Blank cell for an absent optional field
    Empty,
}

/// Row appended to the external log for every advised lead
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadRecord {
    /// Submission time of the lead
    pub timestamp: DateTime<Utc>,
    /// Requester's name
    pub name: String,
    /// Requester's email
    pub email: String,
    /// Preferred region
    pub region: Option<String>,
    /// Lower budget bound
    pub budget_min: Option<u64>,
    /// Upper budget bound
    pub budget_max: Option<u64>,
    /// Free-text inquiry
    pub message: String,
    /// Advisory text produced for the lead
    pub advisory_text: String,
}

impl LeadRecord {
    /// Build the record for a lead and its advisory
    #[must_use]
    pub fn from_lead(lead: &LeadRequest, advisory_text: &str) -> Self {
        Self {
            timestamp: lead.submitted_at,
            name: lead.name.trim().to_owned(),
            email: lead.email.trim().to_owned(),
            region: lead.region().map(str::to_owned),
            budget_min: lead.budget_min,
            budget_max: lead.budget_max,
            message: lead.message.trim().to_owned(),
            advisory_text: advisory_text.to_owned(),
        }
    }

    /// Cells in fixed column order
    ///
    /// Absent optional fields become [`CellValue::Empty`] so that columns
    /// never shift between rows.
    #[must_use]
    pub fn cells(&self) -> Vec<CellValue> {
        let text = |s: &str| CellValue::Text(s.to_owned());
        let number = |n: Option<u64>| n.map_or(CellValue::Empty, CellValue::Number);

        vec![
            CellValue::Text(self.timestamp.format(RECORD_TIMESTAMP_FORMAT).to_string()),
            text(&self.name),
            text(&self.email),
            self.region.as_deref().map_or(CellValue::Empty, text),
            number(self.budget_min),
            number(self.budget_max),
            text(&self.message),
            text(&self.advisory_text),
        ]
    }
}

/// Rendered report, ready to be attached to the outbound message
#[derive(Clone, PartialEq, Eq)]
pub struct ReportArtifact {
    /// Attachment file name
    pub file_name: String,
    /// MIME type of `bytes`
    pub content_type: String,
    /// Document bytes
    pub bytes: Vec<u8>,
}

impl ReportArtifact {
    /// Create artifact
    #[must_use]
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Size in bytes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the document is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for ReportArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportArtifact")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}
