//! Ports through which the orchestrator reaches its collaborators
//!
//! Each trait is object-safe so the orchestrator can hold `Arc<dyn _>` and be
//! wired to real adapters or test doubles.

use crate::error::{AdvisoryError, DeliveryError, PersistenceError, RenderError};
use crate::types::{AdvisoryResult, LeadRequest, ReportArtifact};
use async_trait::async_trait;
use std::sync::Arc;

/// Produces advisory text for a validated lead
#[async_trait]
pub trait Advisor: Send + Sync {
    /// Generate (or reuse) the advisory for `lead`
    ///
    /// # Errors
    /// Any transport, status or parse failure of the completion service.
    async fn advise(&self, lead: &LeadRequest) -> Result<Arc<AdvisoryResult>, AdvisoryError>;
}

/// Append-only external log of advised leads
#[async_trait]
pub trait LeadLog: Send + Sync {
    /// Append exactly one row for `lead`
    ///
    /// # Errors
    /// Authentication, quota or network failure; never retried here.
    async fn record(&self, lead: &LeadRequest, advisory_text: &str)
        -> Result<(), PersistenceError>;
}

/// Turns a lead and its advisory into a document
pub trait ReportRenderer: Send + Sync {
    /// Render the report in memory
    ///
    /// # Errors
    /// Document construction failure.
    fn render(&self, lead: &LeadRequest, advisory_text: &str)
        -> Result<ReportArtifact, RenderError>;
}

/// Sends the rendered report to the requester
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send one message carrying `artifact`; the artifact is consumed
    ///
    /// # Errors
    /// Address, authentication or transport failure; one attempt only.
    async fn deliver(&self, to_email: &str, artifact: ReportArtifact)
        -> Result<(), DeliveryError>;
}
