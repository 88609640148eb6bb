//! Pipeline orchestrator
//!
//! Runs one submission through validate, advise, log, render and notify in
//! strict order. The first failing stage ends the run; every later stage is
//! skipped. Nothing here retries.

use crate::state::{validate_transition, PipelineState};
use advisor_model::{
    Advisor, DeliveryOutcome, LeadLog, LeadRequest, Notifier, ReportRenderer, Stage, StageError,
    SubmissionId,
};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, info_span, warn, Instrument};

/// Sequential lead advisory pipeline
///
/// Cheap to clone; clones share the adapters, including the advisory cache.
#[derive(Clone)]
pub struct LeadPipeline {
    advisor: Arc<dyn Advisor>,
    log: Arc<dyn LeadLog>,
    renderer: Arc<dyn ReportRenderer>,
    notifier: Arc<dyn Notifier>,
}

impl fmt::Debug for LeadPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeadPipeline").finish_non_exhaustive()
    }
}

/// Bookkeeping for a single run
struct Run {
    id: SubmissionId,
    state: PipelineState,
}

impl Run {
    fn new(id: SubmissionId) -> Self {
        Self {
            id,
            state: PipelineState::Validating,
        }
    }

    fn advance(&mut self, next: PipelineState) {
        if let Err(e) = validate_transition(self.state, next) {
            error!(submission_id = %self.id, error = %e, "pipeline state table violated");
        }
        debug!(from = %self.state, to = %next, "transition");
        self.state = next;
    }

    fn fail(
        mut self,
        cause: impl Into<StageError>,
        advisory_text: Option<String>,
    ) -> DeliveryOutcome {
        let outcome = DeliveryOutcome::failed(self.id, cause, advisory_text);
        let stage = outcome.failed_stage().unwrap_or(Stage::Validating);
        self.advance(PipelineState::Failed(stage));
        if let Some(cause) = outcome.cause() {
            warn!(%stage, error = %cause, "stage failed");
        }
        outcome
    }
}

impl LeadPipeline {
    /// Create pipeline from its four collaborators
    #[must_use]
    pub fn new(
        advisor: Arc<dyn Advisor>,
        log: Arc<dyn LeadLog>,
        renderer: Arc<dyn ReportRenderer>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            advisor,
            log,
            renderer,
            notifier,
        }
    }

    /// Run one submission to a terminal state
    ///
    /// Never panics and never returns early without an outcome: every stage
    /// failure is folded into [`DeliveryOutcome`].
    pub async fn submit(&self, lead: LeadRequest) -> DeliveryOutcome {
        let id = SubmissionId::new();
        let span = info_span!("submission", submission_id = %id);
        let outcome = self.run(id, &lead).instrument(span.clone()).await;

        span.in_scope(|| match outcome.failed_stage() {
            None => info!(outcome = "done", "submission finished"),
            Some(stage) => info!(
                outcome = "failed",
                %stage,
                advice_undelivered = outcome.advice_undelivered(),
                "submission finished"
            ),
        });
        outcome
    }

    async fn run(&self, id: SubmissionId, lead: &LeadRequest) -> DeliveryOutcome {
        let mut run = Run::new(id);

        if let Err(e) = lead.validate() {
            return run.fail(e, None);
        }
        run.advance(PipelineState::Advising);

        let advisory = match self.advisor.advise(lead).await {
            Ok(result) => result,
            Err(e) => return run.fail(e, None),
        };
        let text = advisory.text.clone();
        run.advance(PipelineState::Logging);

        if let Err(e) = self.log.record(lead, &text).await {
            return run.fail(e, Some(text));
        }
        run.advance(PipelineState::Rendering);

        let artifact = match self.renderer.render(lead, &text) {
            Ok(artifact) => artifact,
            Err(e) => return run.fail(e, Some(text)),
        };
        debug!(bytes = artifact.len(), "report rendered");
        run.advance(PipelineState::Notifying);

        if let Err(e) = self.notifier.deliver(lead.email.trim(), artifact).await {
            return run.fail(e, Some(text));
        }
        run.advance(PipelineState::Done);

        DeliveryOutcome::succeeded(run.id, text)
    }
}
