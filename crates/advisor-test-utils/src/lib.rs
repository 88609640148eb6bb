//! Testing utilities for the Lead Advisor workspace
//!
//! Recording fakes for every pipeline port, plus fixtures.

#![allow(missing_docs)]

use advisor_ai::CompletionClient;
use advisor_model::{
    AdvisoryError, AdvisoryPrompt, DeliveryError, LeadLog, LeadRecord, LeadRequest, Notifier,
    PersistenceError, RenderError, ReportArtifact, ReportRenderer,
};
use advisor_report::PdfReportRenderer;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const SAMPLE_ADVICE: &str = "Consider Al Rawda; ROI ~7%.";

/// Lead from the reference beach-apartment scenario
pub fn sample_lead() -> LeadRequest {
    LeadRequest::new("A", "a@x.com", "2BR near beach")
        .with_region("Al Rawda")
        .with_budget(Some(200_000), Some(400_000))
        .with_submitted_at(Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap())
}

/// Completion client replaying scripted answers, counting calls
#[derive(Debug, Default)]
pub struct StubCompletion {
    script: Mutex<VecDeque<Result<String, AdvisoryError>>>,
    fallback: Option<Result<String, AdvisoryError>>,
    prompts: Mutex<Vec<AdvisoryPrompt>>,
    calls: AtomicUsize,
    delay: Duration,
}

impl StubCompletion {
    /// Always answer with `text`
    pub fn answering(text: &str) -> Arc<Self> {
        Arc::new(Self {
            fallback: Some(Ok(text.to_string())),
            ..Self::default()
        })
    }

    /// Always fail with `err`
    pub fn failing(err: AdvisoryError) -> Arc<Self> {
        Arc::new(Self {
            fallback: Some(Err(err)),
            ..Self::default()
        })
    }

    /// Answer from `script` in order, then fail with a transport error
    pub fn scripted(script: Vec<Result<String, AdvisoryError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            ..Self::default()
        })
    }

    /// Always answer with `text` after `delay`
    pub fn slow(text: &str, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            fallback: Some(Ok(text.to_string())),
            delay,
            ..Self::default()
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<AdvisoryPrompt> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl CompletionClient for StubCompletion {
    async fn complete(&self, prompt: &AdvisoryPrompt) -> Result<String, AdvisoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().push(prompt.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let scripted = self.script.lock().pop_front();
        scripted
            .or_else(|| self.fallback.clone())
            .unwrap_or_else(|| Err(AdvisoryError::Transport("script exhausted".to_string())))
    }
}

/// Lead log keeping rows in memory
#[derive(Debug, Default)]
pub struct RecordingLog {
    rows: Mutex<Vec<LeadRecord>>,
    fail_with: Option<PersistenceError>,
    calls: AtomicUsize,
}

impl RecordingLog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing(err: PersistenceError) -> Arc<Self> {
        Arc::new(Self {
            fail_with: Some(err),
            ..Self::default()
        })
    }

    pub fn rows(&self) -> Vec<LeadRecord> {
        self.rows.lock().clone()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LeadLog for RecordingLog {
    async fn record(
        &self,
        lead: &LeadRequest,
        advisory_text: &str,
    ) -> Result<(), PersistenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }
        self.rows.lock().push(LeadRecord::from_lead(lead, advisory_text));
        Ok(())
    }
}

/// Renderer delegating to the PDF renderer, counting calls
#[derive(Debug, Default)]
pub struct CountingRenderer {
    inner: PdfReportRenderer,
    fail_with: Option<RenderError>,
    calls: AtomicUsize,
}

impl CountingRenderer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing(err: RenderError) -> Arc<Self> {
        Arc::new(Self {
            fail_with: Some(err),
            ..Self::default()
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ReportRenderer for CountingRenderer {
    fn render(
        &self,
        lead: &LeadRequest,
        advisory_text: &str,
    ) -> Result<ReportArtifact, RenderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }
        self.inner.render(lead, advisory_text)
    }
}

/// Notifier keeping sent messages in memory
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(String, ReportArtifact)>>,
    fail_with: Option<DeliveryError>,
    calls: AtomicUsize,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing(err: DeliveryError) -> Arc<Self> {
        Arc::new(Self {
            fail_with: Some(err),
            ..Self::default()
        })
    }

    pub fn sent(&self) -> Vec<(String, ReportArtifact)> {
        self.sent.lock().clone()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn deliver(
        &self,
        to_email: &str,
        artifact: ReportArtifact,
    ) -> Result<(), DeliveryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }
        self.sent.lock().push((to_email.to_string(), artifact));
        Ok(())
    }
}
