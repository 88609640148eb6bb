//! Lead advisory pipeline
//!
//! Wires the advisory generator, lead log, report renderer and notifier into
//! one sequential run per submission:
//!
//! `Validating → Advising → Logging → Rendering → Notifying → Done`
//!
//! with `Failed(stage)` reachable from every non-terminal state.
//!
//! # Example
//!
//! ```rust,no_run
//! use advisor_model::LeadRequest;
//! use advisor_pipeline::{AdvisorConfig, LeadPipeline};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AdvisorConfig::load("lead-advisor.toml")?;
//! let pipeline = LeadPipeline::from_config(&config)?;
//!
//! let outcome = pipeline
//!     .submit(LeadRequest::new("A", "a@x.com", "2BR near beach"))
//!     .await;
//! println!("done: {}", outcome.is_done());
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod state;
mod wiring;

pub use config::{
    AdvisorConfig, CacheConfig, CompletionConfig, ReportConfig, SheetsConfig, SmtpConfig,
};
pub use error::{ConfigError, StateMachineError};
pub use orchestrator::LeadPipeline;
pub use state::{allowed_transitions, validate_transition, PipelineState};
