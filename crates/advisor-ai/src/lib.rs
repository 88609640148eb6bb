//! Lead Advisor advisory generation
//!
//! Turns a validated lead into advisory text:
//!
//! ```text
//! LeadRequest → build_prompt → AdvisoryCache ──hit──→ AdvisoryResult
//!                                   │ miss (single-flight per prompt)
//!                                   ↓
//!                           CompletionClient (HTTPS chat completion)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use advisor_ai::{AdvisoryCache, AdvisoryGenerator, HttpCompletionClient};
//! use std::sync::Arc;
//!
//! let client = HttpCompletionClient::new(endpoint, model, api_key, timeout)?;
//! let generator = AdvisoryGenerator::new(Arc::new(client), AdvisoryCache::default());
//! let advisory = generator.advise(&lead).await?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod cache;
pub mod client;
pub mod generator;
pub mod prompt;

pub use cache::{AdvisoryCache, CacheStats};
pub use client::{CompletionClient, HttpCompletionClient};
pub use generator::AdvisoryGenerator;
pub use prompt::build_prompt;
