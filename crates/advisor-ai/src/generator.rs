//! Advisory generator
//!
//! Derives the prompt for a lead, then asks the cache for it, falling back
//! to one completion request. Responses are trimmed; an empty answer is an
//! error, never advice.

use crate::cache::AdvisoryCache;
use crate::client::CompletionClient;
use crate::prompt::build_prompt;
use advisor_model::{Advisor, AdvisoryError, AdvisoryResult, LeadRequest};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// Generates advisories through a shared cache
#[derive(Clone)]
pub struct AdvisoryGenerator {
    client: Arc<dyn CompletionClient>,
    cache: AdvisoryCache,
}

impl AdvisoryGenerator {
    /// Create generator over a completion client and cache
    #[inline]
    #[must_use]
    pub fn new(client: Arc<dyn CompletionClient>, cache: AdvisoryCache) -> Self {
        Self { client, cache }
    }

    /// Cache backing this generator
    #[inline]
    #[must_use]
    pub fn cache(&self) -> &AdvisoryCache {
        &self.cache
    }
}

impl fmt::Debug for AdvisoryGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdvisoryGenerator")
            .field("cache", &self.cache.stats())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Advisor for AdvisoryGenerator {
    async fn advise(&self, lead: &LeadRequest) -> Result<Arc<AdvisoryResult>, AdvisoryError> {
        let prompt = build_prompt(lead);
        let client = Arc::clone(&self.client);
        let request = prompt.clone();

        self.cache
            .get_or_compute(prompt, move || async move {
                let raw = client.complete(&request).await?;
                normalize(&raw)
            })
            .await
    }
}

fn normalize(raw: &str) -> Result<String, AdvisoryError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(AdvisoryError::MalformedResponse(
            "completion content is empty".to_string(),
        ));
    }
    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims() {
        assert_eq!(normalize("  advice \n").unwrap(), "advice");
    }

    #[test]
    fn normalize_rejects_blank() {
        assert!(matches!(
            normalize(" \n\t"),
            Err(AdvisoryError::MalformedResponse(_))
        ));
    }
}
