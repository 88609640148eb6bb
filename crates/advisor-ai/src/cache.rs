//! Prompt-addressed advisory cache using moka
//!
//! Concurrent callers asking for the same prompt share a single in-flight
//! computation; unrelated prompts never wait on each other. Failures are
//! handed to every waiting caller and then forgotten, so the next call
//! retries.

use advisor_model::{AdvisoryError, AdvisoryPrompt, AdvisoryResult};
use moka::future::Cache;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Statistics for cache monitoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Approximate number of cached prompts
    pub entry_count: u64,
    /// Lookups answered without running a computation
    pub hits: u64,
    /// Computations started by this cache
    pub computations: u64,
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    computations: AtomicU64,
}

/// Advisory cache keyed by prompt
///
/// Cloning is cheap; clones share entries.
#[derive(Debug, Clone)]
pub struct AdvisoryCache {
    inner: Cache<AdvisoryPrompt, Arc<AdvisoryResult>>,
    counters: Arc<Counters>,
}

impl AdvisoryCache {
    /// Create cache with max capacity and no expiry
    #[inline]
    #[must_use]
    pub fn new(max_capacity: u64) -> Self {
        Self::from_cache(Cache::new(max_capacity))
    }

    /// Create cache with time-based expiration
    #[inline]
    #[must_use]
    pub fn with_ttl(max_capacity: u64, ttl: Duration) -> Self {
        Self::from_cache(
            Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
        )
    }

    fn from_cache(inner: Cache<AdvisoryPrompt, Arc<AdvisoryResult>>) -> Self {
        Self {
            inner,
            counters: Arc::new(Counters::default()),
        }
    }

    /// Get cached advisory for a prompt
    #[inline]
    pub async fn get(&self, prompt: &AdvisoryPrompt) -> Option<Arc<AdvisoryResult>> {
        self.inner.get(prompt).await
    }

    /// Get cached advisory or compute it
    ///
    /// `compute` runs only when no entry exists and no other caller is
    /// already computing the same prompt. Its text is wrapped into an
    /// [`AdvisoryResult`] stamped with the current time.
    ///
    /// # Errors
    /// The error returned by `compute`, shared with every caller that was
    /// waiting on the same prompt. Errors are not cached.
    pub async fn get_or_compute<F, Fut>(
        &self,
        prompt: AdvisoryPrompt,
        compute: F,
    ) -> Result<Arc<AdvisoryResult>, AdvisoryError>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<String, AdvisoryError>> + Send,
    {
        let computed = AtomicBool::new(false);
        let source = prompt.clone();

        let result = self
            .inner
            .try_get_with(prompt, async {
                computed.store(true, Ordering::Relaxed);
                self.counters.computations.fetch_add(1, Ordering::Relaxed);
                let text = compute().await?;
                Ok::<_, AdvisoryError>(Arc::new(AdvisoryResult::new(text, source)))
            })
            .await
            .map_err(|shared| AdvisoryError::clone(&shared));

        if !computed.load(Ordering::Relaxed) {
            self.counters.hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("advisory cache hit");
        }

        result
    }

    /// Invalidate cache entry
    #[inline]
    pub async fn invalidate(&self, prompt: &AdvisoryPrompt) {
        self.inner.invalidate(prompt).await;
    }

    /// Check if cache holds an entry for prompt
    #[inline]
    #[must_use]
    pub fn contains(&self, prompt: &AdvisoryPrompt) -> bool {
        self.inner.contains_key(prompt)
    }

    /// Get cache statistics
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entry_count: self.inner.entry_count(),
            hits: self.counters.hits.load(Ordering::Relaxed),
            computations: self.counters.computations.load(Ordering::Relaxed),
        }
    }
}

impl Default for AdvisoryCache {
    /// Create cache with default capacity (10,000 entries)
    fn default() -> Self {
        Self::new(10_000)
    }
}
