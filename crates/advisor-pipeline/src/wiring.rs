//! Builds a pipeline with the production adapters

use crate::config::AdvisorConfig;
use crate::error::ConfigError;
use crate::orchestrator::LeadPipeline;
use advisor_ai::{AdvisoryCache, AdvisoryGenerator, HttpCompletionClient};
use advisor_delivery::{SheetsLog, SmtpNotifier, SmtpSettings};
use advisor_report::PdfReportRenderer;
use std::sync::Arc;
use tracing::debug;

impl LeadPipeline {
    /// Wire the HTTPS completion client, Sheets log, PDF renderer and SMTP
    /// notifier, reading credentials from the process environment
    ///
    /// # Errors
    /// `ConfigError::MissingSecret` if a credential variable is unset, or
    /// `ConfigError::Adapter` if an adapter rejects its settings.
    pub fn from_config(config: &AdvisorConfig) -> Result<Self, ConfigError> {
        Self::from_config_with(config, |var| std::env::var(var).ok())
    }

    /// As [`LeadPipeline::from_config`], resolving credentials through `secret`
    ///
    /// # Errors
    /// See [`LeadPipeline::from_config`].
    pub fn from_config_with<F>(config: &AdvisorConfig, secret: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        config.validate()?;
        let require = |var: &str| {
            secret(var)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingSecret {
                    var: var.to_string(),
                })
        };

        let client = HttpCompletionClient::new(
            &config.completion.endpoint,
            &config.completion.model,
            require(&config.completion.api_key_env)?,
            config.completion_timeout(),
        )
        .map_err(|e| ConfigError::Adapter(e.to_string()))?;

        let cache = match config.cache_ttl() {
            Some(ttl) => AdvisoryCache::with_ttl(config.cache.max_capacity, ttl),
            None => AdvisoryCache::new(config.cache.max_capacity),
        };
        let advisor = AdvisoryGenerator::new(Arc::new(client), cache);

        let log = SheetsLog::new(
            &config.sheets.base_url,
            &config.sheets.spreadsheet_id,
            require(&config.sheets.access_token_env)?,
            config.sheets_timeout(),
        )
        .map_err(|e| ConfigError::Adapter(e.to_string()))?
        .with_range(&config.sheets.range);

        let renderer = PdfReportRenderer::new().with_file_name(&config.report.file_name);

        let notifier = SmtpNotifier::new(SmtpSettings {
            host: config.smtp.host.clone(),
            port: config.smtp.port,
            username: config.smtp.username.clone(),
            password: require(&config.smtp.password_env)?,
            from: config.smtp.sender().to_string(),
            timeout: config.smtp_timeout(),
        })
        .map_err(|e| ConfigError::Adapter(e.to_string()))?;

        debug!(
            model = %config.completion.model,
            smtp_host = %config.smtp.host,
            "pipeline adapters built"
        );

        Ok(Self::new(
            Arc::new(advisor),
            Arc::new(log),
            Arc::new(renderer),
            Arc::new(notifier),
        ))
    }
}
