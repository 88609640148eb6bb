//! TOML configuration
//!
//! Credentials never live in the file. Each section names the environment
//! variable holding its secret; it is resolved when adapters are built.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Completion service settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key_env: String,
    pub timeout_secs: u64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.groq.com/openai/v1/chat/completions".to_string(),
            model: "mixtral-8x7b-32768".to_string(),
            api_key_env: "GROQ_API_KEY".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Spreadsheet log settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetsConfig {
    pub base_url: String,
    pub spreadsheet_id: String,
    pub range: String,
    /// Environment variable holding an OAuth bearer token for the Sheets API.
    ///
    /// Google access tokens expire after about an hour and are not refreshed
    /// here. Mint them out of band (for example from service-account
    /// credentials) and restart or re-read the environment before expiry.
    pub access_token_env: String,
    pub timeout_secs: u64,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            base_url: advisor_delivery::DEFAULT_SHEETS_BASE_URL.to_string(),
            spreadsheet_id: String::new(),
            range: advisor_delivery::DEFAULT_RANGE.to_string(),
            access_token_env: "GCP_SHEETS_TOKEN".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Email relay settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password_env: String,
    /// Sender address; falls back to `username` when empty
    pub from: String,
    pub timeout_secs: u64,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: "smtp.gmail.com".to_string(),
            port: 465,
            username: String::new(),
            password_env: "EMAIL_PASSWORD".to_string(),
            from: String::new(),
            timeout_secs: 30,
        }
    }
}

impl SmtpConfig {
    /// Sender address actually used
    #[must_use]
    pub fn sender(&self) -> &str {
        if self.from.trim().is_empty() {
            &self.username
        } else {
            &self.from
        }
    }
}

/// Advisory cache bounds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub max_capacity: u64,
    /// Entries never expire when absent
    pub ttl_secs: Option<u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
            ttl_secs: Some(86_400),
        }
    }
}

/// Report settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub file_name: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            file_name: "advisory-report.pdf".to_string(),
        }
    }
}

/// Full configuration of the lead advisor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    pub completion: CompletionConfig,
    pub sheets: SheetsConfig,
    pub smtp: SmtpConfig,
    pub cache: CacheConfig,
    pub report: ReportConfig,
}

impl AdvisorConfig {
    /// Parse and validate a TOML document
    ///
    /// # Errors
    /// `ConfigError::Parse` on malformed TOML, `ConfigError::Invalid` if
    /// validation fails.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    ///
    /// # Errors
    /// `ConfigError::Io` if the file cannot be read, otherwise as
    /// [`AdvisorConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Set the spreadsheet key
    #[must_use]
    pub fn with_spreadsheet_id(mut self, id: impl Into<String>) -> Self {
        self.sheets.spreadsheet_id = id.into();
        self
    }

    /// Set the relay login, also used as sender
    #[must_use]
    pub fn with_smtp_username(mut self, username: impl Into<String>) -> Self {
        self.smtp.username = username.into();
        self
    }

    /// Point the completion client elsewhere
    #[must_use]
    pub fn with_completion_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.completion.endpoint = endpoint.into();
        self
    }

    /// Point the Sheets client elsewhere
    #[must_use]
    pub fn with_sheets_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.sheets.base_url = base_url.into();
        self
    }

    /// Check values that serde cannot
    ///
    /// # Errors
    /// `ConfigError::Invalid` naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("completion.endpoint", &self.completion.endpoint),
            ("completion.model", &self.completion.model),
            ("completion.api_key_env", &self.completion.api_key_env),
            ("sheets.base_url", &self.sheets.base_url),
            ("sheets.spreadsheet_id", &self.sheets.spreadsheet_id),
            ("sheets.range", &self.sheets.range),
            ("sheets.access_token_env", &self.sheets.access_token_env),
            ("smtp.host", &self.smtp.host),
            ("smtp.username", &self.smtp.username),
            ("smtp.password_env", &self.smtp.password_env),
            ("report.file_name", &self.report.file_name),
        ];
        if let Some((key, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!("{key} must not be empty")));
        }

        let timeouts = [
            ("completion.timeout_secs", self.completion.timeout_secs),
            ("sheets.timeout_secs", self.sheets.timeout_secs),
            ("smtp.timeout_secs", self.smtp.timeout_secs),
        ];
        if let Some((key, _)) = timeouts.iter().find(|(_, v)| *v == 0) {
            return Err(ConfigError::Invalid(format!("{key} must be positive")));
        }

        if self.smtp.port == 0 {
            return Err(ConfigError::Invalid("smtp.port must be positive".to_string()));
        }
        if self.cache.max_capacity == 0 {
            return Err(ConfigError::Invalid(
                "cache.max_capacity must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub(crate) fn completion_timeout(&self) -> Duration {
        Duration::from_secs(self.completion.timeout_secs)
    }

    pub(crate) fn sheets_timeout(&self) -> Duration {
        Duration::from_secs(self.sheets.timeout_secs)
    }

    pub(crate) fn smtp_timeout(&self) -> Duration {
        Duration::from_secs(self.smtp.timeout_secs)
    }

    pub(crate) fn cache_ttl(&self) -> Option<Duration> {
        self.cache.ttl_secs.map(Duration::from_secs)
    }
}
