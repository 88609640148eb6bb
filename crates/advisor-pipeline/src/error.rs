//! Orchestrator and configuration errors

use crate::state::PipelineState;
use std::path::PathBuf;

/// State table violations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateMachineError {
    #[error("illegal pipeline transition: {from} -> {to}")]
    IllegalTransition {
        from: PipelineState,
        to: PipelineState,
    },
}

/// Errors loading configuration or building adapters from it
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("failed to parse config: {0}")]
    Parse(String),

    /// Environment variable naming a credential is unset or empty
    #[error("missing secret: environment variable {var} is not set")]
    MissingSecret { var: String },

    /// Value is syntactically fine but unusable
    #[error("invalid config: {0}")]
    Invalid(String),

    /// Adapter construction failed
    #[error("failed to build adapter: {0}")]
    Adapter(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
