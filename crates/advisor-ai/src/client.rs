//! Chat-completion client for OpenAI-compatible endpoints
//!
//! Sends one `{model, messages: [{role: "user", content}]}` request per
//! prompt and returns `choices[0].message.content` verbatim. Anything else in
//! the response body is a parse failure.

use advisor_model::{AdvisoryError, AdvisoryPrompt};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Longest response body echoed back inside an error
const MAX_ERROR_BODY: usize = 512;

/// External completion service
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Request one completion for `prompt`
    ///
    /// # Errors
    /// Transport failure, non-success status, or a body without
    /// `choices[0].message.content`.
    async fn complete(&self, prompt: &AdvisoryPrompt) -> Result<String, AdvisoryError>;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Option<Vec<Choice>>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// HTTPS completion client authenticated with a bearer key
#[derive(Clone)]
pub struct HttpCompletionClient {
    http: Client,
    endpoint: String,
    model: String,
    api_key: String,
    timeout: Duration,
}

impl HttpCompletionClient {
    /// Create client for a chat-completions endpoint
    ///
    /// # Errors
    /// `AdvisoryError::Transport` if the HTTP client cannot be built.
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AdvisoryError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AdvisoryError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: api_key.into(),
            timeout,
        })
    }

    /// Model identifier sent with every request
    #[inline]
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    fn map_transport(&self, err: &reqwest::Error) -> AdvisoryError {
        if err.is_timeout() {
            AdvisoryError::Timeout {
                after_secs: self.timeout.as_secs(),
            }
        } else {
            AdvisoryError::Transport(err.to_string())
        }
    }
}

impl fmt::Debug for HttpCompletionClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpCompletionClient")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn complete(&self, prompt: &AdvisoryPrompt) -> Result<String, AdvisoryError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt.as_str(),
            }],
        };

        tracing::debug!(endpoint = %self.endpoint, model = %self.model, "requesting completion");

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_transport(&e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.map_transport(&e))?;

        if !status.is_success() {
            return Err(AdvisoryError::Status {
                status: status.as_u16(),
                body: truncate(&body),
            });
        }

        parse_content(&body)
    }
}

/// Extract `choices[0].message.content` from a response body
pub(crate) fn parse_content(body: &str) -> Result<String, AdvisoryError> {
    let parsed: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|e| AdvisoryError::MalformedResponse(format!("invalid json: {e}")))?;

    parsed
        .choices
        .and_then(|choices| choices.into_iter().next())
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .ok_or_else(|| {
            AdvisoryError::MalformedResponse("missing choices[0].message.content".to_string())
        })
}

fn truncate(body: &str) -> String {
    match body.char_indices().nth(MAX_ERROR_BODY) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
