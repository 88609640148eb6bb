//! Email notifier over an implicit-TLS SMTP relay
//!
//! Sends one message per report: a short plain-text body plus the report as
//! a named attachment. One attempt; the connection is not kept after the
//! send completes or fails.

use advisor_model::{DeliveryError, Notifier, ReportArtifact};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::fmt;
use std::time::Duration;

/// Subject of every report email
pub const REPORT_SUBJECT: &str = "Your Real Estate AI Report";
/// Plain-text body of every report email
pub const REPORT_BODY: &str = "Please find attached the AI-generated advice report.";

/// Relay connection settings
#[derive(Clone)]
pub struct SmtpSettings {
    /// Relay host name
    pub host: String,
    /// Implicit-TLS port
    pub port: u16,
    /// Login user
    pub username: String,
    /// Login password
    pub password: String,
    /// Sender address
    pub from: String,
    /// Budget for connect, login and send
    pub timeout: Duration,
}

impl fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("from", &self.from)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Notifier sending reports through an SMTP relay
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    timeout: Duration,
}

impl SmtpNotifier {
    /// Create notifier for a relay
    ///
    /// No connection is opened until the first delivery.
    ///
    /// # Errors
    /// - `DeliveryError::InvalidAddress` if `from` does not parse
    /// - `DeliveryError::Transport` if TLS parameters cannot be built for `host`
    pub fn new(settings: SmtpSettings) -> Result<Self, DeliveryError> {
        let from = settings
            .from
            .parse::<Mailbox>()
            .map_err(|e| DeliveryError::invalid_address(&settings.from, e))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
            .map_err(|e| DeliveryError::Transport(e.to_string()))?
            .port(settings.port)
            .credentials(Credentials::new(settings.username, settings.password))
            .timeout(Some(settings.timeout))
            .build();

        Ok(Self {
            transport,
            from,
            timeout: settings.timeout,
        })
    }

    /// Sender mailbox
    #[inline]
    #[must_use]
    pub fn from(&self) -> &Mailbox {
        &self.from
    }
}

impl fmt::Debug for SmtpNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpNotifier")
            .field("from", &self.from.to_string())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Build the report message
///
/// # Errors
/// - `DeliveryError::InvalidAddress` if `to_email` does not parse
/// - `DeliveryError::Compose` if the artifact content type is invalid
pub fn compose_message(
    from: &Mailbox,
    to_email: &str,
    artifact: ReportArtifact,
) -> Result<Message, DeliveryError> {
    let to = to_email
        .trim()
        .parse::<Mailbox>()
        .map_err(|e| DeliveryError::invalid_address(to_email, e))?;
    let content_type = ContentType::parse(&artifact.content_type)
        .map_err(|e| DeliveryError::Compose(format!("invalid content type: {e}")))?;

    Message::builder()
        .from(from.clone())
        .to(to)
        .subject(REPORT_SUBJECT)
        .multipart(
            MultiPart::mixed()
                .singlepart(SinglePart::plain(REPORT_BODY.to_string()))
                .singlepart(Attachment::new(artifact.file_name).body(artifact.bytes, content_type)),
        )
        .map_err(|e| DeliveryError::Compose(e.to_string()))
}

fn classify(err: &lettre::transport::smtp::Error) -> DeliveryError {
    let message = err.to_string();
    // 535: authentication credentials invalid
    if err.is_permanent() && (message.contains("535") || message.contains("uthentication")) {
        DeliveryError::Authentication(message)
    } else {
        DeliveryError::Transport(message)
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn deliver(
        &self,
        to_email: &str,
        artifact: ReportArtifact,
    ) -> Result<(), DeliveryError> {
        let message = compose_message(&self.from, to_email, artifact)?;

        match tokio::time::timeout(self.timeout, self.transport.send(message)).await {
            Ok(Ok(response)) => {
                tracing::debug!(code = %response.code(), "report email accepted");
                Ok(())
            }
            Ok(Err(err)) => Err(classify(&err)),
            Err(_) => Err(DeliveryError::Timeout {
                after_secs: self.timeout.as_secs(),
            }),
        }
    }
}
