//! Append-only lead log backed by Google Sheets
//!
//! Each advised lead becomes one `values:append` call carrying a single row.
//! Rows are inserted, never updated, and failures are reported as-is.

use advisor_model::{CellValue, LeadLog, LeadRecord, LeadRequest, PersistenceError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::{json, Value};
use std::fmt;
use std::time::Duration;

/// Public Sheets API root
pub const DEFAULT_SHEETS_BASE_URL: &str = "https://sheets.googleapis.com";
/// Range of the first worksheet
pub const DEFAULT_RANGE: &str = "Sheet1";

/// Cells are stored exactly as sent, never parsed as formulas or numbers
const VALUE_INPUT_OPTION: &str = "RAW";

/// Lead log appending rows to one spreadsheet
#[derive(Clone)]
pub struct SheetsLog {
    http: Client,
    base_url: String,
    spreadsheet_id: String,
    range: String,
    access_token: String,
    timeout: Duration,
}

impl SheetsLog {
    /// Create log for a spreadsheet key, authenticated with a bearer token
    ///
    /// The token is sent as given and never refreshed; once it expires every
    /// append fails with `PersistenceError::Unauthorized`.
    ///
    /// # Errors
    /// `PersistenceError::Transport` if the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        spreadsheet_id: impl Into<String>,
        access_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, PersistenceError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PersistenceError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            spreadsheet_id: spreadsheet_id.into(),
            range: DEFAULT_RANGE.to_string(),
            access_token: access_token.into(),
            timeout,
        })
    }

    /// With target range (worksheet name)
    #[inline]
    #[must_use]
    pub fn with_range(mut self, range: impl Into<String>) -> Self {
        self.range = range.into();
        self
    }

    fn append_url(&self) -> Result<Url, PersistenceError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| PersistenceError::Transport(format!("invalid base url: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| PersistenceError::Transport("base url cannot hold a path".to_string()))?
            .pop_if_empty()
            .extend([
                "v4",
                "spreadsheets",
                self.spreadsheet_id.as_str(),
                "values",
                format!("{}:append", self.range).as_str(),
            ]);
        Ok(url)
    }

    fn map_transport(&self, err: &reqwest::Error) -> PersistenceError {
        if err.is_timeout() {
            PersistenceError::Timeout {
                after_secs: self.timeout.as_secs(),
            }
        } else {
            PersistenceError::Transport(err.to_string())
        }
    }
}

impl fmt::Debug for SheetsLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetsLog")
            .field("base_url", &self.base_url)
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("range", &self.range)
            .finish_non_exhaustive()
    }
}

/// JSON row for a record, in column order
#[must_use]
pub fn record_row(record: &LeadRecord) -> Vec<Value> {
    record
        .cells()
        .into_iter()
        .map(|cell| match cell {
            CellValue::Text(text) => Value::String(text),
            CellValue::Number(n) => Value::from(n),
            CellValue::Empty => Value::String(String::new()),
        })
        .collect()
}

/// Placeholder carried in the error when a failure response body is lost
fn unreadable_body(err: &dyn fmt::Display) -> String {
    format!("<response body unreadable: {err}>")
}

#[async_trait]
impl LeadLog for SheetsLog {
    async fn record(
        &self,
        lead: &LeadRequest,
        advisory_text: &str,
    ) -> Result<(), PersistenceError> {
        let record = LeadRecord::from_lead(lead, advisory_text);
        let body = json!({
            "majorDimension": "ROWS",
            "values": [record_row(&record)],
        });

        let response = self
            .http
            .post(self.append_url()?)
            .query(&[
                ("valueInputOption", VALUE_INPUT_OPTION),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport(&e))?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(range = %self.range, "appended lead row");
            return Ok(());
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|e| unreadable_body(&e));
        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                PersistenceError::Unauthorized(body)
            }
            StatusCode::TOO_MANY_REQUESTS => PersistenceError::QuotaExceeded(body),
            _ => PersistenceError::Rejected {
                status: status.as_u16(),
                body,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_url_targets_range() {
        let log = SheetsLog::new(
            "https://sheets.googleapis.com",
            "key-123",
            "token",
            Duration::from_secs(1),
        )
        .unwrap()
        .with_range("Leads");

        assert_eq!(
            log.append_url().unwrap().as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/key-123/values/Leads:append"
        );
    }

    #[test]
    fn absent_filters_become_blank_cells() {
        let lead = LeadRequest::new("B", "b@x.com", "studio");
        let row = record_row(&LeadRecord::from_lead(&lead, "advice"));

        assert_eq!(row.len(), 8);
        assert_eq!(row[3], json!(""));
        assert_eq!(row[4], json!(""));
        assert_eq!(row[7], json!("advice"));
    }

    #[test]
    fn lost_error_body_is_reported() {
        let err = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "connection closed");
        assert_eq!(
            unreadable_body(&err),
            "<response body unreadable: connection closed>"
        );
    }

    #[test]
    fn debug_hides_token() {
        let log = SheetsLog::new("http://localhost", "k", "secret-token", Duration::from_secs(1))
            .unwrap();
        assert!(!format!("{log:?}").contains("secret-token"));
    }
}
