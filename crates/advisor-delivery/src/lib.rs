//! Lead Advisor delivery adapters
//!
//! Real implementations of the outbound ports:
//! - [`SheetsLog`]: append-only lead log in a Google spreadsheet
//! - [`SmtpNotifier`]: report email over an implicit-TLS relay

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod sheets;
pub mod smtp;

pub use sheets::{record_row, SheetsLog, DEFAULT_RANGE, DEFAULT_SHEETS_BASE_URL};
pub use smtp::{compose_message, SmtpNotifier, SmtpSettings, REPORT_BODY, REPORT_SUBJECT};
