//! Lead Advisor report rendering
//!
//! Renders `(LeadRequest, advisory text)` into a fixed-page-size PDF held in
//! memory, and reads rendered reports back as text lines.
//!
//! Rendering is pure: identical inputs produce identical bytes.

#![warn(unreachable_pub)]

pub mod layout;
pub mod pdf;
pub mod winansi;

pub use pdf::{extract_advice, extract_lines, PdfReportRenderer, PDF_CONTENT_TYPE};
