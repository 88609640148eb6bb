//! PDF report renderer built on lopdf
//!
//! Produces uncompressed single-font documents: every placed line is one
//! `BT /F1 12 Tf x y Td (text) Tj ET` block, which keeps the output
//! deterministic and lets [`extract_lines`] read it back in reading order.
//! Text is shown in Helvetica under `/WinAnsiEncoding`.

use crate::layout::{self, Page, FONT_SIZE, LEFT_MARGIN, PAGE_HEIGHT, PAGE_WIDTH};
use crate::winansi;
use advisor_model::{LeadRequest, RenderError, ReportArtifact, ReportRenderer};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use std::collections::BTreeMap;

/// MIME type of rendered reports
pub const PDF_CONTENT_TYPE: &str = "application/pdf";
/// Default attachment name
pub const DEFAULT_FILE_NAME: &str = "advisory-report.pdf";

const FONT_RESOURCE: &[u8] = b"F1";

/// Renders advisory reports as A4 PDFs
#[derive(Debug, Clone)]
pub struct PdfReportRenderer {
    file_name: String,
}

impl PdfReportRenderer {
    /// Create renderer with the default attachment name
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With attachment file name
    #[inline]
    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }
}

impl Default for PdfReportRenderer {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_FILE_NAME.to_string(),
        }
    }
}

impl ReportRenderer for PdfReportRenderer {
    fn render(
        &self,
        lead: &LeadRequest,
        advisory_text: &str,
    ) -> Result<ReportArtifact, RenderError> {
        let header = layout::header_lines(lead);
        let pages = layout::paginate(&header, advisory_text);
        let bytes = build_document(&pages)?;

        tracing::debug!(pages = pages.len(), bytes = bytes.len(), "rendered report");

        Ok(ReportArtifact::new(
            self.file_name.clone(),
            PDF_CONTENT_TYPE,
            bytes,
        ))
    }
}

fn int(value: i64) -> Object {
    Object::Integer(value)
}

fn page_operations(page: &Page) -> Result<Vec<Operation>, RenderError> {
    let mut ops = Vec::with_capacity(page.len() * 5);
    for line in page {
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new(
            "Tf",
            vec![Object::Name(FONT_RESOURCE.to_vec()), int(FONT_SIZE)],
        ));
        ops.push(Operation::new("Td", vec![int(LEFT_MARGIN), int(line.y)]));
        ops.push(Operation::new(
            "Tj",
            vec![Object::string_literal(winansi::encode(&line.text)?)],
        ));
        ops.push(Operation::new("ET", vec![]));
    }
    Ok(ops)
}

fn build_document(pages: &[Page]) -> Result<Vec<u8>, RenderError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => winansi::ENCODING_NAME,
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for page in pages {
        let content = Content {
            operations: page_operations(page)?,
        };
        let encoded = content
            .encode()
            .map_err(|e| RenderError::Encoding(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id: ObjectId = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = i64::try_from(kids.len())
        .map_err(|e| RenderError::Encoding(format!("too many pages: {e}")))?;
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => page_count,
        "Resources" => resources_id,
        "MediaBox" => vec![int(0), int(0), int(PAGE_WIDTH), int(PAGE_HEIGHT)],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| RenderError::Write(e.to_string()))?;
    Ok(bytes)
}

/// Read every text line of a rendered report, in reading order
///
/// Strings are decoded through the encoding declared by the font selected
/// for them.
///
/// # Errors
/// `RenderError::Encoding` if the bytes are not a readable PDF or text is
/// shown in a font whose encoding is not WinAnsi.
pub fn extract_lines(bytes: &[u8]) -> Result<Vec<String>, RenderError> {
    let doc = Document::load_mem(bytes)
        .map_err(|e| RenderError::Encoding(format!("unreadable report: {e}")))?;

    let mut lines = Vec::new();
    for page_id in doc.get_pages().into_values() {
        let winansi_fonts: BTreeMap<Vec<u8>, bool> = doc
            .get_page_fonts(page_id)
            .map_err(|e| RenderError::Encoding(format!("unreadable fonts: {e}")))?
            .into_iter()
            .map(|(name, font)| {
                let encoding = font.get(b"Encoding").and_then(Object::as_name);
                (name, encoding.ok() == Some(winansi::ENCODING_NAME.as_bytes()))
            })
            .collect();

        let raw = doc
            .get_page_content(page_id)
            .map_err(|e| RenderError::Encoding(format!("unreadable page: {e}")))?;
        let content = Content::decode(&raw)
            .map_err(|e| RenderError::Encoding(format!("unreadable content: {e}")))?;

        let mut current_font: Option<&[u8]> = None;
        for op in &content.operations {
            match op.operator.as_str() {
                "Tf" => {
                    current_font = op.operands.first().and_then(|o| o.as_name().ok());
                }
                "Tj" => {
                    let decodable = current_font
                        .and_then(|font| winansi_fonts.get(font).copied())
                        .unwrap_or(false);
                    if !decodable {
                        return Err(RenderError::Encoding(
                            "text shown without a WinAnsi font".to_string(),
                        ));
                    }
                    if let Some(Object::String(text, _)) = op.operands.first() {
                        lines.push(winansi::decode(text));
                    }
                }
                _ => {}
            }
        }
    }
    Ok(lines)
}

/// Read back only the advisory lines, i.e. everything after the marker line
///
/// # Errors
/// `RenderError::Encoding` if the bytes are unreadable or lack the marker.
pub fn extract_advice(bytes: &[u8]) -> Result<Vec<String>, RenderError> {
    let mut lines = extract_lines(bytes)?;
    let marker = lines
        .iter()
        .position(|line| line == layout::ADVICE_MARKER)
        .ok_or_else(|| RenderError::Encoding("report has no advice section".to_string()))?;
    Ok(lines.split_off(marker + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_is_named_pdf() {
        let lead = LeadRequest::new("A", "a@x.com", "villa");
        let artifact = PdfReportRenderer::new()
            .with_file_name("report.pdf")
            .render(&lead, "advice")
            .unwrap();

        assert_eq!(artifact.file_name, "report.pdf");
        assert_eq!(artifact.content_type, PDF_CONTENT_TYPE);
        assert!(artifact.bytes.starts_with(b"%PDF-1.5"));
    }

    #[test]
    fn garbage_is_not_a_report() {
        assert!(matches!(
            extract_lines(b"not a pdf"),
            Err(RenderError::Encoding(_))
        ));
    }
}
