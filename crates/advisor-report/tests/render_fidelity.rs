//! Rendered reports reproduce their input text

use advisor_model::{LeadRequest, RenderError, ReportRenderer};
use advisor_report::layout::{ADVICE_MARKER, TITLE};
use advisor_report::{extract_advice, extract_lines, PdfReportRenderer};
use lopdf::Document;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn lead() -> LeadRequest {
    LeadRequest::new("A", "a@x.com", "2BR near beach")
        .with_region("Al Rawda")
        .with_budget(Some(200_000), Some(400_000))
}

#[test]
fn report_contains_header_and_advice() {
    let artifact = PdfReportRenderer::new()
        .render(&lead(), "Consider Al Rawda; ROI ~7%.")
        .unwrap();

    assert_eq!(
        extract_lines(&artifact.bytes).unwrap(),
        vec![
            TITLE,
            "Name: A",
            "Email: a@x.com",
            "Region: Al Rawda",
            "Budget: AED 200000 - AED 400000",
            "Inquiry: 2BR near beach",
            ADVICE_MARKER,
            "Consider Al Rawda; ROI ~7%.",
        ]
    );
}

#[test]
fn long_advice_survives_across_pages() {
    let text: String = (0..400)
        .map(|i| format!("{i:03}: consider the (north) side \\ near Corniche, yield {i}%"))
        .collect::<Vec<_>>()
        .join("\n");
    assert!(text.len() > 10_000);

    let artifact = PdfReportRenderer::new().render(&lead(), &text).unwrap();
    let advice = extract_advice(&artifact.bytes).unwrap();

    let expected: Vec<&str> = text.lines().collect();
    assert_eq!(advice, expected);
}

#[test]
fn very_long_single_line_is_not_truncated() {
    let line = "Al Jurf ".repeat(500);
    let artifact = PdfReportRenderer::new().render(&lead(), &line).unwrap();
    assert_eq!(extract_advice(&artifact.bytes).unwrap(), vec![line]);
}

#[test]
fn rendering_is_deterministic() {
    let renderer = PdfReportRenderer::new();
    let first = renderer.render(&lead(), "same\ntext").unwrap();
    let second = renderer.render(&lead(), "same\ntext").unwrap();
    assert_eq!(first.bytes, second.bytes);
}

#[test]
fn accented_names_and_typographic_advice_survive() {
    let lead = LeadRequest::new("Jos\u{e9} M\u{fc}ller", "jose@x.com", "Villa \u{e0} Ajman");
    let advice = "Consider Al Rawda \u{2013} ROI ~7% \u{2022} it\u{2019}s close\n\
                  \u{201C}Quiet\u{201D} \u{2014} \u{20AC}1.2M\u{2026}";

    let artifact = PdfReportRenderer::new().render(&lead, advice).unwrap();
    let lines = extract_lines(&artifact.bytes).unwrap();

    assert_eq!(lines[1], "Name: Jos\u{e9} M\u{fc}ller");
    assert_eq!(lines[3], "Inquiry: Villa \u{e0} Ajman");
    assert_eq!(
        extract_advice(&artifact.bytes).unwrap(),
        advice.lines().collect::<Vec<_>>()
    );
}

#[test]
fn viewer_side_extraction_matches_input() {
    let lead = LeadRequest::new("Jos\u{e9}", "jose@x.com", "2BR near beach");
    let advice = "Consider Al Rawda \u{2013} ROI ~7% \u{2022} it\u{2019}s close";

    let artifact = PdfReportRenderer::new().render(&lead, advice).unwrap();
    let doc = Document::load_mem(&artifact.bytes).unwrap();
    let text = doc.extract_text(&[1]).unwrap();

    let shown: Vec<&str> = text.lines().collect();
    assert!(shown.contains(&"Name: Jos\u{e9}"), "{shown:?}");
    assert!(shown.contains(&advice), "{shown:?}");
}

#[test]
fn font_declares_winansi_encoding() {
    let artifact = PdfReportRenderer::new().render(&lead(), "advice").unwrap();
    let doc = Document::load_mem(&artifact.bytes).unwrap();
    let page_id = doc.page_iter().next().unwrap();
    let fonts = doc.get_page_fonts(page_id).unwrap();

    let font = fonts.get(b"F1".as_slice()).unwrap();
    assert_eq!(
        font.get(b"Encoding").unwrap().as_name().unwrap(),
        b"WinAnsiEncoding".as_slice()
    );
}

#[test]
fn text_outside_font_repertoire_is_an_encoding_error() {
    let arabic = "Ajman \u{0639}\u{062C}\u{0645}\u{0627}\u{0646}";
    let result = PdfReportRenderer::new().render(&lead(), arabic);
    assert!(matches!(result, Err(RenderError::Encoding(_))));

    let name = LeadRequest::new("\u{5F20}\u{4F1F}", "z@x.com", "studio");
    assert!(matches!(
        PdfReportRenderer::new().render(&name, "advice"),
        Err(RenderError::Encoding(_))
    ));
}

/// Printable ASCII, Latin-1 letters and the typographic marks models favour
const LINE_PATTERN: &str = "[ -~\u{c0}-\u{ff}\u{152}\u{153}\u{2013}\u{2014}\u{2018}\u{2019}\
                            \u{201C}\u{201D}\u{2022}\u{2026}\u{20AC}]{0,120}";

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_every_line_round_trips_in_order(
        lines in prop::collection::vec(LINE_PATTERN, 1..120)
    ) {
        let text = lines.join("\n");
        let artifact = PdfReportRenderer::new().render(&lead(), &text).unwrap();
        let advice = extract_advice(&artifact.bytes).unwrap();
        let expected: Vec<&str> = text.lines().collect();
        prop_assert_eq!(advice, expected);
    }
}
