//! Page layout for advisory reports
//!
//! Positions every text line on fixed-size A4 pages. Nothing is wrapped or
//! dropped: each input line becomes exactly one placed line, and lines that
//! do not fit continue on the next page.

use advisor_model::LeadRequest;

/// A4 width in points
pub const PAGE_WIDTH: i64 = 595;
/// A4 height in points
pub const PAGE_HEIGHT: i64 = 842;
/// Left margin shared by all lines
pub const LEFT_MARGIN: i64 = 50;
/// Baseline of the first line on every page
pub const TOP_BASELINE: i64 = 800;
/// Lowest usable baseline
pub const BOTTOM_MARGIN: i64 = 50;
/// Font size in points
pub const FONT_SIZE: i64 = 12;
/// Spacing between header lines
pub const HEADER_SPACING: i64 = 20;
/// Leading between advisory lines
pub const BODY_LEADING: i64 = 14;

/// Title line of every report
pub const TITLE: &str = "Real Estate Inquiry Report";
/// Header line introducing the advisory text
pub const ADVICE_MARKER: &str = "Advice:";

/// One line of text at an absolute baseline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedLine {
    /// Baseline y coordinate
    pub y: i64,
    /// Line text
    pub text: String,
}

/// Lines of one page, top to bottom
pub type Page = Vec<PlacedLine>;

/// Header lines for a lead, title first and the advice marker last
#[must_use]
pub fn header_lines(lead: &LeadRequest) -> Vec<String> {
    let mut lines = vec![
        TITLE.to_string(),
        format!("Name: {}", lead.name.trim()),
        format!("Email: {}", lead.email.trim()),
    ];

    if let Some(region) = lead.region() {
        lines.push(format!("Region: {region}"));
    }

    match (lead.budget_min, lead.budget_max) {
        (Some(min), Some(max)) => lines.push(format!("Budget: AED {min} - AED {max}")),
        (Some(min), None) => lines.push(format!("Budget: from AED {min}")),
        (None, Some(max)) => lines.push(format!("Budget: up to AED {max}")),
        (None, None) => {}
    }

    let inquiry: Vec<&str> = lead.message.split_whitespace().collect();
    lines.push(format!("Inquiry: {}", inquiry.join(" ")));
    lines.push(ADVICE_MARKER.to_string());
    lines
}

/// Place header and advisory lines onto pages
#[must_use]
pub fn paginate(header: &[String], advisory_text: &str) -> Vec<Page> {
    let mut pages: Vec<Page> = Vec::new();
    let mut page: Page = Vec::new();
    let mut y = TOP_BASELINE;

    for line in header {
        page.push(PlacedLine {
            y,
            text: line.clone(),
        });
        y -= HEADER_SPACING;
    }

    for line in advisory_text.lines() {
        if y < BOTTOM_MARGIN {
            pages.push(std::mem::take(&mut page));
            y = TOP_BASELINE;
        }
        page.push(PlacedLine {
            y,
            text: line.to_string(),
        });
        y -= BODY_LEADING;
    }

    pages.push(page);
    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_includes_present_filters_only() {
        let lead = LeadRequest::new("A", "a@x.com", "2BR near beach");
        let lines = header_lines(&lead);
        assert_eq!(
            lines,
            vec![
                TITLE,
                "Name: A",
                "Email: a@x.com",
                "Inquiry: 2BR near beach",
                ADVICE_MARKER
            ]
        );

        let lead = lead
            .with_region("Al Rawda")
            .with_budget(Some(200_000), Some(400_000));
        let lines = header_lines(&lead);
        assert!(lines.contains(&"Region: Al Rawda".to_string()));
        assert!(lines.contains(&"Budget: AED 200000 - AED 400000".to_string()));
    }

    #[test]
    fn multi_line_inquiry_stays_on_one_header_line() {
        let lead = LeadRequest::new("A", "a@x.com", "villa\nwith pool");
        let lines = header_lines(&lead);
        assert!(lines.contains(&"Inquiry: villa with pool".to_string()));
    }

    #[test]
    fn short_report_fits_one_page() {
        let pages = paginate(&["T".to_string()], "one\ntwo");
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0][1].y, TOP_BASELINE - HEADER_SPACING);
        assert_eq!(pages[0][2].y, TOP_BASELINE - HEADER_SPACING - BODY_LEADING);
    }

    #[test]
    fn long_report_continues_without_dropping_lines() {
        let text: Vec<String> = (0..200).map(|i| format!("line {i}")).collect();
        let pages = paginate(&["T".to_string()], &text.join("\n"));

        assert!(pages.len() > 1);
        let placed: usize = pages.iter().map(Vec::len).sum();
        assert_eq!(placed, 201);
        for page in &pages {
            assert!(page.iter().all(|l| l.y >= BOTTOM_MARGIN && l.y <= TOP_BASELINE));
        }
    }

    #[test]
    fn blank_advisory_lines_are_kept() {
        let pages = paginate(&[], "a\n\nb");
        let texts: Vec<_> = pages[0].iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, ["a", "", "b"]);
    }
}
