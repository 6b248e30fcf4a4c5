use crate::markup::PageMarkup;
use crate::types::DocumentLink;
use chrono::DateTime;
use html_escape::{encode_double_quoted_attribute, encode_text};

pub const BANNER_CLASS: &str = "recap-banner";
pub const INLINE_MARKER_CLASS: &str = "recap-inline";
pub const POPUP_SHADE_ID: &str = "recap-shade";
pub const POPUP_CLASS: &str = "recap-popup";

/// What an availability banner should say
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvailabilityBanner {
    /// The archive holds this docket, last refreshed at `date_modified`
    Docket { date_modified: String, url: String },
    /// The archive holds the document shown on this page
    Document { url: String },
}

/// Everything the core changes on screen goes through here
pub trait PageUi {
    fn render_availability_banner(&self, page: &mut PageMarkup, banner: &AvailabilityBanner);

    /// Put a small archive link right after an existing document link.
    /// Returns false when the link is no longer on the page.
    fn render_inline_availability_marker(
        &self,
        page: &mut PageMarkup,
        link: &DocumentLink,
        archive_url: &str,
    ) -> bool;

    fn notify_upload_complete(&self, message: &str);

    fn show_link_popup(&self, page: &mut PageMarkup, url: &str);
}

/// Renders straight into the page markup and reports notifications to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkupUi;

impl MarkupUi {
    pub fn new() -> Self {
        Self
    }
}

impl PageUi for MarkupUi {
    fn render_availability_banner(&self, page: &mut PageMarkup, banner: &AvailabilityBanner) {
        match banner {
            AvailabilityBanner::Docket { date_modified, url } => {
                page.prepend_to_body(&format!(
                    concat!(
                        r#"<div class="{class}"><a title="Docket is available for free from RECAP." href="{href}">"#,
                        "View and Search this docket as of {date} for free from RECAP</a>",
                        "<br><small>Note that archived dockets may be out of date.</small></div>"
                    ),
                    class = BANNER_CLASS,
                    href = encode_double_quoted_attribute(url),
                    date = encode_text(&display_date(date_modified)),
                ));
            }
            AvailabilityBanner::Document { url } => {
                page.append_to_form(&format!(
                    concat!(
                        r#"<div class="{class}"><a title="Document is available for free from RECAP." href="{href}">"#,
                        "Download this document for free from RECAP</a></div>"
                    ),
                    class = BANNER_CLASS,
                    href = encode_double_quoted_attribute(url),
                ));
            }
        }
    }

    fn render_inline_availability_marker(
        &self,
        page: &mut PageMarkup,
        link: &DocumentLink,
        archive_url: &str,
    ) -> bool {
        let marker = format!(
            r#"<a class="{}" title="Available for free from the RECAP Archive." href="{}">[RECAP]</a>"#,
            INLINE_MARKER_CLASS,
            encode_double_quoted_attribute(archive_url),
        );
        page.insert_after_anchor(&link.href, &marker)
    }

    fn notify_upload_complete(&self, message: &str) {
        tracing::info!("📤 {message}");
    }

    fn show_link_popup(&self, page: &mut PageMarkup, url: &str) {
        let href = encode_double_quoted_attribute(url);
        page.append_to_body(&format!(
            concat!(
                r#"<div id="{shade}"></div>"#,
                r#"<div class="{popup}"><p>This document is available for free from the RECAP Archive.</p>"#,
                r#"<a href="{href}">Get it from RECAP</a></div>"#
            ),
            shade = POPUP_SHADE_ID,
            popup = POPUP_CLASS,
            href = href,
        ));
    }
}

/// `2015-04-01T12:04:59.123Z` -> `4/1/2015`; anything unparseable is shown as given
pub fn display_date(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(date) => date.format("%-m/%-d/%Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn docket_banner_carries_date_and_link() {
        let mut page = PageMarkup::new("<html><body><p>docket</p></body></html>");
        MarkupUi.render_availability_banner(
            &mut page,
            &AvailabilityBanner::Docket {
                date_modified: "2015-04-01T12:04:59Z".to_string(),
                url: "https://www.courtlistener.com/download/gov.uscourts.canb.531591/docket.html"
                    .to_string(),
            },
        );
        let html = page.html();
        assert!(html.contains(r#"class="recap-banner""#));
        assert!(html.contains("4/1/2015"));
        assert!(html.contains("https://www.courtlistener.com/download/"));
        assert!(html.find("recap-banner").unwrap() < html.find("<p>docket").unwrap());
    }

    #[test]
    fn document_banner_lands_in_the_form() {
        let mut page = PageMarkup::new("<html><body><form><input></form></body></html>");
        MarkupUi.render_availability_banner(
            &mut page,
            &AvailabilityBanner::Document {
                url: "https://www.courtlistener.com/download/x.pdf".to_string(),
            },
        );
        let html = page.html();
        assert!(html.find("recap-banner").unwrap() < html.find("</form>").unwrap());
    }

    #[test]
    fn inline_marker_follows_the_link() {
        let mut page = PageMarkup::new(r#"<a href="/doc1/034031438754">1</a> next"#);
        let link = DocumentLink::new(
            "/doc1/034031438754",
            "https://ecf.canb.uscourts.gov/doc1/034031438754",
        );
        assert!(MarkupUi.render_inline_availability_marker(&mut page, &link, "https://a/b.pdf"));
        assert_eq!(page.html().matches(INLINE_MARKER_CLASS).count(), 1);
        assert!(page.html().ends_with("[RECAP]</a> next"));
    }

    #[test]
    fn popup_adds_shade_and_link() {
        let mut page = PageMarkup::new("<html><body></body></html>");
        MarkupUi.show_link_popup(&mut page, "https://www.courtlistener.com/download/x.pdf");
        assert!(page.contains_element_id(POPUP_SHADE_ID));
        assert!(page.html().contains(POPUP_CLASS));
    }

    #[test]
    fn unparseable_dates_are_shown_raw() {
        assert_eq!(display_date("yesterday"), "yesterday");
    }
}
