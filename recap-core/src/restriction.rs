use crate::config::RestrictionConfig;
use crate::markup::PageMarkup;

pub const ADVISORY_ID: &str = "recap-restricted-advisory";

/// Decides whether a page shows a restricted (sealed or warned) document.
///
/// A page is restricted when it has a form and either a table cell carrying
/// the warning phrase or an emphasized element carrying the sealed marker.
pub struct RestrictionDetector<'a> {
    config: &'a RestrictionConfig,
}

impl<'a> RestrictionDetector<'a> {
    pub fn new(config: &'a RestrictionConfig) -> Self {
        Self { config }
    }

    pub fn detect(&self, page: &PageMarkup) -> bool {
        if !page.has_form() {
            return false;
        }
        page.has_table_cell_containing(&self.config.warning_phrase)
            || page
                .emphasized_texts()
                .iter()
                .any(|text| text.contains(&self.config.sealed_marker))
    }

    /// Detect, and when restricted insert the advisory at the top of the page.
    /// The advisory is inserted at most once per page.
    pub fn apply(&self, page: &mut PageMarkup) -> bool {
        let restricted = self.detect(page);
        if restricted && !page.contains_element_id(ADVISORY_ID) {
            tracing::info!("🔒 Restricted document detected, uploads disabled for this page");
            page.prepend_to_body(&advisory_markup());
        }
        restricted
    }
}

fn advisory_markup() -> String {
    format!(
        concat!(
            r#"<div id="{}" class="recap-banner recap-alert">"#,
            "<p>RECAP is disabled on this page: this document is restricted, ",
            "so it will not be uploaded to the public archive.</p></div>"
        ),
        ADVISORY_ID
    )
}
