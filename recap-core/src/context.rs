use crate::config::RecapConfig;
use crate::extractor::{path_of, IdentifierExtractor};
use crate::markup::PageMarkup;
use crate::restriction::RestrictionDetector;
use crate::types::*;
use serde::Serialize;

/// Identifiers handed in by the host for one page load
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageIdentifiers {
    pub url: String,
    pub path: String,
    pub court: Option<String>,
    pub pacer_case_id: Option<String>,
    pub pacer_doc_id: Option<String>,
}

impl PageIdentifiers {
    /// Derive everything the URL itself carries. A case id recovered from
    /// page links is left to `PageContext::from_page`.
    pub fn from_url(url: &str, config: &RecapConfig) -> Self {
        let extractor = IdentifierExtractor::new(config);
        Self {
            url: url.to_string(),
            path: path_of(url),
            court: extractor.court(url),
            pacer_case_id: extractor.case_id_from_url(url),
            pacer_doc_id: extractor.document_id(url),
        }
    }
}

/// Everything known about the current page. Built once per page load and
/// never changed afterwards; restriction is decided during construction.
#[derive(Debug, Clone, Serialize)]
pub struct PageContext {
    url: String,
    path: String,
    court: Option<String>,
    pacer_case_id: Option<String>,
    pacer_doc_id: Option<String>,
    classification: PageClassification,
    links: Vec<DocumentLink>,
    restricted: bool,
}

impl PageContext {
    /// Build from caller-supplied identifiers. Runs the restriction detector,
    /// which may insert its advisory into `page`.
    pub fn new(
        ids: PageIdentifiers,
        links: Vec<DocumentLink>,
        page: &mut PageMarkup,
        config: &RecapConfig,
    ) -> Self {
        let classification = IdentifierExtractor::new(config).classify(&ids.url, page);
        let restricted = RestrictionDetector::new(&config.restriction).apply(page);

        tracing::debug!(
            url = %ids.url,
            court = ids.court.as_deref().unwrap_or("-"),
            case = ids.pacer_case_id.as_deref().unwrap_or("-"),
            ?classification,
            restricted,
            "🔍 Page classified"
        );

        Self {
            url: ids.url,
            path: ids.path,
            court: ids.court,
            pacer_case_id: ids.pacer_case_id,
            pacer_doc_id: ids.pacer_doc_id,
            classification,
            links,
            restricted,
        }
    }

    /// Build from the URL and markup alone, recovering the case id from the
    /// page's links when the URL does not carry one
    pub fn from_page(url: &str, page: &mut PageMarkup, config: &RecapConfig) -> Self {
        let extractor = IdentifierExtractor::new(config);
        let links = extractor.document_links(url, page);

        let mut ids = PageIdentifiers::from_url(url, config);
        if ids.pacer_case_id.is_none() {
            ids.pacer_case_id =
                extractor.case_id_from_urls(links.iter().map(|link| link.url.as_str()));
        }

        Self::new(ids, links, page, config)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn court(&self) -> Option<&str> {
        self.court.as_deref()
    }

    pub fn pacer_case_id(&self) -> Option<&str> {
        self.pacer_case_id.as_deref()
    }

    pub fn pacer_doc_id(&self) -> Option<&str> {
        self.pacer_doc_id.as_deref()
    }

    pub fn classification(&self) -> PageClassification {
        self.classification
    }

    pub fn links(&self) -> &[DocumentLink] {
        &self.links
    }

    pub fn restricted(&self) -> bool {
        self.restricted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCKET_DISPLAY_URL: &str =
        "https://ecf.canb.uscourts.gov/cgi-bin/DktRpt.pl?101092135737069-L_1_0-1";

    #[test]
    fn recovers_case_id_from_page_links() {
        let config = RecapConfig::default();
        let mut page = PageMarkup::new(
            r#"<html><body><a href="/cgi-bin/HistDocQry.pl?531591">History</a>
            <a href="/doc1/034031438754">1</a></body></html>"#,
        );
        let context = PageContext::from_page(DOCKET_DISPLAY_URL, &mut page, &config);

        assert_eq!(context.classification(), PageClassification::DocketDisplay);
        assert_eq!(context.court(), Some("canb"));
        assert_eq!(context.pacer_case_id(), Some("531591"));
        assert_eq!(context.path(), "/cgi-bin/DktRpt.pl?101092135737069-L_1_0-1");
        assert_eq!(context.links().len(), 2);
        assert!(!context.restricted());
    }

    #[test]
    fn caller_supplied_case_id_is_kept() {
        let config = RecapConfig::default();
        let mut page = PageMarkup::new("<html><body></body></html>");
        let mut ids = PageIdentifiers::from_url(DOCKET_DISPLAY_URL, &config);
        ids.pacer_case_id = Some("42".to_string());

        let context = PageContext::new(ids, Vec::new(), &mut page, &config);
        assert_eq!(context.pacer_case_id(), Some("42"));
    }

    #[test]
    fn restriction_is_decided_at_construction() {
        let config = RecapConfig::default();
        let mut page = PageMarkup::new(
            "<html><body><form></form><table><tr><td>Warning!</td></tr></table></body></html>",
        );
        let context = PageContext::from_page(
            "https://ecf.canb.uscourts.gov/doc1/034031424909",
            &mut page,
            &config,
        );
        assert!(context.restricted());
        assert!(page.html().contains("will not be uploaded"));
    }
}
