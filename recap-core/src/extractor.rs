use crate::config::RecapConfig;
use crate::markup::PageMarkup;
use crate::types::*;
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

// Portal URL families. The report scripts take either a bare case id
// (query form) or a session-scoped display token (rendered report).
static DOCKET_QUERY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/(?:DktRpt|HistDocQry)\.pl\?\d+$").unwrap());

static DOCKET_DISPLAY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/(?:DktRpt|HistDocQry)\.pl\?\w+-L_").unwrap());

static DOCUMENT_PATH_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/doc1/\d+|^/cgi-bin/show_doc").unwrap());

static DOCUMENT_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/doc1/(\d+)$").unwrap());

static CASE_ID_QUERY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:^|&)caseid=(\d+)").unwrap());

static CASE_ID_SCRIPT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/(?:DktRpt|HistDocQry|iquery)\.pl$").unwrap());

static DIGITS_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+$").unwrap());

/// Button label of the attachment menu's bulk download
pub const DOWNLOAD_ALL_MARKER: &str = "Download All";
/// Button label on a single-document receipt page
pub const VIEW_DOCUMENT_MARKER: &str = "View Document";
/// Cell text naming the rendered image of a single document
pub const IMAGE_CELL_MARKER: &str = "Image";

/// Turns URLs and page markup into page classifications and identifiers.
///
/// Never fails: input that does not match a known portal family simply
/// yields `Unrecognized` / `None`.
pub struct IdentifierExtractor<'a> {
    config: &'a RecapConfig,
}

impl<'a> IdentifierExtractor<'a> {
    pub fn new(config: &'a RecapConfig) -> Self {
        Self { config }
    }

    /// Court code for a portal URL (`https://ecf.canb.uscourts.gov/...` -> `canb`)
    pub fn court(&self, url: &str) -> Option<String> {
        let parsed = Url::parse(url).ok()?;
        let host = parsed.host_str()?.to_ascii_lowercase();

        if let Some(court) = self.config.portal.court_for_host(&host) {
            return Some(court.to_string());
        }

        let labels: Vec<&str> = host.split('.').collect();
        match labels.as_slice() {
            [prefix, court, "uscourts", "gov"] if matches!(*prefix, "ecf" | "pacer") => {
                Some((*court).to_string())
            }
            _ => None,
        }
    }

    fn is_portal_url(&self, url: &str) -> bool {
        self.court(url).is_some()
    }

    /// Classify a URL by shape alone
    pub fn url_family(&self, url: &str) -> UrlFamily {
        if !self.is_portal_url(url) {
            return UrlFamily::Other;
        }
        let Some(path_and_query) = path_and_query(url) else {
            return UrlFamily::Other;
        };

        if DOCKET_QUERY_REGEX.is_match(&path_and_query) {
            UrlFamily::DocketQuery
        } else if DOCKET_DISPLAY_REGEX.is_match(&path_and_query) {
            UrlFamily::DocketDisplay
        } else if DOCUMENT_PATH_REGEX.is_match(&path_and_query) {
            UrlFamily::Document
        } else {
            UrlFamily::Other
        }
    }

    /// Classify a page. Single-document URLs are refined by their form markers:
    /// "Download All" marks an attachment menu; "View Document" with an
    /// image cell marks a document receipt, which is captured only when
    /// uploads are enabled.
    pub fn classify(&self, url: &str, page: &PageMarkup) -> PageClassification {
        match self.url_family(url) {
            UrlFamily::DocketQuery => PageClassification::DocketQuery,
            UrlFamily::DocketDisplay => PageClassification::DocketDisplay,
            UrlFamily::Document => {
                if is_attachment_menu(page) {
                    PageClassification::AttachmentMenu
                } else if is_single_document_page(page) && self.config.archive.upload_enabled {
                    PageClassification::SingleDocumentView
                } else {
                    PageClassification::SingleDocumentCheck
                }
            }
            UrlFamily::Other => PageClassification::Unrecognized,
        }
    }

    /// Case id carried directly by a docket query URL
    pub fn case_id_from_url(&self, url: &str) -> Option<String> {
        if self.url_family(url) != UrlFamily::DocketQuery {
            return None;
        }
        let parsed = Url::parse(url).ok()?;
        parsed
            .query()
            .filter(|query| DIGITS_REGEX.is_match(query))
            .map(str::to_string)
    }

    /// Recover the case id from links on the page: docket display URLs only
    /// carry a session token, but the page links back to the case by id.
    pub fn case_id_from_urls<'u, I>(&self, urls: I) -> Option<String>
    where
        I: IntoIterator<Item = &'u str>,
    {
        urls.into_iter().find_map(|url| {
            if !self.is_portal_url(url) {
                return None;
            }
            let parsed = Url::parse(url).ok()?;
            let query = parsed.query()?;

            if let Some(caps) = CASE_ID_QUERY_REGEX.captures(query) {
                return Some(caps[1].to_string());
            }
            if CASE_ID_SCRIPT_REGEX.is_match(parsed.path()) && DIGITS_REGEX.is_match(query) {
                return Some(query.to_string());
            }
            None
        })
    }

    /// Normalized document id of a `doc1` URL.
    ///
    /// The portal uses the fourth digit as a "receipt already shown" flag,
    /// so it is always reset to `0`.
    pub fn document_id(&self, url: &str) -> Option<String> {
        if !self.is_portal_url(url) {
            return None;
        }
        let parsed = Url::parse(url).ok()?;
        let caps = DOCUMENT_ID_REGEX.captures(parsed.path())?;
        Some(normalize_document_id(&caps[1]))
    }

    /// Collect the page's anchors, resolved against the page URL and annotated
    /// with their document id where they point at a document
    pub fn document_links(&self, page_url: &str, page: &PageMarkup) -> Vec<DocumentLink> {
        let base = Url::parse(page_url).ok();
        page.anchor_hrefs()
            .into_iter()
            .filter_map(|href| {
                let resolved = match &base {
                    Some(base) => base.join(&href).ok()?.to_string(),
                    None => Url::parse(&href).ok()?.to_string(),
                };
                let mut link = DocumentLink::new(&href, &resolved);
                link.pacer_doc_id = self.document_id(&resolved);
                Some(link)
            })
            .collect()
    }
}

pub fn normalize_document_id(raw: &str) -> String {
    if raw.len() < 4 || !raw.is_ascii() {
        return raw.to_string();
    }
    format!("{}0{}", &raw[..3], &raw[4..])
}

pub fn is_attachment_menu(page: &PageMarkup) -> bool {
    page.has_form() && page.has_input_value(DOWNLOAD_ALL_MARKER)
}

pub fn is_single_document_page(page: &PageMarkup) -> bool {
    page.has_form()
        && page.has_input_value(VIEW_DOCUMENT_MARKER)
        && page.has_table_cell_containing(IMAGE_CELL_MARKER)
}

fn path_and_query(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    Some(match parsed.query() {
        Some(query) => format!("{}?{}", parsed.path(), query),
        None => parsed.path().to_string(),
    })
}

/// Path (with query) of a URL, as the host page reports `location.pathname + search`
pub fn path_of(url: &str) -> String {
    path_and_query(url).unwrap_or_default()
}
