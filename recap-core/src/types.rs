use serde::{Deserialize, Deserializer, Serialize};

// ===== PAGE CLASSIFICATION =====
// Exactly one classification holds per page. It is derived from the URL
// family and, for single-document URLs, from the form markers on the page.

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PageClassification {
    /// `DktRpt.pl?<digits>`: the docket query form for a known case
    DocketQuery,
    /// `DktRpt.pl?<token>-L_...`: a rendered docket report
    DocketDisplay,
    /// `doc1/<id>` page listing the parts of one filing ("Download All")
    AttachmentMenu,
    /// `doc1/<id>` receipt page where only archive availability is shown
    SingleDocumentCheck,
    /// `doc1/<id>` receipt page whose document request gets captured
    SingleDocumentView,
    /// Anything else. Terminal: no handler runs.
    Unrecognized,
}

impl PageClassification {
    pub fn is_single_document(&self) -> bool {
        matches!(
            self,
            PageClassification::SingleDocumentCheck | PageClassification::SingleDocumentView
        )
    }
}

/// Shape of a portal URL before any markup is consulted
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum UrlFamily {
    DocketQuery,
    DocketDisplay,
    Document,
    Other,
}

/// Reference to an anchor already present in the host page.
///
/// `href` is the raw attribute value (used to find the anchor again when
/// annotating it); `url` is the same link resolved against the page URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentLink {
    pub href: String,
    pub url: String,
    pub pacer_doc_id: Option<String>,
}

impl DocumentLink {
    pub fn new(href: &str, url: &str) -> Self {
        Self {
            href: href.to_string(),
            url: url.to_string(),
            pacer_doc_id: None,
        }
    }
}

// ===== CAPTURE TYPES =====

/// What the intercepted document request produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapturedContent {
    /// The document itself (a PDF)
    Binary(Vec<u8>),
    /// Markup: either the portal's embedded-viewer page or plain HTML to display
    Wrapper(String),
}

/// A captured document. Lives for one capture and is consumed by the upload step.
#[derive(Debug, Clone)]
pub struct CapturedDocument {
    pub content: CapturedContent,
    pub pacer_doc_id: Option<String>,
    /// Filled in from the archive when the page did not carry a case id
    pub recovered_case_id: Option<String>,
}

impl CapturedDocument {
    pub fn new(content: CapturedContent, pacer_doc_id: Option<String>) -> Self {
        Self {
            content,
            pacer_doc_id,
            recovered_case_id: None,
        }
    }
}

/// Document/attachment numbers scraped from a single-document receipt page
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentNumbers {
    pub document_number: String,
    pub attachment_number: Option<String>,
    pub docket_number: Option<String>,
}

/// Programmatic version of a portal form submission
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FormSubmission {
    pub form_id: String,
    pub action: String,
    pub method: String,
    pub fields: Vec<(String, String)>,
}

/// Raw response from the portal, before classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalResponse {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl PortalResponse {
    pub fn new(content_type: &str, bytes: Vec<u8>) -> Self {
        Self {
            content_type: content_type.to_string(),
            bytes,
        }
    }
}

// ===== NAVIGATION =====

/// State carried by one navigation-history entry
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NavigationSnapshot {
    /// Page markup to restore when this entry is navigated back to
    pub content: Option<String>,
    /// Idempotency marker: the page's upload already happened
    #[serde(default)]
    pub uploaded: bool,
}

impl NavigationSnapshot {
    pub fn with_content(content: String) -> Self {
        Self {
            content: Some(content),
            uploaded: false,
        }
    }

    pub fn uploaded() -> Self {
        Self {
            content: None,
            uploaded: true,
        }
    }
}

// ===== ARCHIVE PROTOCOL TYPES =====

/// Upload type codes owned by the archive service. Values are protocol
/// constants and must not be renumbered.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum UploadType {
    Docket,
    AttachmentPage,
    Pdf,
}

impl UploadType {
    pub fn code(&self) -> u8 {
        match self {
            UploadType::Docket => 1,
            UploadType::AttachmentPage => 2,
            UploadType::Pdf => 3,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocketAvailability {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub results: Vec<DocketRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocketRecord {
    pub date_modified: String,
    pub absolute_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentAvailability {
    #[serde(default)]
    pub results: Vec<DocumentRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentRecord {
    /// The archive reports this as a number or a string depending on endpoint
    #[serde(deserialize_with = "string_or_number")]
    pub pacer_doc_id: String,
    pub filepath_local: String,
}

/// Everything the archive needs to store one captured document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentUpload {
    pub court: String,
    pub pacer_case_id: String,
    pub pacer_doc_id: String,
    pub document_number: String,
    pub attachment_number: Option<String>,
    pub bytes: Vec<u8>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}
