//! Recording fakes for the collaborator traits, plus fixture loading

#![allow(dead_code)]

use async_trait::async_trait;
use recap_core::ui::AvailabilityBanner;
use recap_core::*;
use std::cell::RefCell;
use std::path::PathBuf;

pub const DOCKET_QUERY_URL: &str = "https://ecf.canb.uscourts.gov/cgi-bin/DktRpt.pl?531591";
pub const DOCKET_DISPLAY_URL: &str =
    "https://ecf.canb.uscourts.gov/cgi-bin/DktRpt.pl?101092135737069-L_1_0-1";
pub const SINGLE_DOC_URL: &str = "https://ecf.canb.uscourts.gov/doc1/034031424909";
pub const NONSENSE_URL: &str = "http://something.uscourts.gov/foobar/baz";

pub const OBJECT_URL: &str = "blob:recap/1";

pub const PDF_BYTES: &[u8] = b"%PDF-1.4\n1 0 obj\n<< /Type /Catalog >>\nendobj\n%%EOF";

pub fn load_page(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_fixtures/pages")
        .join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|_| panic!("Missing fixture: {}", path.display()))
}

// ============================================================================
// Archive
// ============================================================================

#[derive(Default)]
pub struct FakeArchive {
    pub dockets: Vec<DocketRecord>,
    pub documents: Vec<DocumentRecord>,
    pub upload_ack: bool,
    pub unreachable: bool,
    pub case_id: Option<String>,
    pub calls: RefCell<Vec<&'static str>>,
    pub document_queries: RefCell<Vec<Vec<String>>>,
    pub uploaded_documents: RefCell<Vec<DocumentUpload>>,
}

impl FakeArchive {
    pub fn accepting() -> Self {
        Self {
            upload_ack: true,
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn count(&self, name: &str) -> usize {
        self.calls.borrow().iter().filter(|call| **call == name).count()
    }

    fn record(&self, name: &'static str) -> Result<(), ArchiveError> {
        self.calls.borrow_mut().push(name);
        if self.unreachable {
            Err(ArchiveError::Transport("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait(?Send)]
impl ArchiveService for FakeArchive {
    async fn docket_availability(
        &self,
        _court: &str,
        _pacer_case_id: &str,
    ) -> Result<DocketAvailability, ArchiveError> {
        self.record("docket_availability")?;
        Ok(DocketAvailability {
            count: Some(self.dockets.len() as u64),
            results: self.dockets.clone(),
        })
    }

    async fn document_availability(
        &self,
        pacer_doc_ids: &[String],
        _court: &str,
    ) -> Result<DocumentAvailability, ArchiveError> {
        self.record("document_availability")?;
        self.document_queries.borrow_mut().push(pacer_doc_ids.to_vec());
        Ok(DocumentAvailability {
            results: self.documents.clone(),
        })
    }

    async fn upload_docket(
        &self,
        _court: &str,
        _pacer_case_id: &str,
        _html: &str,
    ) -> Result<bool, ArchiveError> {
        self.record("upload_docket")?;
        Ok(self.upload_ack)
    }

    async fn upload_attachment_menu(
        &self,
        _court: &str,
        _pacer_case_id: Option<&str>,
        _html: &str,
    ) -> Result<bool, ArchiveError> {
        self.record("upload_attachment_menu")?;
        Ok(self.upload_ack)
    }

    async fn upload_document(&self, upload: DocumentUpload) -> Result<bool, ArchiveError> {
        self.record("upload_document")?;
        self.uploaded_documents.borrow_mut().push(upload);
        Ok(self.upload_ack)
    }

    async fn case_id_for_document(
        &self,
        _court: &str,
        _pacer_doc_id: &str,
    ) -> Result<Option<String>, ArchiveError> {
        self.record("case_id_for_document")?;
        Ok(self.case_id.clone())
    }
}

// ============================================================================
// UI
// ============================================================================

/// Renders like the real UI and remembers what it was asked to do
#[derive(Default)]
pub struct RecordingUi {
    pub banners: RefCell<Vec<AvailabilityBanner>>,
    pub notifications: RefCell<Vec<String>>,
    pub popups: RefCell<Vec<String>>,
}

impl PageUi for RecordingUi {
    fn render_availability_banner(&self, page: &mut PageMarkup, banner: &AvailabilityBanner) {
        self.banners.borrow_mut().push(banner.clone());
        MarkupUi.render_availability_banner(page, banner);
    }

    fn render_inline_availability_marker(
        &self,
        page: &mut PageMarkup,
        link: &DocumentLink,
        archive_url: &str,
    ) -> bool {
        MarkupUi.render_inline_availability_marker(page, link, archive_url)
    }

    fn notify_upload_complete(&self, message: &str) {
        self.notifications.borrow_mut().push(message.to_string());
    }

    fn show_link_popup(&self, page: &mut PageMarkup, url: &str) {
        self.popups.borrow_mut().push(url.to_string());
        MarkupUi.show_link_popup(page, url);
    }
}

// ============================================================================
// Host and portal
// ============================================================================

pub struct FakeHost {
    pub cookie: bool,
    pub inline_pdf: bool,
    pub saved: RefCell<Vec<(String, usize)>>,
    pub navigated: RefCell<Vec<String>>,
    pub resumed: RefCell<Vec<FormSubmission>>,
}

impl Default for FakeHost {
    fn default() -> Self {
        Self {
            cookie: true,
            inline_pdf: true,
            saved: RefCell::default(),
            navigated: RefCell::default(),
            resumed: RefCell::default(),
        }
    }
}

impl HostEnvironment for FakeHost {
    fn has_session_cookie(&self) -> bool {
        self.cookie
    }

    fn can_display_pdf_inline(&self) -> bool {
        self.inline_pdf
    }

    fn create_object_url(&self, _bytes: &[u8], _content_type: &str) -> String {
        OBJECT_URL.to_string()
    }

    fn save_file(&self, filename: &str, bytes: &[u8]) {
        self.saved.borrow_mut().push((filename.to_string(), bytes.len()));
    }

    fn navigate(&self, url: &str) {
        self.navigated.borrow_mut().push(url.to_string());
    }

    fn resume_native_submission(&self, submission: &FormSubmission) {
        self.resumed.borrow_mut().push(submission.clone());
    }
}

#[derive(Default)]
pub struct FakePortal {
    /// `None` makes the submission fail
    pub response: Option<PortalResponse>,
    pub fetched: Option<PortalResponse>,
    pub submissions: RefCell<Vec<FormSubmission>>,
    pub fetches: RefCell<Vec<String>>,
}

impl FakePortal {
    pub fn answering(content_type: &str, body: &[u8]) -> Self {
        Self {
            response: Some(PortalResponse::new(content_type, body.to_vec())),
            ..Self::default()
        }
    }
}

#[async_trait(?Send)]
impl PortalTransport for FakePortal {
    async fn submit_form(&self, submission: &FormSubmission) -> Result<PortalResponse, PortalError> {
        self.submissions.borrow_mut().push(submission.clone());
        self.response
            .clone()
            .ok_or_else(|| PortalError::Transport("timed out".to_string()))
    }

    async fn fetch(&self, url: &str) -> Result<PortalResponse, PortalError> {
        self.fetches.borrow_mut().push(url.to_string());
        self.fetched.clone().ok_or(PortalError::Status(404))
    }
}

// ============================================================================
// Harness
// ============================================================================

#[derive(Default)]
pub struct Fakes {
    pub archive: FakeArchive,
    pub ui: RecordingUi,
    pub host: FakeHost,
    pub portal: FakePortal,
}

impl Fakes {
    pub fn with_archive(archive: FakeArchive) -> Self {
        Self {
            archive,
            ..Self::default()
        }
    }

    /// Portal that answers document requests with a PDF
    pub fn answering_pdf() -> Self {
        Self {
            portal: FakePortal::answering("application/pdf", PDF_BYTES),
            ..Self::default()
        }
    }

    pub fn services(&self) -> Services<'_> {
        Services {
            archive: &self.archive,
            ui: &self.ui,
            host: &self.host,
            portal: &self.portal,
        }
    }

    pub fn delegate<'a>(
        &'a self,
        config: &'a RecapConfig,
        url: &str,
        html: &str,
    ) -> ContentDelegate<'a> {
        ContentDelegate::from_page(url, html, NavigationHistory::new(), config, self.services())
    }
}
