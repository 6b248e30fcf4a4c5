use crate::capture::{ClassifiedResponse, ViewerFrame, BLANK_SOURCE, PDF_CONTENT_TYPE};
use crate::config::{FilenameStyle, RecapConfig};
use crate::delegate::Services;
use crate::error::{ArchiveError, CaptureError};
use crate::handlers::{CaptureReport, DisplayMode, SkipReason, UploadOutcome};
use crate::markup::PageMarkup;
use crate::navigation::NavigationStateManager;
use crate::types::{CapturedContent, CapturedDocument, DocumentNumbers, DocumentUpload};
use url::Url;

/// A whole page to contribute to the archive
#[derive(Debug, Clone, Copy)]
pub enum PageUpload<'p> {
    Docket {
        court: &'p str,
        pacer_case_id: &'p str,
        html: &'p str,
    },
    AttachmentMenu {
        court: &'p str,
        pacer_case_id: Option<&'p str>,
        html: &'p str,
    },
}

impl PageUpload<'_> {
    fn label(&self) -> &'static str {
        match self {
            PageUpload::Docket { .. } => "docket",
            PageUpload::AttachmentMenu { .. } => "attachment menu",
        }
    }
}

/// Where a captured document came from
#[derive(Debug, Clone, Copy)]
pub struct DocumentTarget<'p> {
    pub page_url: &'p str,
    pub court: &'p str,
    pub pacer_case_id: Option<&'p str>,
    pub pacer_doc_id: Option<&'p str>,
    pub restricted: bool,
}

/// Decides whether to upload, performs it, and reports back to the user and
/// the page history
pub struct UploadOrchestrator<'a> {
    services: Services<'a>,
    config: &'a RecapConfig,
}

impl<'a> UploadOrchestrator<'a> {
    pub fn new(services: Services<'a>, config: &'a RecapConfig) -> Self {
        Self { services, config }
    }

    fn gate(&self, restricted: bool, navigation: &NavigationStateManager) -> Option<SkipReason> {
        if !self.config.archive.upload_enabled {
            Some(SkipReason::UploadsDisabled)
        } else if restricted {
            Some(SkipReason::Restricted)
        } else if navigation.is_uploaded() {
            Some(SkipReason::AlreadyUploaded)
        } else {
            None
        }
    }

    /// Upload a docket or attachment menu page. A positive ack notifies once
    /// and marks the page uploaded.
    pub async fn upload_page(
        &self,
        upload: PageUpload<'_>,
        restricted: bool,
        navigation: &mut NavigationStateManager,
    ) -> UploadOutcome {
        if let Some(reason) = self.gate(restricted, navigation) {
            return UploadOutcome::Skipped(reason);
        }

        let archive = self.services.archive;
        let result = match upload {
            PageUpload::Docket {
                court,
                pacer_case_id,
                html,
            } => archive.upload_docket(court, pacer_case_id, html).await,
            PageUpload::AttachmentMenu {
                court,
                pacer_case_id,
                html,
            } => archive.upload_attachment_menu(court, pacer_case_id, html).await,
        };

        self.finish(upload.label(), result, navigation)
    }

    fn finish(
        &self,
        label: &str,
        result: Result<bool, ArchiveError>,
        navigation: &mut NavigationStateManager,
    ) -> UploadOutcome {
        match result {
            Ok(true) => {
                tracing::info!("✅ {label} uploaded");
                self.services
                    .ui
                    .notify_upload_complete(&format!("{} uploaded to the public archive", capitalize(label)));
                navigation.mark_uploaded();
                UploadOutcome::Uploaded
            }
            Ok(false) => {
                tracing::info!("ℹ️  Archive declined the {label}");
                UploadOutcome::Declined
            }
            Err(e) => {
                tracing::warn!(error = %e, "⚠️  {label} upload failed");
                UploadOutcome::Failed
            }
        }
    }

    /// Put a captured document on screen, then upload it.
    ///
    /// `previous` is the page as it should come back on "back". Wrapper markup
    /// shows a waiting frame while its viewer source is fetched; if that fetch
    /// fails the page is put back as it was and the error is returned so the
    /// caller can hand the submission back to the portal. Markup without a
    /// viewer is shown as-is and nothing is uploaded.
    pub async fn show_document(
        &self,
        page: &mut PageMarkup,
        navigation: &mut NavigationStateManager,
        previous: String,
        target: DocumentTarget<'_>,
        numbers: &DocumentNumbers,
        classified: ClassifiedResponse,
    ) -> Result<CaptureReport, CaptureError> {
        let decoded_as_text = classified.decoded_as_text;

        let (frame, bytes) = match classified.content {
            CapturedContent::Binary(bytes) => {
                let frame = ViewerFrame::standalone();
                page.replace(frame.waiting_page());
                navigation.enter_captured(previous);
                (frame, bytes)
            }
            CapturedContent::Wrapper(markup) => match ViewerFrame::parse(&markup) {
                Some(frame) => {
                    let showing = page.html().to_string();
                    page.replace(frame.waiting_page());
                    match self.fetch_viewer_source(target.page_url, frame.source()).await {
                        Ok(bytes) => {
                            navigation.enter_captured(previous);
                            (frame, bytes)
                        }
                        Err(e) => {
                            page.replace(showing);
                            return Err(e);
                        }
                    }
                }
                None => {
                    tracing::debug!("📄 Response is not a document viewer, showing it as-is");
                    page.replace(markup.clone());
                    navigation.enter_captured(previous);
                    navigation.push_display(markup);
                    return Ok(CaptureReport {
                        decoded_as_text,
                        display: DisplayMode::Literal,
                        upload: UploadOutcome::Skipped(SkipReason::NotADocument),
                    });
                }
            },
        };

        let mut document = CapturedDocument::new(
            CapturedContent::Binary(bytes),
            target.pacer_doc_id.map(str::to_string),
        );

        let gate = self.gate(target.restricted, navigation);
        document.recovered_case_id = match (target.pacer_case_id, gate) {
            (Some(case), _) => Some(case.to_string()),
            (None, None) => self.resolve_case_id(target.court, target.pacer_doc_id).await,
            (None, Some(_)) => None,
        };

        let display = self.display(page, navigation, &frame, target.court, numbers, &document);

        let upload = match gate {
            Some(reason) => UploadOutcome::Skipped(reason),
            None => self.upload_document(target.court, numbers, document, navigation).await,
        };

        Ok(CaptureReport {
            decoded_as_text,
            display,
            upload,
        })
    }

    async fn fetch_viewer_source(&self, page_url: &str, source: &str) -> Result<Vec<u8>, CaptureError> {
        if source.trim().is_empty() {
            return Err(CaptureError::MissingViewerSource);
        }
        let url = match Url::parse(page_url).and_then(|base| base.join(source)) {
            Ok(url) => url.to_string(),
            Err(_) => source.to_string(),
        };
        let response = self.services.portal.fetch(&url).await?;
        Ok(response.bytes)
    }

    async fn resolve_case_id(&self, court: &str, pacer_doc_id: Option<&str>) -> Option<String> {
        let doc = pacer_doc_id?;
        match self.services.archive.case_id_for_document(court, doc).await {
            Ok(Some(case)) => {
                tracing::debug!(court, doc, case = %case, "🔗 Recovered case id from archive");
                Some(case)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(court, doc, error = %e, "⚠️  Case id lookup failed");
                None
            }
        }
    }

    fn display(
        &self,
        page: &mut PageMarkup,
        navigation: &mut NavigationStateManager,
        frame: &ViewerFrame,
        court: &str,
        numbers: &DocumentNumbers,
        document: &CapturedDocument,
    ) -> DisplayMode {
        let bytes = document_bytes(document);
        let host = self.services.host;
        if host.can_display_pdf_inline() {
            let object_url = host.create_object_url(bytes, PDF_CONTENT_TYPE);
            page.replace(frame.display_page(&object_url));
            navigation.push_display(page.html().to_string());
            DisplayMode::Inline
        } else {
            let filename = document_filename(
                self.config.filenames.style,
                court,
                document.recovered_case_id.as_deref(),
                numbers,
            );
            tracing::info!(filename = %filename, "💾 No inline viewer, saving document");
            host.save_file(&filename, bytes);
            page.replace(frame.display_page(BLANK_SOURCE));
            DisplayMode::Saved
        }
    }

    async fn upload_document(
        &self,
        court: &str,
        numbers: &DocumentNumbers,
        document: CapturedDocument,
        navigation: &mut NavigationStateManager,
    ) -> UploadOutcome {
        let Some(pacer_case_id) = document.recovered_case_id else {
            tracing::info!("ℹ️  Case id unknown, document not uploaded");
            return UploadOutcome::Skipped(SkipReason::MissingCaseId);
        };
        let Some(pacer_doc_id) = document.pacer_doc_id else {
            return UploadOutcome::Skipped(SkipReason::MissingDocumentId);
        };
        let bytes = match document.content {
            CapturedContent::Binary(bytes) => bytes,
            CapturedContent::Wrapper(markup) => markup.into_bytes(),
        };

        tracing::info!(court, case = %pacer_case_id, doc = %pacer_doc_id, "📤 Uploading document");
        let upload = DocumentUpload {
            court: court.to_string(),
            pacer_case_id,
            pacer_doc_id,
            document_number: numbers.document_number.clone(),
            attachment_number: numbers.attachment_number.clone(),
            bytes,
        };
        let result = self.services.archive.upload_document(upload).await;
        self.finish("document", result, navigation)
    }
}

fn document_bytes(document: &CapturedDocument) -> &[u8] {
    match &document.content {
        CapturedContent::Binary(bytes) => bytes,
        CapturedContent::Wrapper(markup) => markup.as_bytes(),
    }
}

/// Name for a document saved to disk
pub fn document_filename(
    style: FilenameStyle,
    court: &str,
    pacer_case_id: Option<&str>,
    numbers: &DocumentNumbers,
) -> String {
    match style {
        FilenameStyle::Lawyer => {
            let docket = numbers.docket_number.as_deref().map(sanitize);
            let parts: Vec<&str> = [
                Some(court),
                docket.as_deref(),
                Some(numbers.document_number.as_str()),
                numbers.attachment_number.as_deref(),
            ]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect();
            format!("{}.pdf", parts.join("_"))
        }
        FilenameStyle::InternetArchive => format!(
            "gov.uscourts.{}.{}.{}.{}.pdf",
            court,
            pacer_case_id.unwrap_or("unknown-case-id"),
            if numbers.document_number.is_empty() {
                "0"
            } else {
                numbers.document_number.as_str()
            },
            numbers.attachment_number.as_deref().unwrap_or("0"),
        ),
    }
}

fn sanitize(part: &str) -> String {
    part.chars()
        .map(|c| if matches!(c, '/' | '\\' | ':') { '-' } else { c })
        .collect()
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
