use crate::error::ArchiveError;
use crate::types::{DocketAvailability, DocumentAvailability, DocumentUpload};
use async_trait::async_trait;

/// Contract with the public archive.
///
/// Availability lookups and uploads are best-effort: callers treat any
/// `Err` the same as "nothing there" / "not accepted". Upload acks are
/// `true` when the archive accepted the payload.
#[async_trait(?Send)]
pub trait ArchiveService {
    async fn docket_availability(
        &self,
        court: &str,
        pacer_case_id: &str,
    ) -> Result<DocketAvailability, ArchiveError>;

    /// Look up archived copies for a batch of document ids in one court
    async fn document_availability(
        &self,
        pacer_doc_ids: &[String],
        court: &str,
    ) -> Result<DocumentAvailability, ArchiveError>;

    async fn upload_docket(
        &self,
        court: &str,
        pacer_case_id: &str,
        html: &str,
    ) -> Result<bool, ArchiveError>;

    async fn upload_attachment_menu(
        &self,
        court: &str,
        pacer_case_id: Option<&str>,
        html: &str,
    ) -> Result<bool, ArchiveError>;

    async fn upload_document(&self, upload: DocumentUpload) -> Result<bool, ArchiveError>;

    /// Map a document id back to the case it belongs to, when the archive knows it
    async fn case_id_for_document(
        &self,
        court: &str,
        pacer_doc_id: &str,
    ) -> Result<Option<String>, ArchiveError>;
}

/// Archive that knows nothing and accepts nothing. Used for dry runs.
pub struct NoOpArchive;

#[async_trait(?Send)]
impl ArchiveService for NoOpArchive {
    async fn docket_availability(
        &self,
        _court: &str,
        _pacer_case_id: &str,
    ) -> Result<DocketAvailability, ArchiveError> {
        Ok(DocketAvailability::default())
    }

    async fn document_availability(
        &self,
        _pacer_doc_ids: &[String],
        _court: &str,
    ) -> Result<DocumentAvailability, ArchiveError> {
        Ok(DocumentAvailability::default())
    }

    async fn upload_docket(
        &self,
        court: &str,
        pacer_case_id: &str,
        _html: &str,
    ) -> Result<bool, ArchiveError> {
        tracing::info!(court, case = pacer_case_id, "🧪 Dry run: docket upload skipped");
        Ok(false)
    }

    async fn upload_attachment_menu(
        &self,
        court: &str,
        _pacer_case_id: Option<&str>,
        _html: &str,
    ) -> Result<bool, ArchiveError> {
        tracing::info!(court, "🧪 Dry run: attachment menu upload skipped");
        Ok(false)
    }

    async fn upload_document(&self, upload: DocumentUpload) -> Result<bool, ArchiveError> {
        tracing::info!(
            court = %upload.court,
            doc = %upload.pacer_doc_id,
            bytes = upload.bytes.len(),
            "🧪 Dry run: document upload skipped"
        );
        Ok(false)
    }

    async fn case_id_for_document(
        &self,
        _court: &str,
        _pacer_doc_id: &str,
    ) -> Result<Option<String>, ArchiveError> {
        Ok(None)
    }
}
