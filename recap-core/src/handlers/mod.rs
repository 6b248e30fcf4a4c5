//! Page-type handlers
//!
//! Each handler checks its own preconditions and returns a `HandlerOutcome`
//! describing what it did. None of them fail: collaborator errors are logged
//! and reported as "nothing to do".

mod attachment;
mod docket;
mod document;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    /// The page is not the kind this handler works on
    WrongPage,
    NoSessionCookie,
    MissingCourt,
    MissingCaseId,
    MissingDocumentId,
    /// The page's upload already happened in this history
    AlreadyUploaded,
    /// Required form controls are absent
    MissingFormMarker,
    Restricted,
    UploadsDisabled,
    /// The archive or the portal could not be reached
    ServiceUnavailable,
    UnrelatedMessage,
    MissingForm,
    /// The portal answered with something other than a document
    NotADocument,
    /// No document links on the page carry an id
    NoEligibleLinks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UploadOutcome {
    Uploaded,
    Declined,
    Failed,
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DisplayMode {
    /// Shown in the page through an object URL
    Inline,
    /// Handed to the host as a file download
    Saved,
    /// Response was plain markup and is shown as received
    Literal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CaptureReport {
    pub decoded_as_text: bool,
    pub display: DisplayMode,
    pub upload: UploadOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HandlerOutcome {
    Skipped(SkipReason),
    /// The archive has nothing for this page
    NoArchiveCopy,
    BannerShown,
    MarkersInserted(usize),
    Uploaded,
    UploadDeclined,
    UploadFailed,
    InterceptionInstalled,
    Captured(CaptureReport),
    /// Document submission handed back to the portal
    ResumedNativeSubmission,
    Navigated,
    PopupShown,
}

impl From<UploadOutcome> for HandlerOutcome {
    fn from(outcome: UploadOutcome) -> Self {
        match outcome {
            UploadOutcome::Uploaded => HandlerOutcome::Uploaded,
            UploadOutcome::Declined => HandlerOutcome::UploadDeclined,
            UploadOutcome::Failed => HandlerOutcome::UploadFailed,
            UploadOutcome::Skipped(reason) => HandlerOutcome::Skipped(reason),
        }
    }
}

impl HandlerOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, HandlerOutcome::Skipped(_))
    }
}
