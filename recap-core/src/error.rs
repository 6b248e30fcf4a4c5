use thiserror::Error;

/// Failures reported by the archive-service collaborator.
///
/// The core never surfaces these to the user; every caller degrades to
/// "nothing to do" and logs.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("archive request failed: {0}")]
    Transport(String),

    #[error("archive returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode archive response: {0}")]
    Decode(String),
}

/// Failures while talking to the court-records portal itself
#[derive(Debug, Error)]
pub enum PortalError {
    #[error("portal request failed: {0}")]
    Transport(String),

    #[error("portal returned HTTP {0}")]
    Status(u16),
}

/// Reasons the document capture pipeline hands control back to the portal
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error(transparent)]
    Transport(#[from] PortalError),

    #[error("form '{0}' is not on the page")]
    MissingForm(String),

    #[error("viewer markup names no document source")]
    MissingViewerSource,
}
