use crate::error::PortalError;
use crate::types::{FormSubmission, PortalResponse};
use async_trait::async_trait;

/// Capabilities of the environment the page lives in
pub trait HostEnvironment {
    /// A validated portal login is present (`PacerUser`/`PacerSession`, not `unvalidated`)
    fn has_session_cookie(&self) -> bool;

    /// Whether a PDF can be shown in-page; when false documents are saved instead
    fn can_display_pdf_inline(&self) -> bool;

    /// Make the bytes addressable from the page (a blob or data URL)
    fn create_object_url(&self, bytes: &[u8], content_type: &str) -> String;

    fn save_file(&self, filename: &str, bytes: &[u8]);

    fn navigate(&self, url: &str);

    /// Let a form go through the portal's own submission path
    fn resume_native_submission(&self, submission: &FormSubmission);
}

/// Requests made to the portal on the page's behalf, with the page's session
#[async_trait(?Send)]
pub trait PortalTransport {
    async fn submit_form(&self, submission: &FormSubmission) -> Result<PortalResponse, PortalError>;

    async fn fetch(&self, url: &str) -> Result<PortalResponse, PortalError>;
}
