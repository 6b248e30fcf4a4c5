use super::{HandlerOutcome, SkipReason};
use crate::delegate::ContentDelegate;
use crate::extractor::is_attachment_menu;
use crate::types::PageClassification;
use crate::upload::PageUpload;

impl ContentDelegate<'_> {
    /// Attachment menu: contribute the list of a filing's parts
    pub async fn handle_attachment_menu_page(&mut self) -> HandlerOutcome {
        match self.context.classification() {
            PageClassification::AttachmentMenu => {}
            classification if classification.is_single_document() => {
                return HandlerOutcome::Skipped(SkipReason::MissingFormMarker);
            }
            _ => return HandlerOutcome::Skipped(SkipReason::WrongPage),
        }
        if !is_attachment_menu(&self.page) {
            return HandlerOutcome::Skipped(SkipReason::MissingFormMarker);
        }
        let Some(court) = self.context.court() else {
            return HandlerOutcome::Skipped(SkipReason::MissingCourt);
        };

        let upload = PageUpload::AttachmentMenu {
            court,
            pacer_case_id: self.context.pacer_case_id(),
            html: self.page.html(),
        };
        self.orchestrator()
            .upload_page(upload, self.context.restricted(), &mut self.navigation)
            .await
            .into()
    }
}
