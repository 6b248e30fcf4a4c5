use super::{HandlerOutcome, SkipReason};
use crate::capture::{classify_response, document_numbers, interceptor_script, SUPPRESSED_ONSUBMIT};
use crate::delegate::{CaptureListener, ContentDelegate};
use crate::error::CaptureError;
use crate::extractor::is_single_document_page;
use crate::messaging::{PageMessage, DOCUMENT_VIEW_SUBMIT};
use crate::types::{FormSubmission, PageClassification};
use crate::ui::AvailabilityBanner;
use crate::upload::DocumentTarget;
use url::Url;
use uuid::Uuid;

impl ContentDelegate<'_> {
    fn single_document_precondition(&self) -> Option<SkipReason> {
        if !self.context.classification().is_single_document() {
            return Some(SkipReason::WrongPage);
        }
        if !is_single_document_page(&self.page) {
            return Some(SkipReason::MissingFormMarker);
        }
        None
    }

    /// Receipt page: show a banner when the archive already holds this document
    pub async fn handle_single_document_page_check(&mut self) -> HandlerOutcome {
        if let Some(reason) = self.single_document_precondition() {
            return HandlerOutcome::Skipped(reason);
        }
        let Some(court) = self.context.court() else {
            return HandlerOutcome::Skipped(SkipReason::MissingCourt);
        };
        let Some(doc_id) = self.context.pacer_doc_id() else {
            return HandlerOutcome::Skipped(SkipReason::MissingDocumentId);
        };

        let mut doc_ids = vec![doc_id.to_string()];
        for link_id in self.context.links().iter().filter_map(|link| link.pacer_doc_id.as_deref()) {
            if !doc_ids.iter().any(|known| known == link_id) {
                doc_ids.push(link_id.to_string());
            }
        }

        let availability = match self.services.archive.document_availability(&doc_ids, court).await {
            Ok(availability) => availability,
            Err(e) => {
                tracing::warn!(court, doc = doc_id, error = %e, "⚠️  Document availability lookup failed");
                return HandlerOutcome::Skipped(SkipReason::ServiceUnavailable);
            }
        };

        let mut shown = false;
        for record in availability.results.iter().filter(|r| r.pacer_doc_id == doc_id) {
            let banner = AvailabilityBanner::Document {
                url: self.config.archive.absolute_url(&record.filepath_local),
            };
            self.services
                .ui
                .render_availability_banner(&mut self.page, &banner);
            shown = true;
        }

        if shown {
            tracing::info!(court, doc = doc_id, "📄 Document available in the archive");
            HandlerOutcome::BannerShown
        } else {
            HandlerOutcome::NoArchiveCopy
        }
    }

    /// Receipt page: route the "View Document" submission through the core so
    /// the document can be captured. Installing twice is a no-op.
    pub fn handle_single_document_page_view(&mut self) -> HandlerOutcome {
        if self.context.classification() != PageClassification::SingleDocumentView {
            return HandlerOutcome::Skipped(SkipReason::WrongPage);
        }
        if let Some(reason) = self.single_document_precondition() {
            return HandlerOutcome::Skipped(reason);
        }
        if !self.config.archive.upload_enabled {
            return HandlerOutcome::Skipped(SkipReason::UploadsDisabled);
        }
        if self.capture.is_some() {
            return HandlerOutcome::InterceptionInstalled;
        }

        let nonce = Uuid::new_v4();
        self.page.append_to_body(&interceptor_script(nonce));
        let subscription = self.messages.subscribe(DOCUMENT_VIEW_SUBMIT, Some(nonce));
        self.capture = Some(CaptureListener {
            nonce,
            subscription,
        });
        tracing::debug!("🪝 Document view interception installed");
        HandlerOutcome::InterceptionInstalled
    }

    /// Entry point for messages posted into the page
    pub async fn on_message(&mut self, message: &PageMessage) -> HandlerOutcome {
        if !self.messages.matches(message) {
            return HandlerOutcome::Skipped(SkipReason::UnrelatedMessage);
        }
        let Some(form_id) = message.payload_str("id").map(str::to_string) else {
            return HandlerOutcome::Skipped(SkipReason::UnrelatedMessage);
        };
        self.on_document_view_submit(&form_id).await
    }

    /// Submit the named form ourselves and capture what comes back
    pub async fn on_document_view_submit(&mut self, form_id: &str) -> HandlerOutcome {
        if self.context.classification() != PageClassification::SingleDocumentView {
            return HandlerOutcome::Skipped(SkipReason::WrongPage);
        }
        let Some(court) = self.context.court().map(str::to_string) else {
            return HandlerOutcome::Skipped(SkipReason::MissingCourt);
        };

        let (submission, previous) = match self.prepare_submission(form_id) {
            Ok(prepared) => prepared,
            Err(e) => {
                tracing::warn!(error = %e, "⚠️  Cannot capture document view");
                return HandlerOutcome::Skipped(SkipReason::MissingForm);
            }
        };

        let Some(numbers) = document_numbers(&self.page) else {
            tracing::info!("ℹ️  No document numbers on page, letting the portal handle it");
            self.services.host.resume_native_submission(&submission);
            return HandlerOutcome::ResumedNativeSubmission;
        };

        let response = match self.services.portal.submit_form(&submission).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(form = form_id, error = %e, "⚠️  Document request failed, resuming portal submission");
                self.services.host.resume_native_submission(&submission);
                return HandlerOutcome::ResumedNativeSubmission;
            }
        };

        let target = DocumentTarget {
            page_url: self.context.url(),
            court: &court,
            pacer_case_id: self.context.pacer_case_id(),
            pacer_doc_id: self.context.pacer_doc_id(),
            restricted: self.context.restricted(),
        };

        let shown = self
            .orchestrator()
            .show_document(
                &mut self.page,
                &mut self.navigation,
                previous,
                target,
                &numbers,
                classify_response(response),
            )
            .await;
        match shown {
            Ok(report) => HandlerOutcome::Captured(report),
            Err(e) => {
                tracing::warn!(form = form_id, error = %e, "⚠️  Document capture failed, resuming portal submission");
                self.services.host.resume_native_submission(&submission);
                HandlerOutcome::ResumedNativeSubmission
            }
        }
    }

    /// The request the form would make, plus the page as it should come back
    /// on "back": the form with its submission suppressed
    fn prepare_submission(&mut self, form_id: &str) -> Result<(FormSubmission, String), CaptureError> {
        let form = self
            .page
            .form(form_id)
            .ok_or_else(|| CaptureError::MissingForm(form_id.to_string()))?;

        let original = self.page.element_attribute(form_id, "onsubmit");
        self.page
            .set_element_attribute(form_id, "onsubmit", SUPPRESSED_ONSUBMIT);
        let previous = self.page.html().to_string();
        match &original {
            Some(onsubmit) => self.page.set_element_attribute(form_id, "onsubmit", onsubmit),
            None => self.page.remove_element_attribute(form_id, "onsubmit"),
        };

        let action = form.action.as_deref().unwrap_or(self.context.url());
        let submission = FormSubmission {
            form_id: form_id.to_string(),
            action: Url::parse(self.context.url())
                .and_then(|base| base.join(action))
                .map(|url| url.to_string())
                .unwrap_or_else(|_| action.to_string()),
            method: form.method,
            fields: form.fields,
        };
        Ok((submission, previous))
    }
}
