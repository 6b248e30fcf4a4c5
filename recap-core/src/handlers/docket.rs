use super::{HandlerOutcome, SkipReason};
use crate::delegate::ContentDelegate;
use crate::types::PageClassification;
use crate::ui::AvailabilityBanner;
use crate::upload::PageUpload;

impl ContentDelegate<'_> {
    /// Docket query form: tell the user when the archive already has the docket
    pub async fn handle_docket_query_url(&mut self) -> HandlerOutcome {
        if self.context.classification() != PageClassification::DocketQuery {
            return HandlerOutcome::Skipped(SkipReason::WrongPage);
        }
        let Some(court) = self.context.court() else {
            return HandlerOutcome::Skipped(SkipReason::MissingCourt);
        };
        let Some(case) = self.context.pacer_case_id() else {
            return HandlerOutcome::Skipped(SkipReason::MissingCaseId);
        };
        if !self.services.host.has_session_cookie() {
            return HandlerOutcome::Skipped(SkipReason::NoSessionCookie);
        }

        let availability = match self.services.archive.docket_availability(court, case).await {
            Ok(availability) => availability,
            Err(e) => {
                tracing::warn!(court, case, error = %e, "⚠️  Docket availability lookup failed");
                return HandlerOutcome::Skipped(SkipReason::ServiceUnavailable);
            }
        };

        let Some(record) = availability.results.first() else {
            tracing::debug!(court, case, "No archived docket");
            return HandlerOutcome::NoArchiveCopy;
        };

        let banner = AvailabilityBanner::Docket {
            date_modified: record.date_modified.clone(),
            url: self.config.archive.absolute_url(&record.absolute_url),
        };
        self.services
            .ui
            .render_availability_banner(&mut self.page, &banner);
        tracing::info!(court, case, "🏛️  Docket available in the archive");
        HandlerOutcome::BannerShown
    }

    /// Rendered docket report: contribute it to the archive once per history
    pub async fn handle_docket_display_page(&mut self) -> HandlerOutcome {
        if self.context.classification() != PageClassification::DocketDisplay {
            return HandlerOutcome::Skipped(SkipReason::WrongPage);
        }
        let Some(court) = self.context.court() else {
            return HandlerOutcome::Skipped(SkipReason::MissingCourt);
        };
        let Some(case) = self.context.pacer_case_id() else {
            tracing::debug!(court, "No case id on docket report, not uploading");
            return HandlerOutcome::Skipped(SkipReason::MissingCaseId);
        };

        let upload = PageUpload::Docket {
            court,
            pacer_case_id: case,
            html: self.page.html(),
        };
        self.orchestrator()
            .upload_page(upload, self.context.restricted(), &mut self.navigation)
            .await
            .into()
    }
}
