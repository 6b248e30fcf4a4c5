use crate::delegate::ContentDelegate;
use crate::handlers::{HandlerOutcome, SkipReason};

impl ContentDelegate<'_> {
    /// Document ids of the page's document links, in page order and without
    /// repeats. Needs a portal session; without one there is nothing to look up.
    pub fn find_and_store_pacer_doc_ids(&self) -> Option<Vec<String>> {
        if !self.services.host.has_session_cookie() {
            return None;
        }
        let mut doc_ids: Vec<String> = Vec::new();
        for doc_id in self
            .context
            .links()
            .iter()
            .filter_map(|link| link.pacer_doc_id.as_deref())
        {
            if !doc_ids.iter().any(|known| known == doc_id) {
                doc_ids.push(doc_id.to_string());
            }
        }
        Some(doc_ids)
    }

    /// Put an archive marker next to every document link the archive has
    pub async fn attach_recap_links(&mut self) -> HandlerOutcome {
        let Some(doc_ids) = self.find_and_store_pacer_doc_ids() else {
            return HandlerOutcome::Skipped(SkipReason::NoSessionCookie);
        };
        if doc_ids.is_empty() {
            return HandlerOutcome::Skipped(SkipReason::NoEligibleLinks);
        }
        let Some(court) = self.context.court() else {
            return HandlerOutcome::Skipped(SkipReason::MissingCourt);
        };

        let availability = match self.services.archive.document_availability(&doc_ids, court).await {
            Ok(availability) => availability,
            Err(e) => {
                tracing::warn!(court, error = %e, "⚠️  Link availability lookup failed");
                return HandlerOutcome::Skipped(SkipReason::ServiceUnavailable);
            }
        };

        let mut inserted = 0;
        for record in &availability.results {
            let archive_url = self.config.archive.absolute_url(&record.filepath_local);
            for link in self
                .context
                .links()
                .iter()
                .filter(|link| link.pacer_doc_id.as_deref() == Some(record.pacer_doc_id.as_str()))
            {
                if self
                    .services
                    .ui
                    .render_inline_availability_marker(&mut self.page, link, &archive_url)
                {
                    inserted += 1;
                }
            }
        }

        tracing::info!(court, links = doc_ids.len(), inserted, "🔗 Archive links attached");
        HandlerOutcome::MarkersInserted(inserted)
    }

    /// Follow an archive marker: straight there, or through a popup when the
    /// user prefers one
    pub fn handle_recap_link_click(&mut self, url: &str) -> HandlerOutcome {
        if self.config.options.recap_link_popups {
            self.services.ui.show_link_popup(&mut self.page, url);
            HandlerOutcome::PopupShown
        } else {
            self.services.host.navigate(url);
            HandlerOutcome::Navigated
        }
    }
}
