use crate::archive::ArchiveService;
use crate::config::RecapConfig;
use crate::context::PageContext;
use crate::handlers::{HandlerOutcome, SkipReason};
use crate::host::{HostEnvironment, PortalTransport};
use crate::markup::PageMarkup;
use crate::messaging::{MessageChannel, Subscription};
use crate::navigation::{NavigationHistory, NavigationStateManager};
use crate::types::PageClassification;
use crate::ui::PageUi;
use crate::upload::UploadOrchestrator;
use uuid::Uuid;

/// The collaborators a page talks to
#[derive(Clone, Copy)]
pub struct Services<'a> {
    pub archive: &'a dyn ArchiveService,
    pub ui: &'a dyn PageUi,
    pub host: &'a dyn HostEnvironment,
    pub portal: &'a dyn PortalTransport,
}

/// Installed document-view interception: the listener plus the nonce the
/// injected script echoes back
pub(crate) struct CaptureListener {
    pub(crate) nonce: Uuid,
    pub(crate) subscription: Subscription,
}

/// Drives one page load: owns the page, its context and its history, and
/// dispatches the handler matching the page's classification
pub struct ContentDelegate<'a> {
    pub(crate) context: PageContext,
    pub(crate) config: &'a RecapConfig,
    pub(crate) services: Services<'a>,
    pub(crate) page: PageMarkup,
    pub(crate) navigation: NavigationStateManager,
    pub(crate) messages: MessageChannel,
    pub(crate) capture: Option<CaptureListener>,
}

impl<'a> ContentDelegate<'a> {
    pub fn new(
        context: PageContext,
        page: PageMarkup,
        history: NavigationHistory,
        config: &'a RecapConfig,
        services: Services<'a>,
    ) -> Self {
        Self {
            context,
            config,
            services,
            page,
            navigation: NavigationStateManager::new(history),
            messages: MessageChannel::new(),
            capture: None,
        }
    }

    /// Classify and restriction-check `html` loaded from `url`
    pub fn from_page(
        url: &str,
        html: impl Into<String>,
        history: NavigationHistory,
        config: &'a RecapConfig,
        services: Services<'a>,
    ) -> Self {
        let mut page = PageMarkup::new(html);
        let context = PageContext::from_page(url, &mut page, config);
        Self::new(context, page, history, config, services)
    }

    /// Run the handler for this page, then annotate document links where the
    /// page lists them
    pub async fn run(&mut self) -> Vec<HandlerOutcome> {
        let classification = self.context.classification();
        tracing::info!(url = %self.context.url(), ?classification, "🚀 Handling page");

        let mut outcomes = Vec::new();
        match classification {
            PageClassification::DocketQuery => outcomes.push(self.handle_docket_query_url().await),
            PageClassification::DocketDisplay => {
                outcomes.push(self.handle_docket_display_page().await)
            }
            PageClassification::AttachmentMenu => {
                outcomes.push(self.handle_attachment_menu_page().await)
            }
            PageClassification::SingleDocumentCheck => {
                outcomes.push(self.handle_single_document_page_check().await)
            }
            PageClassification::SingleDocumentView => {
                outcomes.push(self.handle_single_document_page_check().await);
                outcomes.push(self.handle_single_document_page_view());
            }
            PageClassification::Unrecognized => {
                tracing::debug!("⏭️  Unrecognized page, nothing to do");
                return vec![HandlerOutcome::Skipped(SkipReason::WrongPage)];
            }
        }

        if matches!(
            classification,
            PageClassification::DocketDisplay | PageClassification::AttachmentMenu
        ) {
            outcomes.push(self.attach_recap_links().await);
        }

        outcomes
    }

    pub(crate) fn orchestrator(&self) -> UploadOrchestrator<'a> {
        UploadOrchestrator::new(self.services, self.config)
    }

    pub fn context(&self) -> &PageContext {
        &self.context
    }

    pub fn page(&self) -> &PageMarkup {
        &self.page
    }

    pub fn navigation(&self) -> &NavigationStateManager {
        &self.navigation
    }

    pub fn messages(&self) -> &MessageChannel {
        &self.messages
    }

    /// Nonce the installed interceptor script posts with, if any
    pub fn capture_nonce(&self) -> Option<Uuid> {
        self.capture.as_ref().map(|listener| listener.nonce)
    }

    /// Back button
    pub fn go_back(&mut self) -> bool {
        self.navigation.go_back(&mut self.page)
    }

    pub fn go_forward(&mut self) -> bool {
        self.navigation.go_forward(&mut self.page)
    }

    /// Drop every listener this page registered
    pub fn dispose_listeners(&mut self) {
        if let Some(listener) = self.capture.take() {
            listener.subscription.dispose();
        }
    }
}
