//! Page handling end to end: classification, handlers and uploads against
//! recording fakes.

mod common;

use common::*;
use recap_core::*;

fn docket_record() -> DocketRecord {
    DocketRecord {
        date_modified: "2015-04-01T12:04:59Z".to_string(),
        absolute_url: "/download/gov.uscourts.canb.531591/gov.uscourts.canb.531591.docket.html"
            .to_string(),
    }
}

fn document_record(doc_id: &str) -> DocumentRecord {
    DocumentRecord {
        pacer_doc_id: doc_id.to_string(),
        filepath_local: format!("recap/gov.uscourts.canb.531591/{doc_id}.pdf"),
    }
}

// ============================================================================
// Unrecognized pages
// ============================================================================

mod unrecognized {
    use super::*;

    #[tokio::test]
    async fn every_handler_is_a_no_op() {
        let config = RecapConfig::default();
        let fakes = Fakes::with_archive(FakeArchive::accepting());
        let html = load_page("docket_display.html");
        let mut delegate = fakes.delegate(&config, NONSENSE_URL, &html);

        assert_eq!(delegate.context().classification(), PageClassification::Unrecognized);
        assert_eq!(
            delegate.run().await,
            vec![HandlerOutcome::Skipped(SkipReason::WrongPage)]
        );
        assert!(delegate.handle_docket_query_url().await.is_skipped());
        assert!(delegate.handle_docket_display_page().await.is_skipped());
        assert!(delegate.handle_attachment_menu_page().await.is_skipped());
        assert!(delegate.handle_single_document_page_check().await.is_skipped());
        assert!(delegate.handle_single_document_page_view().is_skipped());

        assert_eq!(fakes.archive.call_count(), 0);
        assert_eq!(delegate.page().html(), html);
    }
}

// ============================================================================
// Docket query
// ============================================================================

mod docket_query {
    use super::*;

    const QUERY_PAGE: &str = "<html><body><form><input value=\"Run Report\"></form></body></html>";

    #[tokio::test]
    async fn shows_banner_with_date_and_deep_link() {
        let config = RecapConfig::default();
        let fakes = Fakes::with_archive(FakeArchive {
            dockets: vec![docket_record()],
            ..FakeArchive::default()
        });
        let mut delegate = fakes.delegate(&config, DOCKET_QUERY_URL, QUERY_PAGE);

        assert_eq!(delegate.run().await, vec![HandlerOutcome::BannerShown]);
        let html = delegate.page().html();
        assert!(html.contains("recap-banner"));
        assert!(html.contains("4/1/2015"));
        assert!(html.contains(
            "https://www.courtlistener.com/download/gov.uscourts.canb.531591/gov.uscourts.canb.531591.docket.html"
        ));
    }

    #[tokio::test]
    async fn without_cookie_makes_no_call() {
        let config = RecapConfig::default();
        let fakes = Fakes {
            host: FakeHost {
                cookie: false,
                ..FakeHost::default()
            },
            ..Fakes::default()
        };
        let mut delegate = fakes.delegate(&config, DOCKET_QUERY_URL, QUERY_PAGE);

        assert_eq!(
            delegate.handle_docket_query_url().await,
            HandlerOutcome::Skipped(SkipReason::NoSessionCookie)
        );
        assert_eq!(fakes.archive.call_count(), 0);
    }

    #[tokio::test]
    async fn empty_or_failed_lookups_leave_the_page_alone() {
        let config = RecapConfig::default();

        let fakes = Fakes::default();
        let mut delegate = fakes.delegate(&config, DOCKET_QUERY_URL, QUERY_PAGE);
        assert_eq!(delegate.handle_docket_query_url().await, HandlerOutcome::NoArchiveCopy);
        assert_eq!(delegate.page().html(), QUERY_PAGE);

        let fakes = Fakes::with_archive(FakeArchive {
            unreachable: true,
            ..FakeArchive::default()
        });
        let mut delegate = fakes.delegate(&config, DOCKET_QUERY_URL, QUERY_PAGE);
        assert_eq!(
            delegate.handle_docket_query_url().await,
            HandlerOutcome::Skipped(SkipReason::ServiceUnavailable)
        );
        assert_eq!(delegate.page().html(), QUERY_PAGE);
    }
}

// ============================================================================
// Docket display
// ============================================================================

mod docket_display {
    use super::*;

    #[tokio::test]
    async fn positive_ack_uploads_notifies_and_marks() {
        let config = RecapConfig::default();
        let fakes = Fakes::with_archive(FakeArchive::accepting());
        let html = load_page("docket_display.html");
        let mut delegate = fakes.delegate(&config, DOCKET_DISPLAY_URL, &html);

        assert_eq!(delegate.context().pacer_case_id(), Some("531591"));
        assert_eq!(delegate.handle_docket_display_page().await, HandlerOutcome::Uploaded);
        assert_eq!(fakes.archive.count("upload_docket"), 1);
        assert_eq!(fakes.ui.notifications.borrow().len(), 1);
        assert!(delegate.navigation().is_uploaded());
    }

    #[tokio::test]
    async fn negative_ack_leaves_state_unmarked() {
        let config = RecapConfig::default();
        let fakes = Fakes::default();
        let html = load_page("docket_display.html");
        let mut delegate = fakes.delegate(&config, DOCKET_DISPLAY_URL, &html);

        assert_eq!(
            delegate.handle_docket_display_page().await,
            HandlerOutcome::UploadDeclined
        );
        assert_eq!(fakes.archive.count("upload_docket"), 1);
        assert!(fakes.ui.notifications.borrow().is_empty());
        assert!(!delegate.navigation().is_uploaded());
    }

    #[tokio::test]
    async fn repeated_runs_upload_once() {
        let config = RecapConfig::default();
        let fakes = Fakes::with_archive(FakeArchive::accepting());
        let html = load_page("docket_display.html");
        let mut delegate = fakes.delegate(&config, DOCKET_DISPLAY_URL, &html);

        delegate.handle_docket_display_page().await;
        assert_eq!(
            delegate.handle_docket_display_page().await,
            HandlerOutcome::Skipped(SkipReason::AlreadyUploaded)
        );
        assert_eq!(fakes.archive.count("upload_docket"), 1);
    }

    #[tokio::test]
    async fn uploaded_history_state_prevents_any_upload() {
        let config = RecapConfig::default();
        let fakes = Fakes::with_archive(FakeArchive::accepting());
        let html = load_page("docket_display.html");
        let mut delegate = ContentDelegate::from_page(
            DOCKET_DISPLAY_URL,
            html,
            NavigationHistory::with_state(NavigationSnapshot::uploaded()),
            &config,
            fakes.services(),
        );

        for _ in 0..2 {
            assert_eq!(
                delegate.handle_docket_display_page().await,
                HandlerOutcome::Skipped(SkipReason::AlreadyUploaded)
            );
        }
        assert_eq!(fakes.archive.count("upload_docket"), 0);
    }

    #[tokio::test]
    async fn missing_case_id_aborts() {
        let config = RecapConfig::default();
        let fakes = Fakes::with_archive(FakeArchive::accepting());
        let mut delegate =
            fakes.delegate(&config, DOCKET_DISPLAY_URL, "<html><body>no links</body></html>");

        assert_eq!(
            delegate.handle_docket_display_page().await,
            HandlerOutcome::Skipped(SkipReason::MissingCaseId)
        );
        assert_eq!(fakes.archive.call_count(), 0);
    }

    #[tokio::test]
    async fn disabled_uploads_skip_without_calling() {
        let mut config = RecapConfig::default();
        config.archive.upload_enabled = false;
        let fakes = Fakes::with_archive(FakeArchive::accepting());
        let html = load_page("docket_display.html");
        let mut delegate = fakes.delegate(&config, DOCKET_DISPLAY_URL, &html);

        assert_eq!(
            delegate.handle_docket_display_page().await,
            HandlerOutcome::Skipped(SkipReason::UploadsDisabled)
        );
        assert_eq!(fakes.archive.count("upload_docket"), 0);
    }
}

// ============================================================================
// Attachment menu
// ============================================================================

mod attachment_menu {
    use super::*;

    #[tokio::test]
    async fn uploads_menu_and_marks_archived_parts() {
        let config = RecapConfig::default();
        let fakes = Fakes::with_archive(FakeArchive {
            upload_ack: true,
            documents: vec![document_record("034031424910")],
            ..FakeArchive::default()
        });
        let html = load_page("attachment_menu.html");
        let mut delegate = fakes.delegate(&config, SINGLE_DOC_URL, &html);

        assert_eq!(delegate.context().classification(), PageClassification::AttachmentMenu);
        assert_eq!(
            delegate.run().await,
            vec![HandlerOutcome::Uploaded, HandlerOutcome::MarkersInserted(1)]
        );
        assert_eq!(fakes.archive.count("upload_attachment_menu"), 1);
        assert_eq!(fakes.ui.notifications.borrow().len(), 1);
    }

    #[tokio::test]
    async fn without_download_all_marker_makes_no_call() {
        let config = RecapConfig::default();
        let fakes = Fakes::with_archive(FakeArchive::accepting());
        let mut delegate = fakes.delegate(
            &config,
            SINGLE_DOC_URL,
            "<html><body><form><input value=\"Something Else\"></form></body></html>",
        );

        assert_eq!(
            delegate.handle_attachment_menu_page().await,
            HandlerOutcome::Skipped(SkipReason::MissingFormMarker)
        );
        assert_eq!(fakes.archive.call_count(), 0);
    }
}

// ============================================================================
// Single document availability
// ============================================================================

mod single_document_check {
    use super::*;

    #[tokio::test]
    async fn banner_only_for_this_document() {
        let config = RecapConfig::default();
        let fakes = Fakes::with_archive(FakeArchive {
            documents: vec![document_record("034031424909"), document_record("034031999999")],
            ..FakeArchive::default()
        });
        let html = load_page("single_document.html");
        let mut delegate = fakes.delegate(&config, SINGLE_DOC_URL, &html);

        assert_eq!(
            delegate.handle_single_document_page_check().await,
            HandlerOutcome::BannerShown
        );
        assert_eq!(
            fakes.archive.document_queries.borrow()[0],
            vec!["034031424909".to_string()]
        );
        assert_eq!(fakes.ui.banners.borrow().len(), 1);
        assert!(delegate.page().html().contains(
            "https://www.courtlistener.com/recap/gov.uscourts.canb.531591/034031424909.pdf"
        ));
    }

    #[tokio::test]
    async fn requires_view_document_and_image_markers() {
        let config = RecapConfig::default();
        let fakes = Fakes::default();
        let mut delegate = fakes.delegate(
            &config,
            SINGLE_DOC_URL,
            "<html><body><form><input value=\"View Document\"></form></body></html>",
        );

        assert_eq!(
            delegate.handle_single_document_page_check().await,
            HandlerOutcome::Skipped(SkipReason::MissingFormMarker)
        );
        assert_eq!(fakes.archive.call_count(), 0);
    }
}

// ============================================================================
// Inline links
// ============================================================================

mod inline_links {
    use super::*;

    #[tokio::test]
    async fn no_cookie_means_no_ids() {
        let config = RecapConfig::default();
        let fakes = Fakes {
            host: FakeHost {
                cookie: false,
                ..FakeHost::default()
            },
            ..Fakes::default()
        };
        let html = load_page("docket_display.html");
        let delegate = fakes.delegate(&config, NONSENSE_URL, &html);
        assert_eq!(delegate.find_and_store_pacer_doc_ids(), None);
    }

    #[tokio::test]
    async fn no_eligible_links_means_no_request() {
        let config = RecapConfig::default();
        let fakes = Fakes::default();
        let mut delegate = fakes.delegate(
            &config,
            DOCKET_DISPLAY_URL,
            r#"<html><body><a href="http://foo.fake/bar/0">x</a></body></html>"#,
        );

        assert_eq!(
            delegate.attach_recap_links().await,
            HandlerOutcome::Skipped(SkipReason::NoEligibleLinks)
        );
        assert_eq!(fakes.archive.call_count(), 0);
    }

    #[tokio::test]
    async fn one_hit_inserts_one_marker() {
        let config = RecapConfig::default();
        let fakes = Fakes::with_archive(FakeArchive {
            documents: vec![document_record("034031438800")],
            ..FakeArchive::default()
        });
        let html = load_page("docket_display.html");
        let mut delegate = fakes.delegate(&config, DOCKET_DISPLAY_URL, &html);

        assert_eq!(
            delegate.find_and_store_pacer_doc_ids(),
            Some(vec!["034031438754".to_string(), "034031438800".to_string()])
        );
        assert_eq!(delegate.attach_recap_links().await, HandlerOutcome::MarkersInserted(1));
        assert_eq!(delegate.page().html().matches("recap-inline").count(), 1);
    }

    #[tokio::test]
    async fn link_click_navigates_or_opens_popup() {
        let link = SINGLE_DOC_URL;

        let config = RecapConfig::default();
        let fakes = Fakes::default();
        let mut delegate = fakes.delegate(&config, DOCKET_DISPLAY_URL, "<html><body></body></html>");
        assert_eq!(delegate.handle_recap_link_click(link), HandlerOutcome::Navigated);
        assert_eq!(*fakes.host.navigated.borrow(), vec![link.to_string()]);

        let mut config = RecapConfig::default();
        config.options.recap_link_popups = true;
        let fakes = Fakes::default();
        let mut delegate = fakes.delegate(&config, DOCKET_DISPLAY_URL, "<html><body></body></html>");
        assert_eq!(delegate.handle_recap_link_click(link), HandlerOutcome::PopupShown);
        assert!(fakes.host.navigated.borrow().is_empty());
        assert!(delegate.page().html().contains("recap-shade"));
        assert!(delegate.page().html().contains("recap-popup"));
    }
}
