// RECAP Core Library
//
// Recognizes court-records portal pages, captures viewed filings and
// contributes them to the public archive. Everything outside this crate
// (archive HTTP client, browser glue) plugs in through the traits in
// `archive`, `host` and `ui`.

pub mod types;
pub mod error;
pub mod config;
pub mod markup;
pub mod extractor;
pub mod restriction;
pub mod context;
pub mod archive;
pub mod host;
pub mod ui;
pub mod messaging;
pub mod navigation;
pub mod capture;
pub mod upload;
pub mod delegate;
pub mod handlers;
pub mod links;

// Re-export main types and entry points for easy use
pub use types::*;
pub use error::{ArchiveError, CaptureError, PortalError};
pub use config::RecapConfig;
pub use markup::PageMarkup;
pub use context::{PageContext, PageIdentifiers};
pub use archive::{ArchiveService, NoOpArchive};
pub use host::{HostEnvironment, PortalTransport};
pub use ui::{AvailabilityBanner, MarkupUi, PageUi};
pub use navigation::{NavigationHistory, NavigationStateManager};
pub use messaging::{MessageChannel, PageMessage, Subscription};
pub use delegate::{ContentDelegate, Services};
pub use handlers::{CaptureReport, DisplayMode, HandlerOutcome, SkipReason, UploadOutcome};
