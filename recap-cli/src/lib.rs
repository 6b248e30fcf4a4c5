// Page handling lives in recap-core; this crate supplies the real
// collaborators (archive API, portal session, local host) for the CLI.

pub mod archive_client;
pub mod host;
pub mod paths;
pub mod portal;

pub use recap_core::*;

pub use archive_client::HttpArchiveClient;
pub use host::{CliHost, HostEvent};
pub use portal::HttpPortalTransport;
