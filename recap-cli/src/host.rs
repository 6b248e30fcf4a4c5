//! Host environment for a page handled from the command line

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use recap_core::{FormSubmission, HostEnvironment};
use std::cell::RefCell;
use std::path::PathBuf;

/// Something the page asked the host to do that the CLI reports afterwards
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Saved(PathBuf),
    Navigated(String),
    ResumedNativeSubmission { form_id: String, action: String },
}

pub struct CliHost {
    session: bool,
    inline_pdf: bool,
    output_dir: PathBuf,
    events: RefCell<Vec<HostEvent>>,
}

impl CliHost {
    /// `cookie` is the raw `Cookie` header the portal session would send
    pub fn new(cookie: Option<&str>, inline_pdf: bool, output_dir: PathBuf) -> Self {
        Self {
            session: cookie.is_some_and(is_validated_session),
            inline_pdf,
            output_dir,
            events: RefCell::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<HostEvent> {
        self.events.borrow().clone()
    }
}

/// A login cookie is present and the portal has not flagged it as unvalidated
pub fn is_validated_session(cookie: &str) -> bool {
    let logged_in = cookie.split(';').any(|pair| {
        let name = pair.split('=').next().unwrap_or_default().trim();
        name == "PacerUser" || name == "PacerSession"
    });
    logged_in && !cookie.contains("unvalidated")
}

impl HostEnvironment for CliHost {
    fn has_session_cookie(&self) -> bool {
        self.session
    }

    fn can_display_pdf_inline(&self) -> bool {
        self.inline_pdf
    }

    fn create_object_url(&self, bytes: &[u8], content_type: &str) -> String {
        format!("data:{};base64,{}", content_type, STANDARD.encode(bytes))
    }

    fn save_file(&self, filename: &str, bytes: &[u8]) {
        let path = self.output_dir.join(filename);
        match std::fs::create_dir_all(&self.output_dir).and_then(|_| std::fs::write(&path, bytes)) {
            Ok(()) => {
                tracing::info!(path = %path.display(), len = bytes.len(), "💾 Saved document");
                self.events.borrow_mut().push(HostEvent::Saved(path));
            }
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "⚠️  Could not save document"),
        }
    }

    fn navigate(&self, url: &str) {
        self.events.borrow_mut().push(HostEvent::Navigated(url.to_string()));
    }

    fn resume_native_submission(&self, submission: &FormSubmission) {
        self.events.borrow_mut().push(HostEvent::ResumedNativeSubmission {
            form_id: submission.form_id.clone(),
            action: submission.action.clone(),
        });
    }
}
