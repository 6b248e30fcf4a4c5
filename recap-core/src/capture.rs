//! Document capture: response classification and viewer markup surgery

use crate::markup::PageMarkup;
use crate::messaging::DOCUMENT_VIEW_SUBMIT;
use crate::types::{CapturedContent, DocumentNumbers, PortalResponse};
use regex::Regex;
use std::sync::LazyLock;
use uuid::Uuid;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// `onsubmit` installed while the page is snapshotted, so an accidental
/// submit just returns to the document
pub const SUPPRESSED_ONSUBMIT: &str = "history.forward(); return false;";

pub const WAITING_PLACEHOLDER: &str = r#"<p id="recap-waiting">Waiting for download...</p>"#;

pub const BLANK_SOURCE: &str = "about:blank";

pub const SCRIPT_ID: &str = "recap-view-interceptor";

static VIEWER_MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<(?:iframe|object)\b").unwrap());

static VIEWER_SOURCE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<(iframe|object)\b([^>]*?)\s(src|data)\s*=\s*"([^"]*)""#).unwrap()
});

static IMAGE_NUMBERS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Image\s+(\d+)(?:-(\d+))?").unwrap());

/// Result of sorting out what the portal sent back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedResponse {
    pub content: CapturedContent,
    /// True when the payload went through the text decode
    pub decoded_as_text: bool,
}

/// Decide between the document itself and markup.
///
/// `application/pdf` is taken as-is. Anything else is decoded as text: a
/// viewer frame makes it wrapper markup, a bare `%PDF` header makes it the
/// document after all, and whatever remains is shown literally.
pub fn classify_response(response: PortalResponse) -> ClassifiedResponse {
    if is_pdf_content_type(&response.content_type) {
        return ClassifiedResponse {
            content: CapturedContent::Binary(response.bytes),
            decoded_as_text: false,
        };
    }

    let text = String::from_utf8_lossy(&response.bytes).into_owned();
    let content = if VIEWER_MARKER_REGEX.is_match(&text) {
        CapturedContent::Wrapper(text)
    } else if response.bytes.starts_with(b"%PDF") {
        CapturedContent::Binary(response.bytes)
    } else {
        CapturedContent::Wrapper(text)
    };

    ClassifiedResponse {
        content,
        decoded_as_text: true,
    }
}

fn is_pdf_content_type(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(|mime| mime.trim().eq_ignore_ascii_case(PDF_CONTENT_TYPE))
        .unwrap_or(false)
}

/// Viewer markup split around the frame's source attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerFrame {
    before: String,
    opening: String,
    source_attribute: String,
    source: String,
    after: String,
}

impl ViewerFrame {
    /// Locate the `<iframe src>`/`<object data>` in wrapper markup
    pub fn parse(markup: &str) -> Option<Self> {
        let caps = VIEWER_SOURCE_REGEX.captures(markup)?;
        let whole = caps.get(0)?;
        Some(Self {
            before: markup[..whole.start()].to_string(),
            opening: format!("<{}{}", &caps[1], &caps[2]),
            source_attribute: caps[3].to_string(),
            source: html_escape::decode_html_entities(&caps[4]).into_owned(),
            after: markup[whole.end()..].to_string(),
        })
    }

    /// Frame page for a document that arrived as raw bytes
    pub fn standalone() -> Self {
        Self {
            before: concat!(
                "<html><head><style>body { margin: 0; } iframe { border: none; }</style></head>",
                "<body>"
            )
            .to_string(),
            opening: "<iframe".to_string(),
            source_attribute: "src".to_string(),
            source: BLANK_SOURCE.to_string(),
            after: r#" width="100%" height="100%"></iframe></body></html>"#.to_string(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// The page shown while the document downloads
    pub fn waiting_page(&self) -> String {
        format!("{}{}{}", self.before, WAITING_PLACEHOLDER, self.frame_with(BLANK_SOURCE))
    }

    /// The page with the frame pointing at `source`
    pub fn display_page(&self, source: &str) -> String {
        format!("{}{}", self.before, self.frame_with(source))
    }

    fn frame_with(&self, source: &str) -> String {
        format!(
            r#"{} {}="{}"{}"#,
            self.opening,
            self.source_attribute,
            html_escape::encode_double_quoted_attribute(source),
            self.after
        )
    }
}

/// Document and attachment numbers from the receipt page's `Image N-M` cell,
/// plus the docket number from the `Case Number` row
pub fn document_numbers(page: &PageMarkup) -> Option<DocumentNumbers> {
    let cell = page
        .table_cell_texts()
        .into_iter()
        .find(|text| IMAGE_NUMBERS_REGEX.is_match(text))?;
    let caps = IMAGE_NUMBERS_REGEX.captures(&cell)?;

    Some(DocumentNumbers {
        document_number: caps[1].to_string(),
        attachment_number: caps.get(2).map(|m| m.as_str().to_string()),
        docket_number: page.row_value("Case Number"),
    })
}

/// Script that replaces the portal's `goDLS` viewer submission with a
/// tagged message naming the form it builds
pub fn interceptor_script(nonce: Uuid) -> String {
    format!(
        r#"<script id="{script_id}">
function goDLS(hyperlink, de_caseid, de_seqno, got_receipt, pdf_header, pdf_toggle_possible, magic_num, hdr) {{
  var form = document.createElement("form");
  form.id = "form" + new Date().getTime();
  form.action = hyperlink;
  form.method = "POST";
  var fields = {{caseid: de_caseid, de_seq_num: de_seqno, got_receipt: got_receipt,
                pdf_header: pdf_header, pdf_toggle_possible: pdf_toggle_possible,
                magic_num: magic_num, hdr: hdr}};
  for (var name in fields) {{
    if (fields[name]) {{
      var input = document.createElement("input");
      input.type = "hidden";
      input.name = name;
      input.value = fields[name];
      form.appendChild(input);
    }}
  }}
  document.body.appendChild(form);
  window.postMessage({{tag: "{tag}", payload: {{id: form.id, nonce: "{nonce}"}}}}, "*");
  return false;
}}
</script>"#,
        script_id = SCRIPT_ID,
        tag = DOCUMENT_VIEW_SUBMIT,
        nonce = nonce,
    )
}
