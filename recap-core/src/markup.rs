//! Host page model
//!
//! The portal page is held as its serialized markup, which is what the core
//! reads (presence checks, text scans) and rewrites (banners, advisories,
//! captured-document display). Queries go through `scraper`; mutations are
//! targeted string edits so the rest of the portal's markup survives
//! byte-for-byte.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

// Hardcoded selectors should never fail to parse
static FORM_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("form").expect("BUG: hardcoded selector 'form' is invalid"));

static INPUT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("input").expect("BUG: hardcoded selector 'input' is invalid")
});

static TD_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td").expect("BUG: hardcoded selector 'td' is invalid"));

static TR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr").expect("BUG: hardcoded selector 'tr' is invalid"));

static EMPHASIS_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("b, strong, em").expect("BUG: hardcoded selector 'b, strong, em' is invalid")
});

static ANCHOR_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("a[href]").expect("BUG: hardcoded selector 'a[href]' is invalid")
});

static ID_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[id]").expect("BUG: hardcoded selector '[id]' is invalid"));

static BODY_OPEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<body\b[^>]*>").unwrap());

static BODY_CLOSE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</body\s*>").unwrap());

static FORM_CLOSE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</form\s*>").unwrap());

/// A `<form>` as seen in the page: where it posts and what it would send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageForm {
    pub id: String,
    pub action: Option<String>,
    pub method: String,
    pub fields: Vec<(String, String)>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMarkup {
    html: String,
}

impl PageMarkup {
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    /// Replace the whole rendered content (the `documentElement.innerHTML` swap)
    pub fn replace(&mut self, html: String) {
        self.html = html;
    }

    fn document(&self) -> Html {
        Html::parse_document(&self.html)
    }

    // ===== QUERIES =====

    pub fn has_form(&self) -> bool {
        self.document().select(&FORM_SELECTOR).next().is_some()
    }

    /// True when any input on the page carries exactly this value
    /// (e.g. the "View Document" or "Download All" buttons)
    pub fn has_input_value(&self, value: &str) -> bool {
        self.document()
            .select(&INPUT_SELECTOR)
            .any(|input| input.value().attr("value").map(str::trim) == Some(value))
    }

    pub fn table_cell_texts(&self) -> Vec<String> {
        self.document().select(&TD_SELECTOR).map(element_text).collect()
    }

    pub fn has_table_cell_containing(&self, needle: &str) -> bool {
        self.table_cell_texts().iter().any(|text| text.contains(needle))
    }

    /// Text of bold/strong/emphasized elements
    pub fn emphasized_texts(&self) -> Vec<String> {
        self.document()
            .select(&EMPHASIS_SELECTOR)
            .map(element_text)
            .collect()
    }

    /// Raw `href` values of every anchor, in document order
    pub fn anchor_hrefs(&self) -> Vec<String> {
        self.document()
            .select(&ANCHOR_SELECTOR)
            .filter_map(|a| a.value().attr("href").map(str::to_string))
            .collect()
    }

    /// Value cell of the first table row whose text contains `label`
    /// (`<tr><td>Case Number:</td><td>3:14-cv-01234</td></tr>`)
    pub fn row_value(&self, label: &str) -> Option<String> {
        let document = self.document();
        for row in document.select(&TR_SELECTOR) {
            let cells: Vec<ElementRef> = row.select(&TD_SELECTOR).collect();
            if cells.iter().any(|cell| element_text(*cell).contains(label)) {
                return cells
                    .get(1)
                    .map(|cell| element_text(*cell).trim().to_string())
                    .filter(|value| !value.is_empty());
            }
        }
        None
    }

    pub fn contains_element_id(&self, id: &str) -> bool {
        self.document()
            .select(&ID_SELECTOR)
            .any(|el| el.value().id() == Some(id))
    }

    pub fn element_attribute(&self, id: &str, name: &str) -> Option<String> {
        self.document()
            .select(&ID_SELECTOR)
            .find(|el| el.value().id() == Some(id))
            .and_then(|el| el.value().attr(name).map(str::to_string))
    }

    /// Look up a form by id.
    ///
    /// Portal forms usually wrap tables, which the HTML5 tree builder
    /// re-parents, so fields are read from the raw `<form ...>...</form>`
    /// slice rather than from the parsed tree.
    pub fn form(&self, id: &str) -> Option<PageForm> {
        let opening = opening_tag_regex("form", id).find(&self.html)?;
        let rest = &self.html[opening.start()..];
        let end = FORM_CLOSE_REGEX
            .find(rest)
            .map(|close| close.end())
            .unwrap_or(rest.len());
        let fragment = Html::parse_fragment(&rest[..end]);

        let form = fragment.select(&FORM_SELECTOR).next()?;
        let action = form.value().attr("action").map(str::to_string);
        let method = form
            .value()
            .attr("method")
            .unwrap_or("post")
            .to_ascii_lowercase();

        let fields = fragment
            .select(&INPUT_SELECTOR)
            .filter(|input| {
                !matches!(
                    input.value().attr("type").map(str::to_ascii_lowercase).as_deref(),
                    Some("submit") | Some("button") | Some("image") | Some("reset")
                )
            })
            .filter_map(|input| {
                let name = input.value().attr("name")?;
                let value = input.value().attr("value").unwrap_or("");
                Some((name.to_string(), value.to_string()))
            })
            .collect();

        Some(PageForm {
            id: id.to_string(),
            action,
            method,
            fields,
        })
    }

    // ===== MUTATIONS =====

    /// Insert right after `<body ...>`, or at the very top when there is no body tag
    pub fn prepend_to_body(&mut self, snippet: &str) {
        match BODY_OPEN_REGEX.find(&self.html).map(|m| m.end()) {
            Some(at) => self.html.insert_str(at, snippet),
            None => self.html.insert_str(0, snippet),
        }
    }

    /// Insert right before the last `</body>`, or at the very end
    pub fn append_to_body(&mut self, snippet: &str) {
        match BODY_CLOSE_REGEX.find_iter(&self.html).last().map(|m| m.start()) {
            Some(at) => self.html.insert_str(at, snippet),
            None => self.html.push_str(snippet),
        }
    }

    /// Insert at the end of the first form, falling back to the body
    pub fn append_to_form(&mut self, snippet: &str) {
        match FORM_CLOSE_REGEX.find(&self.html).map(|m| m.start()) {
            Some(at) => self.html.insert_str(at, snippet),
            None => self.append_to_body(snippet),
        }
    }

    /// Insert `snippet` directly after the anchor whose raw `href` matches.
    /// Returns false when no such anchor exists.
    pub fn insert_after_anchor(&mut self, href: &str, snippet: &str) -> bool {
        let encoded = href.replace('&', "&amp;");
        for candidate in [href, encoded.as_str()] {
            let pattern = format!(
                r#"(?is)<a\b[^>]*\bhref\s*=\s*["']{}["'][^>]*>.*?</a\s*>"#,
                regex::escape(candidate)
            );
            let Ok(anchor_regex) = Regex::new(&pattern) else {
                continue;
            };
            if let Some(at) = anchor_regex.find(&self.html).map(|m| m.end()) {
                self.html.insert_str(at, snippet);
                return true;
            }
        }
        false
    }

    /// Set an attribute on the element with the given id. Returns false when
    /// the element is not in the markup.
    pub fn set_element_attribute(&mut self, id: &str, name: &str, value: &str) -> bool {
        let Some((start, end)) = self.opening_tag_span(id) else {
            return false;
        };
        let tag = &self.html[start..end];
        let escaped = html_escape::encode_double_quoted_attribute(value);
        let replacement = format!(r#" {name}="{escaped}""#);

        let new_tag = match attribute_regex(name).find(tag) {
            Some(existing) => format!(
                "{}{}{}",
                &tag[..existing.start()],
                replacement,
                &tag[existing.end()..]
            ),
            None => {
                let insert_at = if tag.ends_with("/>") {
                    tag.len() - 2
                } else {
                    tag.len() - 1
                };
                format!("{}{}{}", &tag[..insert_at], replacement, &tag[insert_at..])
            }
        };

        self.html.replace_range(start..end, &new_tag);
        true
    }

    pub fn remove_element_attribute(&mut self, id: &str, name: &str) -> bool {
        let Some((start, end)) = self.opening_tag_span(id) else {
            return false;
        };
        let tag = &self.html[start..end];
        let Some(existing) = attribute_regex(name).find(tag) else {
            return false;
        };
        let new_tag = format!("{}{}", &tag[..existing.start()], &tag[existing.end()..]);
        self.html.replace_range(start..end, &new_tag);
        true
    }

    fn opening_tag_span(&self, id: &str) -> Option<(usize, usize)> {
        opening_tag_regex(r"[a-z][a-z0-9]*", id)
            .find(&self.html)
            .map(|m| (m.start(), m.end()))
    }
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>()
}

fn opening_tag_regex(tag_pattern: &str, id: &str) -> Regex {
    let pattern = format!(
        r#"(?is)<{tag_pattern}\b[^>]*?\sid\s*=\s*["']{}["'][^>]*>"#,
        regex::escape(id)
    );
    Regex::new(&pattern).expect("escaped id always yields a valid pattern")
}

fn attribute_regex(name: &str) -> Regex {
    let pattern = format!(
        r#"(?is)\s{}\s*=\s*("[^"]*"|'[^']*'|[^\s>]+)"#,
        regex::escape(name)
    );
    Regex::new(&pattern).expect("escaped attribute name always yields a valid pattern")
}
