use anyhow::Result;
use serde::{Deserialize, Serialize};

// Default value functions for serde
fn default_true() -> bool {
    true
}

fn default_archive_base_url() -> String {
    "https://www.courtlistener.com".to_string()
}

fn default_warning_phrase() -> String {
    "Warning!".to_string()
}

fn default_sealed_marker() -> String {
    "SEALED".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecapConfig {
    /// Where the archive lives and whether uploads are allowed at all
    #[serde(default)]
    pub archive: ArchiveConfig,
    /// Portal instances recognized beyond the public `*.uscourts.gov` courts
    #[serde(default)]
    pub portal: PortalConfig,
    /// User-facing options
    #[serde(default)]
    pub options: OptionsConfig,
    /// Markers that flag a page as restricted
    #[serde(default)]
    pub restriction: RestrictionConfig,
    /// Naming of documents saved to disk
    #[serde(default)]
    pub filenames: FilenameConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Base URL used for API calls and for deep links in banners
    #[serde(default = "default_archive_base_url")]
    pub base_url: String,
    /// API token sent with every archive request
    #[serde(default)]
    pub api_token: Option<String>,
    /// When false, pages are still checked for availability but nothing is
    /// captured or uploaded
    #[serde(default = "default_true")]
    pub upload_enabled: bool,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            base_url: default_archive_base_url(),
            api_token: None,
            upload_enabled: true,
        }
    }
}

impl ArchiveConfig {
    /// Join a server-relative path (`/download/...` or `download/...`) onto the base URL
    pub fn absolute_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Extra portal hosts to treat as court-records portals (training
    /// instances, mirrors), each mapped to the court code to report
    #[serde(default)]
    pub extra_hosts: Vec<PortalHost>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PortalHost {
    pub host: String,
    pub court: String,
}

impl PortalConfig {
    pub fn court_for_host(&self, host: &str) -> Option<&str> {
        self.extra_hosts
            .iter()
            .find(|entry| entry.host.eq_ignore_ascii_case(host))
            .map(|entry| entry.court.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptionsConfig {
    /// Open archive links in an in-page popup instead of navigating
    #[serde(default)]
    pub recap_link_popups: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestrictionConfig {
    /// Phrase the portal puts in a table cell above restricted documents
    #[serde(default = "default_warning_phrase")]
    pub warning_phrase: String,
    /// Emphasized marker used for sealed filings
    #[serde(default = "default_sealed_marker")]
    pub sealed_marker: String,
}

impl Default for RestrictionConfig {
    fn default() -> Self {
        Self {
            warning_phrase: default_warning_phrase(),
            sealed_marker: default_sealed_marker(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FilenameStyle {
    /// `{court}_{docket}_{document}_{attachment}.pdf`
    #[default]
    Lawyer,
    /// `gov.uscourts.{court}.{case}.{document}.{attachment}.pdf`
    InternetArchive,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilenameConfig {
    #[serde(default)]
    pub style: FilenameStyle,
}

impl RecapConfig {
    /// Load config from file path (functional approach)
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: RecapConfig = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Load config with fallback to default
    pub fn load_with_fallback(path: Option<&str>) -> Self {
        match path {
            Some(p) => Self::load_from_file(p).unwrap_or_else(|e| {
                tracing::warn!(path = p, error = %e, "⚠️  Failed to load config, using defaults");
                Self::default()
            }),
            None => Self::default(),
        }
    }
}
