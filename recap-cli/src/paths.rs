//! Where the CLI looks for its config and puts saved documents

use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "recap";
const CONFIG_FILE: &str = "config.yaml";

/// Per-user config directory (`$XDG_CONFIG_HOME/recap` or the platform equivalent)
pub fn config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| anyhow!("Could not determine config directory"))?;
    Ok(base.join(APP_DIR))
}

/// Config file to load: the explicit path if given, otherwise the user config
/// file when one exists. `None` means built-in defaults.
pub fn resolve_config(explicit: Option<&str>) -> Option<PathBuf> {
    resolve_config_in(explicit, config_dir().ok().as_deref())
}

fn resolve_config_in(explicit: Option<&str>, user_dir: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(PathBuf::from(path));
    }
    user_dir
        .map(|dir| dir.join(CONFIG_FILE))
        .filter(|candidate| candidate.exists())
}

/// Directory saved documents land in
pub fn output_dir(explicit: Option<&str>) -> PathBuf {
    match explicit {
        Some(dir) => PathBuf::from(dir),
        None => dirs::download_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from(".")),
    }
}
