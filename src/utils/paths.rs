//! Path utilities for favtube
//!
//! Respects XDG Base Directory Specification

use crate::error::Result;
use std::env;
use std::path::{Path, PathBuf};
use tokio::fs;

const APP_NAME: &str = "favtube";

fn xdg_dir(var: &str, fallback: Option<PathBuf>, home_suffix: &str) -> PathBuf {
    let base = env::var(var)
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or(fallback)
        .unwrap_or_else(|| PathBuf::from(env::var("HOME").unwrap_or_default()).join(home_suffix));

    base.join(APP_NAME)
}

/// Get config directory path
/// Respects XDG_CONFIG_HOME, defaults to ~/.config/favtube
pub fn get_config_dir() -> PathBuf {
    xdg_dir("XDG_CONFIG_HOME", dirs::config_dir(), ".config")
}

/// Get cache directory path
/// Respects XDG_CACHE_HOME, defaults to ~/.cache/favtube
pub fn get_cache_dir() -> PathBuf {
    xdg_dir("XDG_CACHE_HOME", dirs::cache_dir(), ".cache")
}

/// Get data directory path
/// Respects XDG_DATA_HOME, defaults to ~/.local/share/favtube
pub fn get_data_dir() -> PathBuf {
    xdg_dir("XDG_DATA_HOME", dirs::data_dir(), ".local/share")
}

/// Get config file path
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.json")
}

/// Per-user directory holding favorites and triage state
pub fn get_user_dir(user: &str) -> PathBuf {
    get_data_dir().join(sanitize_user(user))
}

/// Keep user names from escaping the data directory
fn sanitize_user(user: &str) -> String {
    let cleaned: String = user
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();

    if cleaned.is_empty() { "default".into() } else { cleaned }
}

/// Ensure a directory exists
pub async fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).await?;
    Ok(())
}

/// Ensure all required app directories exist
pub async fn ensure_app_dirs() -> Result<()> {
    ensure_dir(&get_config_dir()).await?;
    ensure_dir(&get_cache_dir()).await?;
    ensure_dir(&get_data_dir()).await?;
    Ok(())
}
