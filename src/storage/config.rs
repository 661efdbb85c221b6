//! Configuration management

use crate::error::{FavtubeError, Result};
use crate::types::Config;
use crate::utils::paths::{ensure_dir, get_config_dir, get_config_path};
use std::env;
use std::path::Path;
use tokio::fs;
use tokio::process::Command;

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "YOUTUBE_API_KEY";

/// Load configuration from the default location
pub async fn load_config() -> Result<Config> {
    load_config_from(&get_config_path()).await
}

/// Load configuration from `path`, filling gaps with defaults
///
/// `YOUTUBE_API_KEY` overrides the file's `api_key`.
pub async fn load_config_from(path: &Path) -> Result<Config> {
    let mut config = if path.exists() {
        let content = fs::read_to_string(path).await?;
        serde_json::from_str::<Config>(&content)
            .map_err(|e| FavtubeError::InvalidConfig(format!("{}: {}", path.display(), e)))?
    } else {
        Config::default()
    };

    if let Ok(key) = env::var(API_KEY_ENV) {
        if !key.trim().is_empty() {
            config.api_key = key.trim().to_string();
        }
    }

    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.base_url.trim().is_empty() {
        return Err(FavtubeError::InvalidConfig("base_url is empty".into()));
    }
    if config.search_ttl_secs == 0 || config.feed_ttl_secs == 0 {
        return Err(FavtubeError::InvalidConfig("cache TTLs must be positive".into()));
    }
    if config.search_limit == 0 {
        return Err(FavtubeError::InvalidConfig("search_limit must be positive".into()));
    }
    Ok(())
}

/// Save configuration to file
pub async fn save_config(config: &Config) -> Result<()> {
    ensure_dir(&get_config_dir()).await?;
    let content = serde_json::to_string_pretty(config)?;
    fs::write(get_config_path(), content).await?;
    Ok(())
}

/// Open config file in editor
pub async fn edit_config(editor: &str) -> Result<()> {
    let config_path = get_config_path();

    // Ensure config file exists
    if !config_path.exists() {
        save_config(&Config::default()).await?;
    }

    Command::new(editor).arg(&config_path).status().await?;

    Ok(())
}
