//! Favorite channels per user

use crate::error::Result;
use crate::types::Channel;
use crate::utils::paths::ensure_dir;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Favorites persisted as a JSON array of channels
pub struct FavoritesStore {
    path: PathBuf,
    channels: Vec<Channel>,
}

impl FavoritesStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            channels: Vec::new(),
        }
    }

    /// Store at the default location for `user_dir`
    pub fn in_dir(user_dir: &Path) -> Self {
        Self::new(user_dir.join("favorites.json"))
    }

    /// Load favorites from file
    pub async fn load(&mut self) -> Result<()> {
        if !self.path.exists() {
            self.channels = Vec::new();
            return Ok(());
        }

        let content = fs::read_to_string(&self.path).await?;
        self.channels = serde_json::from_str(&content)?;
        Ok(())
    }

    /// Save favorites to file
    pub async fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent).await?;
        }
        let content = serde_json::to_string_pretty(&self.channels)?;
        fs::write(&self.path, content).await?;
        Ok(())
    }

    pub fn list(&self) -> &[Channel] {
        &self.channels
    }

    /// Channel ids, in favorites order
    pub fn ids(&self) -> Vec<String> {
        self.channels.iter().map(|c| c.id.clone()).collect()
    }

    pub fn get(&self, channel_id: &str) -> Option<&Channel> {
        self.channels.iter().find(|c| c.id == channel_id)
    }

    /// Add a favorite, replacing any entry with the same id
    pub async fn add(&mut self, channel: Channel) -> Result<()> {
        self.channels.retain(|c| c.id != channel.id);
        self.channels.push(channel);
        self.save().await
    }

    /// Remove a favorite by id; returns whether it was present
    pub async fn remove(&mut self, channel_id: &str) -> Result<bool> {
        let before = self.channels.len();
        self.channels.retain(|c| c.id != channel_id);
        let removed = self.channels.len() != before;
        if removed {
            self.save().await?;
        }
        Ok(removed)
    }
}
