//! Watched / later / deleted state per user

use crate::error::Result;
use crate::types::TriageState;
use crate::utils::paths::ensure_dir;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::warn;

/// The three triage lists; a video id appears in at most one
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriageLists {
    pub watched: Vec<String>,
    pub later: Vec<String>,
    pub deleted: Vec<String>,
}

impl TriageLists {
    pub fn state(&self, video_id: &str) -> TriageState {
        let has = |list: &[String]| list.iter().any(|id| id == video_id);
        if has(&self.watched) {
            TriageState::Watched
        } else if has(&self.later) {
            TriageState::Later
        } else if has(&self.deleted) {
            TriageState::Deleted
        } else {
            TriageState::Unwatched
        }
    }

    /// Move `video_id` into the list for `state`, out of the others
    pub fn set(&mut self, video_id: &str, state: TriageState) {
        self.watched.retain(|id| id != video_id);
        self.later.retain(|id| id != video_id);
        self.deleted.retain(|id| id != video_id);

        let list = match state {
            TriageState::Unwatched => return,
            TriageState::Watched => &mut self.watched,
            TriageState::Later => &mut self.later,
            TriageState::Deleted => &mut self.deleted,
        };
        list.push(video_id.to_string());
    }

    pub fn mark_watched(&mut self, video_id: &str) {
        self.set(video_id, TriageState::Watched);
    }

    pub fn mark_later(&mut self, video_id: &str) {
        self.set(video_id, TriageState::Later);
    }

    pub fn mark_deleted(&mut self, video_id: &str) {
        self.set(video_id, TriageState::Deleted);
    }

    pub fn unmark_watched(&mut self, video_id: &str) {
        self.watched.retain(|id| id != video_id);
    }

    pub fn unmark_later(&mut self, video_id: &str) {
        self.later.retain(|id| id != video_id);
    }

    pub fn restore_deleted(&mut self, video_id: &str) {
        self.deleted.retain(|id| id != video_id);
    }
}

/// Triage lists persisted as JSON
pub struct TriageStore {
    path: PathBuf,
    lists: TriageLists,
}

impl TriageStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lists: TriageLists::default(),
        }
    }

    /// Store at the default location for `user_dir`
    pub fn in_dir(user_dir: &Path) -> Self {
        Self::new(user_dir.join("triage.json"))
    }

    /// Load triage state from file
    ///
    /// A corrupt file is logged and treated as empty.
    pub async fn load(&mut self) -> Result<()> {
        if !self.path.exists() {
            self.lists = TriageLists::default();
            return Ok(());
        }

        let content = fs::read_to_string(&self.path).await?;
        self.lists = serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "unreadable triage file, starting empty");
            TriageLists::default()
        });
        Ok(())
    }

    /// Save triage state to file
    pub async fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent).await?;
        }
        let content = serde_json::to_string_pretty(&self.lists)?;
        fs::write(&self.path, content).await?;
        Ok(())
    }

    pub fn lists(&self) -> &TriageLists {
        &self.lists
    }

    pub fn state(&self, video_id: &str) -> TriageState {
        self.lists.state(video_id)
    }

    /// Set the state of a video and persist
    pub async fn set(&mut self, video_id: &str, state: TriageState) -> Result<()> {
        self.lists.set(video_id, state);
        self.save().await
    }

    pub async fn unmark_watched(&mut self, video_id: &str) -> Result<()> {
        self.lists.unmark_watched(video_id);
        self.save().await
    }

    pub async fn unmark_later(&mut self, video_id: &str) -> Result<()> {
        self.lists.unmark_later(video_id);
        self.save().await
    }

    pub async fn restore_deleted(&mut self, video_id: &str) -> Result<()> {
        self.lists.restore_deleted(video_id);
        self.save().await
    }
}
