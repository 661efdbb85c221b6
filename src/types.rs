//! Type definitions for favtube
//!
//! Source of truth for all data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================
// Channel & Video Types
// ============================================

/// A channel returned by search or a detail lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Empty when the API offered no thumbnail
    #[serde(default)]
    pub thumbnail: String,
}

/// The latest qualifying upload of a channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    pub channel_id: String,
    pub channel_title: String,
    /// Filled from the favorites by the feed view, never by the aggregator
    #[serde(default)]
    pub channel_thumbnail: String,
    pub published_at: DateTime<Utc>,
}

impl Video {
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.id)
    }
}

// ============================================
// Triage Types
// ============================================

/// Per-user classification of a video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TriageState {
    #[default]
    Unwatched,
    Watched,
    Later,
    Deleted,
}

/// Feed tab the CLI displays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedTab {
    /// Neither watched, saved for later, nor deleted
    #[default]
    ToWatch,
    Watched,
    Later,
    Deleted,
}

impl FeedTab {
    /// Whether a video in `state` belongs on this tab
    pub fn accepts(self, state: TriageState) -> bool {
        matches!(
            (self, state),
            (FeedTab::ToWatch, TriageState::Unwatched)
                | (FeedTab::Watched, TriageState::Watched)
                | (FeedTab::Later, TriageState::Later)
                | (FeedTab::Deleted, TriageState::Deleted)
        )
    }
}

// ============================================
// Config Types
// ============================================

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// YouTube Data API key; `YOUTUBE_API_KEY` takes precedence
    pub api_key: String,
    /// Local user the favorites and triage files belong to
    pub user: String,
    /// YouTube Data API base URL
    pub base_url: String,
    /// Search results cache lifetime in seconds (default: 3600)
    pub search_ttl_secs: u64,
    /// Feed cache lifetime in seconds (default: 900)
    pub feed_ttl_secs: u64,
    /// Per-request timeout in seconds (default: 10)
    pub request_timeout_secs: u64,
    /// Maximum channels returned by a search (default: 10)
    pub search_limit: usize,
    /// Editor command (default: "nvim")
    pub editor: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            user: "default".into(),
            base_url: "https://www.googleapis.com/youtube/v3".into(),
            search_ttl_secs: 3600,
            feed_ttl_secs: 900,
            request_timeout_secs: 10,
            search_limit: 10,
            editor: "nvim".into(),
        }
    }
}

// ============================================
// Cache Types
// ============================================

/// Cached data with TTL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub data: T,
    pub timestamp: i64,
    /// Time-to-live in seconds
    pub ttl: u64,
}

impl<T> CacheEntry<T> {
    pub fn is_expired(&self, now: i64) -> bool {
        let ttl = i64::try_from(self.ttl).unwrap_or(i64::MAX);
        now.saturating_sub(self.timestamp) >= ttl
    }
}
