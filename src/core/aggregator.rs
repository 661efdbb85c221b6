//! Latest-upload feed across channels
//!
//! Each channel runs its own lookup chain (uploads playlist, newest item,
//! Short check, duration check). The chains run concurrently and every one
//! is awaited to completion; a failing channel is logged and skipped.

use crate::core::api::{Transport, endpoint};
use crate::core::duration::parse_iso8601_duration;
use crate::core::schema::{
    ChannelItem, PlaylistItem, PlaylistSnippet, VideoItem, first_item, require_non_empty,
    require_url,
};
use crate::error::{FavtubeError, Result};
use crate::storage::cache::ResponseCache;
use crate::types::Video;
use futures::future::join_all;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Uploads at or under this length are treated as clips and skipped
pub const MIN_DURATION_SECS: u64 = 180;

/// Whether a playlist entry looks like a YouTube Short
///
/// Heuristic: "shorts" anywhere in the title or description, or a
/// thumbnail served from a `/shorts/` path.
pub fn is_short(snippet: &PlaylistSnippet) -> bool {
    let mentions_shorts = |s: &str| s.to_lowercase().contains("shorts");

    mentions_shorts(&snippet.title)
        || mentions_shorts(&snippet.description)
        || snippet
            .thumbnails
            .as_ref()
            .is_some_and(|t| t.urls().any(|u| u.contains("/shorts/")))
}

/// Field checks for the newest playlist entry; a failure marks it malformed
fn validate_snippet(snippet: &PlaylistSnippet) -> std::result::Result<(), String> {
    require_non_empty("videoId", &snippet.resource_id.video_id)?;
    require_non_empty("title", &snippet.title)?;
    require_non_empty("channelId", &snippet.channel_id)?;
    require_non_empty("channelTitle", &snippet.channel_title)?;
    if let Some(url) = snippet.thumbnails.as_ref().and_then(|t| t.video_card()) {
        require_url("thumbnail", url)?;
    }
    Ok(())
}

/// Cache key for a set of channels, independent of order and duplicates
pub fn feed_cache_key(channel_ids: &BTreeSet<&str>) -> String {
    format!(
        "feed:{}",
        channel_ids.iter().copied().collect::<Vec<_>>().join(",")
    )
}

pub struct VideoAggregator {
    transport: Arc<dyn Transport>,
    cache: Arc<ResponseCache>,
    ttl: u64,
}

impl VideoAggregator {
    pub fn new(transport: Arc<dyn Transport>, cache: Arc<ResponseCache>, ttl: u64) -> Self {
        Self {
            transport,
            cache,
            ttl,
        }
    }

    /// Latest long-form upload of every channel, newest first
    ///
    /// Fails only on bad input; per-channel failures drop that channel.
    pub async fn latest_videos(&self, channel_ids: &[String]) -> Result<Vec<Video>> {
        if channel_ids.is_empty() {
            return Ok(Vec::new());
        }

        if let Some(blank) = channel_ids.iter().position(|id| id.trim().is_empty()) {
            return Err(FavtubeError::InvalidInput(format!(
                "channel id at position {} is empty",
                blank
            )));
        }

        let ids: BTreeSet<&str> = channel_ids.iter().map(|id| id.trim()).collect();
        let cache_key = feed_cache_key(&ids);

        if let Some(videos) = self.cache.get::<Vec<Video>>(&cache_key).await {
            return Ok(videos);
        }

        info!(channels = ids.len(), "fetching latest videos");

        let lookups = ids.iter().map(|id| async move {
            let outcome = self.latest_for_channel(id).await;
            (*id, outcome)
        });

        let mut videos: Vec<Video> = join_all(lookups)
            .await
            .into_iter()
            .filter_map(|(channel_id, outcome)| match outcome {
                Ok(video) => video,
                Err(e) => {
                    warn!(channel_id, error = %e, "skipping channel");
                    None
                }
            })
            .collect();

        videos.sort_by(|a, b| b.published_at.cmp(&a.published_at));

        if let Err(e) = self.cache.set(&cache_key, &videos, self.ttl).await {
            debug!(error = %e, "failed to cache feed");
        }

        Ok(videos)
    }

    /// Forget the cached feed for this set of channels
    pub async fn invalidate(&self, channel_ids: &[String]) -> Result<()> {
        let ids: BTreeSet<&str> = channel_ids.iter().map(|id| id.trim()).collect();
        self.cache.remove(&feed_cache_key(&ids)).await
    }

    /// Run the lookup chain for one channel
    ///
    /// `Ok(None)` means the channel has nothing to show this cycle.
    async fn latest_for_channel(&self, channel_id: &str) -> Result<Option<Video>> {
        let Some(uploads) = self.uploads_playlist(channel_id).await? else {
            debug!(channel_id, "no uploads playlist");
            return Ok(None);
        };

        let payload = self
            .transport
            .get(
                endpoint::PLAYLIST_ITEMS,
                &[
                    ("part", "snippet"),
                    ("maxResults", "1"),
                    ("playlistId", uploads.as_str()),
                ],
            )
            .await?;

        let Some(PlaylistItem { snippet }) =
            first_item::<PlaylistItem>(&payload, endpoint::PLAYLIST_ITEMS)?
        else {
            debug!(channel_id, "uploads playlist is empty");
            return Ok(None);
        };

        validate_snippet(&snippet).map_err(|reason| {
            FavtubeError::YouTubeParse(format!("playlist item of {}: {}", channel_id, reason))
        })?;

        if is_short(&snippet) {
            debug!(channel_id, video_id = %snippet.resource_id.video_id, "skipping short");
            return Ok(None);
        }

        let seconds = self.duration_secs(&snippet.resource_id.video_id).await?;
        if seconds <= MIN_DURATION_SECS {
            debug!(channel_id, seconds, "skipping clip");
            return Ok(None);
        }

        let thumbnail = snippet
            .thumbnails
            .as_ref()
            .and_then(|t| t.video_card())
            .map(str::to_string);

        Ok(Some(Video {
            id: snippet.resource_id.video_id,
            title: snippet.title,
            description: snippet.description,
            thumbnail,
            channel_id: snippet.channel_id,
            channel_title: snippet.channel_title,
            channel_thumbnail: String::new(),
            published_at: snippet.published_at,
        }))
    }

    async fn uploads_playlist(&self, channel_id: &str) -> Result<Option<String>> {
        let payload = self
            .transport
            .get(
                endpoint::CHANNELS,
                &[("part", "contentDetails"), ("id", channel_id)],
            )
            .await?;

        Ok(first_item::<ChannelItem>(&payload, endpoint::CHANNELS)?
            .and_then(|item| item.content_details)
            .and_then(|details| details.related_playlists.uploads)
            .filter(|uploads| !uploads.is_empty()))
    }

    /// Duration in seconds; unknown durations count as 0
    async fn duration_secs(&self, video_id: &str) -> Result<u64> {
        let payload = self
            .transport
            .get(
                endpoint::VIDEOS,
                &[("part", "contentDetails"), ("id", video_id)],
            )
            .await?;

        Ok(first_item::<VideoItem>(&payload, endpoint::VIDEOS)?
            .and_then(|item| item.content_details)
            .map(|details| parse_iso8601_duration(&details.duration))
            .unwrap_or(0))
    }
}
