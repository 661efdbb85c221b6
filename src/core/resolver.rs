//! Channel search and lookup

use crate::core::api::{Transport, endpoint};
use crate::core::schema::{
    ChannelItem, SearchItem, Validated, ValidationReport, require_non_empty, require_url,
    validate_items,
};
use crate::error::{FavtubeError, Result};
use crate::storage::cache::ResponseCache;
use crate::types::Channel;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Upper bound the search endpoint accepts for `maxResults`
const MAX_SEARCH_RESULTS: usize = 50;

/// Decode HTML entities in a string
fn decode_html_entities(s: &str) -> String {
    html_escape::decode_html_entities(s).to_string()
}

/// Normalize a query for use as a cache key
pub fn normalize_query(query: &str) -> String {
    query
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

fn channel_from_search(item: SearchItem) -> std::result::Result<Channel, String> {
    require_non_empty("id.channelId", &item.id.channel_id)?;
    require_non_empty("snippet.title", &item.snippet.title)?;

    let thumbnail = item
        .snippet
        .thumbnails
        .as_ref()
        .and_then(|t| t.channel_avatar())
        .unwrap_or_default()
        .to_string();
    if !thumbnail.is_empty() {
        require_url("thumbnail", &thumbnail)?;
    }

    Ok(Channel {
        id: item.id.channel_id,
        title: decode_html_entities(item.snippet.title.trim()),
        description: decode_html_entities(&item.snippet.description),
        thumbnail,
    })
}

fn channel_from_details(item: ChannelItem) -> std::result::Result<Channel, String> {
    require_non_empty("id", &item.id)?;
    let snippet = item.snippet.ok_or("missing snippet")?;
    require_non_empty("snippet.title", &snippet.title)?;

    let thumbnail = snippet
        .thumbnails
        .as_ref()
        .and_then(|t| t.channel_avatar())
        .unwrap_or_default()
        .to_string();
    if !thumbnail.is_empty() {
        require_url("thumbnail", &thumbnail)?;
    }

    Ok(Channel {
        id: item.id,
        title: snippet.title.trim().to_string(),
        description: snippet.description,
        thumbnail,
    })
}

/// Search results with the validation report of the search page
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub channels: Vec<Channel>,
    /// `None` when the results came from the cache
    pub report: Option<ValidationReport>,
}

/// Resolves free-text queries to channels
pub struct ChannelResolver {
    transport: Arc<dyn Transport>,
    cache: Arc<ResponseCache>,
    ttl: u64,
    limit: usize,
}

impl ChannelResolver {
    pub fn new(transport: Arc<dyn Transport>, cache: Arc<ResponseCache>, ttl: u64) -> Self {
        Self {
            transport,
            cache,
            ttl,
            limit: 10,
        }
    }

    /// Cap the number of channels a search returns
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.clamp(1, MAX_SEARCH_RESULTS);
        self
    }

    /// Search channels matching `query`
    ///
    /// Zero matches is `Ok(vec![])`; a failed request is an error.
    pub async fn search(&self, query: &str) -> Result<Vec<Channel>> {
        Ok(self.search_with_report(query).await?.channels)
    }

    /// Like [`search`](Self::search), also exposing how many search records
    /// passed validation
    pub async fn search_with_report(&self, query: &str) -> Result<SearchOutcome> {
        let normalized = normalize_query(query);
        if normalized.is_empty() {
            return Err(FavtubeError::InvalidInput("Search query cannot be empty".into()));
        }

        let cache_key = format!("search:{}:{}", self.limit, normalized);
        if let Some(channels) = self.cache.get::<Vec<Channel>>(&cache_key).await {
            return Ok(SearchOutcome { channels, report: None });
        }

        let limit = self.limit.to_string();
        let payload = self
            .transport
            .get(
                endpoint::SEARCH,
                &[
                    ("part", "snippet"),
                    ("type", "channel"),
                    ("maxResults", limit.as_str()),
                    ("q", query.trim()),
                ],
            )
            .await?;

        let Validated { items, report } =
            validate_items(&payload, endpoint::SEARCH, channel_from_search)?;

        if items.is_empty() {
            info!(query = %normalized, "no channels found");
            return Ok(SearchOutcome {
                channels: Vec::new(),
                report: Some(report),
            });
        }

        let channels = self.with_canonical_thumbnails(items).await;

        if let Err(e) = self.cache.set(&cache_key, &channels, self.ttl).await {
            debug!(error = %e, "failed to cache search results");
        }

        Ok(SearchOutcome {
            channels,
            report: Some(report),
        })
    }

    /// Replace search thumbnails with the ones from one batched channel lookup
    ///
    /// Best-effort: a failed lookup keeps the search thumbnails.
    async fn with_canonical_thumbnails(&self, channels: Vec<Channel>) -> Vec<Channel> {
        let ids = channels
            .iter()
            .map(|c| c.id.as_str())
            .collect::<Vec<_>>()
            .join(",");

        let details = match self.lookup(&ids).await {
            Ok(details) => details,
            Err(e) => {
                warn!(error = %e, "thumbnail lookup failed, keeping search thumbnails");
                return channels;
            }
        };

        let thumbnails: HashMap<String, String> = details
            .into_iter()
            .filter(|c| !c.thumbnail.is_empty())
            .map(|c| (c.id, c.thumbnail))
            .collect();

        channels
            .into_iter()
            .map(|mut channel| {
                if let Some(thumbnail) = thumbnails.get(&channel.id) {
                    channel.thumbnail = thumbnail.clone();
                }
                channel
            })
            .collect()
    }

    async fn lookup(&self, ids: &str) -> Result<Vec<Channel>> {
        let payload = self
            .transport
            .get(endpoint::CHANNELS, &[("part", "snippet"), ("id", ids)])
            .await?;

        Ok(validate_items(&payload, endpoint::CHANNELS, channel_from_details)?.items)
    }

    /// Look up one channel by id
    ///
    /// Returns `None` when the channel does not exist or the lookup fails.
    pub async fn channel_details(&self, channel_id: &str) -> Option<Channel> {
        let channel_id = channel_id.trim();
        if channel_id.is_empty() {
            return None;
        }

        match self.lookup(channel_id).await {
            Ok(channels) => {
                let found = channels.into_iter().find(|c| c.id == channel_id);
                if found.is_none() {
                    debug!(channel_id, "channel not found");
                }
                found
            }
            Err(e) => {
                warn!(channel_id, error = %e, "channel lookup failed");
                None
            }
        }
    }
}
