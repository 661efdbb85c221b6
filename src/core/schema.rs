//! YouTube Data API payloads and per-record validation
//!
//! Records are validated one at a time: a malformed item is dropped and
//! counted, it never fails the batch. Only a malformed envelope (not an
//! object, or `items` that is not an array) is an error.

use crate::error::{FavtubeError, Result};
use chrono::{DateTime, Utc};
use reqwest::Url;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

// ============================================
// Raw API records
// ============================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Thumbnail {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Thumbnails {
    pub default: Option<Thumbnail>,
    pub medium: Option<Thumbnail>,
    pub high: Option<Thumbnail>,
    pub standard: Option<Thumbnail>,
    pub maxres: Option<Thumbnail>,
}

impl Thumbnails {
    fn url_of(thumb: &Option<Thumbnail>) -> Option<&str> {
        thumb
            .as_ref()
            .and_then(|t| t.url.as_deref())
            .filter(|u| !u.is_empty())
    }

    /// high -> medium -> default, as used for channel avatars
    pub fn channel_avatar(&self) -> Option<&str> {
        Self::url_of(&self.high)
            .or_else(|| Self::url_of(&self.medium))
            .or_else(|| Self::url_of(&self.default))
    }

    /// high -> default, as used for video cards
    pub fn video_card(&self) -> Option<&str> {
        Self::url_of(&self.high).or_else(|| Self::url_of(&self.default))
    }

    /// Every URL present, in no particular order
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        [&self.default, &self.medium, &self.high, &self.standard, &self.maxres]
            .into_iter()
            .filter_map(Self::url_of)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSnippet {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchId {
    pub channel_id: String,
}

/// Item of `search?type=channel`
#[derive(Debug, Clone, Deserialize)]
pub struct SearchItem {
    pub id: SearchId,
    pub snippet: ChannelSnippet,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelatedPlaylists {
    pub uploads: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelContentDetails {
    pub related_playlists: RelatedPlaylists,
}

/// Item of `channels`, with whichever parts were requested
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelItem {
    pub id: String,
    pub snippet: Option<ChannelSnippet>,
    pub content_details: Option<ChannelContentDetails>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceId {
    pub video_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistSnippet {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub channel_id: String,
    #[serde(default)]
    pub channel_title: String,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub thumbnails: Option<Thumbnails>,
    pub resource_id: ResourceId,
}

/// Item of `playlistItems?part=snippet`
#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItem {
    pub snippet: PlaylistSnippet,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoContentDetails {
    pub duration: String,
}

/// Item of `videos?part=contentDetails`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoItem {
    pub id: String,
    pub content_details: Option<VideoContentDetails>,
}

// ============================================
// Validation
// ============================================

/// Outcome counts of validating one batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidationReport {
    pub valid: usize,
    pub total: usize,
}

impl ValidationReport {
    /// Share of records that validated; an empty batch counts as fully valid
    pub fn success_ratio(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.valid as f64 / self.total as f64
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.success_ratio() < 0.5
    }
}

/// Records that passed validation, with the batch report
#[derive(Debug, Clone)]
pub struct Validated<T> {
    pub items: Vec<T>,
    pub report: ValidationReport,
}

/// Borrow the `items` array of an API envelope
///
/// A missing or null `items` is an empty page; anything else that is not an
/// array is a malformed response.
pub fn envelope_items<'a>(
    payload: &'a serde_json::Value,
    endpoint: &str,
) -> Result<&'a [serde_json::Value]> {
    let obj = payload.as_object().ok_or_else(|| {
        FavtubeError::YouTubeParse(format!("{} response is not a JSON object", endpoint))
    })?;

    match obj.get("items") {
        None | Some(serde_json::Value::Null) => Ok(&[]),
        Some(serde_json::Value::Array(items)) => Ok(items.as_slice()),
        Some(_) => Err(FavtubeError::YouTubeParse(format!(
            "{} response has a non-array `items`",
            endpoint
        ))),
    }
}

/// Validate every item of an envelope independently
///
/// `convert` performs the semantic checks serde cannot express (non-empty
/// strings, URL syntax) and builds the domain value.
pub fn validate_items<R, T, F>(
    payload: &serde_json::Value,
    endpoint: &str,
    convert: F,
) -> Result<Validated<T>>
where
    R: DeserializeOwned,
    F: Fn(R) -> std::result::Result<T, String>,
{
    let raw = envelope_items(payload, endpoint)?;
    let mut items = Vec::with_capacity(raw.len());

    for (index, value) in raw.iter().enumerate() {
        let parsed = serde_json::from_value::<R>(value.clone())
            .map_err(|e| e.to_string())
            .and_then(&convert);

        match parsed {
            Ok(item) => items.push(item),
            Err(reason) => debug!(endpoint, index, %reason, "dropping invalid record"),
        }
    }

    let report = ValidationReport {
        valid: items.len(),
        total: raw.len(),
    };

    if report.is_degraded() {
        warn!(
            endpoint,
            valid = report.valid,
            total = report.total,
            "more than half of the records failed validation"
        );
    }

    Ok(Validated { items, report })
}

/// Parse the first item of an envelope, if there is one
pub fn first_item<R: DeserializeOwned>(payload: &serde_json::Value, endpoint: &str) -> Result<Option<R>> {
    match envelope_items(payload, endpoint)?.first() {
        None => Ok(None),
        Some(value) => serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|e| FavtubeError::YouTubeParse(format!("{} item: {}", endpoint, e))),
    }
}

pub fn require_non_empty(field: &str, value: &str) -> std::result::Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("`{}` is empty", field))
    } else {
        Ok(())
    }
}

pub fn require_url(field: &str, value: &str) -> std::result::Result<(), String> {
    Url::parse(value)
        .map(|_| ())
        .map_err(|e| format!("`{}` is not a URL: {}", field, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Named {
        name: String,
    }

    fn non_empty_name(raw: Named) -> std::result::Result<String, String> {
        require_non_empty("name", &raw.name)?;
        Ok(raw.name)
    }

    #[test]
    fn test_missing_items_is_empty_page() {
        let v = validate_items(&json!({}), "test", non_empty_name).unwrap();
        assert!(v.items.is_empty());
        assert_eq!(v.report.success_ratio(), 1.0);
    }

    #[test]
    fn test_non_object_envelope_is_error() {
        let err = validate_items(&json!([1, 2]), "test", non_empty_name).unwrap_err();
        assert!(matches!(err, FavtubeError::YouTubeParse(_)));

        let err = validate_items(&json!({"items": "nope"}), "test", non_empty_name).unwrap_err();
        assert!(matches!(err, FavtubeError::YouTubeParse(_)));
    }

    #[test]
    fn test_invalid_records_are_dropped_individually() {
        let payload = json!({"items": [
            {"name": "a"},
            {"name": ""},
            {"other": 1},
            {"name": "d"},
        ]});
        let v = validate_items(&payload, "test", non_empty_name).unwrap();
        assert_eq!(v.items, vec!["a".to_string(), "d".to_string()]);
        assert_eq!(v.report, ValidationReport { valid: 2, total: 4 });
        assert!(!v.report.is_degraded());
    }

    #[test]
    fn test_degraded_batch_still_returns_valid_subset() {
        let payload = json!({"items": [{"name": "a"}, {"name": " "}, {"x": 0}]});
        let v = validate_items(&payload, "test", non_empty_name).unwrap();
        assert_eq!(v.items.len(), 1);
        assert!(v.report.is_degraded());
    }

    #[test]
    fn test_thumbnail_fallback_chains() {
        let thumbs: Thumbnails = serde_json::from_value(json!({
            "default": {"url": "https://i.ytimg.com/d.jpg"},
            "medium": {"url": "https://i.ytimg.com/m.jpg"}
        }))
        .unwrap();
        assert_eq!(thumbs.channel_avatar(), Some("https://i.ytimg.com/m.jpg"));
        assert_eq!(thumbs.video_card(), Some("https://i.ytimg.com/d.jpg"));
        assert_eq!(thumbs.urls().count(), 2);
        assert_eq!(Thumbnails::default().channel_avatar(), None);
    }

    #[test]
    fn test_first_item() {
        let item: Option<VideoItem> = first_item(
            &json!({"items": [{"id": "v1", "contentDetails": {"duration": "PT4M13S"}}]}),
            "videos",
        )
        .unwrap();
        assert_eq!(item.unwrap().content_details.unwrap().duration, "PT4M13S");

        let none: Option<VideoItem> = first_item(&json!({"items": []}), "videos").unwrap();
        assert!(none.is_none());
    }

    #[test]
    fn test_require_url() {
        assert!(require_url("thumbnail", "https://i.ytimg.com/x.jpg").is_ok());
        assert!(require_url("thumbnail", "not a url").is_err());
    }
}
