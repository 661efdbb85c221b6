//! Feed view: joins aggregated videos with favorites and triage state

use crate::storage::triage::TriageLists;
use crate::types::{Channel, FeedTab, Video};
use std::collections::HashMap;

/// Fill `channel_thumbnail` from the matching favorite, or leave it empty
pub fn attach_channel_thumbnails(videos: Vec<Video>, favorites: &[Channel]) -> Vec<Video> {
    let thumbnails: HashMap<&str, &str> = favorites
        .iter()
        .map(|c| (c.id.as_str(), c.thumbnail.as_str()))
        .collect();

    videos
        .into_iter()
        .map(|mut video| {
            video.channel_thumbnail = thumbnails
                .get(video.channel_id.as_str())
                .map(|t| t.to_string())
                .unwrap_or_default();
            video
        })
        .collect()
}

/// Videos shown on `tab`, optionally narrowed to one channel
pub fn filter_feed<'a>(
    videos: &'a [Video],
    triage: &TriageLists,
    tab: FeedTab,
    channel: Option<&str>,
) -> Vec<&'a Video> {
    videos
        .iter()
        .filter(|v| tab.accepts(triage.state(&v.id)))
        .filter(|v| channel.is_none_or(|c| v.channel_id == c))
        .collect()
}
