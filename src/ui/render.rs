//! Terminal formatting for channels and videos

use crate::types::{Channel, TriageState, Video};
use chrono::{DateTime, Utc};
use colored::Colorize;

const DESCRIPTION_WIDTH: usize = 80;

/// Cut `s` to at most `max` characters on one line
fn one_line(s: &str, max: usize) -> String {
    let flat = s.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max {
        flat
    } else {
        let cut: String = flat.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

/// "3 days ago" style age relative to `now`
pub fn format_age(published: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = now.signed_duration_since(published);
    let (n, unit) = if delta.num_days() >= 365 {
        (delta.num_days() / 365, "year")
    } else if delta.num_days() >= 30 {
        (delta.num_days() / 30, "month")
    } else if delta.num_days() >= 1 {
        (delta.num_days(), "day")
    } else if delta.num_hours() >= 1 {
        (delta.num_hours(), "hour")
    } else {
        return "just now".into();
    };

    format!("{} {}{} ago", n, unit, if n == 1 { "" } else { "s" })
}

/// Format channel for a search or favorites listing
pub fn format_channel(channel: &Channel) -> String {
    let mut out = format!("{} {}", channel.title.bold(), format!("({})", channel.id).dimmed());
    if !channel.description.trim().is_empty() {
        out.push_str(&format!("\n    {}", one_line(&channel.description, DESCRIPTION_WIDTH)));
    }
    out
}

/// Format video for the feed
pub fn format_video(video: &Video, state: TriageState, now: DateTime<Utc>) -> String {
    let marker = match state {
        TriageState::Unwatched => "●".red().to_string(),
        TriageState::Watched => "✓".green().to_string(),
        TriageState::Later => "◷".yellow().to_string(),
        TriageState::Deleted => "✗".dimmed().to_string(),
    };

    format!(
        "{} {} {}\n    {} · {} · {}",
        marker,
        video.title.bold(),
        format!("[{}]", video.id).dimmed(),
        video.channel_title.cyan(),
        format_age(video.published_at, now),
        video.watch_url().dimmed()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_age() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let at = |d: u32, h: u32| Utc.with_ymd_and_hms(2024, 2, d, h, 0, 0).unwrap();
        assert_eq!(format_age(now, now), "just now");
        assert_eq!(format_age(at(29, 12), now), "1 day ago");
        assert_eq!(format_age(at(26, 12), now), "4 days ago");
        assert_eq!(
            format_age(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(), now),
            "3 hours ago"
        );
    }

    #[test]
    fn test_one_line_truncates() {
        assert_eq!(one_line("a\n b", 10), "a b");
        assert_eq!(one_line("abcdefghij", 5), "abcd…");
    }

    #[test]
    fn test_format_channel_includes_id() {
        colored::control::set_override(false);
        let channel = Channel {
            id: "UC1".into(),
            title: "One".into(),
            description: String::new(),
            thumbnail: String::new(),
        };
        assert_eq!(format_channel(&channel), "One (UC1)");
    }
}
