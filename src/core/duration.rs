//! ISO-8601 video durations

use regex::Regex;
use std::sync::LazyLock;

static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?$").expect("Invalid regex")
});

/// Parse a `PT#H#M#S` duration into seconds
///
/// Missing components count as zero. Anything else, including day
/// components (`P1DT2H`), yields 0, which the aggregator treats as too short.
pub fn parse_iso8601_duration(duration: &str) -> u64 {
    let Some(caps) = DURATION_RE.captures(duration.trim()) else {
        return 0;
    };

    let part = |i: usize| -> u64 {
        caps.get(i)
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .unwrap_or(0)
    };

    part(1)
        .saturating_mul(3600)
        .saturating_add(part(2).saturating_mul(60))
        .saturating_add(part(3))
}
