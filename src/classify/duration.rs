//! Race time parsing for the result column
//!
//! The export writes times in several dot-separated encodings that overlap:
//! `1.41.97` is minutes, seconds and centiseconds, while `41.97` is seconds
//! and centiseconds. Patterns are tried in a fixed order and each one is gated
//! by a plausible duration range, so the order decides which reading wins.

use crate::constants::duration_bounds::{MAX_SECONDS, MIN_SECONDS, SPRINT_MAX_SECONDS};
use crate::models::{DurationFormat, ParsedDuration};
use regex::Regex;
use std::sync::LazyLock;

static MINUTES_SECONDS_CENTIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.(\d{2})\.(\d{2})$").expect("valid regex"));

static SECONDS_CENTIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})\.(\d{1,2})$").expect("valid regex"));

static DECIMAL_SECONDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+\.?\d*|\.\d+)$").expect("valid regex"));

/// Parse a free-text race time into seconds.
///
/// Never fails: text that matches no pattern, or only matches with an
/// implausible duration, yields an invalid [`ParsedDuration`].
pub fn parse_duration(value: &str) -> ParsedDuration {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return ParsedDuration::invalid();
    }

    let normalized = trimmed.replace(',', ".");

    parse_minutes_seconds_centis(&normalized)
        .or_else(|| parse_seconds_centis(&normalized))
        .or_else(|| parse_decimal_seconds(&normalized))
        .unwrap_or_else(ParsedDuration::invalid)
}

/// `M.SS.CC`, accepted within the full race range
fn parse_minutes_seconds_centis(value: &str) -> Option<ParsedDuration> {
    let caps = MINUTES_SECONDS_CENTIS.captures(value)?;
    let minutes: f64 = caps[1].parse().ok()?;
    let seconds: f64 = caps[2].parse().ok()?;
    let centis: f64 = caps[3].parse().ok()?;

    let total = minutes * 60.0 + seconds + centis / 100.0;
    within(total, MIN_SECONDS, MAX_SECONDS)
        .then(|| ParsedDuration::valid(total, DurationFormat::MinutesSecondsCentis))
}

/// `S.CC` / `SS.CC`, accepted only within the sprint range.
///
/// The fractional group is read as a count of centiseconds, so `41.9` is
/// 41.09 seconds.
fn parse_seconds_centis(value: &str) -> Option<ParsedDuration> {
    let caps = SECONDS_CENTIS.captures(value)?;
    let seconds: f64 = caps[1].parse().ok()?;
    let centis: f64 = caps[2].parse().ok()?;

    let total = seconds + centis / 100.0;
    within(total, MIN_SECONDS, SPRINT_MAX_SECONDS)
        .then(|| ParsedDuration::valid(total, DurationFormat::SecondsCentis))
}

/// Plain decimal seconds, accepted within the full race range
fn parse_decimal_seconds(value: &str) -> Option<ParsedDuration> {
    if !DECIMAL_SECONDS.is_match(value) {
        return None;
    }
    let total: f64 = value.parse().ok()?;

    within(total, MIN_SECONDS, MAX_SECONDS)
        .then(|| ParsedDuration::valid(total, DurationFormat::DecimalSeconds))
}

fn within(value: f64, min: f64, max: f64) -> bool {
    value.is_finite() && (min..=max).contains(&value)
}
