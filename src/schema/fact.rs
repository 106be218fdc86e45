//! Fact rows and foreign key coverage

use crate::classify::stats::percentage;
use crate::models::ClassifiedRecord;
use serde::Serialize;

/// One row of `fact_race_results`, one per classified record in input order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactRow {
    pub result_id: u32,
    pub athlete_key: Option<u32>,
    pub team_key: Option<u32>,
    pub race_key: Option<u32>,
    pub category_key: Option<u32>,
    pub location_key: Option<u32>,
    pub date_key: Option<i32>,
    pub rank_position: Option<u32>,
    pub race_time_seconds: Option<f64>,
    pub lane_number: Option<u32>,
    pub series_number: Option<u32>,
    pub series_time: Option<String>,
    pub warning_points: u32,
    pub has_valid_rank: bool,
    pub has_valid_time: bool,
    pub dnf_flag: bool,
    pub dns_flag: bool,
    pub dsq_flag: bool,
    pub notes: Option<String>,
}

/// Dimension keys resolved for one record
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ForeignKeys {
    pub athlete: Option<u32>,
    pub team: Option<u32>,
    pub race: Option<u32>,
    pub category: Option<u32>,
    pub location: Option<u32>,
    pub date: Option<i32>,
}

impl FactRow {
    pub fn new(result_id: u32, record: &ClassifiedRecord, keys: ForeignKeys) -> Self {
        let raw = &record.raw;
        Self {
            result_id,
            athlete_key: keys.athlete,
            team_key: keys.team,
            race_key: keys.race,
            category_key: keys.category,
            location_key: keys.location,
            date_key: keys.date,
            rank_position: record.rank,
            race_time_seconds: record.time,
            lane_number: raw.lane.as_deref().and_then(parse_count),
            series_number: raw.series_number.as_deref().and_then(parse_count),
            series_time: raw.series_time.clone(),
            warning_points: raw.warning_points.as_deref().and_then(parse_count).unwrap_or(0),
            has_valid_rank: record.has_valid_rank(),
            has_valid_time: record.has_valid_time(),
            dnf_flag: record.is_dnf(),
            dns_flag: record.is_dns(),
            dsq_flag: record.is_dsq(),
            notes: record.notes.clone(),
        }
    }
}

/// Non-negative whole number, tolerating the `"3.0"` form spreadsheets export
pub fn parse_count(text: &str) -> Option<u32> {
    let text = text.trim();
    if let Ok(value) = text.parse::<u32>() {
        return Some(value);
    }
    let value: f64 = text.parse().ok()?;
    (value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= f64::from(u32::MAX))
        .then_some(value as u32)
}

/// How many fact rows resolved each foreign key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ForeignKeyCoverage {
    pub total_rows: usize,
    pub athlete: usize,
    pub team: usize,
    pub race: usize,
    pub category: usize,
    pub location: usize,
    pub date: usize,
}

impl ForeignKeyCoverage {
    pub fn from_facts(facts: &[FactRow]) -> Self {
        let matched = |key: fn(&FactRow) -> bool| facts.iter().filter(|f| key(f)).count();
        Self {
            total_rows: facts.len(),
            athlete: matched(|f| f.athlete_key.is_some()),
            team: matched(|f| f.team_key.is_some()),
            race: matched(|f| f.race_key.is_some()),
            category: matched(|f| f.category_key.is_some()),
            location: matched(|f| f.location_key.is_some()),
            date: matched(|f| f.date_key.is_some()),
        }
    }

    /// (foreign key column, matched rows) pairs
    pub fn entries(&self) -> [(&'static str, usize); 6] {
        [
            ("athlete_key", self.athlete),
            ("team_key", self.team),
            ("race_key", self.race),
            ("category_key", self.category),
            ("location_key", self.location),
            ("date_key", self.date),
        ]
    }

    pub fn rate(&self, matched: usize) -> f64 {
        percentage(matched, self.total_rows)
    }
}
