//! Tests for star schema assembly


use crate::classify::RecordClassifier;
use crate::models::{ClassifiedRecord, RawRecord};

/// A fully populated source row
pub fn result_row(athlete: &str, team: &str, race: &str, category: &str, rank: &str, result: &str) -> RawRecord {
    RawRecord {
        athlete: Some(athlete.to_string()),
        team: Some(team.to_string()),
        race_name: Some(race.to_string()),
        category: Some(category.to_string()),
        location: Some("Haliç Kürek Pisti".to_string()),
        date: Some("15 Mayıs 2023".to_string()),
        lane: Some("3".to_string()),
        series_number: Some("1".to_string()),
        rank: Some(rank.to_string()),
        result: Some(result.to_string()),
        warning_points: Some("0".to_string()),
        series_time: Some("09:30".to_string()),
        ..RawRecord::default()
    }
}

pub fn classify(raw: &[RawRecord]) -> Vec<ClassifiedRecord> {
    RecordClassifier::default().classify_all(raw)
}
