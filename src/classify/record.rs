//! Per-record classification of the rank and result columns
//!
//! Combines the status classifier, the duration parser and the rank parser
//! into one typed outcome per field. Classification is a pure function of the
//! raw record and is total over arbitrary text.

use super::duration::parse_duration;
use super::status::StatusClassifier;
use crate::config::ClassificationConfig;
use crate::constants::rank_bounds;
use crate::models::{ClassifiedRecord, DurationFormat, OutcomeKind, RawRecord};

/// Outcome of one field together with the reason it is not valid
struct FieldOutcome<T> {
    value: Option<T>,
    outcome: OutcomeKind,
    note: Option<String>,
}

impl<T> FieldOutcome<T> {
    fn valid(value: T) -> Self {
        Self {
            value: Some(value),
            outcome: OutcomeKind::Valid,
            note: None,
        }
    }

    fn rejected(outcome: OutcomeKind, note: impl Into<String>) -> Self {
        Self {
            value: None,
            outcome,
            note: Some(note.into()),
        }
    }
}

/// Classifier turning [`RawRecord`]s into [`ClassifiedRecord`]s
#[derive(Debug, Clone, Default)]
pub struct RecordClassifier {
    status: StatusClassifier,
}

impl RecordClassifier {
    pub fn new(config: &ClassificationConfig) -> Self {
        Self {
            status: StatusClassifier::new(&config.status_keywords),
        }
    }

    /// Classify one record. The input is left untouched.
    pub fn classify(&self, raw: &RawRecord) -> ClassifiedRecord {
        let (time, time_format) = self.classify_time(raw.result.as_deref());
        let rank = classify_rank(raw.rank.as_deref());

        let notes = match (rank.note, time.note) {
            (None, None) => None,
            (Some(rank_note), None) => Some(rank_note),
            (None, Some(time_note)) => Some(time_note),
            (Some(rank_note), Some(time_note)) => Some(format!("{}; {}", rank_note, time_note)),
        };

        ClassifiedRecord {
            raw: raw.clone(),
            rank: rank.value,
            rank_outcome: rank.outcome,
            time: time.value,
            time_outcome: time.outcome,
            time_format,
            notes,
        }
    }

    /// Classify records in input order
    pub fn classify_all(&self, records: &[RawRecord]) -> Vec<ClassifiedRecord> {
        records.iter().map(|raw| self.classify(raw)).collect()
    }

    /// Status check first, duration parsing only when no status matched
    fn classify_time(&self, value: Option<&str>) -> (FieldOutcome<f64>, Option<DurationFormat>) {
        let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            return (
                FieldOutcome::rejected(OutcomeKind::Unparseable, "No time data"),
                None,
            );
        };

        if let Some(status) = self.status.classify(value) {
            return (FieldOutcome::rejected(status.into(), status.note()), None);
        }

        let parsed = parse_duration(value);
        match parsed.seconds() {
            Some(seconds) => (FieldOutcome::valid(seconds), parsed.format()),
            None => (
                FieldOutcome::rejected(
                    OutcomeKind::Unparseable,
                    format!("Unparseable time: {}", value),
                ),
                None,
            ),
        }
    }
}

/// Parse a finishing position, accepting only plausible field positions.
///
/// Integer text is accepted directly; decimal text is accepted when its
/// fractional part is zero (`"3.0"`, as written by dataframe exports).
pub fn parse_rank(value: &str) -> Option<u32> {
    let trimmed = value.trim();
    let position = match trimmed.parse::<i64>() {
        Ok(position) => position,
        Err(_) => {
            let decimal: f64 = trimmed.parse().ok()?;
            if !decimal.is_finite() || decimal.fract() != 0.0 {
                return None;
            }
            decimal as i64
        }
    };

    u32::try_from(position)
        .ok()
        .filter(|p| (rank_bounds::MIN..=rank_bounds::MAX).contains(p))
}

fn classify_rank(value: Option<&str>) -> FieldOutcome<u32> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return FieldOutcome::rejected(OutcomeKind::Unparseable, "No rank data");
    };

    if let Some(position) = parse_rank(value) {
        return FieldOutcome::valid(position);
    }

    // Numeric but implausible positions are reported separately from garbage
    let is_numeric = value.parse::<f64>().is_ok_and(f64::is_finite);
    let note = if is_numeric {
        format!("Invalid rank: {}", value)
    } else {
        format!("Unparseable rank: {}", value)
    };
    FieldOutcome::rejected(OutcomeKind::Unparseable, note)
}
