//! Classification statistics
//!
//! Tallies outcomes over a classified record set for logging and reporting.

use crate::models::{ClassifiedRecord, DurationFormat, OutcomeKind};

/// Outcome counts over a set of classified records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassificationStats {
    pub total: usize,
    pub valid_ranks: usize,
    pub unparseable_ranks: usize,
    pub valid_times: usize,
    pub unparseable_times: usize,
    pub dnf: usize,
    pub dns: usize,
    pub dsq: usize,
    /// Records with both a valid rank and a valid time
    pub both_valid: usize,
    pub minutes_seconds_centis: usize,
    pub seconds_centis: usize,
    pub decimal_seconds: usize,
}

impl ClassificationStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tally a full record set
    pub fn from_records(records: &[ClassifiedRecord]) -> Self {
        let mut stats = Self::new();
        for record in records {
            stats.record(record);
        }
        stats
    }

    /// Add one record to the tallies
    pub fn record(&mut self, record: &ClassifiedRecord) {
        self.total += 1;

        match record.rank_outcome {
            OutcomeKind::Valid => self.valid_ranks += 1,
            _ => self.unparseable_ranks += 1,
        }

        match record.time_outcome {
            OutcomeKind::Valid => self.valid_times += 1,
            OutcomeKind::Dnf => self.dnf += 1,
            OutcomeKind::Dns => self.dns += 1,
            OutcomeKind::Dsq => self.dsq += 1,
            OutcomeKind::Unparseable => self.unparseable_times += 1,
        }

        if record.has_valid_rank() && record.has_valid_time() {
            self.both_valid += 1;
        }

        match record.time_format {
            Some(DurationFormat::MinutesSecondsCentis) => self.minutes_seconds_centis += 1,
            Some(DurationFormat::SecondsCentis) => self.seconds_centis += 1,
            Some(DurationFormat::DecimalSeconds) => self.decimal_seconds += 1,
            None => {}
        }
    }

    /// Total DNF + DNS + DSQ incidents
    pub fn incidents(&self) -> usize {
        self.dnf + self.dns + self.dsq
    }

    pub fn valid_rank_rate(&self) -> f64 {
        percentage(self.valid_ranks, self.total)
    }

    pub fn valid_time_rate(&self) -> f64 {
        percentage(self.valid_times, self.total)
    }

    pub fn incident_rate(&self) -> f64 {
        percentage(self.incidents(), self.total)
    }

    /// One-line summary for logging
    pub fn summary(&self) -> String {
        format!(
            "Classified {} records | Valid ranks: {} ({:.1}%) | Valid times: {} ({:.1}%) | \
             DNF: {} | DNS: {} | DSQ: {} | Unparseable times: {}",
            self.total,
            self.valid_ranks,
            self.valid_rank_rate(),
            self.valid_times,
            self.valid_time_rate(),
            self.dnf,
            self.dns,
            self.dsq,
            self.unparseable_times
        )
    }
}

/// `part` as a percentage of `whole`; 0 for an empty whole
pub(crate) fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}
