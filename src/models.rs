//! Core data structures for rowing results processing.
//!
//! Defines the raw spreadsheet record, the typed outcomes produced by the
//! classifier, and the run-level processing statistics.

use crate::constants::ABSENT_MARKERS;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// One competition result exactly as it arrived from the spreadsheet.
///
/// Every field is free text and may be absent. Empty cells and explicit
/// absent markers (`nan`, `null`, ...) are both stored as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub athlete: Option<String>,
    pub team: Option<String>,
    pub race_name: Option<String>,
    pub race_name_secondary: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub date: Option<String>,
    pub lane: Option<String>,
    pub series_number: Option<String>,
    /// Finishing position column
    pub rank: Option<String>,
    /// Race time or status code column
    pub result: Option<String>,
    pub warning_points: Option<String>,
    pub series_time: Option<String>,
}

impl RawRecord {
    /// Normalize a source cell: trim, and map empty cells and absent markers to `None`
    pub fn cell(value: Option<&str>) -> Option<String> {
        let trimmed = value?.trim();
        if trimmed.is_empty() || is_absent_marker(trimmed) {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

fn is_absent_marker(value: &str) -> bool {
    ABSENT_MARKERS
        .iter()
        .any(|marker| value.eq_ignore_ascii_case(marker))
}

/// Textual encoding a duration was recognised in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DurationFormat {
    /// `M.SS.CC`, e.g. `1.41.97`
    MinutesSecondsCentis,
    /// `SS.CC`, e.g. `41.97`
    SecondsCentis,
    /// Plain decimal seconds, e.g. `101.97`
    DecimalSeconds,
}

/// Result of parsing a free-text race time.
///
/// `seconds` is only present for a valid parse, in which case it lies
/// within the plausible race-duration bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedDuration {
    seconds: Option<f64>,
    format: Option<DurationFormat>,
}

impl ParsedDuration {
    pub(crate) fn valid(seconds: f64, format: DurationFormat) -> Self {
        Self {
            seconds: Some(seconds),
            format: Some(format),
        }
    }

    pub fn invalid() -> Self {
        Self {
            seconds: None,
            format: None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.seconds.is_some()
    }

    pub fn seconds(&self) -> Option<f64> {
        self.seconds
    }

    pub fn format(&self) -> Option<DurationFormat> {
        self.format
    }
}

/// Competition status codes that override a numeric result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IncidentStatus {
    /// Did not finish
    Dnf,
    /// Did not start
    Dns,
    /// Disqualified
    Dsq,
}

impl IncidentStatus {
    pub fn note(&self) -> &'static str {
        match self {
            IncidentStatus::Dnf => "Did Not Finish",
            IncidentStatus::Dns => "Did Not Start",
            IncidentStatus::Dsq => "Disqualified",
        }
    }
}

/// Mutually exclusive outcome of classifying one field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutcomeKind {
    Valid,
    Dnf,
    Dns,
    Dsq,
    Unparseable,
}

impl From<IncidentStatus> for OutcomeKind {
    fn from(status: IncidentStatus) -> Self {
        match status {
            IncidentStatus::Dnf => OutcomeKind::Dnf,
            IncidentStatus::Dns => OutcomeKind::Dns,
            IncidentStatus::Dsq => OutcomeKind::Dsq,
        }
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OutcomeKind::Valid => "VALID",
            OutcomeKind::Dnf => "DNF",
            OutcomeKind::Dns => "DNS",
            OutcomeKind::Dsq => "DSQ",
            OutcomeKind::Unparseable => "UNPARSEABLE",
        };
        f.write_str(label)
    }
}

/// A raw record together with its typed rank and time outcomes.
///
/// `rank` is present iff `rank_outcome` is `Valid`, and `time` is present iff
/// `time_outcome` is `Valid`. Construct through the record classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedRecord {
    pub raw: RawRecord,
    pub rank: Option<u32>,
    pub rank_outcome: OutcomeKind,
    /// Race time in seconds
    pub time: Option<f64>,
    pub time_outcome: OutcomeKind,
    /// Format the race time was recognised in
    pub time_format: Option<DurationFormat>,
    /// Why a field did not classify as valid
    pub notes: Option<String>,
}

impl ClassifiedRecord {
    pub fn has_valid_rank(&self) -> bool {
        self.rank_outcome == OutcomeKind::Valid
    }

    pub fn has_valid_time(&self) -> bool {
        self.time_outcome == OutcomeKind::Valid
    }

    pub fn is_dnf(&self) -> bool {
        self.time_outcome == OutcomeKind::Dnf
    }

    pub fn is_dns(&self) -> bool {
        self.time_outcome == OutcomeKind::Dns
    }

    pub fn is_dsq(&self) -> bool {
        self.time_outcome == OutcomeKind::Dsq
    }
}

/// Processing statistics for a complete run
#[derive(Debug, Default, Clone)]
pub struct ProcessingStats {
    pub rows_read: usize,
    pub rows_after_cleaning: usize,
    pub records_classified: usize,
    /// (table name, row count) for every table written
    pub tables_written: Vec<(String, usize)>,
    pub output_path: PathBuf,
    pub processing_time_ms: u128,
}
