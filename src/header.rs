//! Source header mapping.
//!
//! Resolves the header row of a results export to the fields of
//! [`RawRecord`](crate::models::RawRecord). Exports use the Turkish column
//! names (`Sporcu`, `Derece`, ...); English aliases are accepted as well.
//! Matching is case-insensitive and ignores surrounding whitespace.

use crate::constants::columns;
use crate::error::{PipelineError, Result};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// A field of the raw record a source column can feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceField {
    Athlete,
    Team,
    RaceName,
    RaceNameSecondary,
    Category,
    Location,
    Date,
    Lane,
    SeriesNumber,
    Rank,
    Result,
    WarningPoints,
    SeriesTime,
}

impl SourceField {
    pub const ALL: [SourceField; 13] = [
        SourceField::Athlete,
        SourceField::Team,
        SourceField::RaceName,
        SourceField::RaceNameSecondary,
        SourceField::Category,
        SourceField::Location,
        SourceField::Date,
        SourceField::Lane,
        SourceField::SeriesNumber,
        SourceField::Rank,
        SourceField::Result,
        SourceField::WarningPoints,
        SourceField::SeriesTime,
    ];

    /// Column name used by the results export
    pub fn canonical_name(&self) -> &'static str {
        match self {
            SourceField::Athlete => columns::ATHLETE,
            SourceField::Team => columns::TEAM,
            SourceField::RaceName => columns::RACE_NAME,
            SourceField::RaceNameSecondary => columns::RACE_NAME_SECONDARY,
            SourceField::Category => columns::CATEGORY,
            SourceField::Location => columns::LOCATION,
            SourceField::Date => columns::DATE,
            SourceField::Lane => columns::LANE,
            SourceField::SeriesNumber => columns::SERIES_NUMBER,
            SourceField::Rank => columns::RANK,
            SourceField::Result => columns::RESULT,
            SourceField::WarningPoints => columns::WARNING_POINTS,
            SourceField::SeriesTime => columns::SERIES_TIME,
        }
    }

    fn aliases(&self) -> &'static [&'static str] {
        match self {
            SourceField::Athlete => &["athlete", "athlete_name"],
            SourceField::Team => &["takım", "team", "team_name"],
            SourceField::RaceName => &["race", "race_name"],
            SourceField::RaceNameSecondary => &["race_name_2", "race_name_secondary"],
            SourceField::Category => &["category", "category_name"],
            SourceField::Location => &["location", "venue"],
            SourceField::Date => &["date", "race_date"],
            SourceField::Lane => &["lane", "lane_number"],
            SourceField::SeriesNumber => &["series", "series_number"],
            SourceField::Rank => &["sonuç", "rank", "position"],
            SourceField::Result => &["result", "time"],
            SourceField::WarningPoints => &["warning_points", "warnings"],
            SourceField::SeriesTime => &["series_time"],
        }
    }

    pub fn is_required(&self) -> bool {
        columns::REQUIRED.contains(&self.canonical_name())
    }

    fn matches(&self, header: &str) -> bool {
        let header = header.trim().to_lowercase();
        std::iter::once(self.canonical_name())
            .chain(self.aliases().iter().copied())
            .any(|name| name.to_lowercase() == header)
    }
}

/// Which source column feeds each raw record field
#[derive(Debug, Clone, Default)]
pub struct ColumnMapping {
    columns: HashMap<SourceField, String>,
    unmapped: Vec<String>,
}

impl ColumnMapping {
    /// Map header names to fields, failing when a required column is absent
    pub fn analyze<S: AsRef<str>>(headers: &[S], path: &Path) -> Result<Self> {
        let mut columns = HashMap::new();
        let mut unmapped = Vec::new();

        for header in headers {
            let header = header.as_ref();
            match SourceField::ALL.iter().find(|field| field.matches(header)) {
                Some(field) if columns.contains_key(field) => {
                    warn!(
                        "Column '{}' duplicates {}; keeping the first occurrence",
                        header,
                        field.canonical_name()
                    );
                }
                Some(field) => {
                    columns.insert(*field, header.to_string());
                }
                None => unmapped.push(header.to_string()),
            }
        }

        let missing: Vec<String> = SourceField::ALL
            .iter()
            .filter(|field| field.is_required() && !columns.contains_key(*field))
            .map(|field| field.canonical_name().to_string())
            .collect();
        if !missing.is_empty() {
            return Err(PipelineError::MissingColumns {
                path: path.to_path_buf(),
                missing,
            });
        }

        let mapping = Self { columns, unmapped };
        let (mapped, ignored) = mapping.stats();
        debug!(
            "Mapped {} source columns for {} ({} ignored)",
            mapped,
            path.display(),
            ignored
        );
        Ok(mapping)
    }

    /// Source column name for a field
    pub fn column(&self, field: SourceField) -> Option<&str> {
        self.columns.get(&field).map(String::as_str)
    }

    pub fn has_field(&self, field: SourceField) -> bool {
        self.columns.contains_key(&field)
    }

    /// Source columns that feed no field
    pub fn unmapped_columns(&self) -> &[String] {
        &self.unmapped
    }

    /// (mapped, unmapped) column counts
    pub fn stats(&self) -> (usize, usize) {
        (self.columns.len(), self.unmapped.len())
    }
}
