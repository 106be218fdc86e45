//! Application constants for the rowing results pipeline
//!
//! Source column names, plausibility bounds for ranks and race durations,
//! default status keywords and output table names.

// =============================================================================
// Source Columns
// =============================================================================

/// Column names used by the federation's spreadsheet export
pub mod columns {
    pub const ATHLETE: &str = "Sporcu";
    pub const TEAM: &str = "Takim";
    pub const RACE_NAME: &str = "Yaris_Adi";
    pub const RACE_NAME_SECONDARY: &str = "Yaris_Adi2";
    pub const CATEGORY: &str = "Seri_Adi";
    pub const LOCATION: &str = "Yaris_Yeri";
    pub const DATE: &str = "Tarih";
    pub const LANE: &str = "Parkur_No";
    pub const SERIES_NUMBER: &str = "Seri_No";
    /// Finishing position
    pub const RANK: &str = "Sonuc";
    /// Race time or status code
    pub const RESULT: &str = "Derece";
    pub const WARNING_POINTS: &str = "ihtar";
    pub const SERIES_TIME: &str = "Seri_Saat";

    /// Columns without which no fact row can be built
    pub const REQUIRED: &[&str] = &[ATHLETE, TEAM, RANK, RESULT];
}

/// Cell values that mean "no value" in spreadsheet and dataframe exports
pub const ABSENT_MARKERS: &[&str] = &["nan", "none", "null", "n/a"];

// =============================================================================
// Plausibility Bounds
// =============================================================================

/// Race duration bounds in seconds
pub mod duration_bounds {
    /// Shortest plausible race
    pub const MIN_SECONDS: f64 = 30.0;

    /// Longest plausible race
    pub const MAX_SECONDS: f64 = 1800.0;

    /// Ceiling for bare `SS.CC` values, which only occur in sprint events
    pub const SPRINT_MAX_SECONDS: f64 = 300.0;
}

/// Finishing positions outside this range are treated as garbage
pub mod rank_bounds {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 100;

    /// Positions counted as a podium finish
    pub const PODIUM_MAX: u32 = 3;
}

// =============================================================================
// Status Keywords
// =============================================================================

/// Default substrings identifying a status code in the result column.
/// Matched against the upper-cased value.
pub mod status_keywords {
    pub const DNF: &[&str] = &["DNF", "BİTİREMEDİ", "BITIREMEDI"];
    pub const DNS: &[&str] = &["DNS", "KATILMADI", "BAŞLAMADI"];
    pub const DSQ: &[&str] = &["DSQ", "DİSKALİFİYE", "DISKALIFIYE", "YARISHARICI"];
}

// =============================================================================
// Cleaning Defaults
// =============================================================================

/// Athlete names with fewer characters are spreadsheet noise
pub const DEFAULT_MIN_ATHLETE_NAME_CHARS: usize = 3;

/// Team names with fewer characters are spreadsheet noise
pub const DEFAULT_MIN_TEAM_NAME_CHARS: usize = 2;

// =============================================================================
// Output Tables
// =============================================================================

pub mod tables {
    pub const DIM_ATHLETE: &str = "dim_athlete";
    pub const DIM_TEAM: &str = "dim_team";
    pub const DIM_RACE: &str = "dim_race";
    pub const DIM_CATEGORY: &str = "dim_category";
    pub const DIM_LOCATION: &str = "dim_location";
    pub const DIM_DATE: &str = "dim_date";
    pub const FACT_RACE_RESULTS: &str = "fact_race_results";

    /// Write order; dimensions first so a reader never sees dangling keys
    pub const ALL: &[&str] = &[
        DIM_ATHLETE,
        DIM_TEAM,
        DIM_RACE,
        DIM_CATEGORY,
        DIM_LOCATION,
        DIM_DATE,
        FACT_RACE_RESULTS,
    ];
}

/// Suffix for table files that have not been committed yet
pub const PARTIAL_SUFFIX: &str = "partial";

/// Suffix for a previous run's table while the new tables are committed
pub const BACKUP_SUFFIX: &str = "backup";

/// Config file looked up under the user's config directory
pub const CONFIG_DIR_NAME: &str = "rowing-star";
pub const CONFIG_FILE_NAME: &str = "config.toml";
