//! Source row cleaning
//!
//! Spreadsheet exports carry artefacts of how they were assembled: header
//! rows repeated wherever sheets were concatenated, placeholder rows without
//! an athlete, and series times stored as a fraction of a day. Rows are
//! dropped or repaired here, before classification.

use crate::config::CleaningConfig;
use crate::constants::columns;
use crate::models::RawRecord;
use tracing::{debug, warn};

/// Counts of rows dropped and repaired, by reason
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleaningStats {
    pub rows_in: usize,
    pub rows_out: usize,
    pub repeated_headers: usize,
    pub missing_athlete: usize,
    pub missing_team: usize,
    pub short_athlete_name: usize,
    pub short_team_name: usize,
    pub series_times_normalized: usize,
}

impl CleaningStats {
    pub fn dropped(&self) -> usize {
        self.repeated_headers
            + self.missing_athlete
            + self.missing_team
            + self.short_athlete_name
            + self.short_team_name
    }

    pub fn summary(&self) -> String {
        format!(
            "Kept {} of {} rows | Repeated headers: {} | Missing athlete: {} | Missing team: {} | \
             Short names: {} | Series times repaired: {}",
            self.rows_out,
            self.rows_in,
            self.repeated_headers,
            self.missing_athlete,
            self.missing_team,
            self.short_athlete_name + self.short_team_name,
            self.series_times_normalized
        )
    }
}

/// Why a row is dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DropReason {
    RepeatedHeader,
    MissingAthlete,
    MissingTeam,
    ShortAthleteName,
    ShortTeamName,
}

/// Applies the configured cleaning rules to raw records
#[derive(Debug, Clone, Default)]
pub struct RecordCleaner {
    config: CleaningConfig,
}

impl RecordCleaner {
    pub fn new(config: CleaningConfig) -> Self {
        Self { config }
    }

    /// Drop unusable rows and repair the survivors, preserving order
    pub fn clean(&self, records: Vec<RawRecord>) -> (Vec<RawRecord>, CleaningStats) {
        let mut stats = CleaningStats {
            rows_in: records.len(),
            ..CleaningStats::default()
        };

        let mut kept = Vec::with_capacity(records.len());
        for mut record in records {
            if let Some(reason) = self.drop_reason(&record) {
                match reason {
                    DropReason::RepeatedHeader => stats.repeated_headers += 1,
                    DropReason::MissingAthlete => stats.missing_athlete += 1,
                    DropReason::MissingTeam => stats.missing_team += 1,
                    DropReason::ShortAthleteName => stats.short_athlete_name += 1,
                    DropReason::ShortTeamName => stats.short_team_name += 1,
                }
                continue;
            }

            if self.config.normalize_series_time {
                if let Some(time) = record.series_time.as_deref().and_then(normalize_series_time) {
                    record.series_time = Some(time);
                    stats.series_times_normalized += 1;
                }
            }
            kept.push(record);
        }

        stats.rows_out = kept.len();
        if stats.dropped() > 0 {
            warn!("Dropped {} unusable source rows", stats.dropped());
        }
        debug!("{}", stats.summary());

        (kept, stats)
    }

    fn drop_reason(&self, record: &RawRecord) -> Option<DropReason> {
        if self.config.drop_repeated_headers && is_repeated_header(record) {
            return Some(DropReason::RepeatedHeader);
        }

        let Some(athlete) = record.athlete.as_deref() else {
            return Some(DropReason::MissingAthlete);
        };
        let Some(team) = record.team.as_deref() else {
            return Some(DropReason::MissingTeam);
        };

        if athlete.trim().chars().count() < self.config.min_athlete_name_chars {
            Some(DropReason::ShortAthleteName)
        } else if team.trim().chars().count() < self.config.min_team_name_chars {
            Some(DropReason::ShortTeamName)
        } else {
            None
        }
    }
}

/// A header row repeated inside the data
pub fn is_repeated_header(record: &RawRecord) -> bool {
    let is = |cell: &Option<String>, name: &str| cell.as_deref() == Some(name);
    let mentions = |cell: &Option<String>, name: &str| {
        cell.as_deref().is_some_and(|value| value.contains(name))
    };

    is(&record.athlete, columns::ATHLETE)
        || is(&record.team, columns::TEAM)
        || is(&record.date, columns::DATE)
        || is(&record.race_name, columns::RACE_NAME)
        || mentions(&record.athlete, columns::ATHLETE)
        || mentions(&record.team, columns::TEAM)
}

/// Convert a fraction-of-day series time (`0.375`) to `HH:MM`, rounded to the
/// nearest minute. `None` when the text is not such a fraction.
pub fn normalize_series_time(text: &str) -> Option<String> {
    let fraction: f64 = text.trim().replace(',', ".").parse().ok()?;
    if !(0.0..1.0).contains(&fraction) {
        return None;
    }

    let minutes = (fraction * 24.0 * 60.0).round() as u32 % (24 * 60);
    Some(format!("{:02}:{:02}", minutes / 60, minutes % 60))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(athlete: Option<&str>, team: Option<&str>) -> RawRecord {
        RawRecord {
            athlete: athlete.map(str::to_string),
            team: team.map(str::to_string),
            rank: Some("1".to_string()),
            result: Some("7.00.00".to_string()),
            ..RawRecord::default()
        }
    }

    #[test]
    fn test_series_time_fractions() {
        assert_eq!(normalize_series_time("0.375").as_deref(), Some("09:00"));
        assert_eq!(normalize_series_time("0.5").as_deref(), Some("12:00"));
        assert_eq!(normalize_series_time("0,4375").as_deref(), Some("10:30"));
        assert_eq!(normalize_series_time("0").as_deref(), Some("00:00"));
        // 0.40347 of a day is 9:40:59.8
        assert_eq!(normalize_series_time("0.40347").as_deref(), Some("09:41"));
        assert_eq!(normalize_series_time("0.99999").as_deref(), Some("00:00"));
    }

    #[test]
    fn test_series_time_other_text_untouched() {
        for text in ["09:30", "1.5", "-0.2", "sabah", "", "NaN"] {
            assert_eq!(normalize_series_time(text), None, "{text:?}");
        }
    }

    #[test]
    fn test_repeated_header_detection() {
        assert!(is_repeated_header(&row(Some("Sporcu"), Some("Takim"))));
        assert!(is_repeated_header(&row(Some("Sporcu Adı"), Some("X Kulübü"))));
        assert!(is_repeated_header(&row(Some("Ali Veli"), Some("Takim"))));

        let mut dated = row(Some("Ali Veli"), Some("A Kulübü"));
        dated.date = Some("Tarih".to_string());
        assert!(is_repeated_header(&dated));

        assert!(!is_repeated_header(&row(Some("Ali Veli"), Some("A Kulübü"))));
    }

    #[test]
    fn test_clean_drops_and_counts() {
        let mut timed = row(Some("Ayşe Kaya"), Some("B Kulübü"));
        timed.series_time = Some("0.375".to_string());

        let records = vec![
            row(Some("Ali Veli"), Some("A Kulübü")),
            row(Some("Sporcu"), Some("Takim")),
            row(None, Some("A Kulübü")),
            row(Some("Ali Veli"), None),
            row(Some("Al"), Some("A Kulübü")),
            row(Some("Ali Veli"), Some("A")),
            timed,
        ];

        let (kept, stats) = RecordCleaner::default().clean(records);

        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].athlete.as_deref(), Some("Ali Veli"));
        assert_eq!(kept[1].series_time.as_deref(), Some("09:00"));
        assert_eq!(
            stats,
            CleaningStats {
                rows_in: 7,
                rows_out: 2,
                repeated_headers: 1,
                missing_athlete: 1,
                missing_team: 1,
                short_athlete_name: 1,
                short_team_name: 1,
                series_times_normalized: 1,
            }
        );
        assert_eq!(stats.dropped(), 5);
    }

    #[test]
    fn test_cleaning_rules_are_configurable() {
        let config = CleaningConfig {
            drop_repeated_headers: false,
            min_athlete_name_chars: 1,
            normalize_series_time: false,
            ..CleaningConfig::default()
        };
        let mut timed = row(Some("Al"), Some("A Kulübü"));
        timed.series_time = Some("0.375".to_string());

        let (kept, stats) = RecordCleaner::new(config).clean(vec![
            row(Some("Sporcu"), Some("Takim")),
            timed,
        ]);

        assert_eq!(kept.len(), 2);
        assert_eq!(kept[1].series_time.as_deref(), Some("0.375"));
        assert_eq!(stats.dropped(), 0);
    }

    #[test]
    fn test_name_length_counts_characters() {
        // Two characters, four bytes
        let (kept, stats) = RecordCleaner::default().clean(vec![
            row(Some("Üş"), Some("A Kulübü")),
            row(Some("Işıl"), Some("Üş")),
        ]);
        assert_eq!(kept.len(), 1);
        assert_eq!(stats.short_athlete_name, 1);
    }
}
