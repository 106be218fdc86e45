//! Star schema assembly
//!
//! Reshapes classified records into one fact table and six dimension tables.
//! Surrogate keys are 1-based in first-seen order (dates are keyed
//! `YYYYMMDD`), and every fact-to-dimension join goes through
//! [`EntityKey`](crate::aggregate::EntityKey). A record whose entity has no
//! dimension row keeps a null foreign key and is counted in
//! [`ForeignKeyCoverage`].
//!
//! ## Architecture
//!
//! - [`dimensions`] - Athlete, team, race, category and location rows
//! - [`calendar`] - Event date parsing and the date dimension
//! - [`fact`] - Fact rows and foreign key coverage
//!
//! ## Usage
//!
//! ```rust
//! use rowing_star::classify::RecordClassifier;
//! use rowing_star::models::RawRecord;
//! use rowing_star::schema::StarSchema;
//!
//! let raw = RawRecord {
//!     athlete: Some("Ayşe Yılmaz".to_string()),
//!     team: Some("Galatasaray".to_string()),
//!     date: Some("15 Mayıs 2023".to_string()),
//!     rank: Some("2".to_string()),
//!     result: Some("7.12.40".to_string()),
//!     ..RawRecord::default()
//! };
//! let records = RecordClassifier::default().classify_all(&[raw]);
//!
//! let schema = StarSchema::assemble(&records);
//! assert_eq!(schema.facts[0].athlete_key, Some(1));
//! assert_eq!(schema.facts[0].date_key, Some(20230515));
//! ```

pub mod calendar;
pub mod dimensions;
pub mod fact;

#[cfg(test)]
mod tests;

pub use calendar::{DateRow, Season, parse_event_date};
pub use dimensions::{
    AthleteRow, CategoryProfile, CategoryRow, LocationRow, RaceKey, RaceRow, Region, TeamRow,
    TeamType,
};
pub use fact::{FactRow, ForeignKeyCoverage, ForeignKeys};

use crate::aggregate::{
    Aggregation, EntityKey, athlete_key, summarize_athletes, summarize_teams, team_key,
};
use crate::constants::tables;
use crate::models::ClassifiedRecord;
use dimensions::{category_key, location_key};
use std::collections::HashMap;
use std::hash::Hash;
use tracing::{debug, warn};

/// All seven tables of the warehouse load
#[derive(Debug, Clone, PartialEq)]
pub struct StarSchema {
    pub athletes: Vec<AthleteRow>,
    pub teams: Vec<TeamRow>,
    pub races: Vec<RaceRow>,
    pub categories: Vec<CategoryRow>,
    pub locations: Vec<LocationRow>,
    pub dates: Vec<DateRow>,
    pub facts: Vec<FactRow>,
    pub coverage: ForeignKeyCoverage,
    /// Records without an athlete name, excluded from the athlete dimension
    pub records_without_athlete: usize,
    /// Records without a team name, excluded from the team dimension
    pub records_without_team: usize,
}

/// Surrogate key lookup for one dimension
struct KeyIndex<K>(HashMap<K, u32>);

impl<K: Hash + Eq> KeyIndex<K> {
    fn new<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (&'a K, u32)>,
        K: Clone + 'a,
    {
        Self(rows.into_iter().map(|(k, v)| (k.clone(), v)).collect())
    }

    fn lookup(&self, key: Option<K>) -> Option<u32> {
        key.and_then(|key| self.0.get(&key).copied())
    }
}

impl StarSchema {
    /// Build every table from records in input order
    pub fn assemble(records: &[ClassifiedRecord]) -> Self {
        let athlete_summaries: Aggregation = summarize_athletes(records);
        let team_summaries: Aggregation = summarize_teams(records);

        let athletes = dimensions::athlete_rows(&athlete_summaries);
        let teams = dimensions::team_rows(&team_summaries, records);
        let races = dimensions::race_rows(records);
        let categories = dimensions::category_rows(records);
        let locations = dimensions::location_rows(records);

        let parsed_dates: Vec<_> = records
            .iter()
            .map(|record| record.raw.date.as_deref().and_then(parse_event_date))
            .collect();
        let dates = calendar::build_date_dimension(parsed_dates.iter().flatten().copied());

        let athlete_index = KeyIndex::new(athletes.iter().map(|r| (&r.summary.key, r.athlete_key)));
        let team_index = KeyIndex::new(teams.iter().map(|r| (&r.summary.key, r.team_key)));
        let race_index = KeyIndex::new(races.iter().map(|r| (&r.key, r.race_key)));
        let category_index = KeyIndex::new(categories.iter().map(|r| (&r.key, r.category_key)));
        let location_index = KeyIndex::new(locations.iter().map(|r| (&r.key, r.location_key)));

        let facts: Vec<FactRow> = records
            .iter()
            .zip(&parsed_dates)
            .enumerate()
            .map(|(position, (record, date))| {
                let keys = ForeignKeys {
                    athlete: athlete_index.lookup(athlete_key(record)),
                    team: team_index.lookup(team_key(record)),
                    race: race_index.lookup(RaceKey::of(record)),
                    category: category_index.lookup(category_key(record)),
                    location: location_index.lookup(location_key(record)),
                    date: date.map(calendar::date_key),
                };
                let result_id = u32::try_from(position + 1).unwrap_or(u32::MAX);
                FactRow::new(result_id, record, keys)
            })
            .collect();

        let coverage = ForeignKeyCoverage::from_facts(&facts);
        for (column, matched) in coverage.entries() {
            if matched < coverage.total_rows {
                warn!(
                    "{}: {} of {} fact rows have no {} ({:.1}% coverage)",
                    tables::FACT_RACE_RESULTS,
                    coverage.total_rows - matched,
                    coverage.total_rows,
                    column,
                    coverage.rate(matched)
                );
            }
        }

        let schema = Self {
            athletes,
            teams,
            races,
            categories,
            locations,
            dates,
            facts,
            coverage,
            records_without_athlete: athlete_summaries.records_without_key,
            records_without_team: team_summaries.records_without_key,
        };
        debug!("Assembled star schema: {:?}", schema.table_sizes());
        schema
    }

    /// (table name, row count) for every table, dimensions first
    pub fn table_sizes(&self) -> Vec<(&'static str, usize)> {
        vec![
            (tables::DIM_ATHLETE, self.athletes.len()),
            (tables::DIM_TEAM, self.teams.len()),
            (tables::DIM_RACE, self.races.len()),
            (tables::DIM_CATEGORY, self.categories.len()),
            (tables::DIM_LOCATION, self.locations.len()),
            (tables::DIM_DATE, self.dates.len()),
            (tables::FACT_RACE_RESULTS, self.facts.len()),
        ]
    }

    /// Athlete row for a name, after key normalization
    pub fn athlete(&self, name: &str) -> Option<&AthleteRow> {
        let key = EntityKey::new(name)?;
        self.athletes.iter().find(|row| row.summary.key == key)
    }
}
