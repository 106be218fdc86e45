//! Per-entity aggregation over classified records
//!
//! Groups classified records by a canonical [`EntityKey`] and folds each group
//! into an [`EntitySummary`]. Output order is the order in which keys are
//! first seen, so identical input always yields identical summaries.
//!
//! ## Architecture
//!
//! - [`key`] - Canonical entity key normalization
//! - [`summary`] - Summary shape and the per-key accumulator
//! - [`Aggregator`] - Single-pass grouping, mergeable across partitions
//!
//! ## Usage
//!
//! ```rust
//! use rowing_star::aggregate::summarize_athletes;
//! use rowing_star::classify::RecordClassifier;
//! use rowing_star::models::RawRecord;
//!
//! let raw = RawRecord {
//!     athlete: Some("Ayşe Yılmaz".to_string()),
//!     rank: Some("1".to_string()),
//!     result: Some("7.05.12".to_string()),
//!     ..RawRecord::default()
//! };
//! let records = RecordClassifier::default().classify_all(&[raw]);
//!
//! let athletes = summarize_athletes(&records);
//! assert_eq!(athletes.summaries[0].total_wins, 1);
//! ```

pub mod key;
pub mod summary;

pub use key::{EntityKey, fold_lower, fold_upper};
pub use summary::{AthleteSummary, EntitySummary, SummaryAccumulator, TeamSummary};

use crate::models::ClassifiedRecord;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Insertion-ordered key index assigning each distinct key a stable slot
#[derive(Debug, Clone)]
pub struct FirstSeen<K> {
    index: HashMap<K, usize>,
    keys: Vec<K>,
}

impl<K: Hash + Eq + Clone> FirstSeen<K> {
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
            keys: Vec::new(),
        }
    }

    /// Slot of `key`, allocating the next one on first sight
    pub fn insert(&mut self, key: &K) -> usize {
        if let Some(&slot) = self.index.get(key) {
            return slot;
        }
        let slot = self.keys.len();
        self.index.insert(key.clone(), slot);
        self.keys.push(key.clone());
        slot
    }

    pub fn position(&self, key: &K) -> Option<usize> {
        self.index.get(key).copied()
    }

    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    pub fn into_keys(self) -> Vec<K> {
        self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl<K: Hash + Eq + Clone> Default for FirstSeen<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Summaries in first-seen key order plus the records that carried no key
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    pub summaries: Vec<EntitySummary>,
    /// Records skipped because their key field was absent or blank
    pub records_without_key: usize,
}

impl Aggregation {
    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    pub fn get(&self, key: &EntityKey) -> Option<&EntitySummary> {
        self.summaries.iter().find(|summary| &summary.key == key)
    }
}

/// Accumulates summaries one record at a time
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    order: FirstSeen<EntityKey>,
    totals: Vec<SummaryAccumulator>,
    records_without_key: usize,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: Option<EntityKey>, record: &ClassifiedRecord) {
        let Some(key) = key else {
            self.records_without_key += 1;
            return;
        };

        let slot = self.order.insert(&key);
        if slot == self.totals.len() {
            self.totals.push(SummaryAccumulator::default());
        }
        self.totals[slot].add(record);
    }

    /// Fold in an aggregator built over a later partition of the same input.
    ///
    /// Keys first seen in `other` are appended after this aggregator's keys,
    /// so merging consecutive partitions in input order reproduces the
    /// single-pass result.
    pub fn merge(&mut self, other: Aggregator) {
        self.records_without_key += other.records_without_key;
        for (key, totals) in other.order.into_keys().into_iter().zip(other.totals) {
            let slot = self.order.insert(&key);
            if slot == self.totals.len() {
                self.totals.push(totals);
            } else {
                self.totals[slot].merge(&totals);
            }
        }
    }

    pub fn finish(self) -> Aggregation {
        let summaries = self
            .order
            .into_keys()
            .into_iter()
            .zip(self.totals)
            .map(|(key, totals)| totals.finish(key))
            .collect();

        Aggregation {
            summaries,
            records_without_key: self.records_without_key,
        }
    }
}

/// Aggregate records under the key produced by `key_of`
pub fn aggregate_by<F>(records: &[ClassifiedRecord], key_of: F) -> Aggregation
where
    F: Fn(&ClassifiedRecord) -> Option<EntityKey>,
{
    let mut aggregator = Aggregator::new();
    for record in records {
        aggregator.add(key_of(record), record);
    }
    aggregator.finish()
}

pub fn athlete_key(record: &ClassifiedRecord) -> Option<EntityKey> {
    EntityKey::from_cell(record.raw.athlete.as_deref())
}

pub fn team_key(record: &ClassifiedRecord) -> Option<EntityKey> {
    EntityKey::from_cell(record.raw.team.as_deref())
}

/// One summary per distinct athlete
pub fn summarize_athletes(records: &[ClassifiedRecord]) -> Aggregation {
    aggregate_by(records, athlete_key)
}

/// One summary per distinct team
pub fn summarize_teams(records: &[ClassifiedRecord]) -> Aggregation {
    aggregate_by(records, team_key)
}

/// Number of distinct members per group, e.g. athletes per team.
///
/// Records missing either the group or the member key do not count.
pub fn count_distinct<K, G, M>(
    records: &[ClassifiedRecord],
    group_of: G,
    member_of: M,
) -> HashMap<K, usize>
where
    K: Hash + Eq,
    G: Fn(&ClassifiedRecord) -> Option<K>,
    M: Fn(&ClassifiedRecord) -> Option<EntityKey>,
{
    let mut members: HashMap<K, HashSet<EntityKey>> = HashMap::new();
    for record in records {
        if let (Some(group), Some(member)) = (group_of(record), member_of(record)) {
            members.entry(group).or_default().insert(member);
        }
    }
    members
        .into_iter()
        .map(|(group, set)| (group, set.len()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::RecordClassifier;
    use crate::models::RawRecord;

    fn record(athlete: Option<&str>, team: &str, rank: &str, result: &str) -> RawRecord {
        RawRecord {
            athlete: athlete.map(str::to_string),
            team: Some(team.to_string()),
            rank: Some(rank.to_string()),
            result: Some(result.to_string()),
            ..RawRecord::default()
        }
    }

    fn classify(raw: &[RawRecord]) -> Vec<ClassifiedRecord> {
        RecordClassifier::default().classify_all(raw)
    }

    /// Ten races: three wins, two DNFs, one unranked
    fn ten_race_career() -> Vec<RawRecord> {
        let rows = [
            ("1", "7.01.10"),
            ("1", "7.02.20"),
            ("1", "6.59.00"),
            ("2", "7.05.00"),
            ("3", "7.06.00"),
            ("5", "DNF"),
            ("6", "dnf"),
            ("4", "7.10.00"),
            ("", "7.20.00"),
            ("2", "7.03.00"),
        ];
        rows.iter()
            .map(|(rank, result)| record(Some("Ali Veli"), "Kürek Kulübü", rank, result))
            .collect()
    }

    #[test]
    fn test_ten_race_career_summary() {
        let records = classify(&ten_race_career());
        let athletes = summarize_athletes(&records);

        assert_eq!(athletes.len(), 1);
        let summary = &athletes.summaries[0];
        assert_eq!(summary.key.as_str(), "Ali Veli");
        assert_eq!(summary.total_races, 10);
        assert_eq!(summary.total_wins, 3);
        assert_eq!(summary.total_dnf, 2);
        assert_eq!(summary.total_dns, 0);
        assert_eq!(summary.total_races_with_rank, 9);
        assert_eq!(summary.races_with_time, 8);
        assert_eq!(summary.total_podiums, 6);
        assert_eq!(summary.best_rank, Some(1));
        // (1+1+1+2+3+5+6+4+2) / 9
        let avg = summary.avg_rank.unwrap();
        assert!((avg - 25.0 / 9.0).abs() < 1e-9);
        assert!((summary.win_rate() - 30.0).abs() < 1e-9);
        assert!((summary.podium_rate() - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_valid_rank_leaves_rank_stats_empty() {
        let records = classify(&[record(Some("Ayşe"), "Takım", "DNS", "DNS")]);
        let summary = &summarize_athletes(&records).summaries[0];

        assert_eq!(summary.total_races_with_rank, 0);
        assert_eq!(summary.best_rank, None);
        assert_eq!(summary.avg_rank, None);
        assert_eq!(summary.total_dns, 1);
        assert_eq!(summary.win_rate(), 0.0);
    }

    #[test]
    fn test_whitespace_variants_share_one_key() {
        let records = classify(&[
            record(Some("Ali  Veli"), "A Kulübü", "1", "7.00.00"),
            record(Some(" Ali Veli "), "A Kulübü", "2", "7.00.00"),
            record(Some("ALI VELI"), "A Kulübü", "3", "7.00.00"),
        ]);
        let athletes = summarize_athletes(&records);

        assert_eq!(athletes.len(), 2);
        let key = EntityKey::new("Ali Veli").unwrap();
        assert_eq!(athletes.get(&key).unwrap().total_races, 2);
    }

    #[test]
    fn test_first_seen_order_and_skipped_records() {
        let records = classify(&[
            record(Some("Zeynep"), "B", "1", "7.00.00"),
            record(None, "B", "2", "7.00.00"),
            record(Some("Ahmet"), "A", "2", "7.00.00"),
            record(Some("   "), "A", "3", "7.00.00"),
            record(Some("Zeynep"), "B", "1", "7.00.00"),
        ]);
        let athletes = summarize_athletes(&records);

        let names: Vec<_> = athletes.summaries.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(names, vec!["Zeynep", "Ahmet"]);
        assert_eq!(athletes.records_without_key, 2);

        let teams = summarize_teams(&records);
        let names: Vec<_> = teams.summaries.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
        assert_eq!(teams.records_without_key, 0);
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let records = classify(&ten_race_career());
        assert_eq!(summarize_athletes(&records), summarize_athletes(&records));
        assert_eq!(summarize_teams(&records), summarize_teams(&records));
    }

    #[test]
    fn test_merged_partitions_match_single_pass() {
        let mut raw = ten_race_career();
        raw.push(record(Some("Deniz"), "Deniz SK", "1", "7.00.00"));
        raw.push(record(Some("Ali Veli"), "Kürek Kulübü", "2", "DSQ"));
        let records = classify(&raw);

        let (left, right) = records.split_at(6);
        let mut first = Aggregator::new();
        left.iter().for_each(|r| first.add(athlete_key(r), r));
        let mut second = Aggregator::new();
        right.iter().for_each(|r| second.add(athlete_key(r), r));
        first.merge(second);

        assert_eq!(first.finish(), summarize_athletes(&records));
    }

    #[test]
    fn test_count_distinct_athletes_per_team() {
        let records = classify(&[
            record(Some("Ali"), "A Kulübü", "1", "7.00.00"),
            record(Some("Ali"), "A Kulübü", "2", "7.00.00"),
            record(Some("Veli"), "A  Kulübü", "3", "7.00.00"),
            record(Some("Can"), "B Kulübü", "1", "7.00.00"),
            record(None, "B Kulübü", "1", "7.00.00"),
        ]);
        let counts = count_distinct(&records, team_key, athlete_key);

        assert_eq!(counts[&EntityKey::new("A Kulübü").unwrap()], 2);
        assert_eq!(counts[&EntityKey::new("B Kulübü").unwrap()], 1);
    }
}
