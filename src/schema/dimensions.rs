//! Dimension rows and the descriptive attributes derived from entity names
//!
//! Attribute labels are written to the tables in Turkish, matching the
//! source data; the enums keep the code readable.

use crate::aggregate::{
    Aggregation, EntityKey, EntitySummary, FirstSeen, athlete_key, count_distinct, fold_upper,
    team_key,
};
use crate::models::ClassifiedRecord;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(*needle))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TeamType {
    MajorClub,
    RowingClub,
    SportsClub,
    Other,
}

impl TeamType {
    pub fn classify(team_name: &str) -> Self {
        let name = fold_upper(team_name);
        if contains_any(&name, &["FENERBAHÇE", "GALATASARAY", "BEŞIKTAŞ"]) {
            TeamType::MajorClub
        } else if name.contains("KÜREK") {
            TeamType::RowingClub
        } else if contains_any(&name, &["SPOR", "SK"]) {
            TeamType::SportsClub
        } else {
            TeamType::Other
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TeamType::MajorClub => "Büyük Kulüp",
            TeamType::RowingClub => "Kürek Kulübü",
            TeamType::SportsClub => "Spor Kulübü",
            TeamType::Other => "Diğer",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RaceType {
    International,
    NationalChampionship,
    Cup,
    Regional,
}

impl RaceType {
    pub fn classify(name: &str, secondary: Option<&str>) -> Self {
        let full = fold_upper(&format!("{} {}", name, secondary.unwrap_or_default()));
        if full.contains("INTERNATIONAL") {
            RaceType::International
        } else if contains_any(&full, &["TÜRKIYE", "ŞAMPIYON"]) {
            RaceType::NationalChampionship
        } else if full.contains("KUPA") {
            RaceType::Cup
        } else {
            RaceType::Regional
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RaceType::International => "International",
            RaceType::NationalChampionship => "National Championship",
            RaceType::Cup => "Cup",
            RaceType::Regional => "Regional",
        }
    }

    pub fn is_international(&self) -> bool {
        *self == RaceType::International
    }

    pub fn is_championship(&self) -> bool {
        *self == RaceType::NationalChampionship
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Gender {
    Women,
    Men,
    Mixed,
    Unknown,
}

impl Gender {
    fn classify(category: &str) -> Self {
        // WOMEN before MEN, since one contains the other
        if contains_any(category, &["BAYAN", "KADIN", "WOMEN"]) {
            Gender::Women
        } else if contains_any(category, &["ERKEK", "MEN"]) {
            Gender::Men
        } else if category.contains("MIX") {
            Gender::Mixed
        } else {
            Gender::Unknown
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Gender::Women => "Kadın",
            Gender::Men => "Erkek",
            Gender::Mixed => "Karışık",
            Gender::Unknown => "Bilinmiyor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AgeGroup {
    Junior,
    Master,
    Senior,
    Unknown,
}

impl AgeGroup {
    fn classify(category: &str) -> Self {
        if contains_any(category, &["GENÇ", "JUNIOR"]) {
            AgeGroup::Junior
        } else if category.contains("MASTER") {
            AgeGroup::Master
        } else if contains_any(category, &["SENIOR", "BÜYÜK"]) {
            AgeGroup::Senior
        } else {
            AgeGroup::Unknown
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AgeGroup::Junior => "Genç",
            AgeGroup::Master => "Master",
            AgeGroup::Senior => "Senior",
            AgeGroup::Unknown => "Bilinmiyor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BoatType {
    Single,
    Double,
    CoxedQuad,
    Pair,
    Four,
    Eight,
    Other,
}

impl BoatType {
    fn classify(category: &str) -> Self {
        const BOATS: [(&str, BoatType); 6] = [
            ("1X", BoatType::Single),
            ("2X", BoatType::Double),
            ("4X+", BoatType::CoxedQuad),
            ("2-", BoatType::Pair),
            ("4-", BoatType::Four),
            ("8+", BoatType::Eight),
        ];
        BOATS
            .iter()
            .find(|(code, _)| category.contains(*code))
            .map_or(BoatType::Other, |&(_, boat)| boat)
    }

    pub fn label(&self) -> &'static str {
        match self {
            BoatType::Single => "1x (Single)",
            BoatType::Double => "2x (Double)",
            BoatType::CoxedQuad => "4x+ (Quad with Cox)",
            BoatType::Pair => "2- (Pair)",
            BoatType::Four => "4- (Four)",
            BoatType::Eight => "8+ (Eight)",
            BoatType::Other => "Diğer",
        }
    }
}

/// Gender, age group and boat class parsed from a category name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryProfile {
    pub gender: Gender,
    pub age_group: AgeGroup,
    pub boat_type: BoatType,
}

impl CategoryProfile {
    pub fn parse(category_name: &str) -> Self {
        let category = fold_upper(category_name);
        Self {
            gender: Gender::classify(&category),
            age_group: AgeGroup::classify(&category),
            boat_type: BoatType::classify(&category),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Region {
    Istanbul,
    Ankara,
    Marmara,
    Thrace,
    Other,
}

impl Region {
    pub fn classify(location_name: &str) -> Self {
        let name = fold_upper(location_name);
        if contains_any(&name, &["ISTANBUL", "KALAMIŞ", "KALAMIS", "HALIÇ", "BEYKOZ"]) {
            Region::Istanbul
        } else if name.contains("ANKARA") {
            Region::Ankara
        } else if contains_any(&name, &["SAPANCA", "KOCAELI", "GEBZE"]) {
            Region::Marmara
        } else if name.contains("EDIRNE") {
            Region::Thrace
        } else {
            Region::Other
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Region::Istanbul => "İstanbul",
            Region::Ankara => "Ankara",
            Region::Marmara => "Marmara",
            Region::Thrace => "Trakya",
            Region::Other => "Diğer",
        }
    }
}

/// Every venue in the source is a rowing course
pub const VENUE_TYPE: &str = "Kürek Pisti";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AthleteRow {
    pub athlete_key: u32,
    pub summary: EntitySummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamRow {
    pub team_key: u32,
    pub team_type: TeamType,
    pub total_athletes: u32,
    pub summary: EntitySummary,
}

/// Natural key of a race: primary name plus optional secondary title
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RaceKey {
    pub name: EntityKey,
    pub secondary: Option<EntityKey>,
}

impl RaceKey {
    pub fn of(record: &ClassifiedRecord) -> Option<Self> {
        Some(Self {
            name: EntityKey::from_cell(record.raw.race_name.as_deref())?,
            secondary: EntityKey::from_cell(record.raw.race_name_secondary.as_deref()),
        })
    }

    pub fn identifier(&self) -> String {
        match &self.secondary {
            Some(secondary) => format!("{}_{}", self.name.identifier(), secondary.identifier()),
            None => self.name.identifier(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RaceRow {
    pub race_key: u32,
    pub key: RaceKey,
    pub race_type: RaceType,
    pub total_participants: u32,
    pub total_categories: u32,
    pub total_results: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRow {
    pub category_key: u32,
    pub key: EntityKey,
    pub profile: CategoryProfile,
    pub total_participants: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationRow {
    pub location_key: u32,
    pub key: EntityKey,
    pub region: Region,
    pub total_events: u32,
    pub total_participants: u32,
}

pub fn category_key(record: &ClassifiedRecord) -> Option<EntityKey> {
    EntityKey::from_cell(record.raw.category.as_deref())
}

pub fn location_key(record: &ClassifiedRecord) -> Option<EntityKey> {
    EntityKey::from_cell(record.raw.location.as_deref())
}

/// Surrogate key for the row at `position` in first-seen order
fn surrogate(position: usize) -> u32 {
    u32::try_from(position + 1).unwrap_or(u32::MAX)
}

fn count(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Distinct athletes, distinct categories and result count for one group
#[derive(Debug, Default)]
struct GroupTotals {
    athletes: HashSet<EntityKey>,
    categories: HashSet<EntityKey>,
    results: usize,
}

impl GroupTotals {
    fn add(&mut self, record: &ClassifiedRecord) {
        if let Some(athlete) = athlete_key(record) {
            self.athletes.insert(athlete);
        }
        if let Some(category) = category_key(record) {
            self.categories.insert(category);
        }
        if record.raw.result.is_some() {
            self.results += 1;
        }
    }
}

fn group_totals<K, F>(records: &[ClassifiedRecord], key_of: F) -> Vec<(K, GroupTotals)>
where
    K: std::hash::Hash + Eq + Clone,
    F: Fn(&ClassifiedRecord) -> Option<K>,
{
    let mut order = FirstSeen::new();
    let mut totals: Vec<GroupTotals> = Vec::new();
    for record in records {
        let Some(key) = key_of(record) else {
            continue;
        };
        let slot = order.insert(&key);
        if slot == totals.len() {
            totals.push(GroupTotals::default());
        }
        totals[slot].add(record);
    }
    order.into_keys().into_iter().zip(totals).collect()
}

pub fn athlete_rows(athletes: &Aggregation) -> Vec<AthleteRow> {
    athletes
        .summaries
        .iter()
        .enumerate()
        .map(|(position, summary)| AthleteRow {
            athlete_key: surrogate(position),
            summary: summary.clone(),
        })
        .collect()
}

pub fn team_rows(teams: &Aggregation, records: &[ClassifiedRecord]) -> Vec<TeamRow> {
    let athletes_per_team: HashMap<EntityKey, usize> =
        count_distinct(records, team_key, athlete_key);

    teams
        .summaries
        .iter()
        .enumerate()
        .map(|(position, summary)| TeamRow {
            team_key: surrogate(position),
            team_type: TeamType::classify(summary.key.as_str()),
            total_athletes: count(athletes_per_team.get(&summary.key).copied().unwrap_or(0)),
            summary: summary.clone(),
        })
        .collect()
}

pub fn race_rows(records: &[ClassifiedRecord]) -> Vec<RaceRow> {
    group_totals(records, RaceKey::of)
        .into_iter()
        .enumerate()
        .map(|(position, (key, totals))| RaceRow {
            race_key: surrogate(position),
            race_type: RaceType::classify(
                key.name.as_str(),
                key.secondary.as_ref().map(EntityKey::as_str),
            ),
            total_participants: count(totals.athletes.len()),
            total_categories: count(totals.categories.len()),
            total_results: count(totals.results),
            key,
        })
        .collect()
}

pub fn category_rows(records: &[ClassifiedRecord]) -> Vec<CategoryRow> {
    group_totals(records, category_key)
        .into_iter()
        .enumerate()
        .map(|(position, (key, totals))| CategoryRow {
            category_key: surrogate(position),
            profile: CategoryProfile::parse(key.as_str()),
            total_participants: count(totals.athletes.len()),
            key,
        })
        .collect()
}

pub fn location_rows(records: &[ClassifiedRecord]) -> Vec<LocationRow> {
    group_totals(records, location_key)
        .into_iter()
        .enumerate()
        .map(|(position, (key, totals))| LocationRow {
            location_key: surrogate(position),
            region: Region::classify(key.as_str()),
            total_events: count(totals.results),
            total_participants: count(totals.athletes.len()),
            key,
        })
        .collect()
}
