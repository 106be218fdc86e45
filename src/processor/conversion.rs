//! Conversion of star schema tables into polars DataFrames
//!
//! Column names and boolean flag semantics are the contract with downstream
//! warehouse queries and must not change.

use crate::aggregate::EntitySummary;
use crate::constants::tables;
use crate::error::Result;
use crate::schema::{
    AthleteRow, CategoryRow, DateRow, FactRow, LocationRow, RaceRow, StarSchema, TeamRow,
    dimensions::VENUE_TYPE,
};

use chrono::Datelike;
use polars::prelude::{Column, DataFrame, DataType, NamedFrom, Series};
use tracing::debug;

/// Days from 0001-01-01 to 1970-01-01, the polars date epoch
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Build a column by extracting one value per row
fn column<R, T>(name: &str, rows: &[R], value: impl Fn(&R) -> T) -> Column
where
    Series: NamedFrom<Vec<T>, [T]>,
{
    Column::new(name.into(), rows.iter().map(value).collect::<Vec<T>>())
}

/// Summary columns shared by the athlete and team dimensions
fn summary_columns<R>(rows: &[R], summary: impl Fn(&R) -> &EntitySummary) -> Vec<Column> {
    vec![
        column("total_races", rows, |r| summary(r).total_races),
        column("total_races_with_rank", rows, |r| summary(r).total_races_with_rank),
        column("races_with_time", rows, |r| summary(r).races_with_time),
        column("total_wins", rows, |r| summary(r).total_wins),
        column("total_podiums", rows, |r| summary(r).total_podiums),
        column("best_rank", rows, |r| summary(r).best_rank),
        column("avg_rank", rows, |r| summary(r).avg_rank),
        column("total_dnf", rows, |r| summary(r).total_dnf),
        column("total_dns", rows, |r| summary(r).total_dns),
        column("total_dsq", rows, |r| summary(r).total_dsq),
        column("win_rate", rows, |r| summary(r).win_rate()),
        column("podium_rate", rows, |r| summary(r).podium_rate()),
    ]
}

pub fn athlete_frame(rows: &[AthleteRow]) -> Result<DataFrame> {
    let mut columns = vec![
        column("athlete_key", rows, |r| r.athlete_key),
        column("athlete_id", rows, |r| r.summary.key.identifier()),
        column("athlete_name", rows, |r| r.summary.key.to_string()),
    ];
    columns.extend(summary_columns(rows, |r| &r.summary));
    Ok(DataFrame::new(columns)?)
}

pub fn team_frame(rows: &[TeamRow]) -> Result<DataFrame> {
    let mut columns = vec![
        column("team_key", rows, |r| r.team_key),
        column("team_id", rows, |r| r.summary.key.identifier()),
        column("team_name", rows, |r| r.summary.key.to_string()),
        column("team_type", rows, |r| r.team_type.label().to_string()),
        column("total_athletes", rows, |r| r.total_athletes),
    ];
    columns.extend(summary_columns(rows, |r| &r.summary));
    Ok(DataFrame::new(columns)?)
}

pub fn race_frame(rows: &[RaceRow]) -> Result<DataFrame> {
    Ok(DataFrame::new(vec![
        column("race_key", rows, |r| r.race_key),
        column("race_id", rows, |r| r.key.identifier()),
        column("race_name", rows, |r| r.key.name.to_string()),
        column("race_name_secondary", rows, |r| {
            r.key.secondary.as_ref().map(ToString::to_string)
        }),
        column("race_type", rows, |r| r.race_type.label().to_string()),
        column("is_international", rows, |r| r.race_type.is_international()),
        column("is_championship", rows, |r| r.race_type.is_championship()),
        column("total_participants", rows, |r| r.total_participants),
        column("total_categories", rows, |r| r.total_categories),
        column("total_results", rows, |r| r.total_results),
    ])?)
}

pub fn category_frame(rows: &[CategoryRow]) -> Result<DataFrame> {
    Ok(DataFrame::new(vec![
        column("category_key", rows, |r| r.category_key),
        column("category_id", rows, |r| r.key.identifier()),
        column("category_name", rows, |r| r.key.to_string()),
        column("gender", rows, |r| r.profile.gender.label().to_string()),
        column("age_group", rows, |r| r.profile.age_group.label().to_string()),
        column("boat_type", rows, |r| r.profile.boat_type.label().to_string()),
        column("total_participants", rows, |r| r.total_participants),
    ])?)
}

pub fn location_frame(rows: &[LocationRow]) -> Result<DataFrame> {
    Ok(DataFrame::new(vec![
        column("location_key", rows, |r| r.location_key),
        column("location_id", rows, |r| r.key.identifier()),
        column("location_name", rows, |r| r.key.to_string()),
        column("region", rows, |r| r.region.label().to_string()),
        column("venue_type", rows, |_| VENUE_TYPE.to_string()),
        column("total_events", rows, |r| r.total_events),
        column("total_participants", rows, |r| r.total_participants),
    ])?)
}

pub fn date_frame(rows: &[DateRow]) -> Result<DataFrame> {
    let full_date = column("full_date", rows, |r| {
        r.full_date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
    })
    .cast(&DataType::Date)?;

    Ok(DataFrame::new(vec![
        column("date_key", rows, |r| r.date_key),
        full_date,
        column("year", rows, DateRow::year),
        column("quarter", rows, DateRow::quarter),
        column("month", rows, DateRow::month),
        column("month_name", rows, DateRow::month_name),
        column("day", rows, DateRow::day),
        column("day_of_week", rows, DateRow::day_of_week),
        column("day_name", rows, DateRow::day_name),
        column("is_weekend", rows, DateRow::is_weekend),
        column("season", rows, |r| r.season().label().to_string()),
    ])?)
}

pub fn fact_frame(rows: &[FactRow]) -> Result<DataFrame> {
    Ok(DataFrame::new(vec![
        column("result_id", rows, |r| r.result_id),
        column("athlete_key", rows, |r| r.athlete_key),
        column("team_key", rows, |r| r.team_key),
        column("race_key", rows, |r| r.race_key),
        column("category_key", rows, |r| r.category_key),
        column("location_key", rows, |r| r.location_key),
        column("date_key", rows, |r| r.date_key),
        column("rank_position", rows, |r| r.rank_position),
        column("race_time_seconds", rows, |r| r.race_time_seconds),
        column("lane_number", rows, |r| r.lane_number),
        column("series_number", rows, |r| r.series_number),
        column("series_time", rows, |r| r.series_time.clone()),
        column("warning_points", rows, |r| r.warning_points),
        column("has_valid_rank", rows, |r| r.has_valid_rank),
        column("has_valid_time", rows, |r| r.has_valid_time),
        column("dnf_flag", rows, |r| r.dnf_flag),
        column("dns_flag", rows, |r| r.dns_flag),
        column("dsq_flag", rows, |r| r.dsq_flag),
        column("notes", rows, |r| r.notes.clone()),
    ])?)
}

/// Every table of the schema as (table name, frame), dimensions first
pub fn schema_frames(schema: &StarSchema) -> Result<Vec<(&'static str, DataFrame)>> {
    let frames = vec![
        (tables::DIM_ATHLETE, athlete_frame(&schema.athletes)?),
        (tables::DIM_TEAM, team_frame(&schema.teams)?),
        (tables::DIM_RACE, race_frame(&schema.races)?),
        (tables::DIM_CATEGORY, category_frame(&schema.categories)?),
        (tables::DIM_LOCATION, location_frame(&schema.locations)?),
        (tables::DIM_DATE, date_frame(&schema.dates)?),
        (tables::FACT_RACE_RESULTS, fact_frame(&schema.facts)?),
    ];

    for (name, frame) in &frames {
        debug!("Converted {} to {} rows x {} columns", name, frame.height(), frame.width());
    }
    Ok(frames)
}
