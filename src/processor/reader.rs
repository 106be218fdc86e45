//! Source reading
//!
//! Loads a results export with polars, every column as text, and turns each
//! row into a [`RawRecord`]. Type interpretation is left to the classifier.

use crate::error::{PipelineError, Result};
use crate::header::{ColumnMapping, SourceField};
use crate::models::RawRecord;

use polars::prelude::{CsvReadOptions, DataFrame, DataType, SerReader};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// Raw records read from one export, with the header mapping used
#[derive(Debug, Clone)]
pub struct SourceTable {
    pub records: Vec<RawRecord>,
    pub mapping: ColumnMapping,
}

/// Read a CSV export into raw records
pub fn read_raw_records(path: &Path) -> Result<SourceTable> {
    if !path.exists() {
        return Err(PipelineError::InputNotFound {
            path: path.to_path_buf(),
        });
    }

    // A schema inference length of zero reads every column as a string
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .map_parse_options(|options| options.with_truncate_ragged_lines(true))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    let headers: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    let mapping = ColumnMapping::analyze(&headers, path)?;
    debug!(
        "Read {} rows x {} columns from {}",
        df.height(),
        df.width(),
        path.display()
    );

    let records = records_from_frame(&df, &mapping)?;
    info!("Loaded {} raw records from {}", records.len(), path.display());

    Ok(SourceTable { records, mapping })
}

/// Convert an all-text frame into raw records using a header mapping
pub fn records_from_frame(df: &DataFrame, mapping: &ColumnMapping) -> Result<Vec<RawRecord>> {
    let mut cells: HashMap<SourceField, std::vec::IntoIter<Option<String>>> = HashMap::new();
    for field in SourceField::ALL {
        cells.insert(field, text_cells(df, mapping.column(field))?.into_iter());
    }

    let mut next = |field: SourceField| cells.get_mut(&field).and_then(Iterator::next).flatten();

    let mut records = Vec::with_capacity(df.height());
    for _ in 0..df.height() {
        records.push(RawRecord {
            athlete: next(SourceField::Athlete),
            team: next(SourceField::Team),
            race_name: next(SourceField::RaceName),
            race_name_secondary: next(SourceField::RaceNameSecondary),
            category: next(SourceField::Category),
            location: next(SourceField::Location),
            date: next(SourceField::Date),
            lane: next(SourceField::Lane),
            series_number: next(SourceField::SeriesNumber),
            rank: next(SourceField::Rank),
            result: next(SourceField::Result),
            warning_points: next(SourceField::WarningPoints),
            series_time: next(SourceField::SeriesTime),
        });
    }

    Ok(records)
}

/// Normalized text cells of one column; all absent when the column is unmapped
fn text_cells(df: &DataFrame, column: Option<&str>) -> Result<Vec<Option<String>>> {
    let Some(name) = column else {
        return Ok(vec![None; df.height()]);
    };

    let column = df.column(name)?.cast(&DataType::String)?;
    let values = column.as_materialized_series().str()?;
    Ok(values.into_iter().map(RawRecord::cell).collect())
}
