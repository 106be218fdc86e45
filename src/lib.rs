//! Rowing Star Library
//!
//! A Rust library for turning rowing federation competition results, exported
//! from spreadsheets, into a star schema of Parquet (or CSV) tables.
//!
//! This library provides tools for:
//! - Reading results exports with header aliasing and required column checks
//! - Cleaning spreadsheet artefacts such as repeated header rows
//! - Classifying free-text ranks and race times, including DNF / DNS / DSQ codes
//! - Aggregating per-athlete and per-team performance summaries
//! - Assembling athlete, team, race, category, location and date dimensions
//!   plus a fact table with surrogate keys
//! - Writing all tables with an all-or-nothing commit
//! - Data quality reporting

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod constants;
pub mod error;
pub mod header;
pub mod models;
pub mod processor;
pub mod report;
pub mod schema;

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use aggregate::{EntityKey, EntitySummary};
pub use classify::{ClassificationStats, RecordClassifier};
pub use config::{CompressionAlgorithm, OutputFormat, PipelineConfig};
pub use error::{PipelineError, Result};
pub use models::{ClassifiedRecord, ProcessingStats, RawRecord};
pub use processor::{DatasetProcessor, PipelineOutcome};
pub use report::QualityReport;
pub use schema::StarSchema;
