//! Main processing engine.
//!
//! Orchestrates a complete run: read the export, clean rows, classify
//! records, assemble the star schema and write the tables. Blocking polars
//! file I/O runs on tokio's blocking pool; classification and assembly are
//! in-memory and synchronous.
//!
//! ## Architecture
//!
//! - [`reader`] - CSV export to raw records
//! - [`cleaning`] - Repeated header, placeholder row and series time repair
//! - [`conversion`] - Star schema tables to polars DataFrames
//! - [`writer`] - Staged Parquet / CSV table output

pub mod cleaning;
pub mod conversion;
pub mod reader;
pub mod writer;

#[cfg(test)]
pub mod tests;

use self::{
    cleaning::{CleaningStats, RecordCleaner},
    conversion::schema_frames,
    reader::read_raw_records,
    writer::TableWriter,
};

use crate::classify::{ClassificationStats, RecordClassifier};
use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::models::{ClassifiedRecord, ProcessingStats, RawRecord};
use crate::schema::StarSchema;

use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::task;
use tracing::{debug, info};

/// Records classified between progress bar updates
const CLASSIFY_CHUNK_SIZE: usize = 1_000;

/// Directory name used when no output directory is given
const DEFAULT_OUTPUT_DIR_NAME: &str = "star_schema";

/// Everything a run produced, for reporting
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub schema: StarSchema,
    pub cleaning: CleaningStats,
    pub classification: ClassificationStats,
    pub stats: ProcessingStats,
}

/// Main processor for converting a results export into a star schema
#[derive(Debug, Clone)]
pub struct DatasetProcessor {
    input_path: PathBuf,
    output_dir: PathBuf,
    config: PipelineConfig,
    dry_run: bool,
    show_progress: bool,
}

impl DatasetProcessor {
    /// Create a processor; the output directory defaults to `star_schema`
    /// next to the input file
    pub fn new(input_path: PathBuf, output_dir: Option<PathBuf>) -> Result<Self> {
        if !input_path.is_file() {
            return Err(PipelineError::InputNotFound { path: input_path });
        }

        let output_dir = output_dir.unwrap_or_else(|| {
            input_path
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join(DEFAULT_OUTPUT_DIR_NAME)
        });

        Ok(Self {
            input_path,
            output_dir,
            config: PipelineConfig::default(),
            dry_run: false,
            show_progress: false,
        })
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Run everything except writing the tables
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Show a progress bar while classifying
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Main processing entry point
    pub async fn process(&self) -> Result<PipelineOutcome> {
        let start_time = Instant::now();
        info!("Processing {}", self.input_path.display());

        let input_path = self.input_path.clone();
        let source = task::spawn_blocking(move || read_raw_records(&input_path)).await??;
        let rows_read = source.records.len();

        let cleaner = RecordCleaner::new(self.config.cleaning.clone());
        let (records, cleaning) = cleaner.clean(source.records);
        info!("{}", cleaning.summary());

        let classified = self.classify(&records);
        let classification = ClassificationStats::from_records(&classified);
        info!("{}", classification.summary());

        let schema = StarSchema::assemble(&classified);
        info!(
            "Assembled {} athletes, {} teams, {} races and {} fact rows",
            schema.athletes.len(),
            schema.teams.len(),
            schema.races.len(),
            schema.facts.len()
        );

        let tables_written = if self.dry_run {
            info!("Dry run, no tables written");
            Vec::new()
        } else {
            let frames = schema_frames(&schema)?;
            let writer = TableWriter::new(self.output_dir.clone(), &self.config.output);
            task::spawn_blocking(move || writer.write_all(frames))
                .await??
                .into_iter()
                .map(|written| (written.table, written.rows))
                .collect()
        };

        let stats = ProcessingStats {
            rows_read,
            rows_after_cleaning: records.len(),
            records_classified: classified.len(),
            tables_written,
            output_path: self.output_dir.clone(),
            processing_time_ms: start_time.elapsed().as_millis(),
        };
        debug!("Run finished in {}ms", stats.processing_time_ms);

        Ok(PipelineOutcome {
            schema,
            cleaning,
            classification,
            stats,
        })
    }

    fn classify(&self, records: &[RawRecord]) -> Vec<ClassifiedRecord> {
        let classifier = RecordClassifier::new(&self.config.classification);

        let pb = if self.show_progress {
            let pb = ProgressBar::new(records.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-"),
            );
            pb.set_message("Classifying records");
            pb
        } else {
            ProgressBar::hidden()
        };

        let mut classified = Vec::with_capacity(records.len());
        for chunk in records.chunks(CLASSIFY_CHUNK_SIZE) {
            classified.extend(classifier.classify_all(chunk));
            pb.inc(chunk.len() as u64);
        }
        pb.finish_and_clear();

        classified
    }
}
