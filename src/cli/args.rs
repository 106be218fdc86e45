//! Command-line argument definitions for the rowing results pipeline
//!
//! Command-line values override the configuration file, which overrides the
//! built-in defaults.

use crate::config::{CompressionAlgorithm, OutputFormat, PipelineConfig};
use crate::error::{PipelineError, Result};
use crate::report::DEFAULT_TOP_PERFORMERS;
use clap::Parser;
use std::path::PathBuf;

/// Turn a rowing federation results export into a star schema
///
/// Classifies every result row (rank, race time, DNF / DNS / DSQ), aggregates
/// athlete and team performance, and writes six dimension tables plus one
/// fact table.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "rowing-star",
    version,
    about = "Classify rowing competition results and write them as a star schema"
)]
pub struct Args {
    /// CSV export of competition results
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output directory for the tables
    ///
    /// Defaults to a `star_schema` directory next to the input file.
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Table file format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Parquet compression algorithm
    #[arg(long, value_enum)]
    pub compression: Option<CompressionAlgorithm>,

    /// Configuration file (TOML)
    ///
    /// If not given, `<config dir>/rowing-star/config.toml` is used when present.
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Keep fraction-of-day series times as they appear in the export
    #[arg(long = "keep-series-time")]
    pub keep_series_time: bool,

    /// Classify and assemble without writing any tables
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Print a data quality report after processing
    #[arg(long)]
    pub report: bool,

    /// Number of athletes listed under top performers in the report
    #[arg(long = "top", value_name = "N", default_value_t = DEFAULT_TOP_PERFORMERS)]
    pub top: usize,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress output and the summary
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    /// Validate the arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if !self.input.is_file() {
            return Err(PipelineError::InputNotFound {
                path: self.input.clone(),
            });
        }

        if let Some(output) = &self.output {
            if output.is_file() {
                return Err(PipelineError::configuration(format!(
                    "Output path is a file, expected a directory: {}",
                    output.display()
                )));
            }
        }

        if self.top == 0 {
            return Err(PipelineError::configuration(
                "Number of top performers must be at least 1",
            ));
        }

        Ok(())
    }

    /// Apply command-line overrides on top of a loaded configuration
    pub fn apply_to(&self, mut config: PipelineConfig) -> PipelineConfig {
        if let Some(format) = self.format {
            config = config.with_output_format(format);
        }
        if let Some(compression) = self.compression {
            config = config.with_compression(compression);
        }
        if self.keep_series_time {
            config = config.without_series_time_normalization();
        }
        config
    }

    /// Log level for the crate's own targets
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Progress bars and the summary are shown unless quiet
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}
