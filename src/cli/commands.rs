//! Command execution for the rowing-star CLI
//!
//! Sets up logging, layers configuration, runs the pipeline and prints the
//! run summary and optional quality report.

use crate::cli::args::Args;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::processor::{DatasetProcessor, PipelineOutcome};
use crate::report::QualityReport;
use colored::*;
use indicatif::HumanDuration;
use std::time::Duration;
use tracing::{debug, info};

/// Run the pipeline for parsed arguments
///
/// 1. Set up logging
/// 2. Validate arguments and load configuration
/// 3. Process the export
/// 4. Print the summary and, if asked, the quality report
pub async fn run(args: Args) -> Result<PipelineOutcome> {
    setup_logging(&args);

    info!("Starting rowing-star");
    debug!("Command line arguments: {:?}", args);

    args.validate()?;

    let config = args.apply_to(PipelineConfig::load(args.config.as_deref())?);
    config.validate()?;
    debug!("Effective configuration: {:?}", config);

    let processor = DatasetProcessor::new(args.input.clone(), args.output.clone())?
        .with_config(config)
        .with_dry_run(args.dry_run)
        .with_progress(args.show_progress());

    let outcome = processor.process().await?;

    if args.show_progress() {
        print_summary(&outcome, args.dry_run);
    }
    if args.report {
        println!("{}", QualityReport::from_schema(&outcome.schema, args.top).render());
    }

    Ok(outcome)
}

/// Set up structured logging based on CLI arguments
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("rowing_star={}", log_level)));

    // try_init: a subscriber may already be installed when embedded
    let result = if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    if result.is_ok() {
        debug!("Logging initialized at level: {}", log_level);
    }
}

/// Print the human-readable run summary
fn print_summary(outcome: &PipelineOutcome, dry_run: bool) {
    let stats = &outcome.stats;
    let duration = HumanDuration(Duration::from_millis(stats.processing_time_ms as u64));

    println!();
    if dry_run {
        println!("{}", "Dry run complete (no tables written)".bright_yellow().bold());
    } else {
        println!("{}", "Processing complete".bright_green().bold());
    }

    println!(
        "  {} {}",
        "Rows read:".bright_cyan(),
        stats.rows_read.to_string().bright_white()
    );
    println!(
        "  {} {} ({} dropped)",
        "Rows kept:".bright_cyan(),
        stats.rows_after_cleaning.to_string().bright_white(),
        outcome.cleaning.dropped()
    );
    println!(
        "  {} {}",
        "Classified:".bright_cyan(),
        stats.records_classified.to_string().bright_white()
    );

    let classification = &outcome.classification;
    println!(
        "  {} {:.1}% ranks, {:.1}% times, {} incidents",
        "Valid:".bright_cyan(),
        classification.valid_rank_rate(),
        classification.valid_time_rate(),
        classification.incidents()
    );

    if !stats.tables_written.is_empty() {
        println!(
            "\n{} {}",
            "Tables written to".bright_yellow(),
            stats.output_path.display().to_string().bright_white()
        );
        for (table, rows) in &stats.tables_written {
            println!("  {:<20} {} rows", table.bright_cyan(), rows);
        }
    }

    println!("  {} {}", "Processing time:".bright_cyan(), duration);
    println!();
}
