//! End-to-end tests for the rowing results pipeline
//!
//! These tests write a realistic results export to a temporary directory, run
//! the complete pipeline through the public API and read the written tables
//! back to check star schema integrity.

use polars::prelude::{DataFrame, DataType, ParquetReader, SerReader};
use rowing_star::cli::{args::Args, commands};
use rowing_star::constants::tables;
use rowing_star::{DatasetProcessor, PipelineConfig, PipelineError, QualityReport};

use clap::Parser;
use std::collections::HashSet;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const HEADER: &str = "Sporcu,Takim,Yaris_Adi,Yaris_Adi2,Seri_Adi,Yaris_Yeri,Tarih,Parkur_No,Seri_No,Sonuc,Derece,ihtar,Seri_Saat";

/// A ten-race season for one athlete: three wins, two DNFs, nine ranked finishes
fn season_rows() -> Vec<String> {
    let ranks = ["1", "1", "1", "2", "3", "5", "6", "4", "2", "x"];
    let results = [
        "7.01.10", "7.05.20", "6.59.90", "7.10.00", "DNF", "7.12.40", "7.30.00", "DNF", "7.28.15",
        "7.40.00",
    ];

    let mut rows: Vec<String> = (0..10)
        .map(|i| {
            format!(
                "Mehmet Yılmaz,Fenerbahçe,Türkiye Kupası {n},Finaller,Genç Erkek 1x,Haliç Kürek Pisti,{n} Mayıs 2023,{lane},1,{rank},{result},0,0.375",
                n = i + 1,
                lane = 1 + i % 6,
                rank = ranks[i],
                result = results[i],
            )
        })
        .collect();

    rows.push(
        "Zeynep Ak,Haliç Kürek,Türkiye Kupası 1,Finaller,Genç Kadın 1x,Haliç Kürek Pisti,1 Mayıs 2023,2,2,1,7.55.00,,0.4375".to_string(),
    );
    rows.push(
        "Zeynep Ak,Haliç Kürek,Ankara Regatta,,Genç Kadın 1x,Ankara Gölbaşı,bilinmiyor,3,1,DNS,DNS,,".to_string(),
    );
    rows.push(HEADER.to_string());
    rows
}

fn write_export(dir: &Path) -> PathBuf {
    let path = dir.join("results.csv");
    let mut content = String::from(HEADER);
    for row in season_rows() {
        content.push('\n');
        content.push_str(&row);
    }
    content.push('\n');
    fs::write(&path, content).unwrap();
    path
}

fn read_table(dir: &Path, table: &str) -> DataFrame {
    let file = File::open(dir.join(format!("{}.parquet", table))).unwrap();
    ParquetReader::new(file).finish().unwrap()
}

fn key_set(frame: &DataFrame, column: &str) -> HashSet<i64> {
    frame
        .column(column)
        .unwrap()
        .cast(&DataType::Int64)
        .unwrap()
        .i64()
        .unwrap()
        .into_iter()
        .flatten()
        .collect()
}

#[tokio::test]
async fn test_end_to_end_star_schema() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_export(temp_dir.path());
    let output_dir = temp_dir.path().join("warehouse");

    let outcome = DatasetProcessor::new(input, Some(output_dir.clone()))
        .unwrap()
        .process()
        .await
        .unwrap();

    assert_eq!(outcome.stats.rows_read, 13);
    assert_eq!(outcome.stats.records_classified, 12);
    assert_eq!(outcome.cleaning.repeated_headers, 1);

    let expected_sizes = [
        (tables::DIM_ATHLETE, 2),
        (tables::DIM_TEAM, 2),
        (tables::DIM_RACE, 11),
        (tables::DIM_CATEGORY, 2),
        (tables::DIM_LOCATION, 2),
        (tables::DIM_DATE, 10),
        (tables::FACT_RACE_RESULTS, 12),
    ];
    for (table, rows) in expected_sizes {
        assert_eq!(read_table(&output_dir, table).height(), rows, "{table}");
    }
}

#[tokio::test]
async fn test_athlete_summary_survives_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_export(temp_dir.path());
    let output_dir = temp_dir.path().join("warehouse");

    DatasetProcessor::new(input, Some(output_dir.clone()))
        .unwrap()
        .process()
        .await
        .unwrap();

    let athletes = read_table(&output_dir, tables::DIM_ATHLETE);
    let first = |column: &str| athletes.column(column).unwrap().get(0).unwrap().to_string();

    assert_eq!(first("athlete_key"), "1");
    let name = athletes.column("athlete_name").unwrap().str().unwrap().get(0);
    assert_eq!(name, Some("Mehmet Yılmaz"));
    assert_eq!(first("total_races"), "10");
    assert_eq!(first("total_wins"), "3");
    assert_eq!(first("total_podiums"), "6");
    assert_eq!(first("total_dnf"), "2");
    assert_eq!(first("best_rank"), "1");

    let avg = athletes.column("avg_rank").unwrap().f64().unwrap().get(0).unwrap();
    assert!((avg - 25.0 / 9.0).abs() < 1e-9);
    let win_rate = athletes.column("win_rate").unwrap().f64().unwrap().get(0).unwrap();
    assert!((win_rate - 30.0).abs() < 1e-9);
    let podium_rate = athletes.column("podium_rate").unwrap().f64().unwrap().get(0).unwrap();
    assert!((podium_rate - 60.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_foreign_keys_resolve_to_dimensions() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_export(temp_dir.path());
    let output_dir = temp_dir.path().join("warehouse");

    DatasetProcessor::new(input, Some(output_dir.clone()))
        .unwrap()
        .process()
        .await
        .unwrap();

    let facts = read_table(&output_dir, tables::FACT_RACE_RESULTS);
    for (dimension, key) in [
        (tables::DIM_ATHLETE, "athlete_key"),
        (tables::DIM_TEAM, "team_key"),
        (tables::DIM_RACE, "race_key"),
        (tables::DIM_CATEGORY, "category_key"),
        (tables::DIM_LOCATION, "location_key"),
        (tables::DIM_DATE, "date_key"),
    ] {
        let known = key_set(&read_table(&output_dir, dimension), key);
        let referenced = key_set(&facts, key);
        assert!(
            referenced.is_subset(&known),
            "{key} references rows missing from {dimension}"
        );
    }

    // The unparseable date is the only unresolved key
    let date_keys = facts.column("date_key").unwrap();
    assert_eq!(date_keys.null_count(), 1);
    assert_eq!(facts.column("athlete_key").unwrap().null_count(), 0);
}

#[tokio::test]
async fn test_quality_report_from_run() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_export(temp_dir.path());

    let outcome = DatasetProcessor::new(input, None)
        .unwrap()
        .with_dry_run(true)
        .process()
        .await
        .unwrap();
    assert!(outcome.stats.tables_written.is_empty());
    assert!(!temp_dir.path().join("star_schema").exists());

    let report = QualityReport::from_schema(&outcome.schema, 10);
    assert_eq!(report.total_results, 12);
    assert_eq!(report.dnf, 2);
    assert_eq!(report.dns, 1);
    assert_eq!(report.top_performers[0].name, "Mehmet Yılmaz");
    assert_eq!(report.top_performers[0].wins, 3);
    assert_eq!(report.coverage.date, 11);
}

#[tokio::test]
async fn test_cli_run_with_overrides() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_export(temp_dir.path());
    let output_dir = temp_dir.path().join("csv_out");

    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        "[output]\nformat = \"parquet\"\ncompression = \"zstd\"\n",
    )
    .unwrap();

    let args = Args::try_parse_from([
        "rowing-star",
        input.to_str().unwrap(),
        "-o",
        output_dir.to_str().unwrap(),
        "-c",
        config_path.to_str().unwrap(),
        "--format",
        "csv",
        "-q",
    ])
    .unwrap();

    let outcome = commands::run(args).await.unwrap();
    assert_eq!(outcome.stats.tables_written.len(), tables::ALL.len());
    for table in tables::ALL {
        assert!(output_dir.join(format!("{}.csv", table)).exists());
    }
}

#[tokio::test]
async fn test_invalid_config_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_export(temp_dir.path());
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "[cleaning]\nmin_athlete_name_chars = 0\n").unwrap();

    let config = PipelineConfig::load(Some(&config_path));
    assert!(matches!(config, Err(PipelineError::Configuration { .. })));

    let args = Args::try_parse_from([
        "rowing-star",
        input.to_str().unwrap(),
        "-c",
        config_path.to_str().unwrap(),
        "-q",
    ])
    .unwrap();
    assert!(commands::run(args).await.is_err());
}
