//! Configuration management and validation.
//!
//! Provides configuration structures for status keyword sets, cleaning rules
//! and output settings. Configuration is layered: an explicit TOML file, else
//! the user's config directory, else built-in defaults.

use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_MIN_ATHLETE_NAME_CHARS,
    DEFAULT_MIN_TEAM_NAME_CHARS, status_keywords,
};
use crate::error::{PipelineError, Result};
use clap::ValueEnum;
use polars::prelude::ParquetCompression;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Keyword sets that identify status codes in the result column.
///
/// The curated lists are not exhaustive, so they live in configuration
/// rather than in the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusKeywords {
    pub dnf: Vec<String>,
    pub dns: Vec<String>,
    pub dsq: Vec<String>,
}

impl Default for StatusKeywords {
    fn default() -> Self {
        fn owned(keywords: &[&str]) -> Vec<String> {
            keywords.iter().map(|k| k.to_string()).collect()
        }

        Self {
            dnf: owned(status_keywords::DNF),
            dns: owned(status_keywords::DNS),
            dsq: owned(status_keywords::DSQ),
        }
    }
}

/// Settings for the record classifier
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    pub status_keywords: StatusKeywords,
}

/// Rules for dropping and repairing source rows before classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    /// Drop header rows repeated inside the data (sheet concatenation artefact)
    pub drop_repeated_headers: bool,

    /// Minimum athlete name length in characters
    pub min_athlete_name_chars: usize,

    /// Minimum team name length in characters
    pub min_team_name_chars: usize,

    /// Convert fraction-of-day series times (0.375) into HH:MM
    pub normalize_series_time: bool,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            drop_repeated_headers: true,
            min_athlete_name_chars: DEFAULT_MIN_ATHLETE_NAME_CHARS,
            min_team_name_chars: DEFAULT_MIN_TEAM_NAME_CHARS,
            normalize_series_time: true,
        }
    }
}

/// File format of the written tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Parquet,
    Csv,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Parquet => "parquet",
            OutputFormat::Csv => "csv",
        }
    }
}

/// Supported compression algorithms for parquet files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CompressionAlgorithm {
    /// Snappy compression - good balance of speed and compression
    #[default]
    Snappy,
    /// ZSTD compression - better compression ratio, slower
    Zstd,
    /// LZ4 compression - fastest, lower compression ratio
    Lz4,
    /// No compression
    #[value(name = "none")]
    #[serde(rename = "none")]
    Uncompressed,
}

impl CompressionAlgorithm {
    /// Convert to polars ParquetCompression type
    pub fn to_polars_compression(&self) -> ParquetCompression {
        match self {
            CompressionAlgorithm::Snappy => ParquetCompression::Snappy,
            CompressionAlgorithm::Zstd => ParquetCompression::Zstd(None),
            CompressionAlgorithm::Lz4 => ParquetCompression::Lz4Raw,
            CompressionAlgorithm::Uncompressed => ParquetCompression::Uncompressed,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub compression: CompressionAlgorithm,
}

/// Global configuration for a pipeline run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub classification: ClassificationConfig,
    pub cleaning: CleaningConfig,
    pub output: OutputConfig,
}

impl PipelineConfig {
    /// Load configuration from an explicit file, the user config directory, or defaults
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            if !path.exists() {
                return Err(PipelineError::configuration(format!(
                    "Configuration file not found: {}",
                    path.display()
                )));
            }
            return Self::from_file(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => {
                debug!("No configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Parse and validate a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&content).map_err(|source| PipelineError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// `<config_dir>/rowing-star/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Check the configuration for values the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        let keywords = &self.classification.status_keywords;
        for (status, set) in [
            ("dnf", &keywords.dnf),
            ("dns", &keywords.dns),
            ("dsq", &keywords.dsq),
        ] {
            if set.iter().all(|keyword| keyword.trim().is_empty()) {
                return Err(PipelineError::configuration(format!(
                    "Status keyword set '{}' must contain at least one non-blank keyword",
                    status
                )));
            }
        }

        if self.cleaning.min_athlete_name_chars == 0 || self.cleaning.min_team_name_chars == 0 {
            return Err(PipelineError::configuration(
                "Minimum name lengths must be at least 1 character",
            ));
        }

        Ok(())
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output.format = format;
        self
    }

    pub fn with_compression(mut self, compression: CompressionAlgorithm) -> Self {
        self.output.compression = compression;
        self
    }

    pub fn with_status_keywords(mut self, keywords: StatusKeywords) -> Self {
        self.classification.status_keywords = keywords;
        self
    }

    pub fn without_series_time_normalization(mut self) -> Self {
        self.cleaning.normalize_series_time = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.output.format, OutputFormat::Parquet);
        assert_eq!(config.output.compression, CompressionAlgorithm::Snappy);
        assert!(config.cleaning.drop_repeated_headers);
        assert!(
            config
                .classification
                .status_keywords
                .dnf
                .contains(&"DNF".to_string())
        );
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let toml = r#"
[classification.status_keywords]
dnf = ["DNF", "YARIŞI BIRAKTI"]

[output]
format = "csv"
"#;
        let config: PipelineConfig = toml::from_str(toml).unwrap();

        assert_eq!(config.classification.status_keywords.dnf.len(), 2);
        assert_eq!(
            config.classification.status_keywords.dns,
            StatusKeywords::default().dns
        );
        assert_eq!(config.output.format, OutputFormat::Csv);
        assert_eq!(config.output.compression, CompressionAlgorithm::Snappy);
        assert_eq!(config.cleaning, CleaningConfig::default());
    }

    #[test]
    fn test_compression_none_alias() {
        let config: PipelineConfig = toml::from_str("[output]\ncompression = \"none\"\n").unwrap();
        assert_eq!(config.output.compression, CompressionAlgorithm::Uncompressed);
    }

    #[test]
    fn test_blank_keyword_set_rejected() {
        let config = PipelineConfig::default().with_status_keywords(StatusKeywords {
            dsq: vec!["  ".to_string()],
            ..StatusKeywords::default()
        });
        assert!(matches!(
            config.validate(),
            Err(PipelineError::Configuration { .. })
        ));
    }

    #[test]
    fn test_from_file_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        let config = PipelineConfig::default().with_output_format(OutputFormat::Csv);
        std::fs::write(&path, toml::to_string(&config).unwrap()).unwrap();

        let loaded = PipelineConfig::load(Some(&path)).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = PipelineConfig::load(Some(&temp_dir.path().join("absent.toml")));
        assert!(matches!(result, Err(PipelineError::Configuration { .. })));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[output\nformat = ").unwrap();

        let result = PipelineConfig::from_file(&path);
        assert!(matches!(result, Err(PipelineError::ConfigParse { .. })));
    }
}
