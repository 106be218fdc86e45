//! Table writing for the star schema
//!
//! Every table is first written to `<table>.<ext>.partial` in the output
//! directory. Only when all tables have been written are they renamed into
//! place, so a failed run never leaves a half-written table set behind.
//! Tables from a previous run are moved to `<table>.<ext>.backup` during the
//! commit and restored if it fails.

use crate::config::{CompressionAlgorithm, OutputConfig, OutputFormat};
use crate::constants::{BACKUP_SUFFIX, PARTIAL_SUFFIX};
use crate::error::{PipelineError, Result};

use polars::prelude::{CsvWriter, DataFrame, ParquetWriter, SerWriter};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A table that was written and committed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenTable {
    pub table: String,
    pub rows: usize,
    pub path: PathBuf,
}

/// Writes named DataFrames into an output directory
#[derive(Debug, Clone)]
pub struct TableWriter {
    output_dir: PathBuf,
    format: OutputFormat,
    compression: CompressionAlgorithm,
}

impl TableWriter {
    pub fn new(output_dir: PathBuf, config: &OutputConfig) -> Self {
        Self {
            output_dir,
            format: config.format,
            compression: config.compression,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Final location of a table
    pub fn table_path(&self, table: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", table, self.format.extension()))
    }

    fn partial_path(&self, table: &str) -> PathBuf {
        self.suffixed_path(table, PARTIAL_SUFFIX)
    }

    fn backup_path(&self, table: &str) -> PathBuf {
        self.suffixed_path(table, BACKUP_SUFFIX)
    }

    fn suffixed_path(&self, table: &str, suffix: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}.{}", table, self.format.extension(), suffix))
    }

    /// Write all tables, committing them only if every write succeeds
    pub fn write_all(&self, frames: Vec<(&str, DataFrame)>) -> Result<Vec<WrittenTable>> {
        fs::create_dir_all(&self.output_dir)?;

        let mut staged: Vec<(String, usize, PathBuf)> = Vec::with_capacity(frames.len());
        for (table, mut frame) in frames {
            let partial = self.partial_path(table);
            staged.push((table.to_string(), frame.height(), partial.clone()));

            if let Err(reason) = self.write_frame(&partial, &mut frame) {
                discard(staged.iter().map(|(_, _, path)| path.as_path()));
                return Err(PipelineError::WriteFailed {
                    table: table.to_string(),
                    path: partial,
                    reason,
                });
            }
            debug!("Staged {} ({} rows) at {}", table, frame.height(), partial.display());
        }

        let mut committed: Vec<WrittenTable> = Vec::with_capacity(staged.len());
        let mut backups: Vec<(PathBuf, PathBuf)> = Vec::new();
        for (position, (table, rows, partial)) in staged.iter().enumerate() {
            let path = self.table_path(table);
            let moved = self.move_previous(table, &path).and_then(|backup| {
                backups.extend(backup);
                fs::rename(partial, &path)
            });
            if let Err(e) = moved {
                discard(staged[position..].iter().map(|(_, _, p)| p.as_path()));
                discard(committed.iter().map(|written| written.path.as_path()));
                restore(&backups);
                return Err(PipelineError::WriteFailed {
                    table: table.clone(),
                    path,
                    reason: format!("could not move staged table into place: {}", e),
                });
            }
            committed.push(WrittenTable {
                table: table.clone(),
                rows: *rows,
                path,
            });
        }
        discard(backups.iter().map(|(backup, _)| backup.as_path()));

        info!(
            "Wrote {} tables to {}",
            committed.len(),
            self.output_dir.display()
        );
        Ok(committed)
    }

    /// Move a previous run's table aside, returning `(backup, original)`.
    /// Anything other than a regular file is left in place.
    fn move_previous(
        &self,
        table: &str,
        path: &Path,
    ) -> std::io::Result<Option<(PathBuf, PathBuf)>> {
        if !path.is_file() {
            return Ok(None);
        }
        let backup = self.backup_path(table);
        fs::rename(path, &backup)?;
        debug!("Moved previous {} to {}", table, backup.display());
        Ok(Some((backup, path.to_path_buf())))
    }

    fn write_frame(&self, path: &Path, frame: &mut DataFrame) -> std::result::Result<(), String> {
        let file = File::create(path).map_err(|e| e.to_string())?;
        match self.format {
            OutputFormat::Parquet => {
                ParquetWriter::new(file)
                    .with_compression(self.compression.to_polars_compression())
                    .finish(frame)
                    .map_err(|e| e.to_string())?;
            }
            OutputFormat::Csv => {
                CsvWriter::new(file)
                    .include_header(true)
                    .finish(frame)
                    .map_err(|e| e.to_string())?;
            }
        }
        Ok(())
    }
}

/// Put previous tables back after an aborted commit
fn restore(backups: &[(PathBuf, PathBuf)]) {
    for (backup, original) in backups {
        if let Err(e) = fs::rename(backup, original) {
            warn!(
                "Failed to restore {} from {}: {}",
                original.display(),
                backup.display(),
                e
            );
        }
    }
}

/// Best-effort removal of files from an aborted write
fn discard<'a>(paths: impl Iterator<Item = &'a Path>) {
    for path in paths {
        if path.exists() {
            if let Err(e) = fs::remove_file(path) {
                warn!("Failed to remove {}: {}", path.display(), e);
            }
        }
    }
}
