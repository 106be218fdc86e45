//! Data quality report.
//!
//! Computes a structured [`QualityReport`] from an assembled star schema and
//! renders it for the terminal. Rendering is only done on request; the
//! pipeline itself never prints.

use crate::classify::stats::percentage;
use crate::schema::{FactRow, ForeignKeyCoverage, StarSchema};
use colored::*;
use std::fmt::Write;

/// Number of athletes listed under top performers
pub const DEFAULT_TOP_PERFORMERS: usize = 10;

/// Range, mean and median of a set of values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Distribution {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
}

impl Distribution {
    /// `None` for an empty set
    pub fn from_values(mut values: Vec<f64>) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        values.sort_by(f64::total_cmp);

        let n = values.len();
        let median = if n % 2 == 0 {
            (values[n / 2 - 1] + values[n / 2]) / 2.0
        } else {
            values[n / 2]
        };

        Some(Self {
            min: values[0],
            max: values[n - 1],
            mean: values.iter().sum::<f64>() / n as f64,
            median,
        })
    }
}

/// Race time counts per duration band
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeBands {
    pub under_1_min: usize,
    pub from_1_to_2_min: usize,
    pub from_2_to_5_min: usize,
    pub from_5_to_10_min: usize,
    pub over_10_min: usize,
}

impl TimeBands {
    pub fn from_seconds(times: &[f64]) -> Self {
        let mut bands = Self::default();
        for &t in times {
            match t {
                t if t < 60.0 => bands.under_1_min += 1,
                t if t < 120.0 => bands.from_1_to_2_min += 1,
                t if t < 300.0 => bands.from_2_to_5_min += 1,
                t if t < 600.0 => bands.from_5_to_10_min += 1,
                _ => bands.over_10_min += 1,
            }
        }
        bands
    }

    pub fn entries(&self) -> [(&'static str, usize); 5] {
        [
            ("Under 1 min", self.under_1_min),
            ("1-2 min", self.from_1_to_2_min),
            ("2-5 min", self.from_2_to_5_min),
            ("5-10 min", self.from_5_to_10_min),
            ("Over 10 min", self.over_10_min),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TopPerformer {
    pub name: String,
    pub races: u32,
    pub wins: u32,
    pub podiums: u32,
}

/// Quality metrics over one assembled schema
#[derive(Debug, Clone, PartialEq)]
pub struct QualityReport {
    pub total_results: usize,
    pub valid_ranks: usize,
    pub valid_times: usize,
    pub both_valid: usize,
    pub dnf: usize,
    pub dns: usize,
    pub dsq: usize,
    pub ranks: Option<Distribution>,
    pub times: Option<Distribution>,
    pub time_bands: TimeBands,
    pub top_performers: Vec<TopPerformer>,
    pub coverage: ForeignKeyCoverage,
    pub table_sizes: Vec<(&'static str, usize)>,
}

impl QualityReport {
    pub fn from_schema(schema: &StarSchema, top_n: usize) -> Self {
        let facts = &schema.facts;
        let count = |flag: fn(&FactRow) -> bool| facts.iter().filter(|f| flag(f)).count();

        let ranks: Vec<f64> = facts
            .iter()
            .filter_map(|f| f.rank_position)
            .map(f64::from)
            .collect();
        let times: Vec<f64> = facts.iter().filter_map(|f| f.race_time_seconds).collect();

        // Stable sort keeps first-seen order among equal win counts
        let mut by_wins: Vec<_> = schema
            .athletes
            .iter()
            .filter(|row| row.summary.total_wins > 0)
            .collect();
        by_wins.sort_by(|a, b| b.summary.total_wins.cmp(&a.summary.total_wins));
        let top_performers = by_wins
            .into_iter()
            .take(top_n)
            .map(|row| TopPerformer {
                name: row.summary.key.to_string(),
                races: row.summary.total_races,
                wins: row.summary.total_wins,
                podiums: row.summary.total_podiums,
            })
            .collect();

        Self {
            total_results: facts.len(),
            valid_ranks: count(|f| f.has_valid_rank),
            valid_times: count(|f| f.has_valid_time),
            both_valid: count(|f| f.has_valid_rank && f.has_valid_time),
            dnf: count(|f| f.dnf_flag),
            dns: count(|f| f.dns_flag),
            dsq: count(|f| f.dsq_flag),
            time_bands: TimeBands::from_seconds(&times),
            ranks: Distribution::from_values(ranks),
            times: Distribution::from_values(times),
            top_performers,
            coverage: schema.coverage,
            table_sizes: schema.table_sizes(),
        }
    }

    pub fn incidents(&self) -> usize {
        self.dnf + self.dns + self.dsq
    }

    fn rate(&self, part: usize) -> f64 {
        percentage(part, self.total_results)
    }

    /// Human-readable, colored rendering
    pub fn render(&self) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail
        let _ = self.write_to(&mut out);
        out
    }

    fn write_to(&self, out: &mut String) -> std::fmt::Result {
        writeln!(out, "{}", "Data Quality Report".bright_green().bold())?;

        writeln!(out, "\n{}", "Tables".bright_yellow())?;
        for (table, rows) in &self.table_sizes {
            writeln!(out, "  {:<20} {}", table.bright_cyan(), rows.to_string().bright_white())?;
        }

        writeln!(out, "\n{}", "Classification".bright_yellow())?;
        for (label, value) in [
            ("Valid ranks:", self.valid_ranks),
            ("Valid times:", self.valid_times),
            ("Both valid:", self.both_valid),
            ("DNF:", self.dnf),
            ("DNS:", self.dns),
            ("DSQ:", self.dsq),
            ("Total incidents:", self.incidents()),
        ] {
            writeln!(
                out,
                "  {:<17} {} ({:.1}%)",
                label.bright_cyan(),
                value.to_string().bright_white(),
                self.rate(value)
            )?;
        }

        if let Some(ranks) = &self.ranks {
            writeln!(out, "\n{}", "Ranks".bright_yellow())?;
            writeln!(out, "  {} {:.0} - {:.0}", "Range:".bright_cyan(), ranks.min, ranks.max)?;
            writeln!(out, "  {} {:.1}", "Average:".bright_cyan(), ranks.mean)?;
            writeln!(out, "  {} {:.1}", "Median:".bright_cyan(), ranks.median)?;
        }

        if let Some(times) = &self.times {
            writeln!(out, "\n{}", "Race times".bright_yellow())?;
            writeln!(out, "  {} {:.2}s - {:.2}s", "Range:".bright_cyan(), times.min, times.max)?;
            writeln!(
                out,
                "  {} {:.2}s ({:.1} min)",
                "Average:".bright_cyan(),
                times.mean,
                times.mean / 60.0
            )?;
            writeln!(
                out,
                "  {} {:.2}s ({:.1} min)",
                "Median:".bright_cyan(),
                times.median,
                times.median / 60.0
            )?;
            let timed = self.valid_times;
            for (label, value) in self.time_bands.entries() {
                writeln!(
                    out,
                    "    {:<12} {} ({:.1}%)",
                    label,
                    value,
                    percentage(value, timed)
                )?;
            }
        }

        if !self.top_performers.is_empty() {
            writeln!(out, "\n{}", "Top performers".bright_yellow())?;
            for (i, athlete) in self.top_performers.iter().enumerate() {
                let name: String = athlete.name.chars().take(30).collect();
                writeln!(
                    out,
                    "  {:2}. {:<30} | {:3} races | {:2} wins | {:2} podiums",
                    i + 1,
                    name,
                    athlete.races,
                    athlete.wins,
                    athlete.podiums
                )?;
            }
        }

        writeln!(out, "\n{}", "Foreign key coverage".bright_yellow())?;
        for (column, matched) in self.coverage.entries() {
            let rate = self.coverage.rate(matched);
            let line = format!("{:<13} {}/{} ({:.1}%)", column, matched, self.coverage.total_rows, rate);
            if matched == self.coverage.total_rows {
                writeln!(out, "  {}", line.bright_green())?;
            } else {
                writeln!(out, "  {}", line.bright_red())?;
            }
        }

        Ok(())
    }
}
