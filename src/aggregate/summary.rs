//! Per-entity summary statistics and their accumulator

use super::key::EntityKey;
use crate::classify::stats::percentage;
use crate::constants::rank_bounds;
use crate::models::ClassifiedRecord;
use serde::Serialize;

/// Career statistics for one athlete or team.
///
/// Rank statistics only consider records with a valid rank; incident counts
/// come from the time outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntitySummary {
    pub key: EntityKey,
    pub total_races: u32,
    pub total_races_with_rank: u32,
    pub races_with_time: u32,
    pub total_wins: u32,
    pub total_podiums: u32,
    /// Lowest finishing position; `None` without any valid rank
    pub best_rank: Option<u32>,
    /// Mean finishing position; `None` without any valid rank
    pub avg_rank: Option<f64>,
    pub total_dnf: u32,
    pub total_dns: u32,
    pub total_dsq: u32,
}

pub type AthleteSummary = EntitySummary;
pub type TeamSummary = EntitySummary;

impl EntitySummary {
    /// Wins as a percentage of all races
    pub fn win_rate(&self) -> f64 {
        percentage(self.total_wins as usize, self.total_races as usize)
    }

    /// Podium finishes as a percentage of all races
    pub fn podium_rate(&self) -> f64 {
        percentage(self.total_podiums as usize, self.total_races as usize)
    }

    pub fn total_incidents(&self) -> u32 {
        self.total_dnf + self.total_dns + self.total_dsq
    }
}

/// Running totals for one key
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryAccumulator {
    total: u32,
    with_rank: u32,
    with_time: u32,
    wins: u32,
    podiums: u32,
    rank_sum: u64,
    best_rank: Option<u32>,
    dnf: u32,
    dns: u32,
    dsq: u32,
}

impl SummaryAccumulator {
    pub fn add(&mut self, record: &ClassifiedRecord) {
        self.total += 1;

        if let Some(rank) = record.rank {
            self.with_rank += 1;
            self.rank_sum += u64::from(rank);
            self.best_rank = Some(self.best_rank.map_or(rank, |best| best.min(rank)));
            if rank == rank_bounds::MIN {
                self.wins += 1;
            }
            if rank <= rank_bounds::PODIUM_MAX {
                self.podiums += 1;
            }
        }

        if record.has_valid_time() {
            self.with_time += 1;
        }
        if record.is_dnf() {
            self.dnf += 1;
        }
        if record.is_dns() {
            self.dns += 1;
        }
        if record.is_dsq() {
            self.dsq += 1;
        }
    }

    /// Combine totals accumulated over another partition of the same key
    pub fn merge(&mut self, other: &SummaryAccumulator) {
        self.total += other.total;
        self.with_rank += other.with_rank;
        self.with_time += other.with_time;
        self.wins += other.wins;
        self.podiums += other.podiums;
        self.rank_sum += other.rank_sum;
        self.best_rank = match (self.best_rank, other.best_rank) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.dnf += other.dnf;
        self.dns += other.dns;
        self.dsq += other.dsq;
    }

    pub fn finish(self, key: EntityKey) -> EntitySummary {
        let avg_rank = (self.with_rank > 0).then(|| self.rank_sum as f64 / self.with_rank as f64);

        EntitySummary {
            key,
            total_races: self.total,
            total_races_with_rank: self.with_rank,
            races_with_time: self.with_time,
            total_wins: self.wins,
            total_podiums: self.podiums,
            best_rank: self.best_rank,
            avg_rank,
            total_dnf: self.dnf,
            total_dns: self.dns,
            total_dsq: self.dsq,
        }
    }
}
