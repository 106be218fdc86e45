//! Record classification for rowing results
//!
//! The two free-text result columns are resolved into typed, mutually
//! exclusive outcomes here. Everything downstream reads these outcomes and
//! never re-parses source text.
//!
//! ## Architecture
//!
//! - [`duration`] - Race time parsing with range-gated, ordered patterns
//! - [`status`] - DNF / DNS / DSQ keyword detection
//! - [`record`] - Per-record classification of the rank and result columns
//! - [`stats`] - Outcome tallies over a classified record set
//!
//! ## Usage
//!
//! ```rust
//! use rowing_star::classify::RecordClassifier;
//! use rowing_star::models::{OutcomeKind, RawRecord};
//!
//! let classifier = RecordClassifier::default();
//! let raw = RawRecord {
//!     athlete: Some("Ayşe Yılmaz".to_string()),
//!     rank: Some("1".to_string()),
//!     result: Some("1.41,97".to_string()),
//!     ..RawRecord::default()
//! };
//!
//! let classified = classifier.classify(&raw);
//! assert_eq!(classified.rank, Some(1));
//! assert_eq!(classified.time_outcome, OutcomeKind::Valid);
//! ```

pub mod duration;
pub mod record;
pub mod stats;
pub mod status;

#[cfg(test)]
pub mod tests;

pub use duration::parse_duration;
pub use record::{RecordClassifier, parse_rank};
pub use stats::ClassificationStats;
pub use status::StatusClassifier;
