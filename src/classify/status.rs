//! Status code detection for the result column
//!
//! A result cell may hold a status instead of a time. Status detection runs
//! before duration parsing so that codes are never misread as partial numbers.

use crate::aggregate::fold_upper;
use crate::config::StatusKeywords;
use crate::models::IncidentStatus;

/// Substring matcher for DNF / DNS / DSQ keywords.
///
/// Keywords are upper-cased once at construction, with `İ` folded to `I` on
/// both sides so either Turkish spelling matches; blank keywords are dropped
/// because an empty needle would match every value.
#[derive(Debug, Clone)]
pub struct StatusClassifier {
    dnf: Vec<String>,
    dns: Vec<String>,
    dsq: Vec<String>,
}

impl StatusClassifier {
    pub fn new(keywords: &StatusKeywords) -> Self {
        Self {
            dnf: normalize_keywords(&keywords.dnf),
            dns: normalize_keywords(&keywords.dns),
            dsq: normalize_keywords(&keywords.dsq),
        }
    }

    /// Detect a status code in a free-text value.
    ///
    /// Checks DNF, then DNS, then DSQ; the first set with a keyword contained
    /// in the trimmed, upper-cased value wins. `None` means the caller should
    /// go on to numeric parsing.
    pub fn classify(&self, value: &str) -> Option<IncidentStatus> {
        let normalized = fold_upper(value.trim());
        if normalized.is_empty() {
            return None;
        }

        [
            (IncidentStatus::Dnf, &self.dnf),
            (IncidentStatus::Dns, &self.dns),
            (IncidentStatus::Dsq, &self.dsq),
        ]
        .into_iter()
        .find(|(_, keywords)| {
            keywords
                .iter()
                .any(|keyword| normalized.contains(keyword.as_str()))
        })
        .map(|(status, _)| status)
    }
}

impl Default for StatusClassifier {
    fn default() -> Self {
        Self::new(&StatusKeywords::default())
    }
}

fn normalize_keywords(keywords: &[String]) -> Vec<String> {
    keywords
        .iter()
        .map(|keyword| fold_upper(keyword.trim()))
        .filter(|keyword| !keyword.is_empty())
        .collect()
}
