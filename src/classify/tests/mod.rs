//! Tests for the classification module
//!
//! Covers duration parsing, status detection, record classification and the
//! outcome tallies.


use crate::models::RawRecord;

/// Build a raw record with only the rank and result columns set
pub fn raw_with(rank: Option<&str>, result: Option<&str>) -> RawRecord {
    RawRecord {
        athlete: Some("Test Sporcu".to_string()),
        team: Some("Test Kürek Kulübü".to_string()),
        rank: rank.map(str::to_string),
        result: result.map(str::to_string),
        ..RawRecord::default()
    }
}

/// Assert two durations are equal to within float noise
pub fn assert_seconds(actual: Option<f64>, expected: f64) {
    let actual = actual.unwrap_or_else(|| panic!("expected {} seconds, got none", expected));
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {} seconds, got {}",
        expected,
        actual
    );
}

/// Assorted inputs that must never panic and must classify to something
pub const HOSTILE_INPUTS: &[&str] = &[
    "",
    "   ",
    "\t\n",
    ".",
    "..",
    "1..2",
    ",,,",
    "-",
    "-45.00",
    "NaN",
    "inf",
    "-inf",
    "1e3",
    "99999999999999999999999999.99",
    "1.2.3.4",
    "١٢٣",
    "🚣",
    "İıŞşĞğ",
    "Ｄ Ｎ Ｆ",
    "0",
    "00.00.00",
    "12:34.56",
    "\u{0}",
];
