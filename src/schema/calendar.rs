//! Event date parsing and the date dimension
//!
//! Source dates are mostly written with Turkish month names (`15 Mayıs 2023`);
//! numeric `dd.mm.yyyy`, `dd/mm/yyyy` and ISO dates also occur.

use crate::aggregate::fold_lower;
use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

/// Month names as written in the source, with their ASCII spellings
const MONTHS: [(&[&str], u32); 12] = [
    (&["ocak"], 1),
    (&["şubat", "subat"], 2),
    (&["mart"], 3),
    (&["nisan"], 4),
    (&["mayıs", "mayis"], 5),
    (&["haziran"], 6),
    (&["temmuz"], 7),
    (&["ağustos", "agustos"], 8),
    (&["eylül", "eylul"], 9),
    (&["ekim"], 10),
    (&["kasım", "kasim"], 11),
    (&["aralık", "aralik"], 12),
];

const NUMERIC_FORMATS: [&str; 3] = ["%d.%m.%Y", "%d/%m/%Y", "%Y-%m-%d"];

/// Parse an event date; `None` for anything unrecognised
pub fn parse_event_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    parse_named_month(text).or_else(|| {
        NUMERIC_FORMATS
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
    })
}

fn parse_named_month(text: &str) -> Option<NaiveDate> {
    let mut parts = text.split_whitespace();
    let (day, month, year) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let month = month_number(month)?;
    NaiveDate::from_ymd_opt(year.parse().ok()?, month, day.parse().ok()?)
}

fn month_number(name: &str) -> Option<u32> {
    let name = fold_lower(name);
    MONTHS
        .iter()
        .find(|(spellings, _)| spellings.contains(&name.as_str()))
        .map(|&(_, number)| number)
}

/// Meteorological season of a month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

impl Season {
    pub fn of_month(month: u32) -> Self {
        match month {
            12 | 1 | 2 => Season::Winter,
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            _ => Season::Autumn,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Season::Winter => "Kış",
            Season::Spring => "İlkbahar",
            Season::Summer => "Yaz",
            Season::Autumn => "Sonbahar",
        }
    }
}

/// `YYYYMMDD` integer key for a date
pub fn date_key(date: NaiveDate) -> i32 {
    date.year() * 10_000 + date.month() as i32 * 100 + date.day() as i32
}

/// One row of the date dimension
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateRow {
    pub date_key: i32,
    pub full_date: NaiveDate,
}

impl DateRow {
    pub fn new(full_date: NaiveDate) -> Self {
        Self {
            date_key: date_key(full_date),
            full_date,
        }
    }

    pub fn year(&self) -> i32 {
        self.full_date.year()
    }

    pub fn quarter(&self) -> u32 {
        (self.full_date.month() - 1) / 3 + 1
    }

    pub fn month(&self) -> u32 {
        self.full_date.month()
    }

    pub fn month_name(&self) -> String {
        self.full_date.format("%B").to_string()
    }

    pub fn day(&self) -> u32 {
        self.full_date.day()
    }

    /// Monday = 1 .. Sunday = 7
    pub fn day_of_week(&self) -> u32 {
        self.full_date.weekday().number_from_monday()
    }

    pub fn day_name(&self) -> String {
        self.full_date.format("%A").to_string()
    }

    pub fn is_weekend(&self) -> bool {
        matches!(self.full_date.weekday(), Weekday::Sat | Weekday::Sun)
    }

    pub fn season(&self) -> Season {
        Season::of_month(self.month())
    }
}

/// Distinct dates sorted by key
pub fn build_date_dimension<I>(dates: I) -> Vec<DateRow>
where
    I: IntoIterator<Item = NaiveDate>,
{
    let mut dates: Vec<NaiveDate> = dates.into_iter().collect();
    dates.sort_unstable();
    dates.dedup();
    dates.into_iter().map(DateRow::new).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_turkish_month_names() {
        assert_eq!(parse_event_date("15 Mayıs 2023"), Some(ymd(2023, 5, 15)));
        assert_eq!(parse_event_date(" 3 Ağustos 2019 "), Some(ymd(2019, 8, 3)));
        assert_eq!(parse_event_date("1 Aralık 2020"), Some(ymd(2020, 12, 1)));
        assert_eq!(parse_event_date("28 Subat 2021"), Some(ymd(2021, 2, 28)));
        assert_eq!(parse_event_date("7 EKIM 2022"), Some(ymd(2022, 10, 7)));
        assert_eq!(parse_event_date("15 EKİM 2023"), Some(ymd(2023, 10, 15)));
        assert_eq!(parse_event_date("3 NİSAN 2022"), Some(ymd(2022, 4, 3)));
        assert_eq!(parse_event_date("9 MAYIS 2021"), Some(ymd(2021, 5, 9)));
        assert_eq!(parse_event_date("1 ŞUBAT 2020"), Some(ymd(2020, 2, 1)));
    }

    #[test]
    fn test_numeric_formats() {
        assert_eq!(parse_event_date("15.05.2023"), Some(ymd(2023, 5, 15)));
        assert_eq!(parse_event_date("15/05/2023"), Some(ymd(2023, 5, 15)));
        assert_eq!(parse_event_date("2023-05-15"), Some(ymd(2023, 5, 15)));
    }

    #[test]
    fn test_unrecognised_dates() {
        for text in ["", "Mayıs 2023", "31 Şubat 2023", "15 Foo 2023", "yesterday", "15 Mayıs 2023 10:00"] {
            assert_eq!(parse_event_date(text), None, "{text:?}");
        }
    }

    #[test]
    fn test_date_row_attributes() {
        // 2023-05-13 is a Saturday
        let row = DateRow::new(ymd(2023, 5, 13));
        assert_eq!(row.date_key, 20230513);
        assert_eq!(row.quarter(), 2);
        assert_eq!(row.month_name(), "May");
        assert_eq!(row.day_of_week(), 6);
        assert_eq!(row.day_name(), "Saturday");
        assert!(row.is_weekend());
        assert_eq!(row.season(), Season::Spring);
        assert_eq!(row.season().label(), "İlkbahar");
    }

    #[test]
    fn test_seasons() {
        assert_eq!(Season::of_month(12), Season::Winter);
        assert_eq!(Season::of_month(2), Season::Winter);
        assert_eq!(Season::of_month(7), Season::Summer);
        assert_eq!(Season::of_month(10), Season::Autumn);
    }

    #[test]
    fn test_date_dimension_is_sorted_and_distinct() {
        let rows = build_date_dimension([ymd(2023, 6, 1), ymd(2022, 1, 9), ymd(2023, 6, 1)]);
        let keys: Vec<_> = rows.iter().map(|r| r.date_key).collect();
        assert_eq!(keys, vec![20220109, 20230601]);
    }
}
