//! Report-date parsing and calendar-day arithmetic.
//!
//! Dates in the dataset are `DD/MM/YYYY` (the `-` separator is accepted too).
//! They are normalized into [`CalendarDay`], a plain year/month/day value with
//! no time-of-day and no timezone, so the same string maps to the same day
//! wherever the code runs.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::record::CovidRecord;

/// A date normalized to a whole day. Ordered and compared by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarDay(NaiveDate);

impl CalendarDay {
    /// Builds a day from integer components, `None` if it is not a real date.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(CalendarDay)
    }

    /// Canonical `YYYY-MM-DD` key. Sorting keys lexicographically sorts days chronologically.
    pub fn key(&self) -> String {
        format!(
            "{:04}-{:02}-{:02}",
            self.0.year(),
            self.0.month(),
            self.0.day()
        )
    }

    /// Parses a canonical `YYYY-MM-DD` key back into a day.
    pub fn from_key(key: &str) -> EngineResult<Self> {
        let key = key.trim();
        let bytes = key.as_bytes();
        if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
            return Err(EngineError::malformed(key, "expected YYYY-MM-DD"));
        }
        let (Some(year), Some(month), Some(day)) =
            (digits(&key[0..4]), digits(&key[5..7]), digits(&key[8..10]))
        else {
            return Err(EngineError::malformed(key, "expected YYYY-MM-DD"));
        };
        build_day(key, year as i32, month, day)
    }
}

impl fmt::Display for CalendarDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// Parses a report date (`DD/MM/YYYY` or `DD-MM-YYYY`).
///
/// # Errors
///
/// [`EngineError::MalformedDate`] when the text does not match the pattern,
/// the month is outside 1-12, the day is outside 1-31, or the combination is
/// not a real date (e.g. `31/02/2020`).
pub fn parse_api_date(text: &str) -> EngineResult<CalendarDay> {
    let trimmed = text.trim();
    let bytes = trimmed.as_bytes();
    let is_sep = |b: u8| b == b'/' || b == b'-';

    if bytes.len() != 10 || !is_sep(bytes[2]) || !is_sep(bytes[5]) {
        return Err(EngineError::malformed(
            text,
            "expected DD/MM/YYYY or DD-MM-YYYY",
        ));
    }

    let (Some(day), Some(month), Some(year)) = (
        digits(&trimmed[0..2]),
        digits(&trimmed[3..5]),
        digits(&trimmed[6..10]),
    ) else {
        return Err(EngineError::malformed(
            text,
            "expected DD/MM/YYYY or DD-MM-YYYY",
        ));
    };

    build_day(text, year as i32, month, day)
}

fn build_day(input: &str, year: i32, month: u32, day: u32) -> EngineResult<CalendarDay> {
    if !(1..=12).contains(&month) {
        return Err(EngineError::malformed(input, format!("month {month} out of range")));
    }
    if !(1..=31).contains(&day) {
        return Err(EngineError::malformed(input, format!("day {day} out of range")));
    }
    CalendarDay::from_ymd(year, month, day)
        .ok_or_else(|| EngineError::malformed(input, "not a calendar date"))
}

/// ASCII digits only; `str::parse` alone would accept a leading `+`.
fn digits(part: &str) -> Option<u32> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

/// Earliest and latest report day of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateBounds {
    pub min: CalendarDay,
    pub max: CalendarDay,
}

/// Computes the min and max report day across `records`.
///
/// # Errors
///
/// [`EngineError::EmptyDataset`] on an empty slice, [`EngineError::MalformedDate`]
/// if any record's date does not parse.
pub fn date_bounds(records: &[CovidRecord]) -> EngineResult<DateBounds> {
    let (first, rest) = records.split_first().ok_or(EngineError::EmptyDataset)?;

    let start = parse_api_date(&first.date_rep)?;
    let mut bounds = DateBounds {
        min: start,
        max: start,
    };

    for record in rest {
        let day = parse_api_date(&record.date_rep)?;
        bounds.min = bounds.min.min(day);
        bounds.max = bounds.max.max(day);
    }

    Ok(bounds)
}

/// Inclusive `[from, to]` window. `from > to` is valid and matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: CalendarDay,
    pub to: CalendarDay,
}

impl DateRange {
    pub fn new(from: CalendarDay, to: CalendarDay) -> Self {
        DateRange { from, to }
    }

    /// The range spanning the whole dataset.
    pub fn full_span(bounds: DateBounds) -> Self {
        DateRange::new(bounds.min, bounds.max)
    }

    pub fn contains(&self, day: CalendarDay) -> bool {
        self.from <= day && day <= self.to
    }

    /// True when the range differs from the dataset's full span. Compared by value.
    pub fn is_custom(&self, bounds: DateBounds) -> bool {
        *self != DateRange::full_span(bounds)
    }

    /// Number of calendar days covered, 0 for an inverted range.
    pub fn len_days(&self) -> i64 {
        if self.from > self.to {
            0
        } else {
            (self.to.0 - self.from.0).num_days() + 1
        }
    }
}
