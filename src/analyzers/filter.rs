//! Filters shared by the summary table and the time series.
//!
//! Filters arrive as text (form fields, CLI flags, a JSON file). They are
//! normalized here once, so the engine only ever sees typed values.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::analyzers::types::SummaryRow;
use crate::date::DateRange;

/// Which summary column the numeric min/max filter applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "camelCase")]
#[value(rename_all = "camelCase")]
pub enum NumericField {
    /// Cases in the selected period.
    #[default]
    Cases,
    /// Deaths in the selected period.
    Deaths,
    CasesPer1000,
    DeathsPer1000,
}

impl NumericField {
    pub fn value_of(self, row: &SummaryRow) -> f64 {
        match self {
            NumericField::Cases => row.cases_in_period as f64,
            NumericField::Deaths => row.deaths_in_period as f64,
            NumericField::CasesPer1000 => row.cases_per_1000,
            NumericField::DeathsPer1000 => row.deaths_per_1000,
        }
    }
}

/// Parses a bound typed by the user.
///
/// Blank text, text that is not a number, and non-finite numbers all mean
/// "no bound".
pub fn parse_bound(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Min/max constraint on one numeric column. `None` bounds are inactive.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct NumericFilter {
    pub field: NumericField,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl NumericFilter {
    pub fn new(field: NumericField, min: Option<f64>, max: Option<f64>) -> Self {
        NumericFilter { field, min, max }
    }

    /// Builds a filter from raw bound text, see [`parse_bound`].
    pub fn from_text(field: NumericField, min: &str, max: &str) -> Self {
        NumericFilter::new(field, parse_bound(min), parse_bound(max))
    }

    pub fn is_active(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    pub fn matches(&self, row: &SummaryRow) -> bool {
        let value = self.field.value_of(row);
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

/// Everything the engine needs to know about the current selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterSpec {
    pub date_range: DateRange,
    /// Case-insensitive substring of the country name; blank keeps everything.
    pub country_query: String,
    pub numeric: NumericFilter,
}

impl FilterSpec {
    /// A spec that only restricts the date window.
    pub fn for_range(date_range: DateRange) -> Self {
        FilterSpec {
            date_range,
            country_query: String::new(),
            numeric: NumericFilter::default(),
        }
    }

    pub fn with_country_query(mut self, query: &str) -> Self {
        self.country_query = query.to_string();
        self
    }

    pub fn with_numeric(mut self, numeric: NumericFilter) -> Self {
        self.numeric = numeric;
        self
    }

    /// Lowercased, trimmed query, `None` when blank.
    pub(crate) fn normalized_query(&self) -> Option<String> {
        let query = self.country_query.trim();
        (!query.is_empty()).then(|| query.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::CalendarDay;

    fn row(cases: i64, cases_per_1000: f64) -> SummaryRow {
        SummaryRow {
            country: "X".into(),
            cases_in_period: cases,
            cases_per_1000,
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_bound() {
        assert_eq!(parse_bound(""), None);
        assert_eq!(parse_bound("   "), None);
        assert_eq!(parse_bound("abc"), None);
        assert_eq!(parse_bound("NaN"), None);
        assert_eq!(parse_bound("inf"), None);
        assert_eq!(parse_bound("-infinity"), None);
        assert_eq!(parse_bound("12"), Some(12.0));
        assert_eq!(parse_bound(" 0.5 "), Some(0.5));
        assert_eq!(parse_bound("-3"), Some(-3.0));
        assert_eq!(parse_bound("1e3"), Some(1000.0));
    }

    #[test]
    fn test_inactive_filter_matches_everything() {
        let filter = NumericFilter::from_text(NumericField::Cases, "", "oops");
        assert!(!filter.is_active());
        assert!(filter.matches(&row(-5, 0.0)));
        assert!(filter.matches(&row(1_000_000, 0.0)));
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let filter = NumericFilter::from_text(NumericField::Cases, "10", "20");
        assert!(filter.matches(&row(10, 0.0)));
        assert!(filter.matches(&row(20, 0.0)));
        assert!(!filter.matches(&row(9, 0.0)));
        assert!(!filter.matches(&row(21, 0.0)));
    }

    #[test]
    fn test_field_selection() {
        let filter = NumericFilter::new(NumericField::CasesPer1000, Some(0.1), None);
        assert!(filter.matches(&row(0, 0.15)));
        assert!(!filter.matches(&row(1_000, 0.05)));
    }

    #[test]
    fn test_field_names_match_payload() {
        let field: NumericField = serde_json::from_str("\"deathsPer1000\"").unwrap();
        assert_eq!(field, NumericField::DeathsPer1000);
        assert_eq!(
            NumericField::from_str("casesPer1000", false).unwrap(),
            NumericField::CasesPer1000
        );
    }

    #[test]
    fn test_normalized_query() {
        let day = CalendarDay::from_ymd(2020, 1, 1).unwrap();
        let spec = FilterSpec::for_range(DateRange::new(day, day));
        assert_eq!(spec.normalized_query(), None);
        assert_eq!(
            spec.clone().with_country_query("   ").normalized_query(),
            None
        );
        assert_eq!(
            spec.with_country_query("  SpA ").normalized_query(),
            Some("spa".to_string())
        );
    }
}
