use anyhow::{Context, Result};
use serde::Deserialize;

use covid_stats::analyzers::{FilterSpec, NumericField, NumericFilter};
use covid_stats::date::{CalendarDay, DateBounds, DateRange, parse_api_date};

/// Numeric filter as typed into the form: bounds stay text until resolved.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NumericFilterText {
    pub field: NumericField,
    pub min: String,
    pub max: String,
}

/// A saved filter selection.
///
/// Stored as a JSON object on disk, every key optional:
/// ```json
/// {
///   "from": "01/03/2020",
///   "to": "2020-06-30",
///   "countryQuery": "united",
///   "numericFilter": { "field": "casesPer1000", "min": "1", "max": "" },
///   "selectedCountry": "Spain"
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterFile {
    pub from: Option<String>,
    pub to: Option<String>,
    pub country_query: Option<String>,
    pub numeric_filter: Option<NumericFilterText>,
    pub selected_country: Option<String>,
}

impl FilterFile {
    /// Loads the filter file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read filter file {path}"))?;
        let file: FilterFile = serde_json::from_str(&content)
            .with_context(|| format!("invalid filter file {path}"))?;
        Ok(file)
    }
}

/// Values given on the command line; each one replaces the file's value.
#[derive(Debug, Clone, Default)]
pub struct FilterOverrides {
    pub from: Option<String>,
    pub to: Option<String>,
    pub country_query: Option<String>,
    pub field: Option<NumericField>,
    pub min: Option<String>,
    pub max: Option<String>,
}

/// Parses a date given by a user: dataset format (`DD/MM/YYYY`) or `YYYY-MM-DD`.
pub fn parse_cli_date(text: &str) -> Result<CalendarDay> {
    parse_api_date(text)
        .or_else(|_| CalendarDay::from_key(text))
        .with_context(|| format!("invalid date \"{text}\", expected DD/MM/YYYY or YYYY-MM-DD"))
}

/// Merges file and command-line filters into a [`FilterSpec`].
///
/// A missing `from`/`to` falls back to the dataset bounds, so the default
/// window covers the full span.
pub fn resolve_filter(
    file: &FilterFile,
    overrides: &FilterOverrides,
    bounds: DateBounds,
) -> Result<FilterSpec> {
    let full = DateRange::full_span(bounds);

    let from = match overrides.from.as_ref().or(file.from.as_ref()) {
        Some(text) => parse_cli_date(text)?,
        None => full.from,
    };
    let to = match overrides.to.as_ref().or(file.to.as_ref()) {
        Some(text) => parse_cli_date(text)?,
        None => full.to,
    };

    let country_query = overrides
        .country_query
        .clone()
        .or_else(|| file.country_query.clone())
        .unwrap_or_default();

    let saved = file.numeric_filter.clone().unwrap_or_default();
    let field = overrides.field.unwrap_or(saved.field);
    let min = overrides.min.as_deref().unwrap_or(&saved.min);
    let max = overrides.max.as_deref().unwrap_or(&saved.max);

    Ok(FilterSpec::for_range(DateRange::new(from, to))
        .with_country_query(&country_query)
        .with_numeric(NumericFilter::from_text(field, min, max)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    fn day(y: i32, m: u32, d: u32) -> CalendarDay {
        CalendarDay::from_ymd(y, m, d).unwrap()
    }

    fn bounds() -> DateBounds {
        DateBounds {
            min: day(2019, 12, 31),
            max: day(2020, 12, 14),
        }
    }

    #[test]
    fn test_parse_cli_date_accepts_both_formats() {
        assert_eq!(parse_cli_date("01/03/2020").unwrap(), day(2020, 3, 1));
        assert_eq!(parse_cli_date("2020-03-01").unwrap(), day(2020, 3, 1));
        assert!(parse_cli_date("March 1st").is_err());
    }

    #[test]
    fn test_defaults_to_full_span() {
        let spec =
            resolve_filter(&FilterFile::default(), &FilterOverrides::default(), bounds()).unwrap();
        assert_eq!(spec.date_range, DateRange::full_span(bounds()));
        assert!(!spec.date_range.is_custom(bounds()));
        assert_eq!(spec.country_query, "");
        assert!(!spec.numeric.is_active());
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let file: FilterFile = serde_json::from_str(
            r#"{
                "from": "01/03/2020",
                "countryQuery": "united",
                "numericFilter": {"field": "casesPer1000", "min": "1", "max": "5"}
            }"#,
        )
        .unwrap();
        let overrides = FilterOverrides {
            to: Some("2020-06-30".into()),
            country_query: Some("spain".into()),
            max: Some("".into()),
            ..Default::default()
        };

        let spec = resolve_filter(&file, &overrides, bounds()).unwrap();
        assert_eq!(spec.date_range, DateRange::new(day(2020, 3, 1), day(2020, 6, 30)));
        assert_eq!(spec.country_query, "spain");
        assert_eq!(spec.numeric.field, NumericField::CasesPer1000);
        assert_eq!(spec.numeric.min, Some(1.0));
        assert_eq!(spec.numeric.max, None);
    }

    #[test]
    fn test_bad_date_is_an_error() {
        let overrides = FilterOverrides {
            from: Some("31/02/2020".into()),
            ..Default::default()
        };
        assert!(resolve_filter(&FilterFile::default(), &overrides, bounds()).is_err());
    }

    #[test]
    fn test_load_filter_file() {
        let path = env::temp_dir().join("covid_stats_test_filters.json");
        fs::write(&path, r#"{"selectedCountry": "Spain", "numericFilter": {"min": "10"}}"#).unwrap();

        let file = FilterFile::load(path.to_str().unwrap()).unwrap();
        assert_eq!(file.selected_country.as_deref(), Some("Spain"));
        let numeric = file.numeric_filter.unwrap();
        assert_eq!(numeric.field, NumericField::Cases);
        assert_eq!(numeric.min, "10");
        assert_eq!(numeric.max, "");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_missing_file() {
        assert!(FilterFile::load("/nonexistent/covid_stats_filters.json").is_err());
    }
}
