use std::collections::{BTreeMap, HashMap, HashSet};

use crate::analyzers::filter::FilterSpec;
use crate::analyzers::types::{CountryAccumulator, SummaryRow, Totals};
use crate::analyzers::utility::{collate, per_day, per_thousand, safe_population};
use crate::date::parse_api_date;
use crate::error::EngineResult;
use crate::record::CovidRecord;

/// Aggregates daily records into one [`SummaryRow`] per country.
///
/// All-time totals ignore the date window; every other metric is restricted to
/// `filter.date_range`. Rows are then narrowed by the country query and the
/// numeric filter and sorted by country name.
///
/// # Errors
///
/// Fails with [`crate::error::EngineError::MalformedDate`] if any record's
/// date does not parse, including records outside the window.
pub fn aggregate(records: &[CovidRecord], filter: &FilterSpec) -> EngineResult<Vec<SummaryRow>> {
    let mut accumulators: HashMap<&str, CountryAccumulator> = HashMap::new();

    for record in records {
        let day = parse_api_date(&record.date_rep)?;

        let bucket = accumulators
            .entry(record.country.as_str())
            .or_insert_with(|| CountryAccumulator {
                country: record.country.clone(),
                population: safe_population(record.population),
                all_time: Totals::default(),
                in_period: Totals::default(),
                daily: BTreeMap::new(),
            });

        bucket.all_time.add(record.cases, record.deaths);

        if filter.date_range.contains(day) {
            bucket.in_period.add(record.cases, record.deaths);
            bucket
                .daily
                .entry(day)
                .or_default()
                .add(record.cases, record.deaths);
        }
    }

    let query = filter.normalized_query();

    let mut rows: Vec<SummaryRow> = accumulators
        .into_values()
        .map(finalize)
        .filter(|row| match &query {
            Some(q) => row.country.to_lowercase().contains(q.as_str()),
            None => true,
        })
        .filter(|row| filter.numeric.matches(row))
        .collect();

    rows.sort_by(|a, b| collate(&a.country, &b.country));

    Ok(rows)
}

fn finalize(acc: CountryAccumulator) -> SummaryRow {
    let days = acc.daily.len();
    let max_cases_per_day = acc.daily.values().map(|t| t.cases).max().unwrap_or(0);
    let max_deaths_per_day = acc.daily.values().map(|t| t.deaths).max().unwrap_or(0);

    SummaryRow {
        cases_in_period: acc.in_period.cases,
        deaths_in_period: acc.in_period.deaths,
        cases_total_all_time: acc.all_time.cases,
        deaths_total_all_time: acc.all_time.deaths,
        cases_per_1000: per_thousand(acc.in_period.cases, acc.population),
        deaths_per_1000: per_thousand(acc.in_period.deaths, acc.population),
        avg_cases_per_day: per_day(acc.in_period.cases, days),
        avg_deaths_per_day: per_day(acc.in_period.deaths, days),
        max_cases_per_day,
        max_deaths_per_day,
        population: acc.population,
        country: acc.country,
    }
}

/// Distinct country names in collation order (options for a country selector).
pub fn list_countries(records: &[CovidRecord]) -> Vec<String> {
    let mut countries: Vec<String> = records
        .iter()
        .map(|r| r.country.as_str())
        .collect::<HashSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect();
    countries.sort_by(|a, b| collate(a, b));
    countries
}
