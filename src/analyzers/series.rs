use std::collections::BTreeMap;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::analyzers::filter::FilterSpec;
use crate::analyzers::types::{TimeSeriesPoint, Totals};
use crate::date::parse_api_date;
use crate::error::EngineResult;
use crate::record::CovidRecord;

/// How chart values are presented over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SeriesMode {
    /// Per-day sums.
    #[default]
    Daily,
    /// Running totals since the start of the window.
    Cumulative,
}

/// Builds a per-day case/death series for the filter's date range.
///
/// `selected_country` restricts the series to one country by exact name; an
/// empty or blank selection sums all countries per day. The country query and
/// numeric filter of `filter` do not apply here.
///
/// # Errors
///
/// Fails with [`crate::error::EngineError::MalformedDate`] if any record's
/// date does not parse.
pub fn build_series(
    records: &[CovidRecord],
    filter: &FilterSpec,
    selected_country: Option<&str>,
) -> EngineResult<Vec<TimeSeriesPoint>> {
    let selected = selected_country.map(str::trim).filter(|c| !c.is_empty());

    // Day keys sort chronologically, so the map yields points in order.
    let mut grouped: BTreeMap<String, Totals> = BTreeMap::new();

    for record in records {
        let day = parse_api_date(&record.date_rep)?;
        if !filter.date_range.contains(day) {
            continue;
        }
        if let Some(country) = selected {
            if record.country != country {
                continue;
            }
        }
        grouped
            .entry(day.key())
            .or_default()
            .add(record.cases, record.deaths);
    }

    Ok(grouped
        .into_iter()
        .map(|(date, totals)| TimeSeriesPoint {
            date,
            cases: totals.cases,
            deaths: totals.deaths,
        })
        .collect())
}

/// [`build_series`] followed by the transform for `mode`.
pub fn build_series_with_mode(
    records: &[CovidRecord],
    filter: &FilterSpec,
    selected_country: Option<&str>,
    mode: SeriesMode,
) -> EngineResult<Vec<TimeSeriesPoint>> {
    let daily = build_series(records, filter, selected_country)?;
    Ok(match mode {
        SeriesMode::Daily => daily,
        SeriesMode::Cumulative => cumulative(&daily),
    })
}

/// Running totals over a chronologically sorted daily series.
pub fn cumulative(points: &[TimeSeriesPoint]) -> Vec<TimeSeriesPoint> {
    let mut running = Totals::default();
    points
        .iter()
        .map(|p| {
            running.add(p.cases, p.deaths);
            TimeSeriesPoint {
                date: p.date.clone(),
                cases: running.cases,
                deaths: running.deaths,
            }
        })
        .collect()
}
