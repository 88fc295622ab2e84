//! Data types used by the aggregation pipeline.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::date::CalendarDay;

/// Case/death pair for one bucket (a day, a window, all time).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub cases: i64,
    pub deaths: i64,
}

impl Totals {
    pub(crate) fn add(&mut self, cases: i64, deaths: i64) {
        self.cases = self.cases.saturating_add(cases);
        self.deaths = self.deaths.saturating_add(deaths);
    }
}

/// Per-country running state for one `aggregate` call.
#[derive(Debug, Clone)]
pub(crate) struct CountryAccumulator {
    pub(crate) country: String,
    pub(crate) population: i64,
    pub(crate) all_time: Totals,
    pub(crate) in_period: Totals,
    pub(crate) daily: BTreeMap<CalendarDay, Totals>,
}

/// One row of the per-country summary table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryRow {
    pub country: String,
    pub cases_in_period: i64,
    pub deaths_in_period: i64,
    pub cases_total_all_time: i64,
    pub deaths_total_all_time: i64,
    pub cases_per_1000: f64,
    pub deaths_per_1000: f64,
    pub avg_cases_per_day: f64,
    pub avg_deaths_per_day: f64,
    pub max_cases_per_day: i64,
    pub max_deaths_per_day: i64,
    /// 0 when the source had no usable population.
    pub population: i64,
}

/// One day of the chart series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeSeriesPoint {
    /// `YYYY-MM-DD`
    pub date: String,
    pub cases: i64,
    pub deaths: i64,
}
