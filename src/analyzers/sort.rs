//! Column sorting for summary rows.

use std::cmp::Ordering;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::analyzers::types::SummaryRow;
use crate::analyzers::utility::collate;

/// Sortable summary column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "camelCase")]
#[value(rename_all = "camelCase")]
pub enum SortKey {
    Country,
    CasesInPeriod,
    DeathsInPeriod,
    CasesTotalAllTime,
    DeathsTotalAllTime,
    CasesPer1000,
    DeathsPer1000,
    AvgCasesPerDay,
    AvgDeathsPerDay,
    MaxCasesPerDay,
    MaxDeathsPerDay,
    Population,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

impl SortKey {
    fn compare(self, a: &SummaryRow, b: &SummaryRow) -> Ordering {
        match self {
            SortKey::Country => collate(&a.country, &b.country),
            SortKey::CasesInPeriod => a.cases_in_period.cmp(&b.cases_in_period),
            SortKey::DeathsInPeriod => a.deaths_in_period.cmp(&b.deaths_in_period),
            SortKey::CasesTotalAllTime => a.cases_total_all_time.cmp(&b.cases_total_all_time),
            SortKey::DeathsTotalAllTime => a.deaths_total_all_time.cmp(&b.deaths_total_all_time),
            SortKey::CasesPer1000 => a.cases_per_1000.total_cmp(&b.cases_per_1000),
            SortKey::DeathsPer1000 => a.deaths_per_1000.total_cmp(&b.deaths_per_1000),
            SortKey::AvgCasesPerDay => a.avg_cases_per_day.total_cmp(&b.avg_cases_per_day),
            SortKey::AvgDeathsPerDay => a.avg_deaths_per_day.total_cmp(&b.avg_deaths_per_day),
            SortKey::MaxCasesPerDay => a.max_cases_per_day.cmp(&b.max_cases_per_day),
            SortKey::MaxDeathsPerDay => a.max_deaths_per_day.cmp(&b.max_deaths_per_day),
            SortKey::Population => a.population.cmp(&b.population),
        }
    }
}

/// Stable re-sort of `rows` by one column. Equal values keep their prior order.
pub fn sort_rows(rows: &mut [SummaryRow], key: SortKey, direction: Direction) {
    rows.sort_by(|a, b| {
        let ord = key.compare(a, b);
        match direction {
            Direction::Ascending => ord,
            Direction::Descending => ord.reverse(),
        }
    });
}
