//! Country summaries and daily time series.
//!
//! Both views are pure functions of the raw records and a [`filter::FilterSpec`].
//! Nothing here logs or keeps state between calls.

pub mod aggregate;
pub mod filter;
pub mod series;
pub mod sort;
pub mod types;
pub mod utility;

pub use aggregate::{aggregate, list_countries};
pub use filter::{FilterSpec, NumericField, NumericFilter};
pub use series::{SeriesMode, build_series, build_series_with_mode, cumulative};
pub use sort::{Direction, SortKey, sort_rows};
pub use types::{SummaryRow, TimeSeriesPoint, Totals};
