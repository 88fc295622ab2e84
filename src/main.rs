//! CLI entry point for covid_stats.
//!
//! Provides subcommands for building the per-country summary table, the daily
//! time series, and inspecting a downloaded ECDC dataset.

mod infra;

use crate::infra::{FilterFile, FilterOverrides, resolve_filter};
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use covid_stats::analyzers::{
    Direction, NumericField, SeriesMode, SortKey, SummaryRow, TimeSeriesPoint, aggregate,
    build_series_with_mode, list_countries, sort_rows,
};
use covid_stats::date::{DateRange, date_bounds};
use covid_stats::output::{OutputFormat, emit, write_json};
use covid_stats::parser::load_dataset;
use covid_stats::record::CovidRecord;
use serde::Serialize;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "covid_stats")]
#[command(about = "Country summaries and daily series from the ECDC COVID-19 dataset", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate records into one summary row per country
    Summary {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        window: WindowArgs,

        /// Keep countries whose name contains this text (case-insensitive)
        #[arg(long = "country")]
        country_query: Option<String>,

        /// Column the --min/--max bounds apply to
        #[arg(long, value_enum)]
        field: Option<NumericField>,

        /// Lower bound; blank or non-numeric means no bound
        #[arg(long, allow_hyphen_values = true)]
        min: Option<String>,

        /// Upper bound; blank or non-numeric means no bound
        #[arg(long, allow_hyphen_values = true)]
        max: Option<String>,

        /// Re-sort rows by this column instead of country name
        #[arg(long, value_enum)]
        sort_by: Option<SortKey>,

        /// Sort descending (with --sort-by)
        #[arg(long, default_value_t = false)]
        descending: bool,

        #[command(flatten)]
        out: OutputArgs,
    },
    /// Build the per-day case/death series
    Series {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        window: WindowArgs,

        /// Exact country name; omit for all countries combined
        #[arg(long)]
        country: Option<String>,

        /// Daily values or running totals
        #[arg(long, value_enum, default_value_t = SeriesMode::Daily)]
        mode: SeriesMode,

        #[command(flatten)]
        out: OutputArgs,
    },
    /// Print the first and last report date of a dataset
    Bounds {
        #[command(flatten)]
        input: InputArgs,
    },
    /// List the distinct countries of a dataset
    Countries {
        #[command(flatten)]
        input: InputArgs,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Dataset file (ECDC JSON or CSV, optionally gzip-compressed)
    #[arg(value_name = "FILE")]
    dataset: PathBuf,
}

#[derive(Args)]
struct WindowArgs {
    /// Start of the period, DD/MM/YYYY or YYYY-MM-DD (default: first report date)
    #[arg(long)]
    from: Option<String>,

    /// End of the period, inclusive (default: last report date)
    #[arg(long)]
    to: Option<String>,

    /// JSON file with saved filters; command-line flags take precedence
    #[arg(long, value_name = "JSON")]
    filters: Option<String>,
}

#[derive(Args)]
struct OutputArgs {
    /// Output encoding
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Serialize)]
struct BoundsReport {
    min: String,
    max: String,
    days: i64,
    records: usize,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/covid_stats.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("covid_stats.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Summary {
            input,
            window,
            country_query,
            field,
            min,
            max,
            sort_by,
            descending,
            out,
        } => {
            let overrides = FilterOverrides {
                from: window.from.clone(),
                to: window.to.clone(),
                country_query,
                field,
                min,
                max,
            };
            let direction = if descending {
                Direction::Descending
            } else {
                Direction::Ascending
            };
            summary(&input.dataset, &window, overrides, sort_by, direction, &out)?;
        }
        Commands::Series {
            input,
            window,
            country,
            mode,
            out,
        } => {
            series(&input.dataset, &window, country, mode, &out)?;
        }
        Commands::Bounds { input } => {
            let records = load_dataset(&input.dataset)?;
            let bounds = date_bounds(&records)?;
            let report = BoundsReport {
                min: bounds.min.key(),
                max: bounds.max.key(),
                days: DateRange::full_span(bounds).len_days(),
                records: records.len(),
            };
            write_json(std::io::stdout().lock(), &report)?;
        }
        Commands::Countries { input } => {
            let records = load_dataset(&input.dataset)?;
            let countries = list_countries(&records);
            info!(countries = countries.len(), "Country list built");
            write_json(std::io::stdout().lock(), &countries)?;
        }
    }

    Ok(())
}

/// Loads the dataset and the optional filter file shared by `summary` and `series`.
fn load_inputs(dataset: &Path, window: &WindowArgs) -> Result<(Vec<CovidRecord>, FilterFile)> {
    let records = load_dataset(dataset)?;
    let file = match &window.filters {
        Some(path) => {
            debug!(path = %path, "Loading filter file");
            FilterFile::load(path)?
        }
        None => FilterFile::default(),
    };
    Ok((records, file))
}

/// Builds, filters and writes the per-country summary table.
#[tracing::instrument(skip_all, fields(dataset = %dataset.display()))]
fn summary(
    dataset: &Path,
    window: &WindowArgs,
    overrides: FilterOverrides,
    sort_by: Option<SortKey>,
    direction: Direction,
    out: &OutputArgs,
) -> Result<()> {
    let (records, file) = load_inputs(dataset, window)?;
    if records.is_empty() {
        warn!("Dataset has no records");
        return emit::<SummaryRow>(&[], out.format, out.output.as_deref());
    }

    let bounds = date_bounds(&records)?;
    let filter = resolve_filter(&file, &overrides, bounds)?;
    info!(
        from = %filter.date_range.from,
        to = %filter.date_range.to,
        custom_range = filter.date_range.is_custom(bounds),
        country_query = %filter.country_query,
        numeric_active = filter.numeric.is_active(),
        "Filters resolved"
    );

    let mut rows = aggregate(&records, &filter)?;
    if let Some(key) = sort_by {
        sort_rows(&mut rows, key, direction);
    }
    info!(rows = rows.len(), "Summary built");

    emit(&rows, out.format, out.output.as_deref())
}

/// Builds and writes the daily series for one country or all countries.
#[tracing::instrument(skip_all, fields(dataset = %dataset.display(), mode = ?mode))]
fn series(
    dataset: &Path,
    window: &WindowArgs,
    country: Option<String>,
    mode: SeriesMode,
    out: &OutputArgs,
) -> Result<()> {
    let (records, file) = load_inputs(dataset, window)?;
    if records.is_empty() {
        warn!("Dataset has no records");
        return emit::<TimeSeriesPoint>(&[], out.format, out.output.as_deref());
    }

    let bounds = date_bounds(&records)?;
    let overrides = FilterOverrides {
        from: window.from.clone(),
        to: window.to.clone(),
        ..Default::default()
    };
    let filter = resolve_filter(&file, &overrides, bounds)?;
    let selected = country.or(file.selected_country);

    let points = build_series_with_mode(&records, &filter, selected.as_deref(), mode)?;
    info!(
        points = points.len(),
        country = selected.as_deref().unwrap_or("all"),
        "Series built"
    );

    emit(&points, out.format, out.output.as_deref())
}
