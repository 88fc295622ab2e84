//! Serialization of summary rows and series points.
//!
//! Supports pretty JSON and CSV, written to a file or any writer.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use csv::WriterBuilder;
use serde::Serialize;
use tracing::{debug, info};

/// Output encoding selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

/// Writes `value` as pretty-printed JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize + ?Sized>(mut writer: W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Writes one CSV row per item, with a single header row.
///
/// An empty slice produces an empty output, since headers come from the first item.
pub fn write_csv<W: Write, T: Serialize>(writer: W, items: &[T]) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(writer);
    for item in items {
        writer.serialize(item)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes `items` in `format` to `path`, or to stdout when `path` is `None`.
pub fn emit<T: Serialize>(items: &[T], format: OutputFormat, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), ?format, "Writing output file");
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            write_items(file, items, format)?;
            info!(path = %path.display(), rows = items.len(), "Output written");
        }
        None => write_items(std::io::stdout().lock(), items, format)?,
    }
    Ok(())
}

fn write_items<W: Write, T: Serialize>(writer: W, items: &[T], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => write_json(writer, items),
        OutputFormat::Csv => write_csv(writer, items),
    }
}
