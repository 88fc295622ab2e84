//! Decoder for downloaded ECDC dataset files.
//!
//! Accepts the JSON feed (`{"records": [...]}`), a bare JSON array of records,
//! or the CSV export. Any of these may be gzip-compressed.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use serde::Deserialize;
use tracing::{debug, info};

use crate::record::CovidRecord;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonPayload {
    Wrapped { records: Vec<CovidRecord> },
    Bare(Vec<CovidRecord>),
}

/// Decodes dataset bytes into records, sniffing compression and format.
///
/// # Errors
///
/// Returns an error if gzip decompression fails or the content is neither a
/// JSON payload nor a CSV with the expected headers.
pub fn parse_dataset(bytes: &[u8]) -> Result<Vec<CovidRecord>> {
    if bytes.starts_with(&GZIP_MAGIC) {
        let mut decoded = Vec::new();
        GzDecoder::new(bytes)
            .read_to_end(&mut decoded)
            .context("failed to decompress gzip dataset")?;
        debug!(compressed = bytes.len(), decoded = decoded.len(), "Dataset decompressed");
        return parse_dataset(&decoded);
    }

    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let first = bytes.iter().copied().find(|b| !b.is_ascii_whitespace());

    match first {
        Some(b'{') | Some(b'[') => parse_json(bytes),
        Some(_) => parse_csv(bytes),
        None => Ok(Vec::new()),
    }
}

fn parse_json(bytes: &[u8]) -> Result<Vec<CovidRecord>> {
    let payload: JsonPayload =
        serde_json::from_slice(bytes).context("dataset is not a valid ECDC JSON payload")?;
    Ok(match payload {
        JsonPayload::Wrapped { records } => records,
        JsonPayload::Bare(records) => records,
    })
}

fn parse_csv(bytes: &[u8]) -> Result<Vec<CovidRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let mut records = Vec::new();
    for (idx, result) in rdr.deserialize().enumerate() {
        // +2: header line, then 1-based numbering
        let record: CovidRecord =
            result.with_context(|| format!("invalid CSV record on line {}", idx + 2))?;
        records.push(record);
    }

    Ok(records)
}

/// Reads and decodes a dataset file from disk.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn load_dataset(path: &Path) -> Result<Vec<CovidRecord>> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read dataset {}", path.display()))?;
    let records = parse_dataset(&bytes)
        .with_context(|| format!("failed to decode dataset {}", path.display()))?;
    info!(records = records.len(), bytes = bytes.len(), "Dataset loaded");
    Ok(records)
}
