//! Engine error types.

use thiserror::Error;

/// Errors raised by the date parser and the aggregation/series engine.
///
/// Any of these aborts the whole call; records are never skipped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A date string did not match `DD/MM/YYYY` / `DD-MM-YYYY` or is not a real calendar date
    #[error("malformed date \"{input}\": {reason}")]
    MalformedDate { input: String, reason: String },

    /// Min/max bounds requested on an empty record collection
    #[error("cannot compute date bounds of an empty dataset")]
    EmptyDataset,
}

impl EngineError {
    pub(crate) fn malformed(input: &str, reason: impl Into<String>) -> Self {
        EngineError::MalformedDate {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
