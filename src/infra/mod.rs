//! Filter configuration for the CLI.
//!
//! [`FilterFile`] is a saved filter selection on disk; [`resolve_filter`]
//! merges it with command-line overrides into the engine's filter spec.

mod config;

pub use config::{FilterFile, FilterOverrides, resolve_filter};
