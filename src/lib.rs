pub mod analyzers;
pub mod date;
pub mod error;
pub mod output;
pub mod parser;
pub mod record;
