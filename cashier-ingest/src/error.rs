//! Errors that stop a run before any row is processed.

use std::path::PathBuf;
use thiserror::Error;

use crate::mapping::LogicalField;

/// A required logical field that did not resolve to a header column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingColumn {
    pub field: LogicalField,
    pub column: String,
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("{source_name}: missing required columns: {}", format_missing(.missing))]
    MissingColumns {
        source_name: String,
        missing: Vec<MissingColumn>,
    },

    #[error("column mapping {path}: {message}")]
    Mapping { path: PathBuf, message: String },

    #[error("unsupported file type: {0} (expected .csv, .xlsx, .xls or .ods)")]
    UnsupportedFormat(PathBuf),

    #[error("{path}: no header row")]
    EmptyInput { path: PathBuf },

    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("spreadsheet {path}: {message}")]
    Spreadsheet { path: PathBuf, message: String },

    #[error("invalid date argument '{0}' (expected YYYY-MM-DD)")]
    DateArgument(String),
}

fn format_missing(missing: &[MissingColumn]) -> String {
    missing
        .iter()
        .map(|m| format!("{} -> '{}'", m.field, m.column))
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, IngestError>;
