//! File parsers producing a [`RawTable`]. Selected by file extension.

pub mod csv_export;
pub mod spreadsheet;

use std::path::Path;

use crate::error::{IngestError, Result};
use crate::types::RawTable;

pub use csv_export::{parse_csv_bytes, parse_csv_file};
pub use spreadsheet::parse_spreadsheet_file;

/// Read a cashier export: `.csv` via the CSV parser, `.xlsx`/`.xls`/`.ods`
/// via the spreadsheet parser.
pub fn read_table(path: impl AsRef<Path>) -> Result<RawTable> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "csv" => parse_csv_file(path),
        "xlsx" | "xlsm" | "xls" | "ods" => parse_spreadsheet_file(path),
        _ => Err(IngestError::UnsupportedFormat(path.to_path_buf())),
    }
}

pub(crate) fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
