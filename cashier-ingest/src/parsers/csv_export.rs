//! Parse cashier CSV exports into a [`RawTable`].
//!
//! Exports come in UTF-8 (optionally with a BOM) or Windows-1251, and use
//! either `,` or `;` as the delimiter. The first record is the header.

use encoding_rs::WINDOWS_1251;
use std::fs;
use std::path::Path;

use crate::error::{IngestError, Result};
use crate::parsers::source_name;
use crate::types::{CellValue, RawRow, RawTable};

pub fn parse_csv_file(path: impl AsRef<Path>) -> Result<RawTable> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let table = parse_csv_bytes(&bytes, &source_name(path))?;
    if table.header.is_empty() {
        return Err(IngestError::EmptyInput {
            path: path.to_path_buf(),
        });
    }
    Ok(table)
}

/// Parse raw CSV bytes. `source_name` only labels error messages.
pub fn parse_csv_bytes(bytes: &[u8], source_name: &str) -> Result<RawTable> {
    let text = decode(bytes);
    let delimiter = sniff_delimiter(&text);

    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let header: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();

    let mut rows = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(i + 2);
        rows.push(RawRow {
            line,
            cells: record.iter().map(CellValue::text).collect(),
        });
    }

    log::info!(
        "{source_name}: {} columns, {} rows (delimiter {:?})",
        header.len(),
        rows.len(),
        delimiter as char
    );

    Ok(RawTable {
        source_name: source_name.to_string(),
        header,
        rows,
    })
}

/// UTF-8 first; anything that is not valid UTF-8 is read as Windows-1251.
fn decode(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            log::debug!("input is not UTF-8, decoding as Windows-1251");
            let (decoded, _, _) = WINDOWS_1251.decode(bytes);
            decoded.into_owned()
        }
    }
}

/// Pick `;` when the header line has more semicolons than commas
fn sniff_delimiter(text: &str) -> u8 {
    let header = text.lines().next().unwrap_or("");
    let commas = header.matches(',').count();
    let semicolons = header.matches(';').count();
    if semicolons > commas { b';' } else { b',' }
}
