//! Spreadsheet exports (.xlsx / .xls / .ods): first worksheet, first
//! non-empty row is the header.

use calamine::{Data, Reader, open_workbook_auto};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::path::Path;

use crate::error::{IngestError, Result};
use crate::parsers::source_name;
use crate::types::{CellValue, RawRow, RawTable};

pub fn parse_spreadsheet_file(path: impl AsRef<Path>) -> Result<RawTable> {
    let path = path.as_ref();
    let err = |message: String| IngestError::Spreadsheet {
        path: path.to_path_buf(),
        message,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| err(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| err("workbook has no worksheets".to_string()))?
        .map_err(|e| err(e.to_string()))?;

    let mut rows_iter = range.rows().enumerate().skip_while(|(_, row)| {
        row.iter().all(|c| matches!(c, Data::Empty))
    });

    let Some((_, header_row)) = rows_iter.next() else {
        return Err(IngestError::EmptyInput {
            path: path.to_path_buf(),
        });
    };
    let header: Vec<String> = header_row.iter().map(|c| c.to_string().trim().to_string()).collect();

    // Range rows are relative to the first used cell
    let first_line = range.start().map(|(r, _)| r as usize + 1).unwrap_or(1);
    let rows: Vec<RawRow> = rows_iter
        .map(|(i, row)| RawRow {
            line: first_line + i,
            cells: row.iter().map(cell_value).collect(),
        })
        .collect();

    log::info!(
        "{}: {} columns, {} rows",
        source_name(path),
        header.len(),
        rows.len()
    );

    Ok(RawTable {
        source_name: source_name(path),
        header,
        rows,
    })
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::text(s),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        Data::DateTime(dt) => excel_serial_to_datetime(dt.as_f64())
            .map(CellValue::DateTime)
            .unwrap_or(CellValue::Empty),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::text(s),
        Data::Error(_) => CellValue::Empty,
    }
}

/// Excel serial day number (1899-12-30 epoch), fractional part is the time
fn excel_serial_to_datetime(v: f64) -> Option<NaiveDateTime> {
    if !v.is_finite() {
        return None;
    }
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let seconds = (v * 86_400.0).round() as i64;
    base.checked_add_signed(Duration::seconds(seconds))
}
