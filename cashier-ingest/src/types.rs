use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A raw cell as read from the export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    /// Spreadsheet date cells
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// Text cells are trimmed; blank text counts as empty.
    pub fn text(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

/// One data line of the export. Cells line up with [`RawTable::header`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    /// 1-based line in the source, header included
    pub line: usize,
    pub cells: Vec<CellValue>,
}

pub(crate) static EMPTY_CELL: CellValue = CellValue::Empty;

impl RawRow {
    /// Missing trailing cells read as empty
    pub fn cell(&self, index: usize) -> &CellValue {
        self.cells.get(index).unwrap_or(&EMPTY_CELL)
    }
}

/// Header plus rows, as produced by the file parsers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    /// File name or other label used in error messages
    pub source_name: String,
    pub header: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.header.iter().position(|h| h.trim() == name)
    }

    /// Look up a cell by physical column name
    pub fn get<'a>(&self, row: &'a RawRow, column: &str) -> Option<&'a CellValue> {
        self.column_index(column).map(|i| row.cell(i))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
