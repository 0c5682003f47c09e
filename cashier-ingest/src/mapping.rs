//! Logical field -> physical column mapping.
//!
//! The mapping is resolved once against the header of a [`RawTable`];
//! the resulting [`ResolvedColumns`] is what the normalizer uses to pull
//! values out of each row.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::{IngestError, MissingColumn, Result};
use crate::types::{CellValue, RawRow, RawTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalField {
    Date,
    Type,
    Amount,
    Currency,
    Description,
}

impl LogicalField {
    pub const REQUIRED: [LogicalField; 4] = [
        LogicalField::Date,
        LogicalField::Type,
        LogicalField::Amount,
        LogicalField::Currency,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalField::Date => "date",
            LogicalField::Type => "type",
            LogicalField::Amount => "amount",
            LogicalField::Currency => "currency",
            LogicalField::Description => "description",
        }
    }
}

impl fmt::Display for LogicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Physical column names for each logical field. Unrecognized keys in a
/// mapping file are ignored; the four required keys must be present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub date: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: String,
    pub currency: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Default for ColumnMapping {
    /// Identity mapping: physical names equal logical names
    fn default() -> Self {
        Self {
            date: "date".to_string(),
            kind: "type".to_string(),
            amount: "amount".to_string(),
            currency: "currency".to_string(),
            description: Some("description".to_string()),
        }
    }
}

impl ColumnMapping {
    pub fn column(&self, field: LogicalField) -> Option<&str> {
        match field {
            LogicalField::Date => Some(&self.date),
            LogicalField::Type => Some(&self.kind),
            LogicalField::Amount => Some(&self.amount),
            LogicalField::Currency => Some(&self.currency),
            LogicalField::Description => self.description.as_deref(),
        }
    }

    /// Load a mapping file; `.toml` is read as TOML, anything else as JSON.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| IngestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_toml = path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("toml"));

        let parsed = if is_toml {
            Self::from_toml_str(&text)
        } else {
            Self::from_json_str(&text)
        };
        parsed.map_err(|message| IngestError::Mapping {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn from_json_str(text: &str) -> std::result::Result<Self, String> {
        let m: Self = serde_json::from_str(text).map_err(|e| e.to_string())?;
        m.checked()
    }

    pub fn from_toml_str(text: &str) -> std::result::Result<Self, String> {
        let m: Self = toml::from_str(text).map_err(|e| e.to_string())?;
        m.checked()
    }

    /// Reject blank required names; a blank `description` becomes `None`
    pub fn checked(mut self) -> std::result::Result<Self, String> {
        for field in LogicalField::REQUIRED {
            if self.column(field).is_none_or(|c| c.trim().is_empty()) {
                return Err(format!("empty column name for '{field}'"));
            }
        }
        if self.description.as_deref().is_some_and(|d| d.trim().is_empty()) {
            self.description = None;
        }
        Ok(self)
    }

    /// Resolve every field against the table header. All unresolved
    /// required fields are reported together.
    pub fn resolve(&self, table: &RawTable) -> Result<ResolvedColumns> {
        let mut missing = Vec::new();
        let mut index = |field: LogicalField| -> Option<usize> {
            let column = self.column(field)?;
            let found = table.column_index(column);
            if found.is_none() && field != LogicalField::Description {
                missing.push(MissingColumn {
                    field,
                    column: column.to_string(),
                });
            }
            found
        };

        let date = index(LogicalField::Date);
        let kind = index(LogicalField::Type);
        let amount = index(LogicalField::Amount);
        let currency = index(LogicalField::Currency);
        let description = index(LogicalField::Description);

        match (date, kind, amount, currency) {
            (Some(date), Some(kind), Some(amount), Some(currency)) => Ok(ResolvedColumns {
                date,
                kind,
                amount,
                currency,
                description,
            }),
            _ => Err(IngestError::MissingColumns {
                source_name: table.source_name.clone(),
                missing,
            }),
        }
    }
}

/// Column indexes for one table header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedColumns {
    date: usize,
    kind: usize,
    amount: usize,
    currency: usize,
    description: Option<usize>,
}

impl ResolvedColumns {
    /// Value of a logical field in `row`; `None` only for an unmapped
    /// description.
    pub fn get<'a>(&self, row: &'a RawRow, field: LogicalField) -> Option<&'a CellValue> {
        let index = match field {
            LogicalField::Date => self.date,
            LogicalField::Type => self.kind,
            LogicalField::Amount => self.amount,
            LogicalField::Currency => self.currency,
            LogicalField::Description => self.description?,
        };
        Some(row.cell(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(header: &[&str]) -> RawTable {
        RawTable {
            source_name: "cashier.csv".to_string(),
            header: header.iter().map(|h| h.to_string()).collect(),
            rows: vec![RawRow {
                line: 2,
                cells: header.iter().map(|h| CellValue::text(&format!("v-{h}"))).collect(),
            }],
        }
    }

    #[test]
    fn test_identity_mapping_resolves() {
        let t = table(&["date", "type", "amount", "currency", "description"]);
        let cols = ColumnMapping::default().resolve(&t).unwrap();
        let row = &t.rows[0];
        assert_eq!(
            cols.get(row, LogicalField::Amount),
            Some(&CellValue::Text("v-amount".into()))
        );
        assert_eq!(
            cols.get(row, LogicalField::Description),
            Some(&CellValue::Text("v-description".into()))
        );
    }

    #[test]
    fn test_description_is_optional() {
        let t = table(&["date", "type", "amount", "currency"]);
        let cols = ColumnMapping::default().resolve(&t).unwrap();
        assert_eq!(cols.get(&t.rows[0], LogicalField::Description), None);
    }

    #[test]
    fn test_missing_columns_reported_together() {
        let t = table(&["Date", "type", "Sum"]);
        let err = ColumnMapping::default().resolve(&t).unwrap_err();
        match err {
            IngestError::MissingColumns {
                source_name,
                missing,
            } => {
                assert_eq!(source_name, "cashier.csv");
                let fields: Vec<_> = missing.iter().map(|m| m.field).collect();
                assert_eq!(
                    fields,
                    vec![LogicalField::Date, LogicalField::Amount, LogicalField::Currency]
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_custom_mapping_from_json() {
        let m = ColumnMapping::from_json_str(
            r#"{"date": "Date/Time", "type": "Operation", "amount": "Sum",
                "currency": "Cur", "comment": "ignored"}"#,
        )
        .unwrap();
        assert_eq!(m.kind, "Operation");
        assert_eq!(m.description, None);

        let t = table(&["Date/Time", "Operation", "Sum", "Cur"]);
        let cols = m.resolve(&t).unwrap();
        assert_eq!(
            cols.get(&t.rows[0], LogicalField::Type),
            Some(&CellValue::Text("v-Operation".into()))
        );
    }

    #[test]
    fn test_missing_required_key_is_error() {
        let err = ColumnMapping::from_json_str(r#"{"date": "d", "type": "t", "currency": "c"}"#)
            .unwrap_err();
        assert!(err.contains("amount"), "{err}");
    }

    #[test]
    fn test_blank_required_column_is_error() {
        let err = ColumnMapping::from_json_str(
            r#"{"date": " ", "type": "t", "amount": "a", "currency": "c"}"#,
        )
        .unwrap_err();
        assert!(err.contains("date"), "{err}");
    }

    #[test]
    fn test_mapping_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.toml");
        fs::write(
            &path,
            "date = \"When\"\ntype = \"What\"\namount = \"How much\"\ncurrency = \"Cur\"\ndescription = \"Note\"\n",
        )
        .unwrap();
        let m = ColumnMapping::from_path(&path).unwrap();
        assert_eq!(m.amount, "How much");
        assert_eq!(m.description.as_deref(), Some("Note"));
    }

    #[test]
    fn test_unreadable_mapping_file() {
        let err = ColumnMapping::from_path("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, IngestError::Io { .. }));
    }
}
