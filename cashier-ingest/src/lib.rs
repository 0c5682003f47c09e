//! cashier-ingest: export parsers (CSV, spreadsheets), column mapping and row normalization.

pub mod error;
pub mod mapping;
pub mod normalizer;
pub mod parse;
pub mod parsers;
pub mod types;

pub use error::{IngestError, MissingColumn};
pub use mapping::{ColumnMapping, LogicalField, ResolvedColumns};
pub use normalizer::{Normalized, Normalizer, SkipReason, SkipStats};
pub use parse::parse_date_arg;
pub use parsers::read_table;
pub use types::{CellValue, RawRow, RawTable};
