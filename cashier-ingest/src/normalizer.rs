//! Raw rows -> [`CanonicalTransaction`]s.
//!
//! Rows with an unusable date, amount or currency are skipped and counted;
//! they never abort the batch.

use cashier_core::{CanonicalTransaction, Classifier, SignPolicy};
use serde::Serialize;
use std::fmt;

use crate::error::Result;
use crate::mapping::{ColumnMapping, LogicalField, ResolvedColumns};
use crate::parse::{parse_amount_cell, parse_timestamp_cell};
use crate::types::{EMPTY_CELL, RawRow, RawTable};

/// Line numbers kept per skip reason for diagnostics
const SAMPLE_LINES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SkipReason {
    Date,
    Amount,
    Currency,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SkipReason::Date => "unparseable date",
            SkipReason::Amount => "unparseable amount",
            SkipReason::Currency => "missing currency",
        })
    }
}

/// Counts of rows excluded during normalization
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SkipStats {
    pub date: usize,
    pub amount: usize,
    pub currency: usize,
    /// First few skipped source lines
    pub sample_lines: Vec<usize>,
}

impl SkipStats {
    pub fn total(&self) -> usize {
        self.date + self.amount + self.currency
    }

    pub fn count(&self, reason: SkipReason) -> usize {
        match reason {
            SkipReason::Date => self.date,
            SkipReason::Amount => self.amount,
            SkipReason::Currency => self.currency,
        }
    }

    fn record(&mut self, reason: SkipReason, line: usize) {
        match reason {
            SkipReason::Date => self.date += 1,
            SkipReason::Amount => self.amount += 1,
            SkipReason::Currency => self.currency += 1,
        }
        if self.sample_lines.len() < SAMPLE_LINES {
            self.sample_lines.push(line);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub transactions: Vec<CanonicalTransaction>,
    pub skipped: SkipStats,
}

/// Turns the rows of one table into canonical transactions
#[derive(Debug, Clone)]
pub struct Normalizer<'a> {
    columns: ResolvedColumns,
    classifier: &'a Classifier,
    policy: SignPolicy,
}

impl<'a> Normalizer<'a> {
    pub fn new(columns: ResolvedColumns, classifier: &'a Classifier, policy: SignPolicy) -> Self {
        Self {
            columns,
            classifier,
            policy,
        }
    }

    /// Resolve `mapping` against the table header, then normalize every
    /// row. Fails only on an unresolvable mapping.
    pub fn run(
        table: &RawTable,
        mapping: &ColumnMapping,
        classifier: &'a Classifier,
        policy: SignPolicy,
    ) -> Result<Normalized> {
        let columns = mapping.resolve(table)?;
        Ok(Self::new(columns, classifier, policy).normalize(&table.rows))
    }

    pub fn normalize(&self, rows: &[RawRow]) -> Normalized {
        let mut transactions = Vec::with_capacity(rows.len());
        let mut skipped = SkipStats::default();

        for row in rows {
            match self.normalize_row(row) {
                Ok(txn) => transactions.push(txn),
                Err(reason) => {
                    log::debug!("line {}: skipped ({reason})", row.line);
                    skipped.record(reason, row.line);
                }
            }
        }

        if skipped.total() > 0 {
            log::warn!(
                "skipped {} rows (date: {}, amount: {}, currency: {}); first lines: {:?}",
                skipped.total(),
                skipped.date,
                skipped.amount,
                skipped.currency,
                skipped.sample_lines
            );
        }
        log::info!("normalized {} transactions", transactions.len());

        Normalized {
            transactions,
            skipped,
        }
    }

    pub fn normalize_row(&self, row: &RawRow) -> std::result::Result<CanonicalTransaction, SkipReason> {
        let field = |f: LogicalField| self.columns.get(row, f).unwrap_or(&EMPTY_CELL);

        let timestamp = parse_timestamp_cell(field(LogicalField::Date)).ok_or(SkipReason::Date)?;
        let amount = parse_amount_cell(field(LogicalField::Amount)).ok_or(SkipReason::Amount)?;
        let currency = field(LogicalField::Currency).to_string();
        if currency.trim().is_empty() {
            return Err(SkipReason::Currency);
        }

        let raw_type = field(LogicalField::Type).to_string();
        let category = self.classifier.classify(&raw_type);

        let mut txn =
            CanonicalTransaction::new(timestamp, category, amount, &currency, raw_type, self.policy);
        if let Some(desc) = self.columns.get(row, LogicalField::Description) {
            txn = txn.with_description(desc.to_string());
        }
        Ok(txn)
    }
}
