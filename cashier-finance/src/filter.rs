//! Date range and currency filtering, and per-currency partitioning.

use cashier_core::{CanonicalTransaction, normalize_currency};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Inclusive date bounds plus an optional currency code
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    /// Stored uppercased
    currency: Option<String>,
}

impl TransactionFilter {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>, currency: Option<&str>) -> Self {
        Self {
            from,
            to,
            currency: currency
                .map(normalize_currency)
                .filter(|c| !c.is_empty()),
        }
    }

    pub fn currency(&self) -> Option<&str> {
        self.currency.as_deref()
    }

    /// `to` covers the whole day
    pub fn matches(&self, txn: &CanonicalTransaction) -> bool {
        let date = txn.date();
        if self.from.is_some_and(|from| date < from) {
            return false;
        }
        if self.to.is_some_and(|to| date > to) {
            return false;
        }
        match &self.currency {
            Some(c) => txn.currency.eq_ignore_ascii_case(c),
            None => true,
        }
    }

    /// Matching transactions, original order kept
    pub fn apply<'a>(&self, txns: &'a [CanonicalTransaction]) -> Vec<&'a CanonicalTransaction> {
        txns.iter().filter(|t| self.matches(t)).collect()
    }
}

/// Group transactions by currency code, codes sorted, order within a
/// group kept. Amounts in different currencies never share a group.
pub fn partition_by_currency<'a>(
    txns: impl IntoIterator<Item = &'a CanonicalTransaction>,
) -> BTreeMap<String, Vec<&'a CanonicalTransaction>> {
    let mut groups: BTreeMap<String, Vec<&CanonicalTransaction>> = BTreeMap::new();
    for txn in txns {
        groups.entry(txn.currency.clone()).or_default().push(txn);
    }
    groups
}
