//! Aggregation of filtered transactions into per-currency [`Report`]s.

use cashier_core::{
    CanonicalTransaction, Category, Derived, MonthlyBucket, Period, Report, Totals, YearMonth,
};
use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::filter::{TransactionFilter, partition_by_currency};

/// Optional sections of a report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateOptions {
    pub monthly: bool,
    pub by_type: bool,
}

/// Sum amounts per category
pub fn totals<'a>(txns: impl IntoIterator<Item = &'a CanonicalTransaction>) -> Totals {
    let mut totals = Totals::default();
    for txn in txns {
        totals.add(txn.category, txn.amount);
    }
    totals
}

/// Calendar-month buckets, ascending. Months without transactions are
/// not emitted.
pub fn monthly_buckets(txns: &[&CanonicalTransaction]) -> Vec<MonthlyBucket> {
    let mut by_month: BTreeMap<YearMonth, Vec<&CanonicalTransaction>> = BTreeMap::new();
    for &txn in txns {
        by_month.entry(txn.month()).or_default().push(txn);
    }

    by_month
        .into_iter()
        .map(|(month, items)| {
            let totals = totals(items.iter().copied());
            MonthlyBucket {
                month,
                derived: Derived::from_totals(&totals),
                totals,
                transaction_count: items.len(),
            }
        })
        .collect()
}

/// Build the report for one currency.
///
/// `txns` must all be in `currency`. `bounds` are the explicit
/// `--from`/`--to` dates; missing ends fall back to the data.
pub fn aggregate(
    currency: &str,
    txns: &[&CanonicalTransaction],
    bounds: (Option<NaiveDate>, Option<NaiveDate>),
    options: AggregateOptions,
) -> Report {
    debug_assert!(txns.iter().all(|t| t.currency == currency));

    let (from, to) = bounds;
    let period = Period {
        start: from.or_else(|| txns.iter().map(|t| t.date()).min()),
        end: to.or_else(|| txns.iter().map(|t| t.date()).max()),
    };

    let mut report = Report::empty(currency, period);
    if txns.is_empty() {
        if options.monthly {
            report.monthly = Some(Vec::new());
        }
        if options.by_type {
            report.by_type = Some(report.totals.alphabetical());
        }
        return report;
    }

    let totals = totals(txns.iter().copied());
    let unknown_count = txns
        .iter()
        .filter(|t| t.category == Category::Unknown)
        .count();

    report.derived = Derived::from_totals(&totals);
    report.unknown_total = totals.get(Category::Unknown);
    report.unknown_count = unknown_count;
    report.transaction_count = txns.len();
    report.monthly = options.monthly.then(|| monthly_buckets(txns));
    report.by_type = options.by_type.then(|| totals.alphabetical());
    report.totals = totals;

    log::debug!(
        "{currency}: {} transactions, effective {}",
        report.transaction_count,
        report.derived.effective
    );
    report
}

/// Filter, split by currency and aggregate.
///
/// With a currency filter exactly one report is returned (all zeros when
/// nothing matched). Without one, one report per currency present, sorted
/// by code; empty when nothing survives the filter.
pub fn build_reports(
    txns: &[CanonicalTransaction],
    filter: &TransactionFilter,
    options: AggregateOptions,
) -> Vec<Report> {
    let filtered = filter.apply(txns);
    let bounds = (filter.from, filter.to);

    if let Some(currency) = filter.currency() {
        return vec![aggregate(currency, &filtered, bounds, options)];
    }

    let groups = partition_by_currency(filtered);
    if groups.len() > 1 {
        log::info!(
            "several currencies present, reporting separately: {}",
            groups.keys().cloned().collect::<Vec<_>>().join(", ")
        );
    }
    groups
        .iter()
        .map(|(currency, items)| aggregate(currency, items, bounds, options))
        .collect()
}
