//! Report model handed to renderers and exporters

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::category::Category;

/// Calendar month, ordered chronologically
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

/// Per-category sums. Always holds all eight categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Totals(BTreeMap<Category, Decimal>);

impl Default for Totals {
    fn default() -> Self {
        Self(Category::ALL.into_iter().map(|c| (c, Decimal::ZERO)).collect())
    }
}

impl Totals {
    pub fn add(&mut self, category: Category, amount: Decimal) {
        *self.0.entry(category).or_insert(Decimal::ZERO) += amount;
    }

    pub fn get(&self, category: Category) -> Decimal {
        self.0.get(&category).copied().unwrap_or(Decimal::ZERO)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, Decimal)> + '_ {
        self.0.iter().map(|(c, v)| (*c, *v))
    }

    /// All totals sorted by category name
    pub fn alphabetical(&self) -> Vec<(Category, Decimal)> {
        Category::alphabetical()
            .into_iter()
            .map(|c| (c, self.get(c)))
            .collect()
    }
}

/// Headline metrics derived from [`Totals`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Derived {
    /// deposits + withdrawals
    pub net_cashflow: Decimal,
    /// buy-ins + payouts
    pub game_result: Decimal,
    /// game result + rakeback + bonus
    pub total_profit: Decimal,
    /// total profit + fees
    pub effective: Decimal,
}

impl Derived {
    /// Amounts are already signed, so every metric is a plain sum.
    pub fn from_totals(t: &Totals) -> Self {
        let net_cashflow = t.get(Category::Deposit) + t.get(Category::Withdrawal);
        let game_result = t.get(Category::Buyin) + t.get(Category::Payout);
        let total_profit = game_result + t.get(Category::Rakeback) + t.get(Category::Bonus);
        let effective = total_profit + t.get(Category::Fee);
        Self {
            net_cashflow,
            game_result,
            total_profit,
            effective,
        }
    }
}

/// Date range a report covers. Both ends are `None` for an empty report
/// without explicit bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl Period {
    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.start, self.end) {
            (Some(s), Some(e)) => write!(f, "{s} .. {e}"),
            (Some(s), None) => write!(f, "{s} .."),
            (None, Some(e)) => write!(f, ".. {e}"),
            (None, None) => f.write_str("all available data"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBucket {
    pub month: YearMonth,
    pub totals: Totals,
    pub derived: Derived,
    pub transaction_count: usize,
}

/// Summary for a single currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub currency: String,
    pub period: Period,
    pub totals: Totals,
    pub derived: Derived,
    /// Present only when monthly bucketing was requested
    pub monthly: Option<Vec<MonthlyBucket>>,
    /// Present only when a by-type breakdown was requested
    pub by_type: Option<Vec<(Category, Decimal)>>,
    pub unknown_total: Decimal,
    pub unknown_count: usize,
    pub transaction_count: usize,
}

impl Report {
    /// Zero report, used when filters leave nothing for a currency
    pub fn empty(currency: impl Into<String>, period: Period) -> Self {
        Self {
            currency: currency.into(),
            period,
            totals: Totals::default(),
            derived: Derived::default(),
            monthly: None,
            by_type: None,
            unknown_total: Decimal::ZERO,
            unknown_count: 0,
            transaction_count: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.transaction_count == 0
    }
}
