//! Canonical transaction categories and the sign policy applied to them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Closed set of cashier transaction categories
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Deposit,
    Withdrawal,
    Buyin,
    Payout,
    Rakeback,
    Bonus,
    Fee,
    Unknown,
}

/// Which way money moves for a category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Inflow,
    Outflow,
    /// No fixed direction; the source sign is kept
    Unsigned,
}

impl Category {
    /// All categories, in classifier priority order (`Unknown` last)
    pub const ALL: [Category; 8] = [
        Category::Deposit,
        Category::Withdrawal,
        Category::Buyin,
        Category::Payout,
        Category::Rakeback,
        Category::Bonus,
        Category::Fee,
        Category::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Deposit => "deposit",
            Category::Withdrawal => "withdrawal",
            Category::Buyin => "buyin",
            Category::Payout => "payout",
            Category::Rakeback => "rakeback",
            Category::Bonus => "bonus",
            Category::Fee => "fee",
            Category::Unknown => "unknown",
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            Category::Deposit | Category::Payout | Category::Rakeback | Category::Bonus => {
                Direction::Inflow
            }
            Category::Withdrawal | Category::Buyin | Category::Fee => Direction::Outflow,
            Category::Unknown => Direction::Unsigned,
        }
    }

    /// All categories sorted by name, for stable by-type listings
    pub fn alphabetical() -> [Category; 8] {
        let mut all = Self::ALL;
        all.sort_by_key(|c| c.as_str());
        all
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or(UnknownCategory(s.to_string()))
    }
}

/// How the sign of a parsed amount is decided during normalization
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SignPolicy {
    /// Inflows positive, outflows negative, `unknown` keeps the source sign
    #[default]
    ByCategory,
    /// Keep whatever sign the export wrote
    Source,
}

impl SignPolicy {
    /// Apply the policy to a source amount. Idempotent.
    pub fn apply(&self, category: Category, amount: Decimal) -> Decimal {
        match self {
            SignPolicy::Source => amount,
            SignPolicy::ByCategory => match category.direction() {
                Direction::Inflow => amount.abs(),
                Direction::Outflow if amount.is_zero() => Decimal::ZERO,
                Direction::Outflow => -amount.abs(),
                Direction::Unsigned => amount,
            },
        }
    }
}

impl FromStr for SignPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "by-category" | "by_category" | "category" => Ok(SignPolicy::ByCategory),
            "source" | "raw" => Ok(SignPolicy::Source),
            other => Err(format!("unknown sign policy: {other}")),
        }
    }
}
