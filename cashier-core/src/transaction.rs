//! Canonical transaction record produced by normalization

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::category::{Category, SignPolicy};
use crate::report::YearMonth;

/// A normalized cashier transaction. Built once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CanonicalTransaction {
    /// Source-local wall-clock time of the transaction
    pub timestamp: NaiveDateTime,
    pub category: Category,
    /// Signed amount; the sign policy has already been applied
    pub amount: Decimal,
    /// Uppercased currency code
    pub currency: String,
    pub description: Option<String>,
    /// Label as written in the export
    pub raw_type: String,
}

impl CanonicalTransaction {
    /// Build a record, applying `policy` to the source amount and
    /// normalizing the currency code.
    pub fn new(
        timestamp: NaiveDateTime,
        category: Category,
        source_amount: Decimal,
        currency: &str,
        raw_type: impl Into<String>,
        policy: SignPolicy,
    ) -> Self {
        Self {
            timestamp,
            category,
            amount: policy.apply(category, source_amount),
            currency: normalize_currency(currency),
            description: None,
            raw_type: raw_type.into(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let d = description.into();
        self.description = if d.trim().is_empty() { None } else { Some(d) };
        self
    }

    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    pub fn month(&self) -> YearMonth {
        YearMonth::of(self.timestamp.date())
    }

    /// Re-apply a sign policy. A no-op for records already built with it.
    pub fn renormalized(&self, policy: SignPolicy) -> Self {
        Self {
            amount: policy.apply(self.category, self.amount),
            ..self.clone()
        }
    }
}

/// Trim and uppercase a currency code
pub fn normalize_currency(raw: &str) -> String {
    raw.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_new_applies_policy_and_currency() {
        let t = CanonicalTransaction::new(
            ts("2024-01-05 10:00:00"),
            Category::Withdrawal,
            "50".parse().unwrap(),
            " usd ",
            "Withdraw",
            SignPolicy::ByCategory,
        );
        assert_eq!(t.amount, "-50".parse::<Decimal>().unwrap());
        assert_eq!(t.currency, "USD");
        assert_eq!(t.month().to_string(), "2024-01");
    }

    #[test]
    fn test_renormalize_does_not_double_flip() {
        let t = CanonicalTransaction::new(
            ts("2024-01-05 10:00:00"),
            Category::Buyin,
            "-10".parse().unwrap(),
            "USD",
            "Tournament Buy-In",
            SignPolicy::ByCategory,
        );
        let again = t.renormalized(SignPolicy::ByCategory);
        assert_eq!(again, t);
    }

    #[test]
    fn test_blank_description_is_none() {
        let t = CanonicalTransaction::new(
            ts("2024-01-05 10:00:00"),
            Category::Fee,
            "1".parse().unwrap(),
            "EUR",
            "Fee",
            SignPolicy::ByCategory,
        )
        .with_description("   ");
        assert_eq!(t.description, None);
    }
}
