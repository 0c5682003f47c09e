//! Deterministic rules mapping raw cashier labels to a [`Category`].
//!
//! The rule table is ordered: the first category with a matching pattern
//! wins, so "Payout to Skrill" is a withdrawal and not a payout.

use crate::category::Category;

/// Default patterns in priority order. Matching is case-insensitive
/// substring containment.
pub const DEFAULT_RULES: &[(Category, &[&str])] = &[
    (Category::Deposit, &["deposit", "top up", "cashin"]),
    (Category::Withdrawal, &["withdraw", "cashout", "payout to"]),
    (Category::Buyin, &["buy-in", "buyin", "entry", "registration"]),
    (Category::Payout, &["winnings", "payout", "prize"]),
    (Category::Rakeback, &["rakeback", "fish buffet", "cashback"]),
    (Category::Bonus, &["bonus", "reward", "promo"]),
    (Category::Fee, &["fee", "commission"]),
];

/// One row of the rule table
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub category: Category,
    /// Lowercased patterns
    pub patterns: Vec<String>,
}

impl Rule {
    fn matches(&self, label: &str) -> bool {
        self.patterns.iter().any(|p| label.contains(p.as_str()))
    }
}

/// Ordered rule table consulted by [`Classifier::classify`]
#[derive(Debug, Clone, PartialEq)]
pub struct Classifier {
    rules: Vec<Rule>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::from_table(DEFAULT_RULES)
    }
}

impl Classifier {
    pub fn from_table(table: &[(Category, &[&str])]) -> Self {
        let rules = table
            .iter()
            .map(|(category, patterns)| Rule {
                category: *category,
                patterns: patterns.iter().map(|p| p.to_lowercase()).collect(),
            })
            .collect();
        Self { rules }
    }

    /// Add patterns to a category. The category keeps its priority slot;
    /// a category with no rule yet is appended last. Patterns for
    /// `Unknown` are ignored.
    pub fn extend<I, S>(&mut self, category: Category, patterns: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if category == Category::Unknown {
            return;
        }
        let extra = patterns
            .into_iter()
            .map(|p| p.as_ref().trim().to_lowercase())
            .filter(|p| !p.is_empty());

        match self.rules.iter_mut().find(|r| r.category == category) {
            Some(rule) => {
                for p in extra {
                    if !rule.patterns.contains(&p) {
                        rule.patterns.push(p);
                    }
                }
            }
            None => self.rules.push(Rule {
                category,
                patterns: extra.collect(),
            }),
        }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Classify a raw label. Never fails; unmatched labels are `Unknown`.
    pub fn classify(&self, raw_type: &str) -> Category {
        let label = raw_type.trim().to_lowercase();
        if label.is_empty() {
            return Category::Unknown;
        }
        self.rules
            .iter()
            .find(|r| r.matches(&label))
            .map(|r| r.category)
            .unwrap_or(Category::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_labels() {
        let c = Classifier::default();
        assert_eq!(c.classify("Deposit"), Category::Deposit);
        assert_eq!(c.classify("Tournament Buy-In"), Category::Buyin);
        assert_eq!(c.classify("Tournament Winnings"), Category::Payout);
        assert_eq!(c.classify("Fish Buffet"), Category::Rakeback);
        assert_eq!(c.classify("Withdraw"), Category::Withdrawal);
        assert_eq!(c.classify("Fee"), Category::Fee);
    }

    #[test]
    fn test_case_and_whitespace_insensitive() {
        let c = Classifier::default();
        assert_eq!(c.classify("  TOP UP via card "), Category::Deposit);
        assert_eq!(c.classify("spin&gold REGISTRATION"), Category::Buyin);
    }

    #[test]
    fn test_priority_resolves_overlaps() {
        let c = Classifier::default();
        // "payout to" is a withdrawal rule and withdrawal outranks payout
        assert_eq!(c.classify("Payout to Skrill"), Category::Withdrawal);
        // rakeback outranks bonus
        assert_eq!(c.classify("Rakeback bonus"), Category::Rakeback);
        // deposit outranks bonus
        assert_eq!(c.classify("Deposit bonus"), Category::Deposit);
        // buyin outranks payout
        assert_eq!(c.classify("Re-entry after prize pool"), Category::Buyin);
    }

    #[test]
    fn test_unmatched_is_unknown() {
        let c = Classifier::default();
        assert_eq!(c.classify("Table Transfer"), Category::Unknown);
        assert_eq!(c.classify(""), Category::Unknown);
        assert_eq!(c.classify("   "), Category::Unknown);
    }

    #[test]
    fn test_table_order_matches_category_priority() {
        let c = Classifier::default();
        let order: Vec<_> = c.rules().iter().map(|r| r.category).collect();
        assert_eq!(order, Category::ALL[..7].to_vec());
    }

    #[test]
    fn test_extend_keeps_priority() {
        let mut c = Classifier::default();
        c.extend(Category::Bonus, ["Mystery Drop", "bonus"]);
        assert_eq!(c.classify("mystery drop #12"), Category::Bonus);
        let bonus = c.rules().iter().find(|r| r.category == Category::Bonus).unwrap();
        assert_eq!(bonus.patterns.iter().filter(|p| *p == "bonus").count(), 1);
        // still behind rakeback
        c.extend(Category::Bonus, ["cashback"]);
        assert_eq!(c.classify("cashback"), Category::Rakeback);
    }

    #[test]
    fn test_extend_unknown_is_ignored() {
        let mut c = Classifier::default();
        c.extend(Category::Unknown, ["transfer"]);
        assert_eq!(c, Classifier::default());
    }

    #[test]
    fn test_every_result_is_a_known_category() {
        let c = Classifier::default();
        for label in ["", "x", "Deposit", "Cashout", "Commission", "Promo code", "???"] {
            assert!(Category::ALL.contains(&c.classify(label)));
        }
    }
}
