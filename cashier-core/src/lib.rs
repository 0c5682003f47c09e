//! cashier-core: canonical categories, classification rules, transaction and report types

pub mod category;
pub mod report;
pub mod rules;
pub mod transaction;

pub use category::{Category, Direction, SignPolicy, UnknownCategory};
pub use report::{Derived, MonthlyBucket, Period, Report, Totals, YearMonth};
pub use rules::{Classifier, Rule, DEFAULT_RULES};
pub use transaction::{CanonicalTransaction, normalize_currency};
