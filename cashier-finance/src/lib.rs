//! cashier-finance: filtering, per-currency aggregation and CSV export of cashier reports

pub mod aggregate;
pub mod export;
pub mod filter;

pub use aggregate::{AggregateOptions, aggregate, build_reports, monthly_buckets, totals};
pub use export::{export_path, export_reports, write_report_csv};
pub use filter::{TransactionFilter, partition_by_currency};
