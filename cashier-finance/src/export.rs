//! Flat CSV export of reports: one summary row, or one row per month.

use anyhow::{Context, Result};
use cashier_core::{Category, Report};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
struct SummaryRow<'a> {
    currency: &'a str,
    from: String,
    to: String,
    deposits: String,
    withdrawals: String,
    net_cashflow: String,
    buyins: String,
    payouts: String,
    game_result: String,
    rakeback: String,
    bonus: String,
    fee: String,
    total_profit: String,
    effective: String,
}

#[derive(Debug, Serialize)]
struct MonthlyRow<'a> {
    currency: &'a str,
    year: i32,
    month: u32,
    net: String,
    game: String,
    rakeback: String,
    bonus: String,
    total: String,
    effective: String,
}

fn money(v: Decimal) -> String {
    let v = v.round_dp(2);
    // no "-0.00"
    let v = if v.is_zero() { Decimal::ZERO } else { v };
    format!("{v:.2}")
}

/// Write one report. Monthly rows when the report carries monthly
/// buckets, otherwise a single summary row.
pub fn write_report_csv<W: Write>(w: W, report: &Report) -> Result<()> {
    let mut wrt = csv::Writer::from_writer(w);

    match &report.monthly {
        Some(buckets) => {
            if buckets.is_empty() {
                wrt.write_record([
                    "currency", "year", "month", "net", "game", "rakeback", "bonus", "total",
                    "effective",
                ])?;
            }
            for b in buckets {
                wrt.serialize(MonthlyRow {
                    currency: &report.currency,
                    year: b.month.year,
                    month: b.month.month,
                    net: money(b.derived.net_cashflow),
                    game: money(b.derived.game_result),
                    rakeback: money(b.totals.get(Category::Rakeback)),
                    bonus: money(b.totals.get(Category::Bonus)),
                    total: money(b.derived.total_profit),
                    effective: money(b.derived.effective),
                })?;
            }
        }
        None => {
            let t = &report.totals;
            let m = &report.derived;
            wrt.serialize(SummaryRow {
                currency: &report.currency,
                from: report.period.start.map(|d| d.to_string()).unwrap_or_default(),
                to: report.period.end.map(|d| d.to_string()).unwrap_or_default(),
                deposits: money(t.get(Category::Deposit)),
                withdrawals: money(t.get(Category::Withdrawal)),
                net_cashflow: money(m.net_cashflow),
                buyins: money(t.get(Category::Buyin)),
                payouts: money(t.get(Category::Payout)),
                game_result: money(m.game_result),
                rakeback: money(t.get(Category::Rakeback)),
                bonus: money(t.get(Category::Bonus)),
                fee: money(t.get(Category::Fee)),
                total_profit: money(m.total_profit),
                effective: money(m.effective),
            })?;
        }
    }

    wrt.flush()?;
    Ok(())
}

/// `report.csv` -> `report_USD.csv` when each currency gets its own file
pub fn export_path(base: &Path, currency: &str, per_currency: bool) -> PathBuf {
    if !per_currency {
        return base.to_path_buf();
    }
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "report".to_string());
    let ext = base
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "csv".to_string());
    base.with_file_name(format!("{stem}_{currency}.{ext}"))
}

/// Write every report under `base`. Several reports get one file per
/// currency; parent directories are created.
pub fn export_reports(base: &Path, reports: &[Report]) -> Result<Vec<PathBuf>> {
    let per_currency = reports.len() > 1;
    let mut written = Vec::with_capacity(reports.len());

    for report in reports {
        let path = export_path(base, &report.currency, per_currency);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
        let file = fs::File::create(&path).with_context(|| format!("write {}", path.display()))?;
        write_report_csv(file, report).with_context(|| format!("write {}", path.display()))?;
        log::info!("exported {} report to {}", report.currency, path.display());
        written.push(path);
    }

    Ok(written)
}
