//! Console rendering of reports.

use cashier_core::{Category, Report};
use cashier_ingest::SkipStats;
use crossterm::style::Stylize;
use rust_decimal::Decimal;
use std::fmt::Write;

const LABEL_WIDTH: usize = 16;
const AMOUNT_WIDTH: usize = 12;

/// Signed, two decimals, no "-0.00"
pub fn money(v: Decimal) -> String {
    let v = v.round_dp(2);
    if v.is_zero() {
        "+0.00".to_string()
    } else if v.is_sign_negative() {
        format!("{v:.2}")
    } else {
        format!("+{v:.2}")
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Painter {
    pub color: bool,
}

impl Painter {
    /// Right-aligned amount; padded before styling so escapes don't skew columns
    fn amount(&self, v: Decimal) -> String {
        let text = format!("{:>AMOUNT_WIDTH$}", money(v));
        if !self.color {
            text
        } else if v.is_sign_negative() && !v.round_dp(2).is_zero() {
            text.red().to_string()
        } else {
            text.green().to_string()
        }
    }

    fn heading(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.color {
            text.dark_grey().to_string()
        } else {
            text.to_string()
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    pub show_unknown: bool,
}

pub fn render_report(report: &Report, painter: Painter, options: RenderOptions) -> String {
    let mut out = String::new();
    let t = &report.totals;
    let m = &report.derived;

    let _ = writeln!(
        out,
        "{}  {}  {}",
        painter.heading(&report.currency),
        report.period,
        painter.dim(&format!("({} transactions)", report.transaction_count))
    );
    if report.is_empty() {
        let _ = writeln!(out, "  {}", painter.dim("no transactions in range"));
    }

    let lines = [
        ("Deposits", t.get(Category::Deposit)),
        ("Withdrawals", t.get(Category::Withdrawal)),
        ("Net cashflow", m.net_cashflow),
        ("Buy-ins", t.get(Category::Buyin)),
        ("Payouts", t.get(Category::Payout)),
        ("Game result", m.game_result),
        ("Rakeback", t.get(Category::Rakeback)),
        ("Bonus", t.get(Category::Bonus)),
        ("Fees", t.get(Category::Fee)),
        ("Total profit", m.total_profit),
        ("Effective", m.effective),
    ];
    for (label, value) in lines {
        let _ = writeln!(out, "  {label:<LABEL_WIDTH$}{}", painter.amount(value));
    }

    if let Some(buckets) = &report.monthly {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "  {}",
            painter.heading(&format!(
                "{:<9}{:>AMOUNT_WIDTH$}{:>AMOUNT_WIDTH$}{:>AMOUNT_WIDTH$}{:>AMOUNT_WIDTH$}{:>AMOUNT_WIDTH$}{:>AMOUNT_WIDTH$}",
                "Month", "Net", "Game", "Rakeback", "Bonus", "Total", "Effective"
            ))
        );
        if buckets.is_empty() {
            let _ = writeln!(out, "  {}", painter.dim("(no months)"));
        }
        for b in buckets {
            let _ = writeln!(
                out,
                "  {:<9}{}{}{}{}{}{}",
                b.month.to_string(),
                painter.amount(b.derived.net_cashflow),
                painter.amount(b.derived.game_result),
                painter.amount(b.totals.get(Category::Rakeback)),
                painter.amount(b.totals.get(Category::Bonus)),
                painter.amount(b.derived.total_profit),
                painter.amount(b.derived.effective),
            );
        }
    }

    if let Some(by_type) = &report.by_type {
        let _ = writeln!(out);
        let _ = writeln!(out, "  {}", painter.heading("By type"));
        for (category, value) in by_type {
            let _ = writeln!(
                out,
                "  {:<LABEL_WIDTH$}{}",
                category.as_str(),
                painter.amount(*value)
            );
        }
    }

    if options.show_unknown {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "  Unknown: {} rows, {} (not in derived metrics)",
            report.unknown_count,
            money(report.unknown_total)
        );
    }

    out
}

/// One line per skip reason, empty when nothing was skipped
pub fn render_skipped(skipped: &SkipStats) -> Option<String> {
    if skipped.total() == 0 {
        return None;
    }
    Some(format!(
        "Skipped {} rows (date: {}, amount: {}, currency: {}); first lines: {}",
        skipped.total(),
        skipped.date,
        skipped.amount,
        skipped.currency,
        skipped
            .sample_lines
            .iter()
            .map(|l| l.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cashier_core::{Derived, Period, Totals};

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    const PLAIN: Painter = Painter { color: false };

    #[test]
    fn test_money_format() {
        assert_eq!(money(d("50")), "+50.00");
        assert_eq!(money(d("-1")), "-1.00");
        assert_eq!(money(d("2.5")), "+2.50");
        assert_eq!(money(d("-0.001")), "+0.00");
        assert_eq!(money(Decimal::ZERO), "+0.00");
    }

    #[test]
    fn test_plain_summary() {
        let mut totals = Totals::default();
        totals.add(Category::Deposit, d("100"));
        totals.add(Category::Fee, d("-1"));
        let mut r = Report::empty("USD", Period::default());
        r.derived = Derived::from_totals(&totals);
        r.totals = totals;
        r.transaction_count = 2;

        let text = render_report(&r, PLAIN, RenderOptions::default());
        assert!(text.starts_with("USD  all available data  (2 transactions)"));
        assert!(text.contains("  Deposits             +100.00\n"));
        assert!(text.contains("  Effective              -1.00\n"));
        assert!(!text.contains('\u{1b}'));
        assert!(!text.contains("Unknown"));
    }

    #[test]
    fn test_unknown_line_and_empty_report() {
        let r = Report::empty("EUR", Period::default());
        let text = render_report(&r, PLAIN, RenderOptions { show_unknown: true });
        assert!(text.contains("no transactions in range"));
        assert!(text.contains("Unknown: 0 rows, +0.00"));
    }

    #[test]
    fn test_colored_amounts() {
        let painter = Painter { color: true };
        assert!(painter.amount(d("-5")).contains('\u{1b}'));
        assert_eq!(
            PLAIN.amount(d("-5")),
            format!("{:>AMOUNT_WIDTH$}", "-5.00")
        );
    }

    #[test]
    fn test_skipped_line() {
        assert_eq!(render_skipped(&SkipStats::default()), None);
        let stats = SkipStats {
            date: 1,
            amount: 0,
            currency: 0,
            sample_lines: vec![8],
        };
        assert_eq!(
            render_skipped(&stats).unwrap(),
            "Skipped 1 rows (date: 1, amount: 0, currency: 0); first lines: 8"
        );
    }
}
