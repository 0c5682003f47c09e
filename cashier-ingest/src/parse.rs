//! Cell-level parsing: timestamps and amounts as cashier exports write them.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::{IngestError, Result};
use crate::types::CellValue;

/// Accepted timestamp layouts, tried in order before the ISO fallbacks
pub const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d.%m.%Y",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%d/%m/%Y",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

// Whitespace (incl. NBSP / narrow NBSP thousands separators) and currency signs
static AMOUNT_NOISE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s\x{00A0}\x{202F}$€£₽¥']").expect("static regex"));

/// Largest magnitude accepted for a single amount. Anything bigger is
/// treated as unparseable so per-category sums cannot overflow.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

static AMOUNT_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)$").expect("static regex"));

/// Parse a timestamp string. Date-only values land at midnight.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt);
        }
        if let Ok(d) = NaiveDate::parse_from_str(value, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    // 2024-01-05T10:00:00[.123]
    if let Ok(dt) = NaiveDateTime::from_str(value) {
        return Some(dt);
    }
    // RFC 3339 with offset: keep the wall-clock time as written
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.naive_local())
}

pub fn parse_timestamp_cell(cell: &CellValue) -> Option<NaiveDateTime> {
    match cell {
        CellValue::DateTime(dt) => Some(*dt),
        CellValue::Text(s) => parse_timestamp(s),
        CellValue::Number(_) | CellValue::Empty => None,
    }
}

/// Parse an amount string.
///
/// A lone `,` is a decimal separator; with both `,` and `.` present the
/// last one is the decimal point. `(10.00)` reads as `-10.00`. Magnitudes
/// above [`MAX_AMOUNT`] are rejected.
pub fn parse_amount(value: &str) -> Option<Decimal> {
    let mut s = AMOUNT_NOISE.replace_all(value.trim(), "").into_owned();
    if s.is_empty() {
        return None;
    }

    let mut negative = false;
    if s.starts_with('(') && s.ends_with(')') && s.len() > 2 {
        negative = true;
        s = s[1..s.len() - 1].to_string();
    }

    // With both separators present, whichever comes last is the decimal point
    match (s.rfind(','), s.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => s = s.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => s = s.replace(',', ""),
        (Some(_), None) => s = s.replace(',', "."),
        _ => {}
    }

    if !AMOUNT_SHAPE.is_match(&s) {
        return None;
    }
    let s = s.strip_prefix('+').unwrap_or(&s);
    let amount = Decimal::from_str(s).ok().filter(in_range)?;
    Some(if negative { -amount } else { amount })
}

fn in_range(amount: &Decimal) -> bool {
    amount.abs() <= MAX_AMOUNT
}

pub fn parse_amount_cell(cell: &CellValue) -> Option<Decimal> {
    match cell {
        CellValue::Number(n) => Decimal::from_str(&n.to_string()).ok().filter(in_range),
        CellValue::Text(s) => parse_amount(s),
        CellValue::DateTime(_) | CellValue::Empty => None,
    }
}

/// Parse a `--from` / `--to` style argument into a date
pub fn parse_date_arg(value: &str) -> Result<NaiveDate> {
    parse_timestamp(value)
        .map(|dt| dt.date())
        .ok_or_else(|| IngestError::DateArgument(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_timestamp_formats() {
        assert_eq!(parse_timestamp("2024-01-05"), Some(dt("2024-01-05 00:00:00")));
        assert_eq!(parse_timestamp("2024-01-05 13:45:10"), Some(dt("2024-01-05 13:45:10")));
        assert_eq!(parse_timestamp("2024-01-05 13:45"), Some(dt("2024-01-05 13:45:00")));
        assert_eq!(parse_timestamp("05.01.2024"), Some(dt("2024-01-05 00:00:00")));
        assert_eq!(parse_timestamp("05.01.2024 08:00"), Some(dt("2024-01-05 08:00:00")));
        assert_eq!(parse_timestamp("05/01/2024 08:00:30"), Some(dt("2024-01-05 08:00:30")));
        assert_eq!(parse_timestamp(" 2024-01-05T10:00:00 "), Some(dt("2024-01-05 10:00:00")));
    }

    #[test]
    fn test_rfc3339_keeps_wall_clock() {
        assert_eq!(
            parse_timestamp("2024-01-31T23:30:00+03:00"),
            Some(dt("2024-01-31 23:30:00"))
        );
    }

    #[test]
    fn test_bad_timestamps() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("   "), None);
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("2024-13-01"), None);
        assert_eq!(parse_timestamp_cell(&CellValue::Number(45000.0)), None);
    }

    #[test]
    fn test_amounts() {
        assert_eq!(parse_amount("100"), Some(d("100")));
        assert_eq!(parse_amount("-50.00"), Some(d("-50")));
        assert_eq!(parse_amount("+2.5"), Some(d("2.5")));
        assert_eq!(parse_amount("2,5"), Some(d("2.5")));
        assert_eq!(parse_amount("1,234.56"), Some(d("1234.56")));
        assert_eq!(parse_amount("1 234,56"), Some(d("1234.56")));
        assert_eq!(parse_amount("1\u{00A0}234.56"), Some(d("1234.56")));
        assert_eq!(parse_amount("$10.00"), Some(d("10")));
        assert_eq!(parse_amount("(10.00)"), Some(d("-10")));
        assert_eq!(parse_amount("1.234,56"), Some(d("1234.56")));
        assert_eq!(parse_amount("1.234.567,8"), Some(d("1234567.8")));
        assert_eq!(parse_amount("1,234,567.8"), Some(d("1234567.8")));
    }

    #[test]
    fn test_amount_magnitude_limit() {
        assert_eq!(MAX_AMOUNT, d("1000000000000000"));
        assert_eq!(parse_amount("1000000000000000"), Some(MAX_AMOUNT));
        assert_eq!(parse_amount("-1000000000000000"), Some(-MAX_AMOUNT));
        assert_eq!(parse_amount("1000000000000000.01"), None);
        assert_eq!(parse_amount("79228162514264337593543950335"), None);
        assert_eq!(parse_amount("(79228162514264337593543950335)"), None);
        assert_eq!(parse_amount_cell(&CellValue::Number(1e20)), None);
    }

    #[test]
    fn test_bad_amounts() {
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("n/a"), None);
        assert_eq!(parse_amount("12abc"), None);
        assert_eq!(parse_amount("1.2.3"), None);
        assert_eq!(parse_amount("--5"), None);
        assert_eq!(parse_amount_cell(&CellValue::Empty), None);
    }

    #[test]
    fn test_numeric_cell() {
        assert_eq!(parse_amount_cell(&CellValue::Number(2.5)), Some(d("2.5")));
        assert_eq!(parse_amount_cell(&CellValue::Number(-10.0)), Some(d("-10")));
    }

    #[test]
    fn test_date_argument() {
        assert_eq!(
            parse_date_arg("2024-02-01").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
        );
        assert!(matches!(
            parse_date_arg("02-2024"),
            Err(IngestError::DateArgument(_))
        ));
    }
}
