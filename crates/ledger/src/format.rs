//! Display formatting for amounts and dates.
//!
//! Presentation only: nothing here changes the underlying values.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::entry::BalanceSide;

/// Offset used to pick the calendar day of a timestamp (IST, +05:30).
pub const DISPLAY_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Render an amount with Indian digit grouping and no fractional digits.
///
/// `None` renders as `"0"`. Halves round away from zero.
pub fn format_currency(amount: Option<Decimal>) -> String {
    let Some(amount) = amount else {
        return "0".to_string();
    };

    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let text = rounded.abs().trunc().to_string();
    let digits = text.split('.').next().unwrap_or("0");
    let grouped = group_indian(digits);

    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Same as [`format_currency`] for raw floats; NaN and infinities render as `"0"`.
pub fn format_currency_f64(amount: Option<f64>) -> String {
    format_currency(amount.filter(|v| v.is_finite()).and_then(Decimal::from_f64))
}

/// `"3,000 Dr"`; the side is omitted when unknown.
pub fn format_balance(amount: Decimal, side: Option<BalanceSide>) -> String {
    let value = format_currency(Some(amount.abs()));
    match side {
        Some(side) => format!("{value} {side}"),
        None => value,
    }
}

/// Render a date string as `DD Mon YYYY`.
///
/// Absent or blank input renders as `"N/A"`, unparseable input as
/// `"Invalid Date"`. Timestamps carrying an offset are shown on their
/// calendar day at [`DISPLAY_OFFSET_SECS`].
pub fn format_date(date: Option<&str>) -> String {
    let Some(raw) = date.map(str::trim).filter(|s| !s.is_empty()) else {
        return "N/A".to_string();
    };

    match parse_display_date(raw) {
        Some(d) => d.format("%d %b %Y").to_string(),
        None => "Invalid Date".to_string(),
    }
}

/// Calendar day a date string refers to, if it parses.
pub fn parse_display_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(d);
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        let offset = FixedOffset::east_opt(DISPLAY_OFFSET_SECS)?;
        return Some(ts.with_timezone(&offset).date_naive());
    }

    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
}

/// `1234567` -> `12,34,567`: last three digits, then pairs.
fn group_indian(digits: &str) -> String {
    let len = digits.len();
    if len <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(len - 3);
    let mut out = String::with_capacity(len + len / 2);
    let lead = head.len() % 2;
    if lead == 1 {
        out.push_str(&head[..1]);
    }
    for (i, chunk) in head.as_bytes()[lead..].chunks(2).enumerate() {
        if i > 0 || lead == 1 {
            out.push(',');
        }
        out.push_str(core::str::from_utf8(chunk).unwrap_or_default());
    }
    out.push(',');
    out.push_str(tail);
    out
}
