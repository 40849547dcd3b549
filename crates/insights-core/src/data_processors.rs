use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::trace;

use crate::models::CellValue;

// ── DateProcessor ─────────────────────────────────────────────────────────────

/// Date-time layouts tried after RFC 3339 / RFC 2822. Only the date part is
/// kept.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Date-only layouts. Month-first wins over day-first for ambiguous input.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%m-%d-%Y",
    "%d.%m.%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

/// Parses calendar dates from spreadsheet cells.
///
/// Never fails loudly: anything unrecognised is `None`, which the
/// aggregator treats as an invalid row.
pub struct DateProcessor;

impl DateProcessor {
    /// Parse a cell into a calendar date.
    ///
    /// Only text cells can carry a date; numbers and blanks are rejected.
    pub fn parse(value: &CellValue) -> Option<NaiveDate> {
        match value {
            CellValue::Text(s) => Self::parse_str(s),
            CellValue::Number(_) | CellValue::Empty => None,
        }
    }

    /// Parse a date string using a fixed, locale-independent format list.
    ///
    /// Timestamps with an offset keep their own calendar day rather than
    /// being shifted to UTC.
    pub fn parse_str(s: &str) -> Option<NaiveDate> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.date_naive());
        }

        if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
            return Some(dt.date_naive());
        }

        for fmt in DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(naive.date());
            }
        }

        for fmt in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
                return Some(date);
            }
        }

        trace!("DateProcessor: could not parse date string \"{}\"", s);
        None
    }
}

// ── AmountProcessor ───────────────────────────────────────────────────────────

/// Parses currency amounts with plain decimal rules.
pub struct AmountProcessor;

impl AmountProcessor {
    pub fn parse(value: &CellValue) -> Option<Decimal> {
        match value {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => Self::parse_str(s),
            CellValue::Empty => None,
        }
    }

    /// Accepts integers, fractions and scientific notation with optional
    /// sign and surrounding whitespace.
    ///
    /// Rejects currency symbols, thousands separators, underscores, `NaN`
    /// and infinities.
    ///
    /// Amounts are limited to what `Decimal` holds: magnitudes up to about
    /// 7.9e28 and 28 fractional digits. Integers beyond that range and
    /// exponents beyond ±28 are rejected like non-numeric text, so the row
    /// is dropped as an invalid amount. Extra fractional digits are rounded,
    /// which turns anything smaller than 1e-28 into zero.
    pub fn parse_str(s: &str) -> Option<Decimal> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        let allowed = s
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'));
        if !allowed || !s.bytes().any(|b| b.is_ascii_digit()) {
            return None;
        }

        Decimal::from_str(s)
            .ok()
            .or_else(|| Decimal::from_scientific(s).ok())
    }
}

// ── CellConverter ─────────────────────────────────────────────────────────────

/// Turns raw sheet values into [`CellValue`]s.
pub struct CellConverter;

impl CellConverter {
    /// Numericise a raw cell string: blanks become [`CellValue::Empty`],
    /// numeric text becomes [`CellValue::Number`], everything else stays
    /// text.
    pub fn numericise(raw: &str) -> CellValue {
        if raw.is_empty() {
            return CellValue::Empty;
        }
        match AmountProcessor::parse_str(raw) {
            Some(n) => CellValue::Number(n),
            None => CellValue::Text(raw.to_string()),
        }
    }

    /// Convert a JSON value from a Sheets API response.
    pub fn from_json(value: &Value) -> CellValue {
        match value {
            Value::Null => CellValue::Empty,
            Value::String(s) => Self::numericise(s),
            Value::Number(n) => {
                let text = n.to_string();
                match AmountProcessor::parse_str(&text) {
                    Some(d) => CellValue::Number(d),
                    None => CellValue::Text(text),
                }
            }
            Value::Bool(b) => CellValue::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
            other => CellValue::Text(other.to_string()),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
