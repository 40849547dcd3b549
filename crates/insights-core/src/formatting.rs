use rust_decimal::{Decimal, RoundingStrategy};

/// Format a decimal with thousands separators and a fixed number of decimal
/// places. Midpoints round away from zero.
///
/// # Examples
///
/// ```
/// use insights_core::formatting::format_number;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_number(Decimal::new(12345, 1), 1), "1,234.5");
/// assert_eq!(format_number(Decimal::new(1234567, 0), 0), "1,234,567");
/// assert_eq!(format_number(Decimal::ZERO, 2), "0.00");
/// assert_eq!(format_number(Decimal::new(-98765, 1), 1), "-9,876.5");
/// ```
pub fn format_number(value: Decimal, decimals: u32) -> String {
    let rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();

    let plain = format!("{:.prec$}", rounded.abs(), prec = decimals as usize);
    let (int_part, frac_part) = match plain.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (plain.as_str(), None),
    };

    let grouped = group_thousands(int_part);
    let result = match frac_part {
        Some(f) if decimals > 0 => format!("{}.{}", grouped, f),
        _ => grouped,
    };

    if negative {
        format!("-{}", result)
    } else {
        result
    }
}

/// Format a monetary amount as a USD string with two decimal places and
/// thousands separators.
///
/// # Examples
///
/// ```
/// use insights_core::formatting::format_currency;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_currency(Decimal::new(123456, 2)), "$1,234.56");
/// assert_eq!(format_currency(Decimal::ZERO), "$0.00");
/// assert_eq!(format_currency(Decimal::new(-999, 2)), "$-9.99");
/// ```
pub fn format_currency(amount: Decimal) -> String {
    format_currency_with("$", amount)
}

/// Same as [`format_currency`] with an arbitrary currency symbol prefix.
pub fn format_currency_with(symbol: &str, amount: Decimal) -> String {
    if amount.is_sign_negative() && !amount.is_zero() {
        format!("{}-{}", symbol, format_number(amount.abs(), 2))
    } else {
        format!("{}{}", symbol, format_number(amount, 2))
    }
}

/// Calculate `(part / whole) * 100`, rounded to `decimal_places`.
///
/// Returns zero if `whole` is zero.
///
/// # Examples
///
/// ```
/// use insights_core::formatting::percentage;
/// use rust_decimal::Decimal;
///
/// assert_eq!(percentage(Decimal::new(50, 0), Decimal::new(200, 0), 1), Decimal::new(250, 1));
/// assert_eq!(percentage(Decimal::ZERO, Decimal::ZERO, 2), Decimal::ZERO);
/// ```
pub fn percentage(part: Decimal, whole: Decimal, decimal_places: u32) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    (part / whole * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
