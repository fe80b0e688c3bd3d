//! Money as integer cents.
//!
//! Prices are entered as strings ("10", "10.5", "10.50") and carried as
//! cents everywhere else, so duplicate probes and derived totals compare
//! exactly.

/// Parse a price string into cents.
///
/// Accepts digits with an optional fraction of at most two decimal places.
/// Rejects anything else, including negative values and empty input.
pub fn parse_price(input: &str) -> Option<i64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let (whole, frac) = match trimmed.split_once('.') {
        Some((w, f)) => (w, f),
        None => (trimmed, ""),
    };

    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if frac.len() > 2 || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let whole: i64 = whole.parse().ok()?;
    let frac_cents = match frac.len() {
        0 => 0,
        1 => frac.parse::<i64>().ok()? * 10,
        _ => frac.parse::<i64>().ok()?,
    };

    whole.checked_mul(100)?.checked_add(frac_cents)
}

/// Parse a price string, treating anything invalid as zero.
///
/// This is the running-total rule for partially filled bill rows: the
/// total reflects valid rows and never errors on partial input.
pub fn parse_price_or_zero(input: &str) -> i64 {
    parse_price(input).unwrap_or(0)
}

/// Parse a quantity string, treating anything invalid as zero.
pub fn parse_quantity_or_zero(input: &str) -> i64 {
    input
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|q| *q >= 0)
        .unwrap_or(0)
}

/// Format cents as a two-decimal amount string.
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}
