use thiserror::Error;

/// Prices are integer cents so sums stay exact.
/// For USD, 1 unit = 100 cents, so $19.99 = 1999 cents.
pub type Cents = i64;

/// Format cents as a decimal amount.
/// Example: 1999 -> "19.99", 5 -> "0.05", -1234 -> "-12.34"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.abs();
    format!("{}{}.{:02}", sign, abs_cents / 100, abs_cents % 100)
}

/// Format a price the way invoices print it: "19.99$".
pub fn format_price(cents: Cents) -> String {
    format!("{}$", format_cents(cents))
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParsePriceError {
    #[error("invalid price format: {0}")]
    InvalidFormat(String),

    #[error("price cannot be negative: {0}")]
    Negative(String),
}

/// Parse a decimal price into cents.
/// Example: "19.99" -> 1999, "12.5" -> 1250, "7" -> 700.
/// Digits past the second decimal place are truncated.
pub fn parse_price(input: &str) -> Result<Cents, ParsePriceError> {
    let trimmed = input.trim().trim_end_matches('$');
    if trimmed.starts_with('-') {
        return Err(ParsePriceError::Negative(input.to_string()));
    }
    let invalid = || ParsePriceError::InvalidFormat(input.to_string());

    let (units_str, decimal_str) = match trimmed.split_once('.') {
        Some((units, decimals)) => (units, decimals),
        None => (trimmed, ""),
    };
    if units_str.is_empty() && decimal_str.is_empty() {
        return Err(invalid());
    }
    if !decimal_str.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let units: i64 = if units_str.is_empty() {
        0
    } else {
        units_str.parse().map_err(|_| invalid())?
    };

    let decimal_cents: i64 = match decimal_str.len() {
        0 => 0,
        1 => decimal_str.parse::<i64>().map_err(|_| invalid())? * 10,
        _ => decimal_str[..2].parse().map_err(|_| invalid())?,
    };

    units
        .checked_mul(100)
        .and_then(|c| c.checked_add(decimal_cents))
        .ok_or_else(invalid)
}
