//! Decimal amounts with at most two fractional digits.
//!
//! Budgets, prices, order totals and CO₂ figures travel as strings such as
//! `"42.50"`. Arithmetic happens on integer hundredths so sums never pick up
//! floating point noise.

use crate::errors::{Error, Result};

/// Parses a non-negative decimal with at most two fractional digits into hundredths.
///
/// Accepts exactly the shape `digits[.d[d]]`: no sign, no exponent, no
/// surrounding whitespace.
///
/// # Errors
/// Returns [`Error::Validation`] for any other input or on overflow.
pub fn parse_cents(input: &str) -> Result<i64> {
    let invalid = || Error::validation(format!("'{input}' must be a valid decimal number"));

    let (whole, fraction) = match input.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (input, None),
    };

    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let fraction_cents = match fraction {
        None => 0,
        Some(f) if (1..=2).contains(&f.len()) && f.bytes().all(|b| b.is_ascii_digit()) => {
            let value: i64 = f.parse().map_err(|_| invalid())?;
            if f.len() == 1 { value * 10 } else { value }
        }
        Some(_) => return Err(invalid()),
    };

    let whole: i64 = whole.parse().map_err(|_| invalid())?;
    whole
        .checked_mul(100)
        .and_then(|cents| cents.checked_add(fraction_cents))
        .ok_or_else(invalid)
}

/// Formats hundredths as a two-place decimal string (`4250` → `"42.50"`).
#[must_use]
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

/// Validates and normalizes an amount to exactly two decimal places.
///
/// # Errors
/// Returns [`Error::Validation`] if `input` is not a valid amount.
pub fn normalize(input: &str) -> Result<String> {
    parse_cents(input).map(format_cents)
}

/// Adds two stored amounts.
///
/// # Errors
/// Returns [`Error::Validation`] if either side is malformed or the sum overflows.
pub fn add(left: &str, right: &str) -> Result<String> {
    let sum = parse_cents(left)?
        .checked_add(parse_cents(right)?)
        .ok_or_else(|| Error::validation("amount overflow"))?;
    Ok(format_cents(sum))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_cents_accepts_budget_shapes() {
        assert_eq!(parse_cents("42.50").unwrap(), 4250);
        assert_eq!(parse_cents("42.5").unwrap(), 4250);
        assert_eq!(parse_cents("42").unwrap(), 4200);
        assert_eq!(parse_cents("0.07").unwrap(), 7);
        assert_eq!(parse_cents("007.10").unwrap(), 710);
    }

    #[test]
    fn test_parse_cents_rejects_malformed_input() {
        for bad in ["-5.00", "", ".50", "5.", "5.123", "abc", " 5", "5,00", "1e3", "+3"] {
            assert!(
                matches!(parse_cents(bad), Err(Error::Validation { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_cents_overflow_is_validation_error() {
        let huge = "9".repeat(30);
        assert!(matches!(parse_cents(&huge), Err(Error::Validation { .. })));
    }

    #[test]
    fn test_format_and_normalize() {
        assert_eq!(format_cents(4250), "42.50");
        assert_eq!(format_cents(5), "0.05");
        assert_eq!(format_cents(-150), "-1.50");
        assert_eq!(normalize("12.4").unwrap(), "12.40");
        assert_eq!(add("12.40", "1.2").unwrap(), "13.60");
    }
}
