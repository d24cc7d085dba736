//! Type-safe price representation using decimal arithmetic.
//!
//! The catalog API stores prices as plain JSON numbers in a single currency,
//! so [`Price`] serializes as a float and always displays with a `$` sign.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`] from form input.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is not a decimal number.
    #[error("price must be a number")]
    NotANumber,
    /// The input is below zero.
    #[error("price cannot be negative")]
    Negative,
}

/// A non-negative catalog price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Returns the decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Format for display, e.g. `$19.99`.
    #[must_use]
    pub fn display(&self) -> String {
        format!("${:.2}", self.0)
    }

    /// Format without the currency sign and trailing zeros, e.g. `19.5`.
    ///
    /// Used where the price is embedded into free text (WhatsApp messages) or
    /// pre-filled into a numeric form input.
    #[must_use]
    pub fn plain(&self) -> String {
        self.0.normalize().to_string()
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Self::default());
        }
        let amount = Decimal::from_str(s).map_err(|_| PriceError::NotANumber)?;
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        Ok(Self(amount))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price(s: &str) -> Price {
        s.parse().unwrap_or_default()
    }

    #[test]
    fn test_display_two_decimals() {
        assert_eq!(price("19.5").display(), "$19.50");
        assert_eq!(price("7").display(), "$7.00");
    }

    #[test]
    fn test_plain_drops_trailing_zeros() {
        assert_eq!(price("19.50").plain(), "19.5");
        assert_eq!(price("20.00").plain(), "20");
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!("abc".parse::<Price>(), Err(PriceError::NotANumber));
        assert_eq!("-1".parse::<Price>(), Err(PriceError::Negative));
    }

    #[test]
    fn test_empty_input_is_zero() {
        assert_eq!("".parse::<Price>(), Ok(Price::default()));
    }

    #[test]
    fn test_serde_uses_json_numbers() {
        let parsed: Result<Price, _> = serde_json::from_str("12.5");
        assert_eq!(parsed.ok().map(|p| p.display()).as_deref(), Some("$12.50"));

        let json = serde_json::to_string(&price("12.5")).unwrap_or_default();
        assert_eq!(json, "12.5");
    }
}
