//! Per-currency decimal precision and amount rounding
//!
//! The exchange rejects amounts carrying more fractional digits than a
//! currency allows, so every amount submitted in a request body is rendered
//! through a [`PrecisionTable`] first.
//!
//! The table is a plain value: clients own one (usually
//! [`PrecisionTable::qtrade_defaults`]) and tests can build their own.

use std::collections::HashMap;

use crate::currency::Currency;
use crate::error::{TypesError, TypesResult};

/// Round `x` to `places` decimal places, ties away from zero
///
/// Multiplies by `10^places`, rounds to the nearest integer and divides back.
pub fn round_to_places(x: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (x * factor).round() / factor
}

/// Mapping from currency code to the number of decimal places it accepts
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PrecisionTable {
    places: HashMap<String, u32>,
}

impl PrecisionTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Table covering every [`Currency`] with its exchange-documented precision
    pub fn qtrade_defaults() -> Self {
        Currency::all().fold(Self::new(), |table, currency| {
            table.with_places(currency.as_str(), currency.default_precision())
        })
    }

    /// Add or replace the precision for a currency code
    pub fn with_places(mut self, currency: impl Into<String>, places: u32) -> Self {
        self.places.insert(currency.into(), places);
        self
    }

    /// Decimal places accepted for `currency`
    pub fn places_for(&self, currency: &str) -> TypesResult<u32> {
        self.places
            .get(currency)
            .copied()
            .ok_or_else(|| TypesError::unsupported_currency(currency))
    }

    /// Round `amount` to the precision of `currency`
    pub fn round(&self, currency: &str, amount: f64) -> TypesResult<f64> {
        Ok(round_to_places(amount, self.places_for(currency)?))
    }

    /// Render `amount` as a fixed-decimal string with exactly the currency's places
    ///
    /// Ties round away from zero, matching [`round_to_places`]; `{:.N}` on
    /// its own would round them to even.
    pub fn format_amount(&self, currency: &str, amount: f64) -> TypesResult<String> {
        let places = self.places_for(currency)?;
        let rounded = round_to_places(amount, places);
        if !rounded.is_finite() {
            return Err(TypesError::InvalidAmount {
                currency: currency.to_string(),
                amount: amount.to_string(),
            });
        }
        Ok(format!("{:.*}", places as usize, rounded))
    }

    /// Returns true if the table knows `currency`
    pub fn contains(&self, currency: &str) -> bool {
        self.places.contains_key(currency)
    }

    /// Number of currencies in the table
    pub fn len(&self) -> usize {
        self.places.len()
    }

    /// Returns true if the table has no entries
    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_places() {
        assert_eq!(round_to_places(0.0, 2), 0.0);
        assert_eq!(round_to_places(101.0, 2), 101.0);
        assert_eq!(round_to_places(12.345, 2), 12.35);
        assert_eq!(round_to_places(12.3454321, 3), 12.345);
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round_to_places(2.5, 0), 3.0);
        assert_eq!(round_to_places(-2.5, 0), -3.0);
        assert_eq!(round_to_places(-12.345, 2), -12.35);
    }

    #[test]
    fn test_places_for() {
        let table = PrecisionTable::qtrade_defaults();
        assert_eq!(table.places_for("BTC").unwrap(), 8);
        assert_eq!(table.places_for("pUSD").unwrap(), 8);
        assert_eq!(table.places_for("BAN").unwrap(), 29);
        assert_eq!(table.len(), Currency::all().count());
    }

    #[test]
    fn test_places_for_unknown_currency() {
        let table = PrecisionTable::qtrade_defaults();
        let err = table.places_for("UNKNOWN").unwrap_err();
        assert_eq!(err, TypesError::unsupported_currency("UNKNOWN"));
    }

    #[test]
    fn test_custom_table() {
        let table = PrecisionTable::new().with_places("TEST", 3);
        assert!(table.contains("TEST"));
        assert!(!table.contains("BTC"));
        assert_eq!(table.round("TEST", 1.23456).unwrap(), 1.235);
        assert!(table.round("BTC", 1.0).is_err());
    }

    #[test]
    fn test_format_amount() {
        let table = PrecisionTable::qtrade_defaults();
        assert_eq!(table.format_amount("BTC", 0.5).unwrap(), "0.50000000");
        assert_eq!(table.format_amount("USDT", 12.3456789).unwrap(), "12.345679");
        assert_eq!(table.format_amount("HTR", 100.0).unwrap(), "100.00");
        assert_eq!(
            table.format_amount("ETH", 1.0).unwrap(),
            "1.000000000000000000"
        );
    }

    #[test]
    fn test_format_amount_ties_away_from_zero() {
        let table = PrecisionTable::qtrade_defaults()
            .with_places("X", 0)
            .with_places("Y", 1);

        assert_eq!(table.format_amount("HTR", 0.125).unwrap(), "0.13");
        assert_eq!(table.format_amount("X", 2.5).unwrap(), "3");
        assert_eq!(table.format_amount("X", -2.5).unwrap(), "-3");
        assert_eq!(table.format_amount("Y", 0.25).unwrap(), "0.3");
        assert_eq!(
            table.format_amount("HTR", 0.125).unwrap(),
            format!("{:.2}", table.round("HTR", 0.125).unwrap())
        );
    }

    #[test]
    fn test_format_amount_rejects_non_finite() {
        let table = PrecisionTable::qtrade_defaults();
        assert!(matches!(
            table.format_amount("BTC", f64::NAN),
            Err(TypesError::InvalidAmount { .. })
        ));
        assert!(matches!(
            table.format_amount("NOPE", 1.0),
            Err(TypesError::UnsupportedCurrency { .. })
        ));
    }
}
