//! Error types for qTrade shared types

use thiserror::Error;

/// Errors raised while resolving currencies, markets, intervals and amounts
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypesError {
    /// Currency is absent from the precision table or unknown to the client
    #[error("Unsupported currency: {currency}")]
    UnsupportedCurrency { currency: String },

    /// Market name or id is not in the market table
    #[error("Unknown market: {0}")]
    UnknownMarket(String),

    /// OHLCV interval name is not recognized
    #[error("Unknown interval: {0}")]
    UnknownInterval(String),

    /// Amount cannot be formatted as a fixed-decimal string (NaN or infinite)
    #[error("Invalid amount for {currency}: {amount}")]
    InvalidAmount { currency: String, amount: String },
}

impl TypesError {
    /// Create an unsupported currency error
    pub fn unsupported_currency(currency: impl Into<String>) -> Self {
        Self::UnsupportedCurrency {
            currency: currency.into(),
        }
    }
}

/// Result type alias for type-level operations
pub type TypesResult<T> = Result<T, TypesError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_currency_carries_code() {
        let err = TypesError::unsupported_currency("UNKNOWN");
        assert!(err.to_string().contains("UNKNOWN"));
        assert_eq!(
            err,
            TypesError::UnsupportedCurrency {
                currency: "UNKNOWN".to_string()
            }
        );
    }
}
