//! OrderType, Side and Interval enums

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::TypesError;

/// Order types accepted by the exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    /// Limit order to sell the market currency
    SellLimit,
    /// Limit order to buy the market currency
    BuyLimit,
}

impl OrderType {
    /// Returns the order type as used in API paths and payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SellLimit => "sell_limit",
            Self::BuyLimit => "buy_limit",
        }
    }

    /// Side of the book this order type rests on
    pub fn side(&self) -> Side {
        match self {
            Self::SellLimit => Side::Sell,
            Self::BuyLimit => Side::Buy,
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trade side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Buy order
    Buy,
    /// Sell order
    Sell,
}

impl Side {
    /// Returns the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }
}

/// OHLCV candle interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    FiveMin,
    FifteenMin,
    ThirtyMin,
    OneHour,
    TwoHour,
    FourHour,
    OneDay,
}

const INTERVAL_TABLE: &[(Interval, &str, u64)] = &[
    (Interval::FiveMin, "fivemin", 5 * 60),
    (Interval::FifteenMin, "fifteenmin", 15 * 60),
    (Interval::ThirtyMin, "thirtymin", 30 * 60),
    (Interval::OneHour, "onehour", 60 * 60),
    (Interval::TwoHour, "twohour", 2 * 60 * 60),
    (Interval::FourHour, "fourhour", 4 * 60 * 60),
    (Interval::OneDay, "oneday", 24 * 60 * 60),
];

impl Interval {
    /// All intervals, shortest first
    pub fn all() -> impl Iterator<Item = Interval> {
        INTERVAL_TABLE.iter().map(|row| row.0)
    }

    /// Interval name as used in the OHLCV path
    pub fn as_str(&self) -> &'static str {
        INTERVAL_TABLE[*self as usize].1
    }

    /// Length of one candle
    pub fn duration(&self) -> Duration {
        Duration::from_secs(INTERVAL_TABLE[*self as usize].2)
    }
}

impl FromStr for Interval {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        INTERVAL_TABLE
            .iter()
            .find(|row| row.1 == s)
            .map(|row| row.0)
            .ok_or_else(|| TypesError::UnknownInterval(s.to_string()))
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
