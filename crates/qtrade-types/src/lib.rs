//! Shared types for the qTrade REST API
//!
//! This crate provides the core type definitions used across the qtrade crates.
//! It has minimal dependencies and can be used independently.
//!
//! # Key Types
//!
//! - [`Currency`], [`CurrencyStatus`] - Listed currencies and their status
//! - [`Market`] - Trading markets with their market/base currencies
//! - [`OrderType`], [`Side`], [`Interval`] - Order and candle enums
//! - [`PrecisionTable`], [`round_to_places`] - Per-currency amount precision
//! - [`ErrorEnvelope`], [`ApiErrorDetail`] - Exchange error bodies
//! - [`TypesError`] - Error types

pub mod api_error;
pub mod currency;
pub mod enums;
pub mod error;
pub mod market;
pub mod precision;

// Re-export commonly used types
pub use api_error::*;
pub use currency::*;
pub use enums::*;
pub use error::*;
pub use market::*;
pub use precision::*;
