//! REST API client for the qTrade cryptocurrency exchange
//!
//! This crate provides a REST API client for trading on qTrade, including
//! market data, account management, order execution and funding.
//!
//! # Features
//!
//! - **Market Data**: Common data, tickers, currencies, markets, orderbook, OHLCV
//! - **Account**: User info, balances, orders, trades, transfers
//! - **Trading**: Sell/buy limit orders, cancellation
//! - **Funding**: Withdrawals, deposits, deposit addresses
//!
//! # Authentication
//!
//! Private endpoints (`/v1/user/...`) require an HMAC keypair
//! (`<keyID>:<secret>`). Every attempt, retries included, is signed with a
//! fresh timestamp.
//!
//! # Example
//!
//! ```no_run
//! use qtrade_rest::{ClientConfig, QtradeRestClient};
//! use qtrade_types::Market;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Public endpoints (no auth required)
//!     let client = QtradeRestClient::new()?;
//!     let ticker = client.get_ticker(Market::BtcUsdt).await?;
//!     println!("BTC/USDT: {:?}", ticker.last);
//!
//!     // Private endpoints (auth required)
//!     let config = ClientConfig::new().with_hmac_keypair("1:secret");
//!     let auth_client = QtradeRestClient::with_config(config)?;
//!     let balances = auth_client.get_balances().await?;
//!     println!("Balances: {:?}", balances);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Retries
//!
//! - `429` waits for the `x-ratelimit-reset` seconds, then retries
//! - `500`/`503` wait for the fixed backoff, then retry
//! - any other status `>= 400` fails immediately
//!
//! At most `max_retries + 1` attempts are made, all within `timeout_secs`.

pub mod classify;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod endpoints;
pub mod error;
pub mod retry;
pub mod types;

// Re-export main types
pub use client::QtradeRestClient;
pub use config::ClientConfig;
pub use dispatch::{Dispatcher, RequestSpec};
pub use error::{ErrorKind, RestError, RestResult};
pub use qtrade_auth::{BodySigning, Credentials};
pub use retry::RetryConfig;

// Re-export endpoint-specific types
pub use types::{
    // Market data
    CommonData, CurrencyInfo, MarketInfo, MarketView, OhlcvSlice, Orderbook, PublicTrade, Ticker,
    // Account
    Balance, Order, PrivateTrade, Transfer, UserInfo, UserMarketData,
    // Funding
    DepositAddress, DepositDetails, WithdrawData, WithdrawDetails,
};
