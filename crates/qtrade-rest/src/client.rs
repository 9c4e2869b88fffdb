//! Main REST client implementation

use crate::config::ClientConfig;
use crate::dispatch::Dispatcher;
use crate::endpoints::{AccountEndpoints, FundingEndpoints, MarketEndpoints, TradingEndpoints};
use crate::error::{RestError, RestResult};
use crate::types::{Balance, DepositAddress, Order, Orderbook, Ticker, WithdrawData};
use qtrade_auth::Credentials;
use qtrade_types::{Market, PrecisionTable};
use reqwest::Client;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

const DEFAULT_USER_AGENT: &str = concat!("qtrade-rest/", env!("CARGO_PKG_VERSION"));

/// qTrade REST API client
///
/// Provides access to both public and private endpoints. Cloning is cheap
/// and clones share the connection pool, precision table and cancellation
/// token.
///
/// # Example
///
/// ```no_run
/// use qtrade_rest::{ClientConfig, QtradeRestClient};
/// use qtrade_types::Market;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     // Public endpoints only
///     let client = QtradeRestClient::new()?;
///     let ticker = client.get_ticker(Market::LtcBtc).await?;
///
///     // With authentication for private endpoints
///     let config = ClientConfig::from_env()?;
///     let auth_client = QtradeRestClient::with_config(config)?;
///     let balances = auth_client.get_balances().await?;
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct QtradeRestClient {
    dispatcher: Dispatcher,
    precision: Arc<PrecisionTable>,
}

impl QtradeRestClient {
    /// Create a new client without authentication
    ///
    /// Only public endpoints will be available.
    pub fn new() -> RestResult<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client from configuration
    ///
    /// Credentials are parsed from `hmac_keypair` when present.
    pub fn with_config(config: ClientConfig) -> RestResult<Self> {
        let credentials = config.credentials()?;
        Self::build(config, credentials)
    }

    /// Create a client with explicit credentials, ignoring `hmac_keypair`
    pub fn with_credentials(config: ClientConfig, credentials: Credentials) -> RestResult<Self> {
        Self::build(config, Some(credentials))
    }

    fn build(config: ClientConfig, credentials: Option<Credentials>) -> RestResult<Self> {
        if config.timeout_secs == 0 {
            return Err(RestError::Config("timeout_secs must be at least 1".to_string()));
        }

        let http_client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT))
            .build()
            .map_err(|e| RestError::Config(format!("could not build HTTP client: {e}")))?;

        let dispatcher = Dispatcher::new(
            http_client,
            config.endpoint.as_str(),
            credentials,
            config.body_signing,
            config.retry_config(),
            config.timeout(),
        )?;

        info!(
            endpoint = %dispatcher.endpoint(),
            authenticated = dispatcher.has_credentials(),
            "Created qTrade REST client"
        );

        Ok(Self {
            dispatcher,
            precision: Arc::new(PrecisionTable::qtrade_defaults()),
        })
    }

    /// Replace the precision table used for order and withdrawal amounts
    pub fn with_precision_table(mut self, table: PrecisionTable) -> Self {
        self.precision = Arc::new(table);
        self
    }

    /// Check if the client has credentials for private endpoints
    pub fn has_credentials(&self) -> bool {
        self.dispatcher.has_credentials()
    }

    /// Precision table used to format amounts
    pub fn precision(&self) -> &PrecisionTable {
        &self.precision
    }

    /// Underlying dispatcher, for endpoints this client does not wrap
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Token that aborts every in-flight and future call on this client
    pub fn cancellation_token(&self) -> CancellationToken {
        self.dispatcher.cancellation_token().clone()
    }

    /// Cancel every in-flight and future call on this client
    pub fn shutdown(&self) {
        info!("Cancelling qTrade REST client");
        self.dispatcher.cancellation_token().cancel();
    }

    // ========================================================================
    // Public Market Endpoints
    // ========================================================================

    /// Get market endpoints
    pub fn market(&self) -> MarketEndpoints<'_> {
        MarketEndpoints::new(&self.dispatcher)
    }

    /// Get the ticker for a market
    pub async fn get_ticker(&self, market: Market) -> RestResult<Ticker> {
        self.market().get_ticker(market).await
    }

    /// Get tickers for all markets
    pub async fn get_tickers(&self) -> RestResult<Vec<Ticker>> {
        self.market().get_tickers().await
    }

    /// Get the orderbook for a market
    pub async fn get_orderbook(&self, market: Market) -> RestResult<Orderbook> {
        self.market().get_orderbook(market).await
    }

    // ========================================================================
    // Private Account Endpoints
    // ========================================================================

    fn require_credentials(&self) -> RestResult<()> {
        if self.has_credentials() {
            Ok(())
        } else {
            Err(RestError::AuthRequired)
        }
    }

    /// Get account endpoints (requires credentials)
    pub fn account(&self) -> RestResult<AccountEndpoints<'_>> {
        self.require_credentials()?;
        Ok(AccountEndpoints::new(&self.dispatcher))
    }

    /// Get balances for all currencies
    pub async fn get_balances(&self) -> RestResult<Vec<Balance>> {
        self.account()?.get_balances(&[]).await
    }

    /// Get open orders
    pub async fn get_open_orders(&self) -> RestResult<Vec<Order>> {
        self.account()?.get_orders(&[("open", "true")]).await
    }

    // ========================================================================
    // Private Trading Endpoints
    // ========================================================================

    /// Get trading endpoints (requires credentials)
    pub fn trading(&self) -> RestResult<TradingEndpoints<'_>> {
        self.require_credentials()?;
        Ok(TradingEndpoints::new(&self.dispatcher, &self.precision))
    }

    /// Place a sell limit order
    pub async fn sell_limit(&self, market: Market, amount: f64, price: f64) -> RestResult<Order> {
        self.trading()?.sell_limit(market, amount, price).await
    }

    /// Place a buy limit order
    pub async fn buy_limit(&self, market: Market, amount: f64, price: f64) -> RestResult<Order> {
        self.trading()?.buy_limit(market, amount, price).await
    }

    /// Cancel an order by id
    pub async fn cancel_order(&self, id: u64) -> RestResult<()> {
        self.trading()?.cancel_order(id).await
    }

    // ========================================================================
    // Private Funding Endpoints
    // ========================================================================

    /// Get funding endpoints (requires credentials)
    pub fn funding(&self) -> RestResult<FundingEndpoints<'_>> {
        self.require_credentials()?;
        Ok(FundingEndpoints::new(&self.dispatcher, &self.precision))
    }

    /// Withdraw funds to an external address
    pub async fn withdraw(
        &self,
        address: &str,
        amount: f64,
        currency: impl AsRef<str>,
    ) -> RestResult<WithdrawData> {
        self.funding()?.withdraw(address, amount, currency).await
    }

    /// Get the deposit address for a currency
    pub async fn get_deposit_address(
        &self,
        currency: impl AsRef<str>,
    ) -> RestResult<DepositAddress> {
        self.funding()?.get_deposit_address(currency).await
    }
}

impl std::fmt::Debug for QtradeRestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QtradeRestClient")
            .field("endpoint", &self.dispatcher.endpoint())
            .field("has_credentials", &self.has_credentials())
            .field("currencies", &self.precision.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_without_credentials() {
        let client = QtradeRestClient::new().unwrap();
        assert!(!client.has_credentials());
        assert_eq!(client.dispatcher().endpoint(), "https://api.qtrade.io");
    }

    #[test]
    fn test_client_with_keypair() {
        let config = ClientConfig::new().with_hmac_keypair("256:vwj043jtrw4o5igw4oi5jwoi45g");
        let client = QtradeRestClient::with_config(config).unwrap();
        assert!(client.has_credentials());

        let debug = format!("{:?}", client);
        assert!(!debug.contains("vwj043"));
    }

    #[test]
    fn test_malformed_keypair_fails_construction() {
        let config = ClientConfig::new().with_hmac_keypair("nocolon");
        let result = QtradeRestClient::with_config(config);
        assert!(matches!(result, Err(RestError::Auth(_))));
    }

    #[test]
    fn test_zero_timeout_fails_construction() {
        let result = QtradeRestClient::with_config(ClientConfig::new().with_timeout(0));
        assert!(matches!(result, Err(RestError::Config(_))));

        let config: ClientConfig = serde_json::from_str(r#"{"timeout_secs": 0}"#).unwrap();
        let result = QtradeRestClient::with_credentials(
            config,
            Credentials::parse("1:secret").unwrap(),
        );
        assert!(matches!(result, Err(RestError::Config(_))));
    }

    #[test]
    fn test_auth_required_error() {
        let client = QtradeRestClient::new().unwrap();
        assert!(matches!(client.account(), Err(RestError::AuthRequired)));
        assert!(matches!(client.trading(), Err(RestError::AuthRequired)));
        assert!(matches!(client.funding(), Err(RestError::AuthRequired)));
    }

    #[test]
    fn test_custom_precision_table() {
        let client = QtradeRestClient::new()
            .unwrap()
            .with_precision_table(PrecisionTable::new().with_places("BTC", 2));
        assert_eq!(client.precision().len(), 1);
        assert_eq!(client.precision().places_for("BTC").unwrap(), 2);
    }

    #[test]
    fn test_limit_order_request_uses_market_and_base_precision() {
        let client = QtradeRestClient::with_config(ClientConfig::new().with_hmac_keypair("1:x"))
            .unwrap();
        let trading = client.trading().unwrap();

        let body = trading
            .limit_order_request(Market::BtcUsdt, 0.123456789, 9123.4567891)
            .unwrap();
        assert_eq!(body.amount, "0.12345679");
        assert_eq!(body.price, "9123.456789");
        assert_eq!(body.market_id, 56);
    }
}
