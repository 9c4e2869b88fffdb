//! Types for qTrade REST API requests and responses

use chrono::{DateTime, Utc};
use qtrade_types::{Currency, CurrencyStatus, Market, OrderType, Side, TypesError, TypesResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashMap};

// ============================================================================
// API Response Wrapper
// ============================================================================

/// Standard qTrade success envelope: `{"data": ...}`
#[derive(Debug, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

impl<T> DataEnvelope<T> {
    /// Unwrap the payload
    pub fn into_inner(self) -> T {
        self.data
    }
}

/// Treat a JSON `null` array as empty
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn parse_currency(code: &str) -> TypesResult<Currency> {
    code.parse()
}

fn parse_market(id: u32) -> TypesResult<Market> {
    Market::from_id(id)
}

// ============================================================================
// Account Types
// ============================================================================

/// Account details returned by `/v1/user/me`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub can_login: bool,
    pub can_trade: bool,
    pub can_withdraw: bool,
    pub email: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email_addresses: Vec<EmailAddress>,
    #[serde(rename = "fname")]
    pub first_name: String,
    #[serde(rename = "lname")]
    pub last_name: String,
    pub id: u64,
    pub referral_code: String,
    pub tfa_enabled: bool,
    pub verification: String,
    pub verified_email: bool,
    pub withdraw_limit: i64,
}

/// Email address attached to an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailAddress {
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub id: u64,
    pub is_primary: bool,
    pub verified: bool,
}

/// Balance of one currency
///
/// The amount is kept as the exchange sent it; some currencies carry more
/// fractional digits than [`Decimal`] can hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub currency: String,
    pub balance: String,
}

impl Balance {
    /// Parse the currency code
    pub fn currency(&self) -> TypesResult<Currency> {
        parse_currency(&self.currency)
    }

    /// Balance as a decimal, if it fits
    pub fn amount(&self) -> Option<Decimal> {
        self.balance.parse().ok()
    }
}

/// Order as returned by order, market and trading endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(default)]
    pub base_amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub id: u64,
    pub market_amount: Decimal,
    pub market_amount_remaining: Decimal,
    pub market_id: u32,
    pub open: bool,
    pub order_type: OrderType,
    pub price: Decimal,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub trades: Vec<PrivateTrade>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_reason: Option<String>,
}

impl Order {
    /// Resolve the market id
    pub fn market(&self) -> TypesResult<Market> {
        parse_market(self.market_id)
    }

    /// Amount already filled
    pub fn filled_amount(&self) -> Decimal {
        self.market_amount - self.market_amount_remaining
    }

    /// Check if the order has been completely filled
    pub fn is_filled(&self) -> bool {
        self.market_amount_remaining.is_zero()
    }
}

/// Trade visible to the parties involved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrivateTrade {
    pub base_amount: Decimal,
    pub base_fee: Decimal,
    pub created_at: DateTime<Utc>,
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_id: Option<u32>,
    pub market_amount: Decimal,
    pub price: Decimal,
    pub taker: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
}

impl PrivateTrade {
    /// Resolve the market id, when the endpoint includes one
    pub fn market(&self) -> Option<TypesResult<Market>> {
        self.market_id.map(parse_market)
    }
}

/// Balances and orders for one market, from `/v1/user/market/{market}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserMarketData {
    pub base_balance: Decimal,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub closed_orders: Vec<Order>,
    pub market_balance: Decimal,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub open_orders: Vec<Order>,
}

/// Internal transfer credited to the account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub currency: String,
    pub id: u64,
    pub reason_code: String,
    #[serde(default)]
    pub reason_metadata: HashMap<String, serde_json::Value>,
    pub sender_email: String,
    pub sender_id: u64,
}

impl Transfer {
    /// Parse the currency code
    pub fn currency(&self) -> TypesResult<Currency> {
        parse_currency(&self.currency)
    }
}

// ============================================================================
// Funding Types
// ============================================================================

/// Result of a withdrawal request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawData {
    pub code: String,
    pub id: u64,
    pub result: String,
}

/// Withdrawal record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawDetails {
    pub address: String,
    pub amount: String,
    pub cancel_requested: bool,
    pub created_at: DateTime<Utc>,
    pub currency: String,
    pub id: u64,
    #[serde(default)]
    pub network_data: HashMap<String, serde_json::Value>,
    pub relay_status: String,
    pub status: String,
    pub user_id: u64,
}

impl WithdrawDetails {
    /// Parse the currency code
    pub fn currency(&self) -> TypesResult<Currency> {
        parse_currency(&self.currency)
    }

    /// Withdrawn amount as a decimal, if it fits
    pub fn amount(&self) -> Option<Decimal> {
        self.amount.parse().ok()
    }
}

/// Deposit record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositDetails {
    pub address: String,
    pub amount: String,
    pub created_at: DateTime<Utc>,
    pub currency: String,
    /// Deposit identifier (usually `<vout>:<txid>` or a hash)
    pub id: String,
    #[serde(default)]
    pub network_data: HashMap<String, serde_json::Value>,
    pub relay_status: String,
    pub status: String,
}

impl DepositDetails {
    /// Parse the currency code
    pub fn currency(&self) -> TypesResult<Currency> {
        parse_currency(&self.currency)
    }

    /// Deposited amount as a decimal, if it fits
    pub fn amount(&self) -> Option<Decimal> {
        self.amount.parse().ok()
    }
}

/// Deposit address for a currency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositAddress {
    pub address: String,
    pub currency_status: CurrencyStatus,
}

// ============================================================================
// Market Data Types
// ============================================================================

/// Trade as shown on public endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicTrade {
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub id: u64,
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller_taker: Option<bool>,
}

/// 24h ticker for one market
///
/// Price fields are null on markets without recent trades.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    pub ask: Option<Decimal>,
    pub bid: Option<Decimal>,
    pub day_avg_price: Option<Decimal>,
    pub day_change: Option<Decimal>,
    pub day_high: Option<Decimal>,
    pub day_low: Option<Decimal>,
    pub day_open: Option<Decimal>,
    pub day_volume_base: Decimal,
    pub day_volume_market: Decimal,
    /// Market id
    pub id: u32,
    /// Market name (e.g. "LTC_BTC")
    pub id_hr: String,
    pub last: Option<Decimal>,
}

impl Ticker {
    /// Resolve the market id
    pub fn market(&self) -> TypesResult<Market> {
        parse_market(self.id)
    }

    /// Get the mid price (average of bid and ask)
    pub fn mid_price(&self) -> Option<Decimal> {
        let ask = self.ask?;
        let bid = self.bid?;
        Some((ask + bid) / Decimal::TWO)
    }

    /// Get the spread (ask - bid)
    pub fn spread(&self) -> Option<Decimal> {
        Some(self.ask? - self.bid?)
    }
}

/// Currency listing details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyInfo {
    pub can_withdraw: bool,
    pub code: String,
    pub config: CurrencyConfig,
    pub long_name: String,
    #[serde(default)]
    pub metadata: CurrencyMetadata,
    pub precision: u32,
    pub status: CurrencyStatus,
    #[serde(rename = "type")]
    pub currency_type: String,
}

impl CurrencyInfo {
    /// Parse the currency code
    pub fn currency(&self) -> TypesResult<Currency> {
        parse_currency(&self.code)
    }
}

/// Per-currency chain configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyConfig {
    pub address_version: Option<i64>,
    pub default_signer: i64,
    /// Indicative USD price
    pub price: f64,
    pub required_confirmations: u32,
    pub required_generate_confirmations: Option<u32>,
    pub satoshi_per_byte: Option<u32>,
    pub wif_version: Option<u32>,
    pub withdraw_fee: Decimal,
    #[serde(rename = "explorerAddressURL")]
    pub explorer_address_url: Option<String>,
    #[serde(rename = "explorerTransactionURL")]
    pub explorer_transaction_url: Option<String>,
    pub p2sh_address_version: Option<i64>,
    pub data_max: Option<u32>,
    pub enable_address_data: Option<bool>,
}

/// Listing notices for a currency
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyMetadata {
    pub delisting_date: Option<String>,
    pub withdraw_notices: Vec<serde_json::Value>,
    pub deposit_notices: Vec<serde_json::Value>,
    pub hidden: bool,
}

/// Market listing details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketInfo {
    pub base_currency: String,
    pub can_cancel: bool,
    pub can_trade: bool,
    pub can_view: bool,
    pub id: u32,
    pub maker_fee: Decimal,
    pub market_currency: String,
    #[serde(default)]
    pub metadata: MarketMetadata,
    pub taker_fee: Decimal,
}

impl MarketInfo {
    /// Resolve the market id
    pub fn market(&self) -> TypesResult<Market> {
        parse_market(self.id)
    }
}

/// Listing notices for a market
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketMetadata {
    pub delisting_date: Option<String>,
    pub market_notices: Vec<MarketNotice>,
    pub labels: Vec<serde_json::Value>,
}

/// A notice shown on a market page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketNotice {
    pub message: String,
    #[serde(rename = "type")]
    pub notice_type: String,
}

/// Everything returned by `/v1/common`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonData {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub currencies: Vec<CurrencyInfo>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub markets: Vec<MarketInfo>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tickers: Vec<Ticker>,
}

/// Market details with its latest public trades
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketView {
    pub market: MarketInfo,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub recent_trades: Vec<PublicTrade>,
}

/// Orderbook as sent on the wire: price and amount are both strings
#[derive(Debug, Clone, Deserialize)]
pub struct RawOrderbook {
    #[serde(default)]
    pub buy: HashMap<String, String>,
    pub last_change: i64,
    #[serde(default)]
    pub sell: HashMap<String, String>,
}

/// Orderbook with parsed price levels
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Orderbook {
    /// price -> amount, ascending by price
    pub buy: BTreeMap<Decimal, Decimal>,
    /// Last change time in microseconds since the epoch
    pub last_change: i64,
    /// price -> amount, ascending by price
    pub sell: BTreeMap<Decimal, Decimal>,
}

impl Orderbook {
    /// Highest bid (price, amount)
    pub fn best_bid(&self) -> Option<(Decimal, Decimal)> {
        self.buy.iter().next_back().map(|(p, a)| (*p, *a))
    }

    /// Lowest ask (price, amount)
    pub fn best_ask(&self) -> Option<(Decimal, Decimal)> {
        self.sell.iter().next().map(|(p, a)| (*p, *a))
    }

    /// Get the spread (best ask - best bid)
    pub fn spread(&self) -> Option<Decimal> {
        Some(self.best_ask()?.0 - self.best_bid()?.0)
    }
}

impl TryFrom<RawOrderbook> for Orderbook {
    type Error = TypesError;

    fn try_from(raw: RawOrderbook) -> Result<Self, Self::Error> {
        Ok(Self {
            buy: parse_levels(raw.buy)?,
            last_change: raw.last_change,
            sell: parse_levels(raw.sell)?,
        })
    }
}

fn parse_levels(levels: HashMap<String, String>) -> TypesResult<BTreeMap<Decimal, Decimal>> {
    levels
        .into_iter()
        .map(|(price, amount)| {
            let p = price.parse::<Decimal>();
            let a = amount.parse::<Decimal>();
            match (p, a) {
                (Ok(p), Ok(a)) => Ok((p, a)),
                _ => Err(TypesError::InvalidAmount {
                    currency: "orderbook".to_string(),
                    amount: format!("{price}: {amount}"),
                }),
            }
        })
        .collect()
}

/// One OHLCV candle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcvSlice {
    pub close: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub open: Decimal,
    pub time: DateTime<Utc>,
    pub volume: Decimal,
}

// ============================================================================
// Request Bodies
// ============================================================================

/// Body of `sell_limit` / `buy_limit`
///
/// Amount and price are pre-formatted at the precision of the market and
/// base currency respectively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LimitOrderRequest {
    pub amount: String,
    pub market_id: u32,
    pub price: String,
}

/// Body of `withdraw`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WithdrawRequest {
    pub address: String,
    pub amount: String,
    pub currency: String,
}

/// Body of `cancel_order`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CancelOrderRequest {
    pub id: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_balances_envelope() {
        let json = r#"{"data": {"balances": [{"balance": "100000000","currency": "DOGE"},{"balance": "99992435.78253015","currency": "LTC"}]}}"#;

        #[derive(Deserialize)]
        struct Balances {
            balances: Vec<Balance>,
        }

        let balances = serde_json::from_str::<DataEnvelope<Balances>>(json)
            .unwrap()
            .into_inner()
            .balances;
        assert_eq!(balances.len(), 2);
        assert_eq!(balances[0].currency().unwrap(), Currency::Doge);
        assert_eq!(balances[1].amount(), Some(dec!(99992435.78253015)));
    }

    #[test]
    fn test_order_with_null_trades_and_missing_base_amount() {
        let json = r#"{"created_at": "2018-04-06T17:59:27.347006Z","id": 13192,"market_amount": "5.00245975","market_amount_remaining": "0.0173805","market_id": 1,"open": true,"order_type": "sell_limit","price": "9.90428849","trades": null}"#;
        let order: Order = serde_json::from_str(json).unwrap();

        assert_eq!(order.base_amount, Decimal::ZERO);
        assert!(order.trades.is_empty());
        assert_eq!(order.market().unwrap(), Market::LtcBtc);
        assert_eq!(order.order_type, OrderType::SellLimit);
        assert_eq!(order.filled_amount(), dec!(4.98507925));
        assert!(!order.is_filled());
    }

    #[test]
    fn test_private_trade_side() {
        let json = r#"{"base_amount": "0.000434","base_fee": "0.00000217","created_at": "2019-10-14T17:42:42.874812Z","id": 63287,"market_amount": "1400","market_id": 36,"order_id": 8141515,"price": "0.00000031","side": "sell","taker": true}"#;
        let trade: PrivateTrade = serde_json::from_str(json).unwrap();

        assert_eq!(trade.side, Some(Side::Sell));
        assert_eq!(trade.order_id, Some(8141515));
        assert_eq!(trade.market().unwrap().unwrap(), Market::DogeBtc);
    }

    #[test]
    fn test_ticker_with_null_prices() {
        let json = r#"{"ask": null,"bid": null,"day_avg_price": null,"day_change": null,"day_high": null,"day_low": null,"day_open": null,"day_volume_base": "0","day_volume_market": "0","id": 8,"id_hr": "MMO_BTC","last": "0.00000076"}"#;
        let ticker: Ticker = serde_json::from_str(json).unwrap();

        assert!(ticker.ask.is_none());
        assert!(ticker.mid_price().is_none());
        assert_eq!(ticker.last, Some(dec!(0.00000076)));
        assert_eq!(ticker.market().unwrap(), Market::MmoBtc);
    }

    #[test]
    fn test_orderbook_conversion() {
        let raw = RawOrderbook {
            buy: HashMap::from([
                ("0.00000031".to_string(), "1000".to_string()),
                ("0.00000030".to_string(), "2500".to_string()),
            ]),
            last_change: 1_572_000_000_000_000,
            sell: HashMap::from([("0.00000035".to_string(), "42.5".to_string())]),
        };

        let book = Orderbook::try_from(raw).unwrap();
        assert_eq!(book.best_bid(), Some((dec!(0.00000031), dec!(1000))));
        assert_eq!(book.best_ask(), Some((dec!(0.00000035), dec!(42.5))));
        assert_eq!(book.spread(), Some(dec!(0.00000004)));
    }

    #[test]
    fn test_orderbook_rejects_bad_level() {
        let raw = RawOrderbook {
            buy: HashMap::from([("abc".to_string(), "1".to_string())]),
            last_change: 0,
            sell: HashMap::new(),
        };
        assert!(Orderbook::try_from(raw).is_err());
    }

    #[test]
    fn test_limit_order_request_serialization() {
        let body = LimitOrderRequest {
            amount: "1.00000000".to_string(),
            market_id: 1,
            price: "0.01000000".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"amount":"1.00000000","market_id":1,"price":"0.01000000"}"#
        );
    }
}
