//! Public market data endpoints
//!
//! These endpoints don't require authentication.

use crate::dispatch::{Dispatcher, RequestSpec};
use crate::endpoints::path_segment;
use crate::error::RestResult;
use crate::types::{
    CommonData, CurrencyInfo, DataEnvelope, MarketInfo, MarketView, OhlcvSlice, Orderbook,
    PublicTrade, RawOrderbook, Ticker,
};
use qtrade_types::{Interval, Market};
use serde::Deserialize;
use tracing::{debug, instrument};

/// Public market data endpoints
pub struct MarketEndpoints<'a> {
    dispatcher: &'a Dispatcher,
}

impl<'a> MarketEndpoints<'a> {
    pub fn new(dispatcher: &'a Dispatcher) -> Self {
        Self { dispatcher }
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, spec: RequestSpec) -> RestResult<T> {
        let envelope: DataEnvelope<T> = self.dispatcher.send(spec).await?;
        Ok(envelope.into_inner())
    }

    /// Get currencies, markets and tickers in one call
    #[instrument(skip(self))]
    pub async fn get_common(&self) -> RestResult<CommonData> {
        debug!("Fetching common data");
        self.get(RequestSpec::get("/v1/common")).await
    }

    /// Get the ticker for one market
    #[instrument(skip(self))]
    pub async fn get_ticker(&self, market: Market) -> RestResult<Ticker> {
        debug!("Fetching ticker for {}", market);
        self.get(RequestSpec::get(format!("/v1/ticker/{}", market.as_str())))
            .await
    }

    /// Get tickers for all markets
    #[instrument(skip(self))]
    pub async fn get_tickers(&self) -> RestResult<Vec<Ticker>> {
        debug!("Fetching all tickers");
        let result: TickersResult = self.get(RequestSpec::get("/v1/tickers")).await?;
        Ok(result.markets)
    }

    /// Get listing details for one currency
    ///
    /// # Arguments
    /// * `currency` - Currency code (e.g. "BTC" or `Currency::Btc`)
    #[instrument(skip(self, currency), fields(currency = currency.as_ref()))]
    pub async fn get_currency(&self, currency: impl AsRef<str>) -> RestResult<CurrencyInfo> {
        let code = path_segment(currency.as_ref())?;
        debug!("Fetching currency {}", code);
        let result: CurrencyResult = self
            .get(RequestSpec::get(format!("/v1/currency/{code}")))
            .await?;
        Ok(result.currency)
    }

    /// Get listing details for all currencies
    #[instrument(skip(self))]
    pub async fn get_currencies(&self) -> RestResult<Vec<CurrencyInfo>> {
        debug!("Fetching currencies");
        let result: CurrenciesResult = self.get(RequestSpec::get("/v1/currencies")).await?;
        Ok(result.currencies)
    }

    /// Get market details with recent trades
    #[instrument(skip(self))]
    pub async fn get_market(&self, market: Market) -> RestResult<MarketView> {
        debug!("Fetching market {}", market);
        self.get(RequestSpec::get(format!("/v1/market/{}", market.as_str())))
            .await
    }

    /// Get details for all markets
    #[instrument(skip(self))]
    pub async fn get_markets(&self) -> RestResult<Vec<MarketInfo>> {
        debug!("Fetching markets");
        let result: MarketsResult = self.get(RequestSpec::get("/v1/markets")).await?;
        Ok(result.markets)
    }

    /// Get recent public trades for a market
    #[instrument(skip(self))]
    pub async fn get_market_trades(&self, market: Market) -> RestResult<Vec<PublicTrade>> {
        debug!("Fetching trades for {}", market);
        let result: TradesResult = self
            .get(RequestSpec::get(format!(
                "/v1/market/{}/trades",
                market.as_str()
            )))
            .await?;
        Ok(result.trades)
    }

    /// Get the orderbook for a market
    ///
    /// Price levels arrive as string maps and are parsed into ordered
    /// decimal maps.
    #[instrument(skip(self))]
    pub async fn get_orderbook(&self, market: Market) -> RestResult<Orderbook> {
        debug!("Fetching orderbook for {}", market);
        let raw: RawOrderbook = self
            .get(RequestSpec::get(format!("/v1/orderbook/{}", market.as_str())))
            .await?;
        Ok(Orderbook::try_from(raw)?)
    }

    /// Get OHLCV candles
    ///
    /// # Arguments
    /// * `market` - Market
    /// * `interval` - Candle length
    /// * `params` - Extra query parameters (e.g. `[("limit", "100")]`)
    #[instrument(skip(self))]
    pub async fn get_ohlcv(
        &self,
        market: Market,
        interval: Interval,
        params: &[(&str, &str)],
    ) -> RestResult<Vec<OhlcvSlice>> {
        debug!("Fetching {} candles for {}", interval, market);
        let spec = RequestSpec::get(format!(
            "/v1/market/{}/ohlcv/{}",
            market.as_str(),
            interval.as_str()
        ))
        .with_query_pairs(params.iter().copied());

        let result: OhlcvResult = self.get(spec).await?;
        Ok(result.slices)
    }
}

#[derive(Debug, Deserialize)]
struct TickersResult {
    markets: Vec<Ticker>,
}

#[derive(Debug, Deserialize)]
struct CurrencyResult {
    currency: CurrencyInfo,
}

#[derive(Debug, Deserialize)]
struct CurrenciesResult {
    currencies: Vec<CurrencyInfo>,
}

#[derive(Debug, Deserialize)]
struct MarketsResult {
    markets: Vec<MarketInfo>,
}

#[derive(Debug, Deserialize)]
struct TradesResult {
    trades: Vec<PublicTrade>,
}

#[derive(Debug, Deserialize)]
struct OhlcvResult {
    slices: Vec<OhlcvSlice>,
}
