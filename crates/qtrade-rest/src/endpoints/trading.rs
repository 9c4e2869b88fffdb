//! Trading endpoints for order management
//!
//! These endpoints require authentication. Amounts and prices are rendered at
//! the precision of the market and base currency before the request is
//! signed, so an unknown currency fails without touching the network.

use crate::dispatch::{Dispatcher, RequestSpec};
use crate::endpoints::account::OrderResult;
use crate::error::RestResult;
use crate::types::{CancelOrderRequest, DataEnvelope, LimitOrderRequest, Order};
use qtrade_types::{Market, OrderType, PrecisionTable};
use tracing::{debug, info, instrument};

/// Trading endpoints for order management
pub struct TradingEndpoints<'a> {
    dispatcher: &'a Dispatcher,
    precision: &'a PrecisionTable,
}

impl<'a> TradingEndpoints<'a> {
    pub fn new(dispatcher: &'a Dispatcher, precision: &'a PrecisionTable) -> Self {
        Self {
            dispatcher,
            precision,
        }
    }

    /// Build the body of a limit order
    ///
    /// `amount` uses the market currency's precision and `price` the base
    /// currency's.
    pub fn limit_order_request(
        &self,
        market: Market,
        amount: f64,
        price: f64,
    ) -> RestResult<LimitOrderRequest> {
        Ok(LimitOrderRequest {
            amount: self
                .precision
                .format_amount(market.market_currency().as_str(), amount)?,
            market_id: market.id(),
            price: self
                .precision
                .format_amount(market.base_currency().as_str(), price)?,
        })
    }

    async fn place(
        &self,
        order_type: OrderType,
        market: Market,
        amount: f64,
        price: f64,
    ) -> RestResult<Order> {
        let body = self.limit_order_request(market, amount, price)?;
        debug!(
            "Placing {} on {}: amount={} price={}",
            order_type, market, body.amount, body.price
        );

        let spec =
            RequestSpec::post(format!("/v1/user/{}", order_type.as_str())).with_json_body(&body)?;
        let envelope: DataEnvelope<OrderResult> = self.dispatcher.send(spec).await?;
        let order = envelope.into_inner().order;

        info!("Order {} placed on {}", order.id, market);
        Ok(order)
    }

    /// Place a limit order to sell `amount` of the market currency at `price`
    #[instrument(skip(self))]
    pub async fn sell_limit(&self, market: Market, amount: f64, price: f64) -> RestResult<Order> {
        self.place(OrderType::SellLimit, market, amount, price).await
    }

    /// Place a limit order to buy `amount` of the market currency at `price`
    #[instrument(skip(self))]
    pub async fn buy_limit(&self, market: Market, amount: f64, price: f64) -> RestResult<Order> {
        self.place(OrderType::BuyLimit, market, amount, price).await
    }

    /// Cancel an open order
    ///
    /// The exchange answers with an empty body; any non-error status is
    /// success.
    #[instrument(skip(self))]
    pub async fn cancel_order(&self, id: u64) -> RestResult<()> {
        let spec = RequestSpec::post("/v1/user/cancel_order")
            .with_json_body(&CancelOrderRequest { id })?;
        self.dispatcher.execute(spec).await?;

        info!("Order {} cancelled", id);
        Ok(())
    }
}
