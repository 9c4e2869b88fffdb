//! Private account endpoints
//!
//! These endpoints require authentication.

use crate::dispatch::{Dispatcher, RequestSpec};
use crate::error::RestResult;
use crate::types::{
    Balance, DataEnvelope, Order, PrivateTrade, Transfer, UserInfo, UserMarketData,
};
use qtrade_types::Market;
use serde::Deserialize;
use tracing::{debug, instrument};

/// Private account endpoints
pub struct AccountEndpoints<'a> {
    dispatcher: &'a Dispatcher,
}

impl<'a> AccountEndpoints<'a> {
    pub fn new(dispatcher: &'a Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Make an authenticated GET request and unwrap the `data` envelope
    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: String,
        params: &[(&str, &str)],
    ) -> RestResult<T> {
        debug!("Making authenticated request to {}", path);
        let spec = RequestSpec::get(path).with_query_pairs(params.iter().copied());
        let envelope: DataEnvelope<T> = self.dispatcher.send(spec).await?;
        Ok(envelope.into_inner())
    }

    /// Get the authenticated user's account details
    #[instrument(skip(self))]
    pub async fn get_user_info(&self) -> RestResult<UserInfo> {
        let result: UserResult = self.get("/v1/user/me".to_string(), &[]).await?;
        Ok(result.user)
    }

    /// Get balances for all currencies
    ///
    /// # Arguments
    /// * `params` - Optional query parameters
    #[instrument(skip(self))]
    pub async fn get_balances(&self, params: &[(&str, &str)]) -> RestResult<Vec<Balance>> {
        let result: BalancesResult = self.get("/v1/user/balances".to_string(), params).await?;
        Ok(result.balances)
    }

    /// Get balances and orders for one market
    #[instrument(skip(self))]
    pub async fn get_user_market(
        &self,
        market: Market,
        params: &[(&str, &str)],
    ) -> RestResult<UserMarketData> {
        self.get(format!("/v1/user/market/{}", market.as_str()), params)
            .await
    }

    /// Get orders
    ///
    /// # Arguments
    /// * `params` - Filters such as `[("open", "true")]`
    #[instrument(skip(self))]
    pub async fn get_orders(&self, params: &[(&str, &str)]) -> RestResult<Vec<Order>> {
        let result: OrdersResult = self.get("/v1/user/orders".to_string(), params).await?;
        Ok(result.orders)
    }

    /// Get one order by id
    #[instrument(skip(self))]
    pub async fn get_order(&self, id: u64) -> RestResult<Order> {
        let result: OrderResult = self.get(format!("/v1/user/order/{id}"), &[]).await?;
        Ok(result.order)
    }

    /// Get the user's trades
    #[instrument(skip(self))]
    pub async fn get_trades(&self, params: &[(&str, &str)]) -> RestResult<Vec<PrivateTrade>> {
        let result: TradesResult = self.get("/v1/user/trades".to_string(), params).await?;
        Ok(result.trades)
    }

    /// Get internal transfers credited to the account
    #[instrument(skip(self))]
    pub async fn get_transfers(&self, params: &[(&str, &str)]) -> RestResult<Vec<Transfer>> {
        let result: TransfersResult = self
            .get("/v1/user/transfers".to_string(), params)
            .await?;
        Ok(result.transfers)
    }
}

#[derive(Debug, Deserialize)]
struct UserResult {
    user: UserInfo,
}

#[derive(Debug, Deserialize)]
struct BalancesResult {
    balances: Vec<Balance>,
}

#[derive(Debug, Deserialize)]
struct OrdersResult {
    orders: Vec<Order>,
}

/// Wrapper shared by single-order responses
#[derive(Debug, Deserialize)]
pub(crate) struct OrderResult {
    pub(crate) order: Order,
}

#[derive(Debug, Deserialize)]
struct TradesResult {
    trades: Vec<PrivateTrade>,
}

#[derive(Debug, Deserialize)]
struct TransfersResult {
    transfers: Vec<Transfer>,
}
