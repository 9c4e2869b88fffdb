//! Funding endpoints for deposits and withdrawals
//!
//! These endpoints require authentication.

use crate::dispatch::{Dispatcher, RequestSpec};
use crate::endpoints::path_segment;
use crate::error::RestResult;
use crate::types::{
    DataEnvelope, DepositAddress, DepositDetails, WithdrawData, WithdrawDetails, WithdrawRequest,
};
use qtrade_types::PrecisionTable;
use serde::Deserialize;
use tracing::{debug, info, instrument};

/// Funding endpoints for deposits and withdrawals
pub struct FundingEndpoints<'a> {
    dispatcher: &'a Dispatcher,
    precision: &'a PrecisionTable,
}

impl<'a> FundingEndpoints<'a> {
    pub fn new(dispatcher: &'a Dispatcher, precision: &'a PrecisionTable) -> Self {
        Self {
            dispatcher,
            precision,
        }
    }

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

    /// Withdraw funds to an external address
    ///
    /// # Arguments
    /// * `address` - Destination address
    /// * `amount` - Amount, rounded to the currency's precision
    /// * `currency` - Currency code (e.g. "BTC" or `Currency::Btc`)
    #[instrument(skip(self, address, currency), fields(currency = currency.as_ref()))]
    pub async fn withdraw(
        &self,
        address: &str,
        amount: f64,
        currency: impl AsRef<str>,
    ) -> RestResult<WithdrawData> {
        let currency = currency.as_ref();
        let body = WithdrawRequest {
            address: address.to_string(),
            amount: self.precision.format_amount(currency, amount)?,
            currency: currency.to_string(),
        };
        debug!("Withdrawing {} {}", body.amount, currency);

        let spec = RequestSpec::post("/v1/user/withdraw").with_json_body(&body)?;
        let envelope: DataEnvelope<WithdrawData> = self.dispatcher.send(spec).await?;
        let result = envelope.into_inner();

        info!("Withdrawal {} {}: {}", result.id, result.code, result.result);
        Ok(result)
    }

    /// Get one withdrawal by id
    #[instrument(skip(self))]
    pub async fn get_withdraw_details(&self, id: u64) -> RestResult<WithdrawDetails> {
        let result: WithdrawResult = self.get(format!("/v1/user/withdraw/{id}"), &[]).await?;
        Ok(result.withdraw)
    }

    /// Get withdrawal history
    #[instrument(skip(self))]
    pub async fn get_withdraw_history(
        &self,
        params: &[(&str, &str)],
    ) -> RestResult<Vec<WithdrawDetails>> {
        let result: WithdrawsResult = self
            .get("/v1/user/withdraws".to_string(), params)
            .await?;
        Ok(result.withdraws)
    }

    /// Get the deposit records for one deposit id
    #[instrument(skip(self))]
    pub async fn get_deposit(&self, id: &str) -> RestResult<Vec<DepositDetails>> {
        let id = path_segment(id)?;
        let result: DepositResult = self.get(format!("/v1/user/deposit/{id}"), &[]).await?;
        Ok(result.deposit)
    }

    /// Get deposit history
    #[instrument(skip(self))]
    pub async fn get_deposit_history(
        &self,
        params: &[(&str, &str)],
    ) -> RestResult<Vec<DepositDetails>> {
        let result: DepositsResult = self
            .get("/v1/user/deposits".to_string(), params)
            .await?;
        Ok(result.deposits)
    }

    /// Get (or create) the deposit address for a currency
    #[instrument(skip(self, currency), fields(currency = currency.as_ref()))]
    pub async fn get_deposit_address(
        &self,
        currency: impl AsRef<str>,
    ) -> RestResult<DepositAddress> {
        let code = path_segment(currency.as_ref())?;
        debug!("Requesting deposit address for {}", code);

        let spec = RequestSpec::post(format!("/v1/user/deposit_address/{code}"));
        let envelope: DataEnvelope<DepositAddress> = self.dispatcher.send(spec).await?;
        Ok(envelope.into_inner())
    }
}

#[derive(Debug, Deserialize)]
struct WithdrawResult {
    withdraw: WithdrawDetails,
}

#[derive(Debug, Deserialize)]
struct WithdrawsResult {
    withdraws: Vec<WithdrawDetails>,
}

#[derive(Debug, Deserialize)]
struct DepositResult {
    deposit: Vec<DepositDetails>,
}

#[derive(Debug, Deserialize)]
struct DepositsResult {
    deposits: Vec<DepositDetails>,
}
