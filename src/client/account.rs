use crate::client::types::{
    CurrencyParams, MarketCurrencyParams, TransferHistoryParams, TransferParams,
};
use crate::client::{to_payload, ThreeCommasClient};
use crate::core::errors::ThreeCommasError;
use crate::core::kernel::RestClient;
use crate::core::types::ApiVersion;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

/// Exchange account endpoints.
impl<R: RestClient> ThreeCommasClient<R> {
    pub async fn transfer<T: DeserializeOwned + Send>(
        &self,
        params: &TransferParams,
    ) -> Result<T, ThreeCommasError> {
        self.rest
            .request_json(
                Method::POST,
                ApiVersion::V1,
                "/accounts/transfer",
                to_payload(params)?,
            )
            .await
    }

    pub async fn get_transfer_history<T: DeserializeOwned + Send>(
        &self,
        params: &TransferHistoryParams,
    ) -> Result<T, ThreeCommasError> {
        self.rest
            .request_json(
                Method::GET,
                ApiVersion::V1,
                "/accounts/transfer_history",
                to_payload(params)?,
            )
            .await
    }

    pub async fn get_transfer_data<T: DeserializeOwned + Send>(
        &self,
    ) -> Result<T, ThreeCommasError> {
        self.rest
            .request_json(Method::GET, ApiVersion::V1, "/accounts/transfer_data", None)
            .await
    }

    /// Connect a new exchange account. The parameter shape depends on the
    /// exchange being connected and is passed through opaquely.
    pub async fn add_exchange_account<T: DeserializeOwned + Send>(
        &self,
        params: Value,
    ) -> Result<T, ThreeCommasError> {
        self.rest
            .request_json(Method::POST, ApiVersion::V1, "/accounts/new", Some(params))
            .await
    }

    pub async fn edit_exchange_account<T: DeserializeOwned + Send>(
        &self,
        params: Value,
    ) -> Result<T, ThreeCommasError> {
        self.rest
            .request_json(
                Method::POST,
                ApiVersion::V1,
                "/accounts/update",
                Some(params),
            )
            .await
    }

    pub async fn get_exchanges<T: DeserializeOwned + Send>(&self) -> Result<T, ThreeCommasError> {
        self.rest
            .request_json(Method::GET, ApiVersion::V1, "/accounts", None)
            .await
    }

    pub async fn get_market_list<T: DeserializeOwned + Send>(
        &self,
    ) -> Result<T, ThreeCommasError> {
        self.rest
            .request_json(Method::GET, ApiVersion::V1, "/accounts/market_list", None)
            .await
    }

    pub async fn get_market_pairs<T: DeserializeOwned + Send>(
        &self,
        params: Option<Value>,
    ) -> Result<T, ThreeCommasError> {
        self.rest
            .request_json(
                Method::GET,
                ApiVersion::V1,
                "/accounts/market_pairs",
                params,
            )
            .await
    }

    pub async fn get_currency_rate<T: DeserializeOwned + Send>(
        &self,
        params: &CurrencyParams,
    ) -> Result<T, ThreeCommasError> {
        self.rest
            .request_json(
                Method::GET,
                ApiVersion::V1,
                "/accounts/currency_rates",
                to_payload(params)?,
            )
            .await
    }

    pub async fn get_currency_rate_with_leverage_data<T: DeserializeOwned + Send>(
        &self,
        params: &MarketCurrencyParams,
    ) -> Result<T, ThreeCommasError> {
        self.rest
            .request_json(
                Method::GET,
                ApiVersion::V1,
                "/accounts/currency_rates_with_leverage_data",
                to_payload(params)?,
            )
            .await
    }

    pub async fn get_active_trade_entities<T: DeserializeOwned + Send>(
        &self,
        account_id: i64,
    ) -> Result<T, ThreeCommasError> {
        self.rest
            .request_json(
                Method::GET,
                ApiVersion::V1,
                &format!("/accounts/{}/active_trading_entities", account_id),
                None,
            )
            .await
    }

    pub async fn sell_all_to_usd<T: DeserializeOwned + Send>(
        &self,
        account_id: i64,
    ) -> Result<T, ThreeCommasError> {
        self.rest
            .request_json(
                Method::POST,
                ApiVersion::V1,
                &format!("/accounts/{}/sell_all_to_usd", account_id),
                None,
            )
            .await
    }

    pub async fn sell_all_to_btc<T: DeserializeOwned + Send>(
        &self,
        account_id: i64,
    ) -> Result<T, ThreeCommasError> {
        self.rest
            .request_json(
                Method::POST,
                ApiVersion::V1,
                &format!("/accounts/{}/sell_all_to_btc", account_id),
                None,
            )
            .await
    }

    pub async fn get_balance_chart_data<T: DeserializeOwned + Send>(
        &self,
        account_id: i64,
        params: Value,
    ) -> Result<T, ThreeCommasError> {
        self.rest
            .request_json(
                Method::GET,
                ApiVersion::V1,
                &format!("/accounts/{}/balance_chart_data", account_id),
                Some(params),
            )
            .await
    }

    pub async fn load_balances<T: DeserializeOwned + Send>(
        &self,
        account_id: i64,
    ) -> Result<T, ThreeCommasError> {
        self.rest
            .request_json(
                Method::POST,
                ApiVersion::V1,
                &format!("/accounts/{}/load_balances", account_id),
                None,
            )
            .await
    }

    pub async fn rename_exchange_account<T: DeserializeOwned + Send>(
        &self,
        account_id: i64,
        name: &str,
    ) -> Result<T, ThreeCommasError> {
        self.rest
            .request_json(
                Method::POST,
                ApiVersion::V1,
                &format!("/accounts/{}/rename", account_id),
                Some(json!({ "name": name })),
            )
            .await
    }

    pub async fn remove_exchange_account<T: DeserializeOwned + Send>(
        &self,
        account_id: i64,
    ) -> Result<T, ThreeCommasError> {
        self.rest
            .request_json(
                Method::POST,
                ApiVersion::V1,
                &format!("/accounts/{}/remove", account_id),
                None,
            )
            .await
    }

    pub async fn get_pie_chart_data<T: DeserializeOwned + Send>(
        &self,
        account_id: i64,
    ) -> Result<T, ThreeCommasError> {
        self.rest
            .request_json(
                Method::POST,
                ApiVersion::V1,
                &format!("/accounts/{}/pie_chart_data", account_id),
                None,
            )
            .await
    }

    pub async fn get_account_table_data<T: DeserializeOwned + Send>(
        &self,
        account_id: i64,
    ) -> Result<T, ThreeCommasError> {
        self.rest
            .request_json(
                Method::POST,
                ApiVersion::V1,
                &format!("/accounts/{}/account_table_data", account_id),
                None,
            )
            .await
    }

    /// Account details, or the aggregate summary when no id is given.
    pub async fn get_account_info<T: DeserializeOwned + Send>(
        &self,
        account_id: Option<i64>,
    ) -> Result<T, ThreeCommasError> {
        let path = match account_id {
            Some(id) => format!("/accounts/{}", id),
            None => "/accounts/summary".to_string(),
        };
        self.rest
            .request_json(Method::GET, ApiVersion::V1, &path, None)
            .await
    }

    pub async fn get_leverage_data<T: DeserializeOwned + Send>(
        &self,
        account_id: i64,
        pair: &str,
    ) -> Result<T, ThreeCommasError> {
        self.rest
            .request_json(
                Method::GET,
                ApiVersion::V1,
                &format!("/accounts/{}/leverage_data", account_id),
                Some(json!({ "pair": pair })),
            )
            .await
    }
}
