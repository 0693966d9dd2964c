use crate::client::types::{FundParams, SmartTradeHistoryParams, SmartTradeParams};
use crate::client::{to_payload, ThreeCommasClient};
use crate::core::errors::ThreeCommasError;
use crate::core::kernel::RestClient;
use crate::core::types::ApiVersion;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

/// Smart trade endpoints (API version 2).
impl<R: RestClient> ThreeCommasClient<R> {
    pub async fn get_smart_trade_history<T: DeserializeOwned + Send>(
        &self,
        params: &SmartTradeHistoryParams,
    ) -> Result<T, ThreeCommasError> {
        self.rest
            .request_json(
                Method::GET,
                ApiVersion::V2,
                "/smart_trades",
                to_payload(params)?,
            )
            .await
    }

    pub async fn create_smart_trade<T: DeserializeOwned + Send>(
        &self,
        params: &SmartTradeParams,
    ) -> Result<T, ThreeCommasError> {
        self.rest
            .request_json(
                Method::POST,
                ApiVersion::V2,
                "/smart_trades",
                to_payload(params)?,
            )
            .await
    }

    pub async fn get_smart_trade<T: DeserializeOwned + Send>(
        &self,
        id: i64,
    ) -> Result<T, ThreeCommasError> {
        self.rest
            .request_json(
                Method::GET,
                ApiVersion::V2,
                &format!("/smart_trades/{}", id),
                None,
            )
            .await
    }

    pub async fn cancel_smart_trade<T: DeserializeOwned + Send>(
        &self,
        id: i64,
    ) -> Result<T, ThreeCommasError> {
        self.rest
            .request_json(
                Method::DELETE,
                ApiVersion::V2,
                &format!("/smart_trades/{}", id),
                None,
            )
            .await
    }

    /// Update an open smart trade. The updatable field set depends on the
    /// trade state and is passed through opaquely.
    pub async fn update_smart_trade<T: DeserializeOwned + Send>(
        &self,
        id: i64,
        params: Value,
    ) -> Result<T, ThreeCommasError> {
        self.rest
            .request_json(
                Method::PATCH,
                ApiVersion::V2,
                &format!("/smart_trades/{}", id),
                Some(params),
            )
            .await
    }

    pub async fn add_funds_to_smart_trade<T: DeserializeOwned + Send>(
        &self,
        id: i64,
        params: &FundParams,
    ) -> Result<T, ThreeCommasError> {
        self.rest
            .request_json(
                Method::POST,
                ApiVersion::V2,
                &format!("/smart_trades/{}/add_funds", id),
                to_payload(params)?,
            )
            .await
    }

    pub async fn reduce_funds_on_smart_trade<T: DeserializeOwned + Send>(
        &self,
        id: i64,
        params: &FundParams,
    ) -> Result<T, ThreeCommasError> {
        self.rest
            .request_json(
                Method::POST,
                ApiVersion::V2,
                &format!("/smart_trades/{}/reduce_funds", id),
                to_payload(params)?,
            )
            .await
    }

    pub async fn close_smart_trade<T: DeserializeOwned + Send>(
        &self,
        id: i64,
    ) -> Result<T, ThreeCommasError> {
        self.rest
            .request_json(
                Method::POST,
                ApiVersion::V2,
                &format!("/smart_trades/{}/close_by_market", id),
                None,
            )
            .await
    }

    pub async fn force_start_smart_trade<T: DeserializeOwned + Send>(
        &self,
        id: i64,
    ) -> Result<T, ThreeCommasError> {
        self.rest
            .request_json(
                Method::POST,
                ApiVersion::V2,
                &format!("/smart_trades/{}/force_start", id),
                None,
            )
            .await
    }

    pub async fn force_process_smart_trade<T: DeserializeOwned + Send>(
        &self,
        id: i64,
    ) -> Result<T, ThreeCommasError> {
        self.rest
            .request_json(
                Method::POST,
                ApiVersion::V2,
                &format!("/smart_trades/{}/force_process", id),
                None,
            )
            .await
    }

    pub async fn set_smart_trade_note<T: DeserializeOwned + Send>(
        &self,
        id: i64,
        note: &str,
    ) -> Result<T, ThreeCommasError> {
        self.rest
            .request_json(
                Method::POST,
                ApiVersion::V2,
                &format!("/smart_trades/{}/set_note", id),
                Some(json!({ "note": note })),
            )
            .await
    }

    /// Sub trades of a smart trade, including entry and take profit orders.
    pub async fn get_sub_trades<T: DeserializeOwned + Send>(
        &self,
        id: i64,
    ) -> Result<T, ThreeCommasError> {
        self.rest
            .request_json(
                Method::GET,
                ApiVersion::V2,
                &format!("/smart_trades/{}/trades", id),
                None,
            )
            .await
    }

    pub async fn close_sub_trade<T: DeserializeOwned + Send>(
        &self,
        smart_trade_id: i64,
        sub_trade_id: i64,
    ) -> Result<T, ThreeCommasError> {
        self.rest
            .request_json(
                Method::POST,
                ApiVersion::V2,
                &format!(
                    "/smart_trades/{}/trades/{}/close_by_market",
                    smart_trade_id, sub_trade_id
                ),
                None,
            )
            .await
    }

    pub async fn cancel_sub_trade<T: DeserializeOwned + Send>(
        &self,
        smart_trade_id: i64,
        sub_trade_id: i64,
    ) -> Result<T, ThreeCommasError> {
        self.rest
            .request_json(
                Method::DELETE,
                ApiVersion::V2,
                &format!("/smart_trades/{}/trades/{}", smart_trade_id, sub_trade_id),
                None,
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::client::test_support::mock_client;
    use crate::client::types::{PositionParams, SmartTradeParams, UnitsParams};
    use crate::core::types::ApiVersion;
    use reqwest::Method;
    use serde_json::{json, Value};

    fn market_buy(account_id: i64, pair: &str) -> SmartTradeParams {
        SmartTradeParams {
            account_id,
            pair: pair.to_string(),
            instant: None,
            note: None,
            leverage: None,
            position: PositionParams {
                position_type: "buy".to_string(),
                units: UnitsParams {
                    value: "0.01".to_string(),
                },
                price: None,
                order_type: "market".to_string(),
            },
            take_profit: None,
            stop_loss: None,
        }
    }

    #[tokio::test]
    async fn create_smart_trade_posts_to_v2() {
        let (client, calls) = mock_client(json!({"id": 1}));

        let _: Value = client
            .create_smart_trade(&market_buy(123, "USDT_BTC"))
            .await
            .unwrap();

        let calls = calls.lock().unwrap();
        let (method, version, path, payload) = &calls[0];
        assert_eq!(method, &Method::POST);
        assert_eq!(version, &ApiVersion::V2);
        assert_eq!(path, "/smart_trades");

        let payload = payload.as_ref().unwrap();
        assert_eq!(payload["pair"], "USDT_BTC");
        assert_eq!(payload["position"]["type"], "buy");
        assert!(payload.get("note").is_none());
    }

    #[tokio::test]
    async fn cancel_and_sub_trade_paths() {
        let (client, calls) = mock_client(json!({}));

        let _: Value = client.cancel_smart_trade(42).await.unwrap();
        let _: Value = client.close_sub_trade(42, 7).await.unwrap();

        let calls = calls.lock().unwrap();
        assert_eq!(calls[0].0, Method::DELETE);
        assert_eq!(calls[0].2, "/smart_trades/42");
        assert_eq!(calls[1].0, Method::POST);
        assert_eq!(calls[1].2, "/smart_trades/42/trades/7/close_by_market");
    }
}
