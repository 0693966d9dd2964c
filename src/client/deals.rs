use crate::client::types::DealsParams;
use crate::client::{to_payload, ThreeCommasClient};
use crate::core::errors::ThreeCommasError;
use crate::core::kernel::RestClient;
use crate::core::types::ApiVersion;
use reqwest::Method;
use serde::de::DeserializeOwned;

impl<R: RestClient> ThreeCommasClient<R> {
    pub async fn get_deals<T: DeserializeOwned + Send>(
        &self,
        params: &DealsParams,
    ) -> Result<T, ThreeCommasError> {
        self.rest
            .request_json(Method::GET, ApiVersion::V1, "/deals", to_payload(params)?)
            .await
    }

    pub async fn get_deal<T: DeserializeOwned + Send>(
        &self,
        id: i64,
    ) -> Result<T, ThreeCommasError> {
        self.rest
            .request_json(
                Method::GET,
                ApiVersion::V1,
                &format!("/deals/{}/show", id),
                None,
            )
            .await
    }

    pub async fn get_deal_safety_orders<T: DeserializeOwned + Send>(
        &self,
        id: i64,
    ) -> Result<T, ThreeCommasError> {
        self.rest
            .request_json(
                Method::GET,
                ApiVersion::V1,
                &format!("/deals/{}/market_orders", id),
                None,
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::client::test_support::mock_client;
    use crate::client::types::DealsParams;
    use serde_json::{json, Value};

    #[tokio::test]
    async fn get_deals_omits_unset_filters() {
        let (client, calls) = mock_client(json!([]));

        let _: Value = client.get_deals(&DealsParams::default()).await.unwrap();

        let calls = calls.lock().unwrap();
        let payload = calls[0].3.as_ref().unwrap();
        assert_eq!(payload["limit"], 50);
        assert!(payload.get("bot_id").is_none());
        assert!(payload.get("account_id").is_none());
    }
}
