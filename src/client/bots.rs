use crate::client::types::{BotOptionalParams, BotsParams, BotsStatsParams};
use crate::client::{to_payload, ThreeCommasClient};
use crate::core::errors::ThreeCommasError;
use crate::core::kernel::RestClient;
use crate::core::types::ApiVersion;
use reqwest::Method;
use serde::de::DeserializeOwned;

impl<R: RestClient> ThreeCommasClient<R> {
    pub async fn get_bots<T: DeserializeOwned + Send>(
        &self,
        params: &BotsParams,
    ) -> Result<T, ThreeCommasError> {
        self.rest
            .request_json(Method::GET, ApiVersion::V1, "/bots", to_payload(params)?)
            .await
    }

    pub async fn get_bots_stats<T: DeserializeOwned + Send>(
        &self,
        params: &BotsStatsParams,
    ) -> Result<T, ThreeCommasError> {
        self.rest
            .request_json(
                Method::GET,
                ApiVersion::V1,
                "/bots/stats",
                to_payload(params)?,
            )
            .await
    }

    pub async fn get_bot<T: DeserializeOwned + Send>(
        &self,
        id: i64,
        params: &BotOptionalParams,
    ) -> Result<T, ThreeCommasError> {
        self.rest
            .request_json(
                Method::GET,
                ApiVersion::V1,
                &format!("/bots/{}/show", id),
                to_payload(params)?,
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::client::test_support::mock_client;
    use crate::client::types::BotsParams;
    use crate::core::types::ApiVersion;
    use reqwest::Method;
    use serde_json::{json, Value};

    #[tokio::test]
    async fn get_bots_carries_default_listing_params() {
        let (client, calls) = mock_client(json!([]));

        let _: Value = client.get_bots(&BotsParams::default()).await.unwrap();

        let calls = calls.lock().unwrap();
        let (method, version, path, payload) = &calls[0];
        assert_eq!(method, &Method::GET);
        assert_eq!(version, &ApiVersion::V1);
        assert_eq!(path, "/bots");

        let payload = payload.as_ref().unwrap();
        assert_eq!(payload["limit"], 50);
        assert_eq!(payload["sort_by"], "created_at");
        assert_eq!(payload["sort_direction"], "desc");
    }
}
