use crate::client::ThreeCommasClient;
use crate::core::errors::ThreeCommasError;
use crate::core::kernel::RestClient;
use crate::core::types::{ApiVersion, UserMode};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::json;

impl<R: RestClient> ThreeCommasClient<R> {
    /// Switch the user between paper and real trading.
    pub async fn change_user_mode<T: DeserializeOwned + Send>(
        &self,
        mode: UserMode,
    ) -> Result<T, ThreeCommasError> {
        self.rest
            .request_json(
                Method::POST,
                ApiVersion::V1,
                "/users/change_mode",
                Some(json!({ "mode": mode })),
            )
            .await
    }
}
