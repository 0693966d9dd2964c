pub mod account;
pub mod bots;
pub mod deals;
pub mod smart_trades;
pub mod streams;
pub mod types;
pub mod users;

use crate::core::config::ApiConfig;
use crate::core::errors::ThreeCommasError;
use crate::core::kernel::{
    ErrorHandler, ReqwestRest, RestClient, RestClientBuilder, RestClientConfig, StreamSession,
};
use crate::core::types::ApiVersion;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Default REST origin.
pub const ENDPOINT: &str = "https://api.3commas.io";
/// Default streaming endpoint.
pub const WS_ENDPOINT: &str = "wss://ws.3commas.io/websocket";

/// Client for the 3Commas trading platform API.
///
/// Request/response calls delegate to the REST pipeline; streaming
/// subscriptions delegate to the owned [`StreamSession`]. The client is
/// stateless across calls apart from the streaming connection and safe for
/// concurrent use.
pub struct ThreeCommasClient<R: RestClient = ReqwestRest> {
    pub(crate) rest: R,
    pub(crate) stream: StreamSession,
    pub(crate) config: ApiConfig,
}

/// Build a client from configuration, wiring the REST pipeline and the
/// streaming session.
pub fn build_client(
    config: ApiConfig,
    error_handler: Option<ErrorHandler>,
) -> Result<ThreeCommasClient<ReqwestRest>, ThreeCommasError> {
    let base_url = config
        .base_url
        .clone()
        .unwrap_or_else(|| ENDPOINT.to_string());
    let ws_url = config
        .ws_url
        .clone()
        .unwrap_or_else(|| WS_ENDPOINT.to_string());

    let rest_config = RestClientConfig::new(base_url).with_timeout_ms(config.timeout_ms);
    let mut builder = RestClientBuilder::new(rest_config, config.clone());
    if let Some(handler) = error_handler {
        builder = builder.with_error_handler(handler);
    }
    let rest = builder.build()?;

    Ok(ThreeCommasClient {
        rest,
        stream: StreamSession::new(ws_url),
        config,
    })
}

impl ThreeCommasClient<ReqwestRest> {
    /// Create a client with the given configuration.
    pub fn new(config: ApiConfig) -> Result<Self, ThreeCommasError> {
        build_client(config, None)
    }

    /// Create a client with an async error hook, invoked with the remote
    /// error body before any failed call returns.
    pub fn with_error_handler(
        config: ApiConfig,
        error_handler: ErrorHandler,
    ) -> Result<Self, ThreeCommasError> {
        build_client(config, Some(error_handler))
    }
}

impl<R: RestClient> ThreeCommasClient<R> {
    /// Create a client over an existing REST transport.
    pub fn with_rest(rest: R, config: ApiConfig) -> Self {
        let ws_url = config
            .ws_url
            .clone()
            .unwrap_or_else(|| WS_ENDPOINT.to_string());
        Self {
            rest,
            stream: StreamSession::new(ws_url),
            config,
        }
    }

    pub async fn ping(&self) -> Result<Value, ThreeCommasError> {
        self.rest
            .request(Method::GET, ApiVersion::V1, "/ping", None)
            .await
    }

    pub async fn time(&self) -> Result<Value, ThreeCommasError> {
        self.rest
            .request(Method::GET, ApiVersion::V1, "/time", None)
            .await
    }

    /// Escape hatch for endpoints without a dedicated method.
    pub async fn custom_request<T: DeserializeOwned + Send>(
        &self,
        method: Method,
        version: ApiVersion,
        path: &str,
        payload: Option<Value>,
    ) -> Result<T, ThreeCommasError> {
        self.rest.request_json(method, version, path, payload).await
    }
}

/// Serialize typed endpoint parameters into a pipeline payload.
pub(crate) fn to_payload<P: Serialize>(params: &P) -> Result<Option<Value>, ThreeCommasError> {
    Ok(Some(serde_json::to_value(params)?))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    pub(crate) type RecordedCall = (Method, ApiVersion, String, Option<Value>);

    /// Records every pipeline call and answers with a canned response.
    pub(crate) struct MockRest {
        pub calls: Arc<Mutex<Vec<RecordedCall>>>,
        pub response: Value,
    }

    impl MockRest {
        pub fn new(response: Value) -> (Self, Arc<Mutex<Vec<RecordedCall>>>) {
            let calls = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    calls: Arc::clone(&calls),
                    response,
                },
                calls,
            )
        }
    }

    #[async_trait]
    impl RestClient for MockRest {
        async fn request(
            &self,
            method: Method,
            version: ApiVersion,
            path: &str,
            payload: Option<Value>,
        ) -> Result<Value, ThreeCommasError> {
            self.calls
                .lock()
                .unwrap()
                .push((method, version, path.to_string(), payload));
            Ok(self.response.clone())
        }
    }

    pub(crate) fn mock_client(
        response: Value,
    ) -> (
        ThreeCommasClient<MockRest>,
        Arc<Mutex<Vec<RecordedCall>>>,
    ) {
        let (rest, calls) = MockRest::new(response);
        let client = ThreeCommasClient::with_rest(
            rest,
            ApiConfig::new("test-key".to_string(), "test-secret".to_string()),
        );
        (client, calls)
    }
}
