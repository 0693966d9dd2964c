use crate::core::config::{ApiConfig, ConfigError};
use crate::core::errors::ThreeCommasError;
use crate::core::kernel::signer::sign;
use crate::core::types::ApiVersion;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::{instrument, trace};

/// Future returned by an error handler hook.
pub type ErrorHandlerFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Async hook invoked with the remote error body before a failed call
/// returns. Side effects only (logging, metrics) - the call fails regardless
/// of what the hook does.
pub type ErrorHandler = Arc<dyn Fn(Value) -> ErrorHandlerFuture + Send + Sync>;

/// REST client trait for making authenticated API requests
///
/// Every endpoint method delegates to `request`; implementations handle URL
/// resolution, canonical payload construction, signing and error
/// normalization.
#[async_trait]
pub trait RestClient: Send + Sync {
    /// Execute a logical call and return the decoded response body.
    ///
    /// # Arguments
    /// * `method` - HTTP method
    /// * `version` - API version selecting the path prefix
    /// * `path` - endpoint path relative to the version prefix
    /// * `payload` - query parameters (GET) or JSON body (other methods)
    async fn request(
        &self,
        method: Method,
        version: ApiVersion,
        path: &str,
        payload: Option<Value>,
    ) -> Result<Value, ThreeCommasError>;

    /// Execute a logical call with a strongly-typed response.
    async fn request_json<T: DeserializeOwned + Send>(
        &self,
        method: Method,
        version: ApiVersion,
        path: &str,
        payload: Option<Value>,
    ) -> Result<T, ThreeCommasError>
    where
        Self: Sized,
    {
        let value = self.request(method, version, path, payload).await?;
        Ok(serde_json::from_value(value)?)
    }
}

/// Configuration for the REST client transport
#[derive(Clone, Debug)]
pub struct RestClientConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
    /// User agent string to include in requests
    pub user_agent: String,
}

impl RestClientConfig {
    /// Create a new configuration
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            timeout_ms: crate::core::config::DEFAULT_TIMEOUT_MS,
            user_agent: "threecommas-rs/0.1".to_string(),
        }
    }

    /// Set the request timeout in milliseconds
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set the user agent string
    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }
}

/// Builder for creating REST client instances
pub struct RestClientBuilder {
    config: RestClientConfig,
    api: ApiConfig,
    error_handler: Option<ErrorHandler>,
}

impl RestClientBuilder {
    /// Create a new builder with the given transport configuration and
    /// credentials
    pub fn new(config: RestClientConfig, api: ApiConfig) -> Self {
        Self {
            config,
            api,
            error_handler: None,
        }
    }

    /// Set the async hook invoked with the remote error body on failures
    pub fn with_error_handler(mut self, error_handler: ErrorHandler) -> Self {
        self.error_handler = Some(error_handler);
        self
    }

    /// Build the REST client
    pub fn build(self) -> Result<ReqwestRest, ThreeCommasError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "APIKEY",
            HeaderValue::from_str(self.api.api_key()).map_err(|e| {
                ConfigError::InvalidConfiguration(format!("Invalid API key header: {}", e))
            })?,
        );
        if let Some(mode) = self.api.forced_mode {
            headers.insert("Forced-Mode", HeaderValue::from_static(mode.as_str()));
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(self.config.timeout_ms))
            .user_agent(&self.config.user_agent)
            .default_headers(headers)
            .build()
            .map_err(|e| {
                ConfigError::InvalidConfiguration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(ReqwestRest {
            client,
            config: self.config,
            api: self.api,
            error_handler: self.error_handler,
        })
    }
}

/// Implementation of `RestClient` using reqwest
#[derive(Clone)]
pub struct ReqwestRest {
    client: Client,
    config: RestClientConfig,
    api: ApiConfig,
    error_handler: Option<ErrorHandler>,
}

impl std::fmt::Debug for ReqwestRest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestRest")
            .field("config", &self.config)
            .field("has_error_handler", &self.error_handler.is_some())
            .finish_non_exhaustive()
    }
}

/// Canonical payload of a GET-like request: the URL-encoded query string.
/// An absent or empty payload encodes to the empty string.
fn canonical_query(payload: Option<&Value>) -> Result<String, ThreeCommasError> {
    match payload {
        Some(value) => Ok(serde_urlencoded::to_string(value)?),
        None => Ok(String::new()),
    }
}

/// Canonical payload of a body-carrying request: the exact JSON
/// serialization that goes on the wire.
fn canonical_body(payload: Option<&Value>) -> Result<String, ThreeCommasError> {
    match payload {
        Some(value) => Ok(serde_json::to_string(value)?),
        None => Ok(String::new()),
    }
}

/// The string a request signature is computed over. Always the relative
/// path (base origin stripped) joined to the canonical payload with `?`,
/// even when the payload is empty.
fn signing_payload(relative_path: &str, canonical: &str) -> String {
    format!("{}?{}", relative_path, canonical)
}

impl ReqwestRest {
    /// Handle the response and extract JSON
    #[instrument(skip(self, response), fields(status = %response.status()))]
    async fn handle_response(&self, response: Response) -> Result<Value, ThreeCommasError> {
        let status = response.status();
        let response_text = response.text().await?;

        trace!("Response body: {}", response_text);

        if status.is_success() {
            if response_text.is_empty() {
                return Ok(Value::Null);
            }
            return Ok(serde_json::from_str(&response_text)?);
        }

        // The remote error body is an opaque passthrough; non-JSON bodies are
        // carried as plain strings.
        let body = serde_json::from_str::<Value>(&response_text)
            .unwrap_or(Value::String(response_text));

        if let Some(handler) = &self.error_handler {
            handler(body.clone()).await;
        }

        Err(ThreeCommasError::Api {
            status: status.as_u16(),
            body,
        })
    }

    #[instrument(skip(self, payload), fields(method = %method, path = %path))]
    async fn execute(
        &self,
        method: Method,
        version: ApiVersion,
        path: &str,
        payload: Option<Value>,
    ) -> Result<Value, ThreeCommasError> {
        let payload = payload.filter(|value| !value.is_null());
        let relative_path = format!("{}{}", version.prefix(), path);
        let url = format!("{}{}", self.config.base_url, relative_path);

        let is_get = method == Method::GET;
        let canonical = if is_get {
            canonical_query(payload.as_ref())?
        } else {
            canonical_body(payload.as_ref())?
        };

        // Unauthenticated mode: public endpoints carry an empty signature.
        let signature = if self.api.secret().is_empty() {
            String::new()
        } else {
            sign(
                self.api.api_key_type,
                &signing_payload(&relative_path, &canonical),
                self.api.secret(),
            )?
        };

        let mut request = if is_get {
            let full_url = if canonical.is_empty() {
                url
            } else {
                format!("{}?{}", url, canonical)
            };
            self.client.request(method, full_url)
        } else {
            let mut builder = self.client.request(method, url);
            if payload.is_some() {
                builder = builder
                    .header(CONTENT_TYPE, "application/json")
                    .body(canonical);
            }
            builder
        };
        request = request.header("signature", signature.as_str());

        let response = request.send().await?;
        self.handle_response(response).await
    }
}

#[async_trait]
impl RestClient for ReqwestRest {
    async fn request(
        &self,
        method: Method,
        version: ApiVersion,
        path: &str,
        payload: Option<Value>,
    ) -> Result<Value, ThreeCommasError> {
        self.execute(method, version, path, payload).await
    }
}
