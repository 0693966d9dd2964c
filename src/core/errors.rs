use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ThreeCommasError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Query encoding error: {0}")]
    QueryEncode(#[from] serde_urlencoded::ser::Error),

    #[error("API error: status {status} - {body}")]
    Api { status: u16, body: Value },

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("WebSocket error: {0}")]
    WebSocket(String),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::core::config::ConfigError),
}

impl ThreeCommasError {
    /// The remote error body, when the failure came from the API itself.
    pub fn remote_body(&self) -> Option<&Value> {
        match self {
            Self::Api { body, .. } => Some(body),
            _ => None,
        }
    }
}
