pub mod client;
pub mod core;

pub use client::types::*;
pub use client::{build_client, ThreeCommasClient, ENDPOINT, WS_ENDPOINT};
pub use core::config::ApiConfig;
pub use core::errors::ThreeCommasError;
pub use core::types::{ApiKeyType, ApiVersion, Channel, UserMode};
