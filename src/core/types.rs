use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// API version selecting the versioned path prefix of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiVersion {
    V1,
    V2,
}

impl ApiVersion {
    /// Path prefix prepended to every endpoint path for this version.
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::V1 => "/public/api/ver1",
            Self::V2 => "/public/api/ver2",
        }
    }
}

/// API key type, selecting the signing algorithm.
///
/// System-generated keys sign with HMAC-SHA256, self-generated keys carry an
/// RSA private key and sign with RSA-SHA256.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ApiKeyType {
    #[default]
    #[serde(rename = "systemGenerated")]
    SystemGenerated,
    #[serde(rename = "selfGenerated")]
    SelfGenerated,
}

impl FromStr for ApiKeyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "systemGenerated" => Ok(Self::SystemGenerated),
            "selfGenerated" => Ok(Self::SelfGenerated),
            other => Err(format!("unknown api key type: {}", other)),
        }
    }
}

/// Trading mode, used both for the `Forced-Mode` header and the
/// `/users/change_mode` endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserMode {
    Real,
    Paper,
}

impl UserMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Real => "real",
            Self::Paper => "paper",
        }
    }
}

/// Streaming channel (a named topic on the WebSocket endpoint).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    SmartTrades,
    Deals,
}

impl Channel {
    /// Wire name carried in the subscription identifier.
    pub const fn name(self) -> &'static str {
        match self {
            Self::SmartTrades => "SmartTradesChannel",
            Self::Deals => "DealsChannel",
        }
    }

    /// Relative path signed into the subscription identifier.
    pub const fn path(self) -> &'static str {
        match self {
            Self::SmartTrades => "/smart_trades",
            Self::Deals => "/deals",
        }
    }
}
