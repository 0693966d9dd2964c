use crate::core::types::{ApiKeyType, UserMode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::env;

/// Default request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Construction-time configuration for a client instance.
///
/// Credentials are immutable for the lifetime of the client. The secret is
/// either the shared HMAC secret (system-generated keys) or a PEM-encoded RSA
/// private key (self-generated keys).
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_key: Secret<String>,
    pub secret: Secret<String>,
    pub api_key_type: ApiKeyType,
    pub timeout_ms: u64,
    pub forced_mode: Option<UserMode>,
    pub base_url: Option<String>,
    pub ws_url: Option<String>,
}

// Custom Serialize implementation - never expose secrets in serialization
impl Serialize for ApiConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("ApiConfig", 7)?;
        state.serialize_field("api_key", "[REDACTED]")?;
        state.serialize_field("secret", "[REDACTED]")?;
        state.serialize_field("api_key_type", &self.api_key_type)?;
        state.serialize_field("timeout_ms", &self.timeout_ms)?;
        state.serialize_field("forced_mode", &self.forced_mode)?;
        state.serialize_field("base_url", &self.base_url)?;
        state.serialize_field("ws_url", &self.ws_url)?;
        state.end()
    }
}

// Custom Deserialize implementation
impl<'de> Deserialize<'de> for ApiConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ApiConfigHelper {
            api_key: String,
            secret: String,
            #[serde(default)]
            api_key_type: ApiKeyType,
            #[serde(default = "default_timeout_ms")]
            timeout_ms: u64,
            #[serde(default)]
            forced_mode: Option<UserMode>,
            #[serde(default)]
            base_url: Option<String>,
            #[serde(default)]
            ws_url: Option<String>,
        }

        fn default_timeout_ms() -> u64 {
            DEFAULT_TIMEOUT_MS
        }

        let helper = ApiConfigHelper::deserialize(deserializer)?;
        Ok(Self {
            api_key: Secret::new(helper.api_key),
            secret: Secret::new(helper.secret),
            api_key_type: helper.api_key_type,
            timeout_ms: helper.timeout_ms,
            forced_mode: helper.forced_mode,
            base_url: helper.base_url,
            ws_url: helper.ws_url,
        })
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::read_only()
    }
}

impl ApiConfig {
    /// Create a new configuration with API credentials
    #[must_use]
    pub fn new(api_key: String, secret: String) -> Self {
        Self {
            api_key: Secret::new(api_key),
            secret: Secret::new(secret),
            api_key_type: ApiKeyType::default(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            forced_mode: None,
            base_url: None,
            ws_url: None,
        }
    }

    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `THREE_COMMAS_API_KEY`
    /// - `THREE_COMMAS_SECRET`
    /// - `THREE_COMMAS_API_KEY_TYPE` (optional, `systemGenerated` or `selfGenerated`)
    /// - `THREE_COMMAS_FORCED_MODE` (optional, `real` or `paper`)
    /// - `THREE_COMMAS_TIMEOUT_MS` (optional)
    /// - `THREE_COMMAS_BASE_URL` (optional)
    /// - `THREE_COMMAS_WS_URL` (optional)
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = env::var("THREE_COMMAS_API_KEY")
            .map_err(|_| ConfigError::MissingEnvironmentVariable("THREE_COMMAS_API_KEY".into()))?;

        let secret = env::var("THREE_COMMAS_SECRET")
            .map_err(|_| ConfigError::MissingEnvironmentVariable("THREE_COMMAS_SECRET".into()))?;

        let api_key_type = match env::var("THREE_COMMAS_API_KEY_TYPE") {
            Ok(raw) => raw
                .parse::<ApiKeyType>()
                .map_err(ConfigError::InvalidConfiguration)?,
            Err(_) => ApiKeyType::default(),
        };

        let forced_mode = match env::var("THREE_COMMAS_FORCED_MODE").ok().as_deref() {
            Some("real") => Some(UserMode::Real),
            Some("paper") => Some(UserMode::Paper),
            Some(other) => {
                return Err(ConfigError::InvalidConfiguration(format!(
                    "unknown forced mode: {}",
                    other
                )))
            }
            None => None,
        };

        let timeout_ms = env::var("THREE_COMMAS_TIMEOUT_MS")
            .ok()
            .map_or(Ok(DEFAULT_TIMEOUT_MS), |raw| {
                raw.parse::<u64>().map_err(|_| {
                    ConfigError::InvalidConfiguration(format!("invalid timeout: {}", raw))
                })
            })?;

        Ok(Self {
            api_key: Secret::new(api_key),
            secret: Secret::new(secret),
            api_key_type,
            timeout_ms,
            forced_mode,
            base_url: env::var("THREE_COMMAS_BASE_URL").ok(),
            ws_url: env::var("THREE_COMMAS_WS_URL").ok(),
        })
    }

    /// Create configuration from .env file and environment variables
    ///
    /// This method first loads environment variables from a .env file (if it
    /// exists), then reads the configuration using the standard environment
    /// variable names.
    ///
    /// **Security Warning**: Never commit .env files to version control!
    /// Add .env to your .gitignore file.
    #[cfg(feature = "env-file")]
    pub fn from_env_file() -> Result<Self, ConfigError> {
        Self::from_env_file_with_path(".env")
    }

    /// Create configuration from a specific .env file path
    #[cfg(feature = "env-file")]
    pub fn from_env_file_with_path(env_file_path: &str) -> Result<Self, ConfigError> {
        match dotenv::from_path(env_file_path) {
            Ok(_) => {}
            Err(dotenv::Error::Io(io_err)) if io_err.kind() == std::io::ErrorKind::NotFound => {
                // .env file doesn't exist, that's okay - continue with system env vars
            }
            Err(e) => {
                return Err(ConfigError::InvalidConfiguration(format!(
                    "Failed to load .env file '{}': {}",
                    env_file_path, e
                )));
            }
        }

        Self::from_env()
    }

    /// Create configuration for public, unsigned endpoints only
    #[must_use]
    pub fn read_only() -> Self {
        Self {
            api_key: Secret::new(String::new()),
            secret: Secret::new(String::new()),
            api_key_type: ApiKeyType::default(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            forced_mode: None,
            base_url: None,
            ws_url: None,
        }
    }

    /// Check if this configuration has credentials for signed operations
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.api_key.expose_secret().is_empty() && !self.secret.expose_secret().is_empty()
    }

    /// Set the API key type
    #[must_use]
    pub const fn api_key_type(mut self, api_key_type: ApiKeyType) -> Self {
        self.api_key_type = api_key_type;
        self
    }

    /// Set the request timeout in milliseconds
    #[must_use]
    pub const fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Force every request into the given trading mode
    #[must_use]
    pub const fn forced_mode(mut self, mode: UserMode) -> Self {
        self.forced_mode = Some(mode);
        self
    }

    /// Set custom base URL
    #[must_use]
    pub fn base_url(mut self, base_url: String) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Set custom WebSocket URL
    #[must_use]
    pub fn ws_url(mut self, ws_url: String) -> Self {
        self.ws_url = Some(ws_url);
        self
    }

    /// Get API key (use carefully - exposes secret)
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Get signing secret (use carefully - exposes secret)
    pub fn secret(&self) -> &str {
        self.secret.expose_secret()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvironmentVariable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}
