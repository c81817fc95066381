//! Configuration types for apod-collector
//!
//! Settings are gathered into one [`Config`] value that is passed explicitly to
//! the components that need it. [`Config::from_env`] builds it from the process
//! environment (after loading an optional `.env` file).

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, time::Duration};

/// Default APOD endpoint
pub const DEFAULT_APOD_ENDPOINT: &str = "https://api.nasa.gov/planetary/apod";

/// Main configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Upstream APOD API settings
    #[serde(default)]
    pub apod: ApodConfig,

    /// Fetch orchestration settings
    #[serde(default)]
    pub fetch: FetchConfig,

    /// API and external server integration
    #[serde(default)]
    pub server: ServerIntegrationConfig,
}

/// Upstream APOD API configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct ApodConfig {
    /// Endpoint URL (default: https://api.nasa.gov/planetary/apod)
    #[serde(default = "default_apod_endpoint")]
    pub endpoint: String,

    /// NASA API key (default: "DEMO_KEY")
    #[serde(default = "default_api_key")]
    pub api_key: String,
}

impl Default for ApodConfig {
    fn default() -> Self {
        Self {
            endpoint: default_apod_endpoint(),
            api_key: default_api_key(),
        }
    }
}

impl std::fmt::Debug for ApodConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApodConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Fetch orchestration configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Maximum fetches in flight at once (default: 5)
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,

    /// Timeout applied to each individual APOD request (default: 20 seconds)
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            concurrent_requests: default_concurrent_requests(),
            request_timeout: default_request_timeout(),
        }
    }
}

/// API and external server integration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ServerIntegrationConfig {
    /// REST API settings
    #[serde(default)]
    pub api: ApiConfig,
}

/// REST API configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Address to bind to (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,

    /// Enable CORS for browser access (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins (default: ["*"])
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Enable Swagger UI at /swagger-ui (default: false)
    #[serde(default)]
    pub swagger_ui: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            cors_enabled: true,
            cors_origins: default_cors_origins(),
            swagger_ui: false,
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// A `.env` file in the working directory is loaded first if present;
    /// variables already set in the environment take precedence.
    ///
    /// | Variable              | Setting                          |
    /// |-----------------------|----------------------------------|
    /// | `API_KEY`             | `apod.api_key`                   |
    /// | `APOD_ENDPOINT`       | `apod.endpoint`                  |
    /// | `APOD_TIMEOUT_SECS`   | `fetch.request_timeout`          |
    /// | `CONCURRENT_REQUESTS` | `fetch.concurrent_requests`      |
    /// | `PORT`                | port of `server.api.bind_address`|
    pub fn from_env() -> Result<Self> {
        if let Err(e) = dotenvy::dotenv()
            && !e.not_found()
        {
            tracing::warn!(error = %e, "Failed to load .env file");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup, then validate it.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(api_key) = lookup("API_KEY") {
            config.apod.api_key = api_key;
        }
        if let Some(endpoint) = lookup("APOD_ENDPOINT") {
            config.apod.endpoint = endpoint;
        }
        if let Some(secs) = lookup("APOD_TIMEOUT_SECS") {
            config.fetch.request_timeout = Duration::from_secs(parse_var("APOD_TIMEOUT_SECS", &secs)?);
        }
        if let Some(limit) = lookup("CONCURRENT_REQUESTS") {
            config.fetch.concurrent_requests = parse_var("CONCURRENT_REQUESTS", &limit)?;
        }
        if let Some(port) = lookup("PORT") {
            config.server.api.bind_address.set_port(parse_var("PORT", &port)?);
        }

        config.validate()?;
        Ok(config)
    }

    /// Check invariants the rest of the crate relies on.
    pub fn validate(&self) -> Result<()> {
        if self.fetch.concurrent_requests == 0 {
            return Err(config_error("must be at least 1", "CONCURRENT_REQUESTS"));
        }
        if self.fetch.request_timeout.is_zero() {
            return Err(config_error("must be greater than zero", "APOD_TIMEOUT_SECS"));
        }
        match url::Url::parse(&self.apod.endpoint) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => {
                return Err(config_error(
                    &format!("unsupported scheme '{}'", url.scheme()),
                    "APOD_ENDPOINT",
                ));
            }
            Err(e) => {
                return Err(config_error(&format!("invalid URL: {e}"), "APOD_ENDPOINT"));
            }
        }
        if self.apod.api_key.trim().is_empty() {
            return Err(config_error("must not be empty", "API_KEY"));
        }
        Ok(())
    }
}

fn parse_var<T>(key: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| config_error(&format!("cannot parse '{raw}': {e}"), key))
}

fn config_error(message: &str, key: &str) -> Error {
    Error::Config {
        message: format!("{key} {message}"),
        key: Some(key.to_string()),
    }
}

fn default_apod_endpoint() -> String {
    DEFAULT_APOD_ENDPOINT.to_string()
}

fn default_api_key() -> String {
    "DEMO_KEY".to_string()
}

fn default_concurrent_requests() -> usize {
    5
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(20)
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_true() -> bool {
    true
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
