//! Provider configuration
//!
//! The host framework hands the provider an untyped attribute bag at
//! configure time. That bag is decoded into [`ProviderConfig`] exactly once,
//! validated at the boundary, and every later access is a plain typed field
//! read. The resulting API client handle is passed explicitly into each
//! CRUD handler rather than reached through ambient state.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default platform API endpoint
pub const DEFAULT_API_URL: &str = "https://api.heroku.com";

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "HEROKU_API_KEY";

/// Environment variable overriding the API endpoint
pub const API_URL_ENV: &str = "HEROKU_API_URL";

/// Typed provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Bearer token for the platform API
    pub api_key: String,
    /// Base URL of the platform API
    #[serde(default = "default_api_url")]
    pub base_url: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl ProviderConfig {
    /// Create a configuration with the default endpoint
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_api_url(),
        }
    }

    /// Override the API endpoint (e.g. for a test server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Decode from the host's untyped configure payload
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let config: ProviderConfig = serde_json::from_value(value)
            .map_err(|e| Error::Configuration(format!("invalid provider config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the process environment
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .map_err(|_| Error::Configuration(format!("{} is not set", API_KEY_ENV)))?;
        let base_url = std::env::var(API_URL_ENV).unwrap_or_else(|_| default_api_url());
        let config = Self { api_key, base_url };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration once at the boundary
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(Error::Configuration("api_key must not be empty".into()));
        }
        let url: reqwest::Url = self
            .base_url
            .parse()
            .map_err(|e| Error::Configuration(format!("invalid base_url {:?}: {}", self.base_url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Configuration(format!(
                "base_url must be http(s), got {:?}",
                url.scheme()
            )));
        }
        Ok(())
    }
}
