//! Storefront client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `MARKET_API_BASE_URL` - Backend base URL (default: `http://localhost:4567/`)
//! - `MARKET_MESSAGE_TIMEOUT_MS` - How long notifications stay visible (default: 3500)
//! - `MARKET_PLACEHOLDER_IMAGE` - Image used when a product or flag has none
//!   (default: `images/placeholder.svg`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_BASE_URL: &str = "http://localhost:4567/";
const DEFAULT_MESSAGE_TIMEOUT_MS: u64 = 3500;
pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "images/placeholder.svg";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Backend base URL, always ending in `/` so endpoint paths join under it
    pub api_base_url: Url,
    /// Auto-hide delay for notifications
    pub message_timeout: Duration,
    /// Fallback image for products without one and flags that fail to load
    pub placeholder_image: String,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = parse_base_url(
            "MARKET_API_BASE_URL",
            &lookup("MARKET_API_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        )?;

        let message_timeout = lookup("MARKET_MESSAGE_TIMEOUT_MS")
            .map_or(Ok(DEFAULT_MESSAGE_TIMEOUT_MS), |raw| {
                raw.trim().parse::<u64>().map_err(|e| {
                    ConfigError::InvalidEnvVar("MARKET_MESSAGE_TIMEOUT_MS".to_string(), e.to_string())
                })
            })
            .map(Duration::from_millis)?;

        let placeholder_image = non_empty(lookup("MARKET_PLACEHOLDER_IMAGE"))
            .unwrap_or_else(|| DEFAULT_PLACEHOLDER_IMAGE.to_string());

        Ok(Self {
            api_base_url,
            message_timeout,
            placeholder_image,
            sentry_dsn: non_empty(lookup("SENTRY_DSN")),
            sentry_environment: non_empty(lookup("SENTRY_ENVIRONMENT")),
        })
    }

    /// Replace the backend base URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `raw` is not an absolute URL.
    pub fn with_base_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.api_base_url = parse_base_url("--base-url", raw)?;
        Ok(self)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a base URL and make sure it ends with a slash.
fn parse_base_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be an http(s) URL".to_string(),
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Treat empty values like unset ones.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
