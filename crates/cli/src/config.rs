//! CLI configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! - `DELIVERY_API_URL` - Storefront base URL (default: `http://127.0.0.1:3000`)
//! - `DELIVERY_CART_DIR` - Directory holding the cart file (default: `.delivery`)
//! - `DELIVERY_HTTP_TIMEOUT_SECS` - Request timeout in seconds (default: 10)
//! - `STOREFRONT_DATABASE_URL` / `DATABASE_URL` - Only for `delivery migrate`

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://127.0.0.1:3000";
const DEFAULT_CART_DIR: &str = ".delivery";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client-side configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Storefront base URL
    pub api_url: Url,
    /// Where the cart file lives
    pub cart_dir: PathBuf,
    /// Per-request timeout for storefront calls
    pub http_timeout: Duration,
}

impl CliConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let raw_url = get("DELIVERY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = Url::parse(&raw_url).map_err(|e| {
            ConfigError::InvalidEnvVar("DELIVERY_API_URL".to_string(), e.to_string())
        })?;
        if api_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidEnvVar(
                "DELIVERY_API_URL".to_string(),
                "must be an absolute http(s) URL".to_string(),
            ));
        }

        let cart_dir = get("DELIVERY_CART_DIR")
            .map_or_else(|| PathBuf::from(DEFAULT_CART_DIR), PathBuf::from);

        let http_timeout = get("DELIVERY_HTTP_TIMEOUT_SECS")
            .map(|raw| {
                raw.parse::<u64>().map_err(|e| {
                    ConfigError::InvalidEnvVar(
                        "DELIVERY_HTTP_TIMEOUT_SECS".to_string(),
                        e.to_string(),
                    )
                })
            })
            .transpose()?
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);

        Ok(Self {
            api_url,
            cart_dir,
            http_timeout: Duration::from_secs(http_timeout),
        })
    }
}

/// Database URL for migrations, with fallback to generic `DATABASE_URL`.
///
/// # Errors
///
/// Returns `ConfigError::MissingEnvVar` if neither variable is set.
pub fn database_url_from_env() -> Result<SecretString, ConfigError> {
    let _ = dotenvy::dotenv();
    std::env::var("STOREFRONT_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| ConfigError::MissingEnvVar("STOREFRONT_DATABASE_URL".to_string()))
}
