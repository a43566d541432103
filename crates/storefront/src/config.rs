//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `MOBILE_API_URL` - Base URL of the mobiles API (e.g., `http://localhost:4000`)
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_CURRENCY` - Display currency (default: INR)
//! - `STOREFRONT_STATIC_DIR` - Static asset directory (default: crates/storefront/static)
//! - `API_TIMEOUT_SECS` - Per-request timeout for API calls (default: 10)
//! - `CATALOG_CACHE_TTL_SECS` - Catalog cache lifetime, 0 disables (default: 30)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use mobile_store_core::CurrencyCode;
use thiserror::Error;
use url::Url;

const DEFAULT_API_TIMEOUT_SECS: u64 = 10;
const DEFAULT_CATALOG_CACHE_TTL_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Currency used when formatting prices
    pub currency: CurrencyCode,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Mobiles API configuration
    pub api: ApiConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions sent to Sentry
    pub sentry_traces_sample_rate: f32,
}

/// Mobiles API client configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL, always ending in `/` so endpoints join beneath it
    pub base_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
    /// Catalog cache lifetime; zero disables caching
    pub catalog_cache_ttl: Duration,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env_or_default::<IpAddr>("STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_env_or_default::<u16>("STOREFRONT_PORT", "3000")?;
        let currency = parse_env_or_default::<CurrencyCode>("STOREFRONT_CURRENCY", "INR")?;
        let static_dir = PathBuf::from(get_env_or_default(
            "STOREFRONT_STATIC_DIR",
            "crates/storefront/static",
        ));

        let api = ApiConfig::from_env()?;

        Ok(Self {
            host,
            port,
            currency,
            static_dir,
            api,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env_or_default("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env_or_default("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl ApiConfig {
    /// Configuration with default timeout and cache lifetime.
    #[must_use]
    pub const fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: Duration::from_secs(DEFAULT_API_TIMEOUT_SECS),
            catalog_cache_ttl: Duration::from_secs(DEFAULT_CATALOG_CACHE_TTL_SECS),
        }
    }

    /// Load the API section from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `MOBILE_API_URL` is missing or not an
    /// absolute http(s) URL, or if a numeric setting does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = get_required_env("MOBILE_API_URL")?;
        let base_url = parse_api_url(&raw)
            .map_err(|reason| ConfigError::InvalidEnvVar("MOBILE_API_URL".to_string(), reason))?;

        let timeout_secs = parse_env_or_default::<u64>(
            "API_TIMEOUT_SECS",
            &DEFAULT_API_TIMEOUT_SECS.to_string(),
        )?;
        let ttl_secs = parse_env_or_default::<u64>(
            "CATALOG_CACHE_TTL_SECS",
            &DEFAULT_CATALOG_CACHE_TTL_SECS.to_string(),
        )?;

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            catalog_cache_ttl: Duration::from_secs(ttl_secs),
        })
    }
}

/// Parse and normalize the API base URL.
///
/// The path gets a trailing slash so `Url::join("cart")` appends rather than
/// replacing the last segment (`http://host/api` → `http://host/api/cart`).
///
/// # Errors
///
/// Returns a human-readable reason if the URL is not absolute http(s).
pub fn parse_api_url(raw: &str) -> Result<Url, String> {
    let mut url = Url::parse(raw.trim()).map_err(|e| e.to_string())?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);

    Ok(url)
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env_or_default<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse_value(key, &get_env_or_default(key, default))
}

fn parse_value<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> StorefrontConfig {
        StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            currency: CurrencyCode::INR,
            static_dir: PathBuf::from("static"),
            api: ApiConfig::new(parse_api_url("http://localhost:4000").unwrap()),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }

    #[test]
    fn test_socket_addr() {
        let addr = test_config().socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_api_url_gets_trailing_slash() {
        let url = parse_api_url("http://localhost:4000").unwrap();
        assert_eq!(url.as_str(), "http://localhost:4000/");
        assert_eq!(url.join("cart").unwrap().as_str(), "http://localhost:4000/cart");

        let nested = parse_api_url("https://api.example.com/v1").unwrap();
        assert_eq!(
            nested.join("mobiles").unwrap().as_str(),
            "https://api.example.com/v1/mobiles"
        );
    }

    #[test]
    fn test_api_url_strips_query_and_fragment() {
        let url = parse_api_url("http://localhost:4000/api/?debug=1#top").unwrap();
        assert_eq!(url.as_str(), "http://localhost:4000/api/");
    }

    #[test]
    fn test_api_url_rejects_non_http() {
        assert!(parse_api_url("ftp://example.com").is_err());
        assert!(parse_api_url("localhost:4000").is_err());
        assert!(parse_api_url("not a url").is_err());
    }

    #[test]
    fn test_parse_value_reports_key() {
        let err = parse_value::<u16>("STOREFRONT_PORT", "eighty").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "STOREFRONT_PORT"));

        let currency: CurrencyCode = parse_value("STOREFRONT_CURRENCY", "usd").unwrap();
        assert_eq!(currency, CurrencyCode::USD);
    }

    #[test]
    fn test_api_config_defaults() {
        let config = test_config();
        assert_eq!(config.api.timeout, Duration::from_secs(10));
        assert_eq!(config.api.catalog_cache_ttl, Duration::from_secs(30));
    }
}
