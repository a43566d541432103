//! CLI commands.
//!
//! - `catalog` - Catalog listing
//! - `cart` - Cart display, quantity changes and checkout

pub mod cart;
pub mod catalog;

use mobile_store_core::{CurrencyCode, UnknownCurrency};
use mobile_store_storefront::api::{ApiError, MobileApiClient};
use mobile_store_storefront::config::{ApiConfig, parse_api_url};
use mobile_store_storefront::services::CartSync;
use mobile_store_storefront::store::CartStore;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// No API URL was given.
    #[error("Missing API URL: pass --api-url or set MOBILE_API_URL")]
    MissingApiUrl,

    /// The API URL could not be used.
    #[error("Invalid API URL: {0}")]
    InvalidApiUrl(String),

    /// Unknown display currency.
    #[error(transparent)]
    Currency(#[from] UnknownCurrency),

    /// Mobiles API request failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// No product with the given id.
    #[error("Product not found: {0}")]
    ProductNotFound(String),
}

/// A connected client with its own cart store.
pub struct Session {
    pub cart: CartSync,
    pub currency: CurrencyCode,
}

impl Session {
    /// Build a client for the given API URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is missing or invalid, the currency is
    /// unknown, or the HTTP client cannot be built.
    pub fn connect(api_url: Option<&str>, currency: &str) -> Result<Self, CommandError> {
        let raw = api_url.ok_or(CommandError::MissingApiUrl)?;
        let base_url = parse_api_url(raw).map_err(CommandError::InvalidApiUrl)?;
        let currency: CurrencyCode = currency.parse()?;

        let client = MobileApiClient::new(&ApiConfig::new(base_url))?;
        tracing::debug!(api = %client.base_url(), "Connected");

        Ok(Self {
            cart: CartSync::new(client, CartStore::new()),
            currency,
        })
    }
}
