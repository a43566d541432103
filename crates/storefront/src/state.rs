//! Application state shared across handlers.

use std::sync::Arc;

use mobile_store_core::CurrencyCode;

use crate::api::{ApiError, MobileApiClient};
use crate::config::StorefrontConfig;
use crate::services::CartSync;
use crate::store::CartStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// API client, the cart store, and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    cart: CartSync,
}

impl AppState {
    /// Create a new application state with an empty cart store.
    ///
    /// # Errors
    ///
    /// Returns an error if the API client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, ApiError> {
        let client = MobileApiClient::new(&config.api)?;
        let cart = CartSync::new(client, CartStore::new());

        Ok(Self {
            inner: Arc::new(AppStateInner { config, cart }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Display currency.
    #[must_use]
    pub fn currency(&self) -> CurrencyCode {
        self.inner.config.currency
    }

    /// Get a reference to the mobiles API client.
    #[must_use]
    pub fn api(&self) -> &MobileApiClient {
        self.inner.cart.client()
    }

    /// Get a reference to the cart synchronization service.
    #[must_use]
    pub fn cart(&self) -> &CartSync {
        &self.inner.cart
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn store(&self) -> &CartStore {
        self.inner.cart.store()
    }
}
