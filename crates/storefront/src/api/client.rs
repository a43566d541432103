//! Mobiles API client implementation.
//!
//! Uses `reqwest` for HTTP with JSON bodies. Caches the catalog using `moka`
//! when a non-zero TTL is configured. Cart calls are never cached.

use std::sync::Arc;

use mobile_store_core::{Cart, CartAction, Product};
use moka::future::Cache;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::{ApiError, excerpt};
use crate::config::ApiConfig;

/// Client for the mobiles API.
///
/// Cheap to clone; clones share the connection pool and catalog cache.
#[derive(Clone)]
pub struct MobileApiClient {
    inner: Arc<MobileApiClientInner>,
}

struct MobileApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    catalog: Option<Cache<(), Arc<Vec<Product>>>>,
}

impl MobileApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        let catalog = (!config.catalog_cache_ttl.is_zero()).then(|| {
            Cache::builder()
                .max_capacity(1)
                .time_to_live(config.catalog_cache_ttl)
                .build()
        });

        Ok(Self {
            inner: Arc::new(MobileApiClientInner {
                client,
                base_url: config.base_url.clone(),
                catalog,
            }),
        })
    }

    /// The API base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path)?)
    }

    /// Send a request and decode its JSON body.
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        // Read as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %excerpt(&body),
                "Mobiles API returned non-success status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: excerpt(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %excerpt(&body),
                "Failed to decode mobiles API response"
            );
            ApiError::Decode(e)
        })
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Get the product catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the body is not a
    /// product array.
    #[instrument(skip(self))]
    pub async fn list_mobiles(&self) -> Result<Arc<Vec<Product>>, ApiError> {
        if let Some(cache) = &self.inner.catalog
            && let Some(products) = cache.get(&()).await
        {
            debug!("Cache hit for catalog");
            return Ok(products);
        }

        let url = self.endpoint("mobiles")?;
        let products: Vec<Product> = self.execute(self.inner.client.get(url)).await?;
        let products = Arc::new(products);

        if let Some(cache) = &self.inner.catalog {
            cache.insert((), Arc::clone(&products)).await;
        }

        debug!(count = products.len(), "Fetched catalog");
        Ok(products)
    }

    /// Drop the cached catalog, if any.
    pub async fn invalidate_catalog(&self) {
        if let Some(cache) = &self.inner.catalog {
            cache.invalidate(&()).await;
        }
    }

    /// Check that the API answers the catalog endpoint, bypassing the cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the status is not a success.
    pub async fn ping(&self) -> Result<(), ApiError> {
        let url = self.endpoint("mobiles")?;
        let response = self.inner.client.get(url).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ApiError::Status {
                status: status.as_u16(),
                body: String::new(),
            })
        }
    }

    // =========================================================================
    // Cart (not cached - mutable state)
    // =========================================================================

    /// Get the current cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the body is not a
    /// product array.
    #[instrument(skip(self))]
    pub async fn get_cart(&self) -> Result<Cart, ApiError> {
        let url = self.endpoint("cart")?;
        self.execute(self.inner.client.get(url)).await
    }

    /// Apply a single-unit change to a product's cart quantity.
    ///
    /// The full product record is sent unchanged; the API recomputes the cart
    /// and returns it. Quantity limits (e.g. decrementing below zero) are the
    /// API's responsibility.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the body is not a
    /// product array with non-negative quantities.
    #[instrument(skip(self, product), fields(product_id = %product.id, action = %action))]
    pub async fn update_cart(&self, product: &Product, action: CartAction) -> Result<Cart, ApiError> {
        let mut url = self.endpoint("cart")?;
        url.query_pairs_mut().append_pair("type", action.as_str());

        self.execute(self.inner.client.put(url).json(product)).await
    }

    /// Submit the cart for checkout.
    ///
    /// Returns the cart as the API left it, normally empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the body is not a
    /// product array.
    #[instrument(skip(self, cart), fields(lines = cart.items().len()))]
    pub async fn checkout(&self, cart: &Cart) -> Result<Cart, ApiError> {
        let url = self.endpoint("checkout")?;
        self.execute(self.inner.client.post(url).json(cart)).await
    }
}
