//! Cart synchronization.
//!
//! Every cart operation follows the same shape: take a ticket from the store,
//! call the API, then settle the ticket with the complete response. The store
//! decides whether the response is applied or discarded as stale; this
//! service never edits the cart between request and response.

use mobile_store_core::{Cart, CartAction, Product};
use tracing::instrument;

use crate::api::{ApiError, MobileApiClient};
use crate::store::{CartStore, Operation, Settled, Ticket};

/// Cart operations bound to an API client and a store.
#[derive(Clone)]
pub struct CartSync {
    client: MobileApiClient,
    store: CartStore,
}

impl CartSync {
    #[must_use]
    pub const fn new(client: MobileApiClient, store: CartStore) -> Self {
        Self { client, store }
    }

    #[must_use]
    pub const fn store(&self) -> &CartStore {
        &self.store
    }

    #[must_use]
    pub const fn client(&self) -> &MobileApiClient {
        &self.client
    }

    /// Re-read the cart from the API.
    ///
    /// # Errors
    ///
    /// Returns the API error; the store records it and keeps its cart.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<Settled, ApiError> {
        let ticket = self.store.begin(Operation::Refresh);
        let result = self.client.get_cart().await;
        self.settle(ticket, result)
    }

    /// Send `product` with `action` and replace the cart with the response.
    ///
    /// No quantity check happens here; decrementing a product that is not in
    /// the cart is left to the API.
    ///
    /// # Errors
    ///
    /// Returns the API error; the store records it and keeps its cart.
    #[instrument(skip(self, product), fields(product_id = %product.id, action = %action))]
    pub async fn update(&self, product: &Product, action: CartAction) -> Result<Settled, ApiError> {
        let ticket = self.store.begin(Operation::Update(action));
        let result = self.client.update_cart(product, action).await;
        if result.is_ok() {
            self.client.invalidate_catalog().await;
        }
        self.settle(ticket, result)
    }

    /// Submit the current cart as-is and apply the API's result.
    ///
    /// On success the checkout notice is opened, whether or not the response
    /// itself was still fresh enough to apply.
    ///
    /// # Errors
    ///
    /// Returns the API error; the store records it, keeps its cart and does
    /// not open the notice.
    #[instrument(skip(self))]
    pub async fn checkout(&self) -> Result<Settled, ApiError> {
        let cart = self.store.snapshot().cart;
        let ticket = self.store.begin(Operation::Checkout);
        let result = self.client.checkout(&cart).await;
        let settled = self.settle(ticket, result)?;

        tracing::info!(lines = cart.items().len(), total = %cart.total(), "Checkout completed");
        self.store.show_notice();
        Ok(settled)
    }

    /// Find the full record for a product id.
    ///
    /// Cart lines are preferred since they carry the current quantity; the
    /// catalog is consulted for products not yet in the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog has to be fetched and that fails.
    pub async fn resolve_product(&self, key: &str) -> Result<Option<Product>, ApiError> {
        if let Some(product) = self.store.snapshot().cart.find(key) {
            return Ok(Some(product.clone()));
        }

        let catalog = self.client.list_mobiles().await?;
        Ok(catalog.iter().find(|p| p.id.matches(key)).cloned())
    }

    fn settle(&self, ticket: Ticket, result: Result<Cart, ApiError>) -> Result<Settled, ApiError> {
        match result {
            Ok(cart) => Ok(self.store.apply(ticket, cart)),
            Err(e) => {
                self.store.fail(ticket, e.to_string());
                Err(e)
            }
        }
    }
}
