//! Catalog loading.
//!
//! A failed load is reported as [`RequestState::Failed`], so views can tell an
//! empty catalog apart from an unreachable API.

use std::sync::Arc;

use mobile_store_core::Product;
use tracing::instrument;

use crate::api::MobileApiClient;
use crate::store::RequestState;

/// Result of a catalog load.
pub type CatalogState = RequestState<Arc<Vec<Product>>>;

/// Fetch the catalog once. No retry.
#[instrument(skip(client))]
pub async fn load_catalog(client: &MobileApiClient) -> CatalogState {
    let result = client.list_mobiles().await;
    if let Err(e) = &result {
        tracing::warn!(error = %e, "Failed to load catalog");
    }
    RequestState::from_result(result)
}
