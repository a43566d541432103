//! Catalog route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use mobile_store_core::{CurrencyCode, Product};
use tracing::instrument;

use crate::filters;
use crate::services::load_catalog;
use crate::state::AppState;
use crate::store::RequestState;

/// Shown instead of the product grid when the catalog could not be loaded.
pub const CATALOG_ERROR_MESSAGE: &str = "We couldn't load the phones right now. Please try again.";

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: String,
    pub model: String,
    pub company: String,
    pub img: String,
    pub price: String,
}

impl ProductView {
    #[must_use]
    pub fn new(product: &Product, currency: CurrencyCode) -> Self {
        Self {
            id: product.id.to_string(),
            model: product.model.clone(),
            company: product.company.clone(),
            img: product.img.clone(),
            price: currency.format(product.price.amount()),
        }
    }
}

/// Catalog page template.
#[derive(Template, WebTemplate)]
#[template(path = "catalog/index.html")]
pub struct CatalogTemplate {
    pub products: Vec<ProductView>,
    pub error: Option<&'static str>,
    pub cart_count: u64,
}

/// Display the catalog.
///
/// The cart is re-read alongside the catalog so the header badge reflects the
/// API's cart on first visit.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    let (catalog, cart) = tokio::join!(load_catalog(state.api()), state.cart().refresh());
    if let Err(e) = cart {
        tracing::warn!(error = %e, "Failed to refresh cart for header badge");
    }

    let currency = state.currency();
    let cart_count = state.store().snapshot().cart.item_count();

    let (status, products, error) = match catalog {
        RequestState::Success(products) => (
            StatusCode::OK,
            products
                .iter()
                .map(|p| ProductView::new(p, currency))
                .collect(),
            None,
        ),
        RequestState::Failed(_) => (
            StatusCode::BAD_GATEWAY,
            Vec::new(),
            Some(CATALOG_ERROR_MESSAGE),
        ),
        RequestState::Idle | RequestState::Loading => (StatusCode::OK, Vec::new(), None),
    };

    (
        status,
        CatalogTemplate {
            products,
            error,
            cart_count,
        },
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_product_view_formats_price() {
        let product: Product = serde_json::from_value(json!({
            "_id": "abc",
            "model": "iPhone 13 mini",
            "company": "Apple",
            "img": "iphone.png",
            "price": 69_900
        }))
        .unwrap();

        let view = ProductView::new(&product, CurrencyCode::INR);
        assert_eq!(view.id, "abc");
        assert_eq!(view.price, "₹69,900.00");
    }

    #[test]
    fn test_catalog_error_renders_message_not_empty_state() {
        let page = CatalogTemplate {
            products: Vec::new(),
            error: Some(CATALOG_ERROR_MESSAGE),
            cart_count: 0,
        }
        .render()
        .unwrap();

        assert!(page.contains("couldn"));
        assert!(!page.contains("No phones available"));
    }

    #[test]
    fn test_empty_catalog_renders_empty_state() {
        let page = CatalogTemplate {
            products: Vec::new(),
            error: None,
            cart_count: 0,
        }
        .render()
        .unwrap();

        assert!(page.contains("No phones available"));
    }
}
