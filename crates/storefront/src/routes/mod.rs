//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Catalog page
//! GET  /health                  - Liveness check
//! GET  /health/ready            - Readiness check (pings the mobiles API)
//!
//! # Cart (HTMX fragments or full page)
//! GET  /cart                    - Cart page (re-reads the cart)
//! POST /cart/increment          - Add one unit (form: product_id)
//! POST /cart/decrement          - Remove one unit (form: product_id)
//! GET  /cart/count              - Cart count badge (fragment)
//! GET  /cart/events             - Cart count updates (server-sent events)
//!
//! # Checkout
//! POST /checkout                - Submit cart, show notice, redirect home
//! POST /checkout/notice/dismiss - Close the checkout notice
//!
//! GET  /static/*                - Stylesheets and images
//! ```

pub mod cart;
pub mod catalog;
pub mod health;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::middleware::{request_id_middleware, request_span};
use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/increment", post(cart::increment))
        .route("/decrement", post(cart::decrement))
        .route("/count", get(cart::count))
        .route("/events", get(cart::events))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(cart::checkout))
        .route("/notice/dismiss", post(cart::dismiss_notice))
}

/// Create all page routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Catalog
        .route("/", get(catalog::index))
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout
        .nest("/checkout", checkout_routes())
}

/// Build the complete application with health checks, static files and the
/// middleware stack.
pub fn app(state: AppState) -> Router {
    let static_dir = ServeDir::new(&state.config().static_dir);

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(routes())
        .nest_service("/static", static_dir)
        .layer(axum_middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}
