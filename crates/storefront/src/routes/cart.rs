//! Cart route handlers.
//!
//! Quantity changes and checkout go through [`CartSync`](crate::services::CartSync),
//! so every page renders the store's cart rather than a locally edited copy.
//! HTMX requests get fragments; plain form posts are redirected back or get
//! the full cart page with an inline error.

use std::convert::Infallible;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{
        AppendHeaders, Html, IntoResponse, Redirect, Response,
        sse::{Event, KeepAlive, Sse},
    },
};
use mobile_store_core::{Cart, CartAction, CurrencyCode, Product};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, add_breadcrumb};
use crate::filters;
use crate::state::AppState;
use crate::store::{CHECKOUT_REDIRECT_DELAY, NOTICE_AUTO_HIDE, NOTICE_MESSAGE};

const HX_REQUEST: &str = "hx-request";
const HX_TARGET: &str = "hx-target";
const HX_TRIGGER: &str = "hx-trigger";
const CART_UPDATED: &str = "cart-updated";

/// Element id on the catalog page that receives add-to-cart feedback.
const CART_STATUS_TARGET: &str = "cart-status";

// =============================================================================
// Views
// =============================================================================

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: String,
    pub model: String,
    pub company: String,
    pub img: String,
    pub qty: u32,
    pub price: String,
    pub subtotal: String,
}

impl CartItemView {
    #[must_use]
    pub fn new(product: &Product, currency: CurrencyCode) -> Self {
        Self {
            id: product.id.to_string(),
            model: product.model.clone(),
            company: product.company.clone(),
            img: product.img.clone(),
            qty: product.qty,
            price: currency.format(product.price.amount()),
            subtotal: currency.format(product.subtotal()),
        }
    }
}

/// Cart display data for templates.
///
/// Only lines with a positive quantity are shown.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: u64,
}

impl CartView {
    #[must_use]
    pub fn new(cart: &Cart, currency: CurrencyCode) -> Self {
        Self {
            items: cart
                .lines()
                .map(|p| CartItemView::new(p, currency))
                .collect(),
            total: currency.format(cart.total()),
            item_count: cart.item_count(),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub cart_count: u64,
    pub error: Option<String>,
    pub notice: Option<&'static str>,
    pub auto_hide_ms: u128,
    pub redirect_secs: Option<u64>,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
    pub error: Option<String>,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub cart_count: u64,
}

/// Add-to-cart feedback fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_status.html")]
pub struct CartStatusTemplate {
    pub message: String,
    pub is_error: bool,
}

/// Quantity change form data.
#[derive(Debug, Deserialize)]
pub struct CartChangeForm {
    #[serde(default)]
    pub product_id: String,
    pub return_to: Option<String>,
}

// =============================================================================
// Helpers
// =============================================================================

fn is_htmx(headers: &HeaderMap) -> bool {
    headers.contains_key(HX_REQUEST)
}

fn hx_target(headers: &HeaderMap) -> Option<&str> {
    headers.get(HX_TARGET).and_then(|v| v.to_str().ok())
}

/// Page to send a plain form post back to. Only the catalog and cart pages
/// are accepted; anything else falls back to the cart.
fn return_path(requested: Option<&str>) -> &'static str {
    match requested {
        Some("/") => "/",
        _ => "/cart",
    }
}

/// Build the cart page from the store's current state.
fn cart_page(
    state: &AppState,
    error: Option<String>,
    redirect_secs: Option<u64>,
) -> CartShowTemplate {
    let snapshot = state.store().snapshot();
    CartShowTemplate {
        cart: CartView::new(&snapshot.cart, state.currency()),
        cart_count: snapshot.cart.item_count(),
        error,
        notice: state.store().notice_visible().then_some(NOTICE_MESSAGE),
        auto_hide_ms: NOTICE_AUTO_HIDE.as_millis(),
        redirect_secs,
    }
}

/// Resolve the product and send the change. Returns the product's model name.
async fn change_quantity(
    state: &AppState,
    product_id: &str,
    action: CartAction,
) -> Result<String, AppError> {
    let key = product_id.trim();
    if key.is_empty() {
        return Err(AppError::BadRequest("missing product_id".to_string()));
    }

    let product = state
        .cart()
        .resolve_product(key)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {key}")))?;

    add_breadcrumb(
        "cart",
        "Changing cart quantity",
        Some(&[("product_id", key), ("action", action.as_str())]),
    );

    state.cart().update(&product, action).await?;
    Ok(product.model)
}

async fn respond_to_change(
    state: &AppState,
    headers: &HeaderMap,
    form: CartChangeForm,
    action: CartAction,
) -> Response {
    let outcome = change_quantity(state, &form.product_id, action).await;
    if let Err(e) = &outcome {
        e.report();
    }

    if !is_htmx(headers) {
        return match outcome {
            Ok(_) => Redirect::to(return_path(form.return_to.as_deref())).into_response(),
            Err(e) => (e.status(), cart_page(state, Some(e.public_message()), None)).into_response(),
        };
    }

    // Fragments are sent with 200 so HTMX swaps the inline error in
    let trigger = outcome
        .is_ok()
        .then_some(AppendHeaders([(HX_TRIGGER, CART_UPDATED)]));

    if hx_target(headers) == Some(CART_STATUS_TARGET) {
        let status = match outcome {
            Ok(model) => CartStatusTemplate {
                message: match action {
                    CartAction::Increment => format!("Added {model} to cart"),
                    CartAction::Decrement => format!("Removed one {model} from cart"),
                },
                is_error: false,
            },
            Err(e) => CartStatusTemplate {
                message: e.public_message(),
                is_error: true,
            },
        };
        return (trigger, status).into_response();
    }

    let cart = state.store().snapshot().cart;
    (
        trigger,
        CartItemsTemplate {
            cart: CartView::new(&cart, state.currency()),
            error: outcome.err().map(|e| e.public_message()),
        },
    )
        .into_response()
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart page.
///
/// The cart is re-read from the API first; if that fails the last known cart
/// is shown with an error banner.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Response {
    match state.cart().refresh().await {
        Ok(_) => cart_page(&state, None, None).into_response(),
        Err(e) => {
            let e = AppError::from(e);
            e.report();
            (e.status(), cart_page(&state, Some(e.public_message()), None)).into_response()
        }
    }
}

/// Add one unit of a product to the cart.
#[instrument(skip(state, headers))]
pub async fn increment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<CartChangeForm>,
) -> Response {
    respond_to_change(&state, &headers, form, CartAction::Increment).await
}

/// Remove one unit of a product from the cart.
#[instrument(skip(state, headers))]
pub async fn decrement(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<CartChangeForm>,
) -> Response {
    respond_to_change(&state, &headers, form, CartAction::Decrement).await
}

/// Get cart count badge (HTMX).
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> impl IntoResponse {
    CartCountTemplate {
        cart_count: state.store().snapshot().cart.item_count(),
    }
}

/// Stream the cart badge count whenever the store changes.
///
/// The current count is sent immediately on connect.
pub async fn events(
    State(state): State<AppState>,
) -> Sse<impl futures::Stream<Item = Result<Event, Infallible>>> {
    let mut updates = state.store().subscribe();

    let stream = async_stream::stream! {
        loop {
            let count = updates.borrow_and_update().cart.item_count();
            yield Ok::<_, Infallible>(Event::default().event("cart-count").data(count.to_string()));

            if updates.changed().await.is_err() {
                break;
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Submit the cart and show the confirmation notice.
///
/// On success the page redirects to the catalog after a short delay.
#[instrument(skip(state))]
pub async fn checkout(State(state): State<AppState>) -> Response {
    add_breadcrumb("checkout", "Checkout submitted", None);

    match state.cart().checkout().await {
        Ok(_) => cart_page(&state, None, Some(CHECKOUT_REDIRECT_DELAY.as_secs())).into_response(),
        Err(e) => {
            let e = AppError::from(e);
            e.report();
            (e.status(), cart_page(&state, Some(e.public_message()), None)).into_response()
        }
    }
}

/// Close the checkout notice.
#[instrument(skip(state, headers))]
pub async fn dismiss_notice(State(state): State<AppState>, headers: HeaderMap) -> Response {
    state.store().dismiss_notice();

    if is_htmx(&headers) {
        Html("").into_response()
    } else {
        Redirect::to("/cart").into_response()
    }
}
