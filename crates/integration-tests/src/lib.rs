//! Integration test support for Mobile Store.
//!
//! [`MockMobileApi`] serves the mobiles API from an in-process axum server on
//! an ephemeral port, keeping the catalog and cart as raw JSON so records
//! round-trip exactly as a schemaless backend would return them.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p mobile-store-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `api_client` - HTTP client against the mock API
//! - `cart_sync` - Store sequencing with real round trips
//! - `storefront_routes` - Rendered pages via `tower::ServiceExt::oneshot`

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use mobile_store_core::CartAction;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// In-process mobiles API.
pub struct MockMobileApi {
    addr: SocketAddr,
    state: MockState,
    server: JoinHandle<()>,
}

#[derive(Clone, Default)]
struct MockState {
    inner: Arc<Mutex<MockInner>>,
}

#[derive(Default)]
struct MockInner {
    catalog: Vec<Value>,
    cart: Vec<Value>,
    put_delays: VecDeque<Duration>,
    fail_next: Option<StatusCode>,
    updates: usize,
    checkouts: Vec<Value>,
}

impl MockState {
    fn lock(&self) -> MutexGuard<'_, MockInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Injected failure for the current request, if one is queued.
    fn take_failure(&self) -> Option<Response> {
        self.lock()
            .fail_next
            .take()
            .map(|status| (status, "injected failure").into_response())
    }
}

/// The three phones used across the tests.
#[must_use]
pub fn sample_catalog() -> Vec<Value> {
    vec![
        json!({"_id": 1, "model": "Galaxy S21", "company": "Samsung", "price": 25000, "img": "/static/img/s21.png"}),
        json!({"_id": 2, "model": "iPhone 13", "company": "Apple", "price": 79900, "img": "/static/img/iphone13.png"}),
        json!({"_id": 3, "model": "Pixel 6", "company": "Google", "price": 40000, "img": "/static/img/pixel6.png"}),
    ]
}

impl MockMobileApi {
    /// Start a server with the given catalog and an empty cart.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start(catalog: Vec<Value>) -> Self {
        let state = MockState::default();
        state.lock().catalog = catalog;

        let api = Router::new()
            .route("/mobiles", get(list_mobiles))
            .route("/cart", get(get_cart).put(update_cart))
            .route("/checkout", post(checkout))
            .with_state(state.clone());
        let app = Router::new().nest("/api", api);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock API");
        let addr = listener.local_addr().expect("mock API address");
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            state,
            server,
        }
    }

    /// Base URL to configure clients with.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// Replace the server-side cart.
    pub fn set_cart(&self, cart: Vec<Value>) {
        self.state.lock().cart = cart;
    }

    /// Current server-side cart.
    #[must_use]
    pub fn cart(&self) -> Vec<Value> {
        self.state.lock().cart.clone()
    }

    /// Delay the responses of upcoming `PUT /cart` requests, in arrival order.
    ///
    /// The cart change is applied on arrival; only the response is held back.
    pub fn delay_puts(&self, delays: impl IntoIterator<Item = Duration>) {
        self.state.lock().put_delays.extend(delays);
    }

    /// Fail the next request of any kind with `status`.
    pub fn fail_next(&self, status: StatusCode) {
        self.state.lock().fail_next = Some(status);
    }

    /// Number of `PUT /cart` requests that changed the cart.
    #[must_use]
    pub fn updates(&self) -> usize {
        self.state.lock().updates
    }

    /// Bodies received by `POST /checkout`.
    #[must_use]
    pub fn checkouts(&self) -> Vec<Value> {
        self.state.lock().checkouts.clone()
    }

}

impl Drop for MockMobileApi {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// Base URL of a port nothing is listening on.
///
/// # Panics
///
/// Panics if no local port can be bound.
pub async fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("ephemeral address");
    drop(listener);
    format!("http://{addr}/api")
}

fn line_qty(line: &Value) -> u64 {
    line.get("qty").and_then(Value::as_u64).unwrap_or(0)
}

fn same_id(a: &Value, b: &Value) -> bool {
    a.get("_id").is_some() && a.get("_id") == b.get("_id")
}

async fn list_mobiles(State(state): State<MockState>) -> Response {
    if let Some(failure) = state.take_failure() {
        return failure;
    }
    Json(state.lock().catalog.clone()).into_response()
}

async fn get_cart(State(state): State<MockState>) -> Response {
    if let Some(failure) = state.take_failure() {
        return failure;
    }
    Json(state.lock().cart.clone()).into_response()
}

#[derive(Deserialize)]
struct UpdateQuery {
    #[serde(rename = "type")]
    action: CartAction,
}

async fn update_cart(
    State(state): State<MockState>,
    Query(query): Query<UpdateQuery>,
    Json(product): Json<Value>,
) -> Response {
    if let Some(failure) = state.take_failure() {
        return failure;
    }

    let (cart, delay) = {
        let mut inner = state.lock();
        let position = inner.cart.iter().position(|p| same_id(p, &product));

        match (query.action, position) {
            (CartAction::Increment, Some(i)) => {
                if let Some(line) = inner.cart.get_mut(i) {
                    line["qty"] = json!(line_qty(line) + 1);
                }
            }
            (CartAction::Increment, None) => {
                let mut line = product;
                line["qty"] = json!(1);
                inner.cart.push(line);
            }
            (CartAction::Decrement, Some(i)) => {
                let qty = inner.cart.get(i).map_or(0, line_qty);
                if qty <= 1 {
                    inner.cart.remove(i);
                } else if let Some(line) = inner.cart.get_mut(i) {
                    line["qty"] = json!(qty - 1);
                }
            }
            // Decrementing a product that is not in the cart is a no-op
            (CartAction::Decrement, None) => {}
        }

        inner.updates += 1;
        (inner.cart.clone(), inner.put_delays.pop_front())
    };

    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    Json(cart).into_response()
}

async fn checkout(State(state): State<MockState>, Json(body): Json<Value>) -> Response {
    if let Some(failure) = state.take_failure() {
        return failure;
    }

    let mut inner = state.lock();
    inner.checkouts.push(body);
    inner.cart.clear();
    Json(Vec::<Value>::new()).into_response()
}
