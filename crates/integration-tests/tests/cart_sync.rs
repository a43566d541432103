//! Integration tests for cart synchronization against the mock API.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use axum::http::StatusCode;
use mobile_store_core::{CartAction, CurrencyCode};
use mobile_store_integration_tests::{MockMobileApi, sample_catalog};
use mobile_store_storefront::api::MobileApiClient;
use mobile_store_storefront::config::{ApiConfig, parse_api_url};
use mobile_store_storefront::services::CartSync;
use mobile_store_storefront::store::{CartStore, Operation, RequestState, Settled};
use rust_decimal::Decimal;

fn sync_for(api: &MockMobileApi) -> CartSync {
    let client =
        MobileApiClient::new(&ApiConfig::new(parse_api_url(&api.url()).unwrap())).unwrap();
    CartSync::new(client, CartStore::new())
}

async fn add(sync: &CartSync, id: &str) -> Settled {
    let product = sync.resolve_product(id).await.unwrap().unwrap();
    sync.update(&product, CartAction::Increment).await.unwrap()
}

#[tokio::test]
async fn test_adding_twice_totals_both_units() {
    let api = MockMobileApi::start(sample_catalog()).await;
    let sync = sync_for(&api);

    assert_eq!(add(&sync, "1").await, Settled::Applied);
    assert_eq!(add(&sync, "1").await, Settled::Applied);

    let cart = sync.store().snapshot().cart;
    assert_eq!(cart.item_count(), 2);
    assert_eq!(cart.total(), Decimal::from(50_000));
    assert_eq!(CurrencyCode::INR.format(cart.total()), "₹50,000.00");
}

#[tokio::test]
async fn test_decrement_to_zero_removes_line() {
    let api = MockMobileApi::start(sample_catalog()).await;
    let sync = sync_for(&api);
    add(&sync, "2").await;

    let line = sync.resolve_product("2").await.unwrap().unwrap();
    assert_eq!(line.qty, 1);
    sync.update(&line, CartAction::Decrement).await.unwrap();

    let cart = sync.store().snapshot().cart;
    assert_eq!(cart.lines().count(), 0);
    assert_eq!(cart.total(), Decimal::ZERO);
}

#[tokio::test]
async fn test_late_response_is_discarded() {
    let api = MockMobileApi::start(sample_catalog()).await;
    let sync = sync_for(&api);
    let galaxy = sync.resolve_product("1").await.unwrap().unwrap();

    // The first request reaches the API first but answers last
    api.delay_puts([Duration::from_millis(300)]);
    let slow = {
        let sync = sync.clone();
        let galaxy = galaxy.clone();
        tokio::spawn(async move { sync.update(&galaxy, CartAction::Increment).await })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;

    let fast = sync.update(&galaxy, CartAction::Increment).await.unwrap();
    assert_eq!(fast, Settled::Applied);
    assert_eq!(sync.store().snapshot().cart.item_count(), 2);

    let slow = slow.await.unwrap().unwrap();
    assert_eq!(slow, Settled::Stale);

    let snapshot = sync.store().snapshot();
    assert_eq!(snapshot.cart.item_count(), 2);
    assert!(!snapshot.has_pending());
}

#[tokio::test]
async fn test_failed_update_keeps_cart() {
    let api = MockMobileApi::start(sample_catalog()).await;
    let sync = sync_for(&api);
    add(&sync, "1").await;
    let before = sync.store().snapshot().cart;

    api.fail_next(StatusCode::INTERNAL_SERVER_ERROR);
    let line = sync.resolve_product("1").await.unwrap().unwrap();
    assert!(sync.update(&line, CartAction::Increment).await.is_err());

    let snapshot = sync.store().snapshot();
    assert_eq!(snapshot.cart, before);
    assert!(snapshot.request.error().is_some());
}

#[tokio::test]
async fn test_checkout_empties_cart_and_shows_notice() {
    let api = MockMobileApi::start(sample_catalog()).await;
    let sync = sync_for(&api);
    add(&sync, "1").await;
    add(&sync, "3").await;

    sync.checkout().await.unwrap();

    let snapshot = sync.store().snapshot();
    assert!(snapshot.cart.is_empty());
    assert!(matches!(
        snapshot.request,
        RequestState::Success(Operation::Checkout)
    ));
    assert!(sync.store().notice_visible());

    let submitted = api.checkouts();
    assert_eq!(submitted[0].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_failed_checkout_keeps_cart_without_notice() {
    let api = MockMobileApi::start(sample_catalog()).await;
    let sync = sync_for(&api);
    add(&sync, "1").await;

    api.fail_next(StatusCode::SERVICE_UNAVAILABLE);
    assert!(sync.checkout().await.is_err());

    assert_eq!(sync.store().snapshot().cart.item_count(), 1);
    assert!(!sync.store().notice_visible());
}

#[tokio::test]
async fn test_refresh_picks_up_server_cart() {
    let api = MockMobileApi::start(sample_catalog()).await;
    api.set_cart(vec![serde_json::json!({
        "_id": 2, "model": "iPhone 13", "company": "Apple", "price": 79900, "img": "", "qty": 3
    })]);
    let sync = sync_for(&api);

    assert_eq!(sync.refresh().await.unwrap(), Settled::Applied);
    assert_eq!(sync.store().snapshot().cart.item_count(), 3);
}
