//! Integration tests for the mobiles API client.
//!
//! Each test starts its own in-process mock API.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use axum::http::StatusCode;
use mobile_store_core::{CartAction, Product};
use mobile_store_integration_tests::{MockMobileApi, sample_catalog};
use mobile_store_storefront::api::{ApiError, MobileApiClient};
use mobile_store_storefront::config::{ApiConfig, parse_api_url};
use serde_json::json;

fn client_for(api: &MockMobileApi) -> MobileApiClient {
    MobileApiClient::new(&ApiConfig::new(parse_api_url(&api.url()).unwrap())).unwrap()
}

async fn product(client: &MobileApiClient, model: &str) -> Product {
    client
        .list_mobiles()
        .await
        .unwrap()
        .iter()
        .find(|p| p.model == model)
        .cloned()
        .unwrap()
}

#[tokio::test]
async fn test_list_mobiles_decodes_catalog() {
    let api = MockMobileApi::start(sample_catalog()).await;
    let client = client_for(&api);

    let products = client.list_mobiles().await.unwrap();

    assert_eq!(products.len(), 3);
    assert_eq!(products[0].model, "Galaxy S21");
    assert_eq!(products[0].company, "Samsung");
    assert!(products.iter().all(|p| p.qty == 0));
}

#[tokio::test]
async fn test_increment_returns_whole_cart() {
    let api = MockMobileApi::start(sample_catalog()).await;
    let client = client_for(&api);
    let galaxy = product(&client, "Galaxy S21").await;

    let cart = client
        .update_cart(&galaxy, CartAction::Increment)
        .await
        .unwrap();
    assert_eq!(cart.items().len(), 1);
    assert_eq!(cart.items()[0].qty, 1);

    let line = cart.items()[0].clone();
    let cart = client
        .update_cart(&line, CartAction::Increment)
        .await
        .unwrap();
    assert_eq!(cart.items()[0].qty, 2);
    assert_eq!(api.updates(), 2);
}

#[tokio::test]
async fn test_decrement_is_clamped_by_the_api() {
    let api = MockMobileApi::start(sample_catalog()).await;
    api.set_cart(vec![json!({
        "_id": 3, "model": "Pixel 6", "company": "Google", "price": 40000, "img": "", "qty": 1
    })]);
    let client = client_for(&api);
    let pixel = product(&client, "Pixel 6").await;

    let cart = client
        .update_cart(&pixel, CartAction::Decrement)
        .await
        .unwrap();
    assert!(cart.is_empty());

    // Product not in the cart: the API leaves the cart alone
    let cart = client
        .update_cart(&pixel, CartAction::Decrement)
        .await
        .unwrap();
    assert!(cart.is_empty());
}

#[tokio::test]
async fn test_unmodelled_fields_reach_the_api_unchanged() {
    let mut catalog = sample_catalog();
    catalog[0]["ram"] = json!("8GB");
    let api = MockMobileApi::start(catalog).await;
    let client = client_for(&api);
    let galaxy = product(&client, "Galaxy S21").await;

    client
        .update_cart(&galaxy, CartAction::Increment)
        .await
        .unwrap();

    assert_eq!(api.cart()[0]["ram"], json!("8GB"));
}

#[tokio::test]
async fn test_checkout_submits_cart_and_returns_empty() {
    let api = MockMobileApi::start(sample_catalog()).await;
    let client = client_for(&api);
    let galaxy = product(&client, "Galaxy S21").await;
    let cart = client
        .update_cart(&galaxy, CartAction::Increment)
        .await
        .unwrap();

    let after = client.checkout(&cart).await.unwrap();

    assert!(after.is_empty());
    assert!(api.cart().is_empty());
    let submitted = api.checkouts();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0][0]["model"], json!("Galaxy S21"));
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let api = MockMobileApi::start(sample_catalog()).await;
    let client = client_for(&api);

    api.fail_next(StatusCode::INTERNAL_SERVER_ERROR);
    let err = client.get_cart().await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 500, .. }));
    assert!(!err.is_rejection());

    api.fail_next(StatusCode::NOT_FOUND);
    let err = client.get_cart().await.unwrap_err();
    assert!(err.is_rejection());
}

#[tokio::test]
async fn test_catalog_is_cached_until_invalidated() {
    let api = MockMobileApi::start(sample_catalog()).await;
    let client = client_for(&api);

    client.list_mobiles().await.unwrap();
    api.fail_next(StatusCode::INTERNAL_SERVER_ERROR);

    // Served from cache; the queued failure is still pending
    assert_eq!(client.list_mobiles().await.unwrap().len(), 3);

    client.invalidate_catalog().await;
    assert!(client.list_mobiles().await.is_err());
}

#[tokio::test]
async fn test_cache_can_be_disabled() {
    let api = MockMobileApi::start(sample_catalog()).await;
    let mut config = ApiConfig::new(parse_api_url(&api.url()).unwrap());
    config.catalog_cache_ttl = Duration::ZERO;
    let client = MobileApiClient::new(&config).unwrap();

    client.list_mobiles().await.unwrap();
    api.fail_next(StatusCode::INTERNAL_SERVER_ERROR);

    assert!(client.list_mobiles().await.is_err());
}
