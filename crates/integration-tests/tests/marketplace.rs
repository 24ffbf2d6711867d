//! Integration tests for the marketplace.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p grow-smart-api)
//!
//! Run with: cargo test -p grow-smart-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

use grow_smart_integration_tests::TestContext;

/// Fresh random email per test run so tests don't collide.
fn test_email(role: &str) -> String {
    format!("it-{role}-{}@growsmart.test", Uuid::new_v4().simple())
}

/// Create a listing through the API and return its ID.
async fn create_listing(ctx: &TestContext, quantity_kg: &str, price_per_kg: &str) -> i64 {
    let resp = ctx
        .client
        .post(format!("{}/api/listings", ctx.api_url))
        .json(&json!({
            "crop_name": "tomato",
            "quantity_kg": quantity_kg,
            "price_per_kg": price_per_kg,
            "district": "Pune"
        }))
        .send()
        .await
        .expect("Failed to create listing");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse listing");
    body.get("id")
        .and_then(Value::as_i64)
        .expect("listing id missing")
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_browse_listings_is_public() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .client
        .get(format!("{}/api/listings", ctx.api_url))
        .send()
        .await
        .expect("Failed to browse listings");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert!(body.get("listings").is_some_and(Value::is_array));
    assert_eq!(body.get("page_size").and_then(Value::as_i64), Some(20));
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_browse_listings_filters_pass_through() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .client
        .get(format!(
            "{}/api/listings?crop=tomato&district=Pune&max_price=50&page=1",
            ctx.api_url
        ))
        .send()
        .await
        .expect("Failed to browse listings");

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_unknown_listing_is_404() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .client
        .get(format!("{}/api/listings/999999999", ctx.api_url))
        .send()
        .await
        .expect("Failed to request listing");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_create_listing_requires_auth() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .client
        .post(format!("{}/api/listings", ctx.api_url))
        .json(&json!({
            "crop_name": "tomato",
            "quantity_kg": "100",
            "price_per_kg": "20",
            "district": "Pune"
        }))
        .send()
        .await
        .expect("Failed to send create request");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_foreign_listing_changes_are_forbidden() {
    let seller = TestContext::new().await;
    let seller_email = test_email("seller");
    seller.login(&seller_email).await;
    let listing_id = create_listing(&seller, "100", "20").await;

    let other = TestContext::new().await;
    let other_email = test_email("other");
    other.login(&other_email).await;

    // An existing listing owned by someone else is 403, not 404
    let resp = other
        .client
        .put(format!("{}/api/listings/{listing_id}", other.api_url))
        .json(&json!({ "price_per_kg": "25" }))
        .send()
        .await
        .expect("Failed to send update");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = other
        .client
        .delete(format!("{}/api/listings/{listing_id}", other.api_url))
        .send()
        .await
        .expect("Failed to send withdraw");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // An unknown listing stays 404 even when authenticated
    let resp = other
        .client
        .put(format!("{}/api/listings/999999999", other.api_url))
        .json(&json!({ "price_per_kg": "25" }))
        .send()
        .await
        .expect("Failed to send update");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    seller.cleanup_email(&seller_email).await;
    other.cleanup_email(&other_email).await;
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_order_reserves_stock_and_rejects_overdraw() {
    let seller = TestContext::new().await;
    let seller_email = test_email("seller");
    seller.login(&seller_email).await;
    let listing_id = create_listing(&seller, "100", "20").await;

    let buyer = TestContext::new().await;
    let buyer_email = test_email("buyer");
    buyer.login(&buyer_email).await;

    let resp = buyer
        .client
        .post(format!("{}/api/orders", buyer.api_url))
        .json(&json!({ "listing_id": listing_id, "quantity_kg": "40" }))
        .send()
        .await
        .expect("Failed to place order");
    assert_eq!(resp.status(), StatusCode::OK);
    let order: Value = resp.json().await.expect("Failed to parse order");
    assert_eq!(order.get("status").and_then(Value::as_str), Some("pending"));

    // The reservation is durable: remaining stock dropped by the order
    let resp = buyer
        .client
        .get(format!("{}/api/listings/{listing_id}", buyer.api_url))
        .send()
        .await
        .expect("Failed to fetch listing");
    let listing: Value = resp.json().await.expect("Failed to parse listing");
    let remaining = listing
        .get("remaining_kg")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<f64>().ok())
        .expect("remaining_kg missing");
    assert!((remaining - 60.0).abs() < f64::EPSILON);

    // More than the remaining stock is a conflict, and nothing is reserved
    let resp = buyer
        .client
        .post(format!("{}/api/orders", buyer.api_url))
        .json(&json!({ "listing_id": listing_id, "quantity_kg": "70" }))
        .send()
        .await
        .expect("Failed to place order");
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let resp = buyer
        .client
        .get(format!("{}/api/listings/{listing_id}", buyer.api_url))
        .send()
        .await
        .expect("Failed to fetch listing");
    let listing: Value = resp.json().await.expect("Failed to parse listing");
    let remaining = listing
        .get("remaining_kg")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<f64>().ok())
        .expect("remaining_kg missing");
    assert!((remaining - 60.0).abs() < f64::EPSILON);

    buyer.cleanup_email(&buyer_email).await;
    seller.cleanup_email(&seller_email).await;
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_orders_require_auth() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .client
        .get(format!("{}/api/orders", ctx.api_url))
        .send()
        .await
        .expect("Failed to list orders");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
