//! End-to-end tests for the order API.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The api server running (cargo run -p orderdesk-api)
//! - A directory (or stub) seeded with `george.bluth@reqres.in`
//!
//! Run with: cargo test -p orderdesk-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

use orderdesk_integration_tests::TestContext;

/// The directory user every environment seeds for these tests.
const KNOWN_EMAIL: &str = "george.bluth@reqres.in";

/// A product id nothing else has ordered yet, so runs don't collide.
fn fresh_product_id() -> String {
    format!("TV-{}", Uuid::new_v4())
}

#[tokio::test]
#[ignore = "Requires running orderdesk-api, PostgreSQL, and a directory stub"]
async fn health_endpoint_responds() {
    let ctx = TestContext::from_env();

    let resp = ctx
        .client
        .get(ctx.url("/health"))
        .send()
        .await
        .expect("Failed to call health endpoint");

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running orderdesk-api, PostgreSQL, and a directory stub"]
async fn create_duplicate_and_list_roundtrip() {
    let ctx = TestContext::from_env();
    let product_id = fresh_product_id();

    // First order for this (email, product) pair succeeds
    let resp = ctx
        .client
        .post(ctx.url("/api/orders"))
        .json(&json!({ "productId": product_id, "email": KNOWN_EMAIL }))
        .send()
        .await
        .expect("Failed to create order");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = resp.json().await.expect("Failed to read response");
    let order_id = body["orderId"].as_str().expect("orderId missing").to_owned();

    // An identical second order is rejected as a duplicate
    let resp = ctx
        .client
        .post(ctx.url("/api/orders"))
        .json(&json!({ "productId": product_id, "email": KNOWN_EMAIL }))
        .send()
        .await
        .expect("Failed to repeat order");
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let body: Value = resp.json().await.expect("Failed to read response");
    assert_eq!(body["code"], "DUPLICATE_ORDER");

    // The listing contains the order we just created
    let resp = ctx
        .client
        .get(ctx.url("/api/orders"))
        .query(&[("email", KNOWN_EMAIL)])
        .send()
        .await
        .expect("Failed to list orders");
    assert_eq!(resp.status(), StatusCode::OK);

    let orders: Vec<Value> = resp.json().await.expect("Failed to read response");
    let created = orders
        .iter()
        .find(|o| o["orderId"] == order_id.as_str())
        .expect("created order missing from listing");
    assert_eq!(created["productId"], product_id.as_str());
    assert_eq!(created["firstName"], "George");
    assert_eq!(created["lastName"], "Bluth");
}

#[tokio::test]
#[ignore = "Requires running orderdesk-api, PostgreSQL, and a directory stub"]
async fn listing_is_case_insensitive_on_email() {
    let ctx = TestContext::from_env();
    let product_id = fresh_product_id();

    let resp = ctx
        .client
        .post(ctx.url("/api/orders"))
        .json(&json!({ "productId": product_id, "email": KNOWN_EMAIL }))
        .send()
        .await
        .expect("Failed to create order");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = ctx
        .client
        .get(ctx.url("/api/orders"))
        .query(&[("email", KNOWN_EMAIL.to_uppercase())])
        .send()
        .await
        .expect("Failed to list orders");
    assert_eq!(resp.status(), StatusCode::OK);

    let orders: Vec<Value> = resp.json().await.expect("Failed to read response");
    assert!(
        orders.iter().any(|o| o["productId"] == product_id.as_str()),
        "uppercase listing should find the order"
    );
}

#[tokio::test]
#[ignore = "Requires running orderdesk-api, PostgreSQL, and a directory stub"]
async fn unknown_email_is_unprocessable() {
    let ctx = TestContext::from_env();

    let resp = ctx
        .client
        .post(ctx.url("/api/orders"))
        .json(&json!({
            "productId": fresh_product_id(),
            "email": "nobody@example.com"
        }))
        .send()
        .await
        .expect("Failed to create order");
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = resp.json().await.expect("Failed to read response");
    assert_eq!(body["code"], "EMAIL_NOT_FOUND");
}

#[tokio::test]
#[ignore = "Requires running orderdesk-api, PostgreSQL, and a directory stub"]
async fn missing_email_parameter_is_bad_request() {
    let ctx = TestContext::from_env();

    let resp = ctx
        .client
        .get(ctx.url("/api/orders"))
        .send()
        .await
        .expect("Failed to list orders");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.expect("Failed to read response");
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
#[ignore = "Requires running orderdesk-api, PostgreSQL, and a directory stub"]
async fn blank_product_id_is_bad_request() {
    let ctx = TestContext::from_env();

    let resp = ctx
        .client
        .post(ctx.url("/api/orders"))
        .json(&json!({ "productId": "", "email": KNOWN_EMAIL }))
        .send()
        .await
        .expect("Failed to create order");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.expect("Failed to read response");
    assert_eq!(body["code"], "BAD_REQUEST");
}
