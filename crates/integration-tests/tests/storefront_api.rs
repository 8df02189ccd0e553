//! Integration tests for the storefront HTTP API.
//!
//! These tests require:
//! - A running `PostgreSQL` database, migrated with `delivery migrate`
//! - At least one product in the catalog
//! - The storefront server running (cargo run -p delivery-storefront)
//!
//! Run with: cargo test -p delivery-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use delivery_core::{OrderId, ProductId};
use delivery_core::order::Order;

/// Base URL for the storefront (configurable via environment).
fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

fn order_body(items: &Value) -> Value {
    json!({
        "name": "Integration Test",
        "email": "integration@example.com",
        "phone": "11988887777",
        "address": "Rua dos Testes, 42",
        "items": items,
    })
}

/// Fetch any product from the live catalog.
async fn first_product(client: &Client) -> Value {
    let products: Vec<Value> = client
        .get(format!("{}/api/products", storefront_base_url()))
        .send()
        .await
        .expect("Failed to list products")
        .json()
        .await
        .expect("Product listing is JSON");

    products
        .into_iter()
        .next()
        .expect("Catalog needs at least one product")
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_health_and_readiness() {
    let client = Client::new();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/health"))
        .send()
        .await
        .expect("Failed to reach storefront");
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));

    let resp = client
        .get(format!("{base_url}/health/ready"))
        .send()
        .await
        .expect("Failed to reach storefront");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_create_order_prices_from_catalog() {
    let client = Client::new();
    let base_url = storefront_base_url();
    let product = first_product(&client).await;
    let product_id = product["id"].as_str().expect("product id").to_string();

    // The same product twice is merged into one line
    let resp = client
        .post(format!("{base_url}/api/orders"))
        .json(&order_body(&json!([
            { "productId": product_id, "quantity": 1 },
            { "productId": product_id, "quantity": 2 },
        ])))
        .send()
        .await
        .expect("Failed to create order");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let order: Order = resp.json().await.expect("Order body");
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.item_count(), 3);
    assert_eq!(order.total, Order::compute_total(&order.items));
    assert_eq!(
        serde_json::to_value(order.items.first().map(|l| &l.product.price))
            .expect("serializable"),
        product["price"]
    );

    // The confirmation view can read it back
    let resp = client
        .get(format!("{base_url}/api/orders/{}", order.id))
        .send()
        .await
        .expect("Failed to fetch order");
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Order = resp.json().await.expect("Order body");
    assert_eq!(fetched.id, order.id);

    // Newest first
    let orders: Vec<Order> = client
        .get(format!("{base_url}/api/orders"))
        .send()
        .await
        .expect("Failed to list orders")
        .json()
        .await
        .expect("Order listing is JSON");
    assert_eq!(orders.first().map(|o| o.id), Some(order.id));
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_create_order_with_unknown_product() {
    let client = Client::new();
    let unknown = ProductId::generate();

    let resp = client
        .post(format!("{}/api/orders", storefront_base_url()))
        .json(&order_body(&json!([{ "productId": unknown, "quantity": 1 }])))
        .send()
        .await
        .expect("Failed to reach storefront");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.expect("Error body");
    assert_eq!(body["error"], format!("unknown product {unknown}"));
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_unknown_order_is_not_found() {
    let client = Client::new();
    let resp = client
        .get(format!(
            "{}/api/orders/{}",
            storefront_base_url(),
            OrderId::generate()
        ))
        .send()
        .await
        .expect("Failed to reach storefront");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_catalog_embeds_category_and_counts_products() {
    let client = Client::new();
    let base_url = storefront_base_url();
    let product = first_product(&client).await;
    assert_eq!(product["category"]["id"], product["categoryId"]);

    let categories: Vec<Value> = client
        .get(format!("{base_url}/api/categories"))
        .send()
        .await
        .expect("Failed to list categories")
        .json()
        .await
        .expect("Category listing is JSON");
    let own = categories
        .iter()
        .find(|c| c["id"] == product["categoryId"])
        .expect("Product category is listed");
    assert!(own["productCount"].as_u64().expect("productCount") >= 1);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_banners_are_ordered_by_position() {
    let client = Client::new();
    let resp = client
        .get(format!("{}/api/banners", storefront_base_url()))
        .send()
        .await
        .expect("Failed to reach storefront");
    assert_eq!(resp.status(), StatusCode::OK);

    let banners: Vec<Value> = resp.json().await.expect("Banner listing is JSON");
    let positions: Vec<i64> = banners
        .iter()
        .map(|b| b["position"].as_i64().expect("position"))
        .collect();
    assert!(positions.windows(2).all(|w| w[0] <= w[1]));
}
