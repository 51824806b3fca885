//! Line item tests: price freezing, stock decrement and receipt re-derivation.

mod common;

use common::{decimal_field, TestApp};
use rust_decimal::Decimal;

#[tokio::test]
async fn add_line_item_freezes_price_and_decrements_stock() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };
    let client_id = app.create_client_record("Stock Client").await;
    let product_id = app.create_product_record("Cement Bag", "15.00", 20).await;

    let receipt = app.create_receipt_record(client_id).await;
    let receipt_id = receipt["receipt_id"].as_str().expect("Missing receipt_id");

    let body = app.add_line_item_record(receipt_id, product_id, 5).await;

    assert_eq!(
        decimal_field(&body["line_item"], "applied_price"),
        "15.00".parse::<Decimal>().unwrap()
    );
    assert_eq!(
        decimal_field(&body["receipt"], "total_sale"),
        "75.00".parse::<Decimal>().unwrap()
    );
    assert_eq!(body["receipt"]["status"], "PENDING");

    let product: serde_json::Value = reqwest::Client::new()
        .get(format!("{}/products/{}", app.address, product_id))
        .send()
        .await
        .expect("Failed to get product")
        .json()
        .await
        .expect("Invalid JSON");
    assert_eq!(product["stock"].as_i64(), Some(15));

    app.cleanup().await;
}

#[tokio::test]
async fn applied_price_survives_catalog_price_change() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };
    let client_id = app.create_client_record("Freeze Client").await;
    let product_id = app.create_product_record("Lime Sack", "8.00", 40).await;

    let receipt = app.create_receipt_record(client_id).await;
    let receipt_id = receipt["receipt_id"].as_str().expect("Missing receipt_id");
    app.add_line_item_record(receipt_id, product_id, 2).await;

    // Raise the catalog price after the sale
    let http = reqwest::Client::new();
    let response = http
        .put(format!("{}/products/{}", app.address, product_id))
        .json(&serde_json::json!({ "unit_price": "9.50" }))
        .send()
        .await
        .expect("Failed to update product");
    assert_eq!(response.status(), 200);

    let document: serde_json::Value = http
        .get(format!("{}/receipts/{}", app.address, receipt_id))
        .send()
        .await
        .expect("Failed to get receipt")
        .json()
        .await
        .expect("Invalid JSON");
    assert_eq!(
        decimal_field(&document["line_items"][0], "applied_price"),
        "8.00".parse::<Decimal>().unwrap()
    );
    assert_eq!(
        decimal_field(&document, "total_sale"),
        "16.00".parse::<Decimal>().unwrap()
    );

    app.cleanup().await;
}

#[tokio::test]
async fn price_override_takes_precedence() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };
    let client_id = app.create_client_record("Override Client").await;
    let product_id = app.create_product_record("Brick", "1.20", 500).await;

    let receipt = app.create_receipt_record(client_id).await;
    let receipt_id = receipt["receipt_id"].as_str().expect("Missing receipt_id");

    let response = reqwest::Client::new()
        .post(format!("{}/receipts/{}/line-items", app.address, receipt_id))
        .json(&serde_json::json!({
            "product_id": product_id,
            "quantity": 100,
            "price_override": "1.00"
        }))
        .send()
        .await
        .expect("Failed to add line item");
    assert_eq!(response.status(), 201);
    let body: serde_json::Value = response.json().await.expect("Invalid JSON");

    assert_eq!(
        decimal_field(&body["line_item"], "applied_price"),
        Decimal::ONE
    );
    assert_eq!(
        decimal_field(&body["receipt"], "total_sale"),
        Decimal::from(100)
    );

    app.cleanup().await;
}

#[tokio::test]
async fn zero_quantity_is_rejected() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };
    let client_id = app.create_client_record("Quantity Client").await;
    let product_id = app.create_product_record("Tile", "3.00", 10).await;

    let receipt = app.create_receipt_record(client_id).await;
    let receipt_id = receipt["receipt_id"].as_str().expect("Missing receipt_id");

    let response = reqwest::Client::new()
        .post(format!("{}/receipts/{}/line-items", app.address, receipt_id))
        .json(&serde_json::json!({ "product_id": product_id, "quantity": 0 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    app.cleanup().await;
}

#[tokio::test]
async fn add_line_item_unknown_product_returns_not_found() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };
    let client_id = app.create_client_record("Unknown Product Client").await;
    let receipt = app.create_receipt_record(client_id).await;
    let receipt_id = receipt["receipt_id"].as_str().expect("Missing receipt_id");

    let response = reqwest::Client::new()
        .post(format!("{}/receipts/{}/line-items", app.address, receipt_id))
        .json(&serde_json::json!({
            "product_id": "99999999-9999-9999-9999-999999999999",
            "quantity": 1
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);

    app.cleanup().await;
}

#[tokio::test]
async fn update_line_item_rederives_without_stock_change() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };
    let client_id = app.create_client_record("Edit Client").await;
    let product_id = app.create_product_record("Sand Bag", "10.00", 30).await;

    let receipt = app.create_receipt_record(client_id).await;
    let receipt_id = receipt["receipt_id"].as_str().expect("Missing receipt_id");
    let body = app.add_line_item_record(receipt_id, product_id, 4).await;
    let line_item_id = body["line_item"]["line_item_id"]
        .as_str()
        .expect("Missing line_item_id");

    let http = reqwest::Client::new();
    let response = http
        .put(format!("{}/line-items/{}", app.address, line_item_id))
        .json(&serde_json::json!({ "quantity": 10 }))
        .send()
        .await
        .expect("Failed to update line item");
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("Invalid JSON");

    assert_eq!(
        decimal_field(&body["receipt"], "total_sale"),
        Decimal::from(100)
    );

    // Stock only moved on creation: 30 - 4
    let product: serde_json::Value = http
        .get(format!("{}/products/{}", app.address, product_id))
        .send()
        .await
        .expect("Failed to get product")
        .json()
        .await
        .expect("Invalid JSON");
    assert_eq!(product["stock"].as_i64(), Some(26));

    app.cleanup().await;
}

#[tokio::test]
async fn delete_line_item_rederives_without_restoring_stock() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };
    let client_id = app.create_client_record("Remove Client").await;
    let product_id = app.create_product_record("Gravel Bag", "6.00", 25).await;

    let receipt = app.create_receipt_record(client_id).await;
    let receipt_id = receipt["receipt_id"].as_str().expect("Missing receipt_id");
    let body = app.add_line_item_record(receipt_id, product_id, 5).await;
    let line_item_id = body["line_item"]["line_item_id"]
        .as_str()
        .expect("Missing line_item_id");

    let http = reqwest::Client::new();
    let response = http
        .delete(format!("{}/line-items/{}", app.address, line_item_id))
        .send()
        .await
        .expect("Failed to delete line item");
    assert_eq!(response.status(), 200);
    let receipt: serde_json::Value = response.json().await.expect("Invalid JSON");

    assert_eq!(decimal_field(&receipt, "total_sale"), Decimal::ZERO);
    assert_eq!(receipt["status"], "PENDING");

    let product: serde_json::Value = http
        .get(format!("{}/products/{}", app.address, product_id))
        .send()
        .await
        .expect("Failed to get product")
        .json()
        .await
        .expect("Invalid JSON");
    assert_eq!(product["stock"].as_i64(), Some(20));

    app.cleanup().await;
}
