//! Payment recording and status re-derivation tests.

mod common;

use common::{decimal_field, TestApp};
use rust_decimal::Decimal;

async fn receipt_with_total(app: &TestApp, total_quantity: i32) -> String {
    let client_id = app.create_client_record("Payment Client").await;
    let product_id = app.create_product_record("Cargo Box", "10.00", 100).await;
    let receipt = app.create_receipt_record(client_id).await;
    let receipt_id = receipt["receipt_id"]
        .as_str()
        .expect("Missing receipt_id")
        .to_string();
    app.add_line_item_record(&receipt_id, product_id, total_quantity)
        .await;
    receipt_id
}

#[tokio::test]
async fn partial_payment_sets_partial_status() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };
    let receipt_id = receipt_with_total(&app, 10).await; // total 100.00

    let body = app.record_payment_record(&receipt_id, "40.00").await;

    assert_eq!(body["receipt"]["status"], "PARTIAL");
    assert_eq!(
        decimal_field(&body["receipt"], "collected"),
        Decimal::from(40)
    );

    app.cleanup().await;
}

#[tokio::test]
async fn full_payment_sets_paid_status() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };
    let receipt_id = receipt_with_total(&app, 10).await;

    app.record_payment_record(&receipt_id, "60.00").await;
    let body = app.record_payment_record(&receipt_id, "40.00").await;

    assert_eq!(body["receipt"]["status"], "PAID");
    assert_eq!(
        decimal_field(&body["receipt"], "collected"),
        Decimal::from(100)
    );

    app.cleanup().await;
}

#[tokio::test]
async fn overpayment_still_reads_paid() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };
    let receipt_id = receipt_with_total(&app, 10).await;

    let body = app.record_payment_record(&receipt_id, "120.00").await;

    assert_eq!(body["receipt"]["status"], "PAID");

    app.cleanup().await;
}

#[tokio::test]
async fn removing_a_payment_rederives_status() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };
    let receipt_id = receipt_with_total(&app, 10).await;

    let body = app.record_payment_record(&receipt_id, "100.00").await;
    assert_eq!(body["receipt"]["status"], "PAID");
    let payment_id = body["payment"]["payment_id"]
        .as_str()
        .expect("Missing payment_id");

    let response = reqwest::Client::new()
        .delete(format!("{}/payments/{}", app.address, payment_id))
        .send()
        .await
        .expect("Failed to remove payment");
    assert_eq!(response.status(), 200);
    let receipt: serde_json::Value = response.json().await.expect("Invalid JSON");

    assert_eq!(receipt["status"], "PENDING");
    assert_eq!(decimal_field(&receipt, "collected"), Decimal::ZERO);

    app.cleanup().await;
}

#[tokio::test]
async fn non_positive_amount_is_rejected() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };
    let receipt_id = receipt_with_total(&app, 1).await;

    let http = reqwest::Client::new();
    for amount in ["0.00", "-5.00"] {
        let response = http
            .post(format!("{}/receipts/{}/payments", app.address, receipt_id))
            .json(&serde_json::json!({ "amount": amount }))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), 400, "amount {} was accepted", amount);
    }

    app.cleanup().await;
}

#[tokio::test]
async fn payment_on_unknown_receipt_returns_not_found() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };

    let response = reqwest::Client::new()
        .post(format!(
            "{}/receipts/99999999-9999-9999-9999-999999999999/payments",
            app.address
        ))
        .json(&serde_json::json!({ "amount": "10.00" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);

    app.cleanup().await;
}

#[tokio::test]
async fn remove_unknown_payment_returns_not_found() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };

    let response = reqwest::Client::new()
        .delete(format!(
            "{}/payments/99999999-9999-9999-9999-999999999999",
            app.address
        ))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);

    app.cleanup().await;
}
