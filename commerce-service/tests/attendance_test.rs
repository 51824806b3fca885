//! Attendance recording integration tests.

mod common;

use chrono::Utc;
use common::TestApp;

#[tokio::test]
async fn create_attendance_computes_worked_hours() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };
    let staff_id = app.create_staff_record("Warehouse Hand").await;

    let response = reqwest::Client::new()
        .post(format!("{}/attendance", app.address))
        .json(&serde_json::json!({
            "staff_id": staff_id,
            "clock_in": "08:00:00",
            "clock_out": "16:30:00"
        }))
        .send()
        .await
        .expect("Failed to create attendance");
    assert_eq!(response.status(), 201);
    let record: serde_json::Value = response.json().await.expect("Invalid JSON");

    assert_eq!(record["worked_hours"].as_f64(), Some(8.5));
    assert_eq!(
        record["work_date"],
        serde_json::json!(Utc::now().date_naive())
    );

    app.cleanup().await;
}

#[tokio::test]
async fn open_shift_reads_zero_hours() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };
    let staff_id = app.create_staff_record("Night Guard").await;

    let response = reqwest::Client::new()
        .post(format!("{}/attendance", app.address))
        .json(&serde_json::json!({
            "staff_id": staff_id,
            "clock_in": "22:00:00"
        }))
        .send()
        .await
        .expect("Failed to create attendance");
    assert_eq!(response.status(), 201);
    let record: serde_json::Value = response.json().await.expect("Invalid JSON");

    assert_eq!(record["worked_hours"].as_f64(), Some(0.0));
    assert!(record["clock_out"].is_null());

    app.cleanup().await;
}

#[tokio::test]
async fn attendance_for_unknown_staff_returns_not_found() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };

    let response = reqwest::Client::new()
        .post(format!("{}/attendance", app.address))
        .json(&serde_json::json!({
            "staff_id": "99999999-9999-9999-9999-999999999999"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);

    app.cleanup().await;
}

#[tokio::test]
async fn list_attendance_filters_by_staff() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };
    let first = app.create_staff_record("First Clerk").await;
    let second = app.create_staff_record("Second Clerk").await;

    let http = reqwest::Client::new();
    for staff_id in [first, second] {
        let response = http
            .post(format!("{}/attendance", app.address))
            .json(&serde_json::json!({
                "staff_id": staff_id,
                "clock_in": "09:00:00",
                "clock_out": "17:00:00"
            }))
            .send()
            .await
            .expect("Failed to create attendance");
        assert_eq!(response.status(), 201);
    }

    let response = http
        .get(format!("{}/attendance?staff_id={}", app.address, first))
        .send()
        .await
        .expect("Failed to list attendance");
    let records: Vec<serde_json::Value> = response.json().await.expect("Invalid JSON");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["staff_id"], serde_json::json!(first));

    let response = http
        .get(format!("{}/attendance", app.address))
        .send()
        .await
        .expect("Failed to list attendance");
    let records: Vec<serde_json::Value> = response.json().await.expect("Invalid JSON");
    assert_eq!(records.len(), 2);

    app.cleanup().await;
}
