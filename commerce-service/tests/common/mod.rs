#![allow(dead_code)]

use commerce_service::config::{CommerceConfig, DatabaseConfig};
use commerce_service::services::Database;
use commerce_service::startup::Application;
use service_core::config::Config as CoreConfig;
use sqlx::{Connection, Executor, PgConnection};
use std::sync::Arc;
use uuid::Uuid;

/// Parse a Decimal field from a JSON response body.
pub fn decimal_field(value: &serde_json::Value, field: &str) -> rust_decimal::Decimal {
    value[field]
        .as_str()
        .unwrap_or_else(|| panic!("{} is not a string", field))
        .parse()
        .unwrap_or_else(|_| panic!("{} is not a decimal", field))
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub db: Arc<Database>,
    maintenance_url: String,
    db_name: String,
}

impl TestApp {
    /// Spawn the service against a freshly created database.
    ///
    /// Returns `None` when TEST_DATABASE_URL is not set so the suite can run
    /// without a PostgreSQL instance.
    pub async fn spawn() -> Option<Self> {
        let maintenance_url = match std::env::var("TEST_DATABASE_URL") {
            Ok(url) => url,
            Err(_) => {
                eprintln!("TEST_DATABASE_URL not set; skipping integration test");
                return None;
            }
        };

        let db_name = format!("commerce_test_{}", Uuid::new_v4().simple());

        let mut conn = PgConnection::connect(&maintenance_url)
            .await
            .expect("Failed to connect to PostgreSQL");
        conn.execute(format!(r#"CREATE DATABASE "{}""#, db_name).as_str())
            .await
            .expect("Failed to create test database");

        let base = maintenance_url
            .rsplit_once('/')
            .map(|(base, _)| base.to_string())
            .unwrap_or_else(|| maintenance_url.clone());

        let config = CommerceConfig {
            common: CoreConfig { port: 0 },
            service_name: "commerce-service".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            log_level: "info".to_string(),
            database: DatabaseConfig {
                url: format!("{}/{}", base, db_name),
                max_connections: 5,
                min_connections: 1,
            },
            low_stock_threshold: 10,
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let db = app.db();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to accept requests
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        }

        Some(TestApp {
            address,
            port,
            db,
            maintenance_url,
            db_name,
        })
    }

    /// Drop the test database. Best effort; open pool connections are
    /// terminated by FORCE.
    pub async fn cleanup(&self) {
        if let Ok(mut conn) = PgConnection::connect(&self.maintenance_url).await {
            let _ = conn
                .execute(format!(r#"DROP DATABASE "{}" WITH (FORCE)"#, self.db_name).as_str())
                .await;
        }
    }

    pub async fn create_client_record(&self, contact_name: &str) -> Uuid {
        let response = reqwest::Client::new()
            .post(format!("{}/clients", self.address))
            .json(&serde_json::json!({ "contact_name": contact_name }))
            .send()
            .await
            .expect("Failed to create client");
        assert_eq!(response.status(), 201, "client creation failed");
        let body: serde_json::Value = response.json().await.expect("Invalid client JSON");
        body["client_id"]
            .as_str()
            .and_then(|s| Uuid::parse_str(s).ok())
            .expect("Missing client_id")
    }

    pub async fn create_product_record(&self, name: &str, unit_price: &str, stock: i32) -> Uuid {
        let response = reqwest::Client::new()
            .post(format!("{}/products", self.address))
            .json(&serde_json::json!({
                "name": name,
                "unit_price": unit_price,
                "stock": stock
            }))
            .send()
            .await
            .expect("Failed to create product");
        assert_eq!(response.status(), 201, "product creation failed");
        let body: serde_json::Value = response.json().await.expect("Invalid product JSON");
        body["product_id"]
            .as_str()
            .and_then(|s| Uuid::parse_str(s).ok())
            .expect("Missing product_id")
    }

    pub async fn create_vendor_record(&self, name: &str) -> Uuid {
        let response = reqwest::Client::new()
            .post(format!("{}/vendors", self.address))
            .json(&serde_json::json!({ "name": name }))
            .send()
            .await
            .expect("Failed to create vendor");
        assert_eq!(response.status(), 201, "vendor creation failed");
        let body: serde_json::Value = response.json().await.expect("Invalid vendor JSON");
        body["vendor_id"]
            .as_str()
            .and_then(|s| Uuid::parse_str(s).ok())
            .expect("Missing vendor_id")
    }

    pub async fn create_staff_record(&self, name: &str) -> Uuid {
        let response = reqwest::Client::new()
            .post(format!("{}/staff", self.address))
            .json(&serde_json::json!({ "name": name }))
            .send()
            .await
            .expect("Failed to create staff");
        assert_eq!(response.status(), 201, "staff creation failed");
        let body: serde_json::Value = response.json().await.expect("Invalid staff JSON");
        body["staff_id"]
            .as_str()
            .and_then(|s| Uuid::parse_str(s).ok())
            .expect("Missing staff_id")
    }

    /// Create a receipt for the given client and return the response body.
    pub async fn create_receipt_record(&self, client_id: Uuid) -> serde_json::Value {
        let response = reqwest::Client::new()
            .post(format!("{}/receipts", self.address))
            .json(&serde_json::json!({ "client_id": client_id }))
            .send()
            .await
            .expect("Failed to create receipt");
        assert_eq!(response.status(), 201, "receipt creation failed");
        response.json().await.expect("Invalid receipt JSON")
    }

    pub async fn add_line_item_record(
        &self,
        receipt_id: &str,
        product_id: Uuid,
        quantity: i32,
    ) -> serde_json::Value {
        let response = reqwest::Client::new()
            .post(format!("{}/receipts/{}/line-items", self.address, receipt_id))
            .json(&serde_json::json!({
                "product_id": product_id,
                "quantity": quantity
            }))
            .send()
            .await
            .expect("Failed to add line item");
        assert_eq!(response.status(), 201, "line item creation failed");
        response.json().await.expect("Invalid line item JSON")
    }

    pub async fn record_payment_record(
        &self,
        receipt_id: &str,
        amount: &str,
    ) -> serde_json::Value {
        let response = reqwest::Client::new()
            .post(format!("{}/receipts/{}/payments", self.address, receipt_id))
            .json(&serde_json::json!({ "amount": amount }))
            .send()
            .await
            .expect("Failed to record payment");
        assert_eq!(response.status(), 201, "payment creation failed");
        response.json().await.expect("Invalid payment JSON")
    }
}
