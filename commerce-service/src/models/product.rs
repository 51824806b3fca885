//! Product catalog model for commerce-service.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Catalog product. Stock is decremented by line-item creation and may go
/// negative; there is no negative-stock guard.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub product_id: Uuid,
    pub name: String,
    pub unit_price: Decimal,
    pub stock: i32,
    pub created_utc: DateTime<Utc>,
}

/// Input for creating a product.
#[derive(Debug, Clone)]
pub struct CreateProduct {
    pub name: String,
    pub unit_price: Decimal,
    pub stock: i32,
}

/// Input for updating a product (catalog edits).
#[derive(Debug, Clone, Default)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub unit_price: Option<Decimal>,
    pub stock: Option<i32>,
}
