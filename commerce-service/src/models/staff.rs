//! Staff model for commerce-service.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Staff member. Receipts reference staff optionally; deleting a staff
/// member nulls those references and removes their attendance records.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Staff {
    pub staff_id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub hourly_rate: Decimal,
    pub created_utc: DateTime<Utc>,
}

/// Input for creating a staff member.
#[derive(Debug, Clone)]
pub struct CreateStaff {
    pub name: String,
    pub phone: Option<String>,
    pub hourly_rate: Decimal,
}
