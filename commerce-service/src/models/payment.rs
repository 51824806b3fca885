//! Payment model for commerce-service.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A payment applied to a delivery receipt.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Payment {
    pub payment_id: Uuid,
    pub receipt_id: Uuid,
    pub pay_date: NaiveDate,
    pub amount: Decimal,
    pub bank_reference: Option<String>,
    pub created_utc: DateTime<Utc>,
}

/// Input for recording a payment.
#[derive(Debug, Clone)]
pub struct CreatePayment {
    pub amount: Decimal,
    pub pay_date: Option<NaiveDate>,
    pub bank_reference: Option<String>,
}
