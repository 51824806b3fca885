//! Delivery receipt model for commerce-service.
//!
//! The receipt carries two derived fields, `total_sale` and `collected`,
//! which are recomputed by the service layer whenever line items or payments
//! change. Plain field edits never touch them.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::{LineItem, Payment};

/// Payment status of a receipt, derived from collected vs total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Partial,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Partial => "PARTIAL",
            PaymentStatus::Paid => "PAID",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "PARTIAL" => PaymentStatus::Partial,
            "PAID" => PaymentStatus::Paid,
            _ => PaymentStatus::Pending,
        }
    }

    /// Derive the status from the collected amount and the sale total.
    ///
    /// PAID requires a positive total; a zero-total receipt with no payments
    /// stays PENDING.
    pub fn derive(collected: Decimal, total: Decimal) -> Self {
        if collected >= total && total > Decimal::ZERO {
            PaymentStatus::Paid
        } else if collected > Decimal::ZERO {
            PaymentStatus::Partial
        } else {
            PaymentStatus::Pending
        }
    }
}

/// Format a sequence value as a 6-digit zero-padded receipt number.
///
/// The fixed width is a contract: report logic compares and sorts numbers
/// as text.
pub fn format_receipt_number(seq: i64) -> String {
    format!("{:06}", seq)
}

/// Compute the next receipt number for a year, given the current maximum
/// number in that year. A missing or non-numeric maximum restarts the
/// sequence at "000001".
pub fn next_receipt_number(current_max: Option<&str>) -> String {
    match current_max {
        Some(s) if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) => {
            match s.parse::<i64>() {
                Ok(n) => format_receipt_number(n + 1),
                Err(_) => format_receipt_number(1),
            }
        }
        _ => format_receipt_number(1),
    }
}

/// Delivery receipt.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Receipt {
    pub receipt_id: Uuid,
    pub client_id: Uuid,
    pub staff_id: Option<Uuid>,
    pub receipt_number: String,
    pub receipt_year: i32,
    pub issue_date: NaiveDate,
    pub delivery_address: String,
    pub total_sale: Decimal,
    pub status: String,
    pub collected: Decimal,
    pub notes: String,
    pub created_utc: DateTime<Utc>,
}

impl Receipt {
    /// Unpaid remainder of this receipt.
    pub fn outstanding(&self) -> Decimal {
        self.total_sale - self.collected
    }
}

/// Receipt together with its line items and payments, for document rendering.
#[derive(Debug, Clone, Serialize)]
pub struct ReceiptDocument {
    #[serde(flatten)]
    pub receipt: Receipt,
    pub line_items: Vec<LineItem>,
    pub payments: Vec<Payment>,
}

/// Filter parameters for listing receipts.
#[derive(Debug, Clone, Default)]
pub struct ListReceiptsFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub year: Option<i32>,
    pub status: Option<PaymentStatus>,
    pub client_id: Option<Uuid>,
}

/// Input for creating a receipt.
#[derive(Debug, Clone)]
pub struct CreateReceipt {
    pub client_id: Uuid,
    pub staff_id: Option<Uuid>,
    /// Explicit number; when absent one is assigned from the year sequence.
    pub receipt_number: Option<String>,
    pub issue_date: Option<NaiveDate>,
    pub delivery_address: String,
    pub notes: Option<String>,
}

/// Input for editing receipt header fields. Derived fields are not editable.
#[derive(Debug, Clone, Default)]
pub struct UpdateReceipt {
    pub staff_id: Option<Option<Uuid>>,
    pub issue_date: Option<NaiveDate>,
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
}
