//! Line item model for commerce-service.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Line item on a delivery receipt. The applied price is frozen at creation
/// time; later catalog price changes do not affect it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LineItem {
    pub line_item_id: Uuid,
    pub receipt_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub applied_price: Decimal,
    pub created_utc: DateTime<Utc>,
}

impl LineItem {
    /// Line total: quantity times the frozen price.
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity) * self.applied_price
    }
}

/// Input for creating a line item.
#[derive(Debug, Clone)]
pub struct CreateLineItem {
    pub product_id: Uuid,
    pub quantity: i32,
    /// When absent the product's current unit price is captured.
    pub price_override: Option<Decimal>,
}

/// Input for updating a line item. Stock is never re-adjusted on edit.
#[derive(Debug, Clone, Default)]
pub struct UpdateLineItem {
    pub quantity: Option<i32>,
    pub applied_price: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_total_multiplies_quantity_by_frozen_price() {
        let item = LineItem {
            line_item_id: Uuid::new_v4(),
            receipt_id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            quantity: 5,
            applied_price: "12.50".parse().unwrap(),
            created_utc: Utc::now(),
        };
        assert_eq!(item.line_total(), "62.50".parse::<Decimal>().unwrap());
    }
}
