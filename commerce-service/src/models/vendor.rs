//! Vendor model for commerce-service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Vendor category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VendorKind {
    Supply,
    Services,
    Bank,
    Other,
}

impl VendorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VendorKind::Supply => "SUPPLY",
            VendorKind::Services => "SERVICES",
            VendorKind::Bank => "BANK",
            VendorKind::Other => "OTHER",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "SERVICES" => VendorKind::Services,
            "BANK" => VendorKind::Bank,
            "OTHER" => VendorKind::Other,
            _ => VendorKind::Supply,
        }
    }
}

/// Vendor / supplier record.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vendor {
    pub vendor_id: Uuid,
    pub name: String,
    pub kind: String,
    pub tax_id: Option<String>,
    pub phone: Option<String>,
    pub created_utc: DateTime<Utc>,
}

/// Input for creating a vendor.
#[derive(Debug, Clone)]
pub struct CreateVendor {
    pub name: String,
    pub kind: VendorKind,
    pub tax_id: Option<String>,
    pub phone: Option<String>,
}

/// Input for updating a vendor.
#[derive(Debug, Clone, Default)]
pub struct UpdateVendor {
    pub name: Option<String>,
    pub kind: Option<VendorKind>,
    pub tax_id: Option<String>,
    pub phone: Option<String>,
}
