//! Entity registry for commerce-service.
//!
//! Built once at process start; maps each entity kind to its display label
//! and report column labels. The report endpoints read column labels from
//! here so that the external exporter renders consistent headers.

use once_cell::sync::Lazy;
use serde::Serialize;

/// Display and query configuration for one entity type.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct EntityDescriptor {
    pub kind: &'static str,
    pub display_name: &'static str,
    pub report_columns: &'static [&'static str],
}

static REGISTRY: Lazy<Vec<EntityDescriptor>> = Lazy::new(|| {
    vec![
        EntityDescriptor {
            kind: "product",
            display_name: "Products",
            report_columns: &["Name", "Unit Price", "Stock"],
        },
        EntityDescriptor {
            kind: "client",
            display_name: "Clients",
            report_columns: &["Contact", "Company", "Phone", "City"],
        },
        EntityDescriptor {
            kind: "staff",
            display_name: "Staff",
            report_columns: &["Name", "Phone", "Hourly Rate"],
        },
        EntityDescriptor {
            kind: "receipt",
            display_name: "Delivery Receipts",
            report_columns: &["Date", "Receipt No.", "Client", "Status", "Total"],
        },
        EntityDescriptor {
            kind: "vendor",
            display_name: "Vendors",
            report_columns: &["Name", "Kind", "Tax ID", "Phone"],
        },
        EntityDescriptor {
            kind: "expense",
            display_name: "Expenses",
            report_columns: &["Date", "Vendor", "Description", "Category", "Status", "Amount"],
        },
        EntityDescriptor {
            kind: "attendance",
            display_name: "Attendance",
            report_columns: &["Staff", "Date", "Clock In", "Clock Out", "Hours"],
        },
    ]
});

/// All registered entity descriptors.
pub fn registry() -> &'static [EntityDescriptor] {
    &REGISTRY
}

/// Look up one entity descriptor by kind.
pub fn descriptor(kind: &str) -> Option<&'static EntityDescriptor> {
    REGISTRY.iter().find(|d| d.kind == kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_entities_are_registered() {
        let receipt = descriptor("receipt").expect("receipt descriptor");
        assert_eq!(
            receipt.report_columns,
            &["Date", "Receipt No.", "Client", "Status", "Total"]
        );

        let expense = descriptor("expense").expect("expense descriptor");
        assert_eq!(expense.report_columns.len(), 6);
    }

    #[test]
    fn unknown_kind_is_absent() {
        assert!(descriptor("invoice").is_none());
    }
}
