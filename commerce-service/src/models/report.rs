//! Read-side reporting models for commerce-service.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use crate::models::{Product, Receipt};

/// Dashboard summary over a date range.
///
/// `outstanding` is a global figure across all unpaid receipts and is not
/// restricted to the selected period.
#[derive(Debug, Clone, Serialize)]
pub struct PeriodSummary {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_sales: Decimal,
    pub total_collected: Decimal,
    pub total_expenses: Decimal,
    pub net_profit: Decimal,
    pub outstanding: Decimal,
    pub low_stock: Vec<Product>,
    pub recent_receipts: Vec<Receipt>,
}

/// One receipt row of the movement report.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ReceiptReportRow {
    pub issue_date: NaiveDate,
    pub receipt_number: String,
    pub client_name: String,
    pub status: String,
    pub total_sale: Decimal,
}

/// One expense row of the movement report.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ExpenseReportRow {
    pub issue_date: NaiveDate,
    pub vendor_name: String,
    pub description: String,
    pub category: String,
    pub status: String,
    pub amount: Decimal,
}

/// Tabular movement report for the external spreadsheet exporter. Column
/// labels come from the entity registry.
#[derive(Debug, Clone, Serialize)]
pub struct ReportRows {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub receipt_columns: Vec<&'static str>,
    pub receipts: Vec<ReceiptReportRow>,
    pub receipt_total: Decimal,
    pub expense_columns: Vec<&'static str>,
    pub expenses: Vec<ExpenseReportRow>,
    pub expense_total: Decimal,
}
