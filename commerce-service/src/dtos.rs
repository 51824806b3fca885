//! HTTP request and response DTOs for commerce-service.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Distinguishes an absent field (leave unchanged) from an explicit `null`
/// (clear the value) when deserializing `Option<Option<T>>` fields.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

use crate::models::{
    AttendanceRecord, CreateAttendance, CreateClient, CreateExpense, CreateLineItem,
    CreatePayment, CreateProduct, CreateReceipt, CreateStaff, CreateVendor, Expense,
    ExpenseCategory, ExpenseStatus, LineItem, Payment, PaymentStatus, Receipt, UpdateClient,
    UpdateExpense, UpdateLineItem, UpdateProduct, UpdateReceipt, UpdateVendor, VendorKind,
};

// -----------------------------------------------------------------------------
// Catalog
// -----------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub unit_price: Decimal,
    #[serde(default)]
    pub stock: i32,
}

impl From<CreateProductRequest> for CreateProduct {
    fn from(req: CreateProductRequest) -> Self {
        CreateProduct {
            name: req.name,
            unit_price: req.unit_price,
            stock: req.stock,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub unit_price: Option<Decimal>,
    pub stock: Option<i32>,
}

impl From<UpdateProductRequest> for UpdateProduct {
    fn from(req: UpdateProductRequest) -> Self {
        UpdateProduct {
            name: req.name,
            unit_price: req.unit_price,
            stock: req.stock,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LowStockQuery {
    pub threshold: Option<i32>,
}

// -----------------------------------------------------------------------------
// Parties
// -----------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CreateClientRequest {
    #[validate(length(min = 1, max = 150))]
    pub contact_name: String,
    pub company_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
}

impl From<CreateClientRequest> for CreateClient {
    fn from(req: CreateClientRequest) -> Self {
        CreateClient {
            contact_name: req.contact_name,
            company_name: req.company_name,
            phone: req.phone,
            address: req.address,
            city: req.city,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateClientRequest {
    pub contact_name: Option<String>,
    pub company_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
}

impl From<UpdateClientRequest> for UpdateClient {
    fn from(req: UpdateClientRequest) -> Self {
        UpdateClient {
            contact_name: req.contact_name,
            company_name: req.company_name,
            phone: req.phone,
            address: req.address,
            city: req.city,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateVendorRequest {
    #[validate(length(min = 1, max = 150))]
    pub name: String,
    #[serde(default = "default_vendor_kind")]
    pub kind: VendorKind,
    pub tax_id: Option<String>,
    pub phone: Option<String>,
}

fn default_vendor_kind() -> VendorKind {
    VendorKind::Supply
}

impl From<CreateVendorRequest> for CreateVendor {
    fn from(req: CreateVendorRequest) -> Self {
        CreateVendor {
            name: req.name,
            kind: req.kind,
            tax_id: req.tax_id,
            phone: req.phone,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateVendorRequest {
    pub name: Option<String>,
    pub kind: Option<VendorKind>,
    pub tax_id: Option<String>,
    pub phone: Option<String>,
}

impl From<UpdateVendorRequest> for UpdateVendor {
    fn from(req: UpdateVendorRequest) -> Self {
        UpdateVendor {
            name: req.name,
            kind: req.kind,
            tax_id: req.tax_id,
            phone: req.phone,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateStaffRequest {
    #[validate(length(min = 1, max = 150))]
    pub name: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub hourly_rate: Decimal,
}

impl From<CreateStaffRequest> for CreateStaff {
    fn from(req: CreateStaffRequest) -> Self {
        CreateStaff {
            name: req.name,
            phone: req.phone,
            hourly_rate: req.hourly_rate,
        }
    }
}

// -----------------------------------------------------------------------------
// Receipts, line items and payments
// -----------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CreateReceiptRequest {
    pub client_id: Uuid,
    pub staff_id: Option<Uuid>,
    pub receipt_number: Option<String>,
    pub issue_date: Option<NaiveDate>,
    #[serde(default)]
    pub delivery_address: String,
    pub notes: Option<String>,
}

impl From<CreateReceiptRequest> for CreateReceipt {
    fn from(req: CreateReceiptRequest) -> Self {
        CreateReceipt {
            client_id: req.client_id,
            staff_id: req.staff_id,
            receipt_number: req.receipt_number,
            issue_date: req.issue_date,
            delivery_address: req.delivery_address,
            notes: req.notes,
        }
    }
}

/// Header-field edits. `staff_id: null` clears the assignment; an absent
/// field leaves it unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateReceiptRequest {
    #[serde(default, deserialize_with = "double_option")]
    pub staff_id: Option<Option<Uuid>>,
    pub issue_date: Option<NaiveDate>,
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
}

impl From<UpdateReceiptRequest> for UpdateReceipt {
    fn from(req: UpdateReceiptRequest) -> Self {
        UpdateReceipt {
            staff_id: req.staff_id,
            issue_date: req.issue_date,
            delivery_address: req.delivery_address,
            notes: req.notes,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ReceiptListQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub year: Option<i32>,
    pub status: Option<PaymentStatus>,
    pub client_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct AddLineItemRequest {
    pub product_id: Uuid,
    pub quantity: i32,
    pub price_override: Option<Decimal>,
}

impl From<AddLineItemRequest> for CreateLineItem {
    fn from(req: AddLineItemRequest) -> Self {
        CreateLineItem {
            product_id: req.product_id,
            quantity: req.quantity,
            price_override: req.price_override,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateLineItemRequest {
    pub quantity: Option<i32>,
    pub applied_price: Option<Decimal>,
}

impl From<UpdateLineItemRequest> for UpdateLineItem {
    fn from(req: UpdateLineItemRequest) -> Self {
        UpdateLineItem {
            quantity: req.quantity,
            applied_price: req.applied_price,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RecordPaymentRequest {
    pub amount: Decimal,
    pub pay_date: Option<NaiveDate>,
    pub bank_reference: Option<String>,
}

impl From<RecordPaymentRequest> for CreatePayment {
    fn from(req: RecordPaymentRequest) -> Self {
        CreatePayment {
            amount: req.amount,
            pay_date: req.pay_date,
            bank_reference: req.bank_reference,
        }
    }
}

/// A mutated line item together with the re-derived parent receipt.
#[derive(Debug, Serialize)]
pub struct LineItemWithReceipt {
    pub line_item: LineItem,
    pub receipt: Receipt,
}

/// A recorded payment together with the re-derived parent receipt.
#[derive(Debug, Serialize)]
pub struct PaymentWithReceipt {
    pub payment: Payment,
    pub receipt: Receipt,
}

// -----------------------------------------------------------------------------
// Expenses
// -----------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CreateExpenseRequest {
    pub vendor_id: Uuid,
    #[validate(length(min = 1, max = 200))]
    pub description: String,
    #[serde(default = "default_expense_category")]
    pub category: ExpenseCategory,
    pub amount: Decimal,
    pub issue_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub document_ref: Option<String>,
}

fn default_expense_category() -> ExpenseCategory {
    ExpenseCategory::Supply
}

impl From<CreateExpenseRequest> for CreateExpense {
    fn from(req: CreateExpenseRequest) -> Self {
        CreateExpense {
            vendor_id: req.vendor_id,
            description: req.description,
            category: req.category,
            amount: req.amount,
            issue_date: req.issue_date,
            due_date: req.due_date,
            document_ref: req.document_ref,
        }
    }
}

/// `due_date: null` clears the due date; an absent field leaves it unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateExpenseRequest {
    pub description: Option<String>,
    pub category: Option<ExpenseCategory>,
    pub amount: Option<Decimal>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<NaiveDate>>,
    pub status: Option<ExpenseStatus>,
    pub document_ref: Option<String>,
}

impl From<UpdateExpenseRequest> for UpdateExpense {
    fn from(req: UpdateExpenseRequest) -> Self {
        UpdateExpense {
            description: req.description,
            category: req.category,
            amount: req.amount,
            due_date: req.due_date,
            status: req.status,
            document_ref: req.document_ref,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ExpenseListQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<ExpenseStatus>,
    pub vendor_id: Option<Uuid>,
}

/// Expense with its read-time overdue flag.
#[derive(Debug, Serialize)]
pub struct ExpenseResponse {
    #[serde(flatten)]
    pub expense: Expense,
    pub overdue: bool,
}

impl ExpenseResponse {
    pub fn evaluated_at(expense: Expense, today: NaiveDate) -> Self {
        let overdue = expense.is_overdue(today);
        ExpenseResponse { expense, overdue }
    }
}

// -----------------------------------------------------------------------------
// Attendance
// -----------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CreateAttendanceRequest {
    pub staff_id: Uuid,
    pub work_date: Option<NaiveDate>,
    pub clock_in: Option<NaiveTime>,
    pub clock_out: Option<NaiveTime>,
}

impl From<CreateAttendanceRequest> for CreateAttendance {
    fn from(req: CreateAttendanceRequest) -> Self {
        CreateAttendance {
            staff_id: req.staff_id,
            work_date: req.work_date,
            clock_in: req.clock_in,
            clock_out: req.clock_out,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AttendanceQuery {
    pub staff_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Attendance record with its computed worked hours.
#[derive(Debug, Serialize)]
pub struct AttendanceResponse {
    #[serde(flatten)]
    pub record: AttendanceRecord,
    pub worked_hours: f64,
}

impl From<AttendanceRecord> for AttendanceResponse {
    fn from(record: AttendanceRecord) -> Self {
        let worked_hours = record.worked_hours();
        AttendanceResponse {
            record,
            worked_hours,
        }
    }
}

// -----------------------------------------------------------------------------
// Reports
// -----------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ReportRangeQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}
