//! Domain models for commerce-service.

mod attendance;
mod client;
mod expense;
mod line_item;
mod payment;
mod product;
mod receipt;
mod report;
mod staff;
mod vendor;

pub use attendance::{worked_hours, AttendanceFilter, AttendanceRecord, CreateAttendance};
pub use client::{Client, CreateClient, UpdateClient};
pub use expense::{
    CreateExpense, Expense, ExpenseCategory, ExpenseStatus, ListExpensesFilter, UpdateExpense,
};
pub use line_item::{CreateLineItem, LineItem, UpdateLineItem};
pub use payment::{CreatePayment, Payment};
pub use product::{CreateProduct, Product, UpdateProduct};
pub use receipt::{
    format_receipt_number, next_receipt_number, CreateReceipt, ListReceiptsFilter, PaymentStatus,
    Receipt, ReceiptDocument, UpdateReceipt,
};
pub use report::{ExpenseReportRow, PeriodSummary, ReceiptReportRow, ReportRows};
pub use staff::{CreateStaff, Staff};
pub use vendor::{CreateVendor, UpdateVendor, Vendor, VendorKind};
