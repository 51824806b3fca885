//! Expense model for commerce-service.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Expense category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpenseCategory {
    Supply,
    Operating,
    Debt,
}

impl ExpenseCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Supply => "SUPPLY",
            ExpenseCategory::Operating => "OPERATING",
            ExpenseCategory::Debt => "DEBT",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "OPERATING" => ExpenseCategory::Operating,
            "DEBT" => ExpenseCategory::Debt,
            _ => ExpenseCategory::Supply,
        }
    }
}

/// Expense payment state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpenseStatus {
    Pending,
    Paid,
}

impl ExpenseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseStatus::Pending => "PENDING",
            ExpenseStatus::Paid => "PAID",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "PAID" => ExpenseStatus::Paid,
            _ => ExpenseStatus::Pending,
        }
    }
}

/// Vendor expense. `overdue` is evaluated at read time, never stored.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Expense {
    pub expense_id: Uuid,
    pub vendor_id: Uuid,
    pub description: String,
    pub category: String,
    pub amount: Decimal,
    pub issue_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub status: String,
    pub document_ref: Option<String>,
    pub created_utc: DateTime<Utc>,
}

impl Expense {
    /// An expense is overdue when it is still pending and its due date has
    /// passed. Expenses without a due date are never overdue.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        if ExpenseStatus::from_string(&self.status) == ExpenseStatus::Pending {
            if let Some(due) = self.due_date {
                return today > due;
            }
        }
        false
    }
}

/// Filter parameters for listing expenses.
#[derive(Debug, Clone, Default)]
pub struct ListExpensesFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<ExpenseStatus>,
    pub vendor_id: Option<Uuid>,
}

/// Input for creating an expense.
#[derive(Debug, Clone)]
pub struct CreateExpense {
    pub vendor_id: Uuid,
    pub description: String,
    pub category: ExpenseCategory,
    pub amount: Decimal,
    pub issue_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub document_ref: Option<String>,
}

/// Input for updating an expense.
#[derive(Debug, Clone, Default)]
pub struct UpdateExpense {
    pub description: Option<String>,
    pub category: Option<ExpenseCategory>,
    pub amount: Option<Decimal>,
    pub due_date: Option<Option<NaiveDate>>,
    pub status: Option<ExpenseStatus>,
    pub document_ref: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expense(status: &str, due: Option<NaiveDate>) -> Expense {
        Expense {
            expense_id: Uuid::new_v4(),
            vendor_id: Uuid::new_v4(),
            description: "Supplies".to_string(),
            category: "SUPPLY".to_string(),
            amount: "100.00".parse().unwrap(),
            issue_date: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
            due_date: due,
            status: status.to_string(),
            document_ref: None,
            created_utc: Utc::now(),
        }
    }

    #[test]
    fn pending_past_due_is_overdue() {
        let e = expense("PENDING", NaiveDate::from_ymd_opt(2025, 8, 10));
        assert!(e.is_overdue(NaiveDate::from_ymd_opt(2025, 8, 11).unwrap()));
    }

    #[test]
    fn due_day_itself_is_not_overdue() {
        let e = expense("PENDING", NaiveDate::from_ymd_opt(2025, 8, 10));
        assert!(!e.is_overdue(NaiveDate::from_ymd_opt(2025, 8, 10).unwrap()));
    }

    #[test]
    fn paid_or_undated_is_never_overdue() {
        let paid = expense("PAID", NaiveDate::from_ymd_opt(2025, 8, 10));
        assert!(!paid.is_overdue(NaiveDate::from_ymd_opt(2025, 12, 1).unwrap()));

        let undated = expense("PENDING", None);
        assert!(!undated.is_overdue(NaiveDate::from_ymd_opt(2025, 12, 1).unwrap()));
    }
}
