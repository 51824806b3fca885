//! Expense handlers. The overdue flag is evaluated at read time.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use service_core::error::AppError;
use uuid::Uuid;
use validator::Validate;

use crate::dtos::{CreateExpenseRequest, ExpenseListQuery, ExpenseResponse, UpdateExpenseRequest};
use crate::models::ListExpensesFilter;
use crate::startup::AppState;

pub async fn create_expense(
    State(state): State<AppState>,
    Json(payload): Json<CreateExpenseRequest>,
) -> Result<(StatusCode, Json<ExpenseResponse>), AppError> {
    payload.validate()?;
    let expense = state.db.create_expense(&payload.into()).await?;
    let today = Utc::now().date_naive();
    Ok((
        StatusCode::CREATED,
        Json(ExpenseResponse::evaluated_at(expense, today)),
    ))
}

pub async fn get_expense(
    State(state): State<AppState>,
    Path(expense_id): Path<Uuid>,
) -> Result<Json<ExpenseResponse>, AppError> {
    let expense = state
        .db
        .get_expense(expense_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Expense not found")))?;
    let today = Utc::now().date_naive();
    Ok(Json(ExpenseResponse::evaluated_at(expense, today)))
}

pub async fn list_expenses(
    State(state): State<AppState>,
    Query(query): Query<ExpenseListQuery>,
) -> Result<Json<Vec<ExpenseResponse>>, AppError> {
    let filter = ListExpensesFilter {
        start_date: query.start_date,
        end_date: query.end_date,
        status: query.status,
        vendor_id: query.vendor_id,
    };
    let today = Utc::now().date_naive();
    let expenses = state
        .db
        .list_expenses(&filter)
        .await?
        .into_iter()
        .map(|e| ExpenseResponse::evaluated_at(e, today))
        .collect();
    Ok(Json(expenses))
}

pub async fn update_expense(
    State(state): State<AppState>,
    Path(expense_id): Path<Uuid>,
    Json(payload): Json<UpdateExpenseRequest>,
) -> Result<Json<ExpenseResponse>, AppError> {
    let expense = state
        .db
        .update_expense(expense_id, &payload.into())
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Expense not found")))?;
    let today = Utc::now().date_naive();
    Ok(Json(ExpenseResponse::evaluated_at(expense, today)))
}

pub async fn delete_expense(
    State(state): State<AppState>,
    Path(expense_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.db.delete_expense(expense_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(anyhow::anyhow!("Expense not found")))
    }
}
