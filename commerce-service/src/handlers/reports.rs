//! Read-only reporting handlers. The date range defaults to month-to-date.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde_json::json;
use service_core::error::AppError;

use crate::dtos::ReportRangeQuery;
use crate::models::{PeriodSummary, ReportRows};
use crate::startup::AppState;

fn resolve_range(query: &ReportRangeQuery) -> Result<(NaiveDate, NaiveDate), AppError> {
    let today = Utc::now().date_naive();
    let month_start =
        NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap_or(today);
    let start = query.start_date.unwrap_or(month_start);
    let end = query.end_date.unwrap_or(today);
    if end < start {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "end_date precedes start_date"
        )));
    }
    Ok((start, end))
}

pub async fn summary(
    State(state): State<AppState>,
    Query(query): Query<ReportRangeQuery>,
) -> Result<Json<PeriodSummary>, AppError> {
    let (start, end) = resolve_range(&query)?;
    let summary = state
        .db
        .summarize(start, end, state.config.low_stock_threshold)
        .await?;
    Ok(Json(summary))
}

pub async fn movements(
    State(state): State<AppState>,
    Query(query): Query<ReportRangeQuery>,
) -> Result<Json<ReportRows>, AppError> {
    let (start, end) = resolve_range(&query)?;
    let rows = state.db.report_rows(start, end).await?;
    Ok(Json(rows))
}

pub async fn outstanding(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let total: Decimal = state.db.total_outstanding().await?;
    Ok(Json(json!({ "outstanding": total })))
}
