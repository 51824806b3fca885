//! Attendance handlers.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;

use crate::dtos::{AttendanceQuery, AttendanceResponse, CreateAttendanceRequest};
use crate::models::AttendanceFilter;
use crate::startup::AppState;

pub async fn create_attendance(
    State(state): State<AppState>,
    Json(payload): Json<CreateAttendanceRequest>,
) -> Result<(StatusCode, Json<AttendanceResponse>), AppError> {
    let record = state.db.create_attendance(&payload.into()).await?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

pub async fn list_attendance(
    State(state): State<AppState>,
    Query(query): Query<AttendanceQuery>,
) -> Result<Json<Vec<AttendanceResponse>>, AppError> {
    let filter = AttendanceFilter {
        staff_id: query.staff_id,
        start_date: query.start_date,
        end_date: query.end_date,
    };
    let records = state
        .db
        .list_attendance(&filter)
        .await?
        .into_iter()
        .map(AttendanceResponse::from)
        .collect();
    Ok(Json(records))
}
