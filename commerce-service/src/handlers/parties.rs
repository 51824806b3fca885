//! Client, vendor and staff handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;
use uuid::Uuid;
use validator::Validate;

use crate::dtos::{
    CreateClientRequest, CreateStaffRequest, CreateVendorRequest, UpdateClientRequest,
    UpdateVendorRequest,
};
use crate::models::{Client, Staff, Vendor};
use crate::startup::AppState;

// --- Clients ---

pub async fn create_client(
    State(state): State<AppState>,
    Json(payload): Json<CreateClientRequest>,
) -> Result<(StatusCode, Json<Client>), AppError> {
    payload.validate()?;
    let client = state.db.create_client(&payload.into()).await?;
    Ok((StatusCode::CREATED, Json(client)))
}

pub async fn list_clients(State(state): State<AppState>) -> Result<Json<Vec<Client>>, AppError> {
    Ok(Json(state.db.list_clients().await?))
}

/// Also serves the delivery-address prefill lookup.
pub async fn get_client(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
) -> Result<Json<Client>, AppError> {
    let client = state
        .db
        .get_client(client_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Client not found")))?;
    Ok(Json(client))
}

pub async fn update_client(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
    Json(payload): Json<UpdateClientRequest>,
) -> Result<Json<Client>, AppError> {
    let client = state
        .db
        .update_client(client_id, &payload.into())
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Client not found")))?;
    Ok(Json(client))
}

pub async fn delete_client(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.db.delete_client(client_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(anyhow::anyhow!("Client not found")))
    }
}

// --- Vendors ---

pub async fn create_vendor(
    State(state): State<AppState>,
    Json(payload): Json<CreateVendorRequest>,
) -> Result<(StatusCode, Json<Vendor>), AppError> {
    payload.validate()?;
    let vendor = state.db.create_vendor(&payload.into()).await?;
    Ok((StatusCode::CREATED, Json(vendor)))
}

pub async fn list_vendors(State(state): State<AppState>) -> Result<Json<Vec<Vendor>>, AppError> {
    Ok(Json(state.db.list_vendors().await?))
}

pub async fn get_vendor(
    State(state): State<AppState>,
    Path(vendor_id): Path<Uuid>,
) -> Result<Json<Vendor>, AppError> {
    let vendor = state
        .db
        .get_vendor(vendor_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Vendor not found")))?;
    Ok(Json(vendor))
}

pub async fn update_vendor(
    State(state): State<AppState>,
    Path(vendor_id): Path<Uuid>,
    Json(payload): Json<UpdateVendorRequest>,
) -> Result<Json<Vendor>, AppError> {
    let vendor = state
        .db
        .update_vendor(vendor_id, &payload.into())
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Vendor not found")))?;
    Ok(Json(vendor))
}

pub async fn delete_vendor(
    State(state): State<AppState>,
    Path(vendor_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.db.delete_vendor(vendor_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(anyhow::anyhow!("Vendor not found")))
    }
}

// --- Staff ---

pub async fn create_staff(
    State(state): State<AppState>,
    Json(payload): Json<CreateStaffRequest>,
) -> Result<(StatusCode, Json<Staff>), AppError> {
    payload.validate()?;
    let staff = state.db.create_staff(&payload.into()).await?;
    Ok((StatusCode::CREATED, Json(staff)))
}

pub async fn list_staff(State(state): State<AppState>) -> Result<Json<Vec<Staff>>, AppError> {
    Ok(Json(state.db.list_staff().await?))
}

pub async fn delete_staff(
    State(state): State<AppState>,
    Path(staff_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.db.delete_staff(staff_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(anyhow::anyhow!("Staff member not found")))
    }
}
