//! Delivery receipt, line item and payment handlers.
//!
//! Line-item and payment mutations are the only entry points that trigger
//! re-derivation of the parent receipt's total, collected amount and status.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;
use uuid::Uuid;

use crate::dtos::{
    AddLineItemRequest, CreateReceiptRequest, LineItemWithReceipt, PaymentWithReceipt,
    ReceiptListQuery, RecordPaymentRequest, UpdateLineItemRequest, UpdateReceiptRequest,
};
use crate::models::{ListReceiptsFilter, Receipt, ReceiptDocument};
use crate::startup::AppState;

pub async fn create_receipt(
    State(state): State<AppState>,
    Json(payload): Json<CreateReceiptRequest>,
) -> Result<(StatusCode, Json<Receipt>), AppError> {
    let receipt = state.db.create_receipt(&payload.into()).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// Full document: receipt with line items and payments, for rendering.
pub async fn get_receipt(
    State(state): State<AppState>,
    Path(receipt_id): Path<Uuid>,
) -> Result<Json<ReceiptDocument>, AppError> {
    let document = state
        .db
        .get_receipt_document(receipt_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Receipt not found")))?;
    Ok(Json(document))
}

pub async fn list_receipts(
    State(state): State<AppState>,
    Query(query): Query<ReceiptListQuery>,
) -> Result<Json<Vec<Receipt>>, AppError> {
    let filter = ListReceiptsFilter {
        start_date: query.start_date,
        end_date: query.end_date,
        year: query.year,
        status: query.status,
        client_id: query.client_id,
    };
    Ok(Json(state.db.list_receipts(&filter).await?))
}

/// Header-field edits; derived fields and the number stay untouched.
pub async fn update_receipt(
    State(state): State<AppState>,
    Path(receipt_id): Path<Uuid>,
    Json(payload): Json<UpdateReceiptRequest>,
) -> Result<Json<Receipt>, AppError> {
    let receipt = state
        .db
        .update_receipt(receipt_id, &payload.into())
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Receipt not found")))?;
    Ok(Json(receipt))
}

pub async fn delete_receipt(
    State(state): State<AppState>,
    Path(receipt_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.db.delete_receipt(receipt_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(anyhow::anyhow!("Receipt not found")))
    }
}

// --- Line items ---

pub async fn add_line_item(
    State(state): State<AppState>,
    Path(receipt_id): Path<Uuid>,
    Json(payload): Json<AddLineItemRequest>,
) -> Result<(StatusCode, Json<LineItemWithReceipt>), AppError> {
    let (line_item, receipt) = state.db.add_line_item(receipt_id, &payload.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(LineItemWithReceipt { line_item, receipt }),
    ))
}

pub async fn update_line_item(
    State(state): State<AppState>,
    Path(line_item_id): Path<Uuid>,
    Json(payload): Json<UpdateLineItemRequest>,
) -> Result<Json<LineItemWithReceipt>, AppError> {
    let (line_item, receipt) = state
        .db
        .update_line_item(line_item_id, &payload.into())
        .await?;
    Ok(Json(LineItemWithReceipt { line_item, receipt }))
}

pub async fn delete_line_item(
    State(state): State<AppState>,
    Path(line_item_id): Path<Uuid>,
) -> Result<Json<Receipt>, AppError> {
    let receipt = state.db.delete_line_item(line_item_id).await?;
    Ok(Json(receipt))
}

// --- Payments ---

pub async fn record_payment(
    State(state): State<AppState>,
    Path(receipt_id): Path<Uuid>,
    Json(payload): Json<RecordPaymentRequest>,
) -> Result<(StatusCode, Json<PaymentWithReceipt>), AppError> {
    let (payment, receipt) = state.db.add_payment(receipt_id, &payload.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(PaymentWithReceipt { payment, receipt }),
    ))
}

pub async fn remove_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<Uuid>,
) -> Result<Json<Receipt>, AppError> {
    let receipt = state.db.remove_payment(payment_id).await?;
    Ok(Json(receipt))
}
