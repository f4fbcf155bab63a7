//! HTTP handlers for inventory management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use shared::{AdjustmentLog, InventoryBatch};

use crate::error::AppResult;
use crate::services::inventory::{
    BatchFilter, CreateBatchInput, RecordAdjustmentInput, UpdateBatchInput,
};
use crate::AppState;

/// List inventory batches with optional filters
pub async fn list_batches(
    State(state): State<AppState>,
    Query(filter): Query<BatchFilter>,
) -> AppResult<Json<Vec<InventoryBatch>>> {
    let batches = state.inventory.list_batches(&filter)?;
    Ok(Json(batches))
}

/// Get a single inventory batch
pub async fn get_batch(
    State(state): State<AppState>,
    Path(batch_id): Path<Uuid>,
) -> AppResult<Json<InventoryBatch>> {
    let batch = state.inventory.get_batch(batch_id)?;
    Ok(Json(batch))
}

/// Create an inventory batch
pub async fn create_batch(
    State(state): State<AppState>,
    Json(input): Json<CreateBatchInput>,
) -> AppResult<(StatusCode, Json<InventoryBatch>)> {
    let batch = state.inventory.create_batch(input).await?;
    Ok((StatusCode::CREATED, Json(batch)))
}

/// Update a batch's descriptive fields
pub async fn update_batch(
    State(state): State<AppState>,
    Path(batch_id): Path<Uuid>,
    Json(input): Json<UpdateBatchInput>,
) -> AppResult<Json<InventoryBatch>> {
    let batch = state.inventory.update_batch(batch_id, input)?;
    Ok(Json(batch))
}

/// Remove a batch (its adjustment trail remains)
pub async fn delete_batch(
    State(state): State<AppState>,
    Path(batch_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.inventory.remove_batch(batch_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Record a manual adjustment against a batch
pub async fn record_batch_adjustment(
    State(state): State<AppState>,
    Path(batch_id): Path<Uuid>,
    Json(input): Json<RecordAdjustmentInput>,
) -> AppResult<(StatusCode, Json<AdjustmentLog>)> {
    let entry = state.inventory.record_adjustment(batch_id, input).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// Get the adjustment history for a batch
pub async fn get_batch_logs(
    State(state): State<AppState>,
    Path(batch_id): Path<Uuid>,
) -> AppResult<Json<Vec<AdjustmentLog>>> {
    let logs = state.inventory.list_logs(batch_id)?;
    Ok(Json(logs))
}
