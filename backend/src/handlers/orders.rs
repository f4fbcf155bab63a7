//! HTTP handlers for order management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use shared::Order;

use crate::error::AppResult;
use crate::services::order::{CreateOrderInput, OrderFilter, StatusUpdateInput};
use crate::AppState;

/// List orders with optional filters
pub async fn list_orders(
    State(state): State<AppState>,
    Query(filter): Query<OrderFilter>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = state.orders.list_orders(&filter)?;
    Ok(Json(orders))
}

/// Get a single order
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<Order>> {
    let order = state.orders.get_order(order_id)?;
    Ok(Json(order))
}

/// Create an order (reservations applied all-or-nothing)
pub async fn create_order(
    State(state): State<AppState>,
    Json(input): Json<CreateOrderInput>,
) -> AppResult<(StatusCode, Json<Order>)> {
    let order = state.orders.create_order(input).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// Update an order's status
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(input): Json<StatusUpdateInput>,
) -> AppResult<Json<Order>> {
    let order = state.orders.update_status(order_id, input.status).await?;
    Ok(Json(order))
}

/// Cancel an order (idempotent)
pub async fn cancel_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.orders.cancel(order_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
