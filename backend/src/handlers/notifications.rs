//! HTTP handlers for notification endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use shared::Notification;

use crate::error::AppResult;
use crate::services::notification::CreateNotificationInput;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct NotificationQuery {
    pub unread: Option<bool>,
}

/// List notifications, optionally only unread ones
pub async fn get_notifications(
    State(state): State<AppState>,
    Query(query): Query<NotificationQuery>,
) -> AppResult<Json<Vec<Notification>>> {
    let notifications = state.notifications.list(query.unread.unwrap_or(false))?;
    Ok(Json(notifications))
}

/// Create a notification (alerts are also emailed)
pub async fn create_notification(
    State(state): State<AppState>,
    Json(input): Json<CreateNotificationInput>,
) -> AppResult<(StatusCode, Json<Notification>)> {
    let notification = state.notifications.create(input).await?;
    Ok((StatusCode::CREATED, Json(notification)))
}

/// Mark a notification as read
pub async fn mark_notification_read(
    State(state): State<AppState>,
    Path(notification_id): Path<Uuid>,
) -> AppResult<Json<Notification>> {
    let notification = state.notifications.mark_read(notification_id)?;
    Ok(Json(notification))
}
