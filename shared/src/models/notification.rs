//! In-app notification model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::NotificationKind;

/// An in-app notification, shown on the portal dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub message: String,
    pub kind: NotificationKind,
    pub timestamp: DateTime<Utc>,
    pub is_read: bool,
}
