//! Notification service for in-app notifications and alert emails
//!
//! Alerts raised by the inventory ledger flow through here. Everything on
//! this path is best-effort: a sink failure is logged and discarded so the
//! operation that raised the alert always stands on its own.

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use shared::{Notification, NotificationKind};

use crate::error::AppResult;
use crate::external::NotificationSink;
use crate::store::NotificationStore;

/// Notification service for managing notifications
#[derive(Clone)]
pub struct NotificationService {
    store: Arc<NotificationStore>,
    sink: Arc<dyn NotificationSink>,
}

/// Input for creating a notification
#[derive(Debug, Deserialize)]
pub struct CreateNotificationInput {
    pub message: String,
    pub kind: NotificationKind,
}

impl NotificationService {
    pub fn new(store: Arc<NotificationStore>, sink: Arc<dyn NotificationSink>) -> Self {
        Self { store, sink }
    }

    /// List notifications, optionally restricted to unread ones.
    pub fn list(&self, unread_only: bool) -> AppResult<Vec<Notification>> {
        self.store.list(unread_only)
    }

    /// Create a notification. Alerts additionally go out by email.
    pub async fn create(&self, input: CreateNotificationInput) -> AppResult<Notification> {
        let notification = Notification {
            id: Uuid::new_v4(),
            message: input.message,
            kind: input.kind,
            timestamp: Utc::now(),
            is_read: false,
        };
        self.store.push(notification.clone())?;

        if notification.kind == NotificationKind::Alert {
            self.dispatch_email(
                &format!("Alert: {}", notification.message),
                &notification.message,
            )
            .await;
        }

        Ok(notification)
    }

    /// Mark an existing notification as read.
    pub fn mark_read(&self, notification_id: Uuid) -> AppResult<Notification> {
        self.store.mark_read(notification_id)
    }

    /// Record an alert in-app and email it. Never fails: storage and sink
    /// errors are logged and swallowed.
    pub async fn publish_alert(&self, subject: &str, message: &str) {
        let notification = Notification {
            id: Uuid::new_v4(),
            message: message.to_string(),
            kind: NotificationKind::Alert,
            timestamp: Utc::now(),
            is_read: false,
        };
        if let Err(e) = self.store.push(notification) {
            tracing::warn!("failed to record in-app notification: {}", e);
        }
        self.dispatch_email(subject, message).await;
    }

    async fn dispatch_email(&self, subject: &str, body: &str) {
        if let Err(e) = self.sink.notify(subject, body).await {
            tracing::warn!("notification sink failed for '{}': {}", subject, e);
        }
    }
}
