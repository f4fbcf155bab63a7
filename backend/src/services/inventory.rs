//! Inventory ledger service
//!
//! Sole owner of tray-count mutation. Every change goes through [`adjust`]
//! (or the creation/removal operations that delegate to the same arena), is
//! mirrored in the append-only adjustment log, and can never drive a count
//! negative. Low-stock alerts fire from here as a side effect, after the
//! ledger write has committed.
//!
//! [`adjust`]: InventoryService::adjust

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use shared::{
    validate_tray_count, validate_variety_name, AdjustmentLog, BatchStatus, InventoryBatch,
};

use crate::error::{AppError, AppResult};
use crate::services::NotificationService;
use crate::store::LedgerStore;

/// Actor recorded on log entries when no explicit user is given.
pub const SYSTEM_ACTOR: &str = "system";

/// Inventory service enforcing the ledger contract
#[derive(Clone)]
pub struct InventoryService {
    store: Arc<LedgerStore>,
    notifications: NotificationService,
    low_stock_threshold: i64,
}

/// Input for creating an inventory batch
#[derive(Debug, Deserialize)]
pub struct CreateBatchInput {
    pub variety: String,
    pub tray_count: i64,
    pub harvest_date: Option<DateTime<Utc>>,
    pub weight_kg: Option<Decimal>,
    pub status: BatchStatus,
}

/// Input for editing a batch's descriptive fields
#[derive(Debug, Deserialize)]
pub struct UpdateBatchInput {
    pub variety: Option<String>,
    pub tray_count: Option<i64>,
    pub weight_kg: Option<Decimal>,
    pub status: Option<BatchStatus>,
}

/// Input for recording a manual adjustment against a batch
#[derive(Debug, Deserialize)]
pub struct RecordAdjustmentInput {
    pub delta: i64,
    pub reason: String,
    pub actor: Option<String>,
}

/// Query filters for listing batches
#[derive(Debug, Default, Deserialize)]
pub struct BatchFilter {
    pub variety: Option<String>,
    pub status: Option<BatchStatus>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl InventoryService {
    pub fn new(
        store: Arc<LedgerStore>,
        notifications: NotificationService,
        low_stock_threshold: i64,
    ) -> Self {
        Self {
            store,
            notifications,
            low_stock_threshold,
        }
    }

    /// Apply a signed delta to a batch and log it.
    ///
    /// On success the new count is committed and logged atomically; a
    /// low-stock alert then fires when the delta was negative and the count
    /// landed strictly below the threshold. Alert delivery is best-effort
    /// and cannot fail the adjustment.
    pub async fn adjust(
        &self,
        batch_id: Uuid,
        delta: i64,
        reason: &str,
        actor: &str,
    ) -> AppResult<(InventoryBatch, AdjustmentLog)> {
        let (batch, entry) = self.store.adjust(batch_id, delta, reason, actor)?;
        tracing::info!(
            batch = %batch_id,
            delta,
            new_count = batch.tray_count,
            reason,
            "inventory adjusted"
        );

        if delta < 0 && batch.tray_count < self.low_stock_threshold {
            self.publish_low_stock(&batch).await;
        }

        Ok((batch, entry))
    }

    /// Record an adjustment on behalf of an API caller, returning the
    /// created log entry.
    pub async fn record_adjustment(
        &self,
        batch_id: Uuid,
        input: RecordAdjustmentInput,
    ) -> AppResult<AdjustmentLog> {
        let actor = input.actor.unwrap_or_else(|| SYSTEM_ACTOR.to_string());
        let (_, entry) = self
            .adjust(batch_id, input.delta, &input.reason, &actor)
            .await?;
        Ok(entry)
    }

    pub fn get_batch(&self, batch_id: Uuid) -> AppResult<InventoryBatch> {
        self.store.get(batch_id)
    }

    pub fn list_batches(&self, filter: &BatchFilter) -> AppResult<Vec<InventoryBatch>> {
        let batches = self.store.list_all()?;
        Ok(batches
            .into_iter()
            .filter(|batch| {
                filter
                    .variety
                    .as_ref()
                    .map_or(true, |v| &batch.variety == v)
                    && filter.status.map_or(true, |s| batch.status == s)
                    && filter.start_date.map_or(true, |d| batch.harvest_date >= d)
                    && filter.end_date.map_or(true, |d| batch.harvest_date <= d)
            })
            .collect())
    }

    /// Create a batch; its initial count is itself a logged adjustment, so
    /// the conservation law holds from the first entry.
    pub async fn create_batch(&self, input: CreateBatchInput) -> AppResult<InventoryBatch> {
        validate_variety_name(&input.variety)
            .map_err(|msg| AppError::validation("variety", msg))?;
        validate_tray_count(input.tray_count)
            .map_err(|msg| AppError::validation("tray_count", msg))?;

        let batch = InventoryBatch {
            id: Uuid::new_v4(),
            variety: input.variety,
            tray_count: input.tray_count,
            harvest_date: input.harvest_date.unwrap_or_else(Utc::now),
            weight_kg: input.weight_kg,
            status: input.status,
        };

        let (batch, _) = self.store.create_batch(batch, SYSTEM_ACTOR)?;
        tracing::info!(batch = %batch.id, variety = %batch.variety, count = batch.tray_count, "batch created");
        Ok(batch)
    }

    /// Edit descriptive fields. Tray counts only move through the log:
    /// a request that tries to change `tray_count` here is rejected.
    pub fn update_batch(
        &self,
        batch_id: Uuid,
        input: UpdateBatchInput,
    ) -> AppResult<InventoryBatch> {
        if let Some(tray_count) = input.tray_count {
            let current = self.store.get(batch_id)?;
            if tray_count != current.tray_count {
                return Err(AppError::validation(
                    "tray_count",
                    "Tray count must be updated via the inventory log",
                ));
            }
        }
        if let Some(variety) = &input.variety {
            validate_variety_name(variety).map_err(|msg| AppError::validation("variety", msg))?;
        }
        self.store
            .update_details(batch_id, input.variety, input.weight_kg, input.status)
    }

    /// Retire a batch. The arena zeroes the count under its mutex and logs
    /// the final negative adjustment before dropping the batch, so the audit
    /// trail stays balanced.
    pub async fn remove_batch(&self, batch_id: Uuid) -> AppResult<()> {
        let (batch, entry) = self.store.remove_batch(batch_id, SYSTEM_ACTOR)?;
        tracing::info!(batch = %batch_id, delta = entry.delta, "batch removed");

        if entry.delta < 0 && batch.tray_count < self.low_stock_threshold {
            self.publish_low_stock(&batch).await;
        }
        Ok(())
    }

    /// Adjustment history for a batch (also available for retired batches).
    pub fn list_logs(&self, batch_id: Uuid) -> AppResult<Vec<AdjustmentLog>> {
        self.store.logs_for(batch_id)
    }

    async fn publish_low_stock(&self, batch: &InventoryBatch) {
        let message = format!(
            "Low inventory: {} down to {} trays",
            batch.variety, batch.tray_count
        );
        self.notifications
            .publish_alert(&format!("Inventory Alert: {}", batch.variety), &message)
            .await;
    }
}
