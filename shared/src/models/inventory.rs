//! Inventory models: harvested tray batches and their adjustment log

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::BatchStatus;

/// A harvested, trackable quantity of trays of one variety.
///
/// `tray_count` is owned by the inventory ledger: every change goes through
/// the ledger's adjust operation and is mirrored by an [`AdjustmentLog`]
/// entry, so at any point `tray_count` equals the sum of the batch's logged
/// deltas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryBatch {
    pub id: Uuid,
    pub variety: String,
    pub tray_count: i64,
    pub harvest_date: DateTime<Utc>,
    pub weight_kg: Option<Decimal>,
    pub status: BatchStatus,
}

/// One signed change to a batch's tray count. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjustmentLog {
    pub id: Uuid,
    pub batch_id: Uuid,
    pub delta: i64,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
    pub actor: String,
}
