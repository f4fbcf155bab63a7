//! Production models: varieties, plantings, and harvests
//!
//! Plain status tracking with no conflicting writers; tray inventory only
//! enters the ledger once a harvest is recorded as a batch.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::PlantingStatus;

/// A crop variety in the grower's catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropVariety {
    pub id: i32,
    pub name: String,
    pub grow_cycle_days: i64,
    /// Expected yield in grams per tray.
    pub expected_yield_per_tray: Decimal,
}

/// A set of trays planted on the same date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrayPlanting {
    pub id: i32,
    pub variety_id: i32,
    pub plant_date: DateTime<Utc>,
    pub expected_harvest_date: DateTime<Utc>,
    pub status: PlantingStatus,
    pub tray_count: i64,
}

/// A recorded harvest of a planting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Harvest {
    pub id: i32,
    pub planting_id: i32,
    pub harvest_date: DateTime<Utc>,
    /// Realized yield in grams.
    pub actual_yield: Decimal,
    /// Subjective quality, 1-10.
    pub quality_score: i32,
}
