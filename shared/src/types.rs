//! Common enums used across the portal

use serde::{Deserialize, Serialize};

/// Storage status of an inventory batch
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum BatchStatus {
    InStorage,
    Sold,
    Waste,
}

impl BatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchStatus::InStorage => "in-storage",
            BatchStatus::Sold => "sold",
            BatchStatus::Waste => "waste",
        }
    }
}

/// Lifecycle status of a customer order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Terminal statuses accept no further ledger activity for the order.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Whether an order may move from `self` to `to`.
    ///
    /// Forward-only (`pending -> confirmed -> completed`, skipping allowed);
    /// any non-terminal status may move to `cancelled`. A same-status update
    /// is treated as a no-op by the caller, not a transition.
    pub fn can_transition_to(&self, to: OrderStatus) -> bool {
        match (self, to) {
            (OrderStatus::Pending, OrderStatus::Confirmed) => true,
            (OrderStatus::Pending, OrderStatus::Completed) => true,
            (OrderStatus::Confirmed, OrderStatus::Completed) => true,
            (from, OrderStatus::Cancelled) => !from.is_terminal(),
            _ => false,
        }
    }
}

/// Growth status of a tray planting
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PlantingStatus {
    Planted,
    Growing,
    Ready,
    Harvested,
    Failed,
}

impl PlantingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlantingStatus::Planted => "planted",
            PlantingStatus::Growing => "growing",
            PlantingStatus::Ready => "ready",
            PlantingStatus::Harvested => "harvested",
            PlantingStatus::Failed => "failed",
        }
    }
}

/// Category of an in-app notification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Alert,
    Info,
}

/// Date range for queries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateRange {
    pub start: chrono::NaiveDate,
    pub end: chrono::NaiveDate,
}
