//! Customer order models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::OrderStatus;

/// A customer order for trays out of specific inventory batches.
///
/// While the order is not cancelled, the sum of its line quantities has
/// already been debited from the referenced batches. Cancellation reverses
/// those debits exactly once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub customer_name: String,
    pub customer_contact: Option<String>,
    pub order_date: DateTime<Utc>,
    pub pickup_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub items: Vec<OrderLine>,
    pub total_price: Decimal,
}

/// One line of an order, reserving `quantity` trays from a single batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: Uuid,
    pub order_id: Uuid,
    pub batch_id: Uuid,
    /// Denormalized variety name, checked against the batch on creation.
    pub variety: String,
    pub quantity: i64,
    pub price_per_tray: Option<Decimal>,
}

impl Order {
    /// Total trays across all lines.
    pub fn total_trays(&self) -> i64 {
        self.items.iter().map(|line| line.quantity).sum()
    }
}
