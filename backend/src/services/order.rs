//! Order transaction engine
//!
//! Turns a proposed order into a sequence of per-line ledger reservations,
//! all-or-nothing: if any line cannot be debited, every debit already
//! applied for the order is credited back and the order is rejected.
//! Cancellation reverses an order's debits exactly once, guarded by the
//! atomic status transition.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use shared::{validate_order_quantity, Order, OrderLine, OrderStatus};

use crate::error::{AppError, AppResult};
use crate::services::inventory::SYSTEM_ACTOR;
use crate::services::InventoryService;
use crate::store::OrderStore;

/// Order service wrapping the transaction engine
#[derive(Clone)]
pub struct OrderService {
    store: Arc<OrderStore>,
    ledger: InventoryService,
    default_price_per_tray: Decimal,
}

/// Input for creating an order
#[derive(Debug, Deserialize)]
pub struct CreateOrderInput {
    pub customer_name: String,
    pub customer_contact: Option<String>,
    pub pickup_date: DateTime<Utc>,
    pub items: Vec<OrderLineInput>,
}

/// One requested order line
#[derive(Debug, Deserialize)]
pub struct OrderLineInput {
    pub batch_id: Uuid,
    pub variety: String,
    pub quantity: i64,
    pub price_per_tray: Option<Decimal>,
}

/// Input for updating an order's status
#[derive(Debug, Deserialize)]
pub struct StatusUpdateInput {
    pub status: OrderStatus,
}

/// Query filters for listing orders
#[derive(Debug, Default, Deserialize)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub pickup_start_date: Option<DateTime<Utc>>,
    pub pickup_end_date: Option<DateTime<Utc>>,
}

impl OrderService {
    pub fn new(
        store: Arc<OrderStore>,
        ledger: InventoryService,
        default_price_per_tray: Decimal,
    ) -> Self {
        Self {
            store,
            ledger,
            default_price_per_tray,
        }
    }

    /// Create an order, reserving stock line by line.
    ///
    /// Validation (non-empty order, positive quantities, variety match
    /// against the live batch) happens before any ledger activity. Once the
    /// reservation loop has started, a failed line triggers a best-effort
    /// reversal of every previously applied line and the whole operation
    /// fails with `OrderRejected` carrying the original failure.
    pub async fn create_order(&self, input: CreateOrderInput) -> AppResult<Order> {
        if input.items.is_empty() {
            return Err(AppError::validation(
                "items",
                "Order must contain at least one item",
            ));
        }

        for (i, line) in input.items.iter().enumerate() {
            validate_order_quantity(line.quantity)
                .map_err(|msg| AppError::validation(format!("items[{}].quantity", i), msg))?;

            let batch = self.ledger.get_batch(line.batch_id)?;
            if batch.variety != line.variety {
                return Err(AppError::VarietyMismatch {
                    batch_id: line.batch_id,
                    expected: batch.variety,
                    given: line.variety.clone(),
                });
            }
        }

        let order_id = Uuid::new_v4();
        let mut applied: Vec<(Uuid, i64)> = Vec::new();

        for line in &input.items {
            let reservation = self
                .ledger
                .adjust(
                    line.batch_id,
                    -line.quantity,
                    &format!("order {}", order_id),
                    SYSTEM_ACTOR,
                )
                .await;

            match reservation {
                Ok(_) => applied.push((line.batch_id, line.quantity)),
                Err(failure) => {
                    // Credit back whatever was already debited. A reversal
                    // failure is logged, not propagated: an over-credited
                    // batch beats a silently lost debit.
                    for (batch_id, quantity) in &applied {
                        if let Err(revert_err) = self
                            .ledger
                            .adjust(
                                *batch_id,
                                *quantity,
                                &format!("reverted failed order {}", order_id),
                                SYSTEM_ACTOR,
                            )
                            .await
                        {
                            tracing::error!(
                                order = %order_id,
                                batch = %batch_id,
                                "failed to revert reservation: {}",
                                revert_err
                            );
                        }
                    }
                    return Err(AppError::OrderRejected {
                        reason: failure.to_string(),
                    });
                }
            }
        }

        let items: Vec<OrderLine> = input
            .items
            .iter()
            .map(|line| OrderLine {
                id: Uuid::new_v4(),
                order_id,
                batch_id: line.batch_id,
                variety: line.variety.clone(),
                quantity: line.quantity,
                price_per_tray: Some(line.price_per_tray.unwrap_or(self.default_price_per_tray)),
            })
            .collect();

        let total_price = items
            .iter()
            .map(|line| {
                Decimal::from(line.quantity) * line.price_per_tray.unwrap_or(Decimal::ZERO)
            })
            .sum::<Decimal>()
            .round_dp(2);

        let order = Order {
            id: order_id,
            customer_name: input.customer_name,
            customer_contact: input.customer_contact,
            order_date: Utc::now(),
            pickup_date: input.pickup_date,
            status: OrderStatus::Pending,
            items,
            total_price,
        };

        self.store.insert(order.clone())?;
        tracing::info!(order = %order_id, total = %order.total_price, "order created");
        Ok(order)
    }

    pub fn get_order(&self, order_id: Uuid) -> AppResult<Order> {
        self.store.get(order_id)
    }

    pub fn list_orders(&self, filter: &OrderFilter) -> AppResult<Vec<Order>> {
        let orders = self.store.list_all()?;
        Ok(orders
            .into_iter()
            .filter(|order| {
                filter.status.map_or(true, |s| order.status == s)
                    && filter.start_date.map_or(true, |d| order.order_date >= d)
                    && filter.end_date.map_or(true, |d| order.order_date <= d)
                    && filter
                        .pickup_start_date
                        .map_or(true, |d| order.pickup_date >= d)
                    && filter
                        .pickup_end_date
                        .map_or(true, |d| order.pickup_date <= d)
            })
            .collect())
    }

    /// Move an order to a new status.
    ///
    /// The transition commits first; moving to `cancelled` from a
    /// non-cancelled status then credits every line back, best-effort. The
    /// cancellation stands even if a credit fails (the failure is logged
    /// for manual reconciliation), and a repeated cancellation is a no-op.
    /// `confirmed` and `completed` carry no ledger activity.
    pub async fn update_status(&self, order_id: Uuid, status: OrderStatus) -> AppResult<Order> {
        let (order, previous) = self.store.transition(order_id, status)?;

        if status == OrderStatus::Cancelled && previous != OrderStatus::Cancelled {
            for line in &order.items {
                if let Err(e) = self
                    .ledger
                    .adjust(
                        line.batch_id,
                        line.quantity,
                        &format!("order {} cancelled", order_id),
                        SYSTEM_ACTOR,
                    )
                    .await
                {
                    tracing::error!(
                        order = %order_id,
                        batch = %line.batch_id,
                        "failed to restock cancelled line: {}",
                        e
                    );
                }
            }
            tracing::info!(order = %order_id, "order cancelled, inventory restocked");
        }

        Ok(order)
    }

    /// Cancel an order (idempotent).
    pub async fn cancel(&self, order_id: Uuid) -> AppResult<Order> {
        self.update_status(order_id, OrderStatus::Cancelled).await
    }

    /// Rewrite an order's dates; used by the development seeder and tests
    /// to build up sales history.
    pub fn backdate(
        &self,
        order_id: Uuid,
        order_date: DateTime<Utc>,
        pickup_date: DateTime<Utc>,
    ) -> AppResult<()> {
        self.store.backdate(order_id, order_date, pickup_date)
    }
}
