//! In-memory stores backing the portal services
//!
//! This is the persistence boundary: a durable backend can replace these
//! types behind the same methods without touching the services. The ledger
//! arena is the only store with a cross-entry invariant (a batch's tray
//! count equals the sum of its logged deltas), so its read-modify-write-log
//! sequence runs under a single mutex and callers never get a mutation
//! handle to a batch.

use std::collections::HashMap;
use std::sync::{Mutex, RwLock};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use shared::{
    AdjustmentLog, BatchStatus, CropVariety, Harvest, InventoryBatch, Notification, Order,
    OrderStatus, PlantingStatus, TrayPlanting,
};

use crate::error::{AppError, AppResult};

// ============================================================================
// Inventory ledger arena
// ============================================================================

#[derive(Debug, Default)]
struct LedgerInner {
    batches: HashMap<Uuid, InventoryBatch>,
    logs: Vec<AdjustmentLog>,
}

/// Authoritative tray-count balances plus the append-only adjustment log.
///
/// Not optimized for large catalogs; a small farm has tens of batches.
#[derive(Debug, Default)]
pub struct LedgerStore {
    inner: Mutex<LedgerInner>,
}

impl LedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> AppResult<std::sync::MutexGuard<'_, LedgerInner>> {
        self.inner
            .lock()
            .map_err(|_| AppError::internal("inventory ledger lock poisoned"))
    }

    fn append_log(
        inner: &mut LedgerInner,
        batch_id: Uuid,
        delta: i64,
        reason: &str,
        actor: &str,
    ) -> AdjustmentLog {
        let entry = AdjustmentLog {
            id: Uuid::new_v4(),
            batch_id,
            delta,
            reason: reason.to_string(),
            timestamp: Utc::now(),
            actor: actor.to_string(),
        };
        inner.logs.push(entry.clone());
        entry
    }

    /// Insert a new batch and log its initial count in one step, so the
    /// conservation law holds from creation onwards.
    pub fn create_batch(
        &self,
        batch: InventoryBatch,
        actor: &str,
    ) -> AppResult<(InventoryBatch, AdjustmentLog)> {
        let mut inner = self.lock()?;
        let entry = Self::append_log(
            &mut inner,
            batch.id,
            batch.tray_count,
            "initial creation",
            actor,
        );
        inner.batches.insert(batch.id, batch.clone());
        Ok((batch, entry))
    }

    /// Apply a signed delta to a batch's tray count.
    ///
    /// Fails with `NotFound` for unknown batches and `InsufficientStock`
    /// when the delta would drive the count negative; in the failure cases
    /// neither the count nor the log changes. The whole
    /// read-modify-write-log sequence happens under the ledger mutex, so
    /// concurrent adjustments on the same batch cannot lose updates.
    pub fn adjust(
        &self,
        batch_id: Uuid,
        delta: i64,
        reason: &str,
        actor: &str,
    ) -> AppResult<(InventoryBatch, AdjustmentLog)> {
        let mut inner = self.lock()?;
        let batch = inner
            .batches
            .get_mut(&batch_id)
            .ok_or_else(|| AppError::not_found(format!("Inventory batch {}", batch_id)))?;

        let new_count = batch.tray_count + delta;
        if new_count < 0 {
            return Err(AppError::InsufficientStock(format!(
                "adjustment of {} would leave batch {} at {} trays ({})",
                delta, batch_id, new_count, reason
            )));
        }

        batch.tray_count = new_count;
        let snapshot = batch.clone();
        let entry = Self::append_log(&mut inner, batch_id, delta, reason, actor);
        Ok((snapshot, entry))
    }

    /// Retire a batch: log an adjustment down to zero (reason "removed"),
    /// then drop it from the arena. Its log entries remain readable.
    pub fn remove_batch(
        &self,
        batch_id: Uuid,
        actor: &str,
    ) -> AppResult<(InventoryBatch, AdjustmentLog)> {
        let mut inner = self.lock()?;
        let batch = inner
            .batches
            .get_mut(&batch_id)
            .ok_or_else(|| AppError::not_found(format!("Inventory batch {}", batch_id)))?;

        let delta = -batch.tray_count;
        batch.tray_count = 0;
        let snapshot = batch.clone();
        let entry = Self::append_log(&mut inner, batch_id, delta, "removed", actor);
        inner.batches.remove(&batch_id);
        Ok((snapshot, entry))
    }

    pub fn get(&self, batch_id: Uuid) -> AppResult<InventoryBatch> {
        let inner = self.lock()?;
        inner
            .batches
            .get(&batch_id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Inventory batch {}", batch_id)))
    }

    pub fn list_all(&self) -> AppResult<Vec<InventoryBatch>> {
        let inner = self.lock()?;
        let mut batches: Vec<_> = inner.batches.values().cloned().collect();
        batches.sort_by_key(|b| b.harvest_date);
        Ok(batches)
    }

    /// Edit descriptive fields. Tray counts are out of bounds here; they
    /// move only through `adjust`.
    pub fn update_details(
        &self,
        batch_id: Uuid,
        variety: Option<String>,
        weight_kg: Option<Decimal>,
        status: Option<BatchStatus>,
    ) -> AppResult<InventoryBatch> {
        let mut inner = self.lock()?;
        let batch = inner
            .batches
            .get_mut(&batch_id)
            .ok_or_else(|| AppError::not_found(format!("Inventory batch {}", batch_id)))?;

        if let Some(variety) = variety {
            batch.variety = variety;
        }
        if let Some(weight) = weight_kg {
            batch.weight_kg = Some(weight);
        }
        if let Some(status) = status {
            batch.status = status;
        }
        Ok(batch.clone())
    }

    /// Adjustment history for a batch, in append order.
    ///
    /// `NotFound` only if the batch has never existed; a retired batch's
    /// trail stays readable.
    pub fn logs_for(&self, batch_id: Uuid) -> AppResult<Vec<AdjustmentLog>> {
        let inner = self.lock()?;
        let entries: Vec<_> = inner
            .logs
            .iter()
            .filter(|log| log.batch_id == batch_id)
            .cloned()
            .collect();
        if entries.is_empty() && !inner.batches.contains_key(&batch_id) {
            return Err(AppError::not_found(format!("Inventory batch {}", batch_id)));
        }
        Ok(entries)
    }
}

// ============================================================================
// Orders
// ============================================================================

/// Order book. No cross-entry invariants; per-order transitions are the only
/// guarded mutation.
#[derive(Debug, Default)]
pub struct OrderStore {
    orders: RwLock<HashMap<Uuid, Order>>,
}

impl OrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> AppResult<std::sync::RwLockReadGuard<'_, HashMap<Uuid, Order>>> {
        self.orders
            .read()
            .map_err(|_| AppError::internal("order store lock poisoned"))
    }

    fn write(&self) -> AppResult<std::sync::RwLockWriteGuard<'_, HashMap<Uuid, Order>>> {
        self.orders
            .write()
            .map_err(|_| AppError::internal("order store lock poisoned"))
    }

    pub fn insert(&self, order: Order) -> AppResult<()> {
        self.write()?.insert(order.id, order);
        Ok(())
    }

    pub fn get(&self, order_id: Uuid) -> AppResult<Order> {
        self.read()?
            .get(&order_id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Order {}", order_id)))
    }

    pub fn list_all(&self) -> AppResult<Vec<Order>> {
        let orders = self.read()?;
        let mut list: Vec<_> = orders.values().cloned().collect();
        list.sort_by_key(|o| o.order_date);
        Ok(list)
    }

    /// Atomically move an order to `to`, returning the updated order and the
    /// status it held before.
    ///
    /// A same-status update (including re-cancelling a cancelled order) is a
    /// no-op; an illegal move fails with `InvalidStateTransition` and changes
    /// nothing. Callers decide on ledger side effects from the returned
    /// previous status, so a cancellation can only ever be acted on once.
    pub fn transition(&self, order_id: Uuid, to: OrderStatus) -> AppResult<(Order, OrderStatus)> {
        let mut orders = self.write()?;
        let order = orders
            .get_mut(&order_id)
            .ok_or_else(|| AppError::not_found(format!("Order {}", order_id)))?;

        let previous = order.status;
        if previous == to {
            return Ok((order.clone(), previous));
        }
        if !previous.can_transition_to(to) {
            return Err(AppError::InvalidStateTransition(format!(
                "order {} cannot move from {} to {}",
                order_id,
                previous.as_str(),
                to.as_str()
            )));
        }

        order.status = to;
        Ok((order.clone(), previous))
    }

    /// Rewrite an order's dates. Used by the development seeder and tests to
    /// spread history across the sales lookback window.
    pub fn backdate(
        &self,
        order_id: Uuid,
        order_date: DateTime<Utc>,
        pickup_date: DateTime<Utc>,
    ) -> AppResult<()> {
        let mut orders = self.write()?;
        let order = orders
            .get_mut(&order_id)
            .ok_or_else(|| AppError::not_found(format!("Order {}", order_id)))?;
        order.order_date = order_date;
        order.pickup_date = pickup_date;
        Ok(())
    }
}

// ============================================================================
// In-app notifications
// ============================================================================

#[derive(Debug, Default)]
pub struct NotificationStore {
    notifications: RwLock<Vec<Notification>>,
}

impl NotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> AppResult<std::sync::RwLockReadGuard<'_, Vec<Notification>>> {
        self.notifications
            .read()
            .map_err(|_| AppError::internal("notification store lock poisoned"))
    }

    fn write(&self) -> AppResult<std::sync::RwLockWriteGuard<'_, Vec<Notification>>> {
        self.notifications
            .write()
            .map_err(|_| AppError::internal("notification store lock poisoned"))
    }

    pub fn push(&self, notification: Notification) -> AppResult<()> {
        self.write()?.push(notification);
        Ok(())
    }

    pub fn list(&self, unread_only: bool) -> AppResult<Vec<Notification>> {
        let notifications = self.read()?;
        Ok(notifications
            .iter()
            .filter(|n| !unread_only || !n.is_read)
            .cloned()
            .collect())
    }

    pub fn mark_read(&self, notification_id: Uuid) -> AppResult<Notification> {
        let mut notifications = self.write()?;
        let notification = notifications
            .iter_mut()
            .find(|n| n.id == notification_id)
            .ok_or_else(|| AppError::not_found(format!("Notification {}", notification_id)))?;
        notification.is_read = true;
        Ok(notification.clone())
    }
}

// ============================================================================
// Production tracking (varieties, plantings, harvests)
// ============================================================================

#[derive(Debug, Default)]
struct ProductionInner {
    varieties: Vec<CropVariety>,
    plantings: Vec<TrayPlanting>,
    harvests: Vec<Harvest>,
}

/// Simple status-field tracking with no conflicting writers.
#[derive(Debug, Default)]
pub struct ProductionStore {
    inner: RwLock<ProductionInner>,
}

impl ProductionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> AppResult<std::sync::RwLockReadGuard<'_, ProductionInner>> {
        self.inner
            .read()
            .map_err(|_| AppError::internal("production store lock poisoned"))
    }

    fn write(&self) -> AppResult<std::sync::RwLockWriteGuard<'_, ProductionInner>> {
        self.inner
            .write()
            .map_err(|_| AppError::internal("production store lock poisoned"))
    }

    pub fn set_catalog(&self, varieties: Vec<CropVariety>) -> AppResult<()> {
        self.write()?.varieties = varieties;
        Ok(())
    }

    pub fn varieties(&self) -> AppResult<Vec<CropVariety>> {
        Ok(self.read()?.varieties.clone())
    }

    pub fn find_variety(&self, variety_id: i32) -> AppResult<CropVariety> {
        self.read()?
            .varieties
            .iter()
            .find(|v| v.id == variety_id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Variety {}", variety_id)))
    }

    pub fn add_planting(&self, planting: TrayPlanting) -> AppResult<()> {
        self.write()?.plantings.push(planting);
        Ok(())
    }

    pub fn next_planting_id(&self) -> AppResult<i32> {
        let inner = self.read()?;
        Ok(inner.plantings.iter().map(|p| p.id).max().unwrap_or(0) + 1)
    }

    pub fn plantings(&self) -> AppResult<Vec<TrayPlanting>> {
        Ok(self.read()?.plantings.clone())
    }

    /// List plantings, first promoting any growing planting whose expected
    /// harvest date has arrived to `ready`.
    pub fn plantings_refreshed(&self, now: DateTime<Utc>) -> AppResult<Vec<TrayPlanting>> {
        let mut inner = self.write()?;
        for planting in inner.plantings.iter_mut() {
            if planting.status == PlantingStatus::Growing && planting.expected_harvest_date <= now {
                planting.status = PlantingStatus::Ready;
            }
        }
        Ok(inner.plantings.clone())
    }

    pub fn add_harvest(&self, harvest: Harvest) -> AppResult<()> {
        self.write()?.harvests.push(harvest);
        Ok(())
    }

    pub fn harvests(&self) -> AppResult<Vec<Harvest>> {
        Ok(self.read()?.harvests.clone())
    }
}
