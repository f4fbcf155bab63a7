//! Order transaction engine tests
//!
//! Covers all-or-nothing creation (a failed line rolls back every applied
//! line), idempotent cancellation, and the status transition rules.

use rust_decimal::Decimal;
use uuid::Uuid;

use microgreen_portal_backend::error::AppError;
use microgreen_portal_backend::services::inventory::CreateBatchInput;
use microgreen_portal_backend::services::order::{CreateOrderInput, OrderFilter, OrderLineInput};
use microgreen_portal_backend::AppState;
use shared::{BatchStatus, InventoryBatch, OrderStatus};

mod common;
use common::test_state;

async fn make_batch(state: &AppState, variety: &str, tray_count: i64) -> InventoryBatch {
    state
        .inventory
        .create_batch(CreateBatchInput {
            variety: variety.to_string(),
            tray_count,
            harvest_date: None,
            weight_kg: None,
            status: BatchStatus::InStorage,
        })
        .await
        .unwrap()
}

fn line(batch: &InventoryBatch, quantity: i64, price: Option<Decimal>) -> OrderLineInput {
    OrderLineInput {
        batch_id: batch.id,
        variety: batch.variety.clone(),
        quantity,
        price_per_tray: price,
    }
}

fn order_input(items: Vec<OrderLineInput>) -> CreateOrderInput {
    CreateOrderInput {
        customer_name: "Blue Door Bistro".to_string(),
        customer_contact: Some("orders@bluedoor.example".to_string()),
        pickup_date: chrono::Utc::now() + chrono::Duration::days(3),
        items,
    }
}

#[tokio::test]
async fn order_debits_every_line() {
    let (state, _) = test_state();
    let sunflower = make_batch(&state, "Sunflower", 10).await;
    let kale = make_batch(&state, "Kale", 8).await;

    let order = state
        .orders
        .create_order(order_input(vec![
            line(&sunflower, 2, Some(Decimal::new(950, 2))),
            line(&kale, 3, Some(Decimal::new(1100, 2))),
        ]))
        .await
        .unwrap();

    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.total_trays(), 5);
    // 2 * 9.50 + 3 * 11.00
    assert_eq!(order.total_price, Decimal::new(5200, 2));

    assert_eq!(state.inventory.get_batch(sunflower.id).unwrap().tray_count, 8);
    assert_eq!(state.inventory.get_batch(kale.id).unwrap().tray_count, 5);
}

#[tokio::test]
async fn default_price_applies_when_a_line_omits_one() {
    let (state, _) = test_state();
    let batch = make_batch(&state, "Radish", 6).await;

    let order = state
        .orders
        .create_order(order_input(vec![line(&batch, 2, None)]))
        .await
        .unwrap();

    // Default price is 10.0 per tray.
    assert_eq!(order.total_price, Decimal::from(20));
    assert_eq!(order.items[0].price_per_tray, Some(Decimal::new(100, 1)));
}

#[tokio::test]
async fn rejected_order_rolls_back_applied_lines() {
    let (state, _) = test_state();
    let plenty = make_batch(&state, "Sunflower", 3).await;
    let scarce = make_batch(&state, "Kale", 1).await;

    let result = state
        .orders
        .create_order(order_input(vec![
            line(&plenty, 2, None),
            line(&scarce, 5, None),
        ]))
        .await;

    assert!(matches!(result, Err(AppError::OrderRejected { .. })));

    // First batch is back where it started, with the debit/credit pair in
    // its trail.
    assert_eq!(state.inventory.get_batch(plenty.id).unwrap().tray_count, 3);
    let logs = state.inventory.list_logs(plenty.id).unwrap();
    assert_eq!(logs.len(), 3);
    assert_eq!(logs[1].delta, -2);
    assert!(logs[1].reason.starts_with("order "));
    assert_eq!(logs[2].delta, 2);
    assert!(logs[2].reason.starts_with("reverted failed order "));

    // The failing batch was never touched.
    assert_eq!(state.inventory.get_batch(scarce.id).unwrap().tray_count, 1);
    assert_eq!(state.inventory.list_logs(scarce.id).unwrap().len(), 1);

    // And no order was persisted.
    assert!(state
        .orders
        .list_orders(&OrderFilter::default())
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn empty_order_is_rejected() {
    let (state, _) = test_state();
    let result = state.orders.create_order(order_input(vec![])).await;
    assert!(matches!(result, Err(AppError::Validation { .. })));
}

#[tokio::test]
async fn variety_mismatch_is_rejected_before_any_debit() {
    let (state, _) = test_state();
    let batch = make_batch(&state, "Sunflower", 5).await;

    let result = state
        .orders
        .create_order(order_input(vec![OrderLineInput {
            batch_id: batch.id,
            variety: "Radish".to_string(),
            quantity: 2,
            price_per_tray: None,
        }]))
        .await;

    assert!(matches!(result, Err(AppError::VarietyMismatch { .. })));
    assert_eq!(state.inventory.get_batch(batch.id).unwrap().tray_count, 5);
    assert_eq!(state.inventory.list_logs(batch.id).unwrap().len(), 1);
}

#[tokio::test]
async fn unknown_batch_is_rejected_before_any_debit() {
    let (state, _) = test_state();
    let batch = make_batch(&state, "Sunflower", 5).await;

    let phantom = InventoryBatch {
        id: Uuid::new_v4(),
        ..batch.clone()
    };
    let result = state
        .orders
        .create_order(order_input(vec![
            line(&batch, 2, None),
            line(&phantom, 1, None),
        ]))
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    // Upfront validation means the first line was never debited.
    assert_eq!(state.inventory.get_batch(batch.id).unwrap().tray_count, 5);
}

#[tokio::test]
async fn non_positive_quantities_are_rejected() {
    let (state, _) = test_state();
    let batch = make_batch(&state, "Kale", 5).await;

    let result = state
        .orders
        .create_order(order_input(vec![line(&batch, 0, None)]))
        .await;
    assert!(matches!(result, Err(AppError::Validation { .. })));
}

#[tokio::test]
async fn cancellation_restocks_and_is_idempotent() {
    let (state, _) = test_state();
    let batch = make_batch(&state, "Pea Shoots", 10).await;

    let order = state
        .orders
        .create_order(order_input(vec![line(&batch, 4, None)]))
        .await
        .unwrap();
    assert_eq!(state.inventory.get_batch(batch.id).unwrap().tray_count, 6);

    let cancelled = state.orders.cancel(order.id).await.unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(state.inventory.get_batch(batch.id).unwrap().tray_count, 10);
    let logs_after_first = state.inventory.list_logs(batch.id).unwrap().len();

    // Cancelling again must not credit the batch a second time.
    let again = state.orders.cancel(order.id).await.unwrap();
    assert_eq!(again.status, OrderStatus::Cancelled);
    assert_eq!(state.inventory.get_batch(batch.id).unwrap().tray_count, 10);
    assert_eq!(
        state.inventory.list_logs(batch.id).unwrap().len(),
        logs_after_first
    );
}

#[tokio::test]
async fn cancel_unknown_order_is_not_found() {
    let (state, _) = test_state();
    let result = state.orders.cancel(Uuid::new_v4()).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn completed_orders_cannot_be_cancelled() {
    let (state, _) = test_state();
    let batch = make_batch(&state, "Sunflower", 10).await;
    let order = state
        .orders
        .create_order(order_input(vec![line(&batch, 4, None)]))
        .await
        .unwrap();

    state
        .orders
        .update_status(order.id, OrderStatus::Completed)
        .await
        .unwrap();

    let result = state.orders.cancel(order.id).await;
    assert!(matches!(result, Err(AppError::InvalidStateTransition(_))));

    // The reservation stays in place.
    assert_eq!(state.inventory.get_batch(batch.id).unwrap().tray_count, 6);
}

#[tokio::test]
async fn forward_transitions_touch_no_ledger() {
    let (state, _) = test_state();
    let batch = make_batch(&state, "Broccoli", 9).await;
    let order = state
        .orders
        .create_order(order_input(vec![line(&batch, 3, None)]))
        .await
        .unwrap();

    state
        .orders
        .update_status(order.id, OrderStatus::Confirmed)
        .await
        .unwrap();
    let completed = state
        .orders
        .update_status(order.id, OrderStatus::Completed)
        .await
        .unwrap();

    assert_eq!(completed.status, OrderStatus::Completed);
    assert_eq!(state.inventory.get_batch(batch.id).unwrap().tray_count, 6);
    // Initial creation plus the one reservation.
    assert_eq!(state.inventory.list_logs(batch.id).unwrap().len(), 2);
}

#[tokio::test]
async fn list_orders_filters_by_status() {
    let (state, _) = test_state();
    let batch = make_batch(&state, "Sunflower", 20).await;

    let first = state
        .orders
        .create_order(order_input(vec![line(&batch, 2, None)]))
        .await
        .unwrap();
    state
        .orders
        .create_order(order_input(vec![line(&batch, 3, None)]))
        .await
        .unwrap();
    state.orders.cancel(first.id).await.unwrap();

    let cancelled = state
        .orders
        .list_orders(&OrderFilter {
            status: Some(OrderStatus::Cancelled),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(cancelled.len(), 1);
    assert_eq!(cancelled[0].id, first.id);

    let pending = state
        .orders
        .list_orders(&OrderFilter {
            status: Some(OrderStatus::Pending),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(pending.len(), 1);
}
