//! Inventory ledger tests
//!
//! Covers the ledger's guarantees:
//! - Conservation: a batch's count always equals the sum of its logged deltas
//! - Non-negativity: an overdraw fails and changes nothing
//! - Low-stock alerting: strictly below the threshold, on debits only

use chrono::Utc;
use proptest::prelude::*;
use uuid::Uuid;

use microgreen_portal_backend::error::AppError;
use microgreen_portal_backend::services::inventory::{
    BatchFilter, CreateBatchInput, RecordAdjustmentInput, UpdateBatchInput,
};
use microgreen_portal_backend::store::LedgerStore;
use shared::{BatchStatus, InventoryBatch};

mod common;
use common::test_state;

fn batch_input(variety: &str, tray_count: i64) -> CreateBatchInput {
    CreateBatchInput {
        variety: variety.to_string(),
        tray_count,
        harvest_date: None,
        weight_kg: None,
        status: BatchStatus::InStorage,
    }
}

#[tokio::test]
async fn create_batch_logs_initial_count() {
    let (state, _) = test_state();

    let batch = state
        .inventory
        .create_batch(batch_input("Sunflower", 10))
        .await
        .unwrap();

    assert_eq!(batch.tray_count, 10);
    let logs = state.inventory.list_logs(batch.id).unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].delta, 10);
    assert_eq!(logs[0].reason, "initial creation");
}

#[tokio::test]
async fn create_batch_rejects_negative_count() {
    let (state, _) = test_state();

    let result = state.inventory.create_batch(batch_input("Radish", -1)).await;
    assert!(matches!(result, Err(AppError::Validation { .. })));
}

#[tokio::test]
async fn adjust_applies_delta_and_logs() {
    let (state, _) = test_state();
    let batch = state
        .inventory
        .create_batch(batch_input("Pea Shoots", 10))
        .await
        .unwrap();

    let (updated, entry) = state
        .inventory
        .adjust(batch.id, -3, "sold at market", "jo")
        .await
        .unwrap();

    assert_eq!(updated.tray_count, 7);
    assert_eq!(entry.delta, -3);
    assert_eq!(entry.actor, "jo");

    let logs = state.inventory.list_logs(batch.id).unwrap();
    assert_eq!(logs.len(), 2);
    let total: i64 = logs.iter().map(|l| l.delta).sum();
    assert_eq!(total, updated.tray_count);
}

#[tokio::test]
async fn adjust_unknown_batch_is_not_found() {
    let (state, _) = test_state();

    let result = state
        .inventory
        .adjust(Uuid::new_v4(), 1, "no such batch", "system")
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn overdraw_fails_and_changes_nothing() {
    let (state, _) = test_state();
    let batch = state
        .inventory
        .create_batch(batch_input("Kale", 3))
        .await
        .unwrap();

    let result = state
        .inventory
        .adjust(batch.id, -5, "oversold", "system")
        .await;
    assert!(matches!(result, Err(AppError::InsufficientStock(_))));

    // State untouched: same count, no new log entry.
    assert_eq!(state.inventory.get_batch(batch.id).unwrap().tray_count, 3);
    assert_eq!(state.inventory.list_logs(batch.id).unwrap().len(), 1);
}

#[tokio::test]
async fn record_adjustment_defaults_actor_to_system() {
    let (state, _) = test_state();
    let batch = state
        .inventory
        .create_batch(batch_input("Arugula", 5))
        .await
        .unwrap();

    let entry = state
        .inventory
        .record_adjustment(
            batch.id,
            RecordAdjustmentInput {
                delta: 2,
                reason: "late trays found".to_string(),
                actor: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(entry.actor, "system");
    assert_eq!(state.inventory.get_batch(batch.id).unwrap().tray_count, 7);
}

#[tokio::test]
async fn removal_zeroes_the_batch_and_keeps_its_trail() {
    let (state, _) = test_state();
    let batch = state
        .inventory
        .create_batch(batch_input("Wheatgrass", 4))
        .await
        .unwrap();

    state.inventory.remove_batch(batch.id).await.unwrap();

    assert!(matches!(
        state.inventory.get_batch(batch.id),
        Err(AppError::NotFound(_))
    ));

    // The trail survives retirement and nets to zero.
    let logs = state.inventory.list_logs(batch.id).unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[1].reason, "removed");
    assert_eq!(logs.iter().map(|l| l.delta).sum::<i64>(), 0);
}

#[tokio::test]
async fn logs_for_unknown_batch_is_not_found() {
    let (state, _) = test_state();
    assert!(matches!(
        state.inventory.list_logs(Uuid::new_v4()),
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn tray_count_cannot_be_edited_directly() {
    let (state, _) = test_state();
    let batch = state
        .inventory
        .create_batch(batch_input("Radish", 8))
        .await
        .unwrap();

    let result = state.inventory.update_batch(
        batch.id,
        UpdateBatchInput {
            variety: None,
            tray_count: Some(12),
            weight_kg: None,
            status: None,
        },
    );
    assert!(matches!(result, Err(AppError::Validation { .. })));

    // Restating the current count alongside a status edit is fine.
    let updated = state
        .inventory
        .update_batch(
            batch.id,
            UpdateBatchInput {
                variety: None,
                tray_count: Some(8),
                weight_kg: None,
                status: Some(BatchStatus::Sold),
            },
        )
        .unwrap();
    assert_eq!(updated.status, BatchStatus::Sold);
    assert_eq!(updated.tray_count, 8);
}

#[tokio::test]
async fn list_batches_filters_by_variety_and_status() {
    let (state, _) = test_state();
    state
        .inventory
        .create_batch(batch_input("Sunflower", 5))
        .await
        .unwrap();
    let sold = state
        .inventory
        .create_batch(batch_input("Sunflower", 2))
        .await
        .unwrap();
    state
        .inventory
        .create_batch(batch_input("Kale", 7))
        .await
        .unwrap();
    state
        .inventory
        .update_batch(
            sold.id,
            UpdateBatchInput {
                variety: None,
                tray_count: None,
                weight_kg: None,
                status: Some(BatchStatus::Sold),
            },
        )
        .unwrap();

    let filter = BatchFilter {
        variety: Some("Sunflower".to_string()),
        status: Some(BatchStatus::InStorage),
        ..Default::default()
    };
    let batches = state.inventory.list_batches(&filter).unwrap();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].tray_count, 5);
}

// ============================================================================
// Low-stock alerting
// ============================================================================

#[tokio::test]
async fn low_stock_alert_fires_strictly_below_threshold() {
    // Default threshold is 5.
    let (state, sink) = test_state();
    let batch = state
        .inventory
        .create_batch(batch_input("Sunflower", 6))
        .await
        .unwrap();

    // 6 -> 5: exactly at the threshold, no alert.
    state
        .inventory
        .adjust(batch.id, -1, "sale", "system")
        .await
        .unwrap();
    assert_eq!(sink.calls(), 0);

    // 5 -> 4: strictly below, exactly one alert.
    state
        .inventory
        .adjust(batch.id, -1, "sale", "system")
        .await
        .unwrap();
    assert_eq!(sink.calls(), 1);

    let notifications = state.notifications.list(false).unwrap();
    assert_eq!(notifications.len(), 1);
    assert!(notifications[0].message.contains("down to 4 trays"));
}

#[tokio::test]
async fn positive_adjustments_never_alert() {
    let (state, sink) = test_state();
    let batch = state
        .inventory
        .create_batch(batch_input("Kale", 2))
        .await
        .unwrap();

    // Still below the threshold afterwards, but the delta is positive.
    state
        .inventory
        .adjust(batch.id, 1, "recount", "system")
        .await
        .unwrap();
    assert_eq!(sink.calls(), 0);
}

#[tokio::test]
async fn removing_a_stocked_batch_alerts() {
    let (state, sink) = test_state();
    let batch = state
        .inventory
        .create_batch(batch_input("Arugula", 3))
        .await
        .unwrap();

    state.inventory.remove_batch(batch.id).await.unwrap();
    assert_eq!(sink.calls(), 1);
}

#[tokio::test]
async fn sink_failure_does_not_fail_the_adjustment() {
    use common::FailingSink;
    use microgreen_portal_backend::{AppState, Config};
    use std::sync::Arc;

    let state = AppState::new(
        Config::default(),
        Arc::new(FailingSink),
        Arc::new(common::RecordingOracle::failing()),
    );
    let batch = state
        .inventory
        .create_batch(batch_input("Sunflower", 6))
        .await
        .unwrap();

    let (updated, _) = state
        .inventory
        .adjust(batch.id, -5, "bulk sale", "system")
        .await
        .unwrap();
    assert_eq!(updated.tray_count, 1);
}

// ============================================================================
// Property-based tests
// ============================================================================

fn sample_batch(tray_count: i64) -> InventoryBatch {
    InventoryBatch {
        id: Uuid::new_v4(),
        variety: "Radish".to_string(),
        tray_count,
        harvest_date: Utc::now(),
        weight_kg: None,
        status: BatchStatus::InStorage,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Conservation: after any adjustment sequence (some of which get
    /// rejected), the count equals the sum of logged deltas and never went
    /// negative.
    #[test]
    fn prop_count_equals_sum_of_logged_deltas(
        initial in 0i64..20,
        deltas in prop::collection::vec(-15i64..15, 1..50)
    ) {
        let store = LedgerStore::new();
        let (batch, _) = store.create_batch(sample_batch(initial), "test").unwrap();

        for delta in deltas {
            // Rejected overdraws must leave no trace.
            let _ = store.adjust(batch.id, delta, "property", "test");
        }

        let current = store.get(batch.id).unwrap().tray_count;
        let logged: i64 = store
            .logs_for(batch.id)
            .unwrap()
            .iter()
            .map(|l| l.delta)
            .sum();

        prop_assert_eq!(current, logged);
        prop_assert!(current >= 0);
    }

    /// A rejected adjustment is observationally a no-op.
    #[test]
    fn prop_rejected_adjustment_changes_nothing(
        initial in 0i64..10,
        overdraw in 1i64..50
    ) {
        let store = LedgerStore::new();
        let (batch, _) = store.create_batch(sample_batch(initial), "test").unwrap();

        let before_logs = store.logs_for(batch.id).unwrap().len();
        let result = store.adjust(batch.id, -(initial + overdraw), "too much", "test");

        prop_assert!(result.is_err());
        prop_assert_eq!(store.get(batch.id).unwrap().tray_count, initial);
        prop_assert_eq!(store.logs_for(batch.id).unwrap().len(), before_logs);
    }
}
