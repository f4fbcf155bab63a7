//! Development seed data
//!
//! Generates a plausible farm history through the real services, so seeded
//! data obeys the same invariants as live data: batches enter through the
//! ledger (initial counts logged) and orders run through the transaction
//! engine, including their cancellations.

use chrono::{Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use rust_decimal::Decimal;

use shared::{BatchStatus, CropVariety, Harvest, OrderStatus, PlantingStatus, TrayPlanting};

use crate::error::AppResult;
use crate::services::inventory::{BatchFilter, CreateBatchInput};
use crate::services::order::{CreateOrderInput, OrderLineInput};
use crate::AppState;

/// The grower's variety catalog.
pub fn variety_catalog() -> Vec<CropVariety> {
    let variety = |id: i32, name: &str, grow_cycle_days: i64, expected_yield: i64| CropVariety {
        id,
        name: name.to_string(),
        grow_cycle_days,
        expected_yield_per_tray: Decimal::from(expected_yield),
    };

    vec![
        variety(1, "Sunflower", 10, 200),
        variety(2, "Pea Shoots", 12, 175),
        variety(3, "Radish", 8, 150),
        variety(4, "Broccoli", 14, 180),
        variety(5, "Arugula", 7, 125),
        variety(6, "Kale", 10, 160),
        variety(7, "Wheatgrass", 12, 210),
    ]
}

/// Populate the stores with sample plantings, harvests, inventory batches,
/// and orders.
pub async fn seed_sample_data(state: &AppState) -> AppResult<()> {
    let mut rng = rand::thread_rng();
    let now = Utc::now();

    let varieties = variety_catalog();
    state.production.set_catalog(varieties.clone())?;

    // Plantings over the last two months, in various stages.
    let mut plantings = Vec::new();
    for id in 1..40 {
        let variety = varieties.choose(&mut rng).expect("catalog is non-empty");
        let plant_date = now - Duration::days(rng.gen_range(0..60));
        let expected_harvest_date = plant_date + Duration::days(variety.grow_cycle_days);

        let mut status = *[
            PlantingStatus::Planted,
            PlantingStatus::Growing,
            PlantingStatus::Growing,
            PlantingStatus::Harvested,
            PlantingStatus::Failed,
        ]
        .choose(&mut rng)
        .expect("status pool is non-empty");

        // Keep randomly drawn statuses consistent with the dates.
        if status == PlantingStatus::Harvested && expected_harvest_date > now {
            status = PlantingStatus::Growing;
        }
        if status == PlantingStatus::Growing && expected_harvest_date < now {
            status = PlantingStatus::Harvested;
        }
        if status == PlantingStatus::Planted && plant_date < now - Duration::days(3) {
            status = PlantingStatus::Growing;
        }

        let planting = TrayPlanting {
            id,
            variety_id: variety.id,
            plant_date,
            expected_harvest_date,
            status,
            tray_count: rng.gen_range(1..=5),
        };
        state.production.insert_planting(planting.clone())?;
        plantings.push(planting);
    }

    // Harvests for the harvested plantings, with the resulting batches
    // entering inventory through the ledger.
    let mut harvest_id = 0;
    for planting in plantings
        .iter()
        .filter(|p| p.status == PlantingStatus::Harvested)
    {
        let variety = varieties
            .iter()
            .find(|v| v.id == planting.variety_id)
            .expect("seeded plantings reference the catalog");

        let expected_yield = variety.expected_yield_per_tray * Decimal::from(planting.tray_count);
        let factor = Decimal::from_f64_retain(rng.gen_range(0.75..1.10)).unwrap_or(Decimal::ONE);
        let actual_yield = (expected_yield * factor).round_dp(2);
        let harvest_date = planting.expected_harvest_date + Duration::hours(rng.gen_range(-12..=12));

        harvest_id += 1;
        state.production.record_harvest(Harvest {
            id: harvest_id,
            planting_id: planting.id,
            harvest_date,
            actual_yield,
            quality_score: rng.gen_range(6..=10),
        })?;

        state
            .inventory
            .create_batch(CreateBatchInput {
                variety: variety.name.clone(),
                tray_count: planting.tray_count,
                harvest_date: Some(harvest_date),
                weight_kg: Some((actual_yield / Decimal::from(1000)).round_dp(2)),
                status: BatchStatus::InStorage,
            })
            .await?;
    }

    // Orders through the transaction engine; cancelled ones restock via the
    // same cancellation path live orders use.
    for customer in 1..35 {
        let order_date = now - Duration::days(rng.gen_range(0..60));
        let pickup_date = order_date + Duration::days(rng.gen_range(2..=7));

        let mut available: Vec<_> = state
            .inventory
            .list_batches(&BatchFilter::default())?
            .into_iter()
            .filter(|b| {
                b.status == BatchStatus::InStorage && b.tray_count > 0 && b.harvest_date < order_date
            })
            .collect();
        available.shuffle(&mut rng);

        let items: Vec<OrderLineInput> = available
            .into_iter()
            .take(rng.gen_range(1..=3))
            .map(|batch| OrderLineInput {
                quantity: rng.gen_range(1..=batch.tray_count),
                batch_id: batch.id,
                variety: batch.variety,
                price_per_tray: Some(Decimal::new(rng.gen_range(800..=1200), 2)),
            })
            .collect();
        if items.is_empty() {
            continue;
        }

        let input = CreateOrderInput {
            customer_name: format!("Customer {}", customer),
            customer_contact: Some(format!("cust{}@email.com", customer)),
            pickup_date,
            items,
        };
        let order = match state.orders.create_order(input).await {
            Ok(order) => order,
            // Another sample order may have drained the batch first.
            Err(e) => {
                tracing::debug!("skipping sample order: {}", e);
                continue;
            }
        };
        state.orders.backdate(order.id, order_date, pickup_date)?;

        let mut status = *[
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Confirmed,
            OrderStatus::Completed,
            OrderStatus::Completed,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ]
        .choose(&mut rng)
        .expect("status pool is non-empty");

        if status == OrderStatus::Completed && pickup_date > now {
            status = OrderStatus::Confirmed;
        }

        if status != OrderStatus::Pending {
            state.orders.update_status(order.id, status).await?;
        }
    }

    Ok(())
}
