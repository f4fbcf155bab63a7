//! Production tracking service: varieties, plantings, and harvests

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use shared::{validate_order_quantity, CropVariety, Harvest, PlantingStatus, TrayPlanting};

use crate::error::{AppError, AppResult};
use crate::store::ProductionStore;

/// Production service for the growing side of the farm
#[derive(Clone)]
pub struct ProductionService {
    store: Arc<ProductionStore>,
}

/// Input for registering a new planting
#[derive(Debug, Deserialize)]
pub struct CreatePlantingInput {
    pub variety_id: i32,
    pub plant_date: DateTime<Utc>,
    pub tray_count: Option<i64>,
}

impl ProductionService {
    pub fn new(store: Arc<ProductionStore>) -> Self {
        Self { store }
    }

    pub fn varieties(&self) -> AppResult<Vec<CropVariety>> {
        self.store.varieties()
    }

    /// List plantings; growing plantings whose expected harvest date has
    /// passed are promoted to `ready` on the way out.
    pub fn list_plantings(&self) -> AppResult<Vec<TrayPlanting>> {
        self.store.plantings_refreshed(Utc::now())
    }

    /// Register a planting. The initial status is derived from the plant
    /// date and the variety's grow cycle.
    pub fn create_planting(&self, input: CreatePlantingInput) -> AppResult<TrayPlanting> {
        let tray_count = input.tray_count.unwrap_or(1);
        validate_order_quantity(tray_count)
            .map_err(|msg| AppError::validation("tray_count", msg))?;

        let variety = self.store.find_variety(input.variety_id)?;
        let now = Utc::now();
        let expected_harvest_date = input.plant_date + Duration::days(variety.grow_cycle_days);

        let mut status = PlantingStatus::Planted;
        if input.plant_date < now - Duration::days(1) {
            status = PlantingStatus::Growing;
        }
        if expected_harvest_date <= now {
            status = PlantingStatus::Ready;
        }

        let planting = TrayPlanting {
            id: self.store.next_planting_id()?,
            variety_id: variety.id,
            plant_date: input.plant_date,
            expected_harvest_date,
            status,
            tray_count,
        };

        self.store.add_planting(planting.clone())?;
        tracing::info!(planting = planting.id, variety = %variety.name, "planting registered");
        Ok(planting)
    }

    pub fn list_harvests(&self) -> AppResult<Vec<Harvest>> {
        self.store.harvests()
    }

    /// Replace the variety catalog. Used at startup by the seeder.
    pub fn set_catalog(&self, varieties: Vec<CropVariety>) -> AppResult<()> {
        self.store.set_catalog(varieties)
    }

    /// Insert a planting as-is, without deriving status or dates. Used by
    /// the seeder to lay down historical plantings.
    pub fn insert_planting(&self, planting: TrayPlanting) -> AppResult<()> {
        self.store.add_planting(planting)
    }

    /// Record a harvest against a planting.
    pub fn record_harvest(&self, harvest: Harvest) -> AppResult<()> {
        self.store.add_harvest(harvest)
    }
}
