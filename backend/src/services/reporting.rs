//! Reporting service: dashboard KPIs over ledger and order snapshots
//!
//! Pure read-side reductions; nothing here writes to any store.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use shared::{BatchStatus, OrderStatus, PlantingStatus};

use crate::error::AppResult;
use crate::store::{LedgerStore, OrderStore, ProductionStore};

/// Days of order history feeding the per-variety demand table.
const DEMAND_WINDOW_DAYS: i64 = 60;

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    ledger: Arc<LedgerStore>,
    orders: Arc<OrderStore>,
    production: Arc<ProductionStore>,
}

/// Dashboard payload
#[derive(Debug, Serialize)]
pub struct DashboardData {
    pub kpis: DashboardKpis,
    pub top_varieties: Vec<VarietyPerformance>,
    pub upcoming_harvests: Vec<UpcomingHarvest>,
    pub demand_forecast: Vec<VarietyDemand>,
}

#[derive(Debug, Serialize)]
pub struct DashboardKpis {
    pub active_trays: i64,
    pub storage_trays: i64,
    pub avg_yield_per_tray: Decimal,
    pub recent_revenue: Decimal,
    pub harvests_last_30_days: i64,
    pub orders_last_30_days: i64,
}

#[derive(Debug, Serialize)]
pub struct VarietyPerformance {
    pub id: i32,
    pub name: String,
    pub yield_per_tray: Decimal,
    pub expected_yield_per_tray: Decimal,
    /// Realized yield as a percentage of the expected yield.
    pub performance: Decimal,
}

#[derive(Debug, Serialize)]
pub struct UpcomingHarvest {
    pub id: i32,
    pub variety: String,
    pub expected_harvest_date: DateTime<Utc>,
    pub tray_count: i64,
    pub expected_yield: Decimal,
}

#[derive(Debug, Serialize)]
pub struct VarietyDemand {
    pub id: i32,
    pub name: String,
    pub daily_demand: Decimal,
    pub weekly_demand: Decimal,
    pub monthly_demand: Decimal,
}

impl ReportingService {
    pub fn new(
        ledger: Arc<LedgerStore>,
        orders: Arc<OrderStore>,
        production: Arc<ProductionStore>,
    ) -> Self {
        Self {
            ledger,
            orders,
            production,
        }
    }

    pub fn dashboard_data(&self) -> AppResult<DashboardData> {
        let now = Utc::now();
        let plantings = self.production.plantings()?;
        let harvests = self.production.harvests()?;
        let varieties = self.production.varieties()?;
        let batches = self.ledger.list_all()?;
        let orders = self.orders.list_all()?;

        let active_trays: i64 = plantings
            .iter()
            .filter(|p| matches!(p.status, PlantingStatus::Planted | PlantingStatus::Growing))
            .map(|p| p.tray_count)
            .sum();

        let storage_trays: i64 = batches
            .iter()
            .filter(|b| b.status == BatchStatus::InStorage)
            .map(|b| b.tray_count)
            .sum();

        let harvested_ids: HashSet<i32> = harvests.iter().map(|h| h.planting_id).collect();
        let total_yield: Decimal = harvests.iter().map(|h| h.actual_yield).sum();
        let harvested_trays: i64 = plantings
            .iter()
            .filter(|p| harvested_ids.contains(&p.id))
            .map(|p| p.tray_count)
            .sum();
        let avg_yield_per_tray = if harvested_trays > 0 {
            (total_yield / Decimal::from(harvested_trays)).round_dp(2)
        } else {
            Decimal::ZERO
        };

        let month_ago = now - Duration::days(30);
        let recent_orders: Vec<_> = orders
            .iter()
            .filter(|o| o.order_date > month_ago && o.status != OrderStatus::Cancelled)
            .collect();
        let recent_revenue = recent_orders
            .iter()
            .map(|o| o.total_price)
            .sum::<Decimal>()
            .round_dp(2);
        let harvests_last_30_days =
            harvests.iter().filter(|h| h.harvest_date > month_ago).count() as i64;

        // Realized yield per variety, from harvests joined through plantings.
        let planting_by_id: HashMap<i32, _> = plantings.iter().map(|p| (p.id, p)).collect();
        let mut variety_yields: HashMap<i32, (Decimal, i64)> = HashMap::new();
        for harvest in &harvests {
            if let Some(planting) = planting_by_id.get(&harvest.planting_id) {
                let entry = variety_yields
                    .entry(planting.variety_id)
                    .or_insert((Decimal::ZERO, 0));
                entry.0 += harvest.actual_yield;
                entry.1 += planting.tray_count;
            }
        }

        let mut top_varieties: Vec<VarietyPerformance> = variety_yields
            .iter()
            .filter_map(|(&variety_id, &(yield_total, tray_count))| {
                let variety = varieties.iter().find(|v| v.id == variety_id)?;
                if tray_count == 0 {
                    return None;
                }
                let yield_per_tray = (yield_total / Decimal::from(tray_count)).round_dp(2);
                let performance = if variety.expected_yield_per_tray > Decimal::ZERO {
                    (yield_per_tray / variety.expected_yield_per_tray * Decimal::from(100))
                        .round_dp(1)
                } else {
                    Decimal::ZERO
                };
                Some(VarietyPerformance {
                    id: variety_id,
                    name: variety.name.clone(),
                    yield_per_tray,
                    expected_yield_per_tray: variety.expected_yield_per_tray,
                    performance,
                })
            })
            .collect();
        top_varieties.sort_by(|a, b| b.yield_per_tray.cmp(&a.yield_per_tray));
        top_varieties.truncate(5);

        let mut upcoming_harvests: Vec<UpcomingHarvest> = plantings
            .iter()
            .filter(|p| p.status == PlantingStatus::Growing && p.expected_harvest_date > now)
            .filter_map(|p| {
                let variety = varieties.iter().find(|v| v.id == p.variety_id)?;
                Some(UpcomingHarvest {
                    id: p.id,
                    variety: variety.name.clone(),
                    expected_harvest_date: p.expected_harvest_date,
                    tray_count: p.tray_count,
                    expected_yield: Decimal::from(p.tray_count) * variety.expected_yield_per_tray,
                })
            })
            .collect();
        upcoming_harvests.sort_by_key(|h| h.expected_harvest_date);
        upcoming_harvests.truncate(5);

        // Per-variety demand from recent non-cancelled orders.
        let demand_window = now - Duration::days(DEMAND_WINDOW_DAYS);
        let mut demand_by_variety: HashMap<i32, i64> = HashMap::new();
        for order in &orders {
            if order.status == OrderStatus::Cancelled || order.order_date <= demand_window {
                continue;
            }
            for line in &order.items {
                if let Some(variety) = varieties.iter().find(|v| v.name == line.variety) {
                    *demand_by_variety.entry(variety.id).or_insert(0) += line.quantity;
                }
            }
        }

        let mut demand_forecast: Vec<VarietyDemand> = demand_by_variety
            .iter()
            .filter_map(|(&variety_id, &total)| {
                let variety = varieties.iter().find(|v| v.id == variety_id)?;
                let daily = (Decimal::from(total) / Decimal::from(DEMAND_WINDOW_DAYS)).round_dp(2);
                Some(VarietyDemand {
                    id: variety_id,
                    name: variety.name.clone(),
                    daily_demand: daily,
                    weekly_demand: (daily * Decimal::from(7)).round_dp(2),
                    monthly_demand: (daily * Decimal::from(30)).round_dp(2),
                })
            })
            .collect();
        demand_forecast.sort_by(|a, b| b.monthly_demand.cmp(&a.monthly_demand));

        Ok(DashboardData {
            kpis: DashboardKpis {
                active_trays,
                storage_trays,
                avg_yield_per_tray,
                recent_revenue,
                harvests_last_30_days,
                orders_last_30_days: recent_orders.len() as i64,
            },
            top_varieties,
            upcoming_harvests,
            demand_forecast,
        })
    }
}
