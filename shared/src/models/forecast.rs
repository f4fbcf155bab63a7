//! Demand forecast models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Observed demand for a single day: total trays across completed orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesRecord {
    pub date: NaiveDate,
    pub total_trays_sold: i64,
}

/// A single predicted day of demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub predicted_trays: Decimal,
}

/// A demand forecast over `[period_start, period_end)`.
///
/// Immutable once computed; the forecast cache keys results by
/// `(period_start, horizon_weeks)` and never expires them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forecast {
    pub id: Uuid,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub predictions: Vec<ForecastPoint>,
    pub created_at: DateTime<Utc>,
}
