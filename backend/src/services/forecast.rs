//! Demand forecasting service
//!
//! Memoizes forecasts per `(day, horizon)` key and wraps the external
//! oracle with a deterministic fallback: with fewer than two days of
//! history, an oracle error, or an empty prediction set, every day of the
//! horizon gets the historical mean daily demand (zero without history).

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use shared::{validate_horizon_weeks, Forecast, ForecastPoint, OrderStatus, SalesRecord};

use crate::error::{AppError, AppResult};
use crate::external::DemandOracle;
use crate::store::OrderStore;

/// Forecast service with result cache
#[derive(Clone)]
pub struct ForecastService {
    orders: Arc<OrderStore>,
    oracle: Arc<dyn DemandOracle>,
    cache: Arc<Mutex<HashMap<(NaiveDate, i64), Forecast>>>,
    lookback_days: i64,
}

impl ForecastService {
    pub fn new(orders: Arc<OrderStore>, oracle: Arc<dyn DemandOracle>, lookback_days: i64) -> Self {
        Self {
            orders,
            oracle,
            cache: Arc::new(Mutex::new(HashMap::new())),
            lookback_days,
        }
    }

    /// Daily totals of completed-order trays over the trailing window.
    pub fn historical_sales(&self, days: i64) -> AppResult<Vec<SalesRecord>> {
        let end = Utc::now();
        let start = end - Duration::days(days);

        let mut by_day: BTreeMap<NaiveDate, i64> = BTreeMap::new();
        for order in self.orders.list_all()? {
            if order.status != OrderStatus::Completed {
                continue;
            }
            if order.order_date < start || order.order_date > end {
                continue;
            }
            *by_day.entry(order.order_date.date_naive()).or_insert(0) += order.total_trays();
        }

        Ok(by_day
            .into_iter()
            .map(|(date, total_trays_sold)| SalesRecord {
                date,
                total_trays_sold,
            })
            .collect())
    }

    /// Forecast demand over the next `weeks` weeks, keyed by `(today, weeks)`.
    ///
    /// A cache hit returns the stored result without consulting the oracle;
    /// entries never expire (the key naturally rolls over at midnight).
    pub async fn get_forecast(&self, weeks: i64) -> AppResult<Forecast> {
        validate_horizon_weeks(weeks).map_err(|msg| AppError::validation("weeks", msg))?;

        let period_start = Utc::now().date_naive();
        let period_end = period_start + Duration::days(weeks * 7);
        let key = (period_start, weeks);

        if let Some(cached) = self.cache_get(&key)? {
            return Ok(cached);
        }

        let history = self.historical_sales(self.lookback_days)?;
        let horizon_days = weeks * 7;

        // The oracle call holds no locks; a concurrent miss may compute the
        // same forecast twice, and last-write-wins is fine for identical
        // immutable results.
        let mut predictions = Vec::new();
        if history.len() >= 2 {
            match self.oracle.predict(&history, horizon_days).await {
                Ok(points) => {
                    predictions = points
                        .into_iter()
                        .filter(|p| p.date >= period_start && p.date < period_end)
                        .collect();
                }
                Err(e) => {
                    tracing::warn!("demand oracle failed, using historical mean: {}", e);
                }
            }
        }

        if predictions.is_empty() {
            let mean = Self::mean_daily_demand(&history);
            predictions = (0..horizon_days)
                .map(|offset| ForecastPoint {
                    date: period_start + Duration::days(offset),
                    predicted_trays: mean,
                })
                .collect();
        }

        let forecast = Forecast {
            id: Uuid::new_v4(),
            period_start,
            period_end,
            predictions,
            created_at: Utc::now(),
        };

        self.cache_put(key, forecast.clone())?;
        Ok(forecast)
    }

    fn mean_daily_demand(history: &[SalesRecord]) -> Decimal {
        if history.is_empty() {
            return Decimal::ZERO;
        }
        let total: Decimal = history
            .iter()
            .map(|record| Decimal::from(record.total_trays_sold))
            .sum();
        (total / Decimal::from(history.len() as i64)).round_dp(1)
    }

    fn cache_get(&self, key: &(NaiveDate, i64)) -> AppResult<Option<Forecast>> {
        let cache = self
            .cache
            .lock()
            .map_err(|_| AppError::internal("forecast cache lock poisoned"))?;
        Ok(cache.get(key).cloned())
    }

    fn cache_put(&self, key: (NaiveDate, i64), forecast: Forecast) -> AppResult<()> {
        let mut cache = self
            .cache
            .lock()
            .map_err(|_| AppError::internal("forecast cache lock poisoned"))?;
        cache.insert(key, forecast);
        Ok(())
    }
}
