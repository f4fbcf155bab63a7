//! HTTP client for the external demand forecasting oracle
//!
//! The oracle takes a daily sales history and a horizon and returns per-day
//! point predictions. The forecast cache treats an error or an empty
//! prediction set identically: fall back to the historical mean.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use shared::{ForecastPoint, SalesRecord};

use crate::error::{AppError, AppResult};

/// External time-series oracle producing demand predictions.
#[async_trait]
pub trait DemandOracle: Send + Sync {
    async fn predict(
        &self,
        history: &[SalesRecord],
        horizon_days: i64,
    ) -> AppResult<Vec<ForecastPoint>>;
}

/// Oracle client speaking the forecasting service's JSON API.
#[derive(Clone)]
pub struct HttpDemandOracle {
    client: Client,
    endpoint: String,
}

#[derive(Debug, Serialize)]
struct OracleRequest {
    history: Vec<OracleObservation>,
    horizon_days: i64,
}

#[derive(Debug, Serialize)]
struct OracleObservation {
    date: NaiveDate,
    observed_trays: i64,
}

#[derive(Debug, Deserialize)]
struct OracleResponse {
    predictions: Vec<OraclePrediction>,
}

#[derive(Debug, Deserialize)]
struct OraclePrediction {
    date: NaiveDate,
    predicted_trays: f64,
}

impl HttpDemandOracle {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl DemandOracle for HttpDemandOracle {
    async fn predict(
        &self,
        history: &[SalesRecord],
        horizon_days: i64,
    ) -> AppResult<Vec<ForecastPoint>> {
        let request = OracleRequest {
            history: history
                .iter()
                .map(|record| OracleObservation {
                    date: record.date,
                    observed_trays: record.total_trays_sold,
                })
                .collect(),
            horizon_days,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("demand oracle request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalService(format!(
                "demand oracle returned {}",
                response.status()
            )));
        }

        let body: OracleResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("invalid oracle response: {}", e)))?;

        Ok(body
            .predictions
            .into_iter()
            .map(|p| ForecastPoint {
                date: p.date,
                predicted_trays: Decimal::from_f64_retain(p.predicted_trays)
                    .unwrap_or_default()
                    .round_dp(1),
            })
            .collect())
    }
}

/// Stand-in used when no oracle endpoint is configured. Every call fails,
/// which the forecast cache turns into its deterministic fallback.
#[derive(Clone, Default)]
pub struct UnconfiguredOracle;

#[async_trait]
impl DemandOracle for UnconfiguredOracle {
    async fn predict(
        &self,
        _history: &[SalesRecord],
        _horizon_days: i64,
    ) -> AppResult<Vec<ForecastPoint>> {
        Err(AppError::ExternalService(
            "no demand oracle endpoint configured".to_string(),
        ))
    }
}
