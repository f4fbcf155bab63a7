//! HTTP handlers for demand forecasting endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use shared::{Forecast, SalesRecord};

use crate::error::AppResult;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    pub weeks: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct HistoricalSalesQuery {
    pub days: Option<i64>,
}

/// Get (or compute and cache) the demand forecast
pub async fn get_demand_forecast(
    State(state): State<AppState>,
    Query(query): Query<ForecastQuery>,
) -> AppResult<Json<Forecast>> {
    let forecast = state.forecast.get_forecast(query.weeks.unwrap_or(4)).await?;
    Ok(Json(forecast))
}

/// Get historical daily sales totals
pub async fn get_historical_sales(
    State(state): State<AppState>,
    Query(query): Query<HistoricalSalesQuery>,
) -> AppResult<Json<Vec<SalesRecord>>> {
    let records = state.forecast.historical_sales(query.days.unwrap_or(90))?;
    Ok(Json(records))
}
