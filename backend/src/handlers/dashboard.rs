//! HTTP handler for the dashboard endpoint

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::services::reporting::DashboardData;
use crate::AppState;

/// Get dashboard KPIs and summaries
pub async fn get_dashboard_data(State(state): State<AppState>) -> AppResult<Json<DashboardData>> {
    let data = state.reporting.dashboard_data()?;
    Ok(Json(data))
}
