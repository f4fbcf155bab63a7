//! HTTP handlers for production tracking endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use shared::{CropVariety, Harvest, TrayPlanting};

use crate::error::AppResult;
use crate::services::production::CreatePlantingInput;
use crate::AppState;

/// List the variety catalog
pub async fn get_varieties(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<CropVariety>>> {
    let varieties = state.production.varieties()?;
    Ok(Json(varieties))
}

/// List plantings (growing plantings past their expected harvest date are
/// reported as ready)
pub async fn list_plantings(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<TrayPlanting>>> {
    let plantings = state.production.list_plantings()?;
    Ok(Json(plantings))
}

/// Register a new planting
pub async fn create_planting(
    State(state): State<AppState>,
    Json(input): Json<CreatePlantingInput>,
) -> AppResult<(StatusCode, Json<TrayPlanting>)> {
    let planting = state.production.create_planting(input)?;
    Ok((StatusCode::CREATED, Json(planting)))
}

/// List recorded harvests
pub async fn list_harvests(State(state): State<AppState>) -> AppResult<Json<Vec<Harvest>>> {
    let harvests = state.production.list_harvests()?;
    Ok(Json(harvests))
}
