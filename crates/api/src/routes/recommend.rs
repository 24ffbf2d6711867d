//! Crop recommendation route.

use axum::Json;
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::services::recommend::{CropSuggestion, RecommendError, RecommendationInput, recommend};

/// Ranked crop suggestions for the supplied readings.
#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub suggestions: Vec<CropSuggestion>,
}

/// Recommend crops for soil and climate readings.
///
/// POST /api/recommend
///
/// Stateless; no account is required to ask for a recommendation.
///
/// # Errors
///
/// Returns 400 if any reading is outside its physical range.
pub async fn recommend_crops(
    Json(input): Json<RecommendationInput>,
) -> Result<Json<RecommendResponse>> {
    let suggestions = recommend(&input).map_err(|e| match e {
        RecommendError::InvalidInput(msg) => AppError::BadRequest(msg),
    })?;

    Ok(Json(RecommendResponse { suggestions }))
}
