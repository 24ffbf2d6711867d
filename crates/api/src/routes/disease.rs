//! Disease detection routes.

use axum::{Json, extract::State};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::db::predictions::PredictionRepository;
use crate::error::{AppError, Result};
use crate::middleware::{OptionalAuth, RequireAuth};
use crate::models::{DiseasePrediction, DiseaseReport};
use crate::state::AppState;

/// Largest accepted photo after base64 decoding (10 MiB).
const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Request to assess a crop photo.
#[derive(Debug, Deserialize)]
pub struct DetectRequest {
    /// Base64-encoded photo.
    pub image_base64: String,
    /// Optional location, improves provider accuracy.
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Assessment result, with a flag for whether it was saved to history.
#[derive(Debug, Serialize)]
pub struct DetectResponse {
    #[serde(flatten)]
    pub report: DiseaseReport,
    pub saved: bool,
}

/// Assess a crop photo for diseases.
///
/// POST /api/disease/detect
///
/// Works without a login; when the caller is logged in the result is also
/// saved to their history.
///
/// # Errors
///
/// Returns 400 for a missing, oversized, or non-base64 image, 502 if the
/// provider is unavailable.
pub async fn detect(
    State(state): State<AppState>,
    OptionalAuth(current): OptionalAuth,
    Json(req): Json<DetectRequest>,
) -> Result<Json<DetectResponse>> {
    if req.image_base64.is_empty() {
        return Err(AppError::BadRequest("image_base64 is required".to_owned()));
    }

    // Strip an optional data-URL prefix the frontend may send
    let encoded = req
        .image_base64
        .split_once(',')
        .map_or(req.image_base64.as_str(), |(_, rest)| rest);

    let decoded = STANDARD
        .decode(encoded)
        .map_err(|_| AppError::BadRequest("image_base64 is not valid base64".to_owned()))?;

    if decoded.len() > MAX_IMAGE_BYTES {
        return Err(AppError::BadRequest(
            "image is too large (10 MB maximum)".to_owned(),
        ));
    }

    let report = state
        .plant_health()
        .assess(encoded, req.latitude, req.longitude)
        .await?;

    let mut saved = false;
    if let Some(user) = current {
        PredictionRepository::new(state.pool())
            .create(user.id, &report)
            .await?;
        saved = true;
    }

    Ok(Json(DetectResponse { report, saved }))
}

/// Saved detections for the logged-in user, newest first.
///
/// GET /api/disease/history
///
/// # Errors
///
/// Returns 401 without a login.
pub async fn history(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<Json<Vec<DiseasePrediction>>> {
    let predictions = PredictionRepository::new(state.pool())
        .list_for_user(current.id)
        .await?;

    Ok(Json(predictions))
}
