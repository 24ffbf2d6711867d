//! Profile routes.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::db::profiles::{ProfileRepository, ProfileUpdate};
use crate::db::users::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{Profile, User};
use crate::state::AppState;

/// Account and profile details for the logged-in user.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: User,
    pub profile: Option<Profile>,
}

/// Get the logged-in user's account and profile.
///
/// GET /api/profile
///
/// # Errors
///
/// Returns 404 if the account no longer exists.
pub async fn get_profile(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<Json<ProfileResponse>> {
    let user = UserRepository::new(state.pool())
        .get_by_id(current.id)
        .await?
        .ok_or_else(|| AppError::NotFound("account not found".to_owned()))?;

    let profile = ProfileRepository::new(state.pool()).get(current.id).await?;

    Ok(Json(ProfileResponse { user, profile }))
}

/// Profile fields to change. Omitted fields are left unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub district: Option<String>,
    pub state: Option<String>,
    pub farm_size_ha: Option<Decimal>,
}

/// Update the logged-in user's profile, creating it on first update.
///
/// PUT /api/profile
///
/// # Errors
///
/// Returns 400 for invalid field values.
pub async fn update_profile(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<Profile>> {
    if let Some(size) = req.farm_size_ha
        && size < Decimal::ZERO
    {
        return Err(AppError::BadRequest(
            "farm_size_ha must not be negative".to_owned(),
        ));
    }
    if let Some(name) = &req.full_name
        && name.len() > 200
    {
        return Err(AppError::BadRequest("full_name is too long".to_owned()));
    }

    let update = ProfileUpdate {
        full_name: req.full_name,
        phone: req.phone,
        district: req.district,
        state: req.state,
        farm_size_ha: req.farm_size_ha,
    };

    let profile = ProfileRepository::new(state.pool())
        .upsert(current.id, update)
        .await?;

    Ok(Json(profile))
}
