//! Government scheme routes.
//!
//! Reading is public; writing is admin-only and lives under /api/admin.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};

use grow_smart_core::SchemeId;

use crate::db::schemes::{SchemeInput, SchemeRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::Scheme;
use crate::state::AppState;

/// Query parameters for listing schemes.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
}

/// List schemes, optionally filtered by category.
///
/// GET /api/schemes?category=
///
/// # Errors
///
/// Returns 500 if the query fails.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Scheme>>> {
    let schemes = SchemeRepository::new(state.pool())
        .list(query.category.as_deref())
        .await?;

    Ok(Json(schemes))
}

/// Get one scheme.
///
/// GET /api/schemes/{id}
///
/// # Errors
///
/// Returns 404 for an unknown scheme.
pub async fn get(State(state): State<AppState>, Path(id): Path<SchemeId>) -> Result<Json<Scheme>> {
    let scheme = SchemeRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("scheme {id}")))?;

    Ok(Json(scheme))
}

/// Request body for creating or replacing a scheme entry.
#[derive(Debug, Deserialize)]
pub struct SchemeRequest {
    pub name: String,
    pub category: String,
    pub description: String,
    pub eligibility: Option<String>,
    pub benefits: Option<String>,
    pub application_url: Option<String>,
}

impl SchemeRequest {
    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest("name is required".to_owned()));
        }
        if self.category.trim().is_empty() {
            return Err(AppError::BadRequest("category is required".to_owned()));
        }
        if self.description.trim().is_empty() {
            return Err(AppError::BadRequest("description is required".to_owned()));
        }
        Ok(())
    }

    fn into_input(self) -> SchemeInput {
        SchemeInput {
            name: self.name,
            category: self.category,
            description: self.description,
            eligibility: self.eligibility,
            benefits: self.benefits,
            application_url: self.application_url,
        }
    }
}

/// Create a scheme entry.
///
/// POST /api/admin/schemes
///
/// # Errors
///
/// Returns 403 for non-admins, 400 for missing fields.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(req): Json<SchemeRequest>,
) -> Result<Json<Scheme>> {
    req.validate()?;

    let scheme = SchemeRepository::new(state.pool())
        .create(req.into_input())
        .await?;

    Ok(Json(scheme))
}

/// Replace a scheme entry.
///
/// PUT /api/admin/schemes/{id}
///
/// # Errors
///
/// Returns 403 for non-admins, 404 for an unknown scheme.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<SchemeId>,
    Json(req): Json<SchemeRequest>,
) -> Result<Json<Scheme>> {
    req.validate()?;

    let scheme = SchemeRepository::new(state.pool())
        .update(id, req.into_input())
        .await?;

    Ok(Json(scheme))
}

/// Delete a scheme entry.
///
/// DELETE /api/admin/schemes/{id}
///
/// # Errors
///
/// Returns 403 for non-admins, 404 for an unknown scheme.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<SchemeId>,
) -> Result<Json<Value>> {
    let deleted = SchemeRepository::new(state.pool()).delete(id).await?;

    if !deleted {
        return Err(AppError::NotFound(format!("scheme {id}")));
    }

    Ok(Json(json!({ "status": "deleted" })))
}
