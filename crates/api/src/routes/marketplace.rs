//! Marketplace listing routes.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use grow_smart_core::{ListingId, UserId};

use crate::db::listings::{ListingFilter, ListingRepository, ListingUpdate, NewListing, PAGE_SIZE};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::Listing;
use crate::state::AppState;

/// Query parameters for browsing listings.
#[derive(Debug, Deserialize)]
pub struct BrowseQuery {
    pub crop: Option<String>,
    pub district: Option<String>,
    pub max_price: Option<Decimal>,
    #[serde(default)]
    pub page: u32,
}

/// One page of listings.
#[derive(Debug, Serialize)]
pub struct BrowseResponse {
    pub listings: Vec<Listing>,
    pub page: u32,
    pub page_size: i64,
}

/// Browse active listings, newest first.
///
/// GET /api/listings?crop=&district=&max_price=&page=
///
/// # Errors
///
/// Returns 500 if the query fails.
pub async fn browse(
    State(state): State<AppState>,
    Query(query): Query<BrowseQuery>,
) -> Result<Json<BrowseResponse>> {
    let page = query.page.max(1);
    let filter = ListingFilter {
        crop: query.crop,
        district: query.district,
        max_price: query.max_price,
        page,
    };

    let listings = ListingRepository::new(state.pool()).browse(&filter).await?;

    Ok(Json(BrowseResponse {
        listings,
        page,
        page_size: PAGE_SIZE,
    }))
}

/// Get one listing.
///
/// GET /api/listings/{id}
///
/// # Errors
///
/// Returns 404 for an unknown listing.
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<ListingId>,
) -> Result<Json<Listing>> {
    let listing = ListingRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("listing {id}")))?;

    Ok(Json(listing))
}

/// Request to create a listing.
#[derive(Debug, Deserialize)]
pub struct CreateListingRequest {
    pub crop_name: String,
    pub description: Option<String>,
    pub quantity_kg: Decimal,
    pub price_per_kg: Decimal,
    pub district: String,
}

/// Create a listing for the logged-in seller.
///
/// POST /api/listings
///
/// # Errors
///
/// Returns 400 for invalid fields.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Json(req): Json<CreateListingRequest>,
) -> Result<Json<Listing>> {
    if req.crop_name.trim().is_empty() {
        return Err(AppError::BadRequest("crop_name is required".to_owned()));
    }
    if req.district.trim().is_empty() {
        return Err(AppError::BadRequest("district is required".to_owned()));
    }
    if req.quantity_kg <= Decimal::ZERO {
        return Err(AppError::BadRequest(
            "quantity_kg must be positive".to_owned(),
        ));
    }
    if req.price_per_kg <= Decimal::ZERO {
        return Err(AppError::BadRequest(
            "price_per_kg must be positive".to_owned(),
        ));
    }

    let listing = ListingRepository::new(state.pool())
        .create(
            current.id,
            NewListing {
                crop_name: req.crop_name.trim().to_owned(),
                description: req.description,
                quantity_kg: req.quantity_kg,
                price_per_kg: req.price_per_kg,
                district: req.district.trim().to_owned(),
            },
        )
        .await?;

    tracing::info!(listing_id = %listing.id, seller_id = %current.id, "Listing created");
    Ok(Json(listing))
}

/// Request to update a listing.
#[derive(Debug, Deserialize)]
pub struct UpdateListingRequest {
    pub description: Option<String>,
    pub price_per_kg: Option<Decimal>,
    pub district: Option<String>,
}

/// Update the seller-editable fields of an owned listing.
///
/// PUT /api/listings/{id}
///
/// # Errors
///
/// Returns 404 for an unknown listing, 403 if it is owned by someone else.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(id): Path<ListingId>,
    Json(req): Json<UpdateListingRequest>,
) -> Result<Json<Listing>> {
    if let Some(price) = req.price_per_kg
        && price <= Decimal::ZERO
    {
        return Err(AppError::BadRequest(
            "price_per_kg must be positive".to_owned(),
        ));
    }

    let repo = ListingRepository::new(state.pool());
    check_owner(&repo, id, current.id).await?;

    let listing = repo
        .update(
            id,
            current.id,
            ListingUpdate {
                description: req.description,
                price_per_kg: req.price_per_kg,
                district: req.district,
            },
        )
        .await?;

    Ok(Json(listing))
}

/// Withdraw an owned listing from the marketplace.
///
/// DELETE /api/listings/{id}
///
/// The row is kept (orders reference it); only the status changes.
///
/// # Errors
///
/// Returns 404 for an unknown listing, 403 if it is owned by someone else.
pub async fn withdraw(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(id): Path<ListingId>,
) -> Result<Json<Value>> {
    let repo = ListingRepository::new(state.pool());
    check_owner(&repo, id, current.id).await?;

    repo.withdraw(id, current.id).await?;

    tracing::info!(listing_id = %id, seller_id = %current.id, "Listing withdrawn");
    Ok(Json(json!({ "status": "withdrawn" })))
}

/// 404 for an unknown listing, 403 when `user_id` is not the seller.
///
/// The repository `WHERE` clauses re-check ownership, so a listing that
/// changes hands between this check and the write still cannot be touched.
async fn check_owner(
    repo: &ListingRepository<'_>,
    id: ListingId,
    user_id: UserId,
) -> Result<()> {
    let listing = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("listing {id}")))?;

    if listing.seller_id != user_id {
        return Err(AppError::Forbidden(
            "only the seller may modify this listing".to_owned(),
        ));
    }

    Ok(())
}
