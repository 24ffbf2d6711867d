//! Marketplace listing model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use grow_smart_core::{ListingId, ListingStatus, UserId};

/// A produce listing offered by a seller.
///
/// `remaining_kg` starts at `quantity_kg` and is decremented as orders are
/// placed; at zero the listing flips to `SoldOut`.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Listing {
    /// Unique listing ID.
    pub id: ListingId,
    /// User selling the produce.
    pub seller_id: UserId,
    /// Crop being sold (e.g., "tomato").
    pub crop_name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Total quantity offered, in kilograms.
    pub quantity_kg: Decimal,
    /// Quantity still available, in kilograms.
    pub remaining_kg: Decimal,
    /// Asking price per kilogram.
    pub price_per_kg: Decimal,
    /// District for local pickup/delivery.
    pub district: String,
    /// Listing lifecycle status.
    pub status: ListingStatus,
    /// When the listing was created.
    pub created_at: DateTime<Utc>,
    /// When the listing was last updated.
    pub updated_at: DateTime<Utc>,
}
