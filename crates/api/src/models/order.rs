//! Marketplace order model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use grow_smart_core::{ListingId, OrderId, OrderStatus, UserId};

/// An order placed by a buyer against a listing.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Public order reference, safe to include in emails.
    pub reference: Uuid,
    /// Listing the order was placed against.
    pub listing_id: ListingId,
    /// Buyer.
    pub buyer_id: UserId,
    /// Seller (denormalized from the listing at order time).
    pub seller_id: UserId,
    /// Ordered quantity in kilograms.
    pub quantity_kg: Decimal,
    /// Total price at the listing's price per kg.
    pub total_price: Decimal,
    /// Order lifecycle status.
    pub status: OrderStatus,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
    /// When the order was last updated.
    pub updated_at: DateTime<Utc>,
}
