//! Listing repository for database operations.

use rust_decimal::Decimal;
use sqlx::PgPool;

use grow_smart_core::{ListingId, UserId};

use super::RepositoryError;
use crate::models::Listing;

/// Page size for browse queries.
pub const PAGE_SIZE: i64 = 20;

/// Filters for browsing active listings.
#[derive(Debug, Clone, Default)]
pub struct ListingFilter {
    /// Case-insensitive crop name match.
    pub crop: Option<String>,
    /// Case-insensitive district match.
    pub district: Option<String>,
    /// Maximum price per kg.
    pub max_price: Option<Decimal>,
    /// One-based page number.
    pub page: u32,
}

/// Fields for creating a listing.
#[derive(Debug, Clone)]
pub struct NewListing {
    pub crop_name: String,
    pub description: Option<String>,
    pub quantity_kg: Decimal,
    pub price_per_kg: Decimal,
    pub district: String,
}

/// Fields a seller may change on a listing. `None` means "leave unchanged".
#[derive(Debug, Clone, Default)]
pub struct ListingUpdate {
    pub description: Option<String>,
    pub price_per_kg: Option<Decimal>,
    pub district: Option<String>,
}

/// Repository for marketplace listing operations.
pub struct ListingRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ListingRepository<'a> {
    /// Create a new listing repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a listing by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ListingId) -> Result<Option<Listing>, RepositoryError> {
        let listing = sqlx::query_as::<_, Listing>(
            r"
            SELECT id, seller_id, crop_name, description, quantity_kg, remaining_kg,
                   price_per_kg, district, status, created_at, updated_at
            FROM grow.crop_listings
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(listing)
    }

    /// Browse active listings with optional filters, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn browse(&self, filter: &ListingFilter) -> Result<Vec<Listing>, RepositoryError> {
        let page = i64::from(filter.page.max(1));
        let offset = (page - 1) * PAGE_SIZE;

        let listings = sqlx::query_as::<_, Listing>(
            r"
            SELECT id, seller_id, crop_name, description, quantity_kg, remaining_kg,
                   price_per_kg, district, status, created_at, updated_at
            FROM grow.crop_listings
            WHERE status = 'active'
              AND ($1::text IS NULL OR lower(crop_name) = lower($1))
              AND ($2::text IS NULL OR lower(district) = lower($2))
              AND ($3::numeric IS NULL OR price_per_kg <= $3)
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            ",
        )
        .bind(filter.crop.as_deref())
        .bind(filter.district.as_deref())
        .bind(filter.max_price)
        .bind(PAGE_SIZE)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        Ok(listings)
    }

    /// Create a listing for a seller.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        seller_id: UserId,
        new: NewListing,
    ) -> Result<Listing, RepositoryError> {
        let listing = sqlx::query_as::<_, Listing>(
            r"
            INSERT INTO grow.crop_listings
                (seller_id, crop_name, description, quantity_kg, remaining_kg, price_per_kg, district)
            VALUES ($1, $2, $3, $4, $4, $5, $6)
            RETURNING id, seller_id, crop_name, description, quantity_kg, remaining_kg,
                      price_per_kg, district, status, created_at, updated_at
            ",
        )
        .bind(seller_id)
        .bind(new.crop_name)
        .bind(new.description)
        .bind(new.quantity_kg)
        .bind(new.price_per_kg)
        .bind(new.district)
        .fetch_one(self.pool)
        .await?;

        Ok(listing)
    }

    /// Update seller-editable fields on a listing.
    ///
    /// Ownership is checked by the caller; the `WHERE` clause re-checks it
    /// so a stale check cannot update someone else's row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the listing doesn't exist or
    /// is not owned by `seller_id`.
    pub async fn update(
        &self,
        id: ListingId,
        seller_id: UserId,
        update: ListingUpdate,
    ) -> Result<Listing, RepositoryError> {
        let listing = sqlx::query_as::<_, Listing>(
            r"
            UPDATE grow.crop_listings SET
                description = COALESCE($3, description),
                price_per_kg = COALESCE($4, price_per_kg),
                district = COALESCE($5, district),
                updated_at = now()
            WHERE id = $1 AND seller_id = $2
            RETURNING id, seller_id, crop_name, description, quantity_kg, remaining_kg,
                      price_per_kg, district, status, created_at, updated_at
            ",
        )
        .bind(id)
        .bind(seller_id)
        .bind(update.description)
        .bind(update.price_per_kg)
        .bind(update.district)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(listing)
    }

    /// Withdraw a listing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the listing doesn't exist or
    /// is not owned by `seller_id`.
    pub async fn withdraw(&self, id: ListingId, seller_id: UserId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE grow.crop_listings
            SET status = 'withdrawn', updated_at = now()
            WHERE id = $1 AND seller_id = $2
            ",
        )
        .bind(id)
        .bind(seller_id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
