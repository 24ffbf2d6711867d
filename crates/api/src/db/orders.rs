//! Order repository for database operations.

use rust_decimal::Decimal;
use sqlx::PgPool;

use grow_smart_core::{ListingId, OrderId, OrderStatus, UserId};

use super::RepositoryError;
use crate::models::{Listing, Order};

/// Repository for marketplace order operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(
            r"
            SELECT id, reference, listing_id, buyer_id, seller_id, quantity_kg,
                   total_price, status, created_at, updated_at
            FROM grow.orders
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(order)
    }

    /// Reserve stock and create a pending order in one transaction.
    ///
    /// The quantity check happens inside the conditional `UPDATE`, so two
    /// concurrent orders cannot both take the last of the stock; the
    /// listing flips to `sold_out` at zero. Because the reservation and
    /// the insert commit together, a failed insert rolls the stock back.
    ///
    /// Returns the order and the listing as it looked after reservation.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the listing is not active or
    /// has less than `quantity_kg` remaining, `Database` otherwise.
    pub async fn place(
        &self,
        listing_id: ListingId,
        buyer_id: UserId,
        quantity_kg: Decimal,
    ) -> Result<(Order, Listing), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let listing = sqlx::query_as::<_, Listing>(
            r"
            UPDATE grow.crop_listings SET
                remaining_kg = remaining_kg - $2,
                status = CASE WHEN remaining_kg - $2 <= 0 THEN 'sold_out'::grow.listing_status
                              ELSE status END,
                updated_at = now()
            WHERE id = $1 AND status = 'active' AND remaining_kg >= $2
            RETURNING id, seller_id, crop_name, description, quantity_kg, remaining_kg,
                      price_per_kg, district, status, created_at, updated_at
            ",
        )
        .bind(listing_id)
        .bind(quantity_kg)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            RepositoryError::Conflict("listing is not active or has insufficient stock".to_owned())
        })?;

        let total_price = listing.price_per_kg * quantity_kg;

        let order = sqlx::query_as::<_, Order>(
            r"
            INSERT INTO grow.orders (listing_id, buyer_id, seller_id, quantity_kg, total_price)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, reference, listing_id, buyer_id, seller_id, quantity_kg,
                      total_price, status, created_at, updated_at
            ",
        )
        .bind(listing.id)
        .bind(buyer_id)
        .bind(listing.seller_id)
        .bind(quantity_kg)
        .bind(total_price)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((order, listing))
    }

    /// All orders the user is a party to (as buyer or seller), newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(
            r"
            SELECT id, reference, listing_id, buyer_id, seller_id, quantity_kg,
                   total_price, status, created_at, updated_at
            FROM grow.orders
            WHERE buyer_id = $1 OR seller_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(orders)
    }

    /// Set an order's status.
    ///
    /// Transition legality and party permissions are checked by the caller
    /// against the freshly-read order; the `WHERE` clause re-checks the
    /// expected current status so a concurrent update loses cleanly.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the order moved out of
    /// `expected` in the meantime.
    pub async fn update_status(
        &self,
        id: OrderId,
        expected: OrderStatus,
        next: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(
            r"
            UPDATE grow.orders
            SET status = $3, updated_at = now()
            WHERE id = $1 AND status = $2
            RETURNING id, reference, listing_id, buyer_id, seller_id, quantity_kg,
                      total_price, status, created_at, updated_at
            ",
        )
        .bind(id)
        .bind(expected)
        .bind(next)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| RepositoryError::Conflict("order status changed concurrently".to_owned()))?;

        Ok(order)
    }
}
