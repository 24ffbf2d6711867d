//! Profile repository for database operations.

use rust_decimal::Decimal;
use sqlx::PgPool;

use grow_smart_core::UserId;

use super::RepositoryError;
use crate::models::Profile;

/// Fields a user may change on their profile.
///
/// `None` means "leave unchanged".
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub district: Option<String>,
    pub state: Option<String>,
    pub farm_size_ha: Option<Decimal>,
}

/// Repository for user profile operations.
pub struct ProfileRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProfileRepository<'a> {
    /// Create a new profile repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the profile for a user, if one has been created.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, user_id: UserId) -> Result<Option<Profile>, RepositoryError> {
        let profile = sqlx::query_as::<_, Profile>(
            r"
            SELECT id, user_id, full_name, phone, district, state, farm_size_ha,
                   created_at, updated_at
            FROM grow.user_profiles
            WHERE user_id = $1
            ",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(profile)
    }

    /// Create or update the profile for a user.
    ///
    /// Profiles are created lazily on first update. Two first updates can
    /// race on the insert; the loser sees a unique violation on `user_id`
    /// and falls through to updating the row the winner created.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the queries fail.
    pub async fn upsert(
        &self,
        user_id: UserId,
        update: ProfileUpdate,
    ) -> Result<Profile, RepositoryError> {
        if self.get(user_id).await?.is_none() {
            match self.insert(user_id, &update).await {
                Ok(profile) => return Ok(profile),
                // Concurrent first update created the row; update it below.
                Err(RepositoryError::Conflict(_)) => {}
                Err(other) => return Err(other),
            }
        }

        self.update(user_id, &update).await
    }

    async fn insert(
        &self,
        user_id: UserId,
        update: &ProfileUpdate,
    ) -> Result<Profile, RepositoryError> {
        let profile = sqlx::query_as::<_, Profile>(
            r"
            INSERT INTO grow.user_profiles (user_id, full_name, phone, district, state, farm_size_ha)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, full_name, phone, district, state, farm_size_ha,
                      created_at, updated_at
            ",
        )
        .bind(user_id)
        .bind(update.full_name.as_deref())
        .bind(update.phone.as_deref())
        .bind(update.district.as_deref())
        .bind(update.state.as_deref())
        .bind(update.farm_size_ha)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "profile already exists"))?;

        Ok(profile)
    }

    async fn update(
        &self,
        user_id: UserId,
        update: &ProfileUpdate,
    ) -> Result<Profile, RepositoryError> {
        let profile = sqlx::query_as::<_, Profile>(
            r"
            UPDATE grow.user_profiles SET
                full_name = COALESCE($2, full_name),
                phone = COALESCE($3, phone),
                district = COALESCE($4, district),
                state = COALESCE($5, state),
                farm_size_ha = COALESCE($6, farm_size_ha),
                updated_at = now()
            WHERE user_id = $1
            RETURNING id, user_id, full_name, phone, district, state, farm_size_ha,
                      created_at, updated_at
            ",
        )
        .bind(user_id)
        .bind(update.full_name.as_deref())
        .bind(update.phone.as_deref())
        .bind(update.district.as_deref())
        .bind(update.state.as_deref())
        .bind(update.farm_size_ha)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(profile)
    }
}
