//! Government scheme repository.

use sqlx::PgPool;

use grow_smart_core::SchemeId;

use super::RepositoryError;
use crate::models::Scheme;

/// Fields for creating or replacing a scheme entry.
#[derive(Debug, Clone)]
pub struct SchemeInput {
    pub name: String,
    pub category: String,
    pub description: String,
    pub eligibility: Option<String>,
    pub benefits: Option<String>,
    pub application_url: Option<String>,
}

/// Repository for government scheme entries.
pub struct SchemeRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SchemeRepository<'a> {
    /// Create a new scheme repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List schemes, optionally filtered by category, name order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, category: Option<&str>) -> Result<Vec<Scheme>, RepositoryError> {
        let schemes = sqlx::query_as::<_, Scheme>(
            r"
            SELECT id, name, category, description, eligibility, benefits, application_url,
                   created_at, updated_at
            FROM grow.schemes
            WHERE ($1::text IS NULL OR category = $1)
            ORDER BY name ASC
            ",
        )
        .bind(category)
        .fetch_all(self.pool)
        .await?;

        Ok(schemes)
    }

    /// Get a scheme by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: SchemeId) -> Result<Option<Scheme>, RepositoryError> {
        let scheme = sqlx::query_as::<_, Scheme>(
            r"
            SELECT id, name, category, description, eligibility, benefits, application_url,
                   created_at, updated_at
            FROM grow.schemes
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(scheme)
    }

    /// Create a scheme entry.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, input: SchemeInput) -> Result<Scheme, RepositoryError> {
        let scheme = sqlx::query_as::<_, Scheme>(
            r"
            INSERT INTO grow.schemes (name, category, description, eligibility, benefits, application_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, category, description, eligibility, benefits, application_url,
                      created_at, updated_at
            ",
        )
        .bind(input.name)
        .bind(input.category)
        .bind(input.description)
        .bind(input.eligibility)
        .bind(input.benefits)
        .bind(input.application_url)
        .fetch_one(self.pool)
        .await?;

        Ok(scheme)
    }

    /// Replace a scheme entry.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the scheme doesn't exist.
    pub async fn update(&self, id: SchemeId, input: SchemeInput) -> Result<Scheme, RepositoryError> {
        let scheme = sqlx::query_as::<_, Scheme>(
            r"
            UPDATE grow.schemes SET
                name = $2, category = $3, description = $4,
                eligibility = $5, benefits = $6, application_url = $7,
                updated_at = now()
            WHERE id = $1
            RETURNING id, name, category, description, eligibility, benefits, application_url,
                      created_at, updated_at
            ",
        )
        .bind(id)
        .bind(input.name)
        .bind(input.category)
        .bind(input.description)
        .bind(input.eligibility)
        .bind(input.benefits)
        .bind(input.application_url)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(scheme)
    }

    /// Delete a scheme entry.
    ///
    /// # Returns
    ///
    /// Returns `true` if the scheme was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: SchemeId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM grow.schemes WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
