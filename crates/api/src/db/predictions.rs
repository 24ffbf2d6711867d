//! Disease prediction repository.

use sqlx::PgPool;

use grow_smart_core::UserId;

use super::RepositoryError;
use crate::models::{DiseasePrediction, DiseaseReport};

/// Repository for saved disease-detection results.
pub struct PredictionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PredictionRepository<'a> {
    /// Create a new prediction repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a detection result for a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if the findings cannot be
    /// serialized, `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        user_id: UserId,
        report: &DiseaseReport,
    ) -> Result<DiseasePrediction, RepositoryError> {
        let diseases = serde_json::to_value(&report.diseases).map_err(|e| {
            RepositoryError::DataCorruption(format!("failed to serialize findings: {e}"))
        })?;

        let prediction = sqlx::query_as::<_, DiseasePrediction>(
            r"
            INSERT INTO grow.disease_predictions (user_id, plant_name, is_healthy, diseases)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, plant_name, is_healthy, diseases, created_at
            ",
        )
        .bind(user_id)
        .bind(report.plant_name.as_deref())
        .bind(report.is_healthy)
        .bind(diseases)
        .fetch_one(self.pool)
        .await?;

        Ok(prediction)
    }

    /// A user's saved detections, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<DiseasePrediction>, RepositoryError> {
        let predictions = sqlx::query_as::<_, DiseasePrediction>(
            r"
            SELECT id, user_id, plant_name, is_healthy, diseases, created_at
            FROM grow.disease_predictions
            WHERE user_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(predictions)
    }
}
