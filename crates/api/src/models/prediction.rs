//! Disease detection models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use grow_smart_core::{PredictionId, UserId};

/// One disease suggestion from the plant health provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiseaseFinding {
    /// Disease name as reported by the provider.
    pub name: String,
    /// Provider confidence in `[0, 1]`.
    pub probability: f64,
    /// Suggested treatment, when the provider supplies one.
    pub treatment: Option<String>,
}

/// The mapped result of a health assessment, returned to the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiseaseReport {
    /// Identified plant, if the provider could name one.
    pub plant_name: Option<String>,
    /// Whether the provider judged the plant healthy.
    pub is_healthy: bool,
    /// Disease suggestions, highest probability first.
    pub diseases: Vec<DiseaseFinding>,
}

/// A stored detection result (authenticated callers only).
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct DiseasePrediction {
    /// Unique prediction ID.
    pub id: PredictionId,
    /// User who ran the detection.
    pub user_id: UserId,
    /// Identified plant, if any.
    pub plant_name: Option<String>,
    /// Whether the plant was judged healthy.
    pub is_healthy: bool,
    /// Serialized [`DiseaseFinding`] list.
    pub diseases: serde_json::Value,
    /// When the detection ran.
    pub created_at: DateTime<Utc>,
}
