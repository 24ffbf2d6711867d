//! Government scheme model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use grow_smart_core::SchemeId;

/// A government scheme entry, managed by admins.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Scheme {
    /// Unique scheme ID.
    pub id: SchemeId,
    /// Scheme name.
    pub name: String,
    /// Category (e.g., "subsidy", "insurance", "credit").
    pub category: String,
    /// What the scheme offers.
    pub description: String,
    /// Who qualifies.
    pub eligibility: Option<String>,
    /// Benefit summary.
    pub benefits: Option<String>,
    /// Where to apply.
    pub application_url: Option<String>,
    /// When the entry was created.
    pub created_at: DateTime<Utc>,
    /// When the entry was last updated.
    pub updated_at: DateTime<Utc>,
}
