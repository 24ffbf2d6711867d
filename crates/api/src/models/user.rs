//! User and profile models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use grow_smart_core::{Email, ProfileId, UserId, UserRole};

/// A farmer account.
///
/// There is no password: accounts are created and logged in through the
/// emailed OTP flow.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Email address (unique, lowercased).
    pub email: Email,
    /// Whether the email has been verified.
    pub email_verified: bool,
    /// Account role.
    pub role: UserRole,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Optional profile details, created lazily on first update.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Profile {
    /// Unique profile ID.
    pub id: ProfileId,
    /// Owning user.
    pub user_id: UserId,
    /// Display name.
    pub full_name: Option<String>,
    /// Contact phone number.
    pub phone: Option<String>,
    /// District the farm is in.
    pub district: Option<String>,
    /// State the farm is in.
    pub state: Option<String>,
    /// Farm size in hectares.
    pub farm_size_ha: Option<Decimal>,
    /// When the profile was created.
    pub created_at: DateTime<Utc>,
    /// When the profile was last updated.
    pub updated_at: DateTime<Utc>,
}
