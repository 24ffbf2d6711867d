//! Database operations for the Grow Smart `PostgreSQL` database.
//!
//! # Tables (schema `grow`)
//!
//! - `users` - Farmer accounts (OTP login, no passwords)
//! - `user_profiles` - Optional profile row per user
//! - `email_otps` - Hashed login codes, one live row per email
//! - `email_verification_tokens` - Hashed link tokens, one live row per email
//! - `crop_listings` - Marketplace produce listings
//! - `orders` - Orders placed against listings
//! - `disease_predictions` - Saved disease-detection results
//! - `schemes` - Government scheme entries
//! - `tower_sessions.session` - Tower-sessions storage
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p grow-smart-cli -- migrate
//! ```

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub mod listings;
pub mod orders;
pub mod predictions;
pub mod profiles;
pub mod schemes;
pub mod users;
pub mod verification;

pub use listings::ListingRepository;
pub use orders::OrderRepository;
pub use predictions::PredictionRepository;
pub use profiles::ProfileRepository;
pub use schemes::SchemeRepository;
pub use users::UserRepository;
pub use verification::VerificationRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Map a sqlx error, turning unique violations into `Conflict`.
    pub(crate) fn from_sqlx(e: sqlx::Error, conflict_message: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return Self::Conflict(conflict_message.to_owned());
        }
        Self::Database(e)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
