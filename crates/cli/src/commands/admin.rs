//! Admin role management commands.
//!
//! # Usage
//!
//! ```bash
//! # Grant the admin role
//! grow-cli admin grant -e admin@example.com
//!
//! # Revoke it again
//! grow-cli admin revoke -e admin@example.com
//! ```
//!
//! The account must already exist (accounts are created through the OTP
//! login flow; there is no way to mint one from here).

use thiserror::Error;

use grow_smart_api::db::{self, RepositoryError, UserRepository};
use grow_smart_core::{Email, EmailError, UserRole};

/// Errors that can occur during admin role changes.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// No account holds this email.
    #[error("No account found for email: {0}")]
    NoSuchAccount(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(RepositoryError),
}

/// Set the role on the account holding `email`.
///
/// # Errors
///
/// Returns `AdminError::NoSuchAccount` if no account holds the email.
pub async fn set_role(email: &str, role: UserRole) -> Result<(), AdminError> {
    dotenvy::dotenv().ok();

    let email = Email::parse(email)?;

    let database_url = super::database_url().map_err(AdminError::MissingEnvVar)?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url)
        .await
        .map_err(|e| AdminError::Database(RepositoryError::Database(e)))?;

    match UserRepository::new(&pool).set_role(&email, role).await {
        Ok(()) => {
            tracing::info!("Role for {} set to {}", email, role);
            Ok(())
        }
        Err(RepositoryError::NotFound) => {
            Err(AdminError::NoSuchAccount(email.as_str().to_owned()))
        }
        Err(other) => Err(AdminError::Database(other)),
    }
}
