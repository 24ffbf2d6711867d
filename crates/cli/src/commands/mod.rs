//! CLI command implementations.

pub mod admin;
pub mod migrate;
pub mod seed;

use secrecy::SecretString;

/// Read the database URL from `GROW_DATABASE_URL`, falling back to the
/// generic `DATABASE_URL` (used by hosted postgres attach).
pub(crate) fn database_url() -> Result<SecretString, &'static str> {
    if let Ok(value) = std::env::var("GROW_DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err("GROW_DATABASE_URL not set")
}
