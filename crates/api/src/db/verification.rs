//! Repository for OTP and verification-token rows.
//!
//! Only SHA-256 digests of codes and tokens are stored. The
//! `UNIQUE(email)` constraints keep at most one live row per address;
//! `replace_*` deletes any prior row in the same transaction as the insert.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use grow_smart_core::Email;

use super::RepositoryError;

/// A stored login OTP.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OtpRow {
    /// Address the code was sent to.
    pub email: Email,
    /// SHA-256 digest of the six-digit code.
    pub code_hash: Vec<u8>,
    /// Failed verification attempts so far.
    pub attempts: i32,
    /// When the code stops being accepted.
    pub expires_at: DateTime<Utc>,
}

/// A stored email-verification token.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TokenRow {
    /// Address the link was sent to.
    pub email: Email,
    /// SHA-256 digest of the raw token.
    pub token_hash: Vec<u8>,
    /// When the link stops being accepted.
    pub expires_at: DateTime<Utc>,
}

/// Repository for email verification state.
pub struct VerificationRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> VerificationRepository<'a> {
    /// Create a new verification repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a fresh OTP for an email, discarding any previous one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the transaction fails.
    pub async fn replace_otp(
        &self,
        email: &Email,
        code_hash: &[u8],
        expires_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM grow.email_otps WHERE email = $1")
            .bind(email)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO grow.email_otps (email, code_hash, expires_at) VALUES ($1, $2, $3)",
        )
        .bind(email)
        .bind(code_hash)
        .bind(expires_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }

    /// Get the live OTP row for an email, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_otp(&self, email: &Email) -> Result<Option<OtpRow>, RepositoryError> {
        let row = sqlx::query_as::<_, OtpRow>(
            "SELECT email, code_hash, attempts, expires_at FROM grow.email_otps WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }

    /// Record a failed attempt and return the new attempt count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no live OTP row exists.
    pub async fn increment_otp_attempts(&self, email: &Email) -> Result<i32, RepositoryError> {
        let attempts: Option<(i32,)> = sqlx::query_as(
            "UPDATE grow.email_otps SET attempts = attempts + 1 WHERE email = $1 RETURNING attempts",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        attempts.map(|(a,)| a).ok_or(RepositoryError::NotFound)
    }

    /// Remove the OTP row for an email (consumed or expired).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_otp(&self, email: &Email) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM grow.email_otps WHERE email = $1")
            .bind(email)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Store a fresh verification token for an email, discarding any previous one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the transaction fails.
    pub async fn replace_token(
        &self,
        email: &Email,
        token_hash: &[u8],
        expires_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM grow.email_verification_tokens WHERE email = $1")
            .bind(email)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r"
            INSERT INTO grow.email_verification_tokens (email, token_hash, expires_at)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(email)
        .bind(token_hash)
        .bind(expires_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }

    /// Look up a token row by the digest of the presented token.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_token_by_hash(
        &self,
        token_hash: &[u8],
    ) -> Result<Option<TokenRow>, RepositoryError> {
        let row = sqlx::query_as::<_, TokenRow>(
            r"
            SELECT email, token_hash, expires_at
            FROM grow.email_verification_tokens
            WHERE token_hash = $1
            ",
        )
        .bind(token_hash)
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }

    /// Remove the token row for an email (consumed or expired).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_token(&self, email: &Email) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM grow.email_verification_tokens WHERE email = $1")
            .bind(email)
            .execute(self.pool)
            .await?;

        Ok(())
    }
}
