//! OTP and email-verification-token flows.
//!
//! Both flows store only SHA-256 digests. An OTP is six digits, lives for
//! ten minutes, and allows three attempts; a verification token is 32
//! random bytes, lives for 24 hours, and is single use. One live row per
//! email in either table.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{Duration, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use thiserror::Error;

use grow_smart_core::{Email, OtpCode};

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::db::verification::VerificationRepository;
use crate::models::User;
use crate::services::mailer::{Mailer, MailerError};

/// How long an OTP is accepted after being sent.
const OTP_TTL_MINUTES: i64 = 10;

/// Failed verifications allowed before the code is burned.
const MAX_OTP_ATTEMPTS: i32 = 3;

/// How long a verification link is accepted after being sent.
const TOKEN_TTL_HOURS: i64 = 24;

/// Raw length of a verification token before base64url encoding.
const TOKEN_BYTES: usize = 32;

/// Errors that can occur during verification flows.
#[derive(Debug, Error)]
pub enum VerificationError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] grow_smart_core::EmailError),

    /// Invalid code format.
    #[error("invalid code: {0}")]
    InvalidCode(#[from] grow_smart_core::OtpCodeError),

    /// No code has been sent to this email (or it was already consumed).
    #[error("no active code for this email")]
    NoActiveCode,

    /// The code's expiry window has passed.
    #[error("code expired")]
    CodeExpired,

    /// The presented code does not match.
    #[error("code mismatch")]
    CodeMismatch,

    /// The attempt limit was reached.
    #[error("too many attempts")]
    TooManyAttempts,

    /// The verification link has expired.
    #[error("token expired")]
    TokenExpired,

    /// The verification link is unknown or malformed.
    #[error("token invalid")]
    TokenInvalid,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Email delivery error.
    #[error("mailer error: {0}")]
    Mailer(#[from] MailerError),
}

/// Verification service.
///
/// Handles OTP login and email-verification links.
pub struct VerificationService<'a> {
    users: UserRepository<'a>,
    verification: VerificationRepository<'a>,
    mailer: &'a Mailer,
    base_url: &'a str,
}

impl<'a> VerificationService<'a> {
    /// Create a new verification service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, mailer: &'a Mailer, base_url: &'a str) -> Self {
        Self {
            users: UserRepository::new(pool),
            verification: VerificationRepository::new(pool),
            mailer,
            base_url,
        }
    }

    /// Generate, store, and deliver a login OTP.
    ///
    /// Any previous code for the email is discarded first. The response to
    /// the client is the same whether or not an account exists for the
    /// address.
    ///
    /// # Errors
    ///
    /// Returns `VerificationError::InvalidEmail` for malformed input,
    /// `Repository`/`Mailer` for storage or delivery failures.
    pub async fn send_otp(&self, email_raw: &str) -> Result<(), VerificationError> {
        let email = Email::parse(email_raw)?;

        let code = generate_code();
        let expires_at = Utc::now() + Duration::minutes(OTP_TTL_MINUTES);

        self.verification
            .replace_otp(&email, &sha256(code.as_str()), expires_at)
            .await?;

        self.mailer.send_otp(&email, &code).await?;

        tracing::info!(email = %email, "Login code sent");
        Ok(())
    }

    /// Verify a login OTP and return the (possibly just created) user.
    ///
    /// # Errors
    ///
    /// Returns `NoActiveCode` if nothing was sent, `CodeExpired` past the
    /// window, `TooManyAttempts` after three failures, `CodeMismatch`
    /// otherwise.
    pub async fn verify_otp(
        &self,
        email_raw: &str,
        code_raw: &str,
    ) -> Result<User, VerificationError> {
        let email = Email::parse(email_raw)?;
        let code = OtpCode::parse(code_raw)?;

        let row = self
            .verification
            .get_otp(&email)
            .await?
            .ok_or(VerificationError::NoActiveCode)?;

        if row.expires_at < Utc::now() {
            self.verification.delete_otp(&email).await?;
            return Err(VerificationError::CodeExpired);
        }

        if row.attempts >= MAX_OTP_ATTEMPTS {
            return Err(VerificationError::TooManyAttempts);
        }

        if !digests_match(&sha256(code.as_str()), &row.code_hash) {
            let attempts = self.verification.increment_otp_attempts(&email).await?;
            if attempts >= MAX_OTP_ATTEMPTS {
                return Err(VerificationError::TooManyAttempts);
            }
            return Err(VerificationError::CodeMismatch);
        }

        // Code accepted: burn it, then log the user in.
        self.verification.delete_otp(&email).await?;

        let user = self.users.get_or_create(&email).await?;
        if !user.email_verified {
            self.users.verify_email(user.id).await?;
        }

        self.users
            .get_by_id(user.id)
            .await?
            .ok_or(VerificationError::Repository(RepositoryError::NotFound))
    }

    /// Generate, store, and deliver an email-verification link.
    ///
    /// # Errors
    ///
    /// Returns `Repository`/`Mailer` for storage or delivery failures.
    pub async fn send_verification_link(&self, email: &Email) -> Result<(), VerificationError> {
        let token = generate_token();
        let expires_at = Utc::now() + Duration::hours(TOKEN_TTL_HOURS);

        self.verification
            .replace_token(email, &sha256(&token), expires_at)
            .await?;

        let link = format!(
            "{}/api/auth/verify-email/confirm?token={token}",
            self.base_url
        );
        self.mailer.send_verification_link(email, &link).await?;

        tracing::info!(email = %email, "Verification link sent");
        Ok(())
    }

    /// Consume a verification token and mark the owning user verified.
    ///
    /// Returns the verified email.
    ///
    /// # Errors
    ///
    /// Returns `TokenInvalid` for unknown tokens, `TokenExpired` past the
    /// window.
    pub async fn confirm_token(&self, token: &str) -> Result<Email, VerificationError> {
        if token.is_empty() || token.len() > 128 {
            return Err(VerificationError::TokenInvalid);
        }

        let row = self
            .verification
            .get_token_by_hash(&sha256(token))
            .await?
            .ok_or(VerificationError::TokenInvalid)?;

        if row.expires_at < Utc::now() {
            self.verification.delete_token(&row.email).await?;
            return Err(VerificationError::TokenExpired);
        }

        self.users.verify_email_by_address(&row.email).await?;
        self.verification.delete_token(&row.email).await?;

        tracing::info!(email = %row.email, "Email verified via link");
        Ok(row.email)
    }
}

/// Generate a random six-digit code.
fn generate_code() -> OtpCode {
    OtpCode::from_number(rand::rng().random_range(0..1_000_000))
}

/// Generate a random base64url token.
fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill(&mut bytes[..]);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// SHA-256 digest of a string.
fn sha256(value: &str) -> Vec<u8> {
    Sha256::digest(value.as_bytes()).to_vec()
}

/// Compare two digests without short-circuiting on the first mismatch.
fn digests_match(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_is_deterministic() {
        assert_eq!(sha256("123456"), sha256("123456"));
        assert_ne!(sha256("123456"), sha256("123457"));
        assert_eq!(sha256("123456").len(), 32);
    }

    #[test]
    fn test_generate_code_shape() {
        for _ in 0..100 {
            let code = generate_code();
            assert_eq!(code.as_str().len(), 6);
            assert!(code.as_str().bytes().all(|b| b.is_ascii_digit()));
        }
    }

    #[test]
    fn test_generate_token_shape() {
        let token = generate_token();
        // 32 bytes -> 43 base64url chars, no padding
        assert_eq!(token.len(), 43);
        assert!(!token.contains('='));
        assert_ne!(generate_token(), generate_token());
    }

    #[test]
    fn test_digests_match() {
        let a = sha256("abc");
        let b = sha256("abc");
        let c = sha256("abd");
        assert!(digests_match(&a, &b));
        assert!(!digests_match(&a, &c));
        assert!(!digests_match(&a, &a[..16]));
    }
}
