//! Integration tests for Grow Smart.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations
//! grow-cli migrate
//!
//! # Start the API
//! cargo run -p grow-smart-api
//!
//! # Run integration tests
//! cargo test -p grow-smart-integration-tests -- --ignored
//! ```
//!
//! Tests are `#[ignore]`d by default because they need a running server
//! and database; `cargo test` stays green without infrastructure.

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use sha2::{Digest, Sha256};
use sqlx::PgPool;

/// Shared context for integration tests: an HTTP client with a cookie jar
/// and a direct database handle for seeding and assertions.
pub struct TestContext {
    pub client: Client,
    pub api_url: String,
    pub pool: PgPool,
}

impl TestContext {
    /// Connect to the running API and test database.
    ///
    /// # Panics
    ///
    /// Panics if `GROW_DATABASE_URL` is unset or the database is
    /// unreachable. Integration tests cannot run without either.
    pub async fn new() -> Self {
        let api_url = std::env::var("GROW_API_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        let database_url = std::env::var("GROW_DATABASE_URL")
            .or_else(|_| std::env::var("DATABASE_URL"))
            .map(SecretString::from)
            .expect("GROW_DATABASE_URL must be set for integration tests");

        let pool = PgPool::connect(database_url.expose_secret())
            .await
            .expect("Failed to connect to test database");

        // Rate limiting keys on the forwarded client IP; a unique address
        // per context keeps tests out of each other's buckets
        let octets = uuid::Uuid::new_v4().into_bytes();
        let forwarded_for = format!("10.{}.{}.{}", octets[0], octets[1], octets[2]);
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            forwarded_for
                .parse()
                .expect("Forwarded IP is a valid header value"),
        );

        let client = Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_url,
            pool,
        }
    }

    /// Insert an OTP row with the digest of a known code.
    ///
    /// The server stores only digests, so tests that need to present a
    /// valid code seed one directly. A negative `expires_in_secs` seeds an
    /// already-expired row.
    ///
    /// # Panics
    ///
    /// Panics if the insert fails.
    pub async fn seed_otp(&self, email: &str, code: &str, expires_in_secs: f64) {
        let _ = sqlx::query("DELETE FROM grow.email_otps WHERE email = $1")
            .bind(email)
            .execute(&self.pool)
            .await;

        sqlx::query(
            r"
            INSERT INTO grow.email_otps (email, code_hash, expires_at)
            VALUES ($1, $2, now() + make_interval(secs => $3))
            ",
        )
        .bind(email)
        .bind(Sha256::digest(code.as_bytes()).to_vec())
        .bind(expires_in_secs)
        .execute(&self.pool)
        .await
        .expect("Failed to seed OTP row");
    }

    /// Insert a verification-token row with the digest of a known token.
    ///
    /// # Panics
    ///
    /// Panics if the insert fails.
    pub async fn seed_verification_token(&self, email: &str, token: &str, expires_in_secs: f64) {
        let _ = sqlx::query("DELETE FROM grow.email_verification_tokens WHERE email = $1")
            .bind(email)
            .execute(&self.pool)
            .await;

        sqlx::query(
            r"
            INSERT INTO grow.email_verification_tokens (email, token_hash, expires_at)
            VALUES ($1, $2, now() + make_interval(secs => $3))
            ",
        )
        .bind(email)
        .bind(Sha256::digest(token.as_bytes()).to_vec())
        .bind(expires_in_secs)
        .execute(&self.pool)
        .await
        .expect("Failed to seed verification token row");
    }

    /// Log in as `email` by seeding a known OTP and verifying it.
    ///
    /// The session cookie lands in this context's cookie jar, so further
    /// requests from `self.client` are authenticated. Creates the account
    /// if it doesn't exist yet.
    ///
    /// # Panics
    ///
    /// Panics if the login round trip fails.
    pub async fn login(&self, email: &str) {
        self.seed_otp(email, "123456", 600.0).await;

        let resp = self
            .client
            .post(format!("{}/api/auth/otp/verify", self.api_url))
            .json(&json!({ "email": email, "code": "123456" }))
            .send()
            .await
            .expect("Failed to send verify request");

        assert!(
            resp.status().is_success(),
            "login as {email} failed with {}",
            resp.status()
        );
    }

    /// Whether a live OTP row exists for an email.
    pub async fn otp_row_exists(&self, email: &str) -> bool {
        sqlx::query_scalar::<_, i64>("SELECT count(*) FROM grow.email_otps WHERE email = $1")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map(|n| n > 0)
            .unwrap_or(false)
    }

    /// Whether a live verification-token row exists for an email.
    pub async fn token_row_exists(&self, email: &str) -> bool {
        sqlx::query_scalar::<_, i64>(
            "SELECT count(*) FROM grow.email_verification_tokens WHERE email = $1",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map(|n| n > 0)
        .unwrap_or(false)
    }

    /// Delete all rows tied to a test email so runs are repeatable.
    ///
    /// Listings and orders cascade from the user row.
    pub async fn cleanup_email(&self, email: &str) {
        for query in [
            "DELETE FROM grow.email_otps WHERE email = $1",
            "DELETE FROM grow.email_verification_tokens WHERE email = $1",
            "DELETE FROM grow.users WHERE email = $1",
        ] {
            let _ = sqlx::query(query).bind(email).execute(&self.pool).await;
        }
    }
}
