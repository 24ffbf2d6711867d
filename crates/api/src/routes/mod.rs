//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//! GET  /health/ready                    - Readiness check (database)
//!
//! All /api routes outside /api/auth share a relaxed rate limit
//! (~100/min per IP).
//!
//! # Auth (rate limited, ~10/min per IP)
//! POST /api/auth/otp/send               - Send a login code
//! POST /api/auth/otp/verify             - Verify a code, establish session
//! POST /api/auth/verify-email/send      - Send a verification link (auth)
//! GET  /api/auth/verify-email/confirm   - Confirm a verification link
//! POST /api/auth/logout                 - Destroy the session
//!
//! # Profile (auth)
//! GET  /api/profile                     - Account and profile details
//! PUT  /api/profile                     - Update profile (lazy create)
//!
//! # Advisory
//! POST /api/recommend                   - Rule-based crop recommendation
//! POST /api/disease/detect              - Assess a crop photo
//! GET  /api/disease/history             - Saved detections (auth)
//!
//! # Marketplace
//! GET    /api/listings                  - Browse active listings
//! GET    /api/listings/{id}             - Listing detail
//! POST   /api/listings                  - Create listing (auth)
//! PUT    /api/listings/{id}             - Update own listing (auth)
//! DELETE /api/listings/{id}             - Withdraw own listing (auth)
//! POST   /api/orders                    - Place an order (auth)
//! GET    /api/orders                    - Orders as buyer or seller (auth)
//! POST   /api/orders/{id}/status        - Accept/reject/complete/cancel (auth)
//!
//! # Content
//! GET  /api/schemes                     - Government schemes
//! GET  /api/schemes/{id}                - Scheme detail
//! GET  /api/news                        - Agriculture news (cached proxy)
//!
//! # Admin (admin role)
//! POST   /api/admin/schemes             - Create scheme
//! PUT    /api/admin/schemes/{id}        - Replace scheme
//! DELETE /api/admin/schemes/{id}        - Delete scheme
//! ```

pub mod auth;
pub mod disease;
pub mod marketplace;
pub mod news;
pub mod orders;
pub mod profile;
pub mod recommend;
pub mod schemes;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post, put},
};

use crate::middleware::rate_limit;
use crate::state::AppState;

/// Request body cap for photo uploads (base64 inflates by ~4/3).
const DETECT_BODY_LIMIT: usize = 16 * 1024 * 1024;

/// Create the auth routes router.
///
/// Strictly rate limited; every endpoint here either sends email or
/// accepts guesses at a code.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/otp/send", post(auth::send_otp))
        .route("/otp/verify", post(auth::verify_otp))
        .route("/verify-email/send", post(auth::send_verification_link))
        .route("/verify-email/confirm", get(auth::confirm_verification))
        .route("/logout", post(auth::logout))
        .layer(rate_limit::auth_rate_limiter())
}

/// Create the listing routes router.
pub fn listing_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(marketplace::browse).post(marketplace::create))
        .route(
            "/{id}",
            get(marketplace::get)
                .put(marketplace::update)
                .delete(marketplace::withdraw),
        )
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(orders::create).get(orders::list))
        .route("/{id}/status", post(orders::update_status))
}

/// Create the disease detection routes router.
pub fn disease_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/detect",
            post(disease::detect).layer(DefaultBodyLimit::max(DETECT_BODY_LIMIT)),
        )
        .route("/history", get(disease::history))
}

/// Create the scheme routes router (public, read-only).
pub fn scheme_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(schemes::list))
        .route("/{id}", get(schemes::get))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/schemes", post(schemes::create))
        .route("/schemes/{id}", put(schemes::update).delete(schemes::delete))
}

/// Create all API routes.
///
/// The relaxed limiter covers everything except `/api/auth`, which carries
/// its own strict limiter.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/profile",
            get(profile::get_profile).put(profile::update_profile),
        )
        .route("/api/recommend", post(recommend::recommend_crops))
        .nest("/api/disease", disease_routes())
        .nest("/api/listings", listing_routes())
        .nest("/api/orders", order_routes())
        .nest("/api/schemes", scheme_routes())
        .route("/api/news", get(news::list))
        .nest("/api/admin", admin_routes())
        .layer(rate_limit::api_rate_limiter())
        .nest("/api/auth", auth_routes())
}
