//! Authentication routes: OTP login and email verification links.

use axum::{Json, extract::Query, extract::State};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tower_sessions::Session;

use crate::db::users::UserRepository;
use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::RequireAuth;
use crate::middleware::auth::{clear_current_user, set_current_user};
use crate::models::{CurrentUser, User};
use crate::services::VerificationService;
use crate::state::AppState;

/// Request to send a login code.
#[derive(Debug, Deserialize)]
pub struct SendOtpRequest {
    pub email: String,
}

/// Send a login OTP to an email address.
///
/// POST /api/auth/otp/send
///
/// Responds identically whether or not an account exists for the address,
/// so the endpoint cannot be used to enumerate accounts.
///
/// # Errors
///
/// Returns 400 for a malformed email, 502 if email delivery fails.
pub async fn send_otp(
    State(state): State<AppState>,
    Json(req): Json<SendOtpRequest>,
) -> Result<Json<Value>> {
    let service =
        VerificationService::new(state.pool(), state.mailer(), &state.config().base_url);
    service.send_otp(&req.email).await?;

    Ok(Json(json!({ "status": "sent" })))
}

/// Request to verify a login code.
#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub code: String,
}

/// Response from a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: User,
}

/// Verify a login OTP and establish a session.
///
/// POST /api/auth/otp/verify
///
/// Creates the account on first successful verification.
///
/// # Errors
///
/// Returns 400 for a wrong or expired code, 429 after too many attempts.
pub async fn verify_otp(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<VerifyOtpRequest>,
) -> Result<Json<LoginResponse>> {
    let service =
        VerificationService::new(state.pool(), state.mailer(), &state.config().base_url);
    let user = service.verify_otp(&req.email, &req.code).await?;

    // Fresh session ID on privilege change
    session.cycle_id().await.map_err(|e| {
        AppError::Internal(format!("session error: {e}"))
    })?;

    let current = CurrentUser {
        id: user.id,
        email: user.email.clone(),
        role: user.role,
    };
    set_current_user(&session, &current)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    set_sentry_user(&user.id, Some(user.email.as_str()));
    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(LoginResponse { user }))
}

/// Send a fresh email-verification link to the logged-in user.
///
/// POST /api/auth/verify-email/send
///
/// No-op when the account is already verified: no token is stored and no
/// email goes out.
///
/// # Errors
///
/// Returns 502 if email delivery fails.
pub async fn send_verification_link(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Value>> {
    // Verification status can change between requests; read it fresh
    let account = UserRepository::new(state.pool())
        .get_by_id(user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("account not found".to_owned()))?;

    if account.email_verified {
        return Ok(Json(json!({ "status": "already_verified" })));
    }

    let service =
        VerificationService::new(state.pool(), state.mailer(), &state.config().base_url);
    service.send_verification_link(&user.email).await?;

    Ok(Json(json!({ "status": "sent" })))
}

/// Query parameters for the confirmation link.
#[derive(Debug, Deserialize)]
pub struct ConfirmQuery {
    pub token: String,
}

/// Confirm an email-verification link.
///
/// GET /api/auth/verify-email/confirm?token=...
///
/// The link is single use.
///
/// # Errors
///
/// Returns 400 for an unknown or expired token.
pub async fn confirm_verification(
    State(state): State<AppState>,
    Query(query): Query<ConfirmQuery>,
) -> Result<Json<Value>> {
    let service =
        VerificationService::new(state.pool(), state.mailer(), &state.config().base_url);
    let email = service.confirm_token(&query.token).await?;

    Ok(Json(json!({ "status": "verified", "email": email.as_str() })))
}

/// Log out and destroy the session.
///
/// POST /api/auth/logout
///
/// # Errors
///
/// Returns 500 if the session cannot be modified.
pub async fn logout(session: Session) -> Result<Json<Value>> {
    clear_current_user(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    session
        .flush()
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    clear_sentry_user();

    Ok(Json(json!({ "status": "logged_out" })))
}
