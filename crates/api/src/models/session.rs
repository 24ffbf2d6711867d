//! Session-stored data.

use serde::{Deserialize, Serialize};

use grow_smart_core::{Email, UserId, UserRole};

/// Keys under which values are stored in the session.
pub mod session_keys {
    /// The logged-in user, set after a successful OTP verification.
    pub const CURRENT_USER: &str = "current_user";
}

/// The logged-in user, as stored in the session.
///
/// Kept small on purpose: anything that can change between requests
/// (profile fields, verification status of a different email) is read
/// from the database by the handler that needs it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User ID.
    pub id: UserId,
    /// Email address at login time.
    pub email: Email,
    /// Role at login time.
    pub role: UserRole,
}
